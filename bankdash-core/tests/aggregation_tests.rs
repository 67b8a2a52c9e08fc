//! Integration tests for bankdash-core services
//!
//! The store and provider are the in-memory adapters, so these tests cover
//! the full aggregation and merge paths without any network IO.
//!
//! Run with: cargo test --test aggregation_tests -- --nocapture

use std::sync::Arc;
use std::time::Duration;

use rust_decimal::Decimal;
use serde_json::json;

use bankdash_core::adapters::memory::{
    sample_account, sample_transaction, InMemoryBankLinkStore, StaticBankDataProvider,
};
use bankdash_core::config::Config;
use bankdash_core::domain::{BankLink, Direction, Institution, TransactionSource};
use bankdash_core::services::{AccountService, TransactionService};
use bankdash_core::{BankdashContext, OperationResult};

// ============================================================================
// Test Helpers
// ============================================================================

const TIMEOUT: Duration = Duration::from_secs(5);

/// Two links owned by user-1 with balances 100.00 and 250.35
fn two_bank_fixture() -> (Arc<InMemoryBankLinkStore>, Arc<StaticBankDataProvider>) {
    let store = InMemoryBankLinkStore::new()
        .with_link(BankLink::new("bank-1", "user-1", "token-1"))
        .with_link(BankLink::new("bank-2", "user-1", "token-2"));
    let provider = StaticBankDataProvider::new()
        .with_institution(Institution::new("ins_1", "First Platypus Bank"))
        .with_institution(Institution::new("ins_2", "Tartan Bank"))
        .with_accounts("token-1", "ins_1", vec![sample_account("acc-1", Decimal::new(10000, 2))])
        .with_accounts("token-2", "ins_2", vec![sample_account("acc-2", Decimal::new(25035, 2))]);
    (Arc::new(store), Arc::new(provider))
}

// ============================================================================
// Account Aggregator
// ============================================================================

#[tokio::test]
async fn test_two_banks_total_350_35() {
    let (store, provider) = two_bank_fixture();
    let summary = AccountService::new(store, provider, TIMEOUT)
        .aggregate_accounts("user-1")
        .await
        .unwrap();

    assert_eq!(summary.total_banks, 2);
    assert_eq!(summary.total_current_balance, Decimal::new(35035, 2));
    let links: Vec<&str> = summary.accounts.iter().map(|a| a.bank_link_id.as_str()).collect();
    assert_eq!(links, vec!["bank-1", "bank-2"]);
}

#[tokio::test]
async fn test_totals_match_accounts_for_many_links() {
    let mut store = InMemoryBankLinkStore::new();
    let mut provider =
        StaticBankDataProvider::new().with_institution(Institution::new("ins_1", "Bank"));
    let mut expected = Decimal::ZERO;

    for i in 1..=7i64 {
        let token = format!("token-{i}");
        let balance = Decimal::new(i * 1234, 2);
        expected += balance;
        store = store.with_link(BankLink::new(format!("bank-{i}"), "user-1", token.clone()));
        provider = provider.with_accounts(
            token,
            "ins_1",
            vec![sample_account(&format!("acc-{i}"), balance)],
        );
    }

    let summary = AccountService::new(Arc::new(store), Arc::new(provider), TIMEOUT)
        .aggregate_accounts("user-1")
        .await
        .unwrap();

    assert_eq!(summary.total_banks, 7);
    assert_eq!(summary.total_current_balance, expected);
}

#[tokio::test]
async fn test_summary_serializes_with_dashboard_field_names() {
    let (store, provider) = two_bank_fixture();
    let summary = AccountService::new(store, provider, TIMEOUT)
        .aggregate_accounts("user-1")
        .await
        .unwrap();

    let value = serde_json::to_value(&summary).unwrap();
    assert_eq!(value["totalBanks"], 2);
    assert_eq!(value["data"][0]["bankLinkId"], "bank-1");
    assert_eq!(value["data"][0]["type"], "depository");
}

// ============================================================================
// Transaction Merger
// ============================================================================

#[tokio::test]
async fn test_sent_received_and_provider_are_ordered_newest_first() {
    let store = InMemoryBankLinkStore::new()
        .with_link(BankLink::new("bank-1", "user-1", "token-1"))
        .with_transfer(json!({
            "$id": "sent-d1",
            "$createdAt": "2024-03-01T08:00:00.000+00:00",
            "name": "Rent share",
            "amount": 600,
            "senderBankId": "bank-1",
            "receiverBankId": "bank-9"
        }))
        .with_transfer(json!({
            "$id": "received-d3",
            "$createdAt": "2024-03-03T08:00:00.000+00:00",
            "name": "Refund",
            "amount": "15.25",
            "senderBankId": "bank-9",
            "receiverBankId": "bank-1"
        }));
    let provider = StaticBankDataProvider::new()
        .with_institution(Institution::new("ins_1", "Bank"))
        .with_accounts("token-1", "ins_1", vec![sample_account("acc-1", Decimal::ONE)])
        .with_transaction_pages(
            "token-1",
            vec![vec![sample_transaction("provider-d2", "2024-03-02", Decimal::new(499, 2))]],
        );

    let detail = TransactionService::new(Arc::new(store), Arc::new(provider), TIMEOUT)
        .get_account_detail("bank-1")
        .await
        .unwrap();

    let ids: Vec<&str> = detail.transactions.iter().map(|t| t.id.as_str()).collect();
    assert_eq!(ids, vec!["received-d3", "provider-d2", "sent-d1"]);

    let received = &detail.transactions[0];
    assert_eq!(received.direction, Direction::Credit);
    assert_eq!(received.source, TransactionSource::Transfer);
    assert_eq!(received.amount, Decimal::new(1525, 2));
    assert_eq!(detail.transactions[2].direction, Direction::Debit);
}

/// Paging accumulates: every page's transactions end up in the history
#[tokio::test]
async fn test_two_provider_pages_are_accumulated() {
    let store =
        InMemoryBankLinkStore::new().with_link(BankLink::new("bank-1", "user-1", "token-1"));
    let provider = Arc::new(
        StaticBankDataProvider::new()
            .with_institution(Institution::new("ins_1", "Bank"))
            .with_accounts("token-1", "ins_1", vec![sample_account("acc-1", Decimal::ONE)])
            .with_transaction_pages(
                "token-1",
                vec![
                    vec![
                        sample_transaction("p1-a", "2024-04-01", Decimal::ONE),
                        sample_transaction("p1-b", "2024-04-03", Decimal::ONE),
                    ],
                    vec![sample_transaction("p2-a", "2024-04-02", Decimal::ONE)],
                ],
            ),
    );

    let detail = TransactionService::new(Arc::new(store), provider.clone(), TIMEOUT)
        .get_account_detail("bank-1")
        .await
        .unwrap();

    let ids: Vec<&str> = detail.transactions.iter().map(|t| t.id.as_str()).collect();
    assert_eq!(ids, vec!["p1-b", "p2-a", "p1-a"]);
    assert_eq!(provider.page_calls(), 2);
}

#[tokio::test]
async fn test_unknown_bank_link_makes_no_provider_calls() {
    let (store, provider) = two_bank_fixture();
    let err = TransactionService::new(store, provider.clone(), TIMEOUT)
        .get_account_detail("bank-404")
        .await
        .unwrap_err();

    assert!(err.is_not_found());
    assert!(err.to_string().contains("bank-404"));
    assert_eq!(provider.total_calls(), 0);
}

#[tokio::test]
async fn test_detail_failure_reaches_caller_as_failed_result() {
    let store =
        InMemoryBankLinkStore::new().with_link(BankLink::new("bank-1", "user-1", "revoked"));
    let provider = StaticBankDataProvider::new();

    let result: OperationResult<_> =
        TransactionService::new(Arc::new(store), Arc::new(provider), TIMEOUT)
            .get_account_detail("bank-1")
            .await
            .into();

    assert!(!result.success);
    assert!(result.error.unwrap().contains("Aggregation failed"));
}

// ============================================================================
// Concurrent Access
// ============================================================================

#[tokio::test]
async fn test_concurrent_dashboard_loads_share_services() {
    let (store, provider) = two_bank_fixture();
    let context = BankdashContext::with_adapters(Config::default(), store, provider.clone());

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let service = context.dashboard_service.clone();
            tokio::spawn(async move { service.load("user-1", None, 1).await })
        })
        .collect();

    for handle in handles {
        let dashboard = handle.await.unwrap().unwrap();
        assert_eq!(dashboard.summary.total_current_balance, Decimal::new(35035, 2));
        assert_eq!(dashboard.selected_bank_link_id.as_deref(), Some("bank-1"));
    }
    // Each load fetches accounts for both links plus the selected link's detail
    assert_eq!(provider.account_calls(), 8 * 3);
}

// ============================================================================
// Context wiring
// ============================================================================

#[tokio::test]
async fn test_demo_context_needs_no_credentials() {
    let mut config = Config::default();
    config.enable_demo_mode();
    let context = BankdashContext::from_config(config).unwrap();

    let summary = context
        .account_service
        .aggregate_accounts(bankdash_core::adapters::demo::DEMO_USER_ID)
        .await
        .unwrap();
    assert_eq!(summary.total_banks, 2);
}

#[test]
fn test_live_context_requires_credentials() {
    let mut config = Config::default();
    config.plaid.client_id = None;
    let err = BankdashContext::from_config(config).err().unwrap();
    assert!(err.to_string().contains("PLAID_CLIENT_ID"));
}
