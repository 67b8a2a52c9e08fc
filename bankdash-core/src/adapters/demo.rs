//! Demo data for demo mode
//!
//! Builds in-memory adapters holding one demo user with two bank links:
//! - a checking account at one bank with 60 days of card activity
//! - a savings account at another bank with monthly interest
//! - internal transfers from checking to savings
//!
//! Dates are relative to today so the dashboard always looks current.

use std::sync::Arc;

use chrono::{Duration, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde_json::json;

use crate::adapters::memory::{InMemoryBankLinkStore, StaticBankDataProvider};
use crate::domain::{BankLink, Institution};
use crate::ports::{ProviderAccount, ProviderBalances, ProviderTransaction};

/// User that owns the demo bank links
pub const DEMO_USER_ID: &str = "demo-user";

const CHECKING_LINK_ID: &str = "demo-bank-checking";
const SAVINGS_LINK_ID: &str = "demo-bank-savings";
const CHECKING_TOKEN: &str = "access-demo-checking";
const SAVINGS_TOKEN: &str = "access-demo-savings";

/// Days of provider history generated for the checking account
const HISTORY_DAYS: i64 = 60;

/// Transactions per provider page, so demo mode walks several pages
const PAGE_SIZE: usize = 25;

/// Build the demo store and provider
pub fn demo_adapters() -> (Arc<InMemoryBankLinkStore>, Arc<StaticBankDataProvider>) {
    let today = Utc::now().date_naive();
    (Arc::new(demo_store(today)), Arc::new(demo_provider(today)))
}

fn demo_store(today: NaiveDate) -> InMemoryBankLinkStore {
    let mut store = InMemoryBankLinkStore::new()
        .with_link(
            BankLink::new(CHECKING_LINK_ID, DEMO_USER_ID, CHECKING_TOKEN)
                .with_sharable_id("ZGVtby1jaGVja2luZw"),
        )
        .with_link(
            BankLink::new(SAVINGS_LINK_ID, DEMO_USER_ID, SAVINGS_TOKEN)
                .with_sharable_id("ZGVtby1zYXZpbmdz"),
        );

    // Biweekly transfer to savings
    for (n, days_ago) in (3..HISTORY_DAYS).step_by(14).enumerate() {
        let date = today - Duration::days(days_ago);
        store = store.with_transfer(json!({
            "$id": format!("demo-transfer-{}", n + 1),
            "$createdAt": format!("{}T09:30:00.000+00:00", date),
            "name": "Savings contribution",
            "amount": "250.00",
            "channel": "online",
            "category": "Transfer",
            "senderBankId": CHECKING_LINK_ID,
            "receiverBankId": SAVINGS_LINK_ID
        }));
    }
    store
}

fn demo_provider(today: NaiveDate) -> StaticBankDataProvider {
    let checking_history = generate_checking_history(today);
    let pages: Vec<Vec<ProviderTransaction>> = checking_history
        .chunks(PAGE_SIZE)
        .map(|chunk| chunk.to_vec())
        .collect();

    let interest: Vec<ProviderTransaction> = (0..2)
        .map(|month| {
            let date = today - Duration::days(1 + 30 * month);
            demo_transaction(
                &format!("demo-sav-interest-{}", month + 1),
                "demo-savings-001",
                "Interest Payment",
                Decimal::new(-1842 + month * 37, 2),
                date,
                "other",
                "Interest",
            )
        })
        .collect();

    StaticBankDataProvider::new()
        .with_institution(Institution {
            institution_id: "ins_demo_1".to_string(),
            name: "Platypus Federal Bank".to_string(),
            url: Some("https://platypus.example".to_string()),
            logo: None,
            primary_color: Some("#0b5fff".to_string()),
        })
        .with_institution(Institution {
            institution_id: "ins_demo_2".to_string(),
            name: "Wombat Savings & Loan".to_string(),
            url: Some("https://wombat.example".to_string()),
            logo: None,
            primary_color: Some("#1f8a4c".to_string()),
        })
        .with_accounts(
            CHECKING_TOKEN,
            "ins_demo_1",
            vec![demo_account(
                "demo-checking-001",
                "Everyday Checking",
                "checking",
                "4821",
                Decimal::new(482347, 2),
                Decimal::new(478112, 2),
            )],
        )
        .with_accounts(
            SAVINGS_TOKEN,
            "ins_demo_2",
            vec![demo_account(
                "demo-savings-001",
                "High-Yield Savings",
                "savings",
                "7730",
                Decimal::new(1875000, 2),
                Decimal::new(1875000, 2),
            )],
        )
        .with_transaction_pages(CHECKING_TOKEN, pages)
        .with_transaction_pages(SAVINGS_TOKEN, vec![interest])
}

fn demo_account(
    account_id: &str,
    name: &str,
    subtype: &str,
    mask: &str,
    current: Decimal,
    available: Decimal,
) -> ProviderAccount {
    ProviderAccount {
        account_id: account_id.to_string(),
        balances: ProviderBalances {
            available: Some(available),
            current: Some(current),
            iso_currency_code: Some("USD".to_string()),
        },
        name: name.to_string(),
        official_name: Some(format!("{} Account", name)),
        mask: Some(mask.to_string()),
        account_type: "depository".to_string(),
        subtype: Some(subtype.to_string()),
    }
}

fn demo_transaction(
    transaction_id: &str,
    account_id: &str,
    name: &str,
    amount: Decimal,
    date: NaiveDate,
    channel: &str,
    category: &str,
) -> ProviderTransaction {
    ProviderTransaction {
        transaction_id: transaction_id.to_string(),
        account_id: account_id.to_string(),
        name: name.to_string(),
        amount,
        date: date.format("%Y-%m-%d").to_string(),
        payment_channel: channel.to_string(),
        category: vec![category.to_string()],
        pending: false,
        logo_url: None,
    }
}

/// Card activity for the checking account, oldest first
fn generate_checking_history(today: NaiveDate) -> Vec<ProviderTransaction> {
    // (merchant, base amount in cents, spread in cents, channel, category)
    let merchants = [
        ("Whole Foods", 6400, 4000, "in store", "Groceries"),
        ("Blue Bottle Coffee", 550, 300, "in store", "Food and Drink"),
        ("Shell", 4200, 1800, "in store", "Travel"),
        ("Amazon", 2999, 6000, "online", "Shops"),
        ("Uber", 1850, 1500, "online", "Travel"),
        ("Netflix", 1549, 0, "online", "Service"),
    ];

    let mut rng = SimpleRng::new(42);
    let mut transactions = Vec::new();
    let mut n = 0;

    for days_ago in (0..HISTORY_DAYS).rev() {
        let date = today - Duration::days(days_ago);

        if days_ago % 15 == 0 {
            n += 1;
            transactions.push(demo_transaction(
                &format!("demo-chk-{}", n),
                "demo-checking-001",
                "Acme Corp Payroll",
                Decimal::new(-312500, 2),
                date,
                "other",
                "Payroll",
            ));
        }

        let purchases = (rng.next() * 3.0) as usize;
        for _ in 0..purchases {
            let (merchant, base, spread, channel, category) =
                merchants[(rng.next() * merchants.len() as f64) as usize % merchants.len()];
            let cents = base + (rng.next() * spread as f64) as i64;
            n += 1;
            let mut tx = demo_transaction(
                &format!("demo-chk-{}", n),
                "demo-checking-001",
                merchant,
                Decimal::new(cents, 2),
                date,
                channel,
                category,
            );
            tx.pending = days_ago == 0;
            transactions.push(tx);
        }
    }

    transactions
}

/// Simple deterministic random number generator (LCG)
struct SimpleRng {
    state: u64,
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    fn next(&mut self) -> f64 {
        self.state = self
            .state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        (self.state >> 32) as f64 / u32::MAX as f64
    }
}
