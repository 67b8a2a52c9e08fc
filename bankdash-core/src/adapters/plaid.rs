//! Plaid API client
//!
//! Implements the bank-data provider port against Plaid's REST API. Every
//! endpoint is a JSON POST carrying `client_id` and `secret` in the body.
//!
//! API Documentation: https://plaid.com/docs/api/

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::{require, PlaidSettings};
use crate::domain::result::{Error as DomainError, Result as DomainResult};
use crate::domain::Institution;
use crate::ports::{
    BankDataProvider, ProviderAccount, ProviderAccounts, ProviderBalances, ProviderTransaction,
    TransactionPage,
};
use crate::serde_util::{deserialize_amount, deserialize_optional_amount};

/// Institutions are looked up in this country
const COUNTRY_CODES: [&str; 1] = ["US"];

// =============================================================================
// API Response Models (matching Plaid API)
// =============================================================================

#[derive(Debug, Clone, Deserialize)]
struct AccountsGetResponse {
    accounts: Vec<PlaidAccount>,
    item: PlaidItem,
}

#[derive(Debug, Clone, Deserialize)]
struct PlaidItem {
    #[serde(default)]
    institution_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct PlaidAccount {
    account_id: String,
    balances: PlaidBalances,
    name: String,
    #[serde(default)]
    official_name: Option<String>,
    #[serde(default)]
    mask: Option<String>,
    #[serde(rename = "type")]
    account_type: String,
    #[serde(default)]
    subtype: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct PlaidBalances {
    #[serde(default, deserialize_with = "deserialize_optional_amount")]
    available: Option<Decimal>,
    #[serde(default, deserialize_with = "deserialize_optional_amount")]
    current: Option<Decimal>,
    #[serde(default)]
    iso_currency_code: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct InstitutionResponse {
    institution: PlaidInstitution,
}

#[derive(Debug, Clone, Deserialize)]
struct PlaidInstitution {
    institution_id: String,
    name: String,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    logo: Option<String>,
    #[serde(default)]
    primary_color: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct TransactionsSyncResponse {
    #[serde(default)]
    added: Vec<PlaidTransaction>,
    #[serde(default)]
    has_more: bool,
    #[serde(default)]
    next_cursor: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct PlaidTransaction {
    transaction_id: String,
    account_id: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(deserialize_with = "deserialize_amount")]
    amount: Decimal,
    date: String,
    #[serde(default)]
    payment_channel: Option<String>,
    /// Legacy category hierarchy; null for newer items
    #[serde(default)]
    category: Option<Vec<String>>,
    #[serde(default)]
    pending: bool,
    #[serde(default)]
    logo_url: Option<String>,
}

/// Error body Plaid returns with non-2xx statuses
#[derive(Debug, Clone, Deserialize)]
struct PlaidErrorBody {
    #[serde(default)]
    error_code: Option<String>,
    #[serde(default)]
    error_message: Option<String>,
}

#[derive(Serialize)]
struct Credentials<'a> {
    client_id: &'a str,
    secret: &'a str,
}

#[derive(Serialize)]
struct AccountsGetRequest<'a> {
    #[serde(flatten)]
    credentials: Credentials<'a>,
    access_token: &'a str,
}

#[derive(Serialize)]
struct InstitutionGetRequest<'a> {
    #[serde(flatten)]
    credentials: Credentials<'a>,
    institution_id: &'a str,
    country_codes: &'a [&'a str],
}

#[derive(Serialize)]
struct TransactionsSyncRequest<'a> {
    #[serde(flatten)]
    credentials: Credentials<'a>,
    access_token: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    cursor: Option<&'a str>,
}

// =============================================================================
// Plaid HTTP Client
// =============================================================================

/// Plaid API client
#[derive(Debug, Clone)]
pub struct PlaidClient {
    client: Client,
    client_id: String,
    secret: String,
    base_url: String,
}

impl PlaidClient {
    /// Create a client for `base_url` with the given credentials.
    pub fn new(
        client_id: &str,
        secret: &str,
        base_url: &str,
        timeout: Duration,
    ) -> DomainResult<Self> {
        if client_id.trim().is_empty() || secret.trim().is_empty() {
            return Err(DomainError::Config(
                "Plaid client id and secret cannot be empty".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DomainError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            client_id: client_id.to_string(),
            secret: secret.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Create a client from settings; missing credentials are a config error
    pub fn from_settings(settings: &PlaidSettings, timeout: Duration) -> DomainResult<Self> {
        let client_id = require(&settings.client_id, "plaid.clientId", "PLAID_CLIENT_ID")?;
        let secret = require(&settings.secret, "plaid.secret", "PLAID_SECRET")?;
        let base_url = settings.resolved_base_url()?;
        Self::new(&client_id, &secret, &base_url, timeout)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn credentials(&self) -> Credentials<'_> {
        Credentials {
            client_id: &self.client_id,
            secret: &self.secret,
        }
    }

    /// POST a JSON request and decode the JSON response
    async fn post<B: Serialize, T: DeserializeOwned>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> DomainResult<T> {
        let url = format!("{}{}", self.base_url, endpoint);
        debug!(endpoint, "plaid request");

        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(map_request_error)?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(map_status_error(status.as_u16(), &text));
        }

        response.json::<T>().await.map_err(|e| {
            DomainError::upstream(format!("Failed to parse Plaid {} response: {}", endpoint, e))
        })
    }
}

/// Map request errors to user-friendly messages
fn map_request_error(error: reqwest::Error) -> DomainError {
    if error.is_timeout() {
        DomainError::upstream("Plaid request timed out")
    } else if error.is_connect() {
        DomainError::upstream("Unable to connect to Plaid servers")
    } else {
        DomainError::upstream(format!("Plaid request failed: {}", error))
    }
}

/// Turn a non-2xx response into an upstream error, keeping Plaid's error code
fn map_status_error(status: u16, body: &str) -> DomainError {
    let detail = serde_json::from_str::<PlaidErrorBody>(body)
        .ok()
        .and_then(|e| match (e.error_code, e.error_message) {
            (Some(code), Some(message)) => Some(format!("{}: {}", code, message)),
            (Some(code), None) => Some(code),
            (None, Some(message)) => Some(message),
            (None, None) => None,
        });

    match (status, detail) {
        (429, _) => DomainError::upstream(
            "Plaid rate limit exceeded. Please wait a moment and try again.",
        ),
        (_, Some(detail)) => {
            DomainError::upstream(format!("Plaid API error (HTTP {}): {}", status, detail))
        }
        (_, None) => DomainError::upstream(format!("Plaid API error: HTTP {}", status)),
    }
}

impl From<PlaidAccount> for ProviderAccount {
    fn from(account: PlaidAccount) -> Self {
        ProviderAccount {
            account_id: account.account_id,
            balances: ProviderBalances {
                available: account.balances.available,
                current: account.balances.current,
                iso_currency_code: account.balances.iso_currency_code,
            },
            name: account.name,
            official_name: account.official_name,
            mask: account.mask,
            account_type: account.account_type,
            subtype: account.subtype,
        }
    }
}

impl From<PlaidTransaction> for ProviderTransaction {
    fn from(tx: PlaidTransaction) -> Self {
        ProviderTransaction {
            transaction_id: tx.transaction_id,
            account_id: tx.account_id,
            name: tx.name.unwrap_or_default(),
            amount: tx.amount,
            date: tx.date,
            payment_channel: tx.payment_channel.unwrap_or_default(),
            category: tx.category.unwrap_or_default(),
            pending: tx.pending,
            logo_url: tx.logo_url,
        }
    }
}

#[async_trait]
impl BankDataProvider for PlaidClient {
    fn name(&self) -> &str {
        "plaid"
    }

    async fn fetch_accounts(&self, access_token: &str) -> DomainResult<ProviderAccounts> {
        let response: AccountsGetResponse = self
            .post(
                "/accounts/get",
                &AccountsGetRequest {
                    credentials: self.credentials(),
                    access_token,
                },
            )
            .await?;

        Ok(ProviderAccounts {
            accounts: response.accounts.into_iter().map(Into::into).collect(),
            institution_id: response.item.institution_id,
        })
    }

    async fn fetch_institution(&self, institution_id: &str) -> DomainResult<Institution> {
        let response: InstitutionResponse = self
            .post(
                "/institutions/get_by_id",
                &InstitutionGetRequest {
                    credentials: self.credentials(),
                    institution_id,
                    country_codes: &COUNTRY_CODES,
                },
            )
            .await?;

        let institution = response.institution;
        Ok(Institution {
            institution_id: institution.institution_id,
            name: institution.name,
            url: institution.url,
            logo: institution.logo,
            primary_color: institution.primary_color,
        })
    }

    async fn fetch_transaction_page(
        &self,
        access_token: &str,
        cursor: Option<&str>,
    ) -> DomainResult<TransactionPage> {
        let response: TransactionsSyncResponse = self
            .post(
                "/transactions/sync",
                &TransactionsSyncRequest {
                    credentials: self.credentials(),
                    access_token,
                    cursor,
                },
            )
            .await?;

        Ok(TransactionPage {
            added: response.added.into_iter().map(Into::into).collect(),
            has_more: response.has_more,
            next_cursor: response.next_cursor,
        })
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::adapters::mock_server::{MockResponse, MockServer};

    const TIMEOUT: Duration = Duration::from_secs(5);

    fn plaid_mock() -> MockServer {
        MockServer::start(|req| {
            let body = req.body_json();
            if body["secret"] != "test-secret" {
                return MockResponse::json(
                    400,
                    json!({
                        "error_type": "INVALID_INPUT",
                        "error_code": "INVALID_API_KEYS",
                        "error_message": "invalid client_id or secret provided"
                    }),
                );
            }
            match req.path_without_query() {
                "/accounts/get" => MockResponse::json(
                    200,
                    json!({
                        "accounts": [{
                            "account_id": "acc-1",
                            "balances": {
                                "available": 100,
                                "current": 110.5,
                                "iso_currency_code": "USD"
                            },
                            "name": "Plaid Checking",
                            "official_name": null,
                            "mask": "0000",
                            "type": "depository",
                            "subtype": "checking"
                        }],
                        "item": {"institution_id": "ins_109508"}
                    }),
                ),
                "/institutions/get_by_id" => MockResponse::json(
                    200,
                    json!({
                        "institution": {
                            "institution_id": body["institution_id"],
                            "name": "First Platypus Bank",
                            "country_codes": body["country_codes"]
                        }
                    }),
                ),
                "/transactions/sync" => {
                    let second = body["cursor"] == "c1";
                    let (id, next) = if second { ("tx-2", "c2") } else { ("tx-1", "c1") };
                    MockResponse::json(
                        200,
                        json!({
                            "added": [{
                                "transaction_id": id,
                                "account_id": "acc-1",
                                "name": "Uber",
                                "amount": "6.33",
                                "date": "2024-05-01",
                                "payment_channel": "online",
                                "category": null,
                                "pending": false,
                                "logo_url": null
                            }],
                            "has_more": !second,
                            "next_cursor": next
                        }),
                    )
                }
                _ => MockResponse::json(404, json!({"error_code": "NOT_FOUND"})),
            }
        })
        .unwrap()
    }

    fn client(server: &MockServer, secret: &str) -> PlaidClient {
        PlaidClient::new("test-client", secret, &server.base_url(), TIMEOUT).unwrap()
    }

    #[test]
    fn test_reject_empty_credentials() {
        assert!(PlaidClient::new("", "secret", "http://localhost", TIMEOUT).is_err());
        assert!(PlaidClient::new("id", "  ", "http://localhost", TIMEOUT).is_err());
    }

    #[test]
    fn test_from_settings_requires_credentials() {
        let err = PlaidClient::from_settings(&PlaidSettings::default(), TIMEOUT).unwrap_err();
        assert!(err.to_string().contains("PLAID_CLIENT_ID"));
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client =
            PlaidClient::new("id", "secret", "https://sandbox.plaid.com/", TIMEOUT).unwrap();
        assert_eq!(client.base_url(), "https://sandbox.plaid.com");
    }

    #[tokio::test]
    async fn test_fetch_accounts() {
        let server = plaid_mock();
        let accounts = client(&server, "test-secret").fetch_accounts("access-1").await.unwrap();

        assert_eq!(accounts.institution_id.as_deref(), Some("ins_109508"));
        assert_eq!(accounts.accounts.len(), 1);
        assert_eq!(accounts.accounts[0].balances.current, Some(Decimal::new(1105, 1)));
        assert_eq!(accounts.accounts[0].account_type, "depository");

        let body = server.requests()[0].body_json();
        assert_eq!(body["client_id"], "test-client");
        assert_eq!(body["access_token"], "access-1");
    }

    #[tokio::test]
    async fn test_fetch_institution_sends_country_codes() {
        let server = plaid_mock();
        let institution = client(&server, "test-secret")
            .fetch_institution("ins_109508")
            .await
            .unwrap();

        assert_eq!(institution.name, "First Platypus Bank");
        assert_eq!(server.requests()[0].body_json()["country_codes"], json!(["US"]));
    }

    #[tokio::test]
    async fn test_transaction_pages_carry_cursor() {
        let server = plaid_mock();
        let plaid = client(&server, "test-secret");

        let first = plaid.fetch_transaction_page("access-1", None).await.unwrap();
        assert!(first.has_more);
        assert_eq!(first.added[0].amount, Decimal::new(633, 2));
        assert!(first.added[0].category.is_empty());

        let second = plaid
            .fetch_transaction_page("access-1", first.next_cursor.as_deref())
            .await
            .unwrap();
        assert!(!second.has_more);
        assert_eq!(second.added[0].transaction_id, "tx-2");

        let requests = server.requests();
        assert!(requests[0].body_json().get("cursor").is_none());
        assert_eq!(requests[1].body_json()["cursor"], "c1");
    }

    #[tokio::test]
    async fn test_api_error_keeps_plaid_code() {
        let server = plaid_mock();
        let err = client(&server, "wrong").fetch_accounts("access-1").await.unwrap_err();

        assert!(matches!(err, DomainError::UpstreamFetch(_)));
        assert!(err.to_string().contains("INVALID_API_KEYS"));
    }

    #[test]
    fn test_rate_limit_message() {
        let err = map_status_error(429, "");
        assert!(err.to_string().contains("rate limit"));
        let err = map_status_error(500, "<html>");
        assert!(err.to_string().contains("HTTP 500"));
    }
}
