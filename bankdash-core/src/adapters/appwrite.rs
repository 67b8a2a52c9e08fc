//! Appwrite document store client
//!
//! Implements the bank link store port over Appwrite's Databases REST API.
//! Bank links and transfers live in two collections of one database; lookups
//! are `GET .../documents` filtered with JSON `queries[]`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::{json, Value as JsonValue};
use tracing::debug;
use url::Url;

use crate::config::{require, AppwriteSettings};
use crate::domain::result::{Error as DomainError, Result as DomainResult};
use crate::domain::BankLink;
use crate::ports::{BankLinkStore, TransferDocuments};

/// Documents requested per list page
const LIST_LIMIT: usize = 100;

/// Longest document id Appwrite accepts
const MAX_DOCUMENT_ID_LEN: usize = 36;

/// Bank document as stored in the bank collection
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BankDocument {
    #[serde(rename = "$id")]
    id: String,
    user_id: String,
    access_token: String,
    #[serde(default)]
    sharable_id: Option<String>,
    #[serde(default)]
    account_id: Option<String>,
    #[serde(default)]
    bank_id: Option<String>,
    #[serde(default)]
    funding_source_url: Option<String>,
}

impl From<BankDocument> for BankLink {
    fn from(doc: BankDocument) -> Self {
        BankLink {
            id: doc.id,
            user_id: doc.user_id,
            access_token: doc.access_token,
            sharable_id: doc.sharable_id,
            account_id: doc.account_id,
            bank_id: doc.bank_id,
            funding_source_url: doc.funding_source_url,
        }
    }
}

/// `equal` filter in Appwrite's JSON query syntax
fn equal_query(attribute: &str, value: &str) -> String {
    json!({"method": "equal", "attribute": attribute, "values": [value]}).to_string()
}

fn limit_query(limit: usize) -> String {
    json!({"method": "limit", "values": [limit]}).to_string()
}

fn cursor_after_query(document_id: &str) -> String {
    json!({"method": "cursorAfter", "values": [document_id]}).to_string()
}

/// Appwrite ids are at most 36 characters of `[A-Za-z0-9._-]` and cannot
/// start with a special character.
fn is_valid_document_id(id: &str) -> bool {
    let mut chars = id.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphanumeric() => {}
        _ => return false,
    }
    id.len() <= MAX_DOCUMENT_ID_LEN
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
}

/// Appwrite REST client bound to one database
#[derive(Debug, Clone)]
pub struct AppwriteClient {
    client: Client,
    endpoint: Url,
    project_id: String,
    api_key: String,
    database_id: String,
    bank_collection_id: String,
    transaction_collection_id: String,
}

impl AppwriteClient {
    /// Create a client from settings; every identifier is required
    pub fn from_settings(settings: &AppwriteSettings, timeout: Duration) -> DomainResult<Self> {
        let endpoint = require(&settings.endpoint, "appwrite.endpoint", "APPWRITE_ENDPOINT")?;
        let project_id = require(
            &settings.project_id,
            "appwrite.projectId",
            "APPWRITE_PROJECT_ID",
        )?;
        let api_key = require(&settings.api_key, "appwrite.apiKey", "APPWRITE_API_KEY")?;
        let database_id = require(
            &settings.database_id,
            "appwrite.databaseId",
            "APPWRITE_DATABASE_ID",
        )?;
        let bank_collection_id = require(
            &settings.bank_collection_id,
            "appwrite.bankCollectionId",
            "APPWRITE_BANK_COLLECTION_ID",
        )?;
        let transaction_collection_id = require(
            &settings.transaction_collection_id,
            "appwrite.transactionCollectionId",
            "APPWRITE_TRANSACTION_COLLECTION_ID",
        )?;

        let endpoint = Url::parse(&endpoint)
            .map_err(|e| DomainError::Config(format!("Invalid Appwrite endpoint: {}", e)))?;
        if endpoint.cannot_be_a_base() {
            return Err(DomainError::Config(format!(
                "Invalid Appwrite endpoint: {}",
                endpoint
            )));
        }

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DomainError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint,
            project_id,
            api_key,
            database_id,
            bank_collection_id,
            transaction_collection_id,
        })
    }

    /// `{endpoint}/databases/{db}/collections/{collection}/documents[/{id}]`
    /// with every segment percent-encoded
    fn documents_url(&self, collection_id: &str, document_id: Option<&str>) -> DomainResult<Url> {
        let mut url = self.endpoint.clone();
        {
            let mut segments = url.path_segments_mut().map_err(|_| {
                DomainError::Config(format!("Invalid Appwrite endpoint: {}", self.endpoint))
            })?;
            segments.pop_if_empty().extend([
                "databases",
                self.database_id.as_str(),
                "collections",
                collection_id,
                "documents",
            ]);
            if let Some(id) = document_id {
                segments.push(id);
            }
        }
        Ok(url)
    }

    /// GET a URL with project credentials. `Ok(None)` means HTTP 404.
    async fn get_json(&self, url: Url, queries: &[String]) -> DomainResult<Option<JsonValue>> {
        let params: Vec<(&str, &str)> =
            queries.iter().map(|q| ("queries[]", q.as_str())).collect();

        let response = self
            .client
            .get(url)
            .header("X-Appwrite-Project", &self.project_id)
            .header("X-Appwrite-Key", &self.api_key)
            .query(&params)
            .send()
            .await
            .map_err(map_request_error)?;

        match response.status() {
            StatusCode::NOT_FOUND => Ok(None),
            status if status.is_success() => {
                response.json::<JsonValue>().await.map(Some).map_err(|e| {
                    DomainError::upstream(format!("Failed to parse Appwrite response: {}", e))
                })
            }
            status => {
                let text = response.text().await.unwrap_or_default();
                Err(map_status_error(status.as_u16(), &text))
            }
        }
    }

    /// Every document matching `filter`, following `cursorAfter` pages until
    /// the reported `total` is collected.
    ///
    /// The first page's `documents` value is returned untouched when it is
    /// not a list, so callers see exactly what the store sent.
    async fn list_documents(&self, collection_id: &str, filter: &str) -> DomainResult<JsonValue> {
        let mut collected: Vec<JsonValue> = Vec::new();
        let mut cursor: Option<String> = None;

        loop {
            let mut queries = vec![filter.to_string(), limit_query(LIST_LIMIT)];
            if let Some(after) = &cursor {
                queries.push(cursor_after_query(after));
            }

            let url = self.documents_url(collection_id, None)?;
            let body = self.get_json(url, &queries).await?.ok_or_else(|| {
                DomainError::upstream(format!("Appwrite collection {} not found", collection_id))
            })?;

            let page = match body.get("documents") {
                Some(JsonValue::Array(documents)) => documents.clone(),
                other if cursor.is_none() => return Ok(other.cloned().unwrap_or(JsonValue::Null)),
                _ => {
                    return Err(DomainError::upstream(format!(
                        "Appwrite returned a malformed page of collection {}",
                        collection_id
                    )))
                }
            };
            let total = body.get("total").and_then(JsonValue::as_u64);
            let fetched = page.len();
            let last_id = page
                .last()
                .and_then(|doc| doc.get("$id"))
                .and_then(JsonValue::as_str)
                .map(str::to_string);
            collected.extend(page);

            let complete = match total {
                Some(total) => collected.len() as u64 >= total,
                None => fetched < LIST_LIMIT,
            };
            if complete || fetched == 0 {
                break;
            }

            match last_id {
                Some(id) if cursor.as_deref() != Some(id.as_str()) => cursor = Some(id),
                _ => {
                    return Err(DomainError::upstream(format!(
                        "Appwrite listed {} of {} documents in {} without a usable cursor",
                        collected.len(),
                        total.map_or_else(|| "more".to_string(), |t| t.to_string()),
                        collection_id
                    )))
                }
            }
        }

        debug!(collection_id, documents = collected.len(), "listed documents");
        Ok(JsonValue::Array(collected))
    }
}

fn map_request_error(error: reqwest::Error) -> DomainError {
    if error.is_timeout() {
        DomainError::upstream("Appwrite request timed out")
    } else if error.is_connect() {
        DomainError::upstream("Unable to connect to Appwrite")
    } else {
        DomainError::upstream(format!("Appwrite request failed: {}", error))
    }
}

fn map_status_error(status: u16, body: &str) -> DomainError {
    let message = serde_json::from_str::<JsonValue>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(str::to_string));
    match (status, message) {
        (401, _) => DomainError::upstream(
            "Appwrite authentication failed. Check the project id and API key.",
        ),
        (_, Some(message)) => {
            DomainError::upstream(format!("Appwrite error (HTTP {}): {}", status, message))
        }
        (_, None) => DomainError::upstream(format!("Appwrite error: HTTP {}", status)),
    }
}

#[async_trait]
impl BankLinkStore for AppwriteClient {
    async fn list_bank_links(&self, user_id: &str) -> DomainResult<Vec<BankLink>> {
        let filter = equal_query("userId", user_id);
        let documents = match self.list_documents(&self.bank_collection_id, &filter).await? {
            JsonValue::Null => Vec::new(),
            documents => serde_json::from_value::<Vec<BankDocument>>(documents)
                .map_err(|e| DomainError::upstream(format!("Invalid bank document: {}", e)))?,
        };

        debug!(user_id, banks = documents.len(), "listed bank documents");
        Ok(documents.into_iter().map(Into::into).collect())
    }

    async fn get_bank_link(&self, id: &str) -> DomainResult<Option<BankLink>> {
        if !is_valid_document_id(id) {
            debug!(id, "not a valid Appwrite document id");
            return Ok(None);
        }

        let url = self.documents_url(&self.bank_collection_id, Some(id))?;
        match self.get_json(url, &[]).await? {
            None => Ok(None),
            Some(doc) => serde_json::from_value::<BankDocument>(doc)
                .map(|d| Some(d.into()))
                .map_err(|e| DomainError::upstream(format!("Invalid bank document {}: {}", id, e))),
        }
    }

    async fn list_transfers(&self, bank_link_id: &str) -> DomainResult<TransferDocuments> {
        let sent_filter = equal_query("senderBankId", bank_link_id);
        let received_filter = equal_query("receiverBankId", bank_link_id);

        let (sent, received) = tokio::try_join!(
            self.list_documents(&self.transaction_collection_id, &sent_filter),
            self.list_documents(&self.transaction_collection_id, &received_filter),
        )?;
        Ok(TransferDocuments { sent, received })
    }
}
