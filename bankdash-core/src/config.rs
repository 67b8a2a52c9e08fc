//! Configuration management
//!
//! Settings live in `settings.json` inside the bankdash directory:
//! ```json
//! {
//!   "app": { "demoMode": false, "requestTimeoutSecs": 30 },
//!   "plaid": { "clientId": "...", "secret": "...", "environment": "sandbox" },
//!   "appwrite": { "endpoint": "https://cloud.appwrite.io/v1", "projectId": "...", ... }
//! }
//! ```
//!
//! Every value can be overridden from the environment, which is how
//! credentials are usually supplied.

use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::domain::result::{Error, Result as DomainResult};

/// Default per-call timeout for external requests
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Raw settings.json structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SettingsFile {
    #[serde(default)]
    app: AppSettings,
    #[serde(default)]
    plaid: PlaidSettings,
    #[serde(default)]
    appwrite: AppwriteSettings,
    #[serde(flatten)]
    other: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AppSettings {
    #[serde(default)]
    demo_mode: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    request_timeout_secs: Option<u64>,
    #[serde(flatten)]
    other: HashMap<String, serde_json::Value>,
}

/// Plaid credentials and environment
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaidSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret: Option<String>,
    /// "sandbox", "development" or "production"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub environment: Option<String>,
    /// Explicit base URL, wins over `environment` (used for testing)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

impl PlaidSettings {
    /// Resolve the API base URL from `base_url` or `environment`
    pub fn resolved_base_url(&self) -> DomainResult<String> {
        if let Some(url) = self.base_url.as_deref().filter(|u| !u.trim().is_empty()) {
            return Ok(url.trim().to_string());
        }
        match self
            .environment
            .as_deref()
            .map(|e| e.trim().to_lowercase())
            .as_deref()
        {
            None | Some("") | Some("sandbox") => Ok("https://sandbox.plaid.com".to_string()),
            Some("development") => Ok("https://development.plaid.com".to_string()),
            Some("production") => Ok("https://production.plaid.com".to_string()),
            Some(other) => Err(Error::Config(format!(
                "Unknown Plaid environment '{}'. Expected sandbox, development or production",
                other
            ))),
        }
    }
}

/// Appwrite project and collection identifiers
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppwriteSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bank_collection_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_collection_id: Option<String>,
}

/// bankdash configuration (simplified view of settings)
#[derive(Debug, Clone)]
pub struct Config {
    pub demo_mode: bool,
    pub request_timeout: Duration,
    pub plaid: PlaidSettings,
    pub appwrite: AppwriteSettings,
    // Keep the raw settings for preservation when saving
    _raw_settings: SettingsFile,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            demo_mode: false,
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            plaid: PlaidSettings::default(),
            appwrite: AppwriteSettings::default(),
            _raw_settings: SettingsFile::default(),
        }
    }
}

impl Config {
    /// Load config from the bankdash directory, then apply environment overrides
    pub fn load(config_dir: &Path) -> Result<Self> {
        let raw = read_settings(config_dir)?;

        let demo_mode = match env_override("BANKDASH_DEMO_MODE").as_deref() {
            Some("true" | "1" | "yes" | "TRUE" | "YES") => true,
            Some("false" | "0" | "no" | "FALSE" | "NO") => false,
            _ => raw.app.demo_mode,
        };

        let timeout_secs = env_override("BANKDASH_REQUEST_TIMEOUT_SECS")
            .and_then(|v| v.parse::<u64>().ok())
            .or(raw.app.request_timeout_secs)
            .filter(|secs| *secs > 0)
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS);

        let mut plaid = raw.plaid.clone();
        override_field(&mut plaid.client_id, "PLAID_CLIENT_ID");
        override_field(&mut plaid.secret, "PLAID_SECRET");
        override_field(&mut plaid.environment, "PLAID_ENV");
        override_field(&mut plaid.base_url, "PLAID_BASE_URL");

        let mut appwrite = raw.appwrite.clone();
        override_field(&mut appwrite.endpoint, "APPWRITE_ENDPOINT");
        override_field(&mut appwrite.project_id, "APPWRITE_PROJECT_ID");
        override_field(&mut appwrite.api_key, "APPWRITE_API_KEY");
        override_field(&mut appwrite.database_id, "APPWRITE_DATABASE_ID");
        override_field(&mut appwrite.bank_collection_id, "APPWRITE_BANK_COLLECTION_ID");
        override_field(
            &mut appwrite.transaction_collection_id,
            "APPWRITE_TRANSACTION_COLLECTION_ID",
        );

        Ok(Self {
            demo_mode,
            request_timeout: Duration::from_secs(timeout_secs),
            plaid,
            appwrite,
            _raw_settings: raw,
        })
    }

    /// Save the demo flag to the bankdash directory.
    ///
    /// Only the fields the CLI manages are written; everything else in
    /// settings.json (including credentials and unknown keys) is preserved.
    pub fn save(&self, config_dir: &Path) -> Result<()> {
        let settings_path = config_dir.join("settings.json");

        let mut settings = read_settings(config_dir)?;
        settings.app.demo_mode = self.demo_mode;

        let content = serde_json::to_string_pretty(&settings)?;
        std::fs::write(&settings_path, content)?;
        Ok(())
    }

    /// Enable demo mode
    pub fn enable_demo_mode(&mut self) {
        self.demo_mode = true;
    }

    /// Disable demo mode
    pub fn disable_demo_mode(&mut self) {
        self.demo_mode = false;
    }
}

/// Read settings.json; a missing or unparseable file yields defaults
fn read_settings(config_dir: &Path) -> Result<SettingsFile> {
    let settings_path = config_dir.join("settings.json");
    if settings_path.exists() {
        let content = std::fs::read_to_string(&settings_path)?;
        Ok(serde_json::from_str(&content).unwrap_or_default())
    } else {
        Ok(SettingsFile::default())
    }
}

fn env_override(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn override_field(field: &mut Option<String>, env_name: &str) {
    if let Some(value) = env_override(env_name) {
        *field = Some(value);
    }
}

/// Require an optional setting, naming both the settings key and env var
pub fn require(value: &Option<String>, key: &str, env_name: &str) -> DomainResult<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .ok_or_else(|| {
            Error::Config(format!(
                "{} is not configured. Set it in settings.json or via {}",
                key, env_name
            ))
        })
}
