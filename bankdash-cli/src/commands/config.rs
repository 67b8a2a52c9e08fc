//! Config command - show the resolved configuration

use anyhow::Result;
use bankdash_core::config::{Config, PlaidSettings};
use colored::Colorize;
use serde_json::json;

use super::get_bankdash_dir;
use crate::output::{self, mask_secret};

pub fn run(json: bool) -> Result<()> {
    let bankdash_dir = get_bankdash_dir()?;
    let config = Config::load(&bankdash_dir)?;

    let plaid_url = plaid_url(&config.plaid);
    let view = json!({
        "directory": bankdash_dir.display().to_string(),
        "demoMode": config.demo_mode,
        "requestTimeoutSecs": config.request_timeout.as_secs(),
        "plaid": {
            "clientId": config.plaid.client_id,
            "secret": mask_secret(config.plaid.secret.as_deref()),
            "baseUrl": plaid_url,
        },
        "appwrite": {
            "endpoint": config.appwrite.endpoint,
            "projectId": config.appwrite.project_id,
            "apiKey": mask_secret(config.appwrite.api_key.as_deref()),
            "databaseId": config.appwrite.database_id,
            "bankCollectionId": config.appwrite.bank_collection_id,
            "transactionCollectionId": config.appwrite.transaction_collection_id,
        }
    });

    if json {
        return output::print_json(&view);
    }

    let unset = || "(not set)".to_string();
    let mut table = output::create_table();
    table.set_header(vec!["Setting", "Value"]);
    table.add_row(vec!["Directory".to_string(), bankdash_dir.display().to_string()]);
    table.add_row(vec!["Demo mode".to_string(), config.demo_mode.to_string()]);
    table.add_row(vec![
        "Request timeout".to_string(),
        format!("{}s", config.request_timeout.as_secs()),
    ]);
    table.add_row(vec![
        "Plaid client id".to_string(),
        config.plaid.client_id.clone().unwrap_or_else(unset),
    ]);
    table.add_row(vec!["Plaid secret".to_string(), mask_secret(config.plaid.secret.as_deref())]);
    table.add_row(vec!["Plaid base URL".to_string(), plaid_url]);
    table.add_row(vec![
        "Appwrite endpoint".to_string(),
        config.appwrite.endpoint.clone().unwrap_or_else(unset),
    ]);
    table.add_row(vec![
        "Appwrite project".to_string(),
        config.appwrite.project_id.clone().unwrap_or_else(unset),
    ]);
    table.add_row(vec![
        "Appwrite API key".to_string(),
        mask_secret(config.appwrite.api_key.as_deref()),
    ]);
    table.add_row(vec![
        "Appwrite database".to_string(),
        config.appwrite.database_id.clone().unwrap_or_else(unset),
    ]);
    table.add_row(vec![
        "Bank collection".to_string(),
        config.appwrite.bank_collection_id.clone().unwrap_or_else(unset),
    ]);
    table.add_row(vec![
        "Transfer collection".to_string(),
        config.appwrite.transaction_collection_id.clone().unwrap_or_else(unset),
    ]);

    println!("{}", "Configuration".bold());
    println!("{}", table);
    if config.demo_mode {
        output::success("Demo mode is on; credentials are not used.");
    }
    Ok(())
}

/// Resolved Plaid URL, or the reason it cannot be resolved
fn plaid_url(settings: &PlaidSettings) -> String {
    settings
        .resolved_base_url()
        .unwrap_or_else(|e| format!("invalid: {}", e))
}
