//! CLI command implementations

pub mod account;
pub mod config;
pub mod dashboard;
pub mod demo;
pub mod summary;

use std::path::PathBuf;

use anyhow::{Context, Result};
use bankdash_core::BankdashContext;
use tracing::debug;

/// Get the bankdash directory from environment or default
pub fn get_bankdash_dir() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var("BANKDASH_DIR") {
        return Ok(PathBuf::from(dir));
    }
    dirs::home_dir()
        .map(|home| home.join(".bankdash"))
        .context("Could not find home directory; set BANKDASH_DIR")
}

/// Build the bankdash context from the bankdash directory
pub fn get_context() -> Result<BankdashContext> {
    let bankdash_dir = get_bankdash_dir()?;
    debug!(dir = %bankdash_dir.display(), "loading bankdash context");
    BankdashContext::new(&bankdash_dir).context("Failed to initialize bankdash context")
}
