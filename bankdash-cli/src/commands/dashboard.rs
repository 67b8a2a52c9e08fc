//! Dashboard command - summary plus one account's recent transactions

use anyhow::Result;
use bankdash_core::{Dashboard, OperationResult};
use colored::Colorize;

use super::account::print_detail;
use super::get_context;
use super::summary::print_summary;
use crate::output::{self, NO_DATA_MESSAGE};

pub async fn run(user_id: &str, bank: Option<&str>, page: usize, json: bool) -> Result<()> {
    let ctx = get_context()?;

    // Aggregate here rather than through `load` so a failed summary shows
    // the no-data view while a failed detail still exits non-zero
    let summary = match ctx.account_service.aggregate_accounts(user_id).await {
        Ok(summary) => summary,
        Err(e) if e.is_aggregation_failed() => {
            if json {
                output::print_json(&OperationResult::<Dashboard>::fail(NO_DATA_MESSAGE))?;
            } else {
                output::warning(NO_DATA_MESSAGE);
            }
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    let result = ctx.dashboard_service.compose(summary, bank, page).await;

    if json {
        let failed = result.is_err();
        output::print_json(&OperationResult::from(result))?;
        if failed {
            anyhow::bail!("Failed to load dashboard for {}", user_id);
        }
        return Ok(());
    }

    let dashboard = result?;
    print_summary(&dashboard.summary);

    if let Some(detail) = &dashboard.detail {
        println!();
        println!("{}", "Recent Transactions".bold());
        println!();
        print_detail(detail, dashboard.transactions.page);
    }
    Ok(())
}
