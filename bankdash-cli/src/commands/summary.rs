//! Summary command - all linked accounts and the total balance

use anyhow::Result;
use bankdash_core::{AggregateSummary, OperationResult};
use colored::Colorize;
use comfy_table::{Cell, CellAlignment};

use super::get_context;
use crate::output::{self, format_money, NO_DATA_MESSAGE};

pub async fn run(user_id: &str, json: bool) -> Result<()> {
    let ctx = get_context()?;

    let summary = match ctx.account_service.aggregate_accounts(user_id).await {
        Ok(summary) => summary,
        // Already logged by the service; the summary view degrades to "no data"
        Err(e) if e.is_aggregation_failed() => {
            if json {
                output::print_json(&OperationResult::<AggregateSummary>::fail(NO_DATA_MESSAGE))?;
            } else {
                output::warning(NO_DATA_MESSAGE);
            }
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    if json {
        return output::print_json(&OperationResult::ok(summary));
    }

    print_summary(&summary);
    Ok(())
}

/// Render the accounts table and totals
pub fn print_summary(summary: &AggregateSummary) {
    if summary.is_empty() {
        output::info("No bank accounts linked yet.");
        return;
    }

    println!("{}", "Linked Accounts".bold());
    println!();

    let mut table = output::create_table();
    table.set_header(vec!["Bank Link", "Institution", "Account", "Type", "Available", "Current"]);

    for account in &summary.accounts {
        let available = account
            .available_balance
            .map(format_money)
            .unwrap_or_else(|| "-".to_string());
        table.add_row(vec![
            Cell::new(&account.bank_link_id),
            Cell::new(&account.institution_name),
            Cell::new(format!("{} ({})", account.display_name(), account.mask)),
            Cell::new(format!("{}/{}", account.account_type, account.subtype)),
            Cell::new(available).set_alignment(CellAlignment::Right),
            Cell::new(format_money(account.current_balance)).set_alignment(CellAlignment::Right),
        ]);
    }

    println!("{}", table);
    println!();
    println!(
        "{} {}   {} {}",
        "Total banks:".bold(),
        summary.total_banks,
        "Total current balance:".bold(),
        format_money(summary.total_current_balance).green()
    );
}
