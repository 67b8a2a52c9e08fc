//! Account command - one account with its merged transaction history

use anyhow::Result;
use bankdash_core::domain::page::DEFAULT_PER_PAGE;
use bankdash_core::domain::paginate;
use bankdash_core::{AccountDetail, AccountSnapshot, OperationResult};
use colored::Colorize;

use super::get_context;
use crate::output::{self, format_money};

pub async fn run(bank_link_id: &str, page: usize, json: bool) -> Result<()> {
    let ctx = get_context()?;
    let result = ctx.transaction_service.get_account_detail(bank_link_id).await;

    if json {
        let failed = result.is_err();
        output::print_json(&OperationResult::from(result))?;
        if failed {
            anyhow::bail!("Failed to load account {}", bank_link_id);
        }
        return Ok(());
    }

    let detail = result?;
    print_detail(&detail, page);
    Ok(())
}

/// Render the account header and one page of its transactions
pub fn print_detail(detail: &AccountDetail, page: usize) {
    print_account_header(&detail.account);

    let page = paginate(&detail.transactions, page, DEFAULT_PER_PAGE);
    if page.items.is_empty() {
        output::info("No transactions yet.");
        return;
    }

    println!("{}", output::transactions_table(&page));
    println!("{}", output::page_footer(&page).dimmed());
}

fn print_account_header(account: &AccountSnapshot) {
    println!("{}", account.display_name().bold());
    println!("{}  {}", account.institution_name, account.masked_number());

    let available = account
        .available_balance
        .map(format_money)
        .unwrap_or_else(|| "-".to_string());
    println!(
        "Current balance: {}   Available: {}",
        format_money(account.current_balance).green(),
        available
    );
    if let Some(sharable_id) = &account.sharable_id {
        println!("Sharable id: {}", sharable_id);
    }
    println!();
}
