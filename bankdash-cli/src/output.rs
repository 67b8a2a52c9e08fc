//! Output formatting utilities

use bankdash_core::{Direction, Page, TransactionRecord};
use colored::Colorize;
use comfy_table::{presets::UTF8_FULL_CONDENSED, Cell, CellAlignment, ContentArrangement, Table};
use rust_decimal::Decimal;
use serde::Serialize;

/// Shown instead of the summary when aggregation fails
pub const NO_DATA_MESSAGE: &str = "No account data available";

/// Print a success message
pub fn success(msg: &str) {
    println!("{}", msg.green());
}

/// Print an error message
pub fn error(msg: &str) {
    eprintln!("{}", msg.red());
}

/// Print a warning message
pub fn warning(msg: &str) {
    println!("{}", msg.yellow());
}

/// Print an info message
pub fn info(msg: &str) {
    println!("{}", msg.cyan());
}

/// Print a value as pretty JSON
pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Create a styled table
pub fn create_table() -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Format an amount as dollars with thousands separators, e.g. `-$1,234.50`
pub fn format_money(amount: Decimal) -> String {
    let rounded = amount.round_dp(2);
    let negative = rounded.is_sign_negative() && !rounded.is_zero();
    let text = format!("{:.2}", rounded.abs());
    let (whole, cents) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let mut grouped = String::new();
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    format!("{}${}.{}", if negative { "-" } else { "" }, grouped, cents)
}

/// Keep the last four characters of a secret
pub fn mask_secret(secret: Option<&str>) -> String {
    match secret {
        None => "(not set)".to_string(),
        Some(s) if s.chars().count() <= 4 => "****".to_string(),
        Some(s) => {
            let tail: String = s.chars().skip(s.chars().count() - 4).collect();
            format!("****{}", tail)
        }
    }
}

/// Render one page of transactions as a table
pub fn transactions_table(page: &Page<TransactionRecord>) -> Table {
    let mut table = create_table();
    table.set_header(vec!["Date", "Name", "Category", "Channel", "Amount"]);

    for tx in &page.items {
        let amount = match tx.direction {
            Direction::Debit => format!("-{}", format_money(tx.amount.abs())),
            Direction::Credit => format!("+{}", format_money(tx.amount.abs())),
        };
        let name = if tx.pending {
            format!("{} (pending)", tx.name)
        } else {
            tx.name.clone()
        };
        table.add_row(vec![
            Cell::new(tx.date.format("%Y-%m-%d")),
            Cell::new(name),
            Cell::new(&tx.category),
            Cell::new(&tx.payment_channel),
            Cell::new(amount).set_alignment(CellAlignment::Right),
        ]);
    }
    table
}

/// "Page 2 of 5 (43 transactions)"
pub fn page_footer<T>(page: &Page<T>) -> String {
    format!(
        "Page {} of {} ({} transactions)",
        page.page, page.total_pages, page.total_items
    )
}
