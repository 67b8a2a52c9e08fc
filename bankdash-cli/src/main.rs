//! bankdash CLI - your bank accounts in the terminal

use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod output;

use commands::{account, config, dashboard, demo, summary};

/// bankdash - balances and transactions across your linked banks
#[derive(Parser)]
#[command(name = "bd", version, about, long_about = None)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show all linked accounts and the total balance
    Summary {
        /// User whose bank links are aggregated
        user_id: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show one account with its merged transaction history
    Account {
        /// Bank link id
        bank_link_id: String,
        /// Transaction page to show
        #[arg(long, default_value_t = 1)]
        page: usize,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the summary together with one account's transactions
    Dashboard {
        /// User whose bank links are aggregated
        user_id: String,
        /// Bank link to show (defaults to the first account)
        #[arg(long)]
        bank: Option<String>,
        /// Transaction page to show
        #[arg(long, default_value_t = 1)]
        page: usize,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the resolved configuration
    Config {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Manage demo mode
    Demo {
        #[command(subcommand)]
        command: Option<demo::DemoCommands>,
    },
}

/// Log to stderr so `--json` output on stdout stays clean
fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = if verbose > 0 {
        EnvFilter::new(default_level)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            output::error(&format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Summary { user_id, json } => summary::run(&user_id, json).await,
        Commands::Account {
            bank_link_id,
            page,
            json,
        } => account::run(&bank_link_id, page, json).await,
        Commands::Dashboard {
            user_id,
            bank,
            page,
            json,
        } => dashboard::run(&user_id, bank.as_deref(), page, json).await,
        Commands::Config { json } => config::run(json),
        Commands::Demo { command } => demo::run(command),
    }
}
