//! Demo command - manage demo mode

use anyhow::Result;
use bankdash_core::adapters::demo::DEMO_USER_ID;
use bankdash_core::config::Config;
use clap::Subcommand;
use colored::Colorize;

use super::get_bankdash_dir;

#[derive(Subcommand)]
pub enum DemoCommands {
    /// Enable demo mode
    #[command(name = "on")]
    On,
    /// Disable demo mode
    #[command(name = "off")]
    Off,
    /// Show demo mode status
    Status,
}

pub fn run(command: Option<DemoCommands>) -> Result<()> {
    let bankdash_dir = get_bankdash_dir()?;
    std::fs::create_dir_all(&bankdash_dir)?;
    let mut config = Config::load(&bankdash_dir)?;

    match command {
        Some(DemoCommands::On) => {
            config.enable_demo_mode();
            config.save(&bankdash_dir)?;
            println!("{}", "Demo mode enabled".green());
            println!("Run 'bd summary {}' to see the demo accounts.", DEMO_USER_ID);
            Ok(())
        }
        Some(DemoCommands::Off) => {
            config.disable_demo_mode();
            config.save(&bankdash_dir)?;
            println!("{}", "Demo mode disabled".yellow());
            Ok(())
        }
        Some(DemoCommands::Status) | None => {
            if config.demo_mode {
                println!("Demo mode is {}", "ON".green());
            } else {
                println!("Demo mode is {}", "OFF".yellow());
            }
            Ok(())
        }
    }
}
