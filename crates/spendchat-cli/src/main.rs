//! SpendChat CLI - Chat-driven expense tracker
//!
//! Usage:
//!   spendchat init                      Initialize database
//!   spendchat chat "I spent ₹15 on lunch"  Record or query through the assistant
//!   spendchat expenses --days 7         List recent expenses
//!   spendchat serve --port 8000         Start web server

mod cli;
mod commands;

#[cfg(test)]
mod tests;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env is fine
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    match cli.command {
        Commands::Init => commands::cmd_init(&cli.db),
        Commands::Serve {
            host,
            port,
            static_dir,
        } => commands::cmd_serve(&cli.db, &host, port, &static_dir).await,
        Commands::Chat { message, json } => {
            commands::cmd_chat(&cli.db, &message.join(" "), json).await
        }
        Commands::Expenses { days, category } => {
            commands::cmd_expenses(&cli.db, days, category.as_deref())
        }
        Commands::Summary { days } => commands::cmd_summary(&cli.db, days),
        Commands::Reset { yes } => commands::cmd_reset(&cli.db, yes),
        Commands::Prompts { action } => match action {
            Some(PromptsAction::List) | None => commands::cmd_prompts_list(),
            Some(PromptsAction::Show { prompt_id }) => commands::cmd_prompts_show(&prompt_id),
            Some(PromptsAction::Path) => commands::cmd_prompts_path(),
        },
    }
}
