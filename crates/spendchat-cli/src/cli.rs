//! CLI argument definitions using clap
//!
//! The command implementations live in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// SpendChat - Track expenses by chatting
#[derive(Parser)]
#[command(name = "spendchat")]
#[command(about = "Chat-driven personal expense tracker", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Database path
    #[arg(long, default_value = "finance.db", global = true)]
    pub db: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database
    Init,

    /// Start the web server
    Serve {
        /// Host to bind to
        #[arg(long, default_value = "0.0.0.0")]
        host: String,

        /// Port to listen on (0 picks a free port)
        #[arg(short, long, default_value = "0")]
        port: u16,

        /// Directory holding the chat client
        #[arg(long, default_value = "ui")]
        static_dir: PathBuf,
    },

    /// Send one message to the assistant
    Chat {
        /// Message text (words are joined with spaces)
        #[arg(required = true, num_args = 1..)]
        message: Vec<String>,

        /// Print the reply as JSON
        #[arg(long)]
        json: bool,
    },

    /// List recent expenses
    Expenses {
        /// Trailing window in days
        #[arg(short, long, default_value = "30")]
        days: i64,

        /// Only show this category
        #[arg(short, long)]
        category: Option<String>,
    },

    /// Show spending per category
    Summary {
        /// Trailing window in days
        #[arg(short, long, default_value = "30")]
        days: i64,
    },

    /// Delete all expenses and budgets
    Reset {
        /// Skip confirmation prompt
        #[arg(long, short = 'y')]
        yes: bool,
    },

    /// Manage model prompts
    Prompts {
        #[command(subcommand)]
        action: Option<PromptsAction>,
    },
}

#[derive(Subcommand)]
pub enum PromptsAction {
    /// List all available prompts and their override status
    List,

    /// Show the content of a specific prompt
    Show {
        /// Prompt ID (e.g., extract_expense, spending_insight)
        prompt_id: String,
    },

    /// Show the path where prompt overrides should be placed
    Path,
}
