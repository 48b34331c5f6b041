//! CLI command implementations
//!
//! This module contains all the command handlers for the CLI.
//! Each submodule handles a specific command or group of related commands.
//!
//! - `core` - Shared utilities (open_db) and init
//! - `serve` - Web server
//! - `chat` - One-shot chat message
//! - `expenses` - Expense listing and category summary
//! - `reset` - Clear stored data
//! - `prompts` - Prompt library inspection

mod chat;
mod core;
mod expenses;
mod prompts;
mod reset;
mod serve;

pub use chat::*;
pub use core::*;
pub use expenses::*;
pub use prompts::*;
pub use reset::*;
pub use serve::*;

/// Truncate to at most `max` characters, marking the cut with "..."
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
