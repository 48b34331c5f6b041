//! Reset command

use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result};

use super::open_db;

pub fn cmd_reset(db_path: &Path, yes: bool) -> Result<()> {
    if !db_path.exists() {
        anyhow::bail!("Database not found: {}", db_path.display());
    }

    if !yes {
        print!("⚠️  This will delete all expenses and budgets.\n\n");
        print!("Are you sure? [y/N] ");
        io::stdout().flush()?;

        let mut input = String::new();
        io::stdin().read_line(&mut input)?;
        if !input.trim().eq_ignore_ascii_case("y") {
            println!("Cancelled.");
            return Ok(());
        }
    }

    let db = open_db(db_path)?;
    db.reset().context("Failed to reset database")?;

    let remaining = db.expense_count()?;
    tracing::debug!(remaining, "Post-reset expense count");
    if remaining != 0 {
        anyhow::bail!("Reset left {} expense(s) behind", remaining);
    }

    println!("✅ Database reset complete. Expenses stored: 0");
    Ok(())
}
