//! Expense listing and summary commands

use std::path::Path;

use anyhow::{Context, Result};
use spendchat_core::chat::format_summary;
use spendchat_core::{Category, Expense, CURRENCY_SYMBOL};

use super::{open_db, truncate};

pub fn cmd_expenses(db_path: &Path, days: i64, category: Option<&str>) -> Result<()> {
    let category = category
        .map(|c| c.parse::<Category>().map_err(anyhow::Error::msg))
        .transpose()?;

    let db = open_db(db_path)?;
    let expenses = db
        .list_expenses(days, category)
        .context("Failed to list expenses")?;

    if expenses.is_empty() {
        println!("No expenses in the last {} days.", days);
        return Ok(());
    }

    println!(
        "{:>5}  {:<10}  {:>12}  {:<15}  {}",
        "ID", "DATE", "AMOUNT", "CATEGORY", "DESCRIPTION"
    );
    println!("{}", "-".repeat(80));
    for expense in &expenses {
        println!("{}", format_expense_row(expense));
    }
    println!();
    println!(
        "{} expense(s), total {}{:.2}",
        expenses.len(),
        CURRENCY_SYMBOL,
        expenses.iter().map(|e| e.amount).sum::<f64>()
    );

    Ok(())
}

/// One table row of the expense listing
pub fn format_expense_row(expense: &Expense) -> String {
    format!(
        "{:>5}  {:<10}  {:>12}  {:<15}  {}",
        expense.id,
        expense.date.format("%Y-%m-%d"),
        format!("{}{:.2}", CURRENCY_SYMBOL, expense.amount),
        expense.category.as_str(),
        truncate(&expense.description, 40)
    )
}

pub fn cmd_summary(db_path: &Path, days: i64) -> Result<()> {
    let db = open_db(db_path)?;
    let totals = db
        .spending_by_category(days)
        .context("Failed to aggregate spending")?;

    if totals.is_empty() {
        println!("No expenses in the last {} days.", days);
        return Ok(());
    }

    let total: f64 = totals.iter().map(|t| t.total).sum();
    print!("{}", format_summary(days, total, &totals));

    Ok(())
}
