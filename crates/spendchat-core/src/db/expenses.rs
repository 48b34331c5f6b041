//! Expense operations

use chrono::{Local, NaiveDate, TimeDelta};
use rusqlite::{params, OptionalExtension, Row};
use tracing::info;

use super::{parse_datetime, Database};
use crate::error::Result;
use crate::models::{Category, CategoryTotal, Expense, NewExpense};

const EXPENSE_COLUMNS: &str = "id, amount, description, category, date, created_at";

/// First date included in a trailing window of `days` ending at `today`
///
/// Plain day subtraction, not calendar months. Out-of-range windows clamp to
/// the earliest representable date.
pub fn window_start(today: NaiveDate, days: i64) -> NaiveDate {
    TimeDelta::try_days(days)
        .and_then(|delta| today.checked_sub_signed(delta))
        .unwrap_or(NaiveDate::MIN)
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn row_to_expense(row: &Row<'_>) -> rusqlite::Result<Expense> {
    let category_str: String = row.get(3)?;
    let date_str: String = row.get(4)?;
    let created_at_str: Option<String> = row.get(5)?;

    let date = NaiveDate::parse_from_str(&date_str, "%Y-%m-%d").map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(4, rusqlite::types::Type::Text, Box::new(e))
    })?;

    Ok(Expense {
        id: row.get(0)?,
        amount: row.get(1)?,
        description: row.get(2)?,
        category: Category::from_name_lossy(&category_str),
        date,
        created_at: created_at_str
            .as_deref()
            .map(parse_datetime)
            .unwrap_or_else(chrono::Utc::now),
    })
}

impl Database {
    /// Insert an expense and return its new ID
    ///
    /// The amount and category are stored as given; `created_at` is set by SQLite.
    pub fn add_expense(&self, expense: &NewExpense) -> Result<i64> {
        let conn = self.conn()?;
        let date = expense.date.unwrap_or_else(today);

        conn.execute(
            "INSERT INTO expenses (amount, description, category, date) VALUES (?1, ?2, ?3, ?4)",
            params![
                expense.amount,
                expense.description,
                expense.category.as_str(),
                date.format("%Y-%m-%d").to_string()
            ],
        )?;

        let id = conn.last_insert_rowid();
        info!(
            id,
            amount = expense.amount,
            category = %expense.category,
            date = %date,
            "Stored expense"
        );
        Ok(id)
    }

    /// Get a single expense by ID
    pub fn get_expense(&self, id: i64) -> Result<Option<Expense>> {
        let conn = self.conn()?;
        let expense = conn
            .query_row(
                &format!("SELECT {} FROM expenses WHERE id = ?", EXPENSE_COLUMNS),
                params![id],
                row_to_expense,
            )
            .optional()?;

        Ok(expense)
    }

    /// List expenses from the last `days` days, newest first
    pub fn list_expenses(&self, days: i64, category: Option<Category>) -> Result<Vec<Expense>> {
        self.list_expenses_since(window_start(today(), days), category)
    }

    /// List expenses dated on or after `start`, newest first
    pub fn list_expenses_since(
        &self,
        start: NaiveDate,
        category: Option<Category>,
    ) -> Result<Vec<Expense>> {
        let conn = self.conn()?;
        let start_str = start.format("%Y-%m-%d").to_string();

        let expenses = match category {
            Some(cat) => {
                let mut stmt = conn.prepare(&format!(
                    "SELECT {} FROM expenses WHERE date >= ?1 AND category = ?2 ORDER BY date DESC, id DESC",
                    EXPENSE_COLUMNS
                ))?;
                let rows = stmt
                    .query_map(params![start_str, cat.as_str()], row_to_expense)?
                    .collect::<std::result::Result<Vec<_>, _>>()?;
                rows
            }
            None => {
                let mut stmt = conn.prepare(&format!(
                    "SELECT {} FROM expenses WHERE date >= ?1 ORDER BY date DESC, id DESC",
                    EXPENSE_COLUMNS
                ))?;
                let rows = stmt
                    .query_map(params![start_str], row_to_expense)?
                    .collect::<std::result::Result<Vec<_>, _>>()?;
                rows
            }
        };

        Ok(expenses)
    }

    /// Total spending per category over the last `days` days, largest first
    pub fn spending_by_category(&self, days: i64) -> Result<Vec<CategoryTotal>> {
        self.spending_by_category_since(window_start(today(), days))
    }

    /// Total spending per category for expenses dated on or after `start`
    pub fn spending_by_category_since(&self, start: NaiveDate) -> Result<Vec<CategoryTotal>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT category, SUM(amount) AS total
            FROM expenses
            WHERE date >= ?1
            GROUP BY category
            ORDER BY total DESC, category ASC
            "#,
        )?;

        let rows = stmt
            .query_map(params![start.format("%Y-%m-%d").to_string()], |row| {
                let category: String = row.get(0)?;
                let total: f64 = row.get(1)?;
                Ok((category, total))
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        // Rows written outside this crate may hold names that fold into `other`
        let mut totals: Vec<CategoryTotal> = Vec::with_capacity(rows.len());
        for (name, total) in rows {
            let category = Category::from_name_lossy(&name);
            match totals.iter_mut().find(|t| t.category == category) {
                Some(existing) => existing.total += total,
                None => totals.push(CategoryTotal { category, total }),
            }
        }
        totals.sort_by(|a, b| b.total.total_cmp(&a.total));

        Ok(totals)
    }

    /// Count all stored expenses
    pub fn expense_count(&self) -> Result<i64> {
        let conn = self.conn()?;
        let count = conn.query_row("SELECT COUNT(*) FROM expenses", [], |row| row.get(0))?;
        Ok(count)
    }
}
