//! Expense listing and aggregation handlers

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use crate::{AppError, AppState};
use spendchat_core::{Category, Expense};

fn default_days() -> i64 {
    30
}

/// Query parameters for listing expenses
#[derive(Debug, Deserialize)]
pub struct ExpenseQuery {
    /// Trailing window in days
    #[serde(default = "default_days")]
    pub days: i64,
    /// Category name, case-insensitive
    pub category: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ExpensesResponse {
    pub expenses: Vec<Expense>,
}

/// GET /api/expenses - List expenses in a trailing window
pub async fn list_expenses(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ExpenseQuery>,
) -> Result<Json<ExpensesResponse>, AppError> {
    let category = match params.category.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(name) => match name.parse::<Category>() {
            Ok(category) => Some(category),
            Err(e) => {
                // Nothing can be stored under an unknown name
                debug!("{}", e);
                return Ok(Json(ExpensesResponse {
                    expenses: Vec::new(),
                }));
            }
        },
    };

    let expenses = state.db.list_expenses(params.days, category)?;
    Ok(Json(ExpensesResponse { expenses }))
}

/// Query parameters for the category aggregate
#[derive(Debug, Deserialize)]
pub struct SpendingQuery {
    #[serde(default = "default_days")]
    pub days: i64,
}

/// GET /api/spending-by-category - Category totals, largest first
pub async fn spending_by_category(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SpendingQuery>,
) -> Result<Json<Map<String, Value>>, AppError> {
    let totals = state.db.spending_by_category(params.days)?;

    let map = totals
        .into_iter()
        .map(|t| (t.category.to_string(), Value::from(t.total)))
        .collect();

    Ok(Json(map))
}
