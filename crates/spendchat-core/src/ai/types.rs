//! AI backend response types
//!
//! These types are backend-agnostic and used across all AI implementations.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::Category;

/// Expense fields returned by a remote model, already normalized
///
/// Produced by `parsing::parse_remote_expense`: the category is folded into
/// the closed set and missing fields are filled with their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteExpense {
    pub amount: f64,
    pub description: String,
    pub category: Category,
    pub date: NaiveDate,
}
