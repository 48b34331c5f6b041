//! Spending insights
//!
//! A short remark about recent expenses. Uses the remote model when one is
//! configured and falls back to a fixed total/top-category line.

use tracing::{debug, warn};

use crate::ai::{AIBackend, AIClient};
use crate::models::{Category, Expense};
use crate::CURRENCY_SYMBOL;

/// Reply when there is nothing to summarize
pub const NO_EXPENSES_INSIGHT: &str = "Start adding expenses to get insights!";

/// How many expenses are listed to the remote model
const LISTING_LIMIT: usize = 5;

/// Totals over a set of expenses, categories in first-seen order
#[derive(Debug, Clone, PartialEq)]
pub struct SpendingBreakdown {
    pub total: f64,
    pub by_category: Vec<(Category, f64)>,
}

impl SpendingBreakdown {
    pub fn from_expenses(expenses: &[Expense]) -> Self {
        let mut total = 0.0;
        let mut by_category: Vec<(Category, f64)> = Vec::new();

        for expense in expenses {
            total += expense.amount;
            match by_category.iter_mut().find(|(c, _)| *c == expense.category) {
                Some((_, sum)) => *sum += expense.amount,
                None => by_category.push((expense.category, expense.amount)),
            }
        }

        Self { total, by_category }
    }

    /// Category with the largest sum; ties go to the one seen first
    pub fn top_category(&self) -> Option<(Category, f64)> {
        self.by_category.iter().copied().fold(None, |best, (cat, sum)| match best {
            Some((_, best_sum)) if best_sum >= sum => best,
            _ => Some((cat, sum)),
        })
    }
}

/// Bullet listing of the first few expenses, as sent to the remote model
pub fn expense_listing(expenses: &[Expense]) -> String {
    let mut listing = String::from("Recent expenses:\n");
    for expense in expenses.iter().take(LISTING_LIMIT) {
        listing.push_str(&format!(
            "- {}{} on {} ({})\n",
            CURRENCY_SYMBOL,
            listing_amount(expense.amount),
            expense.description,
            expense.category
        ));
    }
    listing
}

/// Shortest round-trip form that always keeps a decimal point ("15.0", "12.75")
fn listing_amount(amount: f64) -> String {
    if amount.is_finite() && amount.fract() == 0.0 && amount.abs() < 1e16 {
        format!("{:.1}", amount)
    } else {
        amount.to_string()
    }
}

/// Deterministic insight line
pub fn fallback_insight(breakdown: &SpendingBreakdown) -> String {
    match breakdown.top_category() {
        Some((category, sum)) => format!(
            "Total: {sym}{:.2} | Top category: {} ({sym}{:.2})",
            breakdown.total,
            category,
            sum,
            sym = CURRENCY_SYMBOL
        ),
        None => NO_EXPENSES_INSIGHT.to_string(),
    }
}

/// Produces insight text for a set of expenses
#[derive(Clone, Debug, Default)]
pub struct InsightGenerator {
    ai: Option<AIClient>,
}

impl InsightGenerator {
    pub fn new(ai: Option<AIClient>) -> Self {
        Self { ai }
    }

    pub fn local_only() -> Self {
        Self { ai: None }
    }

    /// Generate an insight; never fails
    pub async fn generate(&self, expenses: &[Expense]) -> String {
        if expenses.is_empty() {
            return NO_EXPENSES_INSIGHT.to_string();
        }

        let breakdown = SpendingBreakdown::from_expenses(expenses);

        if let Some(ref ai) = self.ai {
            let listing = expense_listing(expenses);
            match ai.spending_insight(&listing).await {
                Ok(insight) if !insight.trim().is_empty() => {
                    debug!(model = ai.model(), "Remote insight generated");
                    return insight.trim().to_string();
                }
                Ok(_) => warn!(model = ai.model(), "Remote insight was empty, using fallback"),
                Err(e) => warn!(model = ai.model(), "Remote insight failed, using fallback: {}", e),
            }
        }

        fallback_insight(&breakdown)
    }
}
