//! Expense extraction from chat messages
//!
//! Remote model first, local heuristics as the fallback. Extraction never
//! fails: any remote problem is logged and the heuristics take over.

pub mod heuristics;

use chrono::{Local, NaiveDate};
use serde::Serialize;
use tracing::{debug, warn};

use crate::ai::{AIBackend, AIClient};
use crate::models::{Category, NewExpense};

/// Description used when nothing meaningful is left of the message
pub const DEFAULT_DESCRIPTION: &str = "Expense";

/// Which path produced an extraction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtractionSource {
    Remote,
    Local,
}

/// A structured expense derived from free text
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtractedExpense {
    pub amount: f64,
    pub description: String,
    pub category: Category,
    pub date: NaiveDate,
    pub source: ExtractionSource,
}

impl ExtractedExpense {
    /// Payload for storing this expense
    pub fn to_new_expense(&self) -> NewExpense {
        NewExpense {
            amount: self.amount,
            description: self.description.clone(),
            category: self.category,
            date: Some(self.date),
        }
    }
}

/// Turns chat messages into expenses
#[derive(Clone, Debug, Default)]
pub struct ExpenseExtractor {
    ai: Option<AIClient>,
}

impl ExpenseExtractor {
    /// Create an extractor; `None` means heuristics only
    pub fn new(ai: Option<AIClient>) -> Self {
        Self { ai }
    }

    /// Extractor that never calls a remote model
    pub fn local_only() -> Self {
        Self { ai: None }
    }

    pub fn ai(&self) -> Option<&AIClient> {
        self.ai.as_ref()
    }

    /// Extract an expense dated against the current local day
    pub async fn extract(&self, text: &str) -> ExtractedExpense {
        self.extract_at(text, Local::now().date_naive()).await
    }

    /// Extract an expense with an explicit "today"
    pub async fn extract_at(&self, text: &str, today: NaiveDate) -> ExtractedExpense {
        if let Some(ref ai) = self.ai {
            match ai.extract_expense(text, today).await {
                Ok(remote) => {
                    debug!(
                        amount = remote.amount,
                        category = %remote.category,
                        "Remote extraction succeeded"
                    );
                    return ExtractedExpense {
                        amount: remote.amount,
                        description: remote.description,
                        category: remote.category,
                        date: remote.date,
                        source: ExtractionSource::Remote,
                    };
                }
                Err(e) => {
                    warn!(model = ai.model(), "Remote extraction failed, using local parsing: {}", e);
                }
            }
        }

        let local = heuristics::local_extract(text, today);
        debug!(
            amount = local.amount,
            category = %local.category,
            description = %local.description,
            "Local parsing result"
        );
        local
    }
}
