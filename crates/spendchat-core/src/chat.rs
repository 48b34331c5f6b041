//! Chat dispatcher
//!
//! Classifies an incoming message by keyword, runs the matching action
//! against the store and builds the reply text.

use chrono::{Local, NaiveDate};
use serde::Serialize;
use tracing::info;

use crate::ai::AIClient;
use crate::db::{window_start, Database};
use crate::error::Result;
use crate::extract::ExpenseExtractor;
use crate::insights::InsightGenerator;
use crate::models::CategoryTotal;
use crate::CURRENCY_SYMBOL;

const RECORD_KEYWORDS: &[&str] = &["spent", "paid", "bought", "expense", "cost", "purchased"];
const SUMMARY_KEYWORDS: &[&str] = &["summary", "report", "spending", "how much", "show"];
const GREETING_KEYWORDS: &[&str] = &["hello", "hi", "hey", "help"];

/// Window used for the insight attached to a new expense
const RECENT_DAYS: i64 = 7;

pub const NO_EXPENSES_MESSAGE: &str =
    "No expenses found for this period. Start by adding some expenses!";
pub const NO_EXPENSES_TIP: &str =
    "Try saying: 'I spent ₹15 on lunch' or 'I paid ₹50 for groceries'";
pub const SUMMARY_TIP: &str = "💡 Tip: Track daily to see your spending patterns!";
pub const GREETING_MESSAGE: &str = "👋 Hello! I'm your personal finance assistant. I can help you:\n\n\
• Track expenses: 'I spent ₹25 on lunch'\n\
• View summaries: 'Show my spending this week'\n\
• Analyze patterns: 'How much did I spend on food?'\n\n\
Try adding an expense to get started!";
pub const GREETING_TIP: &str =
    "💡 Example: 'I paid ₹15 for Uber today' or 'Bought groceries for ₹85'";
pub const HELP_MESSAGE: &str = "I can help you track expenses and analyze spending. Try:\n\
• 'I spent ₹25 on dinner'\n\
• 'Show my weekly spending'\n\
• 'Add ₹15 for coffee'";
pub const HELP_TIP: &str = "💡 The more you track, the better insights I can provide!";

/// What a message asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatIntent {
    RecordExpense,
    Summarize { days: i64 },
    Greet,
    Help,
}

impl ChatIntent {
    /// Classify by substring keywords; the first matching group wins
    pub fn classify(message: &str) -> Self {
        let lower = message.trim().to_lowercase();
        let has_any = |keywords: &[&str]| keywords.iter().any(|k| lower.contains(k));

        if has_any(RECORD_KEYWORDS) {
            Self::RecordExpense
        } else if has_any(SUMMARY_KEYWORDS) {
            Self::Summarize {
                days: summary_window_days(&lower),
            }
        } else if has_any(GREETING_KEYWORDS) {
            Self::Greet
        } else {
            Self::Help
        }
    }
}

/// 7 days when the message mentions a week, otherwise 30
pub fn summary_window_days(lower: &str) -> i64 {
    if lower.contains("week") || lower.contains('7') {
        7
    } else {
        30
    }
}

/// Reply to a chat message
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatReply {
    pub success: bool,
    pub message: String,
    pub expense_id: Option<i64>,
    pub insights: Option<String>,
}

impl ChatReply {
    fn text(message: impl Into<String>, insights: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            expense_id: None,
            insights: Some(insights.into()),
        }
    }
}

/// Render the per-category summary report
///
/// Percentages are of `total`; a zero total renders every share as 0.0%.
pub fn format_summary(days: i64, total: f64, totals: &[CategoryTotal]) -> String {
    let mut report = format!(
        "📊 Spending Summary (last {} days)\n\nTotal: {}{:.2} \n\n\nBy category:\n",
        days, CURRENCY_SYMBOL, total
    );

    for entry in totals {
        let percentage = if total > 0.0 {
            entry.total / total * 100.0
        } else {
            0.0
        };
        report.push_str(&format!(
            "• {}: {}{:.2} ({:.1}%)\n",
            entry.category.title(),
            CURRENCY_SYMBOL,
            entry.total,
            percentage
        ));
    }

    report
}

/// Routes chat messages to the store, extractor and insight generator
#[derive(Clone)]
pub struct ChatDispatcher {
    db: Database,
    extractor: ExpenseExtractor,
    insights: InsightGenerator,
}

impl ChatDispatcher {
    /// Create a dispatcher; `ai` is shared by extraction and insights
    pub fn new(db: Database, ai: Option<AIClient>) -> Self {
        Self {
            db,
            extractor: ExpenseExtractor::new(ai.clone()),
            insights: InsightGenerator::new(ai),
        }
    }

    pub fn with_parts(db: Database, extractor: ExpenseExtractor, insights: InsightGenerator) -> Self {
        Self {
            db,
            extractor,
            insights,
        }
    }

    pub fn db(&self) -> &Database {
        &self.db
    }

    /// Handle a message against the current local day
    pub async fn handle(&self, message: &str) -> Result<ChatReply> {
        self.handle_at(message, Local::now().date_naive()).await
    }

    /// Handle a message with an explicit "today"
    pub async fn handle_at(&self, message: &str, today: NaiveDate) -> Result<ChatReply> {
        let intent = ChatIntent::classify(message);
        info!(?intent, "Handling chat message");

        match intent {
            ChatIntent::RecordExpense => self.record_expense(message, today).await,
            ChatIntent::Summarize { days } => self.summarize(days, today),
            ChatIntent::Greet => Ok(ChatReply::text(GREETING_MESSAGE, GREETING_TIP)),
            ChatIntent::Help => Ok(ChatReply::text(HELP_MESSAGE, HELP_TIP)),
        }
    }

    async fn record_expense(&self, message: &str, today: NaiveDate) -> Result<ChatReply> {
        let extracted = self.extractor.extract_at(message, today).await;
        let id = self.db.add_expense(&extracted.to_new_expense())?;

        let recent = self
            .db
            .list_expenses_since(window_start(today, RECENT_DAYS), None)?;
        let insights = self.insights.generate(&recent).await;

        Ok(ChatReply {
            success: true,
            message: format!(
                "✅ Added {}{:.2} for {} ({}) on {}",
                CURRENCY_SYMBOL,
                extracted.amount,
                extracted.description,
                extracted.category,
                extracted.date.format("%Y-%m-%d")
            ),
            expense_id: Some(id),
            insights: Some(insights),
        })
    }

    fn summarize(&self, days: i64, today: NaiveDate) -> Result<ChatReply> {
        let start = window_start(today, days);
        let expenses = self.db.list_expenses_since(start, None)?;
        let totals = self.db.spending_by_category_since(start)?;

        if totals.is_empty() {
            return Ok(ChatReply::text(NO_EXPENSES_MESSAGE, NO_EXPENSES_TIP));
        }

        let total: f64 = expenses.iter().map(|e| e.amount).sum();
        Ok(ChatReply::text(
            format_summary(days, total, &totals),
            SUMMARY_TIP,
        ))
    }
}
