//! SpendChat Core Library
//!
//! Shared functionality for the SpendChat personal finance assistant:
//! - Expense store (SQLite with connection pooling)
//! - Expense extraction from free text (remote model first, local heuristics fallback)
//! - Spending insight generation
//! - Chat dispatcher that turns messages into replies
//! - Pluggable remote model backends and a prompt library

pub mod ai;
pub mod chat;
pub mod db;
pub mod error;
pub mod extract;
pub mod insights;
pub mod models;
pub mod prompts;

/// Test utilities including a mock OpenAI-compatible server
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

/// Currency symbol used in replies and recognised by the amount heuristics
pub const CURRENCY_SYMBOL: &str = "₹";

pub use ai::{AIBackend, AIClient, MockBackend, OpenAICompatibleBackend, RemoteExpense};
pub use chat::{ChatDispatcher, ChatIntent, ChatReply};
pub use db::Database;
pub use error::{Error, Result};
pub use extract::{ExpenseExtractor, ExtractedExpense, ExtractionSource};
pub use insights::{InsightGenerator, SpendingBreakdown};
pub use models::{Category, CategoryTotal, Expense, NewExpense};
pub use prompts::{Prompt, PromptId, PromptInfo, PromptLibrary};
