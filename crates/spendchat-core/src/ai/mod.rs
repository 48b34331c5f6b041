//! Pluggable remote model backend abstraction
//!
//! # Architecture
//!
//! - `AIBackend` trait: defines the interface for all AI operations
//! - `AIClient` enum: concrete wrapper providing Clone + compile-time dispatch
//! - Backend implementations: `OpenAICompatibleBackend`, `MockBackend`
//!
//! # Usage
//!
//! ```rust,ignore
//! let ai = AIClient::from_env();
//!
//! if let Some(ref client) = ai {
//!     let expense = client.extract_expense("I spent ₹15 on lunch", today).await?;
//!     println!("{} -> {}", expense.amount, expense.category);
//! }
//! ```
//!
//! # Configuration
//!
//! Environment variables:
//! - `AI_BACKEND`: `openai` (default) or `mock`
//! - `OPENAI_API_KEY`: Bearer credential; without it no client is created
//! - `OPENAI_BASE_URL`: Server URL (default: https://api.openai.com)
//! - `OPENAI_MODEL`: Model name (default: gpt-3.5-turbo)

mod mock;
mod openai_compatible;
pub mod parsing;
pub mod types;

pub use mock::MockBackend;
pub use openai_compatible::OpenAICompatibleBackend;
pub use types::*;

use async_trait::async_trait;
use chrono::NaiveDate;
use tracing::{info, warn};

use crate::error::Result;

/// Trait defining the interface for all AI backends
///
/// Backends should be Send + Sync to allow use across async tasks.
#[async_trait]
pub trait AIBackend: Send + Sync {
    /// Extract an expense from a chat message
    ///
    /// `today` fills in the date when the model leaves it out.
    async fn extract_expense(&self, message: &str, today: NaiveDate) -> Result<RemoteExpense>;

    /// Comment on a bullet listing of recent expenses
    async fn spending_insight(&self, listing: &str) -> Result<String>;

    /// Check if the backend is available
    async fn health_check(&self) -> bool;

    /// Get the model name (for logging)
    fn model(&self) -> &str;

    /// Get the host URL (for logging)
    fn host(&self) -> &str;
}

/// Concrete AI client enum
///
/// Provides Clone and compile-time dispatch without Box<dyn> overhead.
#[derive(Clone, Debug)]
pub enum AIClient {
    /// OpenAI or any server speaking its chat completions API
    OpenAICompatible(OpenAICompatibleBackend),
    /// Mock backend for testing
    Mock(MockBackend),
}

impl AIClient {
    /// Create an AI client from environment variables
    ///
    /// Checks `AI_BACKEND` to determine which backend to use:
    /// - `openai` (default): requires `OPENAI_API_KEY`
    /// - `mock`: deterministic backend for testing
    ///
    /// Returns None when no credential is configured; callers then rely on
    /// local heuristics only.
    pub fn from_env() -> Option<Self> {
        let backend = std::env::var("AI_BACKEND").unwrap_or_else(|_| "openai".to_string());

        let client = match backend.to_lowercase().as_str() {
            "mock" => Some(AIClient::mock()),
            "openai" | "openai_compatible" => {
                OpenAICompatibleBackend::from_env().map(AIClient::OpenAICompatible)
            }
            _ => {
                warn!(backend = %backend, "Unknown AI_BACKEND, falling back to openai");
                OpenAICompatibleBackend::from_env().map(AIClient::OpenAICompatible)
            }
        };

        match client {
            Some(ref c) => info!(model = c.model(), host = c.host(), "Remote model enabled"),
            None => info!("No OPENAI_API_KEY set, using local parsing only"),
        }

        client
    }

    /// Create an OpenAI-compatible backend directly
    pub fn openai(base_url: &str, model: &str, api_key: &str) -> Self {
        AIClient::OpenAICompatible(OpenAICompatibleBackend::new(base_url, model, api_key))
    }

    /// Create a mock backend for testing
    pub fn mock() -> Self {
        AIClient::Mock(MockBackend::new())
    }
}

// Implement AIBackend for AIClient by delegating to the inner backend
#[async_trait]
impl AIBackend for AIClient {
    async fn extract_expense(&self, message: &str, today: NaiveDate) -> Result<RemoteExpense> {
        match self {
            AIClient::OpenAICompatible(b) => b.extract_expense(message, today).await,
            AIClient::Mock(b) => b.extract_expense(message, today).await,
        }
    }

    async fn spending_insight(&self, listing: &str) -> Result<String> {
        match self {
            AIClient::OpenAICompatible(b) => b.spending_insight(listing).await,
            AIClient::Mock(b) => b.spending_insight(listing).await,
        }
    }

    async fn health_check(&self) -> bool {
        match self {
            AIClient::OpenAICompatible(b) => b.health_check().await,
            AIClient::Mock(b) => b.health_check().await,
        }
    }

    fn model(&self) -> &str {
        match self {
            AIClient::OpenAICompatible(b) => b.model(),
            AIClient::Mock(b) => b.model(),
        }
    }

    fn host(&self) -> &str {
        match self {
            AIClient::OpenAICompatible(b) => b.host(),
            AIClient::Mock(b) => b.host(),
        }
    }
}
