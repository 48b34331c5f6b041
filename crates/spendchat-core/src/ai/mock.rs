//! Mock backend for testing
//!
//! Deterministic responses for every AI operation, without a network.
//! Can be configured to fail or to return a canned model reply.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::error::{Error, Result};
use crate::extract::heuristics;

use super::parsing::parse_remote_expense;
use super::types::RemoteExpense;
use super::AIBackend;

/// Mock AI backend for testing
#[derive(Clone, Debug)]
pub struct MockBackend {
    /// Whether health_check should return true
    pub healthy: bool,
    /// Every operation returns an error
    pub failing: bool,
    /// Raw model reply used instead of the built-in behaviour
    pub reply: Option<String>,
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MockBackend {
    /// Create a new mock backend (healthy by default)
    pub fn new() -> Self {
        Self {
            healthy: true,
            failing: false,
            reply: None,
        }
    }

    pub fn unhealthy() -> Self {
        Self {
            healthy: false,
            ..Self::new()
        }
    }

    /// A backend whose calls all fail, as if the remote were unreachable
    pub fn failing() -> Self {
        Self {
            healthy: false,
            failing: true,
            reply: None,
        }
    }

    /// A backend that answers every call with `reply` as the raw model text
    pub fn with_reply(reply: impl Into<String>) -> Self {
        Self {
            reply: Some(reply.into()),
            ..Self::new()
        }
    }

    fn check_failing(&self) -> Result<()> {
        if self.failing {
            Err(Error::Ai("mock backend configured to fail".into()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl AIBackend for MockBackend {
    async fn extract_expense(&self, message: &str, today: NaiveDate) -> Result<RemoteExpense> {
        self.check_failing()?;

        if let Some(ref reply) = self.reply {
            return parse_remote_expense(reply, today);
        }

        // Same answer the keyword heuristics would give
        let local = heuristics::local_extract(message, today);
        Ok(RemoteExpense {
            amount: local.amount,
            description: local.description,
            category: local.category,
            date: local.date,
        })
    }

    async fn spending_insight(&self, listing: &str) -> Result<String> {
        self.check_failing()?;

        if let Some(ref reply) = self.reply {
            return Ok(reply.trim().to_string());
        }

        let count = listing.lines().filter(|l| l.starts_with("- ")).count();
        Ok(format!("Mock insight: reviewed {} recent expenses.", count))
    }

    async fn health_check(&self) -> bool {
        self.healthy
    }

    fn model(&self) -> &str {
        "mock"
    }

    fn host(&self) -> &str {
        "mock://localhost"
    }
}
