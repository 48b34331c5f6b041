//! One-shot chat command

use std::path::Path;

use anyhow::{Context, Result};
use spendchat_core::{AIClient, ChatDispatcher, ChatReply};

use super::open_db;

pub async fn cmd_chat(db_path: &Path, message: &str, json: bool) -> Result<()> {
    let db = open_db(db_path)?;
    let dispatcher = ChatDispatcher::new(db, AIClient::from_env());

    let reply = dispatcher
        .handle(message)
        .await
        .context("Failed to handle message")?;
    tracing::debug!(
        expense_id = ?reply.expense_id,
        has_insight = reply.insights.is_some(),
        "Chat reply ready"
    );

    if json {
        println!("{}", serde_json::to_string_pretty(&reply)?);
    } else {
        println!("{}", render_reply(&reply));
    }

    Ok(())
}

/// Plain-text rendering of a reply for the terminal
pub fn render_reply(reply: &ChatReply) -> String {
    let mut out = reply.message.clone();
    if let Some(ref insights) = reply.insights {
        out.push_str("\n\n");
        out.push_str(insights);
    }
    if let Some(id) = reply.expense_id {
        out.push_str(&format!("\n\n(expense #{})", id));
    }
    out
}
