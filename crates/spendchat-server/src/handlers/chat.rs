//! Chat handler

use std::sync::Arc;

use axum::{extract::State, Json};
use serde::Deserialize;
use tracing::info;

use crate::{AppError, AppState};
use spendchat_core::ChatReply;

/// Body of a chat request
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    /// Only used for logging; every user shares one expense store
    #[serde(default = "default_user_id")]
    pub user_id: String,
}

fn default_user_id() -> String {
    "default".to_string()
}

/// POST /api/chat - Handle one chat message
pub async fn chat(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatReply>, AppError> {
    info!(user_id = %request.user_id, message = %request.message, "Received chat message");

    let reply = state.dispatcher.handle(&request.message).await?;
    Ok(Json(reply))
}
