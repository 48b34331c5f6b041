//! OpenAI-compatible backend implementation
//!
//! Works with the hosted OpenAI API and any server that implements the
//! `/v1/chat/completions` endpoint (vLLM, LocalAI, llama-server, ...).
//!
//! # Configuration
//!
//! Environment variables:
//! - `OPENAI_API_KEY`: Bearer credential (required)
//! - `OPENAI_BASE_URL`: Server URL (default: https://api.openai.com)
//! - `OPENAI_MODEL`: Model name (default: gpt-3.5-turbo)

use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::models::Category;
use crate::prompts::{PromptId, PromptLibrary};

use super::parsing::parse_remote_expense;
use super::types::RemoteExpense;
use super::AIBackend;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com";
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";

/// Upper bound on a single completion round trip
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// OpenAI-compatible backend
///
/// # Example
///
/// ```rust,ignore
/// export OPENAI_API_KEY="sk-..."
///
/// // Self-hosted vLLM instead of api.openai.com
/// export OPENAI_BASE_URL="http://192.168.1.100:8000"
/// export OPENAI_MODEL="meta-llama/Llama-3.2-3B-Instruct"
/// ```
#[derive(Clone)]
pub struct OpenAICompatibleBackend {
    http_client: Client,
    base_url: String,
    model: String,
    api_key: String,
    prompts: Arc<RwLock<PromptLibrary>>,
}

impl std::fmt::Debug for OpenAICompatibleBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAICompatibleBackend")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

impl OpenAICompatibleBackend {
    /// Create a new backend against `base_url`
    pub fn new(base_url: &str, model: &str, api_key: &str) -> Self {
        let http_client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_default();

        Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            api_key: api_key.to_string(),
            prompts: Arc::new(RwLock::new(PromptLibrary::new())),
        }
    }

    /// Use a specific prompt library (e.g. embedded-only in tests)
    pub fn with_prompts(mut self, prompts: PromptLibrary) -> Self {
        self.prompts = Arc::new(RwLock::new(prompts));
        self
    }

    /// Create from environment variables
    ///
    /// Returns None when `OPENAI_API_KEY` is unset or blank.
    pub fn from_env() -> Option<Self> {
        let api_key = std::env::var("OPENAI_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty())?;
        let base_url =
            std::env::var("OPENAI_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let model = std::env::var("OPENAI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());

        Some(Self::new(&base_url, &model, &api_key))
    }

    /// Render a prompt into a request with its sampling settings
    fn build_request(&self, id: PromptId, vars: &HashMap<&str, &str>) -> Result<ChatCompletionRequest> {
        let mut prompts = self
            .prompts
            .write()
            .map_err(|_| Error::InvalidData("Failed to acquire prompt library lock".into()))?;
        let prompt = prompts.get(id)?;

        let mut messages = Vec::with_capacity(2);
        let system = prompt.render_system(vars);
        if !system.is_empty() {
            messages.push(ChatMessage {
                role: "system".to_string(),
                content: system,
            });
        }
        messages.push(ChatMessage {
            role: "user".to_string(),
            content: prompt.render_user(vars),
        });

        Ok(ChatCompletionRequest {
            model: self.model.clone(),
            messages,
            temperature: Some(prompt.metadata.temperature),
            max_tokens: Some(prompt.metadata.max_tokens),
            stream: false,
        })
    }

    /// Make a chat completion request and return the first choice's text
    async fn chat_completion(&self, request: &ChatCompletionRequest) -> Result<String> {
        let response = self
            .http_client
            .post(format!("{}/v1/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Ai(format!("OpenAI API error {}: {}", status, body)));
        }

        let chat_response: ChatCompletionResponse = response.json().await?;

        chat_response
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content.unwrap_or_default())
            .ok_or_else(|| Error::Ai("No response from OpenAI API".into()))
    }
}

/// OpenAI chat completion request
#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    stream: bool,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

/// OpenAI chat completion response
#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    /// Null when the model refuses or only returns tool calls
    content: Option<String>,
}

#[async_trait]
impl AIBackend for OpenAICompatibleBackend {
    async fn extract_expense(&self, message: &str, today: NaiveDate) -> Result<RemoteExpense> {
        let categories = Category::all()
            .iter()
            .map(|c| c.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        let today_str = today.format("%Y-%m-%d").to_string();

        let mut vars = HashMap::new();
        vars.insert("categories", categories.as_str());
        vars.insert("today", today_str.as_str());
        vars.insert("message", message);
        let request = self.build_request(PromptId::ExtractExpense, &vars)?;

        let response = self.chat_completion(&request).await?;
        debug!("OpenAI-compatible extract response: {}", response);

        parse_remote_expense(&response, today)
    }

    async fn spending_insight(&self, listing: &str) -> Result<String> {
        let mut vars = HashMap::new();
        vars.insert("listing", listing);
        let request = self.build_request(PromptId::SpendingInsight, &vars)?;

        let response = self.chat_completion(&request).await?;
        debug!("OpenAI-compatible insight response: {}", response);

        let insight = response.trim();
        if insight.is_empty() {
            return Err(Error::Ai("Empty insight from OpenAI API".into()));
        }
        Ok(insight.to_string())
    }

    async fn health_check(&self) -> bool {
        match self
            .http_client
            .get(format!("{}/v1/models", self.base_url))
            .bearer_auth(&self.api_key)
            .send()
            .await
        {
            Ok(resp) => resp.status().is_success(),
            Err(_) => false,
        }
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn host(&self) -> &str {
        &self.base_url
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::MockOpenAIServer;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 10).unwrap()
    }

    fn backend(url: &str) -> OpenAICompatibleBackend {
        OpenAICompatibleBackend::new(url, "gpt-test", "sk-test")
            .with_prompts(PromptLibrary::embedded_only())
    }

    #[test]
    fn test_backend_new_trims_trailing_slash() {
        let backend = OpenAICompatibleBackend::new("http://localhost:8000/", "gpt-4", "sk-x");
        assert_eq!(backend.host(), "http://localhost:8000");
        assert_eq!(backend.model(), "gpt-4");
    }

    #[test]
    fn test_debug_hides_api_key() {
        let backend = OpenAICompatibleBackend::new("http://localhost:8000", "gpt-4", "sk-secret");
        assert!(!format!("{:?}", backend).contains("sk-secret"));
    }

    #[test]
    fn test_extract_request_uses_prompt_settings() {
        let backend = backend("http://localhost:8000");
        let mut vars = HashMap::new();
        vars.insert("categories", "food, other");
        vars.insert("today", "2024-03-10");
        vars.insert("message", "I spent ₹15 on lunch");

        let request = backend.build_request(PromptId::ExtractExpense, &vars).unwrap();
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["model"], "gpt-test");
        assert_eq!(json["messages"][0]["role"], "system");
        assert!(json["messages"][0]["content"]
            .as_str()
            .unwrap()
            .contains("Categories: food, other"));
        assert_eq!(json["messages"][1]["role"], "user");
        assert_eq!(json["messages"][1]["content"], "I spent ₹15 on lunch");
        let temp = json["temperature"].as_f64().unwrap();
        assert!((temp - 0.1).abs() < 0.001);
        assert_eq!(json["max_tokens"], 150);
        assert_eq!(json["stream"], false);
    }

    #[test]
    fn test_chat_completion_response_deserialization() {
        let json = r#"{
            "id": "chatcmpl-123",
            "object": "chat.completion",
            "choices": [{
                "index": 0,
                "message": {"role": "assistant", "content": "Hello!"},
                "finish_reason": "stop"
            }]
        }"#;

        let response: ChatCompletionResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.choices.len(), 1);
        assert_eq!(response.choices[0].message.content.as_deref(), Some("Hello!"));
    }

    #[tokio::test]
    async fn test_extract_expense_against_mock_server() {
        let server = MockOpenAIServer::start_with_reply(
            r#"Here you go: {"amount": "12.5", "description": "lunch", "category": "Food", "date": "2024-03-09"}"#,
        )
        .await;
        let backend = backend(&server.url());

        let expense = backend
            .extract_expense("I spent 12.5 on lunch", today())
            .await
            .unwrap();
        assert_eq!(expense.amount, 12.5);
        assert_eq!(expense.category, Category::Food);
        assert_eq!(expense.date, NaiveDate::from_ymd_opt(2024, 3, 9).unwrap());

        let recorded = server.last_request().unwrap();
        assert_eq!(recorded.authorization.as_deref(), Some("Bearer sk-test"));
        assert_eq!(recorded.body["model"], "gpt-test");
        assert_eq!(recorded.body["messages"][1]["content"], "I spent 12.5 on lunch");
    }

    #[tokio::test]
    async fn test_extract_expense_sends_message_verbatim() {
        let server = MockOpenAIServer::start_with_reply(
            r#"{"amount": 5, "description": "stickers", "category": "shopping", "date": "2024-03-10"}"#,
        )
        .await;
        let backend = backend(&server.url());
        let message = "spent 5 on {{categories}} stickers {{today}}";

        for _ in 0..10 {
            backend.extract_expense(message, today()).await.unwrap();
            let recorded = server.last_request().unwrap();
            assert_eq!(recorded.body["messages"][1]["content"], message);
        }
    }

    #[tokio::test]
    async fn test_extract_expense_http_error() {
        let server =
            MockOpenAIServer::start_with_status(axum::http::StatusCode::INTERNAL_SERVER_ERROR)
                .await;
        let backend = backend(&server.url());

        let err = backend.extract_expense("₹5", today()).await.unwrap_err();
        assert!(err.to_string().contains("500"));
    }

    #[tokio::test]
    async fn test_spending_insight_trims_reply() {
        let server = MockOpenAIServer::start_with_reply("  Eat out less.\n").await;
        let backend = backend(&server.url());

        let insight = backend.spending_insight("- ₹5 on x (other)").await.unwrap();
        assert_eq!(insight, "Eat out less.");

        let recorded = server.last_request().unwrap();
        let temp = recorded.body["temperature"].as_f64().unwrap();
        assert!((temp - 0.7).abs() < 0.001);
    }

    #[tokio::test]
    async fn test_spending_insight_empty_reply_is_error() {
        let server = MockOpenAIServer::start_with_reply("   ").await;
        let backend = backend(&server.url());
        assert!(backend.spending_insight("- ₹5 on x (other)").await.is_err());
    }

    #[tokio::test]
    async fn test_health_check() {
        let server = MockOpenAIServer::start_with_reply("ok").await;
        assert!(backend(&server.url()).health_check().await);

        let unreachable = backend("http://127.0.0.1:1");
        assert!(!unreachable.health_check().await);
    }
}
