use std::{sync::Arc, time::Duration};

use log::{debug, warn};
use mfs_common::Secret;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const OPENROUTER_URL: &str = "https://openrouter.ai/api/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "meta-llama/llama-3.3-70b-instruct:free";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("No LLM api key is configured")]
    MissingApiKey,
    #[error("Error communicating with the LLM provider: {0}")]
    RequestError(String),
    #[error("The LLM provider answered with status {status}: {body}")]
    UpstreamStatus { status: u16, body: String },
    #[error("The LLM provider returned an empty completion")]
    EmptyResponse,
    #[error("Could not parse the LLM answer: {0}")]
    UnparseableAnswer(String),
}

#[derive(Clone, Debug, Default)]
pub struct LlmConfig {
    pub api_key: Secret<String>,
    pub model: String,
}

impl LlmConfig {
    pub fn new(api_key: &str, model: &str) -> Self {
        Self { api_key: Secret::new(api_key.to_string()), model: model.to_string() }
    }

    /// Initializes from `OPENROUTER_API_KEY` and `OPENROUTER_MODEL`. A missing
    /// key is tolerated here; every enhancement then takes the rule-based
    /// path.
    pub fn new_from_env_or_default() -> Self {
        let api_key = std::env::var("OPENROUTER_API_KEY").unwrap_or_else(|_| {
            warn!("🪛️ OPENROUTER_API_KEY is not set. SEO enhancements will use the rule-based fallback only.");
            String::default()
        });
        let model = std::env::var("OPENROUTER_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());
        Self { api_key: Secret::new(api_key), model }
    }

    pub fn has_api_key(&self) -> bool {
        !self.api_key.is_empty()
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: String,
}

/// Minimal OpenRouter chat-completions client.
#[derive(Clone, Debug)]
pub struct LlmClient {
    config: LlmConfig,
    client: Arc<Client>,
}

impl LlmClient {
    pub fn new(config: LlmConfig) -> Self {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| Client::new());
        Self { config, client: Arc::new(client) }
    }

    pub fn model(&self) -> &str {
        self.config.model.as_str()
    }

    pub fn is_configured(&self) -> bool {
        self.config.has_api_key()
    }

    /// Sends a single-message completion request and returns the raw text of
    /// the first choice.
    pub async fn complete(&self, prompt: &str, max_tokens: u32, temperature: f32) -> Result<String, LlmError> {
        if !self.is_configured() {
            return Err(LlmError::MissingApiKey);
        }
        let request = ChatRequest {
            model: self.config.model.as_str(),
            messages: vec![ChatMessage { role: "user", content: prompt }],
            max_tokens,
            temperature,
        };
        debug!("🤖️ Sending completion request to {} ({} prompt chars)", self.config.model, prompt.len());
        let response = self
            .client
            .post(OPENROUTER_URL)
            .bearer_auth(self.config.api_key.reveal())
            .json(&request)
            .send()
            .await
            .map_err(|e| LlmError::RequestError(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let body = body.chars().take(200).collect();
            return Err(LlmError::UpstreamStatus { status: status.as_u16(), body });
        }
        let body: ChatResponse = response.json().await.map_err(|e| LlmError::RequestError(e.to_string()))?;
        let content = body
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content.trim().to_string())
            .unwrap_or_default();
        if content.is_empty() {
            return Err(LlmError::EmptyResponse);
        }
        Ok(content)
    }
}
