//! OpenRouter provider implementation using the Chat Completions API.
//!
//! This module uses OpenAI Chat Completions terminology:
//! - "messages" (array of role/content pairs)
//! - "choices" in the response; we read the first one
//! - errors as `{"error": {"message": ..., "code": ...}}`

use async_trait::async_trait;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::inference::provider::parse_retry_after;
use crate::inference::{CompletionProvider, CompletionRequest, ProviderError};

pub const DEFAULT_OPENROUTER_BASE_URL: &str = "https://openrouter.ai/api/v1";

// ============================================================================
// OpenRouter Chat Completions Types
// ============================================================================

/// Role in a chat message (OpenAI terminology)
#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "lowercase")]
enum Role {
    User,
}

#[derive(Serialize, Debug)]
struct ChatMessage {
    role: Role,
    content: String,
}

/// The request body for the Chat Completions API
#[derive(Serialize, Debug)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Deserialize, Debug)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize, Debug)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize, Debug)]
struct ResponseMessage {
    content: Option<String>,
}

#[derive(Deserialize, Debug)]
struct ErrorEnvelope {
    error: ErrorDetail,
}

#[derive(Deserialize, Debug)]
struct ErrorDetail {
    #[serde(default)]
    message: String,
    /// Numeric on OpenRouter, string on OpenAI-compatible upstreams.
    #[serde(default)]
    code: Option<serde_json::Value>,
}

// ============================================================================
// Translation Layer
// ============================================================================

fn error_code(value: serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(s) => Some(s),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn api_error(status: u16, body: &str, retry_after: Option<u64>) -> ProviderError {
    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) => ProviderError::Api {
            status,
            code: envelope.error.code.and_then(error_code),
            message: envelope.error.message,
            retry_after,
        },
        Err(_) => ProviderError::Api {
            status,
            code: None,
            message: body.to_string(),
            retry_after,
        },
    }
}

// ============================================================================
// Provider Implementation
// ============================================================================

/// OpenRouter API provider
pub struct OpenRouterProvider {
    api_key: String,
    base_url: String,
    client: reqwest::Client,
}

impl OpenRouterProvider {
    /// Creates a new OpenRouter provider.
    ///
    /// # Arguments
    /// * `api_key` - OpenRouter API key
    /// * `base_url` - Optional custom base URL (defaults to OpenRouter's API)
    pub fn new(api_key: String, base_url: Option<String>) -> Self {
        Self {
            api_key,
            base_url: base_url.unwrap_or_else(|| DEFAULT_OPENROUTER_BASE_URL.to_string()),
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl CompletionProvider for OpenRouterProvider {
    fn name(&self) -> &str {
        "openrouter"
    }

    async fn complete(&self, request: CompletionRequest<'_>) -> Result<String, ProviderError> {
        let chat_request = ChatRequest {
            model: request.model.to_string(),
            messages: vec![ChatMessage {
                role: Role::User,
                content: request.prompt.to_string(),
            }],
            max_tokens: request.max_output_tokens,
        };

        info!(
            "OpenRouter chat request: model={}, prompt_len={}",
            request.model,
            request.prompt.len()
        );

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&chat_request)
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        debug!("OpenRouter response status: {}", response.status());

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let retry_after = parse_retry_after(response.headers());
            let err_body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            warn!("OpenRouter API error: {} - {}", status, err_body);
            return Err(api_error(status, &err_body, retry_after));
        }

        let chat_response: ChatResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Parse(e.to_string()))?;

        chat_response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|text| !text.is_empty())
            .ok_or(ProviderError::EmptyResponse)
    }
}
