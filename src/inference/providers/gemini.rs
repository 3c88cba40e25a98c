//! Google Gemini provider using the `generateContent` endpoint.
//!
//! Gemini terminology:
//! - "contents" (array of turns) made of "parts" (text fragments)
//! - "candidates" in the response, each with its own content
//! - errors carry a `status` string such as `RESOURCE_EXHAUSTED`

use async_trait::async_trait;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::inference::provider::parse_retry_after;
use crate::inference::{CompletionProvider, CompletionRequest, ProviderError};

pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

// ============================================================================
// Gemini API Types
// ============================================================================

#[derive(Serialize, Debug)]
struct Part {
    text: String,
}

#[derive(Serialize, Debug)]
struct Content {
    role: &'static str,
    parts: Vec<Part>,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Deserialize, Debug, Default)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize, Debug)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize, Debug)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize, Debug)]
struct ResponsePart {
    #[serde(default)]
    text: String,
}

/// `{"error": {"code": 429, "message": "...", "status": "RESOURCE_EXHAUSTED"}}`
#[derive(Deserialize, Debug)]
struct ErrorEnvelope {
    error: ErrorDetail,
}

#[derive(Deserialize, Debug)]
struct ErrorDetail {
    #[serde(default)]
    message: String,
    status: Option<String>,
}

// ============================================================================
// Translation Layer
// ============================================================================

/// Joins the text parts of the first candidate.
fn response_text(response: GenerateContentResponse) -> Option<String> {
    let content = response.candidates.into_iter().next()?.content?;
    let text: String = content.parts.into_iter().map(|p| p.text).collect();
    if text.is_empty() { None } else { Some(text) }
}

/// Turns a non-success body into a structured API error, keeping Gemini's status code.
fn api_error(status: u16, body: &str, retry_after: Option<u64>) -> ProviderError {
    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) => ProviderError::Api {
            status,
            code: envelope.error.status,
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

/// Gemini API provider
pub struct GeminiProvider {
    api_key: String,
    base_url: String,
    client: reqwest::Client,
}

impl GeminiProvider {
    /// Creates a new Gemini provider.
    ///
    /// # Arguments
    /// * `api_key` - Google AI Studio API key
    /// * `base_url` - Optional custom base URL (defaults to the public v1beta API)
    pub fn new(api_key: String, base_url: Option<String>) -> Self {
        Self {
            api_key,
            base_url: base_url.unwrap_or_else(|| DEFAULT_GEMINI_BASE_URL.to_string()),
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl CompletionProvider for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn complete(&self, request: CompletionRequest<'_>) -> Result<String, ProviderError> {
        let body = GenerateContentRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![Part {
                    text: request.prompt.to_string(),
                }],
            }],
            generation_config: GenerationConfig {
                max_output_tokens: request.max_output_tokens,
            },
        };

        info!(
            "Gemini generateContent request: model={}, prompt_len={}",
            request.model,
            request.prompt.len()
        );

        let response = self
            .client
            .post(format!(
                "{}/models/{}:generateContent",
                self.base_url, request.model
            ))
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        debug!("Gemini response status: {}", response.status());

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let retry_after = parse_retry_after(response.headers());
            let err_body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            warn!("Gemini API error: {} - {}", status, err_body);
            return Err(api_error(status, &err_body, retry_after));
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Parse(e.to_string()))?;

        let text = response_text(parsed).ok_or(ProviderError::EmptyResponse)?;
        info!("Gemini response received: {} bytes", text.len());
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inference::ProviderErrorKind;

    #[test]
    fn test_request_serializes_camel_case() {
        let body = GenerateContentRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![Part { text: "hi".into() }],
            }],
            generation_config: GenerationConfig {
                max_output_tokens: Some(128),
            },
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["contents"][0]["parts"][0]["text"], "hi");
        assert_eq!(json["generationConfig"]["maxOutputTokens"], 128);
    }

    #[test]
    fn test_response_text_joins_parts_of_first_candidate() {
        let response: GenerateContentResponse = serde_json::from_str(
            r#"{"candidates":[{"content":{"parts":[{"text":"a"},{"text":"b"}]}},
                {"content":{"parts":[{"text":"ignored"}]}}]}"#,
        )
        .unwrap();
        assert_eq!(response_text(response).as_deref(), Some("ab"));
    }

    #[test]
    fn test_response_text_none_when_blocked() {
        let response: GenerateContentResponse =
            serde_json::from_str(r#"{"candidates":[{"finishReason":"SAFETY"}]}"#).unwrap();
        assert!(response_text(response).is_none());
        assert!(response_text(GenerateContentResponse::default()).is_none());
    }

    #[test]
    fn test_api_error_keeps_status_code() {
        let err = api_error(
            429,
            r#"{"error":{"code":429,"message":"Quota exceeded","status":"RESOURCE_EXHAUSTED"}}"#,
            Some(30),
        );
        assert_eq!(err.kind(), ProviderErrorKind::RateLimited);
        assert_eq!(err.retry_after(), Some(30));
        match err {
            ProviderError::Api { code, message, .. } => {
                assert_eq!(code.as_deref(), Some("RESOURCE_EXHAUSTED"));
                assert_eq!(message, "Quota exceeded");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_api_error_with_plain_body() {
        let err = api_error(502, "Bad Gateway", None);
        assert_eq!(err.kind(), ProviderErrorKind::Unavailable);
        assert!(err.to_string().contains("Bad Gateway"));
    }
}
