use genimate::inference::{
    CompletionProvider, CompletionRequest, GeminiProvider, OpenRouterProvider, ProviderError,
    ProviderErrorKind,
};
use serde_json::json;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_partial_json, header, method, path},
};

// ============================================================================
// Helper Functions
// ============================================================================

fn request<'a>(prompt: &'a str, model: &'a str) -> CompletionRequest<'a> {
    CompletionRequest {
        prompt,
        model,
        max_output_tokens: Some(1024),
    }
}

fn gemini_reply(text: &str) -> serde_json::Value {
    json!({
        "candidates": [{
            "content": { "role": "model", "parts": [{ "text": text }] }
        }]
    })
}

fn openrouter_reply(text: &str) -> serde_json::Value {
    json!({
        "choices": [{ "message": { "role": "assistant", "content": text } }]
    })
}

// ============================================================================
// Gemini Provider Tests
// ============================================================================

#[tokio::test]
async fn test_gemini_sends_prompt_and_returns_text() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/models/gemini-1.5-flash:generateContent"))
        .and(header("x-goog-api-key", "test-key"))
        .and(body_partial_json(json!({
            "contents": [{ "role": "user", "parts": [{ "text": "draw a circle" }] }],
            "generationConfig": { "maxOutputTokens": 1024 }
        })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(gemini_reply("```python\nfrom manim import *\n```")),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let provider = GeminiProvider::new("test-key".to_string(), Some(mock_server.uri()));
    let text = provider
        .complete(request("draw a circle", "gemini-1.5-flash"))
        .await
        .unwrap();

    assert_eq!(text, "```python\nfrom manim import *\n```");
}

#[tokio::test]
async fn test_gemini_joins_multiple_parts() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{
                "content": { "parts": [{ "text": "from manim " }, { "text": "import *" }] }
            }]
        })))
        .mount(&mock_server)
        .await;

    let provider = GeminiProvider::new("k".to_string(), Some(mock_server.uri()));
    let text = provider.complete(request("x", "m")).await.unwrap();
    assert_eq!(text, "from manim import *");
}

#[tokio::test]
async fn test_gemini_quota_error_is_classified() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(429)
                .insert_header("retry-after", "30")
                .set_body_json(json!({
                    "error": {
                        "code": 429,
                        "message": "Resource has been exhausted",
                        "status": "RESOURCE_EXHAUSTED"
                    }
                })),
        )
        .mount(&mock_server)
        .await;

    let provider = GeminiProvider::new("k".to_string(), Some(mock_server.uri()));
    let err = provider.complete(request("x", "m")).await.unwrap_err();

    assert!(err.is_quota());
    assert_eq!(err.kind(), ProviderErrorKind::RateLimited);
    assert_eq!(err.retry_after(), Some(30));
    match err {
        ProviderError::Api { status, code, message, .. } => {
            assert_eq!(status, 429);
            assert_eq!(code.as_deref(), Some("RESOURCE_EXHAUSTED"));
            assert_eq!(message, "Resource has been exhausted");
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_gemini_without_candidates_is_empty_response() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "candidates": [] })))
        .mount(&mock_server)
        .await;

    let provider = GeminiProvider::new("k".to_string(), Some(mock_server.uri()));
    let err = provider.complete(request("x", "m")).await.unwrap_err();
    assert!(matches!(err, ProviderError::EmptyResponse));
}

#[tokio::test]
async fn test_gemini_unauthorized_plain_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(403).set_body_string("forbidden"))
        .mount(&mock_server)
        .await;

    let provider = GeminiProvider::new("bad".to_string(), Some(mock_server.uri()));
    let err = provider.complete(request("x", "m")).await.unwrap_err();
    assert_eq!(err.kind(), ProviderErrorKind::Unauthorized);
    assert!(!err.is_quota());
    assert!(err.to_string().contains("forbidden"));
}

// ============================================================================
// OpenRouter Provider Tests
// ============================================================================

#[tokio::test]
async fn test_openrouter_sends_chat_request() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("authorization", "Bearer test-key"))
        .and(body_partial_json(json!({
            "model": "google/gemini-flash-1.5",
            "messages": [{ "role": "user", "content": "draw a square" }],
            "max_tokens": 1024
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(openrouter_reply("code")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let provider = OpenRouterProvider::new("test-key".to_string(), Some(mock_server.uri()));
    let text = provider
        .complete(request("draw a square", "google/gemini-flash-1.5"))
        .await
        .unwrap();
    assert_eq!(text, "code");
}

#[tokio::test]
async fn test_openrouter_credit_exhaustion_is_quota() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(402).set_body_json(json!({
            "error": { "message": "Insufficient credits", "code": 402 }
        })))
        .mount(&mock_server)
        .await;

    let provider = OpenRouterProvider::new("k".to_string(), Some(mock_server.uri()));
    let err = provider.complete(request("x", "m")).await.unwrap_err();
    assert_eq!(err.kind(), ProviderErrorKind::QuotaExhausted);
    assert!(err.is_quota());
    assert_eq!(err.retry_after(), None);
}

#[tokio::test]
async fn test_openrouter_server_error_is_unavailable() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503).set_body_string("upstream down"))
        .mount(&mock_server)
        .await;

    let provider = OpenRouterProvider::new("k".to_string(), Some(mock_server.uri()));
    let err = provider.complete(request("x", "m")).await.unwrap_err();
    assert_eq!(err.kind(), ProviderErrorKind::Unavailable);
}

#[tokio::test]
async fn test_network_failure_is_reported() {
    // Nothing listens on port 9
    let provider = OpenRouterProvider::new("k".to_string(), Some("http://127.0.0.1:9".into()));
    let err = provider.complete(request("x", "m")).await.unwrap_err();
    assert!(matches!(err, ProviderError::Network(_)));
}
