use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur during provider operations.
/// Use [`ProviderError::kind`] to decide how a failure surfaces to callers.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Network-level failure (timeout, DNS, connection refused).
    #[error("network error: {0}")]
    Network(String),
    /// API returned an error response.
    #[error("API error (HTTP {status}): {message}")]
    Api {
        status: u16,
        /// Provider-specific error code, e.g. Gemini's `RESOURCE_EXHAUSTED`.
        code: Option<String>,
        message: String,
        /// Seconds from a `Retry-After` header, if the provider sent one.
        retry_after: Option<u64>,
    },
    /// Failed to parse the provider's response.
    #[error("parse error: {0}")]
    Parse(String),
    /// The provider answered but produced no text.
    #[error("provider returned no content")]
    EmptyResponse,
}

/// Provider-independent classification of a [`ProviderError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderErrorKind {
    /// Too many requests in a window.
    RateLimited,
    /// Account quota or credits used up.
    QuotaExhausted,
    /// Key rejected.
    Unauthorized,
    /// Provider down or unreachable.
    Unavailable,
    Other,
}

impl ProviderErrorKind {
    /// Short explanation prefixed to error details, for kinds the operator
    /// can act on.
    pub fn hint(self) -> Option<&'static str> {
        match self {
            ProviderErrorKind::Unauthorized => Some("Provider rejected the API key"),
            ProviderErrorKind::Unavailable => Some("Provider unavailable"),
            _ => None,
        }
    }
}

/// Provider error codes that mean "slow down".
const RATE_LIMIT_CODES: &[&str] = &["RESOURCE_EXHAUSTED", "rate_limit_exceeded"];
/// Provider error codes that mean "out of quota".
const QUOTA_CODES: &[&str] = &["insufficient_quota", "QUOTA_EXCEEDED"];

impl ProviderError {
    pub fn kind(&self) -> ProviderErrorKind {
        match self {
            ProviderError::Api { status, code, .. } => {
                let code = code.as_deref().unwrap_or_default();
                if QUOTA_CODES.contains(&code) || *status == 402 {
                    ProviderErrorKind::QuotaExhausted
                } else if RATE_LIMIT_CODES.contains(&code) || *status == 429 {
                    ProviderErrorKind::RateLimited
                } else if matches!(status, 401 | 403) {
                    ProviderErrorKind::Unauthorized
                } else if *status >= 500 {
                    ProviderErrorKind::Unavailable
                } else {
                    ProviderErrorKind::Other
                }
            }
            ProviderError::Network(_) => ProviderErrorKind::Unavailable,
            ProviderError::Parse(_) | ProviderError::EmptyResponse => ProviderErrorKind::Other,
        }
    }

    /// True for the kinds the gateway reports as HTTP 429.
    pub fn is_quota(&self) -> bool {
        matches!(
            self.kind(),
            ProviderErrorKind::RateLimited | ProviderErrorKind::QuotaExhausted
        )
    }

    pub fn retry_after(&self) -> Option<u64> {
        match self {
            ProviderError::Api { retry_after, .. } => *retry_after,
            _ => None,
        }
    }
}

/// Everything a provider needs to fulfill a completion request.
pub struct CompletionRequest<'a> {
    pub prompt: &'a str,
    pub model: &'a str,
    pub max_output_tokens: Option<u32>,
}

#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Returns the name of the provider.
    fn name(&self) -> &str;

    /// Sends one prompt and returns the model's full text response.
    async fn complete(&self, request: CompletionRequest<'_>) -> Result<String, ProviderError>;
}

/// Parses a `Retry-After` header given in delta-seconds.
pub(crate) fn parse_retry_after(headers: &reqwest::header::HeaderMap) -> Option<u64> {
    headers
        .get(reqwest::header::RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse().ok())
}
