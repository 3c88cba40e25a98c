use std::time::Duration;

use log::{debug, warn};
use reqwest::Url;
use thiserror::Error;

use super::types::{ErrorBody, GenerateRequest, GenerateResponse};
use crate::render::JobStatus;

/// Shown when a failed gateway response has no readable `error` field.
const FALLBACK_GENERATE_ERROR: &str = "Failed to generate code";
const FALLBACK_STATUS_ERROR: &str = "Failed to get job status";

#[derive(Debug, Error)]
pub enum ClientError {
    /// The gateway answered with an error body. Displays the `error` text as-is.
    #[error("{error}")]
    Gateway {
        status: u16,
        error: String,
        details: Option<String>,
        retry_after: Option<u64>,
    },
    #[error("network error: {0}")]
    Network(String),
    #[error("invalid response: {0}")]
    Parse(String),
    #[error("invalid gateway URL: {0}")]
    InvalidUrl(String),
}

/// Talks to the Genimate gateway on behalf of a client session.
pub struct GatewayClient {
    base_url: Url,
    client: reqwest::Client,
}

impl GatewayClient {
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        Self::with_timeout(base_url, Duration::from_secs(120))
    }

    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self, ClientError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| ClientError::InvalidUrl(format!("{base_url}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::InvalidUrl(base_url.to_string()));
        }
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ClientError::InvalidUrl(e.to_string()))?;
        Ok(Self { base_url, client })
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, ClientError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ClientError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Submits a description and returns the generated code plus render info.
    pub async fn generate(&self, description: &str) -> Result<GenerateResponse, ClientError> {
        let url = self.endpoint(&["api", "generate"])?;
        debug!("POST {} (description_len={})", url, description.chars().count());

        let response = self
            .client
            .post(url)
            .json(&GenerateRequest::new(description))
            .send()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(gateway_error(response, FALLBACK_GENERATE_ERROR).await);
        }

        response
            .json()
            .await
            .map_err(|e| ClientError::Parse(e.to_string()))
    }

    /// Fetches one snapshot of a render job.
    pub async fn status(&self, job_id: &str) -> Result<JobStatus, ClientError> {
        let url = self.endpoint(&["api", "status", job_id])?;
        debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(gateway_error(response, FALLBACK_STATUS_ERROR).await);
        }

        response
            .json()
            .await
            .map_err(|e| ClientError::Parse(e.to_string()))
    }
}

async fn gateway_error(response: reqwest::Response, fallback: &str) -> ClientError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    warn!("Gateway error: {} - {}", status, body);
    match serde_json::from_str::<ErrorBody>(&body) {
        Ok(err) => ClientError::Gateway {
            status,
            error: err.error,
            details: err.details,
            retry_after: err.retry_after,
        },
        Err(_) => ClientError::Gateway {
            status,
            error: fallback.to_string(),
            details: (!body.trim().is_empty()).then(|| body.trim().to_string()),
            retry_after: None,
        },
    }
}
