//! HTTP client for the render microservice.
//!
//! The service is opaque to us: it takes Manim source, renders it in the
//! background and reports job snapshots at `/status/{job_id}`.

use std::time::Duration;

use log::{debug, info, warn};
use reqwest::Url;
use thiserror::Error;

use super::types::{RenderRequest, RenderSubmission};

#[derive(Debug, Error)]
pub enum RenderError {
    /// The service answered with a non-success status.
    #[error("render service returned HTTP {status}")]
    Rejected { status: u16, details: Option<String> },
    /// The service could not be reached at all.
    #[error("render service unreachable: {0}")]
    Unreachable(String),
    /// The service answered 2xx with a body we could not read.
    #[error("invalid render service response: {0}")]
    InvalidBody(String),
    #[error("invalid render service URL: {0}")]
    InvalidUrl(String),
}

impl RenderError {
    /// Human-readable details to relay to callers.
    pub fn details(&self) -> String {
        match self {
            RenderError::Rejected {
                details: Some(details),
                ..
            } => details.clone(),
            other => other.to_string(),
        }
    }
}

/// Pulls `details` (or FastAPI's `detail`) out of an error body, falling back
/// to the raw text.
fn error_details(body: &str) -> Option<String> {
    if let Ok(serde_json::Value::Object(map)) = serde_json::from_str::<serde_json::Value>(body) {
        for key in ["details", "detail", "error"] {
            match map.get(key) {
                Some(serde_json::Value::String(s)) => return Some(s.clone()),
                Some(serde_json::Value::Null) | None => {}
                Some(other) => return Some(other.to_string()),
            }
        }
    }
    let trimmed = body.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[derive(Clone)]
pub struct RenderServiceClient {
    base_url: Url,
    client: reqwest::Client,
}

impl RenderServiceClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, RenderError> {
        let base_url =
            Url::parse(base_url).map_err(|e| RenderError::InvalidUrl(format!("{base_url}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(RenderError::InvalidUrl(base_url.to_string()));
        }
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| RenderError::InvalidUrl(e.to_string()))?;
        Ok(Self { base_url, client })
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    /// Appends percent-encoded path segments to the base URL.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, RenderError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| RenderError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// `POST /generate` with the script to render.
    pub async fn submit(&self, code: &str) -> Result<RenderSubmission, RenderError> {
        let url = self.endpoint(&["generate"])?;
        info!("Dispatching render: url={}, code_len={}", url, code.len());

        let response = self
            .client
            .post(url)
            .json(&RenderRequest { code })
            .send()
            .await
            .map_err(|e| RenderError::Unreachable(e.to_string()))?;

        let status = response.status();
        debug!("Render service response status: {}", status);

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("Render service rejected script: {} - {}", status, body);
            return Err(RenderError::Rejected {
                status: status.as_u16(),
                details: error_details(&body),
            });
        }

        response
            .json()
            .await
            .map_err(|e| RenderError::InvalidBody(e.to_string()))
    }

    /// `GET /status/{job_id}`, returning the body untouched.
    pub async fn status_raw(&self, job_id: &str) -> Result<serde_json::Value, RenderError> {
        let url = self.endpoint(&["status", job_id])?;
        debug!("Querying render job status: {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| RenderError::Unreachable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("Render status query failed for {}: {} - {}", job_id, status, body);
            return Err(RenderError::Rejected {
                status: status.as_u16(),
                details: error_details(&body),
            });
        }

        response
            .json()
            .await
            .map_err(|e| RenderError::InvalidBody(e.to_string()))
    }
}
