use axum::Json;
use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use log::error;
use thiserror::Error;

use crate::api::ErrorBody;
use crate::inference::ProviderError;
use crate::render::RenderError;

/// Wait suggested to clients when the provider gave no `Retry-After`.
pub const DEFAULT_RETRY_AFTER_SECS: u64 = 60;

/// Every way a gateway request can fail, each with a fixed HTTP status.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("{0}")]
    Validation(String),
    #[error("API quota exceeded. Please try again in {retry_after_secs} seconds.")]
    QuotaExceeded {
        details: String,
        retry_after_secs: u64,
    },
    #[error("Failed to generate code")]
    Generation { details: String },
    #[error("Failed to render animation")]
    RenderRejected { details: Option<String> },
    #[error("Render service unreachable")]
    RenderUnreachable { details: String },
    #[error("Failed to get job status")]
    JobStatus { details: Option<String> },
}

impl GatewayError {
    pub fn status(&self) -> StatusCode {
        match self {
            GatewayError::Validation(_) => StatusCode::BAD_REQUEST,
            GatewayError::QuotaExceeded { .. } => StatusCode::TOO_MANY_REQUESTS,
            GatewayError::Generation { .. }
            | GatewayError::RenderRejected { .. }
            | GatewayError::RenderUnreachable { .. }
            | GatewayError::JobStatus { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Maps a render dispatch failure onto the rejected/unreachable shapes.
    pub fn from_dispatch(err: RenderError) -> Self {
        match err {
            RenderError::Unreachable(details) => GatewayError::RenderUnreachable { details },
            RenderError::Rejected { details, .. } => GatewayError::RenderRejected { details },
            other => GatewayError::RenderRejected {
                details: Some(other.to_string()),
            },
        }
    }

    pub fn from_status_query(err: RenderError) -> Self {
        GatewayError::JobStatus {
            details: Some(err.details()),
        }
    }

    fn body(&self) -> ErrorBody {
        let body = ErrorBody::new(self.to_string());
        match self {
            GatewayError::Validation(_) => body,
            GatewayError::QuotaExceeded {
                details,
                retry_after_secs,
            } => ErrorBody {
                retry_after: Some(*retry_after_secs),
                ..body.with_details(details.clone())
            },
            GatewayError::Generation { details } | GatewayError::RenderUnreachable { details } => {
                body.with_details(details.clone())
            }
            GatewayError::RenderRejected { details } | GatewayError::JobStatus { details } => {
                ErrorBody {
                    details: details.clone(),
                    ..body
                }
            }
        }
    }
}

impl From<ProviderError> for GatewayError {
    fn from(err: ProviderError) -> Self {
        if err.is_quota() {
            GatewayError::QuotaExceeded {
                retry_after_secs: err.retry_after().unwrap_or(DEFAULT_RETRY_AFTER_SECS),
                details: err.to_string(),
            }
        } else {
            let details = match err.kind().hint() {
                Some(hint) => format!("{hint}: {err}"),
                None => err.to_string(),
            };
            GatewayError::Generation { details }
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = self.body();
        match &body.details {
            Some(details) => error!("{} ({}): {}", body.error, status, details),
            None => error!("{} ({})", body.error, status),
        }

        let mut response = (status, Json(body)).into_response();
        if let GatewayError::QuotaExceeded {
            retry_after_secs, ..
        } = self
        {
            response
                .headers_mut()
                .insert(header::RETRY_AFTER, HeaderValue::from(retry_after_secs));
        }
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_rate_limit_maps_to_quota() {
        let err: GatewayError = ProviderError::Api {
            status: 429,
            code: Some("RESOURCE_EXHAUSTED".into()),
            message: "Quota exceeded".into(),
            retry_after: None,
        }
        .into();
        assert_eq!(err.status(), StatusCode::TOO_MANY_REQUESTS);
        let body = err.body();
        assert_eq!(body.retry_after, Some(DEFAULT_RETRY_AFTER_SECS));
        assert_eq!(
            body.error,
            "API quota exceeded. Please try again in 60 seconds."
        );
    }

    #[test]
    fn test_provider_retry_after_is_relayed() {
        let err: GatewayError = ProviderError::Api {
            status: 429,
            code: None,
            message: "slow down".into(),
            retry_after: Some(17),
        }
        .into();
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(response.headers()[header::RETRY_AFTER], "17");
    }

    #[test]
    fn test_other_provider_failures_are_generation_errors() {
        let err: GatewayError = ProviderError::Network("connection refused".into()).into();
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = err.body();
        assert_eq!(body.error, "Failed to generate code");
        assert_eq!(
            body.details.as_deref(),
            Some("Provider unavailable: network error: connection refused")
        );
        assert!(body.retry_after.is_none());
    }

    #[test]
    fn test_rejected_key_is_called_out_in_details() {
        let err: GatewayError = ProviderError::Api {
            status: 403,
            code: Some("PERMISSION_DENIED".into()),
            message: "API key not valid".into(),
            retry_after: None,
        }
        .into();
        let body = err.body();
        assert_eq!(body.error, "Failed to generate code");
        assert_eq!(
            body.details.as_deref(),
            Some("Provider rejected the API key: API error (HTTP 403): API key not valid")
        );
    }

    #[test]
    fn test_unclassified_failure_details_are_unprefixed() {
        let err: GatewayError = ProviderError::EmptyResponse.into();
        assert_eq!(err.body().details.as_deref(), Some("provider returned no content"));
    }

    #[test]
    fn test_dispatch_shapes_are_distinct() {
        let rejected = GatewayError::from_dispatch(RenderError::Rejected {
            status: 422,
            details: Some("SyntaxError".into()),
        });
        let unreachable =
            GatewayError::from_dispatch(RenderError::Unreachable("connection refused".into()));
        assert_eq!(rejected.body().error, "Failed to render animation");
        assert_eq!(rejected.body().details.as_deref(), Some("SyntaxError"));
        assert_eq!(unreachable.body().error, "Render service unreachable");
        assert_eq!(rejected.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(unreachable.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_validation_body_has_only_error() {
        let body = GatewayError::Validation("Description is required".into()).body();
        assert_eq!(body, ErrorBody::new("Description is required"));
    }
}
