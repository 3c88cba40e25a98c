use serde::{Deserialize, Serialize};

/// Longest description accepted from a user, in characters.
pub const MAX_DESCRIPTION_CHARS: usize = 500;

/// `POST /api/generate` request body.
///
/// `description` is optional on the wire so a missing field surfaces as a
/// validation error rather than a deserialization failure.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct GenerateRequest {
    #[serde(default)]
    pub description: Option<String>,
}

impl GenerateRequest {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: Some(description.into()),
        }
    }
}

/// `POST /api/generate` success body: the generated script plus whatever the
/// render service reported for it.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct GenerateResponse {
    pub code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
}

/// Error body returned by every gateway endpoint.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ErrorBody {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(
        rename = "retryAfter",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub retry_after: Option<u64>,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: None,
            retry_after: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

/// `GET /api/health` body.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct HealthResponse {
    pub status: String,
    pub provider: String,
    pub model: String,
    pub render_service: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_description_deserializes_to_none() {
        let req: GenerateRequest = serde_json::from_str("{}").unwrap();
        assert!(req.description.is_none());
    }

    #[test]
    fn test_response_omits_absent_render_fields() {
        let resp = GenerateResponse {
            code: "from manim import *".into(),
            job_id: Some("abc123".into()),
            ..Default::default()
        };
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["job_id"], "abc123");
        assert!(json.get("video_path").is_none());
        assert!(json.get("duration").is_none());
    }

    #[test]
    fn test_error_body_uses_camel_case_retry_after() {
        let body = ErrorBody {
            error: "quota".into(),
            details: Some("slow down".into()),
            retry_after: Some(60),
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["retryAfter"], 60);
        assert!(json.get("retry_after").is_none());

        let bare = serde_json::to_value(ErrorBody::new("Description is required")).unwrap();
        assert_eq!(bare, serde_json::json!({ "error": "Description is required" }));
    }
}
