//! Request handlers for the three gateway endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use log::{debug, info};

use super::AppState;
use super::error::GatewayError;
use crate::api::{GenerateRequest, GenerateResponse, HealthResponse, MAX_DESCRIPTION_CHARS};
use crate::inference::{CompletionRequest, compose_prompt, extract_code};

/// Checks the request body and returns the description to use.
fn validate(payload: Result<Json<GenerateRequest>, JsonRejection>) -> Result<String, GatewayError> {
    let Json(request) = payload.map_err(|rejection| {
        debug!("Rejected generate body: {}", rejection.body_text());
        GatewayError::Validation("Invalid request body".to_string())
    })?;

    let description = request
        .description
        .filter(|d| !d.trim().is_empty())
        .ok_or_else(|| GatewayError::Validation("Description is required".to_string()))?;

    if description.chars().count() > MAX_DESCRIPTION_CHARS {
        return Err(GatewayError::Validation(format!(
            "Description must be at most {MAX_DESCRIPTION_CHARS} characters"
        )));
    }
    Ok(description)
}

/// `POST /api/generate`: description → generated script → render job.
pub async fn generate(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<GenerateRequest>, JsonRejection>,
) -> Result<Json<GenerateResponse>, GatewayError> {
    let description = validate(payload)?;
    info!(
        "Generating animation: provider={}, description_len={}",
        state.provider.name(),
        description.chars().count()
    );

    let prompt = compose_prompt(&state.system_prompt, &description);
    let raw = state
        .provider
        .complete(CompletionRequest {
            prompt: &prompt,
            model: &state.model,
            max_output_tokens: Some(state.max_output_tokens),
        })
        .await?;

    let code = extract_code(&raw);
    if code.trim().is_empty() {
        return Err(GatewayError::Generation {
            details: "Model returned no code".to_string(),
        });
    }
    debug!("Extracted {} bytes of code from {} byte response", code.len(), raw.len());

    let submission = state
        .render
        .submit(code)
        .await
        .map_err(GatewayError::from_dispatch)?;

    match &submission.job_id {
        Some(job_id) => info!("Render job queued: {}", job_id),
        None => info!("Render finished synchronously: {:?}", submission.video_path),
    }

    Ok(Json(GenerateResponse {
        code: submission.code.unwrap_or_else(|| code.to_string()),
        job_id: submission.job_id,
        video_path: submission.video_path,
        duration: submission.duration,
    }))
}

/// `GET /api/status/{job_id}`: relays the render service's job snapshot untouched.
pub async fn status(
    State(state): State<Arc<AppState>>,
    Path(job_id): Path<String>,
) -> Result<Json<serde_json::Value>, GatewayError> {
    let body = state
        .render
        .status_raw(&job_id)
        .await
        .map_err(GatewayError::from_status_query)?;
    debug!("Job {} status: {}", job_id, body.get("status").unwrap_or(&serde_json::Value::Null));
    Ok(Json(body))
}

/// `GET /api/health`
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        provider: state.provider.name().to_string(),
        model: state.model.clone(),
        render_service: state.render.base_url().to_string(),
    })
}
