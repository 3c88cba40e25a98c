//! # Gateway
//!
//! HTTP front door between clients, the generative provider and the render
//! service. Handlers hold no mutable state: the provider and render client are
//! built once at startup and shared through [`AppState`].

pub mod error;
pub mod logging;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use axum::middleware;
use axum::routing::{get, post};
use log::info;
use thiserror::Error;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;

use crate::Provider;
use crate::core::config::{ConfigError, ResolvedConfig};
use crate::inference::{CompletionProvider, GeminiProvider, OpenRouterProvider};
use crate::render::{RenderError, RenderServiceClient};

pub use error::GatewayError;

/// Shared, read-only state handed to every handler.
pub struct AppState {
    pub provider: Arc<dyn CompletionProvider>,
    pub render: RenderServiceClient,
    pub model: String,
    pub system_prompt: String,
    pub max_output_tokens: u32,
}

impl AppState {
    pub fn from_config(
        config: &ResolvedConfig,
        provider: Arc<dyn CompletionProvider>,
    ) -> Result<Self, RenderError> {
        Ok(Self {
            provider,
            render: RenderServiceClient::new(&config.render_url, config.request_timeout)?,
            model: config.model.clone(),
            system_prompt: config.system_prompt.clone(),
            max_output_tokens: config.max_output_tokens,
        })
    }
}

#[derive(Debug, Error)]
pub enum ServeError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error("server I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Builds the provider selected in `config`.
pub fn build_provider(config: &ResolvedConfig) -> Result<Arc<dyn CompletionProvider>, ConfigError> {
    match config.provider {
        Provider::Gemini => {
            let api_key = config
                .gemini_api_key
                .clone()
                .ok_or(ConfigError::MissingApiKey {
                    provider: "gemini",
                    env_var: "GEMINI_API_KEY",
                    section: "gemini",
                })?;
            Ok(Arc::new(GeminiProvider::new(
                api_key,
                Some(config.gemini_base_url.clone()),
            )))
        }
        Provider::OpenRouter => {
            let api_key = config
                .openrouter_api_key
                .clone()
                .ok_or(ConfigError::MissingApiKey {
                    provider: "openrouter",
                    env_var: "OPENROUTER_API_KEY",
                    section: "openrouter",
                })?;
            Ok(Arc::new(OpenRouterProvider::new(
                api_key,
                Some(config.openrouter_base_url.clone()),
            )))
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/generate", post(routes::generate))
        .route("/api/status/{job_id}", get(routes::status))
        .route("/api/health", get(routes::health))
        .layer(middleware::from_fn(logging::logging_middleware))
        .layer(CorsLayer::permissive())
        .with_state(Arc::new(state))
}

/// Runs the gateway until Ctrl+C.
pub async fn serve(config: &ResolvedConfig) -> Result<(), ServeError> {
    let provider = build_provider(config)?;
    let state = AppState::from_config(config, provider)?;
    info!(
        "Gateway using provider={}, model={}, render_service={}",
        state.provider.name(),
        state.model,
        state.render.base_url()
    );

    let listener = TcpListener::bind(&config.bind).await?;
    info!("Genimate gateway listening on http://{}", listener.local_addr()?);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Gateway shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
