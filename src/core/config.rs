//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.genimate/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.

use clap::ValueEnum;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::Provider;
use crate::core::poll::PollPolicy;
use crate::inference::DEFAULT_SYSTEM_PROMPT;
use crate::inference::providers::gemini::DEFAULT_GEMINI_BASE_URL;
use crate::inference::providers::openrouter::DEFAULT_OPENROUTER_BASE_URL;

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GenimateConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub gemini: ApiConfig,
    #[serde(default)]
    pub openrouter: ApiConfig,
    #[serde(default)]
    pub render: RenderConfig,
    #[serde(default)]
    pub gateway: GatewayConfig,
    #[serde(default)]
    pub client: ClientConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GeneralConfig {
    pub provider: Option<String>,
    pub model: Option<String>,
    pub max_output_tokens: Option<u32>,
    pub system_prompt: Option<String>,
    pub system_prompt_file: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ApiConfig {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct RenderConfig {
    pub is_prod: Option<bool>,
    pub local_url: Option<String>,
    pub prod_url: Option<String>,
    pub request_timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GatewayConfig {
    pub bind: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ClientConfig {
    pub gateway_url: Option<String>,
    pub poll_interval_ms: Option<u64>,
    pub poll_max_attempts: Option<u32>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash";
pub const DEFAULT_OPENROUTER_MODEL: &str = "google/gemini-flash-1.5";
pub const DEFAULT_MAX_OUTPUT_TOKENS: u32 = 8192;
pub const DEFAULT_RENDER_URL: &str = "http://localhost:8080";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_BIND: &str = "127.0.0.1:3000";
pub const DEFAULT_GATEWAY_URL: &str = "http://127.0.0.1:3000";

// ============================================================================
// Resolved Config (concrete values, no Options except API keys)
// ============================================================================

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub provider: Provider,
    pub model: String,
    pub max_output_tokens: u32,
    pub system_prompt: String,
    pub gemini_api_key: Option<String>,
    pub gemini_base_url: String,
    pub openrouter_api_key: Option<String>,
    pub openrouter_base_url: String,
    pub render_url: String,
    pub request_timeout: Duration,
    pub bind: String,
    pub gateway_url: String,
    pub poll: PollPolicy,
}

/// Values taken from command-line flags. `None` = not specified.
#[derive(Debug, Default, Clone, Copy)]
pub struct CliOverrides<'a> {
    pub provider: Option<Provider>,
    pub bind: Option<&'a str>,
    pub gateway_url: Option<&'a str>,
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("config parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("unknown provider '{0}' (expected gemini or openrouter)")]
    UnknownProvider(String),
    #[error("missing API key for {provider}: set {env_var} or [{section}].api_key")]
    MissingApiKey {
        provider: &'static str,
        env_var: &'static str,
        section: &'static str,
    },
    #[error("invalid {key}: must be greater than zero")]
    NotPositive { key: &'static str },
}

// ============================================================================
// Loading
// ============================================================================

/// Returns the `~/.genimate` directory.
pub fn config_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".genimate"))
}

/// Returns the path to `~/.genimate/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|d| d.join("config.toml"))
}

/// Load config from `~/.genimate/config.toml`.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `GenimateConfig::default()`. If it exists but is malformed,
/// returns `ConfigError::Parse`.
pub fn load_config() -> Result<GenimateConfig, ConfigError> {
    let path = match config_path() {
        Some(p) => p,
        None => {
            warn!("Could not determine home directory, using default config");
            return Ok(GenimateConfig::default());
        }
    };

    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(&path);
        return Ok(GenimateConfig::default());
    }

    let contents = fs::read_to_string(&path)?;
    let config: GenimateConfig = toml::from_str(&contents)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", config);
    Ok(config)
}

/// Generates a commented-out default config file at the given path.
fn generate_default_config(path: &Path) {
    let default_content = r#"# Genimate Configuration
# All settings are optional; defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [general]
# provider = "gemini"                # "gemini" or "openrouter"
# model = "gemini-1.5-flash"
# max_output_tokens = 8192
# system_prompt = "You write Manim scripts."
# system_prompt_file = "prompt.md"   # Path relative to ~/.genimate/

# [gemini]
# api_key = "AIza..."                # Or set GEMINI_API_KEY env var
# base_url = "https://generativelanguage.googleapis.com/v1beta"

# [openrouter]
# api_key = "sk-or-..."              # Or set OPENROUTER_API_KEY env var
# base_url = "https://openrouter.ai/api/v1"

# [render]
# is_prod = false                    # Or set IS_PROD=true
# local_url = "http://localhost:8080"
# prod_url = "https://render.example.com"
# request_timeout_secs = 60

# [gateway]
# bind = "127.0.0.1:3000"

# [client]
# gateway_url = "http://127.0.0.1:3000"
# poll_interval_ms = 2000
# poll_max_attempts = 150
"#;

    if let Some(parent) = path.parent() {
        if let Err(e) = fs::create_dir_all(parent) {
            warn!("Failed to create config directory: {}", e);
            return;
        }
    }
    if let Err(e) = fs::write(path, default_content) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
pub fn resolve(config: &GenimateConfig, cli: CliOverrides<'_>) -> Result<ResolvedConfig, ConfigError> {
    resolve_with(config, cli, |key| std::env::var(key).ok())
}

/// Same as [`resolve`], reading environment variables through `env`.
pub fn resolve_with(
    config: &GenimateConfig,
    cli: CliOverrides<'_>,
    env: impl Fn(&str) -> Option<String>,
) -> Result<ResolvedConfig, ConfigError> {
    // Provider: CLI → env → config → default
    let provider = match cli.provider {
        Some(p) => p,
        None => match env("GENIMATE_PROVIDER").or_else(|| config.general.provider.clone()) {
            Some(name) => Provider::from_str(&name, true)
                .map_err(|_| ConfigError::UnknownProvider(name))?,
            None => Provider::default(),
        },
    };

    // Model: env → config → provider default
    let model = env("GENIMATE_MODEL")
        .or_else(|| config.general.model.clone())
        .unwrap_or_else(|| match provider {
            Provider::Gemini => DEFAULT_GEMINI_MODEL.to_string(),
            Provider::OpenRouter => DEFAULT_OPENROUTER_MODEL.to_string(),
        });

    // System prompt: inline config wins over file, both win over default
    let system_prompt = resolve_system_prompt(config, config_dir().as_deref());

    let gemini_api_key = env("GEMINI_API_KEY").or_else(|| config.gemini.api_key.clone());
    let gemini_base_url = env("GEMINI_BASE_URL")
        .or_else(|| config.gemini.base_url.clone())
        .unwrap_or_else(|| DEFAULT_GEMINI_BASE_URL.to_string());

    let openrouter_api_key =
        env("OPENROUTER_API_KEY").or_else(|| config.openrouter.api_key.clone());
    let openrouter_base_url = env("OPENROUTER_BASE_URL")
        .or_else(|| config.openrouter.base_url.clone())
        .unwrap_or_else(|| DEFAULT_OPENROUTER_BASE_URL.to_string());

    // Render service: RENDER_SERVICE_URL → (is_prod ? prod_url : local_url) → default
    let is_prod = env("IS_PROD")
        .map(|v| v.eq_ignore_ascii_case("true"))
        .or(config.render.is_prod)
        .unwrap_or(false);
    let render_url = env("RENDER_SERVICE_URL").unwrap_or_else(|| {
        let chosen = if is_prod {
            config.render.prod_url.clone().or_else(|| {
                warn!("is_prod is set but [render].prod_url is missing, using local_url");
                None
            })
        } else {
            None
        };
        chosen
            .or_else(|| config.render.local_url.clone())
            .unwrap_or_else(|| DEFAULT_RENDER_URL.to_string())
    });

    let bind = cli
        .bind
        .map(str::to_string)
        .or_else(|| env("GENIMATE_BIND"))
        .or_else(|| config.gateway.bind.clone())
        .unwrap_or_else(|| DEFAULT_BIND.to_string());

    let gateway_url = cli
        .gateway_url
        .map(str::to_string)
        .or_else(|| env("GENIMATE_GATEWAY_URL"))
        .or_else(|| config.client.gateway_url.clone())
        .unwrap_or_else(|| DEFAULT_GATEWAY_URL.to_string());

    let default_poll = PollPolicy::default();
    let poll = PollPolicy {
        interval: match config.client.poll_interval_ms {
            Some(0) => {
                return Err(ConfigError::NotPositive {
                    key: "[client].poll_interval_ms",
                });
            }
            Some(ms) => Duration::from_millis(ms),
            None => default_poll.interval,
        },
        max_attempts: match config.client.poll_max_attempts {
            Some(0) => {
                return Err(ConfigError::NotPositive {
                    key: "[client].poll_max_attempts",
                });
            }
            Some(n) => n,
            None => default_poll.max_attempts,
        },
    };

    Ok(ResolvedConfig {
        provider,
        model,
        max_output_tokens: config
            .general
            .max_output_tokens
            .unwrap_or(DEFAULT_MAX_OUTPUT_TOKENS),
        system_prompt,
        gemini_api_key,
        gemini_base_url,
        openrouter_api_key,
        openrouter_base_url,
        render_url,
        request_timeout: Duration::from_secs(
            config
                .render
                .request_timeout_secs
                .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS),
        ),
        bind,
        gateway_url,
        poll,
    })
}

/// Resolves the prompt template: inline wins over file, both win over default.
fn resolve_system_prompt(config: &GenimateConfig, dir: Option<&Path>) -> String {
    // Inline system_prompt takes priority
    if let Some(ref prompt) = config.general.system_prompt {
        return prompt.clone();
    }

    // Try loading from system_prompt_file (relative to ~/.genimate/)
    if let (Some(file), Some(dir)) = (&config.general.system_prompt_file, dir) {
        let prompt_path = dir.join(file);
        match fs::read_to_string(&prompt_path) {
            Ok(contents) => {
                let trimmed = contents.trim().to_string();
                if !trimmed.is_empty() {
                    info!("Loaded system prompt from {}", prompt_path.display());
                    return trimmed;
                }
                warn!("System prompt file is empty: {}", prompt_path.display());
            }
            Err(e) => {
                warn!(
                    "Failed to read system prompt file {}: {}",
                    prompt_path.display(),
                    e
                );
            }
        }
    }

    DEFAULT_SYSTEM_PROMPT.to_string()
}
