//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::sync::Mutex;

use async_trait::async_trait;

use crate::inference::{CompletionProvider, CompletionRequest, ProviderError};

/// A provider that answers every request from a script instead of the network.
pub struct ScriptedProvider {
    reply: Box<dyn Fn() -> Result<String, ProviderError> + Send + Sync>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedProvider {
    /// Always answers with `text`.
    pub fn replying(text: &str) -> Self {
        let text = text.to_string();
        Self::with(move || Ok(text.clone()))
    }

    /// Always fails with whatever `make_error` builds.
    pub fn failing(make_error: impl Fn() -> ProviderError + Send + Sync + 'static) -> Self {
        Self::with(move || Err(make_error()))
    }

    fn with(reply: impl Fn() -> Result<String, ProviderError> + Send + Sync + 'static) -> Self {
        Self {
            reply: Box::new(reply),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Prompts received so far, oldest first.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionProvider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn complete(&self, request: CompletionRequest<'_>) -> Result<String, ProviderError> {
        self.prompts.lock().unwrap().push(request.prompt.to_string());
        (self.reply)()
    }
}

/// An HTTP 429 error as a provider would report it.
pub fn rate_limited(retry_after: Option<u64>) -> ProviderError {
    ProviderError::Api {
        status: 429,
        code: Some("RESOURCE_EXHAUSTED".to_string()),
        message: "Resource has been exhausted".to_string(),
        retry_after,
    }
}
