pub mod extract;
pub mod prompt;
pub mod provider;
pub mod providers;

pub use extract::extract_code;
pub use prompt::{DEFAULT_SYSTEM_PROMPT, compose_prompt};
pub use provider::{CompletionProvider, CompletionRequest, ProviderError, ProviderErrorKind};
pub use providers::{GeminiProvider, OpenRouterProvider};
