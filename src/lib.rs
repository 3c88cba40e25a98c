//! Genimate: describe an animation in plain language, get a rendered Manim video.
//!
//! - `gateway`: HTTP service that turns descriptions into code and render jobs
//! - `core`: client-side lifecycle (submit, poll, present)
//! - `tui`: terminal front end over `core`

use clap::ValueEnum;

pub mod api;
pub mod core;
pub mod gateway;
pub mod inference;
pub mod render;
pub mod tui;

#[cfg(test)]
pub mod test_support;

/// Generative provider the gateway sends prompts to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum Provider {
    #[default]
    Gemini,
    #[value(name = "openrouter")]
    OpenRouter,
}

impl Provider {
    pub fn name(&self) -> &'static str {
        match self {
            Provider::Gemini => "gemini",
            Provider::OpenRouter => "openrouter",
        }
    }
}
