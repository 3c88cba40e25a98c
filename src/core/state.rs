//! # Session State
//!
//! Everything the client knows about the current submission. Domain logic
//! only; presentation state lives in the `tui` module.
//!
//! ```text
//! SessionState
//! ├── phase: Phase                       // Idle → Submitting → Polling → Completed | Failed
//! ├── submission: u64                    // bumped on every submit
//! ├── is_loading: bool                   // generating or polling
//! ├── error: Option<String>              // dismissible message
//! ├── code: String                       // generated script
//! ├── video_path: Option<String>         // rendered artifact
//! ├── job_id: Option<String>             // job being polled
//! ├── render_duration_seconds: Option<f64>
//! ├── total_duration_seconds: Option<f64>
//! ├── started_at: Option<Instant>        // submit time
//! ├── progress: Option<u8>               // last reported render progress
//! └── status_message: String             // status bar text
//! ```
//!
//! State changes only happen through `update(state, action)` in action.rs.

use std::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Submitting,
    Polling,
    Completed,
    Failed,
}

impl Phase {
    pub fn label(&self) -> &'static str {
        match self {
            Phase::Idle => "Idle",
            Phase::Submitting => "Generating",
            Phase::Polling => "Rendering",
            Phase::Completed => "Done",
            Phase::Failed => "Failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Phase::Completed | Phase::Failed)
    }
}

#[derive(Debug, Clone, Default)]
pub struct SessionState {
    pub phase: Phase,
    pub submission: u64,
    pub is_loading: bool,
    pub error: Option<String>,
    pub code: String,
    pub video_path: Option<String>,
    pub job_id: Option<String>,
    pub render_duration_seconds: Option<f64>,
    pub total_duration_seconds: Option<f64>,
    pub started_at: Option<Instant>,
    pub progress: Option<u8>,
    pub status_message: String,
}

impl SessionState {
    pub fn new() -> Self {
        Self {
            status_message: String::from("Describe an animation to get started"),
            ..Default::default()
        }
    }

    /// Clears everything from the previous submission and starts a new one.
    pub(crate) fn begin_submission(&mut self) -> u64 {
        *self = Self {
            phase: Phase::Submitting,
            submission: self.submission + 1,
            is_loading: true,
            started_at: Some(Instant::now()),
            status_message: String::from("Generating Manim code..."),
            ..Default::default()
        };
        self.submission
    }

    /// Seconds since the current submission started.
    pub fn elapsed_seconds(&self) -> Option<f64> {
        self.started_at.map(|t| t.elapsed().as_secs_f64())
    }
}
