//! # Actions
//!
//! Everything that can happen in a session becomes an `Action`.
//! User presses Enter? That's `Action::Submit(text)`.
//! Gateway answers? That's `Action::GenerateSucceeded { .. }`.
//!
//! The `update()` function takes the current state and an action, mutates
//! the state and returns an `Effect` describing the I/O to perform next.
//! No side effects here. I/O happens in `session.rs`.
//!
//! ```text
//! State + Action  →  update()  →  New State + Effect
//! ```
//!
//! Results from background tasks carry the submission number (and job id) they
//! belong to. Anything that no longer matches the current submission is
//! dropped, so an abandoned job can never overwrite a newer one.

use log::{debug, info, warn};

use crate::api::{GenerateResponse, MAX_DESCRIPTION_CHARS};
use crate::core::state::{Phase, SessionState};
use crate::render::JobStatus;

/// Shown when a job fails without details.
pub const RENDER_FAILED_MESSAGE: &str = "Failed to render animation";

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Submit(String),
    GenerateSucceeded {
        submission: u64,
        response: GenerateResponse,
    },
    GenerateFailed {
        submission: u64,
        message: String,
    },
    StatusReceived {
        submission: u64,
        job_id: String,
        status: JobStatus,
    },
    PollFailed {
        submission: u64,
        job_id: String,
        message: String,
    },
    DismissError,
    Quit,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    None,
    /// Abandon any in-flight work and call the gateway.
    SpawnGenerate { submission: u64, description: String },
    StartPolling { submission: u64, job_id: String },
    StopPolling,
    Quit,
}

pub fn update(state: &mut SessionState, action: Action) -> Effect {
    match action {
        Action::Submit(text) => {
            if text.trim().is_empty() {
                state.status_message = String::from("Describe an animation first");
                return Effect::None;
            }
            if text.chars().count() > MAX_DESCRIPTION_CHARS {
                state.error = Some(format!(
                    "Description must be at most {MAX_DESCRIPTION_CHARS} characters"
                ));
                return Effect::None;
            }
            let submission = state.begin_submission();
            info!("Submission {} started", submission);
            Effect::SpawnGenerate {
                submission,
                description: text,
            }
        }

        Action::GenerateSucceeded {
            submission,
            response,
        } => {
            if submission != state.submission || state.phase != Phase::Submitting {
                debug!("Dropping stale generate result for submission {}", submission);
                return Effect::None;
            }
            state.code = response.code;

            if let Some(job_id) = response.job_id {
                state.phase = Phase::Polling;
                state.job_id = Some(job_id.clone());
                state.status_message = format!("Rendering job {job_id}...");
                return Effect::StartPolling { submission, job_id };
            }

            match response.video_path.filter(|path| !path.is_empty()) {
                Some(video_path) => {
                    complete(state, video_path, response.duration);
                }
                None => {
                    warn!("Gateway response had neither job id nor video path");
                    fail(state, String::from("Render service returned no job"));
                }
            }
            Effect::None
        }

        Action::GenerateFailed {
            submission,
            message,
        } => {
            if submission != state.submission || state.phase != Phase::Submitting {
                debug!("Dropping stale generate error for submission {}", submission);
                return Effect::None;
            }
            fail(state, message);
            Effect::None
        }

        Action::StatusReceived {
            submission,
            job_id,
            status,
        } => {
            if !is_current_job(state, submission, &job_id) {
                debug!("Dropping stale status for job {}", job_id);
                return Effect::None;
            }
            match status {
                JobStatus::Pending => {
                    state.progress = Some(0);
                    state.status_message = String::from("Queued for rendering...");
                    Effect::None
                }
                JobStatus::Processing { progress } => {
                    state.progress = progress.or(state.progress);
                    state.status_message = match progress {
                        Some(p) => format!("Rendering... {p}%"),
                        None => String::from("Rendering..."),
                    };
                    Effect::None
                }
                JobStatus::Unknown(label) => {
                    state.status_message = format!("Job status: {label}");
                    Effect::None
                }
                JobStatus::Completed {
                    code,
                    video_path,
                    duration_seconds,
                } => {
                    if let Some(code) = code {
                        state.code = code;
                    }
                    complete(state, video_path, duration_seconds);
                    Effect::StopPolling
                }
                JobStatus::Failed { details } => {
                    fail(
                        state,
                        details.unwrap_or_else(|| RENDER_FAILED_MESSAGE.to_string()),
                    );
                    Effect::StopPolling
                }
            }
        }

        Action::PollFailed {
            submission,
            job_id,
            message,
        } => {
            if !is_current_job(state, submission, &job_id) {
                debug!("Dropping stale poll error for job {}", job_id);
                return Effect::None;
            }
            fail(state, message);
            Effect::StopPolling
        }

        Action::DismissError => {
            state.error = None;
            Effect::None
        }

        Action::Quit => Effect::Quit,
    }
}

fn is_current_job(state: &SessionState, submission: u64, job_id: &str) -> bool {
    submission == state.submission
        && state.phase == Phase::Polling
        && state.job_id.as_deref() == Some(job_id)
}

fn complete(state: &mut SessionState, video_path: String, render_duration: Option<f64>) {
    state.phase = Phase::Completed;
    state.is_loading = false;
    state.job_id = None;
    state.progress = Some(100);
    state.video_path = Some(video_path);
    state.render_duration_seconds = render_duration;
    state.total_duration_seconds = state.elapsed_seconds();
    state.status_message = String::from("Animation ready");
    info!(
        "Submission {} completed: render={:?}s total={:?}s",
        state.submission, state.render_duration_seconds, state.total_duration_seconds
    );
}

fn fail(state: &mut SessionState, message: String) {
    warn!("Submission {} failed: {}", state.submission, message);
    state.phase = Phase::Failed;
    state.is_loading = false;
    state.job_id = None;
    state.error = Some(message);
    state.status_message = String::from("Something went wrong");
}
