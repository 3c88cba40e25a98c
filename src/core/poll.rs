//! # Job Polling
//!
//! Bounded wait for a render job to reach a terminal state. Each tick sleeps
//! for `interval`, then issues one status query and waits for its answer, so
//! ticks never overlap. Cancellation is the caller's job: abort the task that
//! runs [`poll_job`].

use std::time::Duration;

use async_trait::async_trait;
use log::{debug, info, warn};
use thiserror::Error;

use crate::api::{ClientError, GatewayClient};
use crate::render::JobStatus;

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(2000);
pub const DEFAULT_POLL_MAX_ATTEMPTS: u32 = 150;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    pub interval: Duration,
    pub max_attempts: u32,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval: DEFAULT_POLL_INTERVAL,
            max_attempts: DEFAULT_POLL_MAX_ATTEMPTS,
        }
    }
}

impl PollPolicy {
    /// Longest time a poll can run before timing out.
    pub fn max_wait(&self) -> Duration {
        self.interval * self.max_attempts
    }
}

#[derive(Debug, Error)]
pub enum PollError {
    #[error("Timed out waiting for job {job_id} after {attempts} status checks")]
    Timeout { job_id: String, attempts: u32 },
    #[error(transparent)]
    Request(#[from] ClientError),
}

/// Anything that can report a job snapshot.
#[async_trait]
pub trait StatusSource: Send + Sync {
    async fn job_status(&self, job_id: &str) -> Result<JobStatus, ClientError>;
}

#[async_trait]
impl StatusSource for GatewayClient {
    async fn job_status(&self, job_id: &str) -> Result<JobStatus, ClientError> {
        self.status(job_id).await
    }
}

/// Polls `job_id` until it completes or fails, reporting every snapshot
/// (terminal ones included) to `on_status`.
pub async fn poll_job<S, F>(
    source: &S,
    job_id: &str,
    policy: PollPolicy,
    mut on_status: F,
) -> Result<JobStatus, PollError>
where
    S: StatusSource + ?Sized,
    F: FnMut(&JobStatus),
{
    info!(
        "Polling job {} every {:?} (max {} attempts, gives up after {:?})",
        job_id,
        policy.interval,
        policy.max_attempts,
        policy.max_wait()
    );

    for attempt in 1..=policy.max_attempts {
        tokio::time::sleep(policy.interval).await;

        let status = source.job_status(job_id).await.map_err(|e| {
            warn!("Status check {} for job {} failed: {}", attempt, job_id, e);
            PollError::Request(e)
        })?;
        debug!("Job {} attempt {}: {}", job_id, attempt, status.label());

        on_status(&status);
        if status.is_terminal() {
            info!("Job {} finished after {} checks: {}", job_id, attempt, status.label());
            return Ok(status);
        }
    }

    warn!("Job {} still running after {} checks", job_id, policy.max_attempts);
    Err(PollError::Timeout {
        job_id: job_id.to_string(),
        attempts: policy.max_attempts,
    })
}
