//! # Session Driver
//!
//! Runs the Lifecycle Coordinator: owns the [`SessionState`], feeds actions
//! through [`update`], and turns the resulting effects into tokio tasks.
//!
//! Background tasks never touch state. They report back as `Action`s over an
//! unbounded channel that the owner drains, either from a TUI loop
//! ([`Session::try_drain`]) or by awaiting ([`Session::next`]).
//!
//! At most one generate task and one poll task exist at a time. A new
//! submission aborts both before anything else is spawned.

use std::sync::Arc;

use log::{debug, info, warn};
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};
use tokio::task::AbortHandle;

use crate::api::GatewayClient;
use crate::core::action::{Action, Effect, update};
use crate::core::poll::{PollPolicy, poll_job};
use crate::core::state::SessionState;

pub struct Session {
    pub state: SessionState,
    client: Arc<GatewayClient>,
    policy: PollPolicy,
    tx: UnboundedSender<Action>,
    rx: UnboundedReceiver<Action>,
    generate_task: Option<AbortHandle>,
    poll_task: Option<AbortHandle>,
}

impl Session {
    pub fn new(client: Arc<GatewayClient>, policy: PollPolicy) -> Self {
        let (tx, rx) = unbounded_channel();
        Self {
            state: SessionState::new(),
            client,
            policy,
            tx,
            rx,
            generate_task: None,
            poll_task: None,
        }
    }

    pub fn gateway_url(&self) -> &str {
        self.client.base_url()
    }

    /// Applies `action` and performs whatever I/O it calls for.
    pub fn dispatch(&mut self, action: Action) -> Effect {
        debug!("Session received: {:?}", action);
        let effect = update(&mut self.state, action);
        self.apply(&effect);
        effect
    }

    fn apply(&mut self, effect: &Effect) {
        match effect {
            Effect::None => {}
            Effect::SpawnGenerate {
                submission,
                description,
            } => {
                self.abort_all();
                self.spawn_generate(*submission, description.clone());
            }
            Effect::StartPolling { submission, job_id } => {
                self.stop_polling();
                self.spawn_poll(*submission, job_id.clone());
            }
            Effect::StopPolling => self.stop_polling(),
            Effect::Quit => self.abort_all(),
        }
    }

    /// Applies every action already waiting. Returns true if any arrived.
    pub fn try_drain(&mut self) -> bool {
        let mut any = false;
        while let Ok(action) = self.rx.try_recv() {
            any = true;
            self.dispatch(action);
        }
        any
    }

    /// Waits for the next background result and applies it.
    pub async fn next(&mut self) -> Option<Effect> {
        let action = self.rx.recv().await?;
        Some(self.dispatch(action))
    }

    /// Submits `description` and drives the session to a terminal state.
    pub async fn run(&mut self, description: &str) -> &SessionState {
        let effect = self.dispatch(Action::Submit(description.to_string()));
        if matches!(effect, Effect::SpawnGenerate { .. }) {
            while !self.state.phase.is_terminal() {
                if self.next().await.is_none() {
                    break;
                }
            }
        }
        &self.state
    }

    fn spawn_generate(&mut self, submission: u64, description: String) {
        info!("Spawning generate request for submission {}", submission);
        let client = self.client.clone();
        let tx = self.tx.clone();

        let handle = tokio::spawn(async move {
            let action = match client.generate(&description).await {
                Ok(response) => Action::GenerateSucceeded {
                    submission,
                    response,
                },
                Err(e) => Action::GenerateFailed {
                    submission,
                    message: e.to_string(),
                },
            };
            if tx.send(action).is_err() {
                warn!("Failed to send generate result: receiver dropped");
            }
        });
        self.generate_task = Some(handle.abort_handle());
    }

    fn spawn_poll(&mut self, submission: u64, job_id: String) {
        info!("Spawning poller for job {} (submission {})", job_id, submission);
        let client = self.client.clone();
        let tx = self.tx.clone();
        let policy = self.policy;

        let handle = tokio::spawn(async move {
            let result = poll_job(client.as_ref(), &job_id, policy, |status| {
                let action = Action::StatusReceived {
                    submission,
                    job_id: job_id.clone(),
                    status: status.clone(),
                };
                if tx.send(action).is_err() {
                    warn!("Failed to send job status: receiver dropped");
                }
            })
            .await;

            if let Err(e) = result {
                let action = Action::PollFailed {
                    submission,
                    job_id: job_id.clone(),
                    message: e.to_string(),
                };
                if tx.send(action).is_err() {
                    warn!("Failed to send poll error: receiver dropped");
                }
            }
        });
        self.poll_task = Some(handle.abort_handle());
    }

    fn stop_polling(&mut self) {
        if let Some(handle) = self.poll_task.take() {
            debug!("Stopping poller");
            handle.abort();
        }
    }

    fn abort_all(&mut self) {
        if let Some(handle) = self.generate_task.take() {
            handle.abort();
        }
        self.stop_polling();
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.abort_all();
    }
}
