//! Tracks one analysis job to a terminal state by polling its status
//! endpoint.
//!
//! State machine:
//!
//! ```text
//!           start()
//!   idle ───────────► polling ──► completed
//!                        │  ▲
//!                        │  └── pending / processing / transient error
//!                        ├────► failed     (job failed, fatal error, timeout)
//!                        └────► cancelled  (cancel() or drop)
//! ```
//!
//! Guarantees:
//! - at most one status fetch is in flight at any time; the next one is
//!   scheduled only after the previous one resolves
//! - terminal states are absorbing: once `completed`, `failed` or
//!   `cancelled` is reached, no further transition happens; a fetch that
//!   resolves after cancellation has no effect
//! - total polling wall clock is bounded by [`PollPolicy::max_duration`];
//!   exceeding it fails the job with a timeout reason

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, warn};

use shared_types::{AnalysisResult, JobStatus};

use crate::api::ApiClient;
use crate::error::ClientError;

/// How the tracker schedules status fetches.
#[derive(Debug, Clone, Copy)]
pub struct PollPolicy {
    /// Delay between a resolved fetch and the next one.
    pub interval: Duration,
    /// Wall-clock cap on the whole poll.
    pub max_duration: Duration,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(2),
            max_duration: Duration::from_secs(300),
        }
    }
}

/// Client-visible state of a tracked analysis job.
#[derive(Debug, Clone)]
pub enum TrackerState {
    Idle,
    /// Waiting on the service; `polls` counts resolved status fetches.
    Polling { polls: u32 },
    Completed(Arc<AnalysisResult>),
    Failed(Arc<ClientError>),
    Cancelled,
}

impl TrackerState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            TrackerState::Completed(_) | TrackerState::Failed(_) | TrackerState::Cancelled
        )
    }
}

struct TrackerShared {
    state: Mutex<TrackerState>,
    tx: watch::Sender<TrackerState>,
}

impl TrackerShared {
    /// Single transition point. Terminal states are absorbing, which is
    /// what makes `cancel` idempotent and strips an in-flight fetch of
    /// any effect once cancellation has happened.
    fn transition(&self, next: TrackerState) -> bool {
        let mut state = self.state.lock().expect("tracker state lock poisoned");
        if state.is_terminal() {
            return false;
        }
        *state = next.clone();
        drop(state);
        let _ = self.tx.send(next);
        true
    }

    fn current(&self) -> TrackerState {
        self.state
            .lock()
            .expect("tracker state lock poisoned")
            .clone()
    }
}

/// One tracker per displayed analysis. Replacing it with a tracker for a
/// different id goes through `Drop`, which cancels the old poll, so two
/// pollers never feed the same view.
pub struct JobTracker {
    shared: Arc<TrackerShared>,
    rx: watch::Receiver<TrackerState>,
    task: JoinHandle<()>,
}

impl JobTracker {
    /// Transition `idle → polling` and spawn the polling task; the first
    /// status fetch is issued immediately.
    pub fn start(client: ApiClient, analysis_id: impl Into<String>, policy: PollPolicy) -> Self {
        let analysis_id = analysis_id.into();
        let (tx, rx) = watch::channel(TrackerState::Idle);
        let shared = Arc::new(TrackerShared {
            state: Mutex::new(TrackerState::Idle),
            tx,
        });
        shared.transition(TrackerState::Polling { polls: 0 });
        let task = tokio::spawn(poll_loop(client, analysis_id, policy, Arc::clone(&shared)));
        Self { shared, rx, task }
    }

    pub fn state(&self) -> TrackerState {
        self.shared.current()
    }

    /// Watch channel over state transitions.
    pub fn subscribe(&self) -> watch::Receiver<TrackerState> {
        self.rx.clone()
    }

    /// Stop polling. Idempotent, callable at any time; once this returns,
    /// no further state transition will happen even if a fetch is still
    /// in flight.
    pub fn cancel(&self) {
        if self.shared.transition(TrackerState::Cancelled) {
            debug!("analysis tracking cancelled");
        }
    }

    /// Wait for a terminal state and return it.
    pub async fn wait(mut self) -> TrackerState {
        loop {
            let current = self.shared.current();
            if current.is_terminal() {
                return current;
            }
            if self.rx.changed().await.is_err() {
                return self.shared.current();
            }
        }
    }
}

impl Drop for JobTracker {
    fn drop(&mut self) {
        self.shared.transition(TrackerState::Cancelled);
        // Nobody can observe this tracker anymore; reap the task instead
        // of letting it sleep out its tick.
        self.task.abort();
    }
}

async fn poll_loop(
    client: ApiClient,
    analysis_id: String,
    policy: PollPolicy,
    shared: Arc<TrackerShared>,
) {
    let deadline = Instant::now() + policy.max_duration;
    let mut polls: u32 = 0;
    let mut rx = shared.tx.subscribe();

    loop {
        if shared.current().is_terminal() {
            return;
        }

        let outcome = client.analysis_status(&analysis_id).await;
        polls += 1;

        // A cancel that landed while the fetch was in flight wins; the
        // resolved response must not move the state.
        if shared.current().is_terminal() {
            return;
        }

        match outcome {
            Ok(response) => match response.status {
                JobStatus::Pending | JobStatus::Processing => {
                    debug!(polls, status = ?response.status, "analysis still running");
                    shared.transition(TrackerState::Polling { polls });
                }
                JobStatus::Completed => {
                    match response.result {
                        Some(result) => {
                            shared.transition(TrackerState::Completed(Arc::new(result)));
                        }
                        None => {
                            shared
                                .transition(TrackerState::Failed(Arc::new(ClientError::MissingResult)));
                        }
                    }
                    return;
                }
                JobStatus::Failed => {
                    let reason = response
                        .error_message
                        .unwrap_or_else(|| "analysis failed".to_string());
                    shared.transition(TrackerState::Failed(Arc::new(ClientError::JobFailed(reason))));
                    return;
                }
            },
            Err(err) if err.is_transient() => {
                warn!(error = %err, "status fetch failed; retrying on next tick");
                shared.transition(TrackerState::Polling { polls });
            }
            Err(err) => {
                shared.transition(TrackerState::Failed(Arc::new(err)));
                return;
            }
        }

        if Instant::now() >= deadline {
            shared.transition(TrackerState::Failed(Arc::new(ClientError::PollTimeout {
                timeout: policy.max_duration,
            })));
            return;
        }

        // Sleep one tick, waking early if a cancel lands meanwhile.
        let tick = tokio::time::sleep(policy.interval);
        tokio::pin!(tick);
        loop {
            tokio::select! {
                _ = &mut tick => break,
                changed = rx.changed() => {
                    if changed.is_err() || rx.borrow().is_terminal() {
                        return;
                    }
                }
            }
        }
    }
}
