//! Wait-for-asynchronous-state-transition routines.
//!
//! Workspace and process state transitions are driven entirely by the remote
//! system; this module only observes them, blocking the scenario until a
//! terminal state is reached. The contract is deliberately narrow: fetch the
//! status through a caller-supplied operation, sleep a fixed interval while
//! the classifier reports the observation as transient, and return the first
//! non-transient observation. A fetch error aborts the poll immediately —
//! network failures are never retried, only state transitions are.
//!
//! Pollers that can legitimately spin forever (agent-endpoint resolution)
//! carry an attempt bound and fail with [`PollError::AttemptsExhausted`]
//! rather than hanging the scenario.

use std::time::Duration;

use tracing::debug;

use crate::api::types::{AgentEndpoints, LogEntry, ProcessDescriptor, WorkspacePhase};
use crate::api::{AgentClient, WorkspaceClient};
use crate::error::{ApiError, PollError};

/// How a poll waits: the fixed interval between fetches, an optional attempt
/// bound, and an optional settle wait applied once after the final transient
/// observation.
#[derive(Debug, Clone, Copy)]
pub struct PollPlan {
    interval: Duration,
    max_attempts: Option<u32>,
    settle: Option<Duration>,
}

impl PollPlan {
    /// Creates a plan polling at the given fixed interval, unbounded and
    /// without a settle wait.
    #[must_use]
    pub const fn new(interval: Duration) -> Self {
        Self {
            interval,
            max_attempts: None,
            settle: None,
        }
    }

    /// Bounds the poll to at most `attempts` fetches.
    #[must_use]
    pub const fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = Some(attempts);
        self
    }

    /// Adds one unconditional wait after the last transient observation,
    /// before the final classification.
    #[must_use]
    pub const fn with_settle(mut self, settle: Duration) -> Self {
        self.settle = Some(settle);
        self
    }

    /// Returns the fixed interval between fetches.
    #[must_use]
    pub const fn interval(&self) -> Duration {
        self.interval
    }
}

/// Polls a caller-supplied fetch operation until it yields a non-transient
/// observation.
///
/// `waiting_for` describes the awaited condition in error messages. The
/// classifier sees every observation; the first one it does not classify as
/// transient is returned (after the plan's settle wait, if any).
///
/// # Errors
///
/// Returns [`PollError::Api`] as soon as a fetch fails and
/// [`PollError::AttemptsExhausted`] when a bounded plan runs out of attempts
/// while the observation is still transient.
pub async fn poll_until<T, F, Fut, P>(
    plan: &PollPlan,
    waiting_for: &str,
    mut fetch: F,
    mut is_transient: P,
) -> Result<T, PollError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ApiError>>,
    P: FnMut(&T) -> bool,
{
    let mut attempts: u32 = 0;
    loop {
        attempts = attempts.saturating_add(1);
        let observation = fetch().await?;

        if !is_transient(&observation) {
            if let Some(settle) = plan.settle {
                tokio::time::sleep(settle).await;
            }
            return Ok(observation);
        }

        debug!(%waiting_for, attempts, "observation still transient");
        if plan.max_attempts.is_some_and(|max| attempts >= max) {
            return Err(PollError::AttemptsExhausted {
                attempts,
                waiting_for: waiting_for.to_owned(),
            });
        }
        tokio::time::sleep(plan.interval).await;
    }
}

/// Blocks until a starting workspace leaves the `STARTING` phase, returning
/// the phase it settled on.
///
/// # Errors
///
/// Returns [`PollError::Api`] if a status fetch fails.
pub async fn await_started(
    client: &WorkspaceClient,
    workspace_id: &str,
    plan: &PollPlan,
) -> Result<WorkspacePhase, PollError> {
    let waiting_for = format!("workspace {workspace_id} to start");
    poll_until(
        plan,
        &waiting_for,
        || client.workspace_status(workspace_id),
        |phase| *phase == WorkspacePhase::Starting,
    )
    .await
}

/// Blocks until a stopping workspace reaches `STOPPED`.
///
/// `SNAPSHOTTING` and `STOPPING` are transient. One unconditional settle wait
/// is imposed after the last transient observation (the remote system briefly
/// reports a stale phase on the way down); the plan's settle defaults to its
/// interval when unset.
///
/// # Errors
///
/// Returns [`PollError::UnexpectedState`] if the workspace settles on any
/// phase other than `STOPPED`, and [`PollError::Api`] if a status fetch
/// fails.
pub async fn await_stopped(
    client: &WorkspaceClient,
    workspace_id: &str,
    plan: &PollPlan,
) -> Result<(), PollError> {
    let effective = if plan.settle.is_some() {
        *plan
    } else {
        plan.with_settle(plan.interval)
    };

    let waiting_for = format!("workspace {workspace_id} to stop");
    let phase = poll_until(
        &effective,
        &waiting_for,
        || client.workspace_status(workspace_id),
        |phase| {
            matches!(
                phase,
                WorkspacePhase::Snapshotting | WorkspacePhase::Stopping
            )
        },
    )
    .await?;

    if phase == WorkspacePhase::Stopped {
        Ok(())
    } else {
        Err(PollError::UnexpectedState {
            expected: String::from(WorkspacePhase::Stopped.as_str()),
            observed: String::from(phase.as_str()),
        })
    }
}

/// The terminal observation of a posted command, with any diagnostic logs
/// captured along the way.
#[derive(Debug, Clone, Default)]
pub struct CommandObservation {
    /// The final process descriptor (`alive == false`).
    pub process: ProcessDescriptor,

    /// Logs fetched when an observation reported a non-zero exit code.
    /// Empty for clean runs; best-effort otherwise.
    pub failure_logs: Vec<LogEntry>,
}

/// Blocks until a posted process is no longer alive.
///
/// Every observation with an exit code above zero triggers a best-effort log
/// fetch for diagnostics; a failed log fetch never fails the poll.
///
/// # Errors
///
/// Returns [`PollError::Api`] if a status fetch fails and
/// [`PollError::AttemptsExhausted`] for bounded plans.
pub async fn await_process_exit(
    agent: &AgentClient,
    exec_agent_url: &str,
    pid: u64,
    plan: &PollPlan,
) -> Result<CommandObservation, PollError> {
    let waiting_for = format!("process {pid} to exit");
    poll_until(
        plan,
        &waiting_for,
        || async move {
            let process = agent.process_status(exec_agent_url, pid).await?;
            let failure_logs = if process.exit_code > 0 {
                agent
                    .process_logs(exec_agent_url, pid)
                    .await
                    .unwrap_or_default()
            } else {
                Vec::new()
            };
            Ok(CommandObservation {
                process,
                failure_logs,
            })
        },
        |observation| observation.process.alive,
    )
    .await
}

/// Polls the runtime descriptor until both agent endpoint URLs are published.
///
/// The plan must be bounded; exhausting it is an explicit failure rather than
/// an unbounded spin.
///
/// # Errors
///
/// Returns [`PollError::AttemptsExhausted`] if the endpoints never appear
/// within the plan's bound, and [`PollError::Api`] if a descriptor fetch or
/// decode fails.
pub async fn resolve_agents(
    client: &WorkspaceClient,
    workspace_id: &str,
    plan: &PollPlan,
) -> Result<AgentEndpoints, PollError> {
    let waiting_for = format!("agent endpoints for workspace {workspace_id}");
    poll_until(
        plan,
        &waiting_for,
        || client.agent_endpoints(workspace_id),
        |agents| !agents.is_complete(),
    )
    .await
}
