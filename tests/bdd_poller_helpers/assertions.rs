//! Assertion helpers for polling behavioural tests.

use rstest_bdd_macros::then;

use super::StepResult;
use super::state::{PollOutcome, PollerState};

fn outcome(poller_state: &PollerState) -> StepResult<PollOutcome> {
    poller_state
        .outcome
        .get()
        .ok_or_else(|| String::from("a poll should have run"))
}

#[then("the poller fetched {expected} times")]
fn poller_fetched_times(poller_state: &PollerState, expected: usize) -> StepResult<()> {
    let fetches = poller_state
        .fetches
        .get()
        .ok_or_else(|| String::from("a poll should have run"))?;
    if fetches == expected {
        Ok(())
    } else {
        Err(format!("expected {expected} fetches, got {fetches}"))
    }
}

#[then("the poller observed {phase}")]
fn poller_observed_phase(poller_state: &PollerState, phase: String) -> StepResult<()> {
    match outcome(poller_state)? {
        PollOutcome::Phase(observed) if observed == phase => Ok(()),
        other => Err(format!("expected phase {phase}, got {other:?}")),
    }
}

#[then("the stop poller reports an unexpected terminal phase")]
fn stop_poller_reports_unexpected(poller_state: &PollerState) -> StepResult<()> {
    match outcome(poller_state)? {
        PollOutcome::UnexpectedPhase { expected, observed } => {
            if expected == "STOPPED" && observed != "STOPPED" {
                Ok(())
            } else {
                Err(format!(
                    "unexpected phase report was expected={expected}, observed={observed}"
                ))
            }
        }
        other => Err(format!("expected an unexpected-phase report, got {other:?}")),
    }
}

#[then("the poller reports an API failure")]
fn poller_reports_api_failure(poller_state: &PollerState) -> StepResult<()> {
    match outcome(poller_state)? {
        PollOutcome::ApiFailure(_) => Ok(()),
        other => Err(format!("expected an API failure, got {other:?}")),
    }
}

#[then("both agent endpoints are resolved")]
fn both_agent_endpoints_resolved(poller_state: &PollerState) -> StepResult<()> {
    match outcome(poller_state)? {
        PollOutcome::Agents { exec, ws } if !exec.is_empty() && !ws.is_empty() => Ok(()),
        other => Err(format!("expected resolved agent endpoints, got {other:?}")),
    }
}

#[then("the exec agent URL gains the process suffix")]
fn exec_agent_url_gains_process_suffix(poller_state: &PollerState) -> StepResult<()> {
    match outcome(poller_state)? {
        PollOutcome::Agents { exec, .. } if exec.ends_with("/process") => Ok(()),
        other => Err(format!("expected a /process exec URL, got {other:?}")),
    }
}

#[then("the poller reports attempts exhausted")]
fn poller_reports_attempts_exhausted(poller_state: &PollerState) -> StepResult<()> {
    match outcome(poller_state)? {
        PollOutcome::Exhausted(_) => Ok(()),
        other => Err(format!("expected attempts exhausted, got {other:?}")),
    }
}
