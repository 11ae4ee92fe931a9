//! Scenario state for polling behavioural tests.

use rstest::fixture;
use rstest_bdd::Slot;
use rstest_bdd_macros::ScenarioState;

/// High-level outcome observed after a poll completes.
#[derive(Debug, Clone)]
pub(crate) enum PollOutcome {
    /// The poll finished on the named phase.
    Phase(String),
    /// The poll confirmed the workspace stopped.
    Stopped,
    /// The poll aborted on an API failure.
    ApiFailure(String),
    /// The poll resolved both agent endpoint URLs.
    Agents {
        /// The resolved exec-agent URL.
        exec: String,
        /// The resolved wsagent URL.
        ws: String,
    },
    /// The poll ran out of attempts.
    Exhausted(u32),
    /// The poll finished on a terminal phase other than the expected one.
    UnexpectedPhase {
        /// The phase the poll required.
        expected: String,
        /// The phase the poll observed.
        observed: String,
    },
}

/// Shared scenario state for polling behavioural tests.
#[derive(Default, ScenarioState)]
pub(crate) struct PollerState {
    /// The scripted workspace status sequence, one phase per fetch.
    pub(crate) phases: Slot<Vec<String>>,

    /// Whether the status endpoint should answer 500 instead.
    pub(crate) server_error: Slot<bool>,

    /// Whether the runtime descriptor should stay without agent endpoints.
    pub(crate) empty_runtime: Slot<bool>,

    /// Whether the runtime descriptor should use the older `ref`-keyed shape.
    pub(crate) legacy_runtime: Slot<bool>,

    /// Outcome of the poll under test.
    pub(crate) outcome: Slot<PollOutcome>,

    /// Number of status fetches the server received.
    pub(crate) fetches: Slot<usize>,
}

/// Fixture providing fresh state for each polling scenario.
#[fixture]
pub(crate) fn poller_state() -> PollerState {
    let state = PollerState::default();
    state.server_error.set(false);
    state.empty_runtime.set(false);
    state.legacy_runtime.set(false);
    state
}
