//! Scenario state for workspace lifecycle behavioural tests.

use std::sync::{Arc, Mutex};

use rstest::fixture;
use rstest_bdd::Slot;
use rstest_bdd_macros::ScenarioState;
use stackbench::catalog::PlannedRun;
use stackbench::session::StackSession;
use wiremock::MockServer;

/// Shared scenario state for workspace lifecycle behavioural tests.
///
/// The mock server, the tokio runtime it lives on, and the session survive
/// across steps; everything else is a plain observed value.
#[derive(Default, ScenarioState)]
pub(crate) struct LifecycleState {
    /// The runtime every async call in the scenario runs on. The mock
    /// server's background task lives here, so it must outlive the steps.
    pub(crate) runtime: Slot<Arc<tokio::runtime::Runtime>>,

    /// The mock workspace server.
    pub(crate) server: Slot<Arc<MockServer>>,

    /// The session driving the scenario's workspace.
    pub(crate) session: Slot<Arc<Mutex<StackSession>>>,

    /// The planned stack/sample run under test.
    pub(crate) planned: Slot<PlannedRun>,

    /// Exit code the mocked build command should report (0 = clean).
    pub(crate) fail_code: Slot<i64>,

    /// Project count observed after the sample import.
    pub(crate) import_count: Slot<usize>,

    /// Exit code observed after the command ran.
    pub(crate) exit_code: Slot<i64>,

    /// Log lines captured for a failing command.
    pub(crate) failure_logs: Slot<Vec<String>>,

    /// Whether the stop call completed with the workspace reporting STOPPED.
    pub(crate) stopped: Slot<bool>,

    /// HTTP status of the stop call.
    pub(crate) stop_status: Slot<u16>,

    /// HTTP status of the remove call.
    pub(crate) remove_status: Slot<u16>,
}

/// Fixture providing fresh state for each lifecycle scenario.
#[fixture]
pub(crate) fn lifecycle_state() -> LifecycleState {
    let state = LifecycleState::default();
    state.fail_code.set(0);
    state
}
