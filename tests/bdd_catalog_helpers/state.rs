//! Scenario state for catalogue-planning behavioural tests.

use rstest::fixture;
use rstest_bdd::Slot;
use rstest_bdd_macros::ScenarioState;

/// Shared scenario state for catalogue-planning behavioural tests.
#[derive(Default, ScenarioState)]
pub(crate) struct CatalogState {
    /// Tags declared on the stack under test.
    pub(crate) stack_tags: Slot<Vec<String>>,

    /// Tags declared on the sample under test.
    pub(crate) sample_tags: Slot<Vec<String>>,

    /// Number of planned runs the join produced.
    pub(crate) pairing_count: Slot<usize>,

    /// Command names fed to the ordering step.
    pub(crate) command_names: Slot<Vec<String>>,

    /// Command names after ordering.
    pub(crate) ordered_names: Slot<Vec<String>>,

    /// The command line fed to placeholder expansion.
    pub(crate) command_line: Slot<String>,

    /// The sample project path used for expansion.
    pub(crate) sample_path: Slot<String>,

    /// The expanded command line.
    pub(crate) expanded: Slot<String>,
}

/// Fixture providing fresh state for each catalogue scenario.
#[fixture]
pub(crate) fn catalog_state() -> CatalogState {
    CatalogState::default()
}
