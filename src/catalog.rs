//! Stack/sample catalogue join and command planning.
//!
//! Two catalogues are fetched per run: the stack templates offered by the
//! workspace server and the sample projects hosted on a static location. They
//! are joined by case-insensitive tag intersection into [`PlannedRun`]s, each
//! carrying the ordered command list a scenario will execute. The catalogue is
//! an explicitly constructed value owned by the test run; nothing here is
//! process-wide state.

use serde_json::Value;

use crate::api::WorkspaceClient;
use crate::api::types::{CommandDef, Sample, Stack};
use crate::error::ApiError;

/// Target of the `${current.project.path}` placeholder, prefixed to the
/// sample's project path.
const PROJECTS_ROOT: &str = "/projects";

/// Target of the `${GAE}` placeholder.
const GAE_HOME: &str = "/home/user/google_appengine";

/// Target of the `$TOMCAT_HOME` placeholder.
const TOMCAT_HOME: &str = "/home/user/tomcat8";

/// The fetched stack and sample catalogues for one test run.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    /// Stack templates offered by the workspace server.
    pub stacks: Vec<Stack>,

    /// Sample project descriptors from the static catalogue.
    pub samples: Vec<Sample>,
}

/// A joined stack/sample pairing with its ordered command list.
#[derive(Debug, Clone)]
pub struct PlannedRun {
    /// The stack the workspace will be created from.
    pub stack_id: String,

    /// The stack's environment configuration blob, forwarded at start time.
    pub environments: Value,

    /// The sample project seeded into the workspace.
    pub sample: Sample,

    /// Sample and stack commands, build-named commands first.
    pub commands: Vec<CommandDef>,
}

impl PlannedRun {
    /// Looks up a planned command by name.
    #[must_use]
    pub fn command_named(&self, name: &str) -> Option<&CommandDef> {
        self.commands.iter().find(|command| command.name == name)
    }
}

impl Catalog {
    /// Builds a catalogue from already-fetched stacks and samples.
    #[must_use]
    pub const fn new(stacks: Vec<Stack>, samples: Vec<Sample>) -> Self {
        Self { stacks, samples }
    }

    /// Fetches both catalogues from their remote locations.
    ///
    /// # Errors
    ///
    /// A transport or decode failure on either catalogue fails the whole run.
    pub async fn fetch(client: &WorkspaceClient, samples_url: &str) -> Result<Self, ApiError> {
        let stacks = client.fetch_stacks().await?;
        let samples = client.fetch_samples(samples_url).await?;
        Ok(Self::new(stacks, samples))
    }

    /// Joins the two catalogues into planned runs.
    ///
    /// A sample applies to a stack when the two share at least one
    /// case-insensitive tag, when either side's tag matches the lower-cased
    /// `filter_tag`, or when either side declares no tags at all. Each
    /// pairing's command list is the sample's commands followed by the
    /// stack's, reordered so build-named commands run first.
    #[must_use]
    pub fn pairings(&self, filter_tag: Option<&str>) -> Vec<PlannedRun> {
        let mut runs = Vec::new();
        for stack in &self.stacks {
            for sample in &self.samples {
                if !tags_applicable(&stack.tags, &sample.tags, filter_tag) {
                    continue;
                }

                let mut commands = sample.commands.clone();
                commands.extend(stack.commands.iter().cloned());

                runs.push(PlannedRun {
                    stack_id: stack.id.clone(),
                    environments: stack.config.environments.clone(),
                    sample: sample.clone(),
                    commands: order_commands(commands),
                });
            }
        }
        runs
    }

    /// Returns the planned run for a specific stack/sample pairing, if the
    /// pairing is applicable.
    #[must_use]
    pub fn planned_run(
        &self,
        stack_id: &str,
        sample_path: &str,
        filter_tag: Option<&str>,
    ) -> Option<PlannedRun> {
        self.pairings(filter_tag)
            .into_iter()
            .find(|run| run.stack_id == stack_id && run.sample.path == sample_path)
    }
}

/// Classifies whether a stack/sample pairing is applicable.
fn tags_applicable(stack_tags: &[String], sample_tags: &[String], filter_tag: Option<&str>) -> bool {
    if stack_tags.is_empty() || sample_tags.is_empty() {
        return true;
    }

    let filter = filter_tag.map(str::to_lowercase);
    let matches_filter =
        |tag: &String| filter.as_deref().is_some_and(|f| tag.to_lowercase() == f);

    let shared = stack_tags.iter().any(|stack_tag| {
        sample_tags
            .iter()
            .any(|sample_tag| stack_tag.eq_ignore_ascii_case(sample_tag))
    });

    shared || stack_tags.iter().any(matches_filter) || sample_tags.iter().any(matches_filter)
}

/// Reorders a command list so that every command whose name contains `build`
/// comes first.
///
/// The reorder is a stable partition: relative order is preserved both among
/// the build-named commands and among the rest. A project must be built before
/// its other commands can succeed.
#[must_use]
pub fn order_commands(commands: Vec<CommandDef>) -> Vec<CommandDef> {
    let (mut builds, rest): (Vec<CommandDef>, Vec<CommandDef>) = commands
        .into_iter()
        .partition(|command| command.name.contains("build"));
    builds.extend(rest);
    builds
}

/// Substitutes the known placeholder tokens in a command line.
///
/// `${current.project.path}` becomes `/projects{sample_path}`, `${GAE}` the
/// App Engine home, and `$TOMCAT_HOME` the Tomcat home. Lines without
/// placeholders are returned unchanged.
#[must_use]
pub fn expand_command_line(line: &str, sample_path: &str) -> String {
    line.replace(
        "${current.project.path}",
        &format!("{PROJECTS_ROOT}{sample_path}"),
    )
    .replace("${GAE}", GAE_HOME)
    .replace("$TOMCAT_HOME", TOMCAT_HOME)
}

/// Expands placeholders in a command relative to a sample path.
///
/// Returns a copy of the command with its command line run through
/// [`expand_command_line`], ready to post to the exec agent.
#[must_use]
pub fn prepare_command(command: &CommandDef, sample_path: &str) -> CommandDef {
    CommandDef {
        name: command.name.clone(),
        command_line: expand_command_line(&command.command_line, sample_path),
        kind: command.kind.clone(),
    }
}
