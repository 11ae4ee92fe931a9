//! Canonical data-transfer types for the workspace and agent REST APIs.
//!
//! One schema serves every operation in [`crate::api`]; the harness never
//! redefines a response shape per call site. Fields the harness does not
//! inspect (notably the environment configuration blob) are carried as opaque
//! [`serde_json::Value`]s and forwarded untouched.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A named command attached to a stack or sample.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandDef {
    /// The command name shown in the workspace UI (e.g. `"build"`).
    pub name: String,

    /// The shell command line, possibly containing placeholder tokens.
    #[serde(rename = "commandLine")]
    pub command_line: String,

    /// The command type (e.g. `"mvn"`, `"custom"`).
    #[serde(rename = "type", default)]
    pub kind: String,
}

/// The source location of a sample project.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SampleSource {
    /// The source type (e.g. `"git"`).
    #[serde(rename = "type", default)]
    pub kind: String,

    /// The repository location.
    #[serde(default)]
    pub location: String,
}

/// A sample project descriptor from the samples catalogue.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sample {
    /// The sample name.
    #[serde(default)]
    pub name: String,

    /// Where the sample's sources live.
    #[serde(default)]
    pub source: SampleSource,

    /// Commands the sample defines.
    #[serde(default)]
    pub commands: Vec<CommandDef>,

    /// Tags used to match the sample against stacks.
    #[serde(default)]
    pub tags: Vec<String>,

    /// The project path the sample is imported under (e.g. `"/web-java-spring"`).
    #[serde(default)]
    pub path: String,

    /// The project type reported to the workspace agent.
    #[serde(rename = "projectType", default)]
    pub project_type: String,
}

/// The workspace configuration embedded in a stack descriptor.
///
/// The environment set is opaque to the harness: it is fetched from the stack
/// catalogue and forwarded verbatim (minus one known-problematic agent
/// reference) in the workspace-creation payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StackConfig {
    /// The environment configuration blob, keyed by environment name.
    #[serde(default)]
    pub environments: Value,

    /// The configuration name.
    #[serde(default)]
    pub name: String,

    /// The name of the default environment.
    #[serde(rename = "defaultEnv", default)]
    pub default_env: String,

    /// Commands the stack defines.
    #[serde(default)]
    pub commands: Vec<CommandDef>,
}

/// A stack (environment template) descriptor from the stack catalogue.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stack {
    /// The server-assigned stack identifier.
    #[serde(default)]
    pub id: String,

    /// The human-readable stack name.
    #[serde(default)]
    pub name: String,

    /// The workspace configuration used to create instances of this stack.
    #[serde(rename = "workspaceConfig", default)]
    pub config: StackConfig,

    /// Tags used to match the stack against samples.
    #[serde(default)]
    pub tags: Vec<String>,

    /// Commands the stack defines in addition to its configuration.
    #[serde(default)]
    pub commands: Vec<CommandDef>,
}

/// The payload posted to create (and immediately start) a workspace.
#[derive(Debug, Clone, Serialize)]
pub struct CreateWorkspaceRequest {
    /// The environment configuration blob, forwarded from the stack.
    pub environments: Value,

    /// The namespace the workspace is created in.
    pub namespace: String,

    /// The workspace name.
    pub name: String,

    /// The name of the default environment.
    #[serde(rename = "defaultEnv")]
    pub default_env: String,

    /// Projects to pre-declare (always empty; samples are imported later).
    pub projects: Vec<Value>,
}

/// The workspace-creation response; only the instance identifier matters.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreatedWorkspace {
    /// The server-assigned workspace instance identifier.
    #[serde(default)]
    pub id: String,
}

/// The lifecycle phase of a workspace instance as reported by the server.
///
/// Transitions are externally driven and strictly observed; the harness never
/// computes a phase locally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WorkspacePhase {
    /// The workspace is booting.
    Starting,
    /// The workspace is up and its agents are reachable (or soon will be).
    Running,
    /// The workspace is persisting state on the way down.
    Snapshotting,
    /// The workspace is shutting down.
    Stopping,
    /// The workspace has fully stopped.
    Stopped,
    /// Any phase string this harness does not recognise.
    #[serde(other)]
    Unknown,
}

impl WorkspacePhase {
    /// Returns the canonical wire representation of the phase.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Starting => "STARTING",
            Self::Running => "RUNNING",
            Self::Snapshotting => "SNAPSHOTTING",
            Self::Stopping => "STOPPING",
            Self::Stopped => "STOPPED",
            Self::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for WorkspacePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A workspace status response.
#[derive(Debug, Clone, Deserialize)]
pub struct StatusReport {
    /// The current lifecycle phase.
    pub status: WorkspacePhase,
}

/// A server entry inside a runtime descriptor's machine map.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServerEntry {
    /// The server's base URL.
    #[serde(default)]
    pub url: String,

    /// The server reference name (legacy runtime shape only).
    #[serde(rename = "ref", default)]
    pub reference: String,
}

/// The servers exposed by a single machine.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MachineServers {
    /// Servers keyed by reference (e.g. `"exec-agent/http"`).
    #[serde(default)]
    pub servers: HashMap<String, ServerEntry>,
}

/// A workspace's runtime descriptor, fetched when resolving agent URLs.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RuntimeDescriptor {
    /// The runtime block of a running workspace; absent until the workspace
    /// is up.
    #[serde(default)]
    pub runtime: RuntimeMachines,
}

/// The machine collection inside a runtime block.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RuntimeMachines {
    /// The machines of the runtime, in whichever shape the server publishes.
    #[serde(default)]
    pub machines: MachineSet,
}

/// The two machine-collection shapes the server is known to publish.
///
/// Newer servers key machines by name with reference-keyed server maps;
/// older ones publish a machine list whose servers carry a `ref` tag. Which
/// shape arrives depends on the server version, so both decode here and the
/// endpoint scan treats them uniformly. A body matching neither shape is a
/// decode failure.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum MachineSet {
    /// Machines keyed by machine name.
    Modern(HashMap<String, MachineServers>),
    /// The older machine list with nested per-machine runtime blocks.
    Legacy(Vec<LegacyMachine>),
}

impl Default for MachineSet {
    fn default() -> Self {
        Self::Modern(HashMap::new())
    }
}

/// A machine entry in the legacy runtime shape.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LegacyMachine {
    /// The nested per-machine runtime block holding the server map.
    #[serde(default)]
    pub runtime: MachineServers,
}

/// The agent endpoint URLs resolved from a runtime descriptor.
///
/// Either field may be empty while the workspace agents are still coming up;
/// callers poll [`crate::poll::resolve_agents`] until both are populated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AgentEndpoints {
    /// The exec-agent base URL (process execution).
    pub exec_agent_url: String,

    /// The wsagent base URL (project-file operations).
    pub ws_agent_url: String,
}

impl AgentEndpoints {
    /// Returns whether both agent URLs have been resolved.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        !self.exec_agent_url.is_empty() && !self.ws_agent_url.is_empty()
    }
}

/// A process descriptor returned by the exec agent.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProcessDescriptor {
    /// The agent-assigned process identifier.
    #[serde(default)]
    pub pid: u64,

    /// The command name the process was started from.
    #[serde(default)]
    pub name: String,

    /// The command line the process is running.
    #[serde(rename = "commandLine", default)]
    pub command_line: String,

    /// Whether the process is still running.
    #[serde(default)]
    pub alive: bool,

    /// The native PID inside the workspace.
    #[serde(rename = "nativePid", default)]
    pub native_pid: u64,

    /// The exit code, meaningful once `alive` is false. A value above zero at
    /// any observation triggers a diagnostic log fetch.
    #[serde(rename = "exitCode", default)]
    pub exit_code: i64,
}

/// A single log entry from the exec agent's per-process log endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LogEntry {
    /// The log entry kind discriminator.
    #[serde(default)]
    pub kind: i64,

    /// The server-side timestamp, carried verbatim.
    #[serde(default)]
    pub time: String,

    /// The log line text.
    #[serde(default)]
    pub text: String,
}
