//! Per-scenario workspace lifecycle session.
//!
//! A [`StackSession`] owns the clients and the mutable state of one scenario:
//! the workspace instance it started, the agent endpoints it resolved, the
//! outcome of the last command, and the HTTP statuses of the teardown calls.
//! Lifecycle methods run strictly in sequence; a scenario drives exactly one
//! session at a time, and a session drives exactly one workspace.
//!
//! Driving the methods out of order (importing a sample before starting a
//! workspace, say) is a scenario bug and surfaces as
//! [`SessionError::OutOfOrder`] rather than a panic.

use tracing::info;

use crate::api::types::{AgentEndpoints, CommandDef, Sample, WorkspacePhase};
use crate::api::{AgentClient, WorkspaceClient};
use crate::catalog::{self, PlannedRun};
use crate::config::PollingConfig;
use crate::error::{PollError, Result, SessionError};
use crate::poll::{
    CommandObservation, await_process_exit, await_started, await_stopped, resolve_agents,
};

/// The HTTP status confirming a removed workspace is gone.
const NOT_FOUND: u16 = 404;

/// The runtime session of one behavioural scenario.
#[derive(Debug)]
pub struct StackSession {
    client: WorkspaceClient,
    agent: AgentClient,
    namespace: String,
    polling: PollingConfig,
    workspace_id: Option<String>,
    agents: Option<AgentEndpoints>,
    sample: Option<Sample>,
    last_run: Option<CommandObservation>,
    stop_status: Option<u16>,
    remove_status: Option<u16>,
}

impl StackSession {
    /// Creates a session over the given client, namespace, and polling
    /// cadences.
    #[must_use]
    pub fn new(client: WorkspaceClient, namespace: &str, polling: PollingConfig) -> Self {
        let agent = client.agent_client();
        Self {
            client,
            agent,
            namespace: namespace.to_owned(),
            polling,
            workspace_id: None,
            agents: None,
            sample: None,
            last_run: None,
            stop_status: None,
            remove_status: None,
        }
    }

    /// The workspace instance identifier, once [`Self::start`] has succeeded.
    #[must_use]
    pub fn workspace_id(&self) -> Option<&str> {
        self.workspace_id.as_deref()
    }

    /// The resolved agent endpoints, once [`Self::start`] has succeeded.
    #[must_use]
    pub const fn agents(&self) -> Option<&AgentEndpoints> {
        self.agents.as_ref()
    }

    /// The outcome of the most recent [`Self::run_command`].
    #[must_use]
    pub const fn last_run(&self) -> Option<&CommandObservation> {
        self.last_run.as_ref()
    }

    /// The HTTP status returned by the stop call, once [`Self::stop`] has run.
    #[must_use]
    pub const fn stop_status(&self) -> Option<u16> {
        self.stop_status
    }

    /// The HTTP status returned by the remove call, once [`Self::remove`] has
    /// run.
    #[must_use]
    pub const fn remove_status(&self) -> Option<u16> {
        self.remove_status
    }

    fn require_workspace(&self, step: &str) -> Result<&str> {
        self.workspace_id
            .as_deref()
            .ok_or_else(|| out_of_order(step, "a started workspace"))
    }

    fn require_agents(&self, step: &str) -> Result<&AgentEndpoints> {
        self.agents
            .as_ref()
            .ok_or_else(|| out_of_order(step, "a started workspace with resolved agents"))
    }

    fn require_sample(&self, step: &str) -> Result<&Sample> {
        self.sample
            .as_ref()
            .ok_or_else(|| out_of_order(step, "a planned run with a sample"))
    }

    /// Starts a workspace for the planned run and blocks until it is running
    /// with both agent endpoints published.
    ///
    /// # Errors
    ///
    /// Fails with [`PollError::UnexpectedState`] when the workspace settles
    /// on a phase other than `RUNNING`, with [`PollError::AttemptsExhausted`]
    /// when the agent endpoints never appear, and with the underlying
    /// `ApiError` when any request fails.
    pub async fn start(&mut self, run: &PlannedRun) -> Result<()> {
        let workspace_id = self
            .client
            .start_workspace(&run.environments, &run.stack_id, &self.namespace)
            .await?;
        info!(stack = %run.stack_id, workspace = %workspace_id, "workspace created");
        self.workspace_id = Some(workspace_id.clone());
        self.sample = Some(run.sample.clone());

        let phase =
            await_started(&self.client, &workspace_id, &self.polling.start_plan()).await?;
        if phase != WorkspacePhase::Running {
            return Err(PollError::UnexpectedState {
                expected: String::from(WorkspacePhase::Running.as_str()),
                observed: String::from(phase.as_str()),
            }
            .into());
        }

        let agents =
            resolve_agents(&self.client, &workspace_id, &self.polling.agent_plan()).await?;
        info!(workspace = %workspace_id, "workspace running with agents resolved");
        self.agents = Some(agents);
        Ok(())
    }

    /// Imports the planned run's sample into the workspace and returns the
    /// resulting project count.
    ///
    /// # Errors
    ///
    /// Fails when no workspace is started or when the import or count
    /// request fails.
    pub async fn import_sample(&mut self) -> Result<usize> {
        let agents = self.require_agents("import_sample")?;
        let sample = self.require_sample("import_sample")?;

        self.agent
            .import_samples(&agents.ws_agent_url, std::slice::from_ref(sample))
            .await?;
        let count = self.agent.project_count(&agents.ws_agent_url).await?;
        info!(projects = count, "sample imported");
        Ok(count)
    }

    /// Posts a command to the workspace's exec agent, blocks until the
    /// process exits, and returns the observation.
    ///
    /// Placeholder tokens in the command line are expanded against the
    /// sample's project path before posting.
    ///
    /// # Errors
    ///
    /// Fails when no workspace is started or when posting or polling the
    /// process fails.
    pub async fn run_command(&mut self, command: &CommandDef) -> Result<CommandObservation> {
        let agents = self.require_agents("run_command")?;
        let sample = self.require_sample("run_command")?;

        let prepared = catalog::prepare_command(command, &sample.path);
        let exec_url = agents.exec_agent_url.clone();
        let pid = self.agent.post_command(&exec_url, &prepared).await?;
        info!(command = %prepared.name, pid, "command posted");

        let observation =
            await_process_exit(&self.agent, &exec_url, pid, &self.polling.command_plan()).await?;
        info!(
            command = %prepared.name,
            exit_code = observation.process.exit_code,
            "command finished"
        );
        self.last_run = Some(observation.clone());
        Ok(observation)
    }

    /// Stops the workspace runtime and blocks until the workspace reports
    /// `STOPPED`, returning the HTTP status of the stop call.
    ///
    /// # Errors
    ///
    /// Fails with [`PollError::UnexpectedState`] when the workspace settles
    /// on any phase other than `STOPPED`.
    pub async fn stop(&mut self) -> Result<u16> {
        let workspace_id = self.require_workspace("stop")?.to_owned();

        let status = self.client.stop_workspace(&workspace_id).await?;
        self.stop_status = Some(status);
        await_stopped(&self.client, &workspace_id, &self.polling.stop_plan()).await?;
        info!(workspace = %workspace_id, status, "workspace stopped");
        Ok(status)
    }

    /// Removes the stopped workspace, returning the HTTP status of the
    /// removal call.
    ///
    /// # Errors
    ///
    /// Fails when no workspace is started or when the request fails.
    pub async fn remove(&mut self) -> Result<u16> {
        let workspace_id = self.require_workspace("remove")?.to_owned();

        let status = self.client.remove_workspace(&workspace_id).await?;
        self.remove_status = Some(status);
        info!(workspace = %workspace_id, status, "workspace removed");
        Ok(status)
    }

    /// Confirms the workspace is gone: a fetch by ID must return 404.
    ///
    /// # Errors
    ///
    /// Fails when no workspace is started or when the request fails.
    pub async fn verify_removed(&self) -> Result<bool> {
        let workspace_id = self.require_workspace("verify_removed")?;
        let status = self.client.removal_status(workspace_id).await?;
        Ok(status == NOT_FOUND)
    }
}

fn out_of_order(step: &str, requires: &str) -> crate::error::HarnessError {
    SessionError::OutOfOrder {
        step: step.to_owned(),
        requires: requires.to_owned(),
    }
    .into()
}
