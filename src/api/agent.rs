//! Client for the per-workspace agent endpoints.
//!
//! A running workspace exposes two HTTP sidecars: the exec agent (process
//! execution) and the wsagent (project-file operations). Their base URLs are
//! resolved from the runtime descriptor at start time and passed in per call;
//! unlike [`super::WorkspaceClient`] there is no fixed endpoint.

use serde_json::Value;
use tracing::debug;

use super::WorkspaceClient;
use super::types::{CommandDef, LogEntry, ProcessDescriptor, Sample};
use crate::error::ApiError;

/// Client for the exec-agent and wsagent sidecars of a running workspace.
#[derive(Debug, Clone)]
pub struct AgentClient {
    http: reqwest::Client,
}

impl AgentClient {
    pub(super) const fn from_http(http: reqwest::Client) -> Self {
        Self { http }
    }

    /// Seeds a workspace's project tree with sample projects via
    /// `POST {ws_agent_url}/project/batch`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Transport`] on request failure and
    /// [`ApiError::UnexpectedStatus`] on a non-success response.
    pub async fn import_samples(
        &self,
        ws_agent_url: &str,
        samples: &[Sample],
    ) -> Result<(), ApiError> {
        let url = format!("{ws_agent_url}/project/batch");
        debug!(%url, count = samples.len(), "importing sample projects");

        let response = self
            .http
            .post(&url)
            .json(samples)
            .send()
            .await
            .map_err(|e| ApiError::Transport {
                url: url.clone(),
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::UnexpectedStatus {
                status: status.as_u16(),
                url,
            });
        }
        Ok(())
    }

    /// Returns the number of projects present in the workspace.
    ///
    /// # Errors
    ///
    /// Returns the usual transport/status/decode failures.
    pub async fn project_count(&self, ws_agent_url: &str) -> Result<usize, ApiError> {
        let url = format!("{ws_agent_url}/project");
        let projects: Vec<Value> = WorkspaceClient::get_json(&self.http, &url).await?;
        Ok(projects.len())
    }

    /// Posts a command to the exec agent, returning the assigned process ID.
    ///
    /// Placeholder expansion is the caller's responsibility (see
    /// [`crate::catalog::expand_command_line`]); the command is posted as
    /// given.
    ///
    /// # Errors
    ///
    /// Returns the usual transport/status/decode failures.
    pub async fn post_command(
        &self,
        exec_agent_url: &str,
        command: &CommandDef,
    ) -> Result<u64, ApiError> {
        debug!(url = %exec_agent_url, command = %command.name, "posting command");

        let response = self
            .http
            .post(exec_agent_url)
            .json(command)
            .send()
            .await
            .map_err(|e| ApiError::Transport {
                url: exec_agent_url.to_owned(),
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::UnexpectedStatus {
                status: status.as_u16(),
                url: exec_agent_url.to_owned(),
            });
        }

        let process: ProcessDescriptor =
            response.json().await.map_err(|e| ApiError::Decode {
                url: exec_agent_url.to_owned(),
                message: e.to_string(),
            })?;
        Ok(process.pid)
    }

    /// Fetches the status of a posted process.
    ///
    /// # Errors
    ///
    /// Returns the usual transport/status/decode failures; a failure here
    /// aborts the poll that issued the fetch.
    pub async fn process_status(
        &self,
        exec_agent_url: &str,
        pid: u64,
    ) -> Result<ProcessDescriptor, ApiError> {
        let url = format!("{exec_agent_url}/{pid}");
        WorkspaceClient::get_json(&self.http, &url).await
    }

    /// Fetches the ordered log entries of a posted process.
    ///
    /// Used as best-effort diagnostics when a command reports a non-zero exit
    /// code.
    ///
    /// # Errors
    ///
    /// Returns the usual transport/status/decode failures.
    pub async fn process_logs(
        &self,
        exec_agent_url: &str,
        pid: u64,
    ) -> Result<Vec<LogEntry>, ApiError> {
        let url = format!("{exec_agent_url}/{pid}/logs");
        debug!(%url, "fetching process logs");
        WorkspaceClient::get_json(&self.http, &url).await
    }
}
