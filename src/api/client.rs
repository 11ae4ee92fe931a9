//! Client for the workspace-orchestration REST API.
//!
//! Every operation is a single request/response cycle with no retry on
//! transport failure; network and decode errors propagate to the caller
//! immediately. Waiting for asynchronous transitions is the job of
//! [`crate::poll`], not of this client.

use std::collections::HashMap;
use std::time::Duration;

use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use super::AgentClient;
use super::types::{
    AgentEndpoints, CreateWorkspaceRequest, CreatedWorkspace, LegacyMachine, MachineServers,
    MachineSet, RuntimeDescriptor, Sample, Stack, StatusReport, WorkspacePhase,
};
use crate::error::ApiError;

/// Per-request timeout, matching the remote server's observed worst case.
const REQUEST_TIMEOUT_SECS: u64 = 60;

/// The agent reference the remote system chokes on; removed from every
/// environment blob before a workspace-creation request is serialised.
const BAYESIAN_LSP_AGENT: &str = "com.redhat.bayesian.lsp";

/// Server key of the exec agent in the modern runtime shape.
const EXEC_AGENT_KEY: &str = "exec-agent/http";

/// Server key of the workspace agent in the modern runtime shape.
const WS_AGENT_KEY: &str = "wsagent/http";

/// Server reference of the exec agent in the legacy runtime shape.
const LEGACY_EXEC_AGENT_REF: &str = "exec-agent";

/// Server reference of the workspace agent in the legacy runtime shape.
const LEGACY_WS_AGENT_REF: &str = "wsagent";

/// Client for the workspace-orchestration REST API.
///
/// Holds the fully-qualified API endpoint (e.g. `http://che.example/api`) and
/// a shared HTTP connection pool. Cloning is cheap; the pool is shared.
#[derive(Debug, Clone)]
pub struct WorkspaceClient {
    http: reqwest::Client,
    endpoint: String,
}

impl WorkspaceClient {
    /// Creates a client for the given fully-qualified API endpoint.
    ///
    /// A trailing slash on the endpoint is tolerated and stripped.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::ClientBuild`] if the underlying HTTP client cannot
    /// be constructed.
    pub fn new(endpoint: &str) -> Result<Self, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| ApiError::ClientBuild {
                message: e.to_string(),
            })?;

        Ok(Self {
            http,
            endpoint: endpoint.trim_end_matches('/').to_owned(),
        })
    }

    /// Returns an [`AgentClient`] sharing this client's connection pool.
    #[must_use]
    pub fn agent_client(&self) -> AgentClient {
        AgentClient::from_http(self.http.clone())
    }

    /// Returns the configured API endpoint.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.endpoint)
    }

    pub(super) async fn get_json<T: DeserializeOwned>(
        http: &reqwest::Client,
        url: &str,
    ) -> Result<T, ApiError> {
        let response = http.get(url).send().await.map_err(|e| ApiError::Transport {
            url: url.to_owned(),
            message: e.to_string(),
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_owned(),
            });
        }

        response.json::<T>().await.map_err(|e| ApiError::Decode {
            url: url.to_owned(),
            message: e.to_string(),
        })
    }

    /// Fetches the stack catalogue from `{endpoint}/stack`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Transport`] on request failure,
    /// [`ApiError::UnexpectedStatus`] on a non-success response, and
    /// [`ApiError::Decode`] if the catalogue does not decode. All are fatal to
    /// the enclosing run.
    pub async fn fetch_stacks(&self) -> Result<Vec<Stack>, ApiError> {
        let url = self.url("/stack");
        debug!(%url, "fetching stack catalogue");
        Self::get_json(&self.http, &url).await
    }

    /// Fetches the sample catalogue from the given URL.
    ///
    /// The samples catalogue is hosted on a static location, not on the
    /// workspace API, so the full URL is caller-supplied.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`Self::fetch_stacks`]; all fatal.
    pub async fn fetch_samples(&self, samples_url: &str) -> Result<Vec<Sample>, ApiError> {
        debug!(url = %samples_url, "fetching sample catalogue");
        Self::get_json(&self.http, samples_url).await
    }

    /// Creates and immediately starts a workspace from a stack's environment
    /// configuration, returning the server-assigned instance identifier.
    ///
    /// The known-problematic `com.redhat.bayesian.lsp` agent reference is
    /// removed from the environment blob by structured traversal before the
    /// payload is serialised.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::MissingWorkspaceId`] if the response carries no
    /// instance identifier, plus the usual transport/status/decode failures.
    pub async fn start_workspace(
        &self,
        environments: &Value,
        stack_id: &str,
        namespace: &str,
    ) -> Result<String, ApiError> {
        let mut cleaned = environments.clone();
        strip_bayesian_lsp(&mut cleaned);

        let payload = CreateWorkspaceRequest {
            environments: cleaned,
            namespace: namespace.to_owned(),
            name: format!("{stack_id}-stack-test"),
            default_env: String::from("default"),
            projects: Vec::new(),
        };

        let url = self.url("/workspace?start-after-create=true");
        debug!(%url, stack = %stack_id, "starting workspace");

        let response = self
            .http
            .post(&url)
            .json(&payload)
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

        let created: CreatedWorkspace =
            response.json().await.map_err(|e| ApiError::Decode {
                url,
                message: e.to_string(),
            })?;

        if created.id.is_empty() {
            return Err(ApiError::MissingWorkspaceId {
                stack_id: stack_id.to_owned(),
            });
        }

        Ok(created.id)
    }

    /// Fetches the current lifecycle phase of a workspace instance.
    ///
    /// # Errors
    ///
    /// Returns the usual transport/status/decode failures; all fatal to the
    /// poll that issued the fetch.
    pub async fn workspace_status(&self, workspace_id: &str) -> Result<WorkspacePhase, ApiError> {
        let url = self.url(&format!("/workspace/{workspace_id}"));
        let report: StatusReport = Self::get_json(&self.http, &url).await?;
        Ok(report.status)
    }

    /// Resolves the exec-agent and wsagent URLs from a workspace's runtime
    /// descriptor.
    ///
    /// Both the modern (machines keyed by name, servers keyed by reference)
    /// and the legacy (machine list with `ref`-tagged servers) runtime shapes
    /// decode; the legacy exec agent gains a `/process` suffix. An absent
    /// runtime block or entries not yet published yield empty URL strings,
    /// which callers are expected to poll away via
    /// [`crate::poll::resolve_agents`].
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Decode`] when the body matches neither runtime
    /// shape; decode problems are surfaced, never swallowed.
    pub async fn agent_endpoints(&self, workspace_id: &str) -> Result<AgentEndpoints, ApiError> {
        let url = self.url(&format!("/workspace/{workspace_id}"));
        let descriptor: RuntimeDescriptor = Self::get_json(&self.http, &url).await?;
        let agents = collect_agent_endpoints(&descriptor.runtime.machines);

        debug!(
            workspace = %workspace_id,
            exec_agent = %agents.exec_agent_url,
            ws_agent = %agents.ws_agent_url,
            "resolved agent endpoints"
        );
        Ok(agents)
    }

    /// Stops a running workspace via `DELETE {endpoint}/workspace/{id}/runtime`,
    /// returning the raw HTTP status for the caller's assertion.
    ///
    /// Confirmation of the stopped state is the caller's responsibility (see
    /// [`crate::poll::await_stopped`]).
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Transport`] on request failure.
    pub async fn stop_workspace(&self, workspace_id: &str) -> Result<u16, ApiError> {
        let url = self.url(&format!("/workspace/{workspace_id}/runtime"));
        debug!(%url, "stopping workspace");
        self.delete(&url).await
    }

    /// Removes a stopped workspace via `DELETE {endpoint}/workspace/{id}`,
    /// returning the raw HTTP status for the caller's assertion.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Transport`] on request failure.
    pub async fn remove_workspace(&self, workspace_id: &str) -> Result<u16, ApiError> {
        let url = self.url(&format!("/workspace/{workspace_id}"));
        debug!(%url, "removing workspace");
        self.delete(&url).await
    }

    /// Fetches a workspace by ID and returns the raw HTTP status.
    ///
    /// After removal the caller asserts the status is 404 to confirm the
    /// workspace is gone.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Transport`] on request failure.
    pub async fn removal_status(&self, workspace_id: &str) -> Result<u16, ApiError> {
        let url = self.url(&format!("/workspace/{workspace_id}"));
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| ApiError::Transport {
                url,
                message: e.to_string(),
            })?;
        Ok(response.status().as_u16())
    }

    async fn delete(&self, url: &str) -> Result<u16, ApiError> {
        let response = self
            .http
            .delete(url)
            .send()
            .await
            .map_err(|e| ApiError::Transport {
                url: url.to_owned(),
                message: e.to_string(),
            })?;
        Ok(response.status().as_u16())
    }
}

/// Scans a decoded machine collection for the two agent servers.
///
/// Entries not yet published stay as empty strings for the caller's poll;
/// the legacy exec agent gains a `/process` suffix.
pub(crate) fn collect_agent_endpoints(machines: &MachineSet) -> AgentEndpoints {
    let mut agents = AgentEndpoints::default();
    match machines {
        MachineSet::Modern(map) => scan_modern_runtime(map, &mut agents),
        MachineSet::Legacy(list) => scan_legacy_runtime(list, &mut agents),
    }
    agents
}

fn scan_modern_runtime(machines: &HashMap<String, MachineServers>, agents: &mut AgentEndpoints) {
    for machine in machines.values() {
        for (key, server) in &machine.servers {
            if key == EXEC_AGENT_KEY {
                agents.exec_agent_url.clone_from(&server.url);
            }
            if key == WS_AGENT_KEY {
                agents.ws_agent_url.clone_from(&server.url);
            }
        }
    }
}

fn scan_legacy_runtime(machines: &[LegacyMachine], agents: &mut AgentEndpoints) {
    for machine in machines {
        for server in machine.runtime.servers.values() {
            if server.reference == LEGACY_EXEC_AGENT_REF {
                agents.exec_agent_url = format!("{}/process", server.url);
            }
            if server.reference == LEGACY_WS_AGENT_REF {
                agents.ws_agent_url.clone_from(&server.url);
            }
        }
    }
}

/// Removes every occurrence of the bayesian LSP agent reference from an
/// environment blob.
///
/// Agent references appear both as array elements (installer lists) and as
/// object keys (attribute maps); both forms are removed, recursively.
pub(crate) fn strip_bayesian_lsp(value: &mut Value) {
    match value {
        Value::Array(items) => {
            items.retain(|item| item.as_str() != Some(BAYESIAN_LSP_AGENT));
            for item in items {
                strip_bayesian_lsp(item);
            }
        }
        Value::Object(map) => {
            map.remove(BAYESIAN_LSP_AGENT);
            for item in map.values_mut() {
                strip_bayesian_lsp(item);
            }
        }
        _ => {}
    }
}
