//! Configuration data types for stackbench.

use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};
use smart_default::SmartDefault;

use crate::error::ConfigError;
use crate::poll::PollPlan;

/// The published sample-project catalogue consumed when no override is
/// configured.
const DEFAULT_SAMPLES_URL: &str = "https://raw.githubusercontent.com/eclipse/che/master/ide/che-core-ide-templates/src/main/resources/samples.json";

/// The namespace workspaces are created under when no override is configured.
const DEFAULT_NAMESPACE: &str = "che";

fn default_samples_url() -> String {
    String::from(DEFAULT_SAMPLES_URL)
}

fn default_namespace() -> String {
    String::from(DEFAULT_NAMESPACE)
}

/// Polling cadence configuration.
///
/// Workspace state transitions on the remote system take tens of seconds;
/// agent endpoints appear within a few. The defaults match the cadences the
/// remote system is known to tolerate. All intervals are in whole seconds.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, SmartDefault)]
#[serde(default)]
pub struct PollingConfig {
    /// Seconds between status fetches while a workspace is starting.
    #[default = 30]
    pub start_interval_secs: u64,

    /// Seconds between status fetches while a workspace is stopping. Also
    /// the settle wait imposed after the workspace leaves the stopping
    /// phases.
    #[default = 15]
    pub stop_interval_secs: u64,

    /// Seconds between process-status fetches while a command runs.
    #[default = 15]
    pub command_interval_secs: u64,

    /// Seconds between runtime-descriptor fetches while resolving agent
    /// endpoint URLs.
    #[default = 2]
    pub agent_interval_secs: u64,

    /// Maximum number of runtime-descriptor fetches before agent resolution
    /// is reported as failed.
    #[default = 30]
    pub agent_max_attempts: u32,
}

impl PollingConfig {
    /// The plan for waiting out a workspace start.
    #[must_use]
    pub const fn start_plan(&self) -> PollPlan {
        PollPlan::new(Duration::from_secs(self.start_interval_secs))
    }

    /// The plan for waiting out a workspace stop, settle wait included.
    #[must_use]
    pub const fn stop_plan(&self) -> PollPlan {
        PollPlan::new(Duration::from_secs(self.stop_interval_secs))
            .with_settle(Duration::from_secs(self.stop_interval_secs))
    }

    /// The plan for waiting out a posted command.
    #[must_use]
    pub const fn command_plan(&self) -> PollPlan {
        PollPlan::new(Duration::from_secs(self.command_interval_secs))
    }

    /// The bounded plan for resolving agent endpoint URLs.
    #[must_use]
    pub const fn agent_plan(&self) -> PollPlan {
        PollPlan::new(Duration::from_secs(self.agent_interval_secs))
            .with_max_attempts(self.agent_max_attempts)
    }

    /// Validates that every cadence value is usable.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` naming the offending field when an
    /// interval or attempt bound is zero.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let intervals = [
            ("polling.start_interval_secs", self.start_interval_secs),
            ("polling.stop_interval_secs", self.stop_interval_secs),
            ("polling.command_interval_secs", self.command_interval_secs),
            ("polling.agent_interval_secs", self.agent_interval_secs),
        ];
        for (field, value) in intervals {
            if value == 0 {
                return Err(ConfigError::InvalidValue {
                    field: String::from(field),
                    reason: String::from("must be greater than zero"),
                });
            }
        }
        if self.agent_max_attempts == 0 {
            return Err(ConfigError::InvalidValue {
                field: String::from("polling.agent_max_attempts"),
                reason: String::from("must be at least one attempt"),
            });
        }
        Ok(())
    }
}

/// Root harness configuration.
///
/// Loaded from configuration layers with the precedence order (lowest to
/// highest): struct defaults, then `STACKBENCH_*` environment variables. The
/// API endpoint may alternatively come from the fallback environment
/// variables recognised by [`super::EndpointResolver`], which is why it stays
/// optional here and is only required at resolution time.
#[derive(Debug, Clone, Deserialize, Serialize, SmartDefault, OrthoConfig)]
#[ortho_config(prefix = "STACKBENCH")]
pub struct HarnessConfig {
    /// Base URL of the workspace REST API, e.g. `http://che.local:8080/api`.
    pub api_endpoint: Option<String>,

    /// Location of the sample-project catalogue.
    #[serde(default = "default_samples_url")]
    #[default(default_samples_url())]
    #[ortho_config(skip_cli)]
    pub samples_url: String,

    /// Namespace workspaces are created under.
    #[serde(default = "default_namespace")]
    #[default(default_namespace())]
    #[ortho_config(skip_cli)]
    pub namespace: String,

    /// When set, stack/sample pairings whose tags match this value (case
    /// insensitively) are included even without a shared tag.
    pub filter_tag: Option<String>,

    /// Polling cadences.
    #[serde(default)]
    #[ortho_config(skip_cli)]
    pub polling: PollingConfig,
}

impl HarnessConfig {
    /// Validates the merged configuration.
    ///
    /// The API endpoint is deliberately not checked here; its presence is
    /// enforced by [`super::EndpointResolver::resolve`], which also consults
    /// the fallback environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` for an empty samples URL or
    /// namespace, or for an unusable polling cadence.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.samples_url.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: String::from("samples_url"),
                reason: String::from("cannot be empty"),
            });
        }
        if self.namespace.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: String::from("namespace"),
                reason: String::from("cannot be empty"),
            });
        }
        self.polling.validate()
    }
}
