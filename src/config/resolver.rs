//! API endpoint resolution.
//!
//! The harness accepts its endpoint either from the merged configuration or
//! from the environment variables historically used by workspace-server
//! deployments. Resolution is separated from loading so the fallback chain is
//! testable with a mocked environment.

use crate::error::ConfigError;

/// Environment variable names checked in fallback order after configuration
/// sources.
const FALLBACK_ENV_VARS: &[&str] = &["CHE_API_ENDPOINT", "MINISHIFT_CHE_ENDPOINT"];

/// Resolves the workspace API endpoint from configuration and environment
/// fallbacks.
///
/// # Type Parameters
///
/// * `E` - An environment provider implementing the `mockable::Env` trait,
///   allowing for testable environment variable access.
pub struct EndpointResolver<'a, E: mockable::Env> {
    env: &'a E,
}

impl<'a, E: mockable::Env> EndpointResolver<'a, E> {
    /// Creates a new endpoint resolver with the given environment provider.
    #[must_use]
    pub const fn new(env: &'a E) -> Self {
        Self { env }
    }

    /// Resolves the endpoint from fallback environment variables.
    ///
    /// Checks the following environment variables in order:
    /// 1. `CHE_API_ENDPOINT`
    /// 2. `MINISHIFT_CHE_ENDPOINT`
    ///
    /// Returns `None` if no fallback variable is set or all are empty.
    #[must_use]
    pub fn resolve_from_env(&self) -> Option<String> {
        FALLBACK_ENV_VARS
            .iter()
            .filter_map(|var_name| self.env.string(var_name))
            .find(|value| !value.is_empty())
    }

    /// Resolves the endpoint, preferring the configured value.
    ///
    /// Resolution order:
    /// 1. `configured` (from the merged configuration layers)
    /// 2. `CHE_API_ENDPOINT`, `MINISHIFT_CHE_ENDPOINT`
    ///
    /// There is no platform default; a workspace server has no well-known
    /// location.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingRequired` when no source provides a
    /// non-empty endpoint.
    pub fn resolve(&self, configured: Option<&str>) -> Result<String, ConfigError> {
        configured
            .filter(|value| !value.is_empty())
            .map(String::from)
            .or_else(|| self.resolve_from_env())
            .ok_or(ConfigError::MissingRequired {
                field: String::from("api_endpoint"),
            })
    }
}
