//! Semantic error types for the stackbench harness.
//!
//! This module defines the error hierarchy for stackbench, following the
//! principle of using semantic error enums (via `thiserror`) for conditions
//! the caller might inspect or map to a scenario failure, while reserving
//! opaque errors (`eyre::Report`) for the outermost test boundary.
//!
//! The taxonomy mirrors how failures surface during a scenario: transport and
//! decode errors are always fatal to the enclosing step and are never retried;
//! state-mismatch conditions (a workspace that never reaches `STOPPED`, an
//! agent endpoint that never appears) are reported as distinct poll errors so
//! the test framework can assert on them.

use std::sync::Arc;

use thiserror::Error;

/// Errors that can occur during configuration loading and validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required configuration value is missing.
    #[error("missing required configuration: {field}")]
    MissingRequired {
        /// The name of the missing field.
        field: String,
    },

    /// A configuration value failed validation.
    #[error("invalid configuration value for '{field}': {reason}")]
    InvalidValue {
        /// The name of the invalid field.
        field: String,
        /// The reason the value is invalid.
        reason: String,
    },

    /// The `OrthoConfig` library returned an error during configuration loading.
    ///
    /// This wraps errors from the layered configuration system, including:
    /// - Configuration file parsing errors
    /// - Environment variable parsing errors
    /// - Missing required fields after layer merging
    #[error("configuration loading failed: {0}")]
    OrthoConfig(Arc<ortho_config::OrthoError>),
}

/// Errors that can occur while talking to the workspace or agent REST APIs.
///
/// Every API operation is a single request/response cycle; any variant here is
/// immediately fatal to the enclosing scenario step. There is no retry budget
/// for transport failures.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The underlying HTTP client could not be constructed.
    #[error("failed to build HTTP client: {message}")]
    ClientBuild {
        /// A description of the construction failure.
        message: String,
    },

    /// The HTTP request could not be completed.
    #[error("request to {url} failed: {message}")]
    Transport {
        /// The URL that was requested.
        url: String,
        /// A description of the transport failure.
        message: String,
    },

    /// The response body could not be decoded into the expected shape.
    #[error("failed to decode response from {url}: {message}")]
    Decode {
        /// The URL whose response failed to decode.
        url: String,
        /// A description of the decode failure.
        message: String,
    },

    /// The server answered with an unexpected HTTP status.
    #[error("unexpected status {status} from {url}")]
    UnexpectedStatus {
        /// The HTTP status code returned by the server.
        status: u16,
        /// The URL that was requested.
        url: String,
    },

    /// A workspace-start response carried no instance identifier.
    #[error("workspace start response for stack '{stack_id}' carried no instance id")]
    MissingWorkspaceId {
        /// The stack whose start request failed.
        stack_id: String,
    },
}

/// Errors that can occur while polling for an asynchronous state transition.
#[derive(Debug, Error)]
pub enum PollError {
    /// The underlying status fetch failed.
    ///
    /// Network errors abort a poll immediately; only state transitions are
    /// retried.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// The attempt bound was exhausted before a terminal state was observed.
    #[error("gave up after {attempts} polling attempts: {waiting_for}")]
    AttemptsExhausted {
        /// The number of attempts made.
        attempts: u32,
        /// A description of the condition being waited for.
        waiting_for: String,
    },

    /// Polling finished on a terminal state other than the expected one.
    #[error("expected terminal state '{expected}', observed '{observed}'")]
    UnexpectedState {
        /// The state required for the poll to be considered successful.
        expected: String,
        /// The state that was actually observed.
        observed: String,
    },
}

/// Errors raised by the scenario session when its lifecycle methods are
/// driven in an impossible order.
#[derive(Debug, Error)]
pub enum SessionError {
    /// A lifecycle step was invoked before the state it depends on existed.
    #[error("scenario step '{step}' requires {requires}")]
    OutOfOrder {
        /// The step that was invoked.
        step: String,
        /// The missing prerequisite.
        requires: String,
    },
}

/// Top-level error type for the stackbench harness.
///
/// This enum aggregates all domain-specific errors into a single type that can
/// be used throughout the library. At the test boundary these errors are
/// typically converted to `eyre::Report` for human-readable scenario failure
/// output.
#[derive(Debug, Error)]
pub enum HarnessError {
    /// An error occurred during configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// An error occurred while talking to the remote API.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// An error occurred while polling for a state transition.
    #[error(transparent)]
    Poll(#[from] PollError),

    /// A scenario session was driven out of order.
    #[error(transparent)]
    Session(#[from] SessionError),
}

/// A specialised `Result` type for stackbench operations.
pub type Result<T> = std::result::Result<T, HarnessError>;
