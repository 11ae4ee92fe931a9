//! Thin client layer over the remote workspace and agent REST APIs.
//!
//! The remote system is an external collaborator; this module reimplements
//! nothing of it. Each operation is a single blocking request/response cycle
//! whose failure is immediately fatal to the enclosing scenario step — retry
//! logic lives exclusively in [`crate::poll`], and only retries observed state
//! transitions, never transport failures.
//!
//! [`WorkspaceClient`] covers the workspace API proper (catalogues, lifecycle,
//! runtime descriptors); [`AgentClient`] covers the per-workspace exec-agent
//! and wsagent sidecars. Both share one connection pool. The response shapes
//! consumed here are defined once in [`types`] and reused by every operation.

mod agent;
mod client;
pub mod types;

pub use agent::AgentClient;
pub use client::WorkspaceClient;
