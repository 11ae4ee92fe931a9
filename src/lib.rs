//! Behaviour-driven validation harness for a workspace-orchestration REST API.
//!
//! `stackbench` drives a remote Che-style workspace server through its REST
//! API to validate that predefined stacks boot correctly, accept sample
//! projects, run their build and test commands, and tear down cleanly. The
//! behavioural scenarios live in the crate's `tests/` directory; this library
//! provides the machinery they exercise.
//!
//! # Architecture
//!
//! One linear control flow exists per scenario: resolve a stack/sample pairing
//! from two fetched catalogues, start a workspace, poll until it is running,
//! resolve the agent endpoints, seed the sample project, post a command, poll
//! the process until it exits, stop the workspace, and remove it. All waiting
//! is realised as sleep-then-poll loops in [`poll`]; there is no concurrency
//! and no state shared between scenarios.
//!
//! # Modules
//!
//! - [`api`]: Thin client over the remote workspace and agent REST endpoints
//! - [`catalog`]: Stack/sample catalogue join and command planning
//! - [`config`]: Configuration system with layered precedence (env > defaults)
//! - [`error`]: Semantic error types for the harness
//! - [`poll`]: Wait-for-asynchronous-state-transition routines
//! - [`session`]: Per-scenario workspace session lifecycle

pub mod api;
pub mod catalog;
pub mod config;
pub mod error;
pub mod poll;
pub mod session;
