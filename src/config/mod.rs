//! Configuration system for stackbench.
//!
//! Configuration structures and loading for the harness. Loading and
//! precedence merging is handled by the `ortho_config` crate. Intended
//! precedence: environment variables override defaults.
//!
//! # Example Environment
//!
//! ```sh
//! STACKBENCH_API_ENDPOINT=http://che.local:8080/api
//! STACKBENCH_NAMESPACE=che
//! STACKBENCH_FILTER_TAG=java
//! STACKBENCH_POLLING_START_INTERVAL_SECS=30
//! ```
//!
//! The API endpoint may alternatively come from `CHE_API_ENDPOINT` or
//! `MINISHIFT_CHE_ENDPOINT`, resolved through [`EndpointResolver`].

mod loader;
mod resolver;
mod types;


pub use loader::{env_var_names, load_config};
pub use resolver::EndpointResolver;
pub use types::{HarnessConfig, PollingConfig};
