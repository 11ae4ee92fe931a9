//! Configuration loading with layered precedence.
//!
//! Loads configuration with the precedence order (lowest to highest):
//! struct defaults, then `STACKBENCH_*` environment variables. The harness is
//! driven by CI jobs where the environment is the natural configuration
//! surface, so no file layer is composed.
//!
//! # Environment Variable Handling
//!
//! Environment variables with unparseable typed values (e.g.
//! `STACKBENCH_POLLING_AGENT_MAX_ATTEMPTS=lots` instead of an integer) return
//! an error immediately. This fail-fast approach ensures misconfigurations
//! are visible rather than silently falling back to defaults. String fields
//! (e.g. `STACKBENCH_API_ENDPOINT`) are always accepted.
//!
//! Environment access goes through `mockable::Env` so the whole layer is
//! testable without touching the process environment.

use ortho_config::MergeComposer;
use ortho_config::serde_json::{self, Map, Value};

use crate::config::HarnessConfig;
use crate::error::{ConfigError, Result};

/// The type of value expected from an environment variable.
#[derive(Clone, Copy)]
enum EnvVarType {
    /// String value (always accepted).
    String,
    /// Unsigned integer. Invalid values return an error.
    U64,
}

/// Specification for a single environment variable mapping.
struct EnvVarSpec {
    /// The environment variable name (e.g. `STACKBENCH_API_ENDPOINT`).
    env_var: &'static str,
    /// The JSON path segments (e.g. `["polling", "agent_max_attempts"]`).
    path: &'static [&'static str],
    /// The expected value type.
    var_type: EnvVarType,
}

/// Table of all environment variables and their JSON paths.
///
/// Adding or modifying an environment variable mapping is a single-line
/// change here.
const ENV_VAR_SPECS: &[EnvVarSpec] = &[
    // Top-level fields
    EnvVarSpec {
        env_var: "STACKBENCH_API_ENDPOINT",
        path: &["api_endpoint"],
        var_type: EnvVarType::String,
    },
    EnvVarSpec {
        env_var: "STACKBENCH_SAMPLES_URL",
        path: &["samples_url"],
        var_type: EnvVarType::String,
    },
    EnvVarSpec {
        env_var: "STACKBENCH_NAMESPACE",
        path: &["namespace"],
        var_type: EnvVarType::String,
    },
    EnvVarSpec {
        env_var: "STACKBENCH_FILTER_TAG",
        path: &["filter_tag"],
        var_type: EnvVarType::String,
    },
    // Polling cadences
    EnvVarSpec {
        env_var: "STACKBENCH_POLLING_START_INTERVAL_SECS",
        path: &["polling", "start_interval_secs"],
        var_type: EnvVarType::U64,
    },
    EnvVarSpec {
        env_var: "STACKBENCH_POLLING_STOP_INTERVAL_SECS",
        path: &["polling", "stop_interval_secs"],
        var_type: EnvVarType::U64,
    },
    EnvVarSpec {
        env_var: "STACKBENCH_POLLING_COMMAND_INTERVAL_SECS",
        path: &["polling", "command_interval_secs"],
        var_type: EnvVarType::U64,
    },
    EnvVarSpec {
        env_var: "STACKBENCH_POLLING_AGENT_INTERVAL_SECS",
        path: &["polling", "agent_interval_secs"],
        var_type: EnvVarType::U64,
    },
    EnvVarSpec {
        env_var: "STACKBENCH_POLLING_AGENT_MAX_ATTEMPTS",
        path: &["polling", "agent_max_attempts"],
        var_type: EnvVarType::U64,
    },
];

/// Returns the list of environment variable names recognised by the config
/// loader.
///
/// Primarily useful for tests that need to clear all `STACKBENCH_*`
/// environment variables for isolation. Using this function instead of a
/// hard-coded list keeps the test in sync with the loader's actual mappings.
#[must_use]
pub fn env_var_names() -> Vec<&'static str> {
    ENV_VAR_SPECS.iter().map(|spec| spec.env_var).collect()
}

/// Load configuration with full layer precedence.
///
/// Sources, later overriding earlier:
/// 1. Application defaults defined on [`HarnessConfig`]
/// 2. Environment variables prefixed with `STACKBENCH_`
///
/// The merged configuration is validated before being returned.
///
/// # Errors
///
/// Returns `ConfigError` when a typed environment variable carries an
/// unparseable value, when layer merging fails, or when the merged
/// configuration fails validation.
pub fn load_config<E: mockable::Env>(env: &E) -> Result<HarnessConfig> {
    let mut composer = MergeComposer::new();

    // Layer 1: Defaults (serialised from HarnessConfig::default()).
    let defaults =
        serde_json::to_value(HarnessConfig::default()).map_err(|e| ConfigError::InvalidValue {
            field: String::from("defaults"),
            reason: format!("failed to serialise defaults: {e}"),
        })?;
    composer.push_defaults(defaults);

    // Layer 2: Environment variables.
    let env_values = collect_env_vars(env)?;
    if !env_values.is_null() {
        composer.push_environment(env_values);
    }

    let config =
        HarnessConfig::merge_from_layers(composer.layers()).map_err(ConfigError::OrthoConfig)?;

    config.validate()?;
    Ok(config)
}

/// Collect environment variables with the `STACKBENCH_` prefix into a JSON
/// value.
///
/// All mappings are defined in [`ENV_VAR_SPECS`]; this function is a single
/// pass over that table.
fn collect_env_vars<E: mockable::Env>(env: &E) -> Result<Value> {
    let mut root = Map::new();

    for spec in ENV_VAR_SPECS {
        let Some(raw_value) = env.string(spec.env_var) else {
            continue;
        };

        // Invalid typed values return an error immediately (fail-fast).
        let json_value = match spec.var_type {
            EnvVarType::String => Value::String(raw_value),
            EnvVarType::U64 => match raw_value.parse::<u64>() {
                Ok(n) => Value::Number(n.into()),
                Err(_) => {
                    return Err(ConfigError::InvalidValue {
                        field: spec.env_var.to_owned(),
                        reason: format!("expected unsigned integer, got '{raw_value}'"),
                    }
                    .into());
                }
            },
        };

        insert_at_path(&mut root, spec.path, json_value);
    }

    if root.is_empty() {
        Ok(Value::Null)
    } else {
        Ok(Value::Object(root))
    }
}

/// Insert a value at a nested path in a JSON map.
///
/// For a path like `["polling", "agent_max_attempts"]`, this creates the
/// intermediate `polling` object if needed and inserts the field within it.
fn insert_at_path(root: &mut Map<String, Value>, path: &[&str], value: Value) {
    let Some((&field, parents)) = path.split_last() else {
        return;
    };

    let mut current = root;
    for &segment in parents {
        // The entry must be an object; with the controlled path specs above
        // it always is, so a mismatch skips the insertion.
        let entry = current
            .entry(segment.to_owned())
            .or_insert_with(|| Value::Object(Map::new()));
        let Some(obj) = entry.as_object_mut() else {
            return;
        };
        current = obj;
    }

    current.insert(field.to_owned(), value);
}
