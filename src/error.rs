//! Typed failure taxonomy.
//!
//! Two kinds are surfaced to callers of the parse/validate path:
//! - `ConfigParseError`: the raw mapping does not have the expected shape
//!   (wrong top-level key count, missing/mistyped field).
//! - `ValidationError`: a well-shaped value violates a semantic rule
//!   (bad email, bad date, bad timedelta, bad name prefix, bad schedule
//!   grammar, duplicate task names).
//!
//! Rendering can additionally fail with `WiringError` (a task's dependency
//! resolution failed; propagated, never generated here) wrapped in
//! `RenderError`. Nothing is caught and downgraded internally.

use std::collections::BTreeSet;
use thiserror::Error;

/// Raised when the raw DAG configuration mapping is malformed.
///
/// Carries a yaml rendering of the offending mapping and, when the failure
/// came out of the structural conversion, the underlying serde cause.
#[derive(Debug, Error)]
#[error(
    "invalid DAG configuration format in:\n{config}\n\
     Expected yaml format:\n\
     name:\n    \
         schedule_interval: string\n    \
         default_args:\n        \
             owner: string\n        \
             start_date: 'YYYY-MM-DD'\n        \
             ..."
)]
pub struct ConfigParseError {
    config: String,
    #[source]
    cause: Option<serde_yaml::Error>,
}

impl ConfigParseError {
    pub fn new(config: &serde_yaml::Mapping, cause: Option<serde_yaml::Error>) -> Self {
        let config = serde_yaml::to_string(&serde_yaml::Value::Mapping(config.clone()))
            .unwrap_or_else(|_| format!("{config:?}"));
        Self { config, cause }
    }
}

/// Raised when a field value is present and typed correctly but violates a
/// semantic rule. Every variant names the field and the rejected value.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("invalid email for {field}: {value:?}")]
    InvalidEmail { field: &'static str, value: String },

    #[error("invalid date for {field}: {value:?}. Dates should be specified as YYYY-MM-DD.")]
    InvalidDate { field: &'static str, value: String },

    #[error(
        "invalid timedelta for {field}: {value:?}. \
         Timedeltas should be specified like: 1h, 30m, 1h15m, 1d4h45m, ..."
    )]
    InvalidTimedelta { field: &'static str, value: String },

    #[error("invalid DAG name {value:?}: name must start with \"bqetl_\"")]
    InvalidDagName { value: String },

    #[error(
        "invalid schedule_interval {value:?}: \
         expected @once/@hourly/@daily/@weekly/@monthly/@yearly, \
         a 5-field cron expression, or a timedelta like 1d4h45m"
    )]
    InvalidScheduleInterval { value: String },

    /// All names occurring more than once, not just the first.
    #[error("duplicate task names encountered: {names:?}")]
    DuplicateTaskNames { names: BTreeSet<String> },
}

/// Umbrella for `Dag::from_config`, which parses and then validates.
/// Callers match on the kind; both variants display transparently.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(transparent)]
    Parse(#[from] ConfigParseError),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// A task's dependency-wiring step failed during rendering. Produced by the
/// `task::Task` collaborator; the renderer stamps in the originating task
/// name and forwards it unchanged.
#[derive(Debug, Error)]
#[error("failed to wire dependencies for task {task:?}: {message}")]
pub struct WiringError {
    pub task: String,
    pub message: String,
}

impl WiringError {
    pub fn new(task: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            task: task.into(),
            message: message.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error(transparent)]
    Wiring(#[from] WiringError),

    #[error("template rendering failed for DAG {dag}")]
    Template {
        dag: String,
        #[source]
        source: tera::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_error_displays_expected_shape() {
        let mut m = serde_yaml::Mapping::new();
        m.insert("a".into(), serde_yaml::Value::Null);
        m.insert("b".into(), serde_yaml::Value::Null);
        let err = ConfigParseError::new(&m, None);
        let msg = err.to_string();
        assert!(msg.contains("invalid DAG configuration format"));
        assert!(msg.contains("schedule_interval: string"));
        assert!(msg.contains("a:"), "offending mapping missing from: {msg}");
    }

    #[test]
    fn validation_error_names_field_and_value() {
        let err = ValidationError::InvalidEmail {
            field: "owner",
            value: "not-an-email".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "invalid email for owner: \"not-an-email\""
        );
    }

    #[test]
    fn wiring_error_names_task() {
        let err = WiringError::new("query_v1", "upstream table missing");
        assert!(err.to_string().contains("query_v1"));
        assert!(err.to_string().contains("upstream table missing"));
    }
}
