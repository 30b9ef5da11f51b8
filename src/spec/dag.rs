//! DAG model: a named, scheduled collection of tasks plus its default_args.
//!
//! We keep two representations:
//! - DagSpec: raw config shape (serde-friendly)
//! - Dag: validated in-memory model
//!
//! Validators run before a `Dag` exists and again on every mutation, so an
//! invalid model is never observable.

use crate::error::{ConfigError, ConfigParseError, RenderError, ValidationError};
use crate::spec::collection::DagCollection;
use crate::spec::default_args::{DefaultArgs, DefaultArgsSpec};
use crate::spec::validate::{is_schedule_interval, is_valid_dag_name};
use crate::task::{SchedulerClient, Task};
use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::Arc;

/// Flat DAG shape after the single top-level config entry has been re-shaped
/// to `{name, ...body}`. Unknown body fields are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct DagSpec {
    pub name: String,
    pub schedule_interval: String,
    pub default_args: DefaultArgsSpec,
}

/// Validated DAG. Tasks are shared references; task identity is `name()`.
#[derive(Clone)]
pub struct Dag {
    name: String,
    schedule_interval: String,
    default_args: DefaultArgs,
    tasks: Vec<Arc<dyn Task>>,
}

impl Dag {
    /// Run all three validators (name, schedule_interval, task names) before
    /// the value comes into existence.
    pub fn new(
        name: String,
        schedule_interval: String,
        default_args: DefaultArgs,
        tasks: Vec<Arc<dyn Task>>,
    ) -> Result<Self, ValidationError> {
        if !is_valid_dag_name(&name) {
            return Err(ValidationError::InvalidDagName { value: name });
        }
        if !is_schedule_interval(&schedule_interval) {
            return Err(ValidationError::InvalidScheduleInterval {
                value: schedule_interval,
            });
        }
        validate_task_names(&tasks)?;

        Ok(Self {
            name,
            schedule_interval,
            default_args,
            tasks,
        })
    }

    /// Build from the flat spec shape; tasks are attached separately via
    /// `add_tasks` (a freshly parsed DAG has none).
    pub fn from_spec(spec: DagSpec) -> Result<Self, ValidationError> {
        let default_args = DefaultArgs::from_spec(spec.default_args)?;
        Self::new(spec.name, spec.schedule_interval, default_args, Vec::new())
    }

    /// Parse a DAG from a raw config mapping with exactly one top-level
    /// entry: `{name: {schedule_interval, default_args, ...}}`.
    ///
    /// Any other key count, a non-string key, a non-mapping body, or a
    /// structural/type mismatch during conversion is a `ConfigParseError`
    /// (serde causes are chained); semantically invalid values surface as
    /// `ValidationError`.
    pub fn from_config(config: &serde_yaml::Mapping) -> Result<Self, ConfigError> {
        let mut entries = config.iter();
        let (key, body) = match entries.next() {
            Some(entry) if entries.next().is_none() => entry,
            _ => return Err(ConfigParseError::new(config, None).into()),
        };

        let name = key
            .as_str()
            .ok_or_else(|| ConfigParseError::new(config, None))?;
        let body = body
            .as_mapping()
            .ok_or_else(|| ConfigParseError::new(config, None))?;

        // Re-shape the single entry into {name, ...body} and convert.
        let mut flat = serde_yaml::Mapping::new();
        flat.insert("name".into(), serde_yaml::Value::from(name));
        for (k, v) in body {
            flat.insert(k.clone(), v.clone());
        }

        let spec: DagSpec = serde_yaml::from_value(serde_yaml::Value::Mapping(flat))
            .map_err(|e| ConfigParseError::new(config, Some(e)))?;

        Ok(Self::from_spec(spec)?)
    }

    /// Append tasks to be scheduled as part of the DAG.
    ///
    /// Copy-then-replace: the prior sequence is never mutated in place, so
    /// holders of an earlier clone are unaffected. The append is atomic —
    /// on a duplicate name the model keeps its prior, still-valid sequence.
    pub fn add_tasks(&mut self, tasks: Vec<Arc<dyn Task>>) -> Result<(), ValidationError> {
        let mut combined = self.tasks.clone();
        combined.extend(tasks);
        validate_task_names(&combined)?;
        self.tasks = combined;
        Ok(())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn schedule_interval(&self) -> &str {
        &self.schedule_interval
    }

    pub fn default_args(&self) -> &DefaultArgs {
        &self.default_args
    }

    pub fn tasks(&self) -> &[Arc<dyn Task>] {
        &self.tasks
    }

    /// Convert the DAG to its Airflow representation and return the python
    /// code. Terminal operation of the pipeline; see `render::render_dag`.
    pub fn to_airflow_dag(
        &self,
        client: &dyn SchedulerClient,
        dags: &DagCollection,
    ) -> Result<String, RenderError> {
        crate::render::render_dag(self, client, dags)
    }
}

impl fmt::Debug for Dag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dag")
            .field("name", &self.name)
            .field("schedule_interval", &self.schedule_interval)
            .field("default_args", &self.default_args)
            .field(
                "tasks",
                &self.tasks.iter().map(|t| t.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

/// Reject duplicate task names. All names with count > 1 are reported in one
/// combined error, not just the first.
fn validate_task_names(tasks: &[Arc<dyn Task>]) -> Result<(), ValidationError> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for task in tasks {
        *counts.entry(task.name()).or_default() += 1;
    }

    let duplicates: BTreeSet<String> = counts
        .into_iter()
        .filter(|(_, count)| *count > 1)
        .map(|(name, _)| name.to_string())
        .collect();

    if !duplicates.is_empty() {
        return Err(ValidationError::DuplicateTaskNames { names: duplicates });
    }
    Ok(())
}
