//! daggen: validated Airflow DAG models and code generation.
//!
//! Pipeline: dags.yaml mapping -> validated `spec::Dag` -> tasks attached by
//! the caller -> `render::render_dag` -> Airflow python source.
//!
//! The crate owns parsing/validation of the scheduling config and the
//! deterministic render step. Task internals (dependency resolution against
//! external metadata) stay behind the `task::Task` trait.

pub mod error;
pub mod render;
pub mod spec;
pub mod task;

pub type Result<T> = anyhow::Result<T>;
