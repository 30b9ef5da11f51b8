//! Spec layer: raw config shapes + validated in-memory models.
//!
//! This module is intentionally separate from rendering. It owns:
//! - format predicates (email, date, timedelta, schedule interval, name)
//! - DefaultArgs (execution defaults value object)
//! - Dag (named, scheduled task collection)
//! - DagCollection (every DAG from one config file)

pub mod collection;
pub mod dag;
pub mod default_args;
pub mod validate;

pub use collection::DagCollection;
pub use dag::{Dag, DagSpec};
pub use default_args::{DefaultArgs, DefaultArgsSpec};
