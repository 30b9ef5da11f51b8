//! Task and scheduler-client collaborator seams.
//!
//! Task internals (query metadata, dependency resolution) live outside this
//! crate. The core only needs a stable name for uniqueness checks, a wiring
//! hook invoked before rendering, and the extra fields a task wants to
//! expose to the template.

use crate::error::WiringError;
use crate::spec::collection::DagCollection;
use std::any::Any;

/// A task reference held by a DAG. Identity is `name()`; the DAG model
/// enforces uniqueness within one DAG.
pub trait Task {
    fn name(&self) -> &str;

    /// Resolve upstream dependencies against the sibling DAGs. This is the
    /// only blocking point in the pipeline and may hit external services;
    /// implementations needing to record results use interior mutability.
    fn wire_dependencies(
        &self,
        client: &dyn SchedulerClient,
        dags: &DagCollection,
    ) -> Result<(), WiringError>;

    /// Extra fields exposed to the template, merged with `name`. Must be a
    /// JSON object; anything else is nested under a `context` key.
    fn render_context(&self) -> serde_json::Value {
        serde_json::Value::Object(serde_json::Map::new())
    }
}

/// Opaque capability handed through to task wiring (e.g. a warehouse
/// metadata client). The core never calls into it; concrete task
/// implementations downcast to the client type they expect.
pub trait SchedulerClient {
    fn as_any(&self) -> &dyn Any;
}

/// Client for wiring steps that need no external lookups (CLI, tests).
pub struct NoopClient;

impl SchedulerClient for NoopClient {
    fn as_any(&self) -> &dyn Any {
        self
    }
}
