//! Render a validated DAG into Airflow DAG source code.
//!
//! The template is embedded so the output is a deterministic function of
//! (model, template, formatter registry): same inputs, byte-identical text.
//! Task dependency wiring runs first and must complete for every task;
//! a wiring failure aborts the render with no partial text.

pub mod formatters;

use crate::error::{RenderError, WiringError};
use crate::spec::collection::DagCollection;
use crate::spec::dag::Dag;
use crate::task::SchedulerClient;
use serde_json::{Map, Value, json};
use tera::{Context, Tera};
use tracing::debug;

pub const AIRFLOW_DAG_TEMPLATE: &str = "airflow_dag.j2";

const TEMPLATE: &str = r#"# Generated by daggen from scheduling metadata. Do not edit by hand;
# changes belong in the DAG config.

from airflow import DAG
import datetime

from operators.scheduled_query import scheduled_query

default_args = {
    "owner": "{{ default_args.owner }}",
{%- if default_args.start_date %}
    "start_date": {{ default_args.start_date | format_date }},
{%- endif %}
    "email": {{ default_args.email | python_list }},
    "depends_on_past": {{ default_args.depends_on_past | python_bool }},
    "retry_delay": {{ default_args.retry_delay | format_timedelta }},
    "email_on_failure": {{ default_args.email_on_failure | python_bool }},
    "email_on_retry": {{ default_args.email_on_retry | python_bool }},
    "retries": {{ default_args.retries }},
}

with DAG(
    "{{ name }}",
    schedule_interval={{ schedule_interval | format_schedule_interval }},
    default_args=default_args,
) as dag:
{%- if tasks %}
{%- for task in tasks %}

    {{ task.name }} = scheduled_query(
        task_id="{{ task.name }}",
{%- if task.destination_table %}
        destination_table="{{ task.destination_table }}",
{%- endif %}
{%- if task.query %}
        query="{{ task.query }}",
{%- endif %}
        dag=dag,
    )
{%- endfor %}
{%- for task in tasks %}
{%- for upstream in task.upstream | default(value=[]) %}
    {{ task.name }}.set_upstream({{ upstream }})
{%- endfor %}
{%- endfor %}
{%- else %}
    pass
{%- endif %}
"#;

/// Wire every task, then render the DAG template with the flattened model.
pub fn render_dag(
    dag: &Dag,
    client: &dyn SchedulerClient,
    dags: &DagCollection,
) -> Result<String, RenderError> {
    // 1) Dependency wiring, in task order. First failure aborts and is
    //    forwarded unchanged; the task name is stamped in only when the
    //    implementation left it unset.
    for task in dag.tasks() {
        debug!(dag = dag.name(), task = task.name(), "wiring task dependencies");
        task.wire_dependencies(client, dags).map_err(|mut e| {
            if e.task.is_empty() {
                e.task = task.name().to_string();
            }
            e
        })?;
    }

    // 2) Flatten the model into one template namespace.
    let mut ctx = Context::new();
    ctx.insert("name", dag.name());
    ctx.insert("schedule_interval", dag.schedule_interval());
    ctx.insert("default_args", &dag.default_args().to_mapping());
    ctx.insert("tasks", &task_contexts(dag));

    // 3) Render verbatim; no post-processing.
    let tera = engine().map_err(|e| template_error(dag, e))?;
    tera.render(AIRFLOW_DAG_TEMPLATE, &ctx)
        .map_err(|e| template_error(dag, e))
}

/// Fresh engine with the fixed formatter registry and the embedded template.
fn engine() -> tera::Result<Tera> {
    let mut tera = Tera::default();
    tera.autoescape_on(vec![]);
    formatters::register_all(&mut tera);
    tera.add_raw_template(AIRFLOW_DAG_TEMPLATE, TEMPLATE)?;
    Ok(tera)
}

fn template_error(dag: &Dag, source: tera::Error) -> RenderError {
    RenderError::Template {
        dag: dag.name().to_string(),
        source,
    }
}

/// One object per task: the trait-guaranteed `name` merged with whatever the
/// task exposes via `render_context`.
fn task_contexts(dag: &Dag) -> Vec<Value> {
    dag.tasks()
        .iter()
        .map(|task| {
            let mut obj = match task.render_context() {
                Value::Object(map) => map,
                Value::Null => Map::new(),
                other => {
                    let mut map = Map::new();
                    map.insert("context".to_string(), other);
                    map
                }
            };
            obj.insert("name".to_string(), json!(task.name()));
            Value::Object(obj)
        })
        .collect()
}
