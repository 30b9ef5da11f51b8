//! DAG collection: every DAG parsed from one dags.yaml file.
//!
//! File order is preserved; lookups go by name. The collection is also the
//! cross-DAG context handed to task wiring during rendering.

use crate::error::ConfigError;
use crate::spec::dag::Dag;
use crate::task::SchedulerClient;
use anyhow::Context;
use std::fs;
use std::path::Path;
use tracing::info;

#[derive(Debug, Clone, Default)]
pub struct DagCollection {
    dags: Vec<Dag>,
}

impl DagCollection {
    pub fn new(dags: Vec<Dag>) -> Self {
        Self { dags }
    }

    /// Parse every top-level entry as one DAG. Each entry is handed to
    /// `Dag::from_config` as its own single-entry mapping.
    pub fn from_mapping(config: &serde_yaml::Mapping) -> Result<Self, ConfigError> {
        let mut dags = Vec::new();
        for (key, body) in config {
            let mut single = serde_yaml::Mapping::new();
            single.insert(key.clone(), body.clone());
            dags.push(Dag::from_config(&single)?);
        }
        Ok(Self::new(dags))
    }

    /// Read and parse a dags.yaml file.
    pub fn from_file(path: impl AsRef<Path>) -> crate::Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .with_context(|| format!("read DAG config {}", path.display()))?;
        let config: serde_yaml::Mapping = serde_yaml::from_str(&text)
            .with_context(|| format!("parse DAG config {}", path.display()))?;
        Ok(Self::from_mapping(&config)?)
    }

    pub fn dag_by_name(&self, name: &str) -> Option<&Dag> {
        self.dags.iter().find(|d| d.name() == name)
    }

    pub fn dag_by_name_mut(&mut self, name: &str) -> Option<&mut Dag> {
        self.dags.iter_mut().find(|d| d.name() == name)
    }

    pub fn dags(&self) -> &[Dag] {
        &self.dags
    }

    /// Render every DAG and write `<name>.py` files into `out_dir`.
    pub fn to_airflow(&self, client: &dyn SchedulerClient, out_dir: &Path) -> crate::Result<()> {
        fs::create_dir_all(out_dir)
            .with_context(|| format!("create output dir {}", out_dir.display()))?;

        for dag in &self.dags {
            let code = dag.to_airflow_dag(client, self)?;
            let path = out_dir.join(format!("{}.py", dag.name()));
            fs::write(&path, code)
                .with_context(|| format!("write DAG file {}", path.display()))?;
            info!(dag = dag.name(), path = %path.display(), "generated Airflow DAG");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const TWO_DAGS: &str = r#"
bqetl_core:
  schedule_interval: "@daily"
  default_args:
    owner: a@b.com
    start_date: "2020-01-01"
bqetl_hourly_rollup:
  schedule_interval: 1h
  default_args:
    owner: c@d.org
"#;

    #[test]
    fn from_mapping_parses_every_entry_in_order() {
        let config: serde_yaml::Mapping = serde_yaml::from_str(TWO_DAGS).unwrap();
        let collection = DagCollection::from_mapping(&config).unwrap();

        let names: Vec<&str> = collection.dags().iter().map(|d| d.name()).collect();
        assert_eq!(names, vec!["bqetl_core", "bqetl_hourly_rollup"]);
    }

    #[test]
    fn dag_by_name_finds_parsed_dags() {
        let config: serde_yaml::Mapping = serde_yaml::from_str(TWO_DAGS).unwrap();
        let collection = DagCollection::from_mapping(&config).unwrap();

        let dag = collection.dag_by_name("bqetl_hourly_rollup").unwrap();
        assert_eq!(dag.schedule_interval(), "1h");
        assert!(collection.dag_by_name("bqetl_missing").is_none());
    }

    #[test]
    fn from_mapping_propagates_the_first_invalid_entry() {
        let config: serde_yaml::Mapping = serde_yaml::from_str(
            "not_prefixed: {schedule_interval: \"@daily\", default_args: {owner: a@b.com}}",
        )
        .unwrap();
        assert!(DagCollection::from_mapping(&config).is_err());
    }
}
