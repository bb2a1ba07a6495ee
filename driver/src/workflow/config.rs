use crate::fixture::stock::FixtureConfig;
use anyhow::Context;
use rxlogcore::dataset::DatasetTable;
use rxlogcore::{AnimatorConfig, SessionState};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// One dataset shown on the dashboard and the API endpoint it is fetched from.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DatasetSource {
    pub name: String,
    pub endpoint: String,
}

impl DatasetSource {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            endpoint: format!("/datasets/{}", name),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub api_base: String,
    pub token: Option<String>,
    pub request_timeout_ms: u64,
    pub default_dataset: String,
    pub datasets: Vec<DatasetSource>,
    pub fixture: FixtureConfig,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            api_base: "http://127.0.0.1:9000".into(),
            token: None,
            request_timeout_ms: 5_000,
            default_dataset: "Estoque".into(),
            datasets: ["Estoque", "Vencimento", "MenorEstoque"]
                .into_iter()
                .map(DatasetSource::new)
                .collect(),
            fixture: FixtureConfig::default(),
        }
    }
}

impl DashboardConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading dashboard config {}", path_ref.display()))?;
        let config: DashboardConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing dashboard config {}", path_ref.display()))?;
        Ok(config)
    }

    pub fn with_overrides(mut self, api_base: Option<String>, seed: Option<u64>) -> Self {
        if let Some(api_base) = api_base {
            self.api_base = api_base;
        }
        if let Some(seed) = seed {
            self.fixture.seed = seed;
        }
        self
    }

    pub fn dataset_names(&self) -> Vec<String> {
        self.datasets
            .iter()
            .map(|source| source.name.clone())
            .collect()
    }

    pub fn dataset_table(&self) -> DatasetTable {
        DatasetTable::with_names(self.dataset_names())
    }

    pub fn session_state(&self, animator: AnimatorConfig) -> anyhow::Result<SessionState> {
        SessionState::new(animator, self.dataset_table(), &self.default_dataset)
            .with_context(|| format!("creating session on {}", self.default_dataset))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn default_config_lists_stock_datasets() {
        let cfg = DashboardConfig::default();
        assert_eq!(cfg.dataset_names(), vec!["Estoque", "Vencimento", "MenorEstoque"]);
        assert_eq!(cfg.datasets[2].endpoint, "/datasets/MenorEstoque");
        assert!(cfg.session_state(AnimatorConfig::default()).is_ok());
    }

    #[test]
    fn config_load_reads_yaml() {
        let mut temp = NamedTempFile::new().unwrap();
        let yaml = concat!(
            "api_base: http://10.0.0.5:8080\n",
            "default_dataset: Validades\n",
            "datasets:\n",
            "  - name: Validades\n",
            "    endpoint: /medicamentos/validades\n",
            "  - name: Categorias\n",
            "    endpoint: /medicamentos/categorias\n",
            "fixture:\n",
            "  seed: 9\n",
        );
        temp.write_all(yaml.as_bytes()).unwrap();
        let path = temp.into_temp_path();
        let cfg = DashboardConfig::load(&path).unwrap();
        assert_eq!(cfg.api_base, "http://10.0.0.5:8080");
        assert_eq!(cfg.datasets[1].endpoint, "/medicamentos/categorias");
        assert_eq!(cfg.fixture.seed, 9);
        assert_eq!(cfg.fixture.items_per_dataset, 5);
        assert_eq!(cfg.request_timeout_ms, 5_000);
    }

    #[test]
    fn overrides_replace_base_and_seed() {
        let cfg = DashboardConfig::default()
            .with_overrides(Some("http://api".into()), Some(3));
        assert_eq!(cfg.api_base, "http://api");
        assert_eq!(cfg.fixture.seed, 3);
    }

    #[test]
    fn unknown_default_dataset_is_rejected() {
        let cfg = DashboardConfig {
            default_dataset: "Vendas".into(),
            ..Default::default()
        };
        assert!(cfg.session_state(AnimatorConfig::default()).is_err());
    }
}
