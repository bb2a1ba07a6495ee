use rand::{rngs::StdRng, Rng, SeedableRng};
use rxlogcore::dataset::SourceRecord;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

const MEDICATION_LABELS: &[&str] = &[
    "Dipirona",
    "Amoxicilina",
    "Paracetamol",
    "Losartana",
    "Sertralina",
    "Omeprazol",
    "Ibuprofeno",
    "Metformina",
];

const EXPIRY_LABELS: &[&str] = &["Válidos", "Vencidos", "Quase vencendo", "Outros"];

/// Configuration for generating synthetic stock records.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FixtureConfig {
    pub seed: u64,
    pub items_per_dataset: usize,
    pub max_quantity: u32,
}

impl Default for FixtureConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            items_per_dataset: 5,
            max_quantity: 120,
        }
    }
}

/// Records served per dataset name, by the mock API or the offline source.
#[derive(Debug, Clone, Default)]
pub struct FixtureSet {
    datasets: HashMap<String, Vec<SourceRecord>>,
}

impl FixtureSet {
    pub fn generate<I, S>(config: &FixtureConfig, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut rng = StdRng::seed_from_u64(config.seed);
        let mut set = Self::default();

        for name in names {
            let name = name.into();
            let labels = labels_for(&name);
            let records = labels
                .iter()
                .take(config.items_per_dataset)
                .map(|label| {
                    let quantity = rng.gen_range(0..=config.max_quantity);
                    SourceRecord::new(*label, f64::from(quantity))
                })
                .collect();
            set.insert(name, records);
        }
        set
    }

    pub fn records(&self, name: &str) -> Option<&[SourceRecord]> {
        self.datasets.get(name).map(Vec::as_slice)
    }

    pub fn insert(&mut self, name: impl Into<String>, records: Vec<SourceRecord>) {
        self.datasets.insert(name.into(), records);
    }

    #[cfg(test)]
    pub fn remove(&mut self, name: &str) -> Option<Vec<SourceRecord>> {
        self.datasets.remove(name)
    }
}

fn labels_for(name: &str) -> &'static [&'static str] {
    match name {
        "Vencimento" | "Validades" => EXPIRY_LABELS,
        _ => MEDICATION_LABELS,
    }
}
