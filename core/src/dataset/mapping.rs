use crate::dataset::item::ValueItem;
use crate::dataset::palette::Palette;
use crate::telemetry::log::LogManager;
use serde::{Deserialize, Serialize};

/// Raw record as returned by the stock API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceRecord {
    #[serde(
        rename = "nome",
        alias = "nomeMedicamento",
        alias = "name",
        alias = "label"
    )]
    pub name: String,
    #[serde(rename = "quantidade", alias = "quantity", alias = "value")]
    pub quantity: f64,
}

impl SourceRecord {
    pub fn new(name: impl Into<String>, quantity: f64) -> Self {
        Self {
            name: name.into(),
            quantity,
        }
    }
}

/// Maps records to items, assigning keys `1..=N` and palette colors in source order.
pub fn map_records(records: &[SourceRecord], palette: Palette) -> Vec<ValueItem> {
    let logger = LogManager::new("mapping");
    records
        .iter()
        .enumerate()
        .map(|(idx, record)| {
            let value = if record.quantity.is_finite() && record.quantity >= 0.0 {
                record.quantity
            } else {
                logger.warn(&format!(
                    "record {} has invalid quantity {}; using 0",
                    record.name, record.quantity
                ));
                0.0
            };
            let key = idx as u32 + 1;
            ValueItem::new(key, record.name.clone(), value, palette.color_at(idx))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mapping_assigns_sequential_keys_and_cyclic_colors() {
        let names = ["Dipirona", "Amoxicilina", "Sertralina", "Paracetamol", "Losartana"];
        let records: Vec<_> = names
            .iter()
            .enumerate()
            .map(|(idx, name)| SourceRecord::new(*name, idx as f64 * 10.0))
            .collect();

        let items = map_records(&records, Palette::STOCK);
        let keys: Vec<_> = items.iter().map(|item| item.key).collect();
        assert_eq!(keys, vec![1, 2, 3, 4, 5]);
        assert_eq!(items[0].label, "Dipirona");
        assert_eq!(items[4].color, Palette::STOCK.color_at(0));
        assert_eq!(items[3].value, 30.0);
    }

    #[test]
    fn mapping_clamps_invalid_quantities() {
        let records = vec![
            SourceRecord::new("Ibuprofeno", -3.0),
            SourceRecord::new("Omeprazol", f64::NAN),
        ];
        let items = map_records(&records, Palette::DEFAULT);
        assert!(items.iter().all(|item| item.value == 0.0));
    }

    #[test]
    fn record_accepts_api_field_spellings() {
        let json = r#"{"nomeMedicamento":"Insulina","quantidade":12}"#;
        let record: SourceRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record, SourceRecord::new("Insulina", 12.0));

        let json = r#"{"name":"Insulina","quantity":4.5}"#;
        let record: SourceRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.quantity, 4.5);
    }
}
