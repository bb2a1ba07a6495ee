use crate::dataset::item::ValueItem;
use crate::prelude::{SessionError, SessionResult};

/// Named, ordered datasets owned by a screen session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DatasetTable {
    entries: Vec<(String, Vec<ValueItem>)>,
}

impl DatasetTable {
    /// Creates a table with every name configured and no items yet.
    pub fn with_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut table = Self::default();
        for name in names {
            let name = name.into();
            if !table.contains(&name) {
                table.entries.push((name, Vec::new()));
            }
        }
        table
    }

    /// Builder used for replacement batches.
    pub fn with_dataset(mut self, name: impl Into<String>, items: Vec<ValueItem>) -> Self {
        let name = name.into();
        match self.position(&name) {
            Some(idx) => self.entries[idx].1 = items,
            None => self.entries.push((name, items)),
        }
        self
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    pub fn items(&self, name: &str) -> Option<&[ValueItem]> {
        self.position(name)
            .map(|idx| self.entries[idx].1.as_slice())
    }

    pub fn targets(&self, name: &str) -> Vec<f64> {
        self.items(name)
            .map(|items| items.iter().map(|item| item.value).collect())
            .unwrap_or_default()
    }

    /// Replaces a configured dataset wholesale. Every value must be finite and
    /// non-negative.
    pub fn replace(&mut self, name: &str, items: Vec<ValueItem>) -> SessionResult<()> {
        let idx = self
            .position(name)
            .ok_or_else(|| SessionError::UnknownDataset(name.to_string()))?;
        validate_items(name, &items)?;
        self.entries[idx].1 = items;
        Ok(())
    }

    /// Applies every dataset of `batch`, or none of them if any name is
    /// unconfigured or any item is invalid.
    pub fn replace_all(&mut self, batch: DatasetTable) -> SessionResult<Vec<String>> {
        if let Some(unknown) = batch.names().find(|name| !self.contains(name)) {
            return Err(SessionError::UnknownDataset(unknown.to_string()));
        }
        batch.validate()?;

        let mut replaced = Vec::with_capacity(batch.len());
        for (name, items) in batch.entries {
            self.replace(&name, items)?;
            replaced.push(name);
        }
        Ok(replaced)
    }

    /// Checks every item of every dataset.
    pub fn validate(&self) -> SessionResult<()> {
        self.entries
            .iter()
            .try_for_each(|(name, items)| validate_items(name, items))
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.entries.iter().position(|(entry, _)| entry == name)
    }
}

fn validate_items(name: &str, items: &[ValueItem]) -> SessionResult<()> {
    match items.iter().find(|item| !is_valid_value(item.value)) {
        Some(item) => Err(SessionError::InvalidItem {
            dataset: name.to_string(),
            key: item.key,
        }),
        None => Ok(()),
    }
}

fn is_valid_value(value: f64) -> bool {
    value.is_finite() && value >= 0.0
}
