use crate::animation::AnimationRun;
use crate::dataset::{DatasetTable, RenderItem, ValueItem};
use crate::prelude::{AnimatorConfig, SessionError, SessionResult};
use crate::telemetry::log::LogManager;
use serde::Serialize;

/// Whether a transition discarded the current run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Restart {
    Started(u64),
    Unchanged,
}

/// Result of applying one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Advanced,
    Completed,
    /// The tick belonged to a superseded run.
    Stale,
    /// The run was already frozen.
    Idle,
}

/// Render-ready snapshot of the selected dataset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Frame {
    pub dataset: String,
    pub run_id: u64,
    pub step: usize,
    pub step_count: usize,
    pub complete: bool,
    pub items: Vec<RenderItem>,
    pub highlight: Option<ValueItem>,
}

/// Selection, dataset table and animation state of one screen session.
#[derive(Debug, Clone)]
pub struct SessionState {
    config: AnimatorConfig,
    table: DatasetTable,
    selected: String,
    highlighted: Option<ValueItem>,
    run: AnimationRun,
    next_run_id: u64,
    logger: LogManager,
}

impl SessionState {
    pub fn new(
        config: AnimatorConfig,
        table: DatasetTable,
        default_dataset: &str,
    ) -> SessionResult<Self> {
        if table.is_empty() {
            return Err(SessionError::InvalidConfig("no datasets configured".into()));
        }
        if !table.contains(default_dataset) {
            return Err(SessionError::UnknownDataset(default_dataset.to_string()));
        }
        table.validate()?;

        let run = AnimationRun::new(0, table.targets(default_dataset), config.step_count());
        Ok(Self {
            config,
            table,
            selected: default_dataset.to_string(),
            highlighted: None,
            run,
            next_run_id: 1,
            logger: LogManager::new("session"),
        })
    }

    pub fn config(&self) -> &AnimatorConfig {
        &self.config
    }

    pub fn selected(&self) -> &str {
        &self.selected
    }

    pub fn highlighted(&self) -> Option<&ValueItem> {
        self.highlighted.as_ref()
    }

    pub fn run(&self) -> &AnimationRun {
        &self.run
    }

    pub fn table(&self) -> &DatasetTable {
        &self.table
    }

    pub fn dataset_names(&self) -> Vec<String> {
        self.table.names().map(str::to_string).collect()
    }

    pub fn current_items(&self) -> &[ValueItem] {
        self.table.items(&self.selected).unwrap_or_default()
    }

    pub fn select(&mut self, name: &str) -> SessionResult<Restart> {
        if !self.table.contains(name) {
            self.logger
                .warn(&format!("rejected selection of unknown dataset {}", name));
            return Err(SessionError::UnknownDataset(name.to_string()));
        }
        if name == self.selected {
            return Ok(Restart::Unchanged);
        }

        self.selected = name.to_string();
        self.highlighted = None;
        Ok(self.restart())
    }

    pub fn highlight(&mut self, key: u32) -> SessionResult<()> {
        let item = self
            .current_items()
            .iter()
            .find(|item| item.key == key)
            .cloned()
            .ok_or_else(|| SessionError::UnknownItem {
                dataset: self.selected.clone(),
                key,
            })?;
        self.highlighted = Some(item);
        Ok(())
    }

    pub fn clear_highlight(&mut self) {
        self.highlighted = None;
    }

    pub fn replace_dataset(
        &mut self,
        name: &str,
        items: Vec<ValueItem>,
    ) -> SessionResult<Restart> {
        self.table.replace(name, items)?;
        self.logger.trace(&format!("dataset {} replaced", name));
        if name == self.selected {
            Ok(self.restart())
        } else {
            Ok(Restart::Unchanged)
        }
    }

    pub fn replace_datasets(&mut self, batch: DatasetTable) -> SessionResult<Restart> {
        let replaced = self.table.replace_all(batch)?;
        if replaced.iter().any(|name| *name == self.selected) {
            Ok(self.restart())
        } else {
            Ok(Restart::Unchanged)
        }
    }

    /// Records a failed fetch; the dataset keeps its previous items.
    pub fn fetch_failed(&self, name: &str, reason: &str) {
        self.logger.warn(&format!(
            "fetch for dataset {} failed, keeping {} items: {}",
            name,
            self.table.items(name).map(<[ValueItem]>::len).unwrap_or(0),
            reason
        ));
    }

    pub fn tick(&mut self, run_id: u64) -> TickOutcome {
        if run_id != self.run.id() {
            return TickOutcome::Stale;
        }
        if !self.run.advance() {
            return TickOutcome::Idle;
        }
        if self.run.is_complete() {
            TickOutcome::Completed
        } else {
            TickOutcome::Advanced
        }
    }

    pub fn frame(&self) -> Frame {
        let items = self
            .current_items()
            .iter()
            .zip(self.run.values())
            .map(|(item, &value)| item.with_animated_value(value))
            .collect();

        Frame {
            dataset: self.selected.clone(),
            run_id: self.run.id(),
            step: self.run.step(),
            step_count: self.run.step_count(),
            complete: self.run.is_complete(),
            items,
            highlight: self.highlighted.clone(),
        }
    }

    fn restart(&mut self) -> Restart {
        let id = self.next_run_id;
        self.next_run_id += 1;
        self.run = AnimationRun::new(
            id,
            self.table.targets(&self.selected),
            self.config.step_count(),
        );
        self.logger.trace(&format!(
            "run {} restarted on {} with {} targets",
            id,
            self.selected,
            self.run.targets().len()
        ));
        Restart::Started(id)
    }
}
