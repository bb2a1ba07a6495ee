use crate::api::client::ApiClient;
use crate::fixture::stock::FixtureSet;
use crate::workflow::config::{DashboardConfig, DatasetSource};
use anyhow::Context;
use log::{info, warn};
use rxlogcore::dataset::{map_records, Palette, SourceRecord};
use rxlogcore::telemetry::SessionMetrics;
use rxlogcore::{AnimatorConfig, Frame, SessionDriver, SessionError, SessionHandle};
use std::sync::Arc;

/// Where dataset records come from.
#[derive(Clone)]
pub enum RecordSource {
    Http(ApiClient),
    Fixture(Arc<FixtureSet>),
}

impl RecordSource {
    pub async fn fetch(&self, dataset: &DatasetSource) -> anyhow::Result<Vec<SourceRecord>> {
        match self {
            RecordSource::Http(client) => client.fetch_records(&dataset.endpoint).await,
            RecordSource::Fixture(fixtures) => fixtures
                .records(&dataset.name)
                .map(<[SourceRecord]>::to_vec)
                .with_context(|| format!("no fixture records for dataset {}", dataset.name)),
        }
    }
}

pub struct RunReport {
    /// Selectable dataset names in menu order.
    pub dataset_names: Vec<String>,
    /// Completed frame of the default dataset, then one per accepted selection.
    pub frames: Vec<Frame>,
    pub rejected: Vec<String>,
    pub metrics: SessionMetrics,
}

pub struct Runner {
    config: DashboardConfig,
    animator: AnimatorConfig,
    source: RecordSource,
    highlight: Option<u32>,
}

impl Runner {
    pub fn new(config: DashboardConfig, animator: AnimatorConfig, source: RecordSource) -> Self {
        Self {
            config,
            animator,
            source,
            highlight: None,
        }
    }

    /// Highlights the item with `key` once each animation completes.
    pub fn with_highlight(mut self, key: Option<u32>) -> Self {
        self.highlight = key;
        self
    }

    pub async fn run(&self, selections: &[String]) -> anyhow::Result<RunReport> {
        let state = self.config.session_state(self.animator)?;
        let dataset_names = state.dataset_names();
        let (handle, join) = SessionDriver::spawn(state);

        let fetches: Vec<_> = self
            .config
            .datasets
            .iter()
            .cloned()
            .map(|dataset| {
                let source = self.source.clone();
                let handle = handle.clone();
                tokio::spawn(async move { load_dataset(&source, &handle, &dataset).await })
            })
            .collect();
        for fetch in fetches {
            fetch.await.context("joining fetch task")??;
        }

        let mut frames = vec![self.settle(&handle).await?];
        let mut rejected = Vec::new();
        for name in selections {
            match handle.select(name).await {
                Ok(()) => frames.push(self.settle(&handle).await?),
                Err(SessionError::UnknownDataset(unknown)) => {
                    warn!("skipping selection of unconfigured dataset {}", unknown);
                    rejected.push(unknown);
                }
                Err(err) => return Err(err).context("applying selection"),
            }
        }

        let metrics = handle.metrics();
        handle.shutdown();
        join.await.context("joining session task")?;
        Ok(RunReport {
            dataset_names,
            frames,
            rejected,
            metrics,
        })
    }

    async fn settle(&self, handle: &SessionHandle) -> anyhow::Result<Frame> {
        let frame = handle.wait_complete().await?;
        let Some(key) = self.highlight else {
            return Ok(frame);
        };
        match handle.highlight(key).await {
            Ok(()) => Ok(handle.frame()),
            Err(SessionError::UnknownItem { dataset, key }) => {
                warn!("dataset {} has no item {} to highlight", dataset, key);
                Ok(frame)
            }
            Err(err) => Err(err).context("applying highlight"),
        }
    }
}

async fn load_dataset(
    source: &RecordSource,
    handle: &SessionHandle,
    dataset: &DatasetSource,
) -> anyhow::Result<()> {
    match source.fetch(dataset).await {
        Ok(records) => {
            let items = map_records(&records, Palette::for_dataset(&dataset.name));
            info!("dataset {} fetched with {} items", dataset.name, items.len());
            handle
                .dataset_arrived(&dataset.name, items)
                .await
                .with_context(|| format!("applying dataset {}", dataset.name))?;
        }
        Err(err) => {
            handle
                .fetch_failed(&dataset.name, &format!("{:#}", err))
                .await
                .context("reporting fetch failure")?;
        }
    }
    Ok(())
}
