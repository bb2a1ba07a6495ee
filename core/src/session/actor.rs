use crate::animation::TickTask;
use crate::dataset::ValueItem;
use crate::prelude::{SessionError, SessionResult};
use crate::session::state::{Frame, Restart, SessionState, TickOutcome};
use crate::telemetry::log::LogManager;
use crate::telemetry::metrics::{MetricsRecorder, SessionMetrics};
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;

enum Command {
    Select {
        name: String,
        reply: oneshot::Sender<SessionResult<()>>,
    },
    Highlight {
        key: u32,
        reply: oneshot::Sender<SessionResult<()>>,
    },
    ClearHighlight {
        reply: oneshot::Sender<()>,
    },
    DatasetArrived {
        name: String,
        items: Vec<ValueItem>,
        reply: oneshot::Sender<SessionResult<()>>,
    },
    FetchFailed {
        name: String,
        reason: String,
        reply: oneshot::Sender<()>,
    },
    Tick {
        run_id: u64,
    },
    Shutdown,
}

/// Single owner of a [`SessionState`]; applies commands and ticks in queue order.
pub struct SessionDriver {
    state: SessionState,
    ticker: Option<TickTask>,
    queue: mpsc::WeakUnboundedSender<Command>,
    frames: watch::Sender<Frame>,
    metrics: Arc<MetricsRecorder>,
    logger: LogManager,
}

impl SessionDriver {
    /// Moves `state` into a task on the current runtime and starts its first run.
    pub fn spawn(state: SessionState) -> (SessionHandle, JoinHandle<SessionState>) {
        let (commands, receiver) = mpsc::unbounded_channel();
        let (frames, frame_receiver) = watch::channel(state.frame());
        let metrics = Arc::new(MetricsRecorder::new());

        let mut driver = SessionDriver {
            state,
            ticker: None,
            queue: commands.downgrade(),
            frames,
            metrics: metrics.clone(),
            logger: LogManager::new("session"),
        };
        let first_run = driver.state.run().id();
        driver.start_ticker(first_run);

        let join = tokio::spawn(driver.run(receiver));
        let handle = SessionHandle {
            commands,
            frames: frame_receiver,
            metrics,
        };
        (handle, join)
    }

    async fn run(mut self, mut receiver: mpsc::UnboundedReceiver<Command>) -> SessionState {
        while let Some(command) = receiver.recv().await {
            if matches!(command, Command::Shutdown) {
                break;
            }
            self.apply(command);
        }
        self.stop_ticker();
        self.logger.record(&format!(
            "session on {} stopped after {} ticks",
            self.state.selected(),
            self.metrics.snapshot().ticks
        ));
        self.state
    }

    fn apply(&mut self, command: Command) {
        match command {
            Command::Select { name, reply } => {
                let result = self
                    .state
                    .select(&name)
                    .map(|restart| self.on_restart(restart));
                let _ = reply.send(result);
            }
            Command::Highlight { key, reply } => {
                let result = self.state.highlight(key);
                self.publish();
                let _ = reply.send(result);
            }
            Command::ClearHighlight { reply } => {
                self.state.clear_highlight();
                self.publish();
                let _ = reply.send(());
            }
            Command::DatasetArrived { name, items, reply } => {
                let result = self
                    .state
                    .replace_dataset(&name, items)
                    .map(|restart| self.on_restart(restart));
                let _ = reply.send(result);
            }
            Command::FetchFailed {
                name,
                reason,
                reply,
            } => {
                self.metrics.record_fetch_failure();
                self.state.fetch_failed(&name, &reason);
                let _ = reply.send(());
            }
            Command::Tick { run_id } => match self.state.tick(run_id) {
                TickOutcome::Advanced => {
                    self.metrics.record_tick();
                    self.publish();
                }
                TickOutcome::Completed => {
                    self.metrics.record_tick();
                    self.stop_ticker();
                    self.publish();
                }
                TickOutcome::Stale => {
                    self.metrics.record_stale_tick();
                    self.logger
                        .trace(&format!("dropped tick of superseded run {}", run_id));
                }
                TickOutcome::Idle => {}
            },
            Command::Shutdown => {}
        }
    }

    fn on_restart(&mut self, restart: Restart) {
        if let Restart::Started(run_id) = restart {
            self.metrics.record_restart();
            self.stop_ticker();
            self.start_ticker(run_id);
        }
        self.publish();
    }

    fn start_ticker(&mut self, run_id: u64) {
        let queue = self.queue.clone();
        let config = *self.state.config();
        self.ticker = Some(TickTask::spawn(run_id, &config, move || {
            let Some(sender) = queue.upgrade() else {
                return false;
            };
            sender.send(Command::Tick { run_id }).is_ok()
        }));
    }

    fn stop_ticker(&mut self) {
        if let Some(ticker) = self.ticker.take() {
            ticker.stop();
        }
    }

    fn publish(&self) {
        self.frames.send_replace(self.state.frame());
    }
}

/// Cloneable front end of a running session.
#[derive(Clone)]
pub struct SessionHandle {
    commands: mpsc::UnboundedSender<Command>,
    frames: watch::Receiver<Frame>,
    metrics: Arc<MetricsRecorder>,
}

impl SessionHandle {
    pub async fn select(&self, name: &str) -> SessionResult<()> {
        self.request(|reply| Command::Select {
            name: name.to_string(),
            reply,
        })
        .await?
    }

    pub async fn highlight(&self, key: u32) -> SessionResult<()> {
        self.request(|reply| Command::Highlight { key, reply }).await?
    }

    pub async fn clear_highlight(&self) -> SessionResult<()> {
        self.request(|reply| Command::ClearHighlight { reply }).await
    }

    pub async fn dataset_arrived(&self, name: &str, items: Vec<ValueItem>) -> SessionResult<()> {
        self.request(|reply| Command::DatasetArrived {
            name: name.to_string(),
            items,
            reply,
        })
        .await?
    }

    pub async fn fetch_failed(&self, name: &str, reason: &str) -> SessionResult<()> {
        self.request(|reply| Command::FetchFailed {
            name: name.to_string(),
            reason: reason.to_string(),
            reply,
        })
        .await
    }

    /// Latest published frame.
    pub fn frame(&self) -> Frame {
        self.frames.borrow().clone()
    }

    /// Waits until the current run has reached its targets.
    pub async fn wait_complete(&self) -> SessionResult<Frame> {
        let mut frames = self.frames.clone();
        let frame = frames
            .wait_for(|frame| frame.complete)
            .await
            .map_err(|_| SessionError::Closed)?;
        Ok(frame.clone())
    }

    pub fn metrics(&self) -> SessionMetrics {
        self.metrics.snapshot()
    }

    pub fn shutdown(&self) {
        let _ = self.commands.send(Command::Shutdown);
    }

    async fn request<T>(
        &self,
        build: impl FnOnce(oneshot::Sender<T>) -> Command,
    ) -> SessionResult<T> {
        let (reply, response) = oneshot::channel();
        self.commands
            .send(build(reply))
            .map_err(|_| SessionError::Closed)?;
        response.await.map_err(|_| SessionError::Closed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{map_records, DatasetTable, Palette, SourceRecord};
    use crate::prelude::AnimatorConfig;
    use std::time::Duration;

    fn items(name: &str, values: &[f64]) -> Vec<ValueItem> {
        let records: Vec<_> = values
            .iter()
            .enumerate()
            .map(|(idx, &value)| SourceRecord::new(format!("{name} {idx}"), value))
            .collect();
        map_records(&records, Palette::for_dataset(name))
    }

    fn state() -> SessionState {
        let table = DatasetTable::with_names(["Estoque", "Vencimento", "MenorEstoque"]);
        let config = AnimatorConfig::new(10, 20).unwrap();
        SessionState::new(config, table, "Estoque").unwrap()
    }

    fn values(frame: &Frame) -> Vec<f64> {
        frame.items.iter().map(|item| item.value).collect()
    }

    #[tokio::test(start_paused = true)]
    async fn arriving_data_animates_to_targets() {
        let (handle, join) = SessionDriver::spawn(state());
        handle
            .dataset_arrived("Estoque", items("Estoque", &[40.0, 10.0, 20.0, 30.0]))
            .await
            .unwrap();
        assert_eq!(handle.frame().step, 0);

        let frame = handle.wait_complete().await.unwrap();
        assert_eq!(frame.dataset, "Estoque");
        assert_eq!(values(&frame), vec![40.0, 10.0, 20.0, 30.0]);
        assert_eq!(frame.items[1].color, Palette::STOCK.color_at(1));

        handle.shutdown();
        let final_state = join.await.unwrap();
        assert!(final_state.run().is_complete());
    }

    #[tokio::test(start_paused = true)]
    async fn selection_mid_run_supersedes_previous_ticks() {
        let (handle, join) = SessionDriver::spawn(state());
        handle
            .dataset_arrived("Estoque", items("Estoque", &[100.0]))
            .await
            .unwrap();
        handle
            .dataset_arrived("Vencimento", items("Vencimento", &[25.0, 35.0, 40.0]))
            .await
            .unwrap();

        tokio::time::sleep(Duration::from_millis(90)).await;
        assert!(!handle.frame().complete);

        handle.select("Vencimento").await.unwrap();
        let first = handle.frame();
        assert_eq!(first.step, 0);
        assert_eq!(values(&first), vec![0.0, 0.0, 0.0]);

        let frame = handle.wait_complete().await.unwrap();
        assert_eq!(frame.dataset, "Vencimento");
        assert_eq!(frame.run_id, first.run_id);
        assert_eq!(values(&frame), vec![25.0, 35.0, 40.0]);

        let metrics = handle.metrics();
        assert_eq!(metrics.restarts, 2);
        handle.shutdown();
        join.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn rejected_selection_reaches_caller() {
        let (handle, _join) = SessionDriver::spawn(state());
        let err = handle.select("Vendas").await.unwrap_err();
        assert_eq!(err, SessionError::UnknownDataset("Vendas".into()));
        assert_eq!(handle.frame().dataset, "Estoque");
    }

    #[tokio::test(start_paused = true)]
    async fn highlight_is_published_without_restart() {
        let (handle, _join) = SessionDriver::spawn(state());
        handle
            .dataset_arrived("Estoque", items("Estoque", &[3.0, 9.0]))
            .await
            .unwrap();
        handle.wait_complete().await.unwrap();

        handle.highlight(2).await.unwrap();
        let frame = handle.frame();
        assert!(frame.complete);
        assert_eq!(frame.highlight.as_ref().map(|item| item.value), Some(9.0));

        handle.clear_highlight().await.unwrap();
        assert!(handle.frame().highlight.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn fetch_failure_is_counted_and_keeps_items() {
        let (handle, _join) = SessionDriver::spawn(state());
        handle
            .dataset_arrived("Estoque", items("Estoque", &[5.0]))
            .await
            .unwrap();
        handle.fetch_failed("Estoque", "timeout").await.unwrap();

        let frame = handle.wait_complete().await.unwrap();
        assert_eq!(values(&frame), vec![5.0]);
        assert_eq!(handle.metrics().fetch_failures, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn tick_of_superseded_run_leaves_frame_untouched() {
        let (handle, _join) = SessionDriver::spawn(state());
        let superseded = handle.frame().run_id;
        handle
            .dataset_arrived("Estoque", items("Estoque", &[40.0, 10.0]))
            .await
            .unwrap();
        let before = handle.frame();
        assert_ne!(before.run_id, superseded);

        let sent = handle.commands.send(Command::Tick { run_id: superseded });
        assert!(sent.is_ok());
        handle.clear_highlight().await.unwrap();

        assert_eq!(handle.frame(), before);
        assert_eq!(handle.frame().step, 0);
        assert_eq!(handle.metrics().stale_ticks, 1);
        assert_eq!(handle.metrics().ticks, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn invalid_arrival_is_rejected_without_restart() {
        let (handle, _join) = SessionDriver::spawn(state());
        let before = handle.frame();
        let arrived = vec![
            ValueItem::new(1, "Dipirona", 2.0, "#FFF"),
            ValueItem::new(2, "Losartana", -4.0, "#FFF"),
        ];
        let err = handle
            .dataset_arrived("Estoque", arrived)
            .await
            .unwrap_err();
        assert!(matches!(err, SessionError::InvalidItem { key: 2, .. }));
        assert_eq!(handle.frame().run_id, before.run_id);
        assert_eq!(handle.metrics().restarts, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn closed_session_reports_closed() {
        let (handle, join) = SessionDriver::spawn(state());
        handle.shutdown();
        join.await.unwrap();
        assert_eq!(handle.select("Vencimento").await, Err(SessionError::Closed));
    }
}
