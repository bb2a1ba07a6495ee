use crate::prelude::AnimatorConfig;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

/// Handle to the repeating task that drives one animation run.
///
/// The task fires once per step of `config`, one tick interval apart, and is
/// aborted when the handle is stopped or dropped. A late tick pushes the
/// following ones back instead of firing a backlog.
pub struct TickTask {
    run_id: u64,
    handle: JoinHandle<()>,
}

impl TickTask {
    /// Spawns the task on the current tokio runtime. `on_tick` returning
    /// `false` ends the task early.
    pub fn spawn<F>(run_id: u64, config: &AnimatorConfig, mut on_tick: F) -> Self
    where
        F: FnMut() -> bool + Send + 'static,
    {
        let period = config.tick_interval();
        let ticks = config.step_count();
        let handle = tokio::spawn(async move {
            let mut interval = time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            for _ in 0..ticks {
                interval.tick().await;
                if !on_tick() {
                    break;
                }
            }
        });
        Self { run_id, handle }
    }

    pub fn run_id(&self) -> u64 {
        self.run_id
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    pub fn stop(self) {
        self.handle.abort();
    }
}

impl Drop for TickTask {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
