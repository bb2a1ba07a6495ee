use serde::Serialize;
use std::sync::Mutex;

pub struct MetricsRecorder {
    inner: Mutex<SessionMetrics>,
}

/// Counters collected over the lifetime of a session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SessionMetrics {
    pub ticks: usize,
    pub restarts: usize,
    pub stale_ticks: usize,
    pub fetch_failures: usize,
}

impl MetricsRecorder {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(SessionMetrics::default()),
        }
    }

    pub fn record_tick(&self) {
        self.update(|metrics| metrics.ticks += 1);
    }

    pub fn record_restart(&self) {
        self.update(|metrics| metrics.restarts += 1);
    }

    pub fn record_stale_tick(&self) {
        self.update(|metrics| metrics.stale_ticks += 1);
    }

    pub fn record_fetch_failure(&self) {
        self.update(|metrics| metrics.fetch_failures += 1);
    }

    pub fn snapshot(&self) -> SessionMetrics {
        if let Ok(metrics) = self.inner.lock() {
            *metrics
        } else {
            SessionMetrics::default()
        }
    }

    fn update(&self, apply: impl FnOnce(&mut SessionMetrics)) {
        if let Ok(mut metrics) = self.inner.lock() {
            apply(&mut metrics);
        }
    }
}

impl Default for MetricsRecorder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recorder_accumulates_counters() {
        let recorder = MetricsRecorder::new();
        recorder.record_tick();
        recorder.record_tick();
        recorder.record_restart();
        recorder.record_fetch_failure();

        let snapshot = recorder.snapshot();
        assert_eq!(snapshot.ticks, 2);
        assert_eq!(snapshot.restarts, 1);
        assert_eq!(snapshot.stale_ticks, 0);
        assert_eq!(snapshot.fetch_failures, 1);
    }
}
