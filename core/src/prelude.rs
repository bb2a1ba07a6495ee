use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Number of ticks a full animation run takes.
pub const DEFAULT_STEP_COUNT: usize = 30;

/// Spacing between two animation ticks.
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 20;

/// Fixed animation cadence shared by every run of a session.
///
/// Both values are positive; deserialization goes through [`AnimatorConfig::new`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawAnimatorConfig")]
pub struct AnimatorConfig {
    step_count: usize,
    tick_interval_ms: u64,
}

#[derive(Deserialize)]
struct RawAnimatorConfig {
    step_count: usize,
    tick_interval_ms: u64,
}

impl TryFrom<RawAnimatorConfig> for AnimatorConfig {
    type Error = SessionError;

    fn try_from(raw: RawAnimatorConfig) -> SessionResult<Self> {
        Self::new(raw.step_count, raw.tick_interval_ms)
    }
}

impl AnimatorConfig {
    pub fn new(step_count: usize, tick_interval_ms: u64) -> SessionResult<Self> {
        if step_count == 0 {
            return Err(SessionError::InvalidConfig(
                "step count must be positive".into(),
            ));
        }
        if tick_interval_ms == 0 {
            return Err(SessionError::InvalidConfig(
                "tick interval must be positive".into(),
            ));
        }
        Ok(Self {
            step_count,
            tick_interval_ms,
        })
    }

    pub fn step_count(&self) -> usize {
        self.step_count
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }
}

impl Default for AnimatorConfig {
    fn default() -> Self {
        Self {
            step_count: DEFAULT_STEP_COUNT,
            tick_interval_ms: DEFAULT_TICK_INTERVAL_MS,
        }
    }
}

/// Common error type for session transitions.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("unknown dataset: {0}")]
    UnknownDataset(String),
    #[error("unknown item {key} in dataset {dataset}")]
    UnknownItem { dataset: String, key: u32 },
    #[error("item {key} in dataset {dataset} has a negative or non-finite value")]
    InvalidItem { dataset: String, key: u32 },
    #[error("invalid config: {0}")]
    InvalidConfig(String),
    #[error("session closed")]
    Closed,
}

pub type SessionResult<T> = Result<T, SessionError>;
