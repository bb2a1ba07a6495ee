pub mod interpolate;
pub mod run;
pub mod ticker;

pub use interpolate::{animate, animated_value, snapshot_at, Snapshots};
pub use run::AnimationRun;
pub use ticker::TickTask;
