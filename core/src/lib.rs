//! Dataset selection and chart-animation core for the RxLog stock dashboard.
//!
//! A session owns the dataset table, the current selection and one animation
//! run that ramps every slice of the selected dataset from zero to its target
//! on a fixed tick cadence.

pub mod animation;
pub mod dataset;
pub mod prelude;
pub mod session;
pub mod telemetry;

pub use prelude::{AnimatorConfig, SessionError, SessionResult};
pub use session::{Frame, SessionDriver, SessionHandle, SessionState};
