pub mod actor;
pub mod state;

pub use actor::{SessionDriver, SessionHandle};
pub use state::{Frame, Restart, SessionState, TickOutcome};
