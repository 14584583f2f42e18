pub mod clock;
pub mod driver;
mod run_tracker;

pub use clock::{Clock, ManualClock, SystemClock};
pub use run_tracker::{FixUpdate, RunSession, RunState, RunTracker};
