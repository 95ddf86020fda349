//! Display formatting for terminal output
//!
//! Provides the timestamped progress narration used during runs and the
//! table formatting used by `zborg status`.

pub mod progress;
pub mod status;

pub use progress::Narrator;
pub use status::{format_run_summary, format_status};
