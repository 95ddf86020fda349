//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the backup engine.

pub mod backup;
pub mod context;
pub mod status;

pub use backup::{handle_run_command, handle_snap_command};
pub use context::{require_root, RunContext};
pub use status::handle_status_command;
