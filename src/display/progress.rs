//! Progress narration
//!
//! Major phases are printed to stdout bracketed with local timestamps,
//! individual steps are indented beneath them. Warnings go to stderr with the
//! program-name prefix.

use chrono::Local;

/// Timestamp format used on phase lines
const PHASE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Writes run progress for the operator
#[derive(Debug, Clone, Copy)]
pub struct Narrator {
    enabled: bool,
}

impl Narrator {
    /// Narrator printing to the terminal
    pub fn stdout() -> Self {
        Self { enabled: true }
    }

    /// Narrator that prints nothing (tests, status queries)
    pub fn silent() -> Self {
        Self { enabled: false }
    }

    /// Announce the start or end of a major phase
    pub fn phase(&self, message: &str) {
        if self.enabled {
            let timestamp = Local::now().format(PHASE_TIME_FORMAT).to_string();
            println!("{}", phase_line(&timestamp, message));
        }
    }

    /// Report one step inside the current phase
    pub fn step(&self, message: &str) {
        if self.enabled {
            println!("    {}", message);
        }
    }

    /// Report a problem that does not stop the run
    pub fn warn(&self, message: &str) {
        if self.enabled {
            eprintln!("zborg: warning: {}", message);
        }
    }
}

fn phase_line(timestamp: &str, message: &str) -> String {
    format!("[{}] {}", timestamp, message)
}
