//! Journal logger
//!
//! Each entry is written as a single JSON line and flushed immediately, so a
//! run that aborts still leaves a record of what it had already done.

use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::PathBuf;

use uuid::Uuid;

use super::entry::{JournalEntry, JournalEvent};
use crate::error::{ZborgError, ZborgResult};

/// Appends journal entries to a JSONL file
pub struct JournalLogger {
    log_path: PathBuf,
}

impl JournalLogger {
    pub fn new(log_path: PathBuf) -> Self {
        Self { log_path }
    }

    /// Append one entry
    pub fn log(&self, entry: &JournalEntry) -> ZborgResult<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)
            .map_err(|e| ZborgError::Io(format!("Failed to open journal: {}", e)))?;

        let json = serde_json::to_string(entry)
            .map_err(|e| ZborgError::Json(format!("Failed to serialize journal entry: {}", e)))?;

        writeln!(file, "{}", json)
            .map_err(|e| ZborgError::Io(format!("Failed to write journal entry: {}", e)))?;

        file.flush()
            .map_err(|e| ZborgError::Io(format!("Failed to flush journal: {}", e)))?;

        Ok(())
    }

    /// Read all entries back
    pub fn read_all(&self) -> ZborgResult<Vec<JournalEntry>> {
        if !self.log_path.exists() {
            return Ok(Vec::new());
        }

        let file = File::open(&self.log_path)
            .map_err(|e| ZborgError::Io(format!("Failed to open journal: {}", e)))?;

        let mut entries = Vec::new();
        for (line_num, line) in BufReader::new(file).lines().enumerate() {
            let line = line.map_err(|e| {
                ZborgError::Io(format!("Failed to read journal line {}: {}", line_num + 1, e))
            })?;
            if line.trim().is_empty() {
                continue;
            }
            let entry: JournalEntry = serde_json::from_str(&line).map_err(|e| {
                ZborgError::Json(format!("Failed to parse journal line {}: {}", line_num + 1, e))
            })?;
            entries.push(entry);
        }

        Ok(entries)
    }
}

/// A journal logger bound to one run
pub struct Journal {
    logger: JournalLogger,
    run_id: Uuid,
}

impl Journal {
    /// Start a new run journal at `path`
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self {
            logger: JournalLogger::new(path.into()),
            run_id: Uuid::new_v4(),
        }
    }

    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    pub fn record(&self, filesystem: &str, event: JournalEvent) -> ZborgResult<()> {
        self.logger
            .log(&JournalEntry::new(self.run_id, filesystem, event))
    }

    pub fn entries(&self) -> ZborgResult<Vec<JournalEntry>> {
        self.logger.read_all()
    }
}
