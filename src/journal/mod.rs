//! Run journal for zborg
//!
//! Records every mutating operation of a run (store initialization, snapshot
//! creation and destruction, archive creation and pruning) in an append-only
//! log, so an operator can see afterwards what a run changed.
//!
//! # Architecture
//!
//! - `JournalEntry`: one operation, with timestamp, run id and filesystem.
//! - `JournalLogger`: appends entries to a line-delimited JSON (JSONL) file.
//! - `Journal`: a logger bound to the id of the current run.
//!
//! # Example
//!
//! ```rust,ignore
//! use zborg::journal::{Journal, JournalEvent};
//!
//! let journal = Journal::open("/var/log/zborg.jsonl");
//! journal.record("pool/data", JournalEvent::SnapshotCreated { .. })?;
//! ```

mod entry;
mod logger;

pub use entry::{JournalEntry, JournalEvent};
pub use logger::{Journal, JournalLogger};
