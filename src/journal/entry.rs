//! Journal entry data structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{Label, Tier};

/// A mutating operation performed during a run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum JournalEvent {
    /// A new archive store was initialized
    StoreInitialized { repository: String },
    /// A tier snapshot was taken
    SnapshotCreated {
        label: Label,
        tier: Tier,
        forced: bool,
    },
    /// A snapshot was archived into a store
    ArchiveCreated { repository: String, label: Label },
    /// An excess snapshot was destroyed
    SnapshotDestroyed { label: Label },
    /// A store's native prune ran
    ArchivePruned { repository: String },
}

impl std::fmt::Display for JournalEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JournalEvent::StoreInitialized { repository } => {
                write!(f, "INIT {}", repository)
            }
            JournalEvent::SnapshotCreated { label, .. } => write!(f, "SNAPSHOT {}", label),
            JournalEvent::ArchiveCreated { repository, label } => {
                write!(f, "ARCHIVE {}::{}", repository, label)
            }
            JournalEvent::SnapshotDestroyed { label } => write!(f, "DESTROY {}", label),
            JournalEvent::ArchivePruned { repository } => write!(f, "PRUNE {}", repository),
        }
    }
}

/// A single journal line
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JournalEntry {
    /// When the operation completed (UTC)
    pub timestamp: DateTime<Utc>,

    /// Identifies all entries written by one invocation
    pub run_id: Uuid,

    /// Filesystem the operation belonged to
    pub filesystem: String,

    pub event: JournalEvent,
}

impl JournalEntry {
    pub fn new(run_id: Uuid, filesystem: impl Into<String>, event: JournalEvent) -> Self {
        Self {
            timestamp: Utc::now(),
            run_id,
            filesystem: filesystem.into(),
            event,
        }
    }
}
