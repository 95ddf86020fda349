//! Backup engine for zborg
//!
//! Decides which snapshot tier to take, creates and archives the snapshot,
//! and enforces retention on both the live snapshots and the archive stores.
//!
//! # Architecture
//!
//! Leaves first:
//!
//! - `Inventory`: lists a filesystem's tier snapshots, newest first
//! - `classify`: picks today's tier (month, week or day) as a `TierDecision`
//! - `SnapshotOrchestrator`: creates the snapshot and waits the settle delay
//! - `ArchiveExecutor`: mounts the snapshot read-only and archives it into
//!   every configured store, unmounting on every exit path
//! - `RetentionEnforcer`: destroys the oldest excess snapshots of the tier,
//!   then runs each store's own horizon-based prune
//! - `StoreBootstrap`: creates and initializes missing stores
//! - `Coordinator`: runs all of the above for each configured filesystem
//!
//! # Retention asymmetry
//!
//! Snapshots are deleted by exact count within one tier, because each one
//! pins filesystem space. Archive stores deduplicate, so they are pruned by
//! their own daily/weekly/monthly buckets with the full keep triple,
//! independently of which snapshots were just destroyed.
//!
//! # Example
//!
//! ```rust,ignore
//! use zborg::backup::Coordinator;
//!
//! let coordinator = Coordinator::new(&settings, tools, Narrator::stdout());
//! let outcomes = coordinator.run_scheduled(chrono::Local::now().date_naive())?;
//! ```

pub mod archive;
pub mod bootstrap;
pub mod classifier;
pub mod coordinator;
pub mod inventory;
pub mod retention;
pub mod snapshot;

pub use archive::ArchiveExecutor;
pub use bootstrap::StoreBootstrap;
pub use classifier::{classify, TierDecision};
pub use coordinator::{Coordinator, FilesystemOutcome, NamedOutcome};
pub use inventory::{Inventory, TierSummary};
pub use retention::{PurgeOutcome, RetentionEnforcer};
pub use snapshot::SnapshotOrchestrator;
