//! Typed interfaces to the external subsystems
//!
//! The backup engine never builds command lines itself. Every external call
//! (snapshot list/create/destroy, mount/unmount, store init/create/prune,
//! remote probe) is a method on one of the traits below with structured
//! arguments. The real implementations turn those into argument vectors for
//! `zfs`, `mount`, `ssh` and `borg`.

pub mod borg;
pub mod exec;
pub mod host;
pub mod zfs;

#[cfg(test)]
pub mod fake;

use std::path::Path;

use crate::error::ZborgResult;
use crate::models::{Label, Repository, RetentionPolicy};

pub use borg::BorgTool;
pub use exec::{CommandOutput, CommandRunner, Invocation};
pub use host::SystemHost;
pub use zfs::ZfsTool;

/// Snapshot subsystem of a copy-on-write filesystem
pub trait SnapshotTool {
    /// Full names (`filesystem@label`) of the snapshots of a filesystem, in
    /// no particular order
    fn list_snapshots(&self, filesystem: &str) -> ZborgResult<Vec<String>>;

    fn create_snapshot(&self, filesystem: &str, label: &Label) -> ZborgResult<()>;

    fn destroy_snapshot(&self, filesystem: &str, label: &Label) -> ZborgResult<()>;
}

/// Mounts, directories and remote host access
pub trait HostTool {
    /// Mount a snapshot read-only, creating the mount point if needed
    fn mount_snapshot(&self, filesystem: &str, label: &Label, mount_point: &Path)
        -> ZborgResult<()>;

    fn unmount(&self, mount_point: &Path) -> ZborgResult<()>;

    fn local_dir_exists(&self, path: &Path) -> bool;

    fn create_local_dir(&self, path: &Path) -> ZborgResult<()>;

    /// Probe a directory on a remote host; absence is `Ok(false)`, not an error
    fn remote_dir_exists(&self, host: &str, directory: &str) -> ZborgResult<bool>;

    fn create_remote_dir(&self, host: &str, directory: &str) -> ZborgResult<()>;

    /// Make a local tree world-readable
    fn widen_permissions(&self, path: &Path) -> ZborgResult<()>;
}

/// Deduplicating archive store
pub trait ArchiveTool {
    fn init_store(&self, repo: &Repository) -> ZborgResult<()>;

    /// Archive the tree under `source` as entry `label`
    fn create_archive(&self, repo: &Repository, label: &Label, source: &Path) -> ZborgResult<()>;

    /// Store-native horizon pruning with the full keep triple
    fn prune(&self, repo: &Repository, policy: &RetentionPolicy) -> ZborgResult<()>;
}

/// The set of external tools one run works with
#[derive(Clone, Copy)]
pub struct Tools<'a> {
    pub snapshots: &'a dyn SnapshotTool,
    pub host: &'a dyn HostTool,
    pub archives: &'a dyn ArchiveTool,
}
