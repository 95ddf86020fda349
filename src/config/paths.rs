//! Path management for zborg
//!
//! Derives the per-filesystem mount points used while archiving a snapshot.
//! Mount points are keyed by filesystem, so runs against different
//! filesystems never share one.

use std::path::PathBuf;

use crate::models::repository::repo_name;

/// Manages the paths zborg mounts snapshots under
#[derive(Debug, Clone)]
pub struct BackupPaths {
    /// Directory holding one mount point per filesystem
    mount_root: PathBuf,
}

impl BackupPaths {
    pub fn new(mount_root: impl Into<PathBuf>) -> Self {
        Self {
            mount_root: mount_root.into(),
        }
    }

    /// Get the mount point for a filesystem's snapshot view
    pub fn mount_point(&self, filesystem: &str) -> PathBuf {
        self.mount_root.join(repo_name(filesystem))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mount_point_per_filesystem() {
        let paths = BackupPaths::new("/run/zborg");
        assert_eq!(
            paths.mount_point("pool/data"),
            PathBuf::from("/run/zborg/pool_data")
        );
        assert_ne!(paths.mount_point("pool/data"), paths.mount_point("pool/home"));
    }
}
