//! Archive executor
//!
//! Mounts a read-only view of a snapshot and creates one archive entry per
//! configured repository. The mount is owned by a [`MountGuard`], so it is
//! released on every exit path, including a failing repository.

use std::path::{Path, PathBuf};

use crate::config::paths::BackupPaths;
use crate::config::settings::ArchiveOptions;
use crate::display::progress::Narrator;
use crate::error::ZborgResult;
use crate::models::{DestinationKind, Label, Repository};
use crate::system::Tools;

/// A mounted snapshot view; unmounted when released or dropped
struct MountGuard<'a> {
    tools: Tools<'a>,
    mount_point: PathBuf,
    narrator: Narrator,
    mounted: bool,
}

impl<'a> MountGuard<'a> {
    fn mount(
        tools: Tools<'a>,
        filesystem: &str,
        label: &Label,
        mount_point: PathBuf,
        narrator: Narrator,
    ) -> ZborgResult<Self> {
        tools.host.mount_snapshot(filesystem, label, &mount_point)?;
        narrator.step(&format!(
            "Mounted {} on {}",
            label.snapshot_of(filesystem),
            mount_point.display()
        ));
        Ok(Self {
            tools,
            mount_point,
            narrator,
            mounted: true,
        })
    }

    fn path(&self) -> &Path {
        &self.mount_point
    }

    /// Unmount and report the result
    fn release(mut self) -> ZborgResult<()> {
        self.mounted = false;
        self.tools.host.unmount(&self.mount_point)?;
        self.narrator
            .step(&format!("Unmounted {}", self.mount_point.display()));
        Ok(())
    }
}

impl Drop for MountGuard<'_> {
    fn drop(&mut self) {
        if !self.mounted {
            return;
        }
        // Only reached while an earlier error is propagating; keep that error.
        if let Err(e) = self.tools.host.unmount(&self.mount_point) {
            self.narrator.warn(&format!(
                "failed to unmount {}: {}",
                self.mount_point.display(),
                e
            ));
        }
    }
}

/// Creates archive entries from snapshots
pub struct ArchiveExecutor<'a> {
    tools: Tools<'a>,
    paths: &'a BackupPaths,
    options: &'a ArchiveOptions,
    narrator: Narrator,
}

impl<'a> ArchiveExecutor<'a> {
    pub fn new(
        tools: Tools<'a>,
        paths: &'a BackupPaths,
        options: &'a ArchiveOptions,
        narrator: Narrator,
    ) -> Self {
        Self {
            tools,
            paths,
            options,
            narrator,
        }
    }

    /// Archive `filesystem@label` into every repository, in order
    ///
    /// Returns the repositories that received the new entry. The first
    /// failing repository aborts the backup; the snapshot is unmounted either
    /// way.
    pub fn backup(
        &self,
        filesystem: &str,
        label: &Label,
        repositories: &[Repository],
    ) -> ZborgResult<Vec<Repository>> {
        let mount = MountGuard::mount(
            self.tools,
            filesystem,
            label,
            self.paths.mount_point(filesystem),
            self.narrator,
        )?;

        let mut archived = Vec::with_capacity(repositories.len());
        for repo in repositories {
            self.narrator.step(&format!(
                "Archiving {} into {} store {}",
                label,
                repo.kind(),
                repo.location()
            ));
            self.tools.archives.create_archive(repo, label, mount.path())?;

            if repo.kind() == DestinationKind::Local && self.options.world_readable {
                if let Some(path) = repo.local_path() {
                    self.tools.host.widen_permissions(&path)?;
                }
            }
            archived.push(repo.clone());
        }

        mount.release()?;
        Ok(archived)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Destination;
    use crate::system::fake::{Call, FakeSystem};

    fn repos() -> Vec<Repository> {
        vec![
            Repository::new(
                Destination::Local {
                    root: PathBuf::from("/backup"),
                },
                "pool/data",
            ),
            Repository::new(Destination::parse_remote("vault:/srv/borg").unwrap(), "pool/data"),
        ]
    }

    #[test]
    fn test_backup_archives_every_repository_and_unmounts() {
        let fake = FakeSystem::with_snapshots(&["pool/data@month-20240601"]);
        let paths = BackupPaths::new("/run/zborg");
        let options = ArchiveOptions::default();
        let executor = ArchiveExecutor::new(fake.tools(), &paths, &options, Narrator::silent());

        let label = Label::parse("month-20240601").unwrap();
        let archived = executor.backup("pool/data", &label, &repos()).unwrap();

        assert_eq!(archived, repos());
        assert_eq!(
            fake.calls(),
            [
                Call::Mount {
                    snapshot: "pool/data@month-20240601".into(),
                    mount_point: PathBuf::from("/run/zborg/pool_data"),
                },
                Call::CreateArchive("/backup/pool_data::month-20240601".into()),
                Call::CreateArchive("vault:/srv/borg/pool_data::month-20240601".into()),
                Call::Unmount(PathBuf::from("/run/zborg/pool_data")),
            ]
        );
        assert!(!fake.is_mounted());
    }

    #[test]
    fn test_failed_repository_still_unmounts() {
        let fake = FakeSystem::with_snapshots(&["pool/data@day-20240602"]);
        fake.fail_when(|call| matches!(call, Call::CreateArchive(a) if a.starts_with("/backup")));
        let paths = BackupPaths::new("/run/zborg");
        let options = ArchiveOptions::default();
        let executor = ArchiveExecutor::new(fake.tools(), &paths, &options, Narrator::silent());

        let label = Label::parse("day-20240602").unwrap();
        let result = executor.backup("pool/data", &label, &repos());

        assert!(result.is_err());
        assert!(!fake.is_mounted());
        assert!(!fake
            .calls()
            .iter()
            .any(|call| matches!(call, Call::CreateArchive(a) if a.starts_with("vault"))));
        assert_eq!(
            fake.calls().last(),
            Some(&Call::Unmount(PathBuf::from("/run/zborg/pool_data")))
        );
    }

    #[test]
    fn test_world_readable_applies_to_local_only() {
        let fake = FakeSystem::with_snapshots(&["pool/data@day-20240602"]);
        let paths = BackupPaths::new("/run/zborg");
        let options = ArchiveOptions {
            world_readable: true,
            ..ArchiveOptions::default()
        };
        let executor = ArchiveExecutor::new(fake.tools(), &paths, &options, Narrator::silent());

        executor
            .backup("pool/data", &Label::parse("day-20240602").unwrap(), &repos())
            .unwrap();

        let widened: Vec<_> = fake
            .calls()
            .into_iter()
            .filter(|call| matches!(call, Call::WidenPermissions(_)))
            .collect();
        assert_eq!(widened, [Call::WidenPermissions(PathBuf::from("/backup/pool_data"))]);
    }

    #[test]
    fn test_missing_snapshot_fails_before_archiving() {
        let fake = FakeSystem::new();
        let paths = BackupPaths::new("/run/zborg");
        let options = ArchiveOptions::default();
        let executor = ArchiveExecutor::new(fake.tools(), &paths, &options, Narrator::silent());

        let result = executor.backup("pool/data", &Label::parse("adhoc-1").unwrap(), &repos());
        assert!(result.is_err());
        assert!(!fake
            .calls()
            .iter()
            .any(|call| matches!(call, Call::CreateArchive(_) | Call::Unmount(_))));
    }

    #[test]
    fn test_no_repositories_still_mounts_and_unmounts() {
        let fake = FakeSystem::with_snapshots(&["pool/data@day-20240602"]);
        let paths = BackupPaths::new("/run/zborg");
        let options = ArchiveOptions::default();
        let executor = ArchiveExecutor::new(fake.tools(), &paths, &options, Narrator::silent());

        let archived = executor
            .backup("pool/data", &Label::parse("day-20240602").unwrap(), &[])
            .unwrap();
        assert!(archived.is_empty());
        assert!(!fake.is_mounted());
    }
}
