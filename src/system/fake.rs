//! In-memory stand-in for the external tools, used by unit tests
//!
//! Records every call in order and keeps just enough state (snapshot names,
//! directories, the current mount) for the engine's behaviour to be checked.

use std::cell::RefCell;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use super::{ArchiveTool, HostTool, SnapshotTool, Tools};
use crate::error::{ZborgError, ZborgResult};
use crate::models::{Label, Repository, RetentionPolicy};

/// One recorded external call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    ListSnapshots(String),
    CreateSnapshot(String),
    DestroySnapshot(String),
    Mount { snapshot: String, mount_point: PathBuf },
    Unmount(PathBuf),
    CreateLocalDir(PathBuf),
    ProbeRemote { host: String, directory: String },
    CreateRemoteDir { host: String, directory: String },
    WidenPermissions(PathBuf),
    InitStore(String),
    CreateArchive(String),
    Prune { location: String, policy: RetentionPolicy },
}

#[derive(Default)]
struct FakeState {
    snapshots: Vec<String>,
    local_dirs: HashSet<PathBuf>,
    remote_dirs: HashSet<(String, String)>,
    mounted: Option<PathBuf>,
    calls: Vec<Call>,
}

#[derive(Default)]
pub struct FakeSystem {
    state: RefCell<FakeState>,
    fail_on: RefCell<Option<Box<dyn Fn(&Call) -> bool>>>,
}

impl FakeSystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_snapshots(names: &[&str]) -> Self {
        let fake = Self::new();
        fake.state.borrow_mut().snapshots = names.iter().map(|n| n.to_string()).collect();
        fake
    }

    pub fn tools(&self) -> Tools<'_> {
        Tools {
            snapshots: self,
            host: self,
            archives: self,
        }
    }

    /// Make every call matching `predicate` fail (after being recorded)
    pub fn fail_when(&self, predicate: impl Fn(&Call) -> bool + 'static) {
        *self.fail_on.borrow_mut() = Some(Box::new(predicate));
    }

    pub fn add_local_dir(&self, path: impl Into<PathBuf>) {
        self.state.borrow_mut().local_dirs.insert(path.into());
    }

    pub fn add_remote_dir(&self, host: &str, directory: &str) {
        self.state
            .borrow_mut()
            .remote_dirs
            .insert((host.to_string(), directory.to_string()));
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.borrow().calls.clone()
    }

    /// Calls other than snapshot listings, which the engine issues freely
    pub fn mutations(&self) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|call| !matches!(call, Call::ListSnapshots(_) | Call::ProbeRemote { .. }))
            .collect()
    }

    pub fn has_snapshot(&self, name: &str) -> bool {
        self.state.borrow().snapshots.iter().any(|s| s == name)
    }

    pub fn is_mounted(&self) -> bool {
        self.state.borrow().mounted.is_some()
    }

    fn record(&self, call: Call) -> ZborgResult<()> {
        let failing = self
            .fail_on
            .borrow()
            .as_ref()
            .map_or(false, |predicate| predicate(&call));
        let rendered = format!("{:?}", call);
        self.state.borrow_mut().calls.push(call);

        if failing {
            return Err(ZborgError::command_failed(rendered, "exit status 1", "injected failure"));
        }
        Ok(())
    }
}

impl SnapshotTool for FakeSystem {
    fn list_snapshots(&self, filesystem: &str) -> ZborgResult<Vec<String>> {
        self.record(Call::ListSnapshots(filesystem.to_string()))?;
        let prefix = format!("{}@", filesystem);
        Ok(self
            .state
            .borrow()
            .snapshots
            .iter()
            .filter(|name| name.starts_with(&prefix))
            .cloned()
            .collect())
    }

    fn create_snapshot(&self, filesystem: &str, label: &Label) -> ZborgResult<()> {
        let name = label.snapshot_of(filesystem);
        self.record(Call::CreateSnapshot(name.clone()))?;
        if self.has_snapshot(&name) {
            return Err(ZborgError::command_failed(
                format!("zfs snapshot {}", name),
                "exit status 1",
                "dataset already exists",
            ));
        }
        self.state.borrow_mut().snapshots.push(name);
        Ok(())
    }

    fn destroy_snapshot(&self, filesystem: &str, label: &Label) -> ZborgResult<()> {
        let name = label.snapshot_of(filesystem);
        self.record(Call::DestroySnapshot(name.clone()))?;
        self.state.borrow_mut().snapshots.retain(|s| *s != name);
        Ok(())
    }
}

impl HostTool for FakeSystem {
    fn mount_snapshot(
        &self,
        filesystem: &str,
        label: &Label,
        mount_point: &Path,
    ) -> ZborgResult<()> {
        let snapshot = label.snapshot_of(filesystem);
        self.record(Call::Mount {
            snapshot: snapshot.clone(),
            mount_point: mount_point.to_path_buf(),
        })?;
        if !self.has_snapshot(&snapshot) {
            return Err(ZborgError::Mount(format!("{} does not exist", snapshot)));
        }
        self.state.borrow_mut().mounted = Some(mount_point.to_path_buf());
        Ok(())
    }

    fn unmount(&self, mount_point: &Path) -> ZborgResult<()> {
        self.record(Call::Unmount(mount_point.to_path_buf()))?;
        self.state.borrow_mut().mounted = None;
        Ok(())
    }

    fn local_dir_exists(&self, path: &Path) -> bool {
        self.state.borrow().local_dirs.contains(path)
    }

    fn create_local_dir(&self, path: &Path) -> ZborgResult<()> {
        self.record(Call::CreateLocalDir(path.to_path_buf()))?;
        self.state.borrow_mut().local_dirs.insert(path.to_path_buf());
        Ok(())
    }

    fn remote_dir_exists(&self, host: &str, directory: &str) -> ZborgResult<bool> {
        self.record(Call::ProbeRemote {
            host: host.to_string(),
            directory: directory.to_string(),
        })?;
        Ok(self
            .state
            .borrow()
            .remote_dirs
            .contains(&(host.to_string(), directory.to_string())))
    }

    fn create_remote_dir(&self, host: &str, directory: &str) -> ZborgResult<()> {
        self.record(Call::CreateRemoteDir {
            host: host.to_string(),
            directory: directory.to_string(),
        })?;
        self.add_remote_dir(host, directory);
        Ok(())
    }

    fn widen_permissions(&self, path: &Path) -> ZborgResult<()> {
        self.record(Call::WidenPermissions(path.to_path_buf()))
    }
}

impl ArchiveTool for FakeSystem {
    fn init_store(&self, repo: &Repository) -> ZborgResult<()> {
        self.record(Call::InitStore(repo.location()))
    }

    fn create_archive(&self, repo: &Repository, label: &Label, _source: &Path) -> ZborgResult<()> {
        self.record(Call::CreateArchive(repo.archive(label)))
    }

    fn prune(&self, repo: &Repository, policy: &RetentionPolicy) -> ZborgResult<()> {
        self.record(Call::Prune {
            location: repo.location(),
            policy: *policy,
        })
    }
}
