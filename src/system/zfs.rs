//! ZFS snapshot subsystem

use super::exec::{CommandRunner, Invocation};
use super::SnapshotTool;
use crate::error::ZborgResult;
use crate::models::Label;

/// Snapshot tool backed by the `zfs` command
#[derive(Debug, Clone, Copy)]
pub struct ZfsTool {
    runner: CommandRunner,
}

impl ZfsTool {
    pub fn new(runner: CommandRunner) -> Self {
        Self { runner }
    }
}

impl SnapshotTool for ZfsTool {
    fn list_snapshots(&self, filesystem: &str) -> ZborgResult<Vec<String>> {
        let invocation = Invocation::new("zfs")
            .args(["list", "-H", "-t", "snapshot", "-o", "name", "-d", "1", filesystem])
            .read_only();
        let output = self.runner.run(&invocation)?;
        Ok(parse_snapshot_names(&output.stdout))
    }

    fn create_snapshot(&self, filesystem: &str, label: &Label) -> ZborgResult<()> {
        let invocation = Invocation::new("zfs")
            .arg("snapshot")
            .arg(label.snapshot_of(filesystem));
        self.runner.run(&invocation)?;
        Ok(())
    }

    fn destroy_snapshot(&self, filesystem: &str, label: &Label) -> ZborgResult<()> {
        let invocation = Invocation::new("zfs")
            .arg("destroy")
            .arg(label.snapshot_of(filesystem));
        self.runner.run(&invocation)?;
        Ok(())
    }
}

/// Parse `zfs list -H -o name` output, one snapshot name per line
fn parse_snapshot_names(stdout: &str) -> Vec<String> {
    stdout
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}
