//! Snapshot orchestrator
//!
//! Creates the snapshot for the chosen label, then waits a settle delay so
//! the snapshot subsystem has caught up before the snapshot is mounted.

use std::time::Duration;

use crate::display::progress::Narrator;
use crate::error::ZborgResult;
use crate::models::Label;
use crate::system::SnapshotTool;

pub struct SnapshotOrchestrator<'a> {
    snapshots: &'a dyn SnapshotTool,
    settle_delay: Duration,
    narrator: Narrator,
}

impl<'a> SnapshotOrchestrator<'a> {
    pub fn new(
        snapshots: &'a dyn SnapshotTool,
        settle_delay: Duration,
        narrator: Narrator,
    ) -> Self {
        Self {
            snapshots,
            settle_delay,
            narrator,
        }
    }

    /// Create `filesystem@label`; failure is fatal and not retried
    pub fn create_snapshot(&self, filesystem: &str, label: &Label) -> ZborgResult<()> {
        self.snapshots.create_snapshot(filesystem, label)?;
        self.narrator
            .step(&format!("Created snapshot {}", label.snapshot_of(filesystem)));

        if !self.settle_delay.is_zero() {
            std::thread::sleep(self.settle_delay);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ZborgError;
    use crate::system::fake::{Call, FakeSystem};
    use std::time::Instant;

    #[test]
    fn test_creates_snapshot() {
        let fake = FakeSystem::new();
        let orchestrator = SnapshotOrchestrator::new(&fake, Duration::ZERO, Narrator::silent());

        orchestrator
            .create_snapshot("pool/data", &Label::parse("day-20240602").unwrap())
            .unwrap();

        assert!(fake.has_snapshot("pool/data@day-20240602"));
        assert_eq!(
            fake.calls(),
            [Call::CreateSnapshot("pool/data@day-20240602".into())]
        );
    }

    #[test]
    fn test_waits_settle_delay() {
        let fake = FakeSystem::new();
        let delay = Duration::from_millis(50);
        let orchestrator = SnapshotOrchestrator::new(&fake, delay, Narrator::silent());

        let started = Instant::now();
        orchestrator
            .create_snapshot("pool/data", &Label::parse("day-20240602").unwrap())
            .unwrap();
        assert!(started.elapsed() >= delay);
    }

    #[test]
    fn test_failure_is_propagated() {
        let fake = FakeSystem::with_snapshots(&["pool/data@day-20240602"]);
        let orchestrator = SnapshotOrchestrator::new(&fake, Duration::ZERO, Narrator::silent());

        let label = Label::parse("day-20240602").unwrap();
        let result = orchestrator.create_snapshot("pool/data", &label);
        assert!(matches!(result.unwrap_err(), ZborgError::Command { .. }));
    }
}
