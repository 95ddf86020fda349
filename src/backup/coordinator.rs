//! Run coordinator
//!
//! Composes bootstrap, inventory, classification, snapshot, archive and
//! retention once per configured filesystem. Filesystems are processed in
//! configured order; the first error aborts the run and nothing already
//! done is rolled back.

use std::time::Duration;

use chrono::NaiveDate;

use crate::config::paths::BackupPaths;
use crate::config::settings::Settings;
use crate::display::progress::Narrator;
use crate::error::ZborgResult;
use crate::journal::{Journal, JournalEvent};
use crate::models::{Label, Repository, Tier};
use crate::system::Tools;

use super::archive::ArchiveExecutor;
use super::bootstrap::StoreBootstrap;
use super::classifier::{classify, TierDecision};
use super::inventory::Inventory;
use super::retention::{PurgeOutcome, RetentionEnforcer};
use super::snapshot::SnapshotOrchestrator;

/// What a scheduled run did to one filesystem
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilesystemOutcome {
    pub filesystem: String,
    pub decision: TierDecision,
    /// Repositories created during bootstrap
    pub initialized: Vec<Repository>,
    /// Repositories that received the new archive entry
    pub archived: Vec<Repository>,
    /// Snapshots destroyed by retention, oldest first
    pub destroyed: Vec<Label>,
}

/// What a one-off run did to one filesystem
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedOutcome {
    pub filesystem: String,
    pub initialized: Vec<Repository>,
    pub archived: Vec<Repository>,
}

/// Drives runs over every configured filesystem
pub struct Coordinator<'a> {
    settings: &'a Settings,
    tools: Tools<'a>,
    paths: BackupPaths,
    narrator: Narrator,
    settle_delay: Duration,
    journal: Option<Journal>,
}

impl<'a> Coordinator<'a> {
    pub fn new(settings: &'a Settings, tools: Tools<'a>, narrator: Narrator) -> Self {
        Self {
            settings,
            tools,
            paths: BackupPaths::new(settings.mount_root.clone()),
            narrator,
            settle_delay: settings.settle_delay,
            journal: None,
        }
    }

    /// Record mutating operations in a run journal
    pub fn with_journal(mut self, journal: Journal) -> Self {
        self.journal = Some(journal);
        self
    }

    /// Override the configured settle delay
    pub fn with_settle_delay(mut self, settle_delay: Duration) -> Self {
        self.settle_delay = settle_delay;
        self
    }

    /// A filesystem's repository in every configured destination
    pub fn repositories(&self, filesystem: &str) -> Vec<Repository> {
        self.settings
            .destinations()
            .into_iter()
            .map(|destination| Repository::new(destination, filesystem))
            .collect()
    }

    /// Create and initialize any of the filesystem's repositories that are missing
    pub fn ensure_destinations(&self, filesystem: &str) -> ZborgResult<Vec<Repository>> {
        let repositories = self.repositories(filesystem);
        let initialized = StoreBootstrap::new(self.tools, self.narrator).ensure(&repositories)?;
        for repo in &initialized {
            self.record(
                filesystem,
                JournalEvent::StoreInitialized {
                    repository: repo.location(),
                },
            )?;
        }
        Ok(initialized)
    }

    /// Full scheduled lifecycle for every configured filesystem
    pub fn run_scheduled(&self, today: NaiveDate) -> ZborgResult<Vec<FilesystemOutcome>> {
        let mut outcomes = Vec::with_capacity(self.settings.filesystems.len());
        for filesystem in &self.settings.filesystems {
            outcomes.push(self.run_filesystem(filesystem, today)?);
        }
        Ok(outcomes)
    }

    /// Scheduled lifecycle for one filesystem
    pub fn run_filesystem(
        &self,
        filesystem: &str,
        today: NaiveDate,
    ) -> ZborgResult<FilesystemOutcome> {
        self.narrator.phase(&format!("Backing up {}", filesystem));

        let initialized = self.ensure_destinations(filesystem)?;
        let repositories = self.repositories(filesystem);

        let decision = self.decide(filesystem, today)?;
        self.narrator.step(&format!(
            "Selected {} tier ({}), label {}",
            decision.tier,
            decision.reason(),
            decision.label
        ));

        SnapshotOrchestrator::new(self.tools.snapshots, self.settle_delay, self.narrator)
            .create_snapshot(filesystem, &decision.label)?;
        self.record(
            filesystem,
            JournalEvent::SnapshotCreated {
                label: decision.label.clone(),
                tier: decision.tier,
                forced: decision.forced,
            },
        )?;

        let archived = self.archive(filesystem, &decision.label, &repositories)?;

        let purge = RetentionEnforcer::new(self.tools, self.settings.retention, self.narrator)
            .with_created(&decision.label)
            .purge(filesystem, decision.tier, &repositories)?;
        self.record_purge(filesystem, &purge)?;

        self.narrator.phase(&format!("Finished {}", filesystem));
        Ok(FilesystemOutcome {
            filesystem: filesystem.to_string(),
            decision,
            initialized,
            archived,
            destroyed: purge.destroyed,
        })
    }

    /// Archive an existing snapshot named `label` on every configured filesystem
    ///
    /// No classification, snapshot creation or retention takes place; the
    /// snapshot must already exist.
    pub fn run_named(&self, label: &Label) -> ZborgResult<Vec<NamedOutcome>> {
        let mut outcomes = Vec::with_capacity(self.settings.filesystems.len());
        for filesystem in &self.settings.filesystems {
            self.narrator
                .phase(&format!("Archiving {}", label.snapshot_of(filesystem)));

            let initialized = self.ensure_destinations(filesystem)?;
            let repositories = self.repositories(filesystem);
            let archived = self.archive(filesystem, label, &repositories)?;

            self.narrator.phase(&format!("Finished {}", filesystem));
            outcomes.push(NamedOutcome {
                filesystem: filesystem.clone(),
                initialized,
                archived,
            });
        }
        Ok(outcomes)
    }

    /// Classify today's backup for a filesystem from its live inventory
    pub fn decide(&self, filesystem: &str, today: NaiveDate) -> ZborgResult<TierDecision> {
        let inventory = Inventory::new(self.tools.snapshots);
        let has_month = inventory.latest(filesystem, Tier::Month)?.is_some();
        let has_week = inventory.latest(filesystem, Tier::Week)?.is_some();
        Ok(classify(today, has_month, has_week, self.settings.weekly_day))
    }

    fn archive(
        &self,
        filesystem: &str,
        label: &Label,
        repositories: &[Repository],
    ) -> ZborgResult<Vec<Repository>> {
        let archived = ArchiveExecutor::new(
            self.tools,
            &self.paths,
            &self.settings.archive,
            self.narrator,
        )
        .backup(filesystem, label, repositories)?;

        for repo in &archived {
            self.record(
                filesystem,
                JournalEvent::ArchiveCreated {
                    repository: repo.location(),
                    label: label.clone(),
                },
            )?;
        }
        Ok(archived)
    }

    fn record_purge(&self, filesystem: &str, purge: &PurgeOutcome) -> ZborgResult<()> {
        for label in &purge.destroyed {
            self.record(
                filesystem,
                JournalEvent::SnapshotDestroyed {
                    label: label.clone(),
                },
            )?;
        }
        for repo in &purge.pruned {
            self.record(
                filesystem,
                JournalEvent::ArchivePruned {
                    repository: repo.location(),
                },
            )?;
        }
        Ok(())
    }

    fn record(&self, filesystem: &str, event: JournalEvent) -> ZborgResult<()> {
        match &self.journal {
            Some(journal) => journal.record(filesystem, event),
            None => Ok(()),
        }
    }
}
