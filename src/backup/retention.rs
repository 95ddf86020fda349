//! Retention enforcer
//!
//! Snapshots and archives are pruned differently. Live snapshots of the
//! acted-on tier are destroyed by exact count, oldest first. Archive stores
//! are then asked to apply their own daily/weekly/monthly horizons with the
//! full keep triple, whatever tier triggered the run.

use crate::display::progress::Narrator;
use crate::error::ZborgResult;
use crate::models::{Label, Repository, RetentionPolicy, Tier};
use crate::system::Tools;

use super::inventory::Inventory;

/// What one purge did
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PurgeOutcome {
    pub tier: Tier,
    pub keep: u32,
    /// Snapshots of the tier found before deletion
    pub found: usize,
    /// Destroyed labels, in deletion order (oldest first)
    pub destroyed: Vec<Label>,
    /// Repositories whose native prune ran
    pub pruned: Vec<Repository>,
}

/// Applies the retention policy after a backup
pub struct RetentionEnforcer<'a> {
    tools: Tools<'a>,
    policy: RetentionPolicy,
    narrator: Narrator,
    /// Snapshot taken earlier in this run, counted even when the listing
    /// does not show it (dry runs never create it)
    created: Option<Label>,
}

impl<'a> RetentionEnforcer<'a> {
    pub fn new(tools: Tools<'a>, policy: RetentionPolicy, narrator: Narrator) -> Self {
        Self {
            tools,
            policy,
            narrator,
            created: None,
        }
    }

    /// Count `label` as present when purging its tier
    pub fn with_created(mut self, label: &Label) -> Self {
        self.created = Some(label.clone());
        self
    }

    /// Destroy excess snapshots of `tier`, then prune every repository
    ///
    /// Deletions are independent calls; a failure stops the purge with the
    /// older snapshots already destroyed left destroyed.
    pub fn purge(
        &self,
        filesystem: &str,
        tier: Tier,
        repositories: &[Repository],
    ) -> ZborgResult<PurgeOutcome> {
        let keep = self.policy.keep_for(tier);
        let mut labels = Inventory::new(self.tools.snapshots).list(filesystem, tier)?;
        if let Some(created) = &self.created {
            if created.tier() == Some(tier) && !labels.contains(created) {
                labels.push(created.clone());
                labels.sort_by(|a, b| b.cmp(a));
            }
        }
        let found = labels.len();

        let excess = oldest_excess(&labels, keep);
        if excess.is_empty() {
            self.narrator.step(&format!(
                "{} {} snapshot(s), keeping {}: nothing to destroy",
                found, tier, keep
            ));
        }

        let mut destroyed = Vec::with_capacity(excess.len());
        for label in excess {
            self.tools.snapshots.destroy_snapshot(filesystem, &label)?;
            self.narrator
                .step(&format!("Destroyed snapshot {}", label.snapshot_of(filesystem)));
            destroyed.push(label);
        }

        let mut pruned = Vec::with_capacity(repositories.len());
        for repo in repositories {
            self.narrator
                .step(&format!("Pruning {} store {}", repo.kind(), repo.location()));
            self.tools.archives.prune(repo, &self.policy)?;
            pruned.push(repo.clone());
        }

        Ok(PurgeOutcome {
            tier,
            keep,
            found,
            destroyed,
            pruned,
        })
    }
}

/// Labels beyond the newest `keep`, oldest first
///
/// `labels` must be ordered newest first.
fn oldest_excess(labels: &[Label], keep: u32) -> Vec<Label> {
    labels
        .iter()
        .skip(keep as usize)
        .rev()
        .cloned()
        .collect()
}
