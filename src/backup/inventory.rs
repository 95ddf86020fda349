//! Inventory reader
//!
//! Lists the tier-labeled snapshots of a filesystem, newest first. Ordering
//! is by label text, which is chronological for a fixed tier because the
//! date suffix is fixed-width.

use crate::error::ZborgResult;
use crate::models::{Label, Tier};
use crate::system::SnapshotTool;

/// Count and newest label of one tier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TierSummary {
    pub tier: Tier,
    pub count: usize,
    pub newest: Option<Label>,
}

/// Reads the live snapshot inventory
#[derive(Clone, Copy)]
pub struct Inventory<'a> {
    snapshots: &'a dyn SnapshotTool,
}

impl<'a> Inventory<'a> {
    pub fn new(snapshots: &'a dyn SnapshotTool) -> Self {
        Self { snapshots }
    }

    /// Labels of `filesystem@<tier>-*` snapshots, newest first
    ///
    /// A filesystem without matching snapshots yields an empty list.
    pub fn list(&self, filesystem: &str, tier: Tier) -> ZborgResult<Vec<Label>> {
        let names = self.snapshots.list_snapshots(filesystem)?;
        Ok(tier_labels(&names, filesystem, tier))
    }

    /// Newest label of a tier, if any snapshot of it exists
    pub fn latest(&self, filesystem: &str, tier: Tier) -> ZborgResult<Option<Label>> {
        Ok(self.list(filesystem, tier)?.into_iter().next())
    }

    /// Per-tier counts from a single listing, in tier precedence order
    pub fn summary(&self, filesystem: &str) -> ZborgResult<Vec<TierSummary>> {
        let names = self.snapshots.list_snapshots(filesystem)?;
        Ok(Tier::ALL
            .into_iter()
            .map(|tier| {
                let labels = tier_labels(&names, filesystem, tier);
                TierSummary {
                    tier,
                    count: labels.len(),
                    newest: labels.into_iter().next(),
                }
            })
            .collect())
    }
}

/// Select the labels of one tier on exactly this filesystem, newest first
fn tier_labels(names: &[String], filesystem: &str, tier: Tier) -> Vec<Label> {
    let prefix = format!("{}@{}", filesystem, tier.label_prefix());
    let mut labels: Vec<Label> = names
        .iter()
        .filter(|name| name.starts_with(&prefix))
        .filter_map(|name| name.split_once('@'))
        .filter_map(|(_, label)| Label::parse(label).ok())
        .collect();

    labels.sort_by(|a, b| b.cmp(a));
    labels
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::system::fake::FakeSystem;

    #[test]
    fn test_list_orders_newest_first() {
        let fake = FakeSystem::with_snapshots(&[
            "pool/data@month-20240101",
            "pool/data@month-20240301",
            "pool/data@month-20240201",
        ]);
        let inventory = Inventory::new(&fake);

        let labels = inventory.list("pool/data", Tier::Month).unwrap();
        let names: Vec<_> = labels.iter().map(Label::as_str).collect();
        assert_eq!(names, ["month-20240301", "month-20240201", "month-20240101"]);
    }

    #[test]
    fn test_list_filters_tier_and_filesystem() {
        let fake = FakeSystem::with_snapshots(&[
            "pool/data@day-20240602",
            "pool/data@week-20240602",
            "pool/data/child@day-20240603",
            "pool/database@day-20240604",
            "pool/data@adhoc-20240615",
        ]);
        let inventory = Inventory::new(&fake);

        let days = inventory.list("pool/data", Tier::Day).unwrap();
        assert_eq!(days, [Label::parse("day-20240602").unwrap()]);
    }

    #[test]
    fn test_empty_inventory_is_not_an_error() {
        let fake = FakeSystem::new();
        let inventory = Inventory::new(&fake);

        assert!(inventory.list("pool/data", Tier::Week).unwrap().is_empty());
        assert_eq!(inventory.latest("pool/data", Tier::Week).unwrap(), None);
    }

    #[test]
    fn test_latest() {
        let fake =
            FakeSystem::with_snapshots(&["pool/data@week-20240602", "pool/data@week-20240609"]);
        let inventory = Inventory::new(&fake);

        assert_eq!(
            inventory.latest("pool/data", Tier::Week).unwrap(),
            Some(Label::parse("week-20240609").unwrap())
        );
    }

    #[test]
    fn test_summary() {
        let fake = FakeSystem::with_snapshots(&[
            "pool/data@month-20240601",
            "pool/data@day-20240603",
            "pool/data@day-20240604",
        ]);
        let summary = Inventory::new(&fake).summary("pool/data").unwrap();

        assert_eq!(summary.len(), 3);
        assert_eq!(summary[0].count, 1);
        assert_eq!(summary[1].count, 0);
        assert_eq!(summary[1].newest, None);
        assert_eq!(summary[2].count, 2);
        assert_eq!(summary[2].newest, Some(Label::parse("day-20240604").unwrap()));
    }
}
