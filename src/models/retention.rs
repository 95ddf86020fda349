//! Retention policy: how many snapshots of each tier are kept

use serde::{Deserialize, Serialize};

use super::tier::Tier;

/// Keep-counts per tier, constant for the lifetime of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetentionPolicy {
    pub month: u32,
    pub week: u32,
    pub day: u32,
}

impl RetentionPolicy {
    pub fn new(month: u32, week: u32, day: u32) -> Self {
        Self { month, week, day }
    }

    /// Keep-count for a single tier
    pub fn keep_for(&self, tier: Tier) -> u32 {
        match tier {
            Tier::Month => self.month,
            Tier::Week => self.week,
            Tier::Day => self.day,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keep_for() {
        let policy = RetentionPolicy::new(12, 4, 7);
        assert_eq!(policy.keep_for(Tier::Month), 12);
        assert_eq!(policy.keep_for(Tier::Week), 4);
        assert_eq!(policy.keep_for(Tier::Day), 7);
    }
}
