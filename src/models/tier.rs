//! Snapshot tiers
//!
//! A tier is the cadence bucket a snapshot belongs to. Precedence is
//! `Month > Week > Day`; exactly one tier is acted on per filesystem and run.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Cadence bucket of a snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Month,
    Week,
    Day,
}

impl Tier {
    /// All tiers in precedence order
    pub const ALL: [Tier; 3] = [Tier::Month, Tier::Week, Tier::Day];

    /// Lowercase name used as the label prefix
    pub fn name(&self) -> &'static str {
        match self {
            Tier::Month => "month",
            Tier::Week => "week",
            Tier::Day => "day",
        }
    }

    /// Prefix every label of this tier starts with, e.g. `month-`
    pub fn label_prefix(&self) -> String {
        format!("{}-", self.name())
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
