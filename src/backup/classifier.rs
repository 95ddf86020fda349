//! Tier classifier
//!
//! Decides which tier to snapshot today. Evaluated in precedence order:
//!
//! 1. no month snapshot yet, or the first day of the month: `Month`
//! 2. no week snapshot yet, or the weekly day: `Week`
//! 3. otherwise: `Day`
//!
//! The decision is a pure function of the date and of whether month and week
//! snapshots already exist, so classifying twice on the same day with the
//! same inventory gives the same answer.

use chrono::{Datelike, NaiveDate, Weekday};

use crate::models::{Label, Tier};

/// Outcome of classification for one filesystem
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TierDecision {
    /// Tier to act on
    pub tier: Tier,
    /// Label of the snapshot and archive entry to create
    pub label: Label,
    /// No month snapshot existed
    pub force_month: bool,
    /// No week snapshot existed
    pub force_week: bool,
    /// The tier was chosen because none of it existed, not by the calendar
    pub forced: bool,
}

impl TierDecision {
    /// Human-readable reason for the choice
    pub fn reason(&self) -> String {
        if self.forced {
            return format!("no {} snapshot yet", self.tier);
        }
        match self.tier {
            Tier::Month => "first day of the month".to_string(),
            Tier::Week => "weekly day".to_string(),
            Tier::Day => "daily".to_string(),
        }
    }
}

/// Classify today's backup for a filesystem
pub fn classify(
    today: NaiveDate,
    has_month: bool,
    has_week: bool,
    weekly_day: Weekday,
) -> TierDecision {
    let force_month = !has_month;
    let force_week = !has_week;

    let (tier, forced) = if force_month || today.day() == 1 {
        (Tier::Month, force_month)
    } else if force_week || today.weekday() == weekly_day {
        (Tier::Week, force_week)
    } else {
        (Tier::Day, false)
    };

    TierDecision {
        tier,
        label: Label::for_tier(tier, today),
        force_month,
        force_week,
        forced,
    }
}
