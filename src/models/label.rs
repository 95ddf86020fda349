//! Snapshot and archive labels
//!
//! A label names both a snapshot (`filesystem@label`) and the archive entry
//! created from it. Scheduled labels have the form `<tier>-<YYYYMMDD>`, so for
//! a fixed tier the lexicographic order is the chronological order.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::tier::Tier;
use crate::error::ZborgError;

/// Compact date format used in scheduled labels
pub const LABEL_DATE_FORMAT: &str = "%Y%m%d";

/// Name of a snapshot and of the archive entry created from it
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Label(String);

impl Label {
    /// Build the scheduled label for a tier on a given day
    pub fn for_tier(tier: Tier, date: NaiveDate) -> Self {
        Self(format!("{}{}", tier.label_prefix(), date.format(LABEL_DATE_FORMAT)))
    }

    /// Parse an operator-supplied label
    ///
    /// Any non-empty name is accepted as long as it cannot break out of the
    /// snapshot or archive name it is embedded in.
    pub fn parse(s: &str) -> Result<Self, ZborgError> {
        if s.is_empty() {
            return Err(ZborgError::Validation("label must not be empty".into()));
        }
        if let Some(bad) = s
            .chars()
            .find(|c| matches!(c, '@' | '/' | ':') || c.is_whitespace())
        {
            return Err(ZborgError::Validation(format!(
                "label '{}' contains forbidden character '{}'",
                s, bad
            )));
        }
        Ok(Self(s.to_string()))
    }

    /// Get the label text
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The tier this label was generated for, if it is a scheduled label
    pub fn tier(&self) -> Option<Tier> {
        Tier::ALL.into_iter().find(|tier| {
            self.0
                .strip_prefix(&tier.label_prefix())
                .and_then(|date| NaiveDate::parse_from_str(date, LABEL_DATE_FORMAT).ok())
                .is_some()
        })
    }

    /// The day encoded in a scheduled label
    pub fn date(&self) -> Option<NaiveDate> {
        let tier = self.tier()?;
        let date = self.0.strip_prefix(&tier.label_prefix())?;
        NaiveDate::parse_from_str(date, LABEL_DATE_FORMAT).ok()
    }

    /// Full snapshot name for this label on a filesystem
    pub fn snapshot_of(&self, filesystem: &str) -> String {
        format!("{}@{}", filesystem, self.0)
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
