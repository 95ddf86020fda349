//! Backup settings for zborg
//!
//! Parses the declarative YAML configuration into a validated [`Settings`]
//! record. Unknown keys are rejected; the upper-case key names of older
//! configuration files (`FS`, `LOCAL`, `REMOTE`, `PASS`, `*_KEEP`) are
//! accepted as aliases.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::Weekday;
use serde::Deserialize;

use crate::error::{ZborgError, ZborgResult};
use crate::models::repository::repo_name;
use crate::models::{Destination, RetentionPolicy};

/// Options applied to every archive creation and store initialization
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveOptions {
    /// Compression algorithm passed to the archive tool
    pub compression: String,
    /// Directories containing this file are not archived
    pub exclude_marker: String,
    /// Encryption mode used when a new store is initialized
    pub encryption: String,
    /// Make local repositories world-readable after each archive creation
    pub world_readable: bool,
}

impl Default for ArchiveOptions {
    fn default() -> Self {
        Self {
            compression: default_compression(),
            exclude_marker: default_exclude_marker(),
            encryption: default_encryption(),
            world_readable: false,
        }
    }
}

/// On-disk shape of the configuration file
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawSettings {
    #[serde(alias = "FS")]
    filesystems: Vec<String>,

    #[serde(default, alias = "LOCAL")]
    local: Option<String>,

    #[serde(default, alias = "REMOTE")]
    remote: Option<String>,

    #[serde(alias = "PASS")]
    passphrase_file: PathBuf,

    #[serde(alias = "MONTH_KEEP")]
    month_keep: u32,

    #[serde(alias = "WEEK_KEEP")]
    week_keep: u32,

    #[serde(alias = "DAY_KEEP")]
    day_keep: u32,

    #[serde(default = "default_weekly_day")]
    weekly_day: String,

    #[serde(default = "default_settle_seconds")]
    settle_seconds: u64,

    #[serde(default = "default_mount_root")]
    mount_root: PathBuf,

    #[serde(default = "default_compression")]
    compression: String,

    #[serde(default = "default_exclude_marker")]
    exclude_marker: String,

    #[serde(default = "default_encryption")]
    encryption: String,

    #[serde(default)]
    world_readable: bool,

    #[serde(default)]
    journal: Option<PathBuf>,
}

fn default_weekly_day() -> String {
    "Sunday".to_string()
}

fn default_settle_seconds() -> u64 {
    5
}

fn default_mount_root() -> PathBuf {
    PathBuf::from("/run/zborg")
}

fn default_compression() -> String {
    "lz4".to_string()
}

fn default_exclude_marker() -> String {
    ".nobackup".to_string()
}

fn default_encryption() -> String {
    "repokey".to_string()
}

/// Validated configuration for one invocation
#[derive(Debug, Clone)]
pub struct Settings {
    /// Filesystems to process, in configured order
    pub filesystems: Vec<String>,
    /// Local store root, if enabled
    pub local: Option<Destination>,
    /// Remote store root, if enabled
    pub remote: Option<Destination>,
    /// File whose first line is the store passphrase
    pub passphrase_file: PathBuf,
    /// Keep-counts per tier
    pub retention: RetentionPolicy,
    /// Day of the week on which the weekly tier is taken
    pub weekly_day: Weekday,
    /// Pause between snapshot creation and mounting it
    pub settle_delay: Duration,
    /// Directory under which snapshots are mounted
    pub mount_root: PathBuf,
    /// Archive creation options
    pub archive: ArchiveOptions,
    /// Optional JSONL run journal
    pub journal: Option<PathBuf>,
}

impl Settings {
    /// Load and validate settings from a YAML file
    pub fn load(path: &Path) -> ZborgResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            ZborgError::Config(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;

        Self::from_yaml(&contents).map_err(|e| match e {
            ZborgError::Config(msg) => {
                ZborgError::Config(format!("{}: {}", path.display(), msg))
            }
            other => other,
        })
    }

    /// Parse and validate settings from YAML text
    pub fn from_yaml(contents: &str) -> ZborgResult<Self> {
        let raw: RawSettings = serde_yaml::from_str(contents)?;
        Self::validate(raw)
    }

    fn validate(raw: RawSettings) -> ZborgResult<Self> {
        validate_filesystems(&raw.filesystems)?;

        let local = match non_empty(raw.local) {
            Some(root) => {
                let root = PathBuf::from(root);
                if !root.is_dir() {
                    return Err(ZborgError::Config(format!(
                        "local store directory {} does not exist",
                        root.display()
                    )));
                }
                Some(Destination::Local { root })
            }
            None => None,
        };

        let remote = non_empty(raw.remote)
            .map(|spec| Destination::parse_remote(&spec))
            .transpose()?;

        let weekly_day = raw.weekly_day.parse::<Weekday>().map_err(|_| {
            ZborgError::Validation(format!("unknown weekday '{}'", raw.weekly_day))
        })?;

        if raw.compression.trim().is_empty() {
            return Err(ZborgError::Validation("compression must not be empty".into()));
        }
        if raw.exclude_marker.is_empty() || raw.exclude_marker.contains('/') {
            return Err(ZborgError::Validation(format!(
                "exclude marker '{}' must be a plain file name",
                raw.exclude_marker
            )));
        }

        Ok(Self {
            filesystems: raw.filesystems,
            local,
            remote,
            passphrase_file: raw.passphrase_file,
            retention: RetentionPolicy::new(raw.month_keep, raw.week_keep, raw.day_keep),
            weekly_day,
            settle_delay: Duration::from_secs(raw.settle_seconds),
            mount_root: raw.mount_root,
            archive: ArchiveOptions {
                compression: raw.compression,
                exclude_marker: raw.exclude_marker,
                encryption: raw.encryption,
                world_readable: raw.world_readable,
            },
            journal: raw.journal,
        })
    }

    /// Configured destinations in processing order: local first, then remote
    pub fn destinations(&self) -> Vec<Destination> {
        self.local
            .iter()
            .chain(self.remote.iter())
            .cloned()
            .collect()
    }
}

fn validate_filesystems(filesystems: &[String]) -> ZborgResult<()> {
    if filesystems.is_empty() {
        return Err(ZborgError::Validation(
            "at least one filesystem must be configured".into(),
        ));
    }

    let mut seen = HashSet::new();
    let mut names: HashMap<String, &str> = HashMap::new();
    for fs in filesystems {
        if fs.is_empty() || fs.contains('@') || fs.chars().any(char::is_whitespace) {
            return Err(ZborgError::Validation(format!(
                "invalid filesystem identifier '{}'",
                fs
            )));
        }
        if !seen.insert(fs.as_str()) {
            return Err(ZborgError::Validation(format!(
                "filesystem '{}' is listed more than once",
                fs
            )));
        }
        if let Some(other) = names.insert(repo_name(fs), fs) {
            return Err(ZborgError::Validation(format!(
                "filesystems '{}' and '{}' would share repository '{}'",
                other,
                fs,
                repo_name(fs)
            )));
        }
    }
    Ok(())
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}
