//! Archive destinations
//!
//! A destination is an archive store root, either a local directory or a
//! directory on a remote host. Each filesystem gets its own repository
//! inside every configured destination.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

use crate::error::ZborgError;

/// Which kind of store a destination is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DestinationKind {
    Local,
    Remote,
}

impl fmt::Display for DestinationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DestinationKind::Local => write!(f, "local"),
            DestinationKind::Remote => write!(f, "remote"),
        }
    }
}

/// A configured archive store root
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    /// Store root on a local filesystem
    Local { root: PathBuf },
    /// Store root on a host reached over ssh
    Remote { host: String, directory: String },
}

impl Destination {
    /// Parse a remote connection string of the form `host:directory`
    pub fn parse_remote(spec: &str) -> Result<Self, ZborgError> {
        let (host, directory) = spec.split_once(':').ok_or_else(|| {
            ZborgError::Validation(format!(
                "remote '{}' must have the form host:directory",
                spec
            ))
        })?;

        let host = host.trim();
        let directory = directory.trim().trim_end_matches('/');
        if host.is_empty() || directory.is_empty() {
            return Err(ZborgError::Validation(format!(
                "remote '{}' must name both a host and a directory",
                spec
            )));
        }

        Ok(Self::Remote {
            host: host.to_string(),
            directory: directory.to_string(),
        })
    }

    pub fn kind(&self) -> DestinationKind {
        match self {
            Destination::Local { .. } => DestinationKind::Local,
            Destination::Remote { .. } => DestinationKind::Remote,
        }
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Destination::Local { root } => write!(f, "{}", root.display()),
            Destination::Remote { host, directory } => write!(f, "{}:{}", host, directory),
        }
    }
}
