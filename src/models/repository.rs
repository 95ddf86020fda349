//! Per-filesystem archive repositories
//!
//! Every filesystem is archived into its own repository inside each
//! destination, so prune horizons of one filesystem never touch another.

use std::path::PathBuf;

use super::destination::{Destination, DestinationKind};
use super::label::Label;

/// Derive the repository (and mount point) name for a filesystem
///
/// `pool/data` becomes `pool_data`.
pub fn repo_name(filesystem: &str) -> String {
    filesystem.replace('/', "_")
}

/// A filesystem's repository inside one destination
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Repository {
    pub destination: Destination,
    pub name: String,
}

impl Repository {
    pub fn new(destination: Destination, filesystem: &str) -> Self {
        Self {
            destination,
            name: repo_name(filesystem),
        }
    }

    pub fn kind(&self) -> DestinationKind {
        self.destination.kind()
    }

    /// Directory holding the repository, on whichever host it lives
    pub fn directory(&self) -> String {
        match &self.destination {
            Destination::Local { root } => root.join(&self.name).display().to_string(),
            Destination::Remote { directory, .. } => format!("{}/{}", directory, self.name),
        }
    }

    /// Local repository path, if this is a local repository
    pub fn local_path(&self) -> Option<PathBuf> {
        match &self.destination {
            Destination::Local { root } => Some(root.join(&self.name)),
            Destination::Remote { .. } => None,
        }
    }

    /// Remote host, if this is a remote repository
    pub fn host(&self) -> Option<&str> {
        match &self.destination {
            Destination::Local { .. } => None,
            Destination::Remote { host, .. } => Some(host),
        }
    }

    /// Location string understood by the archive tool
    pub fn location(&self) -> String {
        match &self.destination {
            Destination::Local { .. } => self.directory(),
            Destination::Remote { host, .. } => format!("{}:{}", host, self.directory()),
        }
    }

    /// Location of one archive entry in this repository
    pub fn archive(&self, label: &Label) -> String {
        format!("{}::{}", self.location(), label)
    }
}
