//! Destination bootstrap
//!
//! Makes sure each of a filesystem's repositories exists before it is used,
//! creating the directory and initializing an empty store when it does not.

use crate::display::progress::Narrator;
use crate::error::ZborgResult;
use crate::models::Repository;
use crate::system::Tools;

pub struct StoreBootstrap<'a> {
    tools: Tools<'a>,
    narrator: Narrator,
}

impl<'a> StoreBootstrap<'a> {
    pub fn new(tools: Tools<'a>, narrator: Narrator) -> Self {
        Self { tools, narrator }
    }

    /// Ensure every repository exists; returns the ones initialized now
    pub fn ensure(&self, repositories: &[Repository]) -> ZborgResult<Vec<Repository>> {
        let mut initialized = Vec::new();
        for repo in repositories {
            if self.exists(repo)? {
                continue;
            }

            self.narrator.step(&format!(
                "Initializing {} store {}",
                repo.kind(),
                repo.location()
            ));
            match (repo.local_path(), repo.host()) {
                (Some(path), _) => self.tools.host.create_local_dir(&path)?,
                (None, Some(host)) => self.tools.host.create_remote_dir(host, &repo.directory())?,
                (None, None) => {}
            }
            self.tools.archives.init_store(repo)?;
            initialized.push(repo.clone());
        }
        Ok(initialized)
    }

    fn exists(&self, repo: &Repository) -> ZborgResult<bool> {
        match (repo.local_path(), repo.host()) {
            (Some(path), _) => Ok(self.tools.host.local_dir_exists(&path)),
            // A missing remote directory is the "needs initialization" branch,
            // only an unreachable host is an error.
            (None, Some(host)) => self.tools.host.remote_dir_exists(host, &repo.directory()),
            (None, None) => Ok(true),
        }
    }
}
