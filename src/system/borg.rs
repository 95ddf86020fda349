//! Borg archive store

use std::path::Path;

use zeroize::Zeroizing;

use super::exec::{CommandRunner, Invocation};
use super::ArchiveTool;
use crate::config::settings::ArchiveOptions;
use crate::error::ZborgResult;
use crate::models::{Label, Repository, RetentionPolicy};

/// Archive tool backed by the `borg` command
pub struct BorgTool {
    runner: CommandRunner,
    passphrase: Zeroizing<String>,
    options: ArchiveOptions,
}

impl BorgTool {
    pub fn new(
        runner: CommandRunner,
        passphrase: Zeroizing<String>,
        options: ArchiveOptions,
    ) -> Self {
        Self {
            runner,
            passphrase,
            options,
        }
    }

    fn borg(&self, subcommand: &str) -> Invocation {
        Invocation::new("borg")
            .arg(subcommand)
            .env("BORG_PASSPHRASE", &self.passphrase)
    }

    fn init_invocation(&self, repo: &Repository) -> Invocation {
        self.borg("init")
            .args(["--encryption", self.options.encryption.as_str()])
            .arg(repo.location())
    }

    fn create_invocation(&self, repo: &Repository, label: &Label, source: &Path) -> Invocation {
        self.borg("create")
            .args(["--verbose", "--stats"])
            .args(["--compression", self.options.compression.as_str()])
            .args(["--exclude-if-present", self.options.exclude_marker.as_str()])
            .arg(repo.archive(label))
            .arg(".")
            .current_dir(source)
    }

    fn prune_invocation(&self, repo: &Repository, policy: &RetentionPolicy) -> Invocation {
        self.borg("prune")
            .args(["--verbose", "--stats", "--list"])
            .args(["--keep-daily".to_string(), policy.day.to_string()])
            .args(["--keep-weekly".to_string(), policy.week.to_string()])
            .args(["--keep-monthly".to_string(), policy.month.to_string()])
            .arg(repo.location())
    }
}

impl ArchiveTool for BorgTool {
    fn init_store(&self, repo: &Repository) -> ZborgResult<()> {
        self.runner.run_attached(&self.init_invocation(repo))
    }

    fn create_archive(&self, repo: &Repository, label: &Label, source: &Path) -> ZborgResult<()> {
        self.runner
            .run_attached(&self.create_invocation(repo, label, source))
    }

    fn prune(&self, repo: &Repository, policy: &RetentionPolicy) -> ZborgResult<()> {
        self.runner.run_attached(&self.prune_invocation(repo, policy))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::progress::Narrator;
    use crate::models::Destination;
    use std::path::PathBuf;

    fn tool() -> BorgTool {
        BorgTool::new(
            CommandRunner::new(true, Narrator::silent()),
            Zeroizing::new("secret".to_string()),
            ArchiveOptions::default(),
        )
    }

    fn local_repo() -> Repository {
        Repository::new(
            Destination::Local {
                root: PathBuf::from("/backup"),
            },
            "pool/data",
        )
    }

    #[test]
    fn test_create_arguments() {
        let label = Label::parse("month-20240601").unwrap();
        let invocation =
            tool().create_invocation(&local_repo(), &label, Path::new("/run/zborg/pool_data"));
        assert_eq!(
            invocation.arg_list(),
            [
                "create",
                "--verbose",
                "--stats",
                "--compression",
                "lz4",
                "--exclude-if-present",
                ".nobackup",
                "/backup/pool_data::month-20240601",
                "."
            ]
        );
        assert!(!invocation.to_string().contains("secret"));
    }

    #[test]
    fn test_prune_arguments_use_full_triple() {
        let invocation = tool().prune_invocation(&local_repo(), &RetentionPolicy::new(12, 4, 7));
        assert_eq!(
            invocation.arg_list(),
            [
                "prune",
                "--verbose",
                "--stats",
                "--list",
                "--keep-daily",
                "7",
                "--keep-weekly",
                "4",
                "--keep-monthly",
                "12",
                "/backup/pool_data"
            ]
        );
    }

    #[test]
    fn test_init_arguments() {
        let repo = Repository::new(Destination::parse_remote("vault:/srv/borg").unwrap(), "tank");
        let invocation = tool().init_invocation(&repo);
        assert_eq!(
            invocation.arg_list(),
            ["init", "--encryption", "repokey", "vault:/srv/borg/tank"]
        );
    }

    #[test]
    fn test_dry_run_does_not_execute() {
        let label = Label::parse("day-20240602").unwrap();
        tool()
            .create_archive(&local_repo(), &label, Path::new("/nonexistent"))
            .unwrap();
    }
}
