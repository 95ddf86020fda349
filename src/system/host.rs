//! Mounts, local directories and remote host access

use std::path::Path;

use super::exec::{CommandOutput, CommandRunner, Invocation};
use super::HostTool;
use crate::error::{ZborgError, ZborgResult};
use crate::models::Label;

/// `ssh` exit code meaning the remote `test -d` found no directory
const REMOTE_ABSENT: i32 = 1;

/// Host tool backed by `mount`, `umount`, `chmod` and `ssh`
#[derive(Debug, Clone, Copy)]
pub struct SystemHost {
    runner: CommandRunner,
}

impl SystemHost {
    pub fn new(runner: CommandRunner) -> Self {
        Self { runner }
    }

    fn ssh(host: &str, remote_command: &str) -> Invocation {
        Invocation::new("ssh").args(["-o", "BatchMode=yes", host, remote_command])
    }
}

impl HostTool for SystemHost {
    fn mount_snapshot(
        &self,
        filesystem: &str,
        label: &Label,
        mount_point: &Path,
    ) -> ZborgResult<()> {
        self.create_local_dir(mount_point)?;
        let invocation = Invocation::new("mount").args([
            "-t".to_string(),
            "zfs".to_string(),
            "-o".to_string(),
            "ro".to_string(),
            label.snapshot_of(filesystem),
            mount_point.display().to_string(),
        ]);
        self.runner.run(&invocation).map_err(|e| {
            ZborgError::Mount(format!(
                "could not mount {} on {}: {}",
                label.snapshot_of(filesystem),
                mount_point.display(),
                e
            ))
        })?;
        Ok(())
    }

    fn unmount(&self, mount_point: &Path) -> ZborgResult<()> {
        let invocation = Invocation::new("umount").arg(mount_point.display().to_string());
        self.runner.run(&invocation).map_err(|e| {
            ZborgError::Mount(format!("could not unmount {}: {}", mount_point.display(), e))
        })?;
        Ok(())
    }

    fn local_dir_exists(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn create_local_dir(&self, path: &Path) -> ZborgResult<()> {
        if self.runner.is_dry_run() {
            self.runner
                .narrator()
                .step(&format!("would create directory {}", path.display()));
            return Ok(());
        }
        std::fs::create_dir_all(path).map_err(|e| {
            ZborgError::Io(format!("Failed to create directory {}: {}", path.display(), e))
        })
    }

    fn remote_dir_exists(&self, host: &str, directory: &str) -> ZborgResult<bool> {
        let invocation =
            Self::ssh(host, &format!("test -d {}", shell_quote(directory))).read_only();
        let output = self.runner.output(&invocation)?;
        remote_dir_status(&invocation, &output)
    }

    fn create_remote_dir(&self, host: &str, directory: &str) -> ZborgResult<()> {
        let invocation = Self::ssh(host, &format!("mkdir -p {}", shell_quote(directory)));
        self.runner.run(&invocation)?;
        Ok(())
    }

    fn widen_permissions(&self, path: &Path) -> ZborgResult<()> {
        let invocation = Invocation::new("chmod").args([
            "-R".to_string(),
            "o+rX".to_string(),
            path.display().to_string(),
        ]);
        self.runner.run(&invocation)?;
        Ok(())
    }
}

/// Interpret the exit status of a remote `test -d`
///
/// Only "absent" is a normal outcome besides success; ssh failures (255) and
/// signals are errors.
fn remote_dir_status(invocation: &Invocation, output: &CommandOutput) -> ZborgResult<bool> {
    match output.code {
        Some(0) => Ok(true),
        Some(REMOTE_ABSENT) => Ok(false),
        _ => Err(ZborgError::command_failed(
            invocation.to_string(),
            output.status_text(),
            output.stderr.trim(),
        )),
    }
}

/// Quote one word for the remote login shell `ssh` hands its command to
fn shell_quote(word: &str) -> String {
    format!("'{}'", word.replace('\'', r"'\''"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::progress::Narrator;
    use tempfile::TempDir;

    #[test]
    fn test_shell_quote() {
        assert_eq!(shell_quote("/srv/borg/pool_data"), "'/srv/borg/pool_data'");
        assert_eq!(shell_quote("it's"), r"'it'\''s'");
    }

    fn ssh_output(code: Option<i32>, stderr: &str) -> CommandOutput {
        CommandOutput {
            code,
            stdout: String::new(),
            stderr: stderr.to_string(),
        }
    }

    #[test]
    fn test_remote_dir_exit_codes() {
        let invocation = SystemHost::ssh("vault", "test -d '/srv/borg/pool_data'");

        assert!(remote_dir_status(&invocation, &ssh_output(Some(0), "")).unwrap());
        assert!(!remote_dir_status(&invocation, &ssh_output(Some(1), "")).unwrap());

        let err = remote_dir_status(
            &invocation,
            &ssh_output(Some(255), "ssh: connect to host vault: Connection refused\n"),
        )
        .unwrap_err();
        assert!(matches!(err, ZborgError::Command { .. }));
        let message = err.to_string();
        assert!(message.contains("exit status 255"));
        assert!(message.contains("Connection refused"));
        assert!(message.contains("ssh -o BatchMode=yes vault"));

        let err = remote_dir_status(&invocation, &ssh_output(None, "")).unwrap_err();
        assert!(err.to_string().contains("termination by signal"));
    }

    #[test]
    fn test_create_local_dir() {
        let temp_dir = TempDir::new().unwrap();
        let host = SystemHost::new(CommandRunner::new(false, Narrator::silent()));
        let path = temp_dir.path().join("pool_data");

        assert!(!host.local_dir_exists(&path));
        host.create_local_dir(&path).unwrap();
        assert!(host.local_dir_exists(&path));
    }

    #[test]
    fn test_dry_run_does_not_create_dir() {
        let temp_dir = TempDir::new().unwrap();
        let host = SystemHost::new(CommandRunner::new(true, Narrator::silent()));
        let path = temp_dir.path().join("pool_data");

        host.create_local_dir(&path).unwrap();
        assert!(!path.exists());
    }
}
