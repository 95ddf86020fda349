//! Shared setup for the run and snap commands
//!
//! Loads configuration and passphrase, then wires the real external tools
//! together. Everything here happens before any filesystem is touched.

use std::path::Path;
use std::time::Duration;

use crate::backup::Coordinator;
use crate::config::{read_passphrase, Settings};
use crate::display::progress::Narrator;
use crate::error::{ZborgError, ZborgResult};
use crate::journal::Journal;
use crate::system::{BorgTool, CommandRunner, SystemHost, Tools, ZfsTool};

/// Fail unless running with superuser privilege
pub fn require_root() -> ZborgResult<()> {
    // SAFETY: geteuid has no preconditions and cannot fail
    let euid = unsafe { libc::geteuid() };
    if euid != 0 {
        return Err(ZborgError::Privilege(
            "zborg must be run as root".to_string(),
        ));
    }
    Ok(())
}

/// Configuration and tools for one invocation
pub struct RunContext {
    pub settings: Settings,
    pub narrator: Narrator,
    dry_run: bool,
    zfs: ZfsTool,
    host: SystemHost,
    borg: BorgTool,
}

impl RunContext {
    pub fn load(config: &Path, dry_run: bool, narrator: Narrator) -> ZborgResult<Self> {
        let settings = Settings::load(config)?;
        let passphrase = read_passphrase(&settings.passphrase_file)?;

        let runner = CommandRunner::new(dry_run, narrator);
        Ok(Self {
            zfs: ZfsTool::new(runner),
            host: SystemHost::new(runner),
            borg: BorgTool::new(runner, passphrase, settings.archive.clone()),
            settings,
            narrator,
            dry_run,
        })
    }

    pub fn tools(&self) -> Tools<'_> {
        Tools {
            snapshots: &self.zfs,
            host: &self.host,
            archives: &self.borg,
        }
    }

    /// Coordinator over the real tools, with the journal if one is configured
    pub fn coordinator(&self) -> Coordinator<'_> {
        let mut coordinator = Coordinator::new(&self.settings, self.tools(), self.narrator);
        if self.dry_run {
            coordinator = coordinator.with_settle_delay(Duration::ZERO);
        } else if let Some(path) = &self.settings.journal {
            let journal = Journal::open(path);
            self.narrator.step(&format!(
                "Journal: {} (run {})",
                path.display(),
                journal.run_id()
            ));
            coordinator = coordinator.with_journal(journal);
        }
        coordinator
    }
}
