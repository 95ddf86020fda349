//! Backup CLI commands
//!
//! Implements `zborg run` (scheduled lifecycle) and `zborg snap` (one-off
//! archive of an existing snapshot).

use std::path::Path;

use chrono::Local;

use super::context::{require_root, RunContext};
use crate::display::progress::Narrator;
use crate::display::status::format_run_summary;
use crate::error::ZborgResult;
use crate::models::Label;

/// Handle `zborg run <config>`
pub fn handle_run_command(config: &Path, dry_run: bool) -> ZborgResult<()> {
    require_root()?;
    let narrator = Narrator::stdout();
    let context = RunContext::load(config, dry_run, narrator)?;

    narrator.phase(&format!(
        "Scheduled backup of {} filesystem(s){}",
        context.settings.filesystems.len(),
        if dry_run { " (dry run)" } else { "" }
    ));

    let outcomes = context
        .coordinator()
        .run_scheduled(Local::now().date_naive())?;

    narrator.phase("Scheduled backup complete");
    print!("{}", format_run_summary(&outcomes));
    Ok(())
}

/// Handle `zborg snap <config> <label>`
pub fn handle_snap_command(config: &Path, label: &str, dry_run: bool) -> ZborgResult<()> {
    require_root()?;
    let label = Label::parse(label)?;
    let narrator = Narrator::stdout();
    let context = RunContext::load(config, dry_run, narrator)?;

    narrator.phase(&format!(
        "Archiving snapshot {} of {} filesystem(s){}",
        label,
        context.settings.filesystems.len(),
        if dry_run { " (dry run)" } else { "" }
    ));

    let outcomes = context.coordinator().run_named(&label)?;

    narrator.phase("Snapshot archive complete");
    for outcome in &outcomes {
        println!(
            "  {}: {} archived into {} store(s)",
            outcome.filesystem,
            label,
            outcome.archived.len()
        );
    }
    Ok(())
}
