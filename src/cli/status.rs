//! Status CLI command
//!
//! Read-only overview of each filesystem's tier inventory and the tier the
//! next scheduled run would take.

use std::path::Path;

use chrono::Local;

use crate::backup::{classify, Inventory};
use crate::config::Settings;
use crate::display::progress::Narrator;
use crate::display::status::format_status;
use crate::error::ZborgResult;
use crate::models::Tier;
use crate::system::{CommandRunner, ZfsTool};

/// Handle `zborg status <config>`
pub fn handle_status_command(config: &Path) -> ZborgResult<()> {
    let settings = Settings::load(config)?;
    let zfs = ZfsTool::new(CommandRunner::new(false, Narrator::silent()));
    let inventory = Inventory::new(&zfs);
    let today = Local::now().date_naive();

    for filesystem in &settings.filesystems {
        let summaries = inventory.summary(filesystem)?;
        let has = |tier: Tier| summaries.iter().any(|s| s.tier == tier && s.count > 0);
        let decision = classify(
            today,
            has(Tier::Month),
            has(Tier::Week),
            settings.weekly_day,
        );

        println!(
            "{}",
            format_status(filesystem, &summaries, &settings.retention, &decision)
        );
    }

    let destinations = settings.destinations();
    if destinations.is_empty() {
        println!("No archive destinations configured.");
    } else {
        for destination in destinations {
            println!("Destination ({}): {}", destination.kind(), destination);
        }
    }
    Ok(())
}
