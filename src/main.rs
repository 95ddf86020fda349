use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};

use zborg::cli::{handle_run_command, handle_snap_command, handle_status_command};

#[derive(Parser)]
#[command(
    name = "zborg",
    version,
    about = "Tiered ZFS snapshot rotation replicated into borg archive stores",
    long_about = "zborg takes one monthly, weekly or daily ZFS snapshot per configured \
                  filesystem, archives it into local and/or remote borg repositories, \
                  and prunes both the snapshots and the archives according to the \
                  configured retention counts. Meant to be run once a day as root.",
    arg_required_else_help = true
)]
struct Cli {
    /// Print mutating commands instead of running them
    #[arg(long, global = true)]
    dry_run: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Take today's tiered snapshot, archive it and apply retention
    Run {
        /// Path to the YAML configuration file
        config: PathBuf,
    },

    /// Archive an existing snapshot under the given label, without rotation
    Snap {
        /// Path to the YAML configuration file
        config: PathBuf,
        /// Name of the snapshot to archive (the part after '@')
        label: String,
    },

    /// Show each filesystem's snapshot tiers and the next scheduled tier
    Status {
        /// Path to the YAML configuration file
        config: PathBuf,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("zborg: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Run { config } => handle_run_command(&config, cli.dry_run)?,
        Commands::Snap { config, label } => handle_snap_command(&config, &label, cli.dry_run)?,
        Commands::Status { config } => handle_status_command(&config)?,
    }
    Ok(())
}
