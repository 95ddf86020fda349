//! zborg - tiered ZFS snapshot rotation replicated into borg archive stores
//!
//! This library provides the core functionality of the `zborg` backup tool.
//! Each invocation decides, per configured filesystem, whether today is a
//! month, week or day backup, takes that snapshot, archives it into the
//! configured local and/or remote borg stores, and then prunes both the live
//! snapshots and the archive history.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Settings parsing, passphrase loading, mount point paths
//! - `error`: Custom error types
//! - `models`: Tiers, labels, destinations, repositories, retention policy
//! - `system`: Typed interfaces to `zfs`, `mount`, `ssh` and `borg`
//! - `backup`: Inventory, classifier, snapshot, archive and retention engine
//! - `journal`: Optional JSONL record of every mutating operation
//! - `display`: Progress narration and status tables
//! - `cli`: Command handlers
//!
//! # Example
//!
//! ```rust,ignore
//! use zborg::cli::RunContext;
//! use zborg::display::Narrator;
//!
//! let context = RunContext::load(Path::new("/etc/zborg.yaml"), false, Narrator::stdout())?;
//! let outcomes = context.coordinator().run_scheduled(chrono::Local::now().date_naive())?;
//! ```

pub mod backup;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod journal;
pub mod models;
pub mod system;

pub use error::ZborgError;
