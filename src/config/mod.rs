//! Configuration module for zborg
//!
//! This module provides configuration management including:
//! - YAML settings parsing and validation
//! - Passphrase file loading
//! - Mount point derivation

pub mod passphrase;
pub mod paths;
pub mod settings;

pub use passphrase::read_passphrase;
pub use paths::BackupPaths;
pub use settings::{ArchiveOptions, Settings};
