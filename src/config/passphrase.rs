//! Passphrase loading
//!
//! The archive store passphrase lives in a root-only file; only its first
//! line is used. The value is held in zeroizing memory for the whole run.

use std::path::Path;

use zeroize::Zeroizing;

use crate::error::{ZborgError, ZborgResult};

/// Read the first line of a passphrase file
pub fn read_passphrase(path: &Path) -> ZborgResult<Zeroizing<String>> {
    let contents = Zeroizing::new(std::fs::read_to_string(path).map_err(|e| {
        ZborgError::Passphrase(format!("Failed to read {}: {}", path.display(), e))
    })?);

    let first_line = contents
        .lines()
        .next()
        .map(|line| line.trim_end_matches('\r'))
        .unwrap_or_default();

    if first_line.is_empty() {
        return Err(ZborgError::Passphrase(format!(
            "{} does not start with a passphrase",
            path.display()
        )));
    }

    Ok(Zeroizing::new(first_line.to_string()))
}
