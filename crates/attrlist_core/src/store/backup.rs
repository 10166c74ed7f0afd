//! Timestamped copies of a document taken before it is overwritten.

use super::json_file::sibling_path;
use crate::error::AppError;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

fn unix_timestamp_millis(now: SystemTime) -> Result<u128, AppError> {
    now.duration_since(UNIX_EPOCH)
        .map(|duration| duration.as_millis())
        .map_err(|err| {
            AppError::Io(io::Error::other(format!(
                "Failed to compute backup timestamp from system clock: {}",
                err
            )))
        })
}

/// Copy `path` to `<path>.backup.<unix-millis>`, adding `.<n>` when that
/// name is already taken so no earlier backup is overwritten.
///
/// Backups accumulate; nothing here prunes old ones.
///
/// # Returns
/// The backup path, or `None` when there is no document yet.
///
/// # Errors
/// Returns [`AppError::Io`] if copying fails.
pub(crate) fn backup_document(path: &Path) -> Result<Option<PathBuf>, AppError> {
    if !path.exists() {
        return Ok(None);
    }
    let timestamp = unix_timestamp_millis(SystemTime::now())?;
    let base = format!("backup.{}", timestamp);
    let mut backup_path = sibling_path(path, &base);
    let mut suffix = 1u32;
    while backup_path.exists() {
        backup_path = sibling_path(path, &format!("{}.{}", base, suffix));
        suffix += 1;
    }
    fs::copy(path, &backup_path)?;
    tracing::info!("Created document backup at: {:?}", backup_path);
    Ok(Some(backup_path))
}
