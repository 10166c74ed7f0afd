//! Advisory write lock for JSON attribute documents.

use crate::error::AppError;
use fs2::FileExt;
use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

/// Contention becomes [`AppError::Locked`]; anything else is a real I/O failure.
fn lock_error(lock_path: &Path, err: io::Error) -> AppError {
    match err.kind() {
        io::ErrorKind::WouldBlock | io::ErrorKind::PermissionDenied => {
            tracing::warn!("Document lock {:?} is held elsewhere: {}", lock_path, err);
            AppError::Locked(format!("Another writer holds '{}'", lock_path.display()))
        }
        _ => AppError::Io(io::Error::new(
            err.kind(),
            format!("Failed to lock '{}': {}", lock_path.display(), err),
        )),
    }
}

/// Exclusive OS lock on a document's lock file, released on drop.
pub struct DocumentLock {
    file: File,
    lock_path: PathBuf,
}

impl DocumentLock {
    /// Take the lock without waiting.
    ///
    /// # Errors
    /// Returns [`AppError::Locked`] when another handle holds the lock, or
    /// [`AppError::Io`] when the lock file cannot be created or locked.
    pub fn acquire(lock_path: &Path) -> Result<Self, AppError> {
        if let Some(parent) = lock_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .read(true)
            .write(true)
            .open(lock_path)?;

        match FileExt::try_lock_exclusive(&file) {
            Ok(()) => Ok(Self {
                file,
                lock_path: lock_path.to_path_buf(),
            }),
            Err(err) => Err(lock_error(lock_path, err)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.lock_path
    }
}

impl Drop for DocumentLock {
    fn drop(&mut self) {
        if let Err(err) = FileExt::unlock(&self.file) {
            tracing::warn!(
                "Failed to release document lock {:?} during drop: {}",
                self.lock_path,
                err
            );
        }
    }
}
