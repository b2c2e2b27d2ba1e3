//! Run lock for overlapping scheduled invocations.
//!
//! A scheduler can fire a new run while a previous one is still waiting on
//! the OS command. Only one run may decide and write state at a time; the
//! other backs off and leaves the work to the holder.

use anyhow::{Context, Result};
use fs2::FileExt;
use std::fs::File;
use std::io::{Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

/// An exclusive advisory lock held for the duration of a run.
///
/// The lock is released when the value is dropped.
#[derive(Debug)]
pub struct RunLock {
    file: File,
    path: PathBuf,
}

impl RunLock {
    /// Try to take the lock at `path` without blocking.
    ///
    /// # Returns
    /// - `Ok(Some(lock))` if the lock was acquired
    /// - `Ok(None)` if another process holds it
    /// - `Err(_)` if the lock file could not be opened
    pub fn acquire(path: &Path) -> Result<Option<Self>> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        // Open without truncating so a holder's PID stays readable
        let mut file = std::fs::OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)
            .with_context(|| format!("Failed to open lock file {}", path.display()))?;

        if file.try_lock_exclusive().is_err() {
            return Ok(None);
        }

        file.set_len(0)?;
        file.seek(SeekFrom::Start(0))?;
        writeln!(&file, "{}", std::process::id())?;
        file.flush()?;

        Ok(Some(Self {
            file,
            path: path.to_path_buf(),
        }))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// PID recorded by the current holder, if readable.
    pub fn holder_pid(path: &Path) -> Option<u32> {
        std::fs::read_to_string(path).ok()?.trim().parse().ok()
    }
}

impl Drop for RunLock {
    fn drop(&mut self) {
        let _ = FileExt::unlock(&self.file);
    }
}
