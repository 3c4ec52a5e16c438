use eyre::{Context, Result, eyre};
use std::fs::{self, File, FileTimes};
use std::path::Path;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Where rendered documents end up.
pub trait Storage {
    fn exists(&self, path: &Path) -> Result<bool>;
    fn write(&self, path: &Path, content: &str) -> Result<()>;
    /// Set access and modification time. Callers treat failure as non-fatal.
    fn set_modified_time(&self, path: &Path, epoch_seconds: f64) -> Result<()>;
}

/// The local filesystem.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsStorage;

impl Storage for FsStorage {
    fn exists(&self, path: &Path) -> Result<bool> {
        path.try_exists()
            .wrap_err_with(|| format!("Failed to check: {}", path.display()))
    }

    fn write(&self, path: &Path, content: &str) -> Result<()> {
        fs::write(path, content).wrap_err_with(|| format!("Failed to write: {}", path.display()))
    }

    fn set_modified_time(&self, path: &Path, epoch_seconds: f64) -> Result<()> {
        let time = system_time_from_epoch(epoch_seconds).ok_or_else(|| {
            eyre!("Timestamp {} is out of range", epoch_seconds)
        })?;
        let file = File::options()
            .write(true)
            .open(path)
            .wrap_err_with(|| format!("Failed to open for timestamp update: {}", path.display()))?;
        file.set_times(FileTimes::new().set_accessed(time).set_modified(time))
            .wrap_err_with(|| format!("Failed to set timestamps: {}", path.display()))
    }
}

fn system_time_from_epoch(seconds: f64) -> Option<SystemTime> {
    if !seconds.is_finite() {
        return None;
    }
    let offset = Duration::try_from_secs_f64(seconds.abs()).ok()?;
    if seconds >= 0.0 {
        UNIX_EPOCH.checked_add(offset)
    } else {
        UNIX_EPOCH.checked_sub(offset)
    }
}

#[cfg(test)]
pub use memory::MemoryStorage;
