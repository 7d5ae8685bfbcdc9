//! Per-root run lock.
//!
//! Two runs against the same root would race on markers and published
//! paths, so a run holds an exclusive advisory lock on a file under the
//! root until it finishes. A second run fails fast instead of waiting.

use crate::config::Layout;
use crate::error::{Result, UpdaterError};
use camino::Utf8PathBuf;
use fs2::FileExt;
use std::fs::{File, OpenOptions};
use std::io;

/// Exclusive lock on a server root, released on drop.
#[derive(Debug)]
pub struct RunLock {
    file: File,
    path: Utf8PathBuf,
}

impl RunLock {
    /// Acquire the lock for `layout`, creating the root if needed.
    ///
    /// # Errors
    ///
    /// Returns [`UpdaterError::LockHeld`] if another process holds the lock,
    /// or an I/O error if the lock file cannot be opened.
    pub fn acquire(layout: &Layout) -> Result<Self> {
        std::fs::create_dir_all(layout.root())?;
        let path = layout.lock_path();
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&path)?;

        match file.try_lock_exclusive() {
            Ok(()) => {
                log::debug!("acquired run lock {path}");
                Ok(Self { file, path })
            }
            Err(e) if is_contended(&e) => Err(UpdaterError::LockHeld { path }),
            Err(e) => Err(UpdaterError::Io(e)),
        }
    }
}

fn is_contended(err: &io::Error) -> bool {
    err.kind() == io::ErrorKind::WouldBlock
        || err.raw_os_error() == fs2::lock_contended_error().raw_os_error()
}

impl Drop for RunLock {
    fn drop(&mut self) {
        if let Err(e) = FileExt::unlock(&self.file) {
            log::warn!("failed to release run lock {}: {e}", self.path);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout(temp: &tempfile::TempDir) -> Layout {
        Layout::new(Utf8PathBuf::try_from(temp.path().to_path_buf()).expect("UTF-8 path"))
    }

    #[test]
    fn second_acquire_fails_while_held() {
        let temp = tempfile::tempdir().expect("temp dir");
        let layout = layout(&temp);
        let _held = RunLock::acquire(&layout).expect("first lock");
        let err = RunLock::acquire(&layout).expect_err("contended");
        assert!(matches!(err, UpdaterError::LockHeld { .. }));
    }

    #[test]
    fn lock_is_released_on_drop() {
        let temp = tempfile::tempdir().expect("temp dir");
        let layout = layout(&temp);
        drop(RunLock::acquire(&layout).expect("first lock"));
        RunLock::acquire(&layout).expect("reacquired");
    }

    #[test]
    fn missing_root_is_created() {
        let temp = tempfile::tempdir().expect("temp dir");
        let root = Utf8PathBuf::try_from(temp.path().join("nested/data")).expect("UTF-8 path");
        let layout = Layout::new(root.clone());
        let _lock = RunLock::acquire(&layout).expect("lock");
        assert!(root.join(Layout::LOCK_FILE).is_file());
    }
}
