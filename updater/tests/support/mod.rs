//! Test support utilities for updater behavioural tests.
//!
//! Provides a throwaway server root and helpers for inspecting what a run
//! left behind in it.

use camino::Utf8PathBuf;
use jar_updater::config::Layout;
use jar_updater::error::UpdaterError;
use jar_updater::state::{MarkerKind, StateStore};
use tempfile::TempDir;

/// A temporary server root, removed on drop.
pub struct TempRoot {
    _temp: TempDir,
    /// Layout rooted in the temporary directory.
    pub layout: Layout,
}

impl TempRoot {
    /// Create an empty root.
    pub fn new() -> Self {
        let temp = tempfile::tempdir().expect("temp dir");
        let root = Utf8PathBuf::try_from(temp.path().to_path_buf()).expect("UTF-8 path");
        Self {
            _temp: temp,
            layout: Layout::new(root),
        }
    }

    /// Current value of the marker for `kind`.
    pub fn marker(&self, kind: MarkerKind) -> Option<String> {
        StateStore::new(self.layout.clone())
            .read(kind)
            .expect("read marker")
    }

    /// Seed the marker for `kind`.
    pub fn seed_marker(&self, kind: MarkerKind, value: &str) {
        StateStore::new(self.layout.clone())
            .write(kind, value)
            .expect("write marker");
    }

    /// Names of all entries in the root, sorted.
    pub fn entries(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .layout
            .root()
            .read_dir_utf8()
            .expect("list root")
            .map(|entry| entry.expect("dir entry").file_name().to_owned())
            .collect();
        names.sort();
        names
    }
}

/// Assert that `result` failed with the given process exit code.
pub fn assert_exit_code(result: Option<&Result<(), UpdaterError>>, code: &str) {
    let expected: i32 = code.parse().expect("numeric exit code");
    match result.expect("a run was performed") {
        Ok(()) => panic!("expected failure with exit code {expected}, run succeeded"),
        Err(err) => assert_eq!(
            err.kind().exit_code(),
            expected,
            "unexpected failure class for {err}"
        ),
    }
}
