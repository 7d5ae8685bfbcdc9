//! Installed-state markers.
//!
//! Each tracked dimension (vanilla version, Spigot build number, BuildTools
//! build number) is recorded as the raw identifier string in its own file
//! under the server root. A missing file means nothing has been installed.

use crate::config::Layout;
use crate::error::{Result, UpdaterError};
use crate::publish::replace_file;
use std::fmt;
use std::io::ErrorKind;

/// The dimensions the updater records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MarkerKind {
    /// Installed vanilla release id.
    VanillaVersion,
    /// Installed Spigot build number.
    SpigotBuild,
    /// Installed BuildTools Jenkins build number.
    BuildToolsBuild,
}

impl MarkerKind {
    /// Every marker kind, in reporting order.
    pub const ALL: [Self; 3] = [Self::VanillaVersion, Self::SpigotBuild, Self::BuildToolsBuild];

    /// Marker filename under the root.
    #[must_use]
    pub const fn file_name(self) -> &'static str {
        match self {
            Self::VanillaVersion => ".version",
            Self::SpigotBuild => ".build-number",
            Self::BuildToolsBuild => ".build-tools-build-number",
        }
    }
}

impl fmt::Display for MarkerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::VanillaVersion => "vanilla version",
            Self::SpigotBuild => "spigot build",
            Self::BuildToolsBuild => "build tools build",
        };
        f.write_str(label)
    }
}

/// Reads and writes installed-state markers for one root.
///
/// The store does no locking; callers hold the run lock and only write a
/// marker after the matching artefact has been published.
#[derive(Debug, Clone)]
pub struct StateStore {
    layout: Layout,
}

impl StateStore {
    /// Create a store over `layout`.
    #[must_use]
    pub const fn new(layout: Layout) -> Self {
        Self { layout }
    }

    /// Read the marker for `kind`.
    ///
    /// Returns `Ok(None)` when the marker does not exist. Contents are
    /// returned exactly as stored.
    ///
    /// # Errors
    ///
    /// Returns [`UpdaterError::Marker`] when the file exists but cannot be
    /// read.
    pub fn read(&self, kind: MarkerKind) -> Result<Option<String>> {
        let path = self.layout.marker_path(kind);
        match std::fs::read_to_string(&path) {
            Ok(value) => Ok(Some(value)),
            Err(source) if source.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(UpdaterError::Marker { path, source }),
        }
    }

    /// Replace the marker for `kind` with `value`.
    ///
    /// # Errors
    ///
    /// Returns [`UpdaterError::Marker`] when the marker cannot be written.
    pub fn write(&self, kind: MarkerKind, value: &str) -> Result<()> {
        let path = self.layout.marker_path(kind);
        log::debug!("recording {kind} {value} in {path}");
        replace_file(&path, value.as_bytes()).map_err(|source| UpdaterError::Marker { path, source })
    }
}
