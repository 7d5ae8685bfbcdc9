//! Run configuration and the on-disk layout of the server root.
//!
//! All locations the updater touches are derived from one root directory.
//! The binary builds an [`UpdaterConfig`] once from CLI flags and
//! environment and passes it down; nothing below reads the environment.

use crate::state::MarkerKind;
use camino::{Utf8Path, Utf8PathBuf};
use std::fmt;
use std::time::Duration;

/// Default server root used by the container images.
pub const DEFAULT_ROOT: &str = "/opt/minecraft/data";

/// Mojang launcher manifest listing every published version.
pub const VANILLA_MANIFEST_URL: &str =
    "https://launchermeta.mojang.com/mc/game/version_manifest.json";

/// Jenkins job that publishes the Spigot BuildTools jar.
pub const BUILD_TOOLS_JOB_URL: &str = "https://hub.spigotmc.org/jenkins/job/BuildTools/";

/// Base URL for Spigot revision documents (`<base>/<rev>.json`).
pub const SPIGOT_VERSIONS_URL: &str = "https://hub.spigotmc.org/versions";

/// Default per-request HTTP timeout.
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(120);

/// Default upper bound for a single BuildTools run.
pub const DEFAULT_BUILD_TIMEOUT: Duration = Duration::from_secs(3600);

/// Well-known paths under the server root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    root: Utf8PathBuf,
}

impl Layout {
    /// Published server artefact that downstream consumers launch.
    pub const SERVER_FILE: &'static str = "server.jar";
    /// Where the downloaded BuildTools jar is published.
    pub const BUILD_TOOLS_FILE: &'static str = "build-tools.jar";
    /// Advisory lock held for the duration of a run.
    pub const LOCK_FILE: &'static str = ".update.lock";

    /// Create a layout rooted at `root`.
    #[must_use]
    pub fn new(root: impl Into<Utf8PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The root directory.
    #[must_use]
    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    /// Path to the published server jar (file or symbolic link).
    #[must_use]
    pub fn server_path(&self) -> Utf8PathBuf {
        self.root.join(Self::SERVER_FILE)
    }

    /// Path to the published BuildTools jar.
    #[must_use]
    pub fn build_tools_path(&self) -> Utf8PathBuf {
        self.root.join(Self::BUILD_TOOLS_FILE)
    }

    /// Path to the marker file for `kind`.
    #[must_use]
    pub fn marker_path(&self, kind: MarkerKind) -> Utf8PathBuf {
        self.root.join(kind.file_name())
    }

    /// Path to the run lock.
    #[must_use]
    pub fn lock_path(&self) -> Utf8PathBuf {
        self.root.join(Self::LOCK_FILE)
    }
}

/// A normalised version request (`latest`, `release`, `snapshot`, or an id).
///
/// Input is trimmed and lower-cased once, matching how operators set the
/// selector in container environments.
///
/// # Examples
///
/// ```
/// use jar_updater::config::VersionSelector;
///
/// let selector = VersionSelector::new("  Latest\n");
/// assert!(selector.is_latest());
/// assert_eq!(selector.as_str(), "latest");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VersionSelector(String);

impl VersionSelector {
    /// Sentinel meaning "whatever upstream considers newest".
    pub const LATEST: &'static str = "latest";

    /// Normalise a raw selector.
    #[must_use]
    pub fn new(raw: &str) -> Self {
        Self(raw.trim().to_lowercase())
    }

    /// The normalised selector text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Return true for the `latest` sentinel.
    #[must_use]
    pub fn is_latest(&self) -> bool {
        self.0 == Self::LATEST
    }
}

impl Default for VersionSelector {
    fn default() -> Self {
        Self(Self::LATEST.to_owned())
    }
}

impl fmt::Display for VersionSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Remote endpoints for the vanilla source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VanillaEndpoints {
    /// URL of the launcher version manifest.
    pub manifest_url: String,
}

impl Default for VanillaEndpoints {
    fn default() -> Self {
        Self {
            manifest_url: VANILLA_MANIFEST_URL.to_owned(),
        }
    }
}

/// Remote endpoints and build settings for the Spigot source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpigotEndpoints {
    /// Jenkins job URL (with trailing slash) for BuildTools.
    pub build_tools_job_url: String,
    /// Base URL for `<rev>.json` revision documents.
    pub versions_url: String,
    /// Filename of the BuildTools artefact inside the Jenkins build.
    pub build_tools_artifact: String,
}

impl Default for SpigotEndpoints {
    fn default() -> Self {
        Self {
            build_tools_job_url: BUILD_TOOLS_JOB_URL.to_owned(),
            versions_url: SPIGOT_VERSIONS_URL.to_owned(),
            build_tools_artifact: "BuildTools.jar".to_owned(),
        }
    }
}

/// Everything a single update run needs, built once at start-up.
#[derive(Debug, Clone)]
pub struct UpdaterConfig {
    /// Filesystem layout under the server root.
    pub layout: Layout,
    /// The requested version.
    pub selector: VersionSelector,
    /// Per-request HTTP timeout.
    pub http_timeout: Duration,
}
