//! Error types for the jar updater.
//!
//! Every failure aborts the run. Variants are grouped into a small
//! [`FailureKind`] classification so the binary can report a distinct exit
//! code per failure class without callers matching on every variant.

use crate::checksum::ChecksumAlgorithm;
use crate::download::DownloadError;
use camino::Utf8PathBuf;
use thiserror::Error;

/// Errors that can occur while resolving, fetching, building, or publishing.
#[derive(Debug, Error)]
pub enum UpdaterError {
    /// The requested version is not listed in the upstream manifest.
    #[error("resolved version could not be found in {source_name} manifest: {version}")]
    VersionNotFound {
        /// Which upstream was queried (for example `vanilla`).
        source_name: &'static str,
        /// The concrete version identifier that was looked up.
        version: String,
    },

    /// The build server reported no builds for the job.
    #[error("no builds published at {url}")]
    NoBuildsPublished {
        /// The job URL that was queried.
        url: String,
    },

    /// No artifact record matched the expected filename.
    #[error("build {build} has no artifact record for {file_name}")]
    ArtifactRecordMissing {
        /// The build number that was inspected.
        build: String,
        /// The artifact filename that was searched for.
        file_name: String,
    },

    /// A metadata document did not have the expected shape.
    #[error("invalid metadata from {url}: {reason}")]
    InvalidMetadata {
        /// The URL the document was fetched from.
        url: String,
        /// Description of the decode failure.
        reason: String,
    },

    /// A metadata document does not exist upstream (HTTP 404).
    #[error("metadata not found at {url}")]
    MetadataNotFound {
        /// The URL that answered 404.
        url: String,
    },

    /// The selector cannot be used to address an upstream document.
    #[error("invalid version selector \"{selector}\": {reason}")]
    InvalidSelector {
        /// The rejected selector.
        selector: String,
        /// Why it was rejected.
        reason: String,
    },

    /// A checksum published in metadata is malformed.
    #[error("invalid {algorithm} checksum \"{value}\": {reason}")]
    InvalidChecksum {
        /// The algorithm the digest claims to be.
        algorithm: ChecksumAlgorithm,
        /// The rejected digest string.
        value: String,
        /// Description of the validation failure.
        reason: String,
    },

    /// A network or HTTP failure.
    #[error(transparent)]
    Download(#[from] DownloadError),

    /// Downloaded bytes do not match the published checksum.
    #[error("downloaded file ({url}) {algorithm} hash ({actual}) did not match provided checksum ({expected})")]
    ChecksumMismatch {
        /// The URL the payload was downloaded from.
        url: String,
        /// The digest algorithm used for verification.
        algorithm: ChecksumAlgorithm,
        /// The digest published in metadata.
        expected: String,
        /// The digest computed over the downloaded bytes.
        actual: String,
    },

    /// The build tool left no recognisable output.
    #[error("no build output matching {pattern} found in {directory}")]
    MissingArtifact {
        /// The filename pattern that was searched for.
        pattern: String,
        /// The directory that was scanned.
        directory: Utf8PathBuf,
    },

    /// The build tool produced output, but not for the requested revision.
    #[error("build output for revision {revision} not found in {directory}")]
    RequestedBuildMissing {
        /// The explicit revision that was requested.
        revision: String,
        /// The directory that was scanned.
        directory: Utf8PathBuf,
    },

    /// The external build tool failed or timed out.
    #[error("build tool failed: {reason}")]
    BuildFailed {
        /// Description of the failure.
        reason: String,
    },

    /// Another update run holds the lock for this root.
    #[error("another update is already running against {path}")]
    LockHeld {
        /// Path to the lock file.
        path: Utf8PathBuf,
    },

    /// Reading or writing an installed-state marker failed.
    #[error("failed to access marker {path}: {source}")]
    Marker {
        /// Path to the marker file.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Replacing a published artifact failed.
    #[error("failed to publish {path}: {source}")]
    Publish {
        /// The well-known path being replaced.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// An I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Test stub received a request it was not primed for.
    #[cfg(any(test, feature = "test-support"))]
    #[error("stub mismatch: {message}")]
    StubMismatch {
        /// Description of what was expected versus what was received.
        message: String,
    },
}

/// Coarse classification of [`UpdaterError`] used for exit codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The requested version or build could not be found upstream.
    Resolution,
    /// Network or HTTP failure.
    Transport,
    /// Downloaded bytes failed checksum verification.
    Integrity,
    /// The build tool did not produce the expected output.
    MissingArtifact,
    /// Anything else (I/O, lock, build tool process failure).
    Other,
}

impl FailureKind {
    /// Process exit code reported for this class of failure.
    #[must_use]
    pub const fn exit_code(self) -> i32 {
        match self {
            Self::Other => 1,
            Self::Resolution => 2,
            Self::Transport => 3,
            Self::Integrity => 4,
            Self::MissingArtifact => 5,
        }
    }
}

impl UpdaterError {
    /// Classify this error.
    #[must_use]
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::VersionNotFound { .. }
            | Self::NoBuildsPublished { .. }
            | Self::ArtifactRecordMissing { .. }
            | Self::InvalidMetadata { .. }
            | Self::MetadataNotFound { .. }
            | Self::InvalidSelector { .. }
            | Self::InvalidChecksum { .. } => FailureKind::Resolution,
            Self::Download(_) => FailureKind::Transport,
            Self::ChecksumMismatch { .. } => FailureKind::Integrity,
            Self::MissingArtifact { .. } | Self::RequestedBuildMissing { .. } => {
                FailureKind::MissingArtifact
            }
            Self::BuildFailed { .. }
            | Self::LockHeld { .. }
            | Self::Marker { .. }
            | Self::Publish { .. }
            | Self::Io(_) => FailureKind::Other,
            #[cfg(any(test, feature = "test-support"))]
            Self::StubMismatch { .. } => FailureKind::Other,
        }
    }
}

/// Result type alias using [`UpdaterError`].
pub type Result<T> = std::result::Result<T, UpdaterError>;
