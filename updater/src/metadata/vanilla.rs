//! Mojang launcher metadata.
//!
//! Resolution is two lookups: the version manifest maps aliases to concrete
//! ids and ids to per-version documents; the per-version document carries
//! the server download URL and its SHA-1.

use super::{ArtifactDescriptor, fetch_json};
use crate::checksum::{ChecksumAlgorithm, ChecksumRecord};
use crate::config::VersionSelector;
use crate::download::HttpClient;
use crate::error::{Result, UpdaterError};
use serde::Deserialize;

/// Top-level launcher manifest.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct VersionManifest {
    /// Alias targets.
    pub latest: LatestVersions,
    /// Every published version.
    pub versions: Vec<VersionEntry>,
}

/// Concrete ids behind the `release` and `snapshot` aliases.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LatestVersions {
    /// Newest release id.
    pub release: String,
    /// Newest snapshot id.
    pub snapshot: String,
}

/// One manifest entry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct VersionEntry {
    /// Version id, e.g. `1.20.1` or `23w31a`.
    pub id: String,
    /// URL of the per-version document.
    pub url: String,
}

/// Per-version document; only the downloads section is consumed.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct VersionDocument {
    /// Download descriptors keyed by side.
    pub downloads: Downloads,
}

/// Download descriptors of a version.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Downloads {
    /// Dedicated server jar; absent for very old versions.
    #[serde(default)]
    pub server: Option<DownloadEntry>,
}

/// A single downloadable file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DownloadEntry {
    /// Download URL.
    pub url: String,
    /// SHA-1 of the file.
    pub sha1: String,
}

/// What a vanilla selector asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VanillaRequest {
    /// Newest release (`release`, `latest`).
    Release,
    /// Newest snapshot (`snapshot`).
    Snapshot,
    /// An explicit version id.
    Exact(String),
}

impl VanillaRequest {
    /// Interpret a normalised selector.
    #[must_use]
    pub fn from_selector(selector: &VersionSelector) -> Self {
        match selector.as_str() {
            "release" | VersionSelector::LATEST => Self::Release,
            "snapshot" => Self::Snapshot,
            other => Self::Exact(other.to_owned()),
        }
    }
}

impl VersionManifest {
    /// The concrete id `request` refers to.
    #[must_use]
    pub fn concrete_id<'a>(&'a self, request: &'a VanillaRequest) -> &'a str {
        match request {
            VanillaRequest::Release => &self.latest.release,
            VanillaRequest::Snapshot => &self.latest.snapshot,
            VanillaRequest::Exact(id) => id,
        }
    }

    /// Resolve `request` to its manifest entry.
    ///
    /// # Errors
    ///
    /// Returns [`UpdaterError::VersionNotFound`] when the concrete id is not
    /// listed.
    pub fn resolve(&self, request: &VanillaRequest) -> Result<&VersionEntry> {
        let id = self.concrete_id(request);
        self.versions
            .iter()
            .find(|entry| entry.id == id)
            .ok_or_else(|| UpdaterError::VersionNotFound {
                source_name: "vanilla",
                version: id.to_owned(),
            })
    }
}

/// Fetch and decode the launcher manifest.
///
/// # Errors
///
/// Returns a transport or metadata error.
pub fn fetch_manifest(client: &dyn HttpClient, manifest_url: &str) -> Result<VersionManifest> {
    fetch_json(client, manifest_url)
}

/// Fetch the per-version document for `entry` and extract the server jar.
///
/// # Errors
///
/// Returns a transport or metadata error, or
/// [`UpdaterError::InvalidMetadata`] when the version has no server
/// download.
pub fn fetch_server_download(
    client: &dyn HttpClient,
    entry: &VersionEntry,
) -> Result<ArtifactDescriptor> {
    let document: VersionDocument = fetch_json(client, &entry.url)?;
    let server = document
        .downloads
        .server
        .ok_or_else(|| UpdaterError::InvalidMetadata {
            url: entry.url.clone(),
            reason: format!("version {} has no server download", entry.id),
        })?;
    Ok(ArtifactDescriptor {
        checksum: ChecksumRecord::new(ChecksumAlgorithm::Sha1, &server.sha1)?,
        url: server.url,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::download::MockHttpClient;
    use crate::metadata::decode_json;
    use rstest::rstest;

    const MANIFEST: &str = r#"{
        "latest": {"release": "1.20.1", "snapshot": "23w31a"},
        "versions": [
            {"id": "23w31a", "type": "snapshot", "url": "https://meta.test/23w31a.json"},
            {"id": "1.20.1", "type": "release", "url": "https://meta.test/1.20.1.json"},
            {"id": "1.19.4", "type": "release", "url": "https://meta.test/1.19.4.json"}
        ]
    }"#;

    fn manifest() -> VersionManifest {
        decode_json("manifest", MANIFEST).expect("valid manifest")
    }

    #[rstest]
    #[case::latest("latest", "1.20.1")]
    #[case::release("release", "1.20.1")]
    #[case::snapshot("snapshot", "23w31a")]
    #[case::explicit("1.19.4", "1.19.4")]
    fn selectors_resolve_to_concrete_ids(#[case] raw: &str, #[case] expected: &str) {
        let request = VanillaRequest::from_selector(&VersionSelector::new(raw));
        let manifest = manifest();
        let entry = manifest.resolve(&request).expect("resolves");
        assert_eq!(entry.id, expected);
    }

    #[test]
    fn unknown_explicit_id_is_not_found() {
        let request = VanillaRequest::from_selector(&VersionSelector::new("9.9.9"));
        let err = manifest().resolve(&request).expect_err("unknown");
        assert!(matches!(
            err,
            UpdaterError::VersionNotFound { ref version, .. } if version == "9.9.9"
        ));
    }

    #[test]
    fn alias_pointing_at_unlisted_id_is_not_found() {
        let json = MANIFEST.replace(r#""release": "1.20.1""#, r#""release": "1.20.2""#);
        let manifest: VersionManifest = decode_json("manifest", &json).expect("valid manifest");
        let err = manifest
            .resolve(&VanillaRequest::Release)
            .expect_err("unlisted");
        assert!(matches!(err, UpdaterError::VersionNotFound { .. }));
    }

    #[test]
    fn server_download_is_extracted() {
        let sha1 = "a".repeat(40);
        let body = format!(
            r#"{{"downloads": {{
                "client": {{"url": "https://cdn.test/client.jar", "sha1": "{sha1}"}},
                "server": {{"url": "https://cdn.test/server.jar", "sha1": "{sha1}", "size": 1}}
            }}}}"#
        );
        let mut client = MockHttpClient::new();
        client
            .expect_get_text()
            .withf(|url| url == "https://meta.test/1.20.1.json")
            .returning(move |_| Ok(body.clone()));

        let entry = manifest().resolve(&VanillaRequest::Release).expect("entry").clone();
        let descriptor = fetch_server_download(&client, &entry).expect("descriptor");
        assert_eq!(descriptor.url, "https://cdn.test/server.jar");
        assert_eq!(descriptor.checksum.algorithm(), ChecksumAlgorithm::Sha1);
        assert_eq!(descriptor.checksum.expected(), sha1);
    }

    #[test]
    fn version_without_server_download_is_invalid() {
        let mut client = MockHttpClient::new();
        client
            .expect_get_text()
            .returning(|_| Ok(r#"{"downloads": {}}"#.to_owned()));

        let entry = VersionEntry {
            id: "b1.7.3".to_owned(),
            url: "https://meta.test/b1.7.3.json".to_owned(),
        };
        let err = fetch_server_download(&client, &entry).expect_err("no server");
        assert!(matches!(err, UpdaterError::InvalidMetadata { .. }));
    }

    #[test]
    fn malformed_manifest_is_invalid_metadata() {
        let mut client = MockHttpClient::new();
        client
            .expect_get_text()
            .returning(|_| Ok(r#"{"versions": []}"#.to_owned()));
        let err = fetch_manifest(&client, "https://meta.test/manifest.json").expect_err("shape");
        assert!(matches!(err, UpdaterError::InvalidMetadata { .. }));
    }
}
