//! SpigotMC metadata: the Jenkins BuildTools job and revision documents.
//!
//! The BuildTools checksum lives two levels down: the job lists builds, and
//! each build's deep API view lists Maven module records whose main
//! artefact carries a filename and MD5.

use super::{ArtifactDescriptor, fetch_json};
use crate::checksum::{ChecksumAlgorithm, ChecksumRecord};
use crate::config::VersionSelector;
use crate::download::HttpClient;
use crate::error::{Result, UpdaterError};
use serde::Deserialize;

/// Jenkins job view (`<job>/api/json`).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct JobDocument {
    /// Builds, newest first.
    pub builds: Vec<BuildRef>,
}

/// A build listed by the job.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BuildRef {
    /// Jenkins build number.
    pub number: u64,
    /// Build URL, with trailing slash.
    pub url: String,
}

/// Deep build view (`<build>/api/json?depth=2`).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildDocument {
    /// Maven artefacts recorded for the build.
    pub maven_artifacts: MavenArtifacts,
}

/// Maven artefact summary of a build.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MavenArtifacts {
    /// One record per Maven module.
    pub module_records: Vec<ModuleRecord>,
}

/// A Maven module record.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleRecord {
    /// Primary artefact; some modules publish none.
    #[serde(default)]
    pub main_artifact: Option<ArtifactRecord>,
}

/// A published artefact file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtifactRecord {
    /// Artefact filename, e.g. `BuildTools.jar`.
    pub file_name: String,
    /// MD5 of the file.
    pub md5sum: String,
}

/// Spigot revision document (`versions/<rev>.json`).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RevisionDocument {
    /// Spigot build number for the revision.
    pub name: String,
}

impl BuildRef {
    /// The build number as recorded in the marker file.
    #[must_use]
    pub fn build_number(&self) -> String {
        self.number.to_string()
    }

    /// URL of the deep API view listing module records.
    #[must_use]
    pub fn api_url(&self) -> String {
        join_url(&self.url, "api/json?depth=2")
    }

    /// Download URL of `file_name` within the build's `target` directory.
    #[must_use]
    pub fn artifact_url(&self, file_name: &str) -> String {
        join_url(&self.url, &format!("artifact/target/{file_name}"))
    }
}

impl BuildDocument {
    /// The MD5 published for `file_name`, if any module records it.
    #[must_use]
    pub fn md5_for(&self, file_name: &str) -> Option<&str> {
        self.maven_artifacts
            .module_records
            .iter()
            .filter_map(|record| record.main_artifact.as_ref())
            .find(|artifact| artifact.file_name == file_name)
            .map(|artifact| artifact.md5sum.as_str())
    }
}

/// Fetch the newest build of the Jenkins job at `job_url`.
///
/// # Errors
///
/// Returns a transport or metadata error, or
/// [`UpdaterError::NoBuildsPublished`] when the job lists no builds.
pub fn latest_build(client: &dyn HttpClient, job_url: &str) -> Result<BuildRef> {
    let url = join_url(job_url, "api/json");
    let job: JobDocument = fetch_json(client, &url)?;
    job.builds
        .into_iter()
        .next()
        .ok_or(UpdaterError::NoBuildsPublished { url })
}

/// Locate `file_name` in `build` and return its download descriptor.
///
/// # Errors
///
/// Returns a transport or metadata error, or
/// [`UpdaterError::ArtifactRecordMissing`] when no module record names the
/// file.
pub fn build_artifact(
    client: &dyn HttpClient,
    build: &BuildRef,
    file_name: &str,
) -> Result<ArtifactDescriptor> {
    let document: BuildDocument = fetch_json(client, &build.api_url())?;
    let md5 = document
        .md5_for(file_name)
        .ok_or_else(|| UpdaterError::ArtifactRecordMissing {
            build: build.build_number(),
            file_name: file_name.to_owned(),
        })?;
    Ok(ArtifactDescriptor {
        url: build.artifact_url(file_name),
        checksum: ChecksumRecord::new(ChecksumAlgorithm::Md5, md5)?,
    })
}

/// Look up the Spigot build number that `selector` currently denotes.
///
/// An unknown revision answers 404, which surfaces as a resolution failure.
/// The selector becomes a path segment, so only ASCII letters, digits, `.`,
/// `-` and `_` are accepted.
///
/// # Errors
///
/// Returns [`UpdaterError::InvalidSelector`] for a selector that is not a
/// plain path segment, otherwise a transport or metadata error.
pub fn revision_build(
    client: &dyn HttpClient,
    versions_url: &str,
    selector: &VersionSelector,
) -> Result<String> {
    check_revision_segment(selector)?;
    let url = join_url(versions_url, &format!("{selector}.json"));
    let document: RevisionDocument = fetch_json(client, &url)?;
    Ok(document.name)
}

fn check_revision_segment(selector: &VersionSelector) -> Result<()> {
    let invalid = |reason: String| UpdaterError::InvalidSelector {
        selector: selector.to_string(),
        reason,
    };
    let text = selector.as_str();
    if text.is_empty() {
        return Err(invalid("selector is empty".to_owned()));
    }
    if let Some(bad) = text
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || matches!(*c, '.' | '-' | '_')))
    {
        return Err(invalid(format!("character '{bad}' is not allowed")));
    }
    Ok(())
}

fn join_url(base: &str, path: &str) -> String {
    format!("{}/{path}", base.trim_end_matches('/'))
}
