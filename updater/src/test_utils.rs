//! Shared test utilities for the updater crate.

use crate::build::BuildToolRunner;
use crate::checksum::ChecksumAlgorithm;
use crate::download::{DownloadError, HttpClient};
use crate::error::{Result, UpdaterError};
use camino::{Utf8Path, Utf8PathBuf};
use serde_json::json;
use std::cell::RefCell;
use std::collections::HashMap;

/// Lowercase SHA-1 hex digest of `data`.
#[must_use]
pub fn sha1_hex(data: &[u8]) -> String {
    ChecksumAlgorithm::Sha1.hex_digest(data)
}

/// Lowercase MD5 hex digest of `data`.
#[must_use]
pub fn md5_hex(data: &[u8]) -> String {
    ChecksumAlgorithm::Md5.hex_digest(data)
}

/// A launcher manifest with the given aliases and `(id, url)` entries.
#[must_use]
pub fn vanilla_manifest_json(release: &str, snapshot: &str, versions: &[(&str, &str)]) -> String {
    let entries: Vec<_> = versions
        .iter()
        .map(|(id, url)| json!({"id": id, "type": "release", "url": url}))
        .collect();
    json!({
        "latest": {"release": release, "snapshot": snapshot},
        "versions": entries,
    })
    .to_string()
}

/// A per-version document with a server download.
#[must_use]
pub fn vanilla_version_json(server_url: &str, sha1: &str) -> String {
    json!({
        "downloads": {
            "server": {"url": server_url, "sha1": sha1, "size": 0}
        }
    })
    .to_string()
}

/// A Jenkins job document listing `(number, url)` builds, newest first.
#[must_use]
pub fn build_tools_job_json(builds: &[(u64, &str)]) -> String {
    let entries: Vec<_> = builds
        .iter()
        .map(|(number, url)| json!({"number": number, "url": url}))
        .collect();
    json!({"builds": entries}).to_string()
}

/// A deep Jenkins build document recording one artefact.
#[must_use]
pub fn build_tools_build_json(file_name: &str, md5: &str) -> String {
    json!({
        "mavenArtifacts": {
            "moduleRecords": [
                {"mainArtifact": {"fileName": file_name, "md5sum": md5}}
            ]
        }
    })
    .to_string()
}

/// A Spigot revision document.
#[must_use]
pub fn spigot_revision_json(build: &str) -> String {
    json!({"name": build}).to_string()
}

#[derive(Debug, Clone)]
enum Route {
    Text(String),
    Bytes(Vec<u8>),
    NotFound,
}

/// An [`HttpClient`] answering from a URL-keyed table.
///
/// Every request is recorded so tests can assert which URLs were hit.
/// Requests for unknown URLs fail with a transport error.
#[derive(Debug, Default)]
pub struct StubHttpClient {
    routes: RefCell<HashMap<String, Route>>,
    requests: RefCell<Vec<String>>,
}

impl StubHttpClient {
    /// Create a client with no routes.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `body` as text at `url`.
    pub fn serve_text(&self, url: &str, body: impl Into<String>) {
        self.routes
            .borrow_mut()
            .insert(url.to_owned(), Route::Text(body.into()));
    }

    /// Serve `bytes` as a binary payload at `url`.
    pub fn serve_bytes(&self, url: &str, bytes: impl Into<Vec<u8>>) {
        self.routes
            .borrow_mut()
            .insert(url.to_owned(), Route::Bytes(bytes.into()));
    }

    /// Answer 404 at `url`.
    pub fn serve_not_found(&self, url: &str) {
        self.routes
            .borrow_mut()
            .insert(url.to_owned(), Route::NotFound);
    }

    /// URLs requested so far, in order.
    #[must_use]
    pub fn requests(&self) -> Vec<String> {
        self.requests.borrow().clone()
    }

    /// Number of requests made for `url`.
    #[must_use]
    pub fn request_count(&self, url: &str) -> usize {
        self.requests
            .borrow()
            .iter()
            .filter(|requested| requested.as_str() == url)
            .count()
    }

    /// Forget recorded requests, keeping routes.
    pub fn clear_requests(&self) {
        self.requests.borrow_mut().clear();
    }

    fn lookup(&self, url: &str) -> std::result::Result<Route, DownloadError> {
        self.requests.borrow_mut().push(url.to_owned());
        match self.routes.borrow().get(url) {
            Some(Route::NotFound) => Err(DownloadError::NotFound {
                url: url.to_owned(),
            }),
            Some(route) => Ok(route.clone()),
            None => Err(DownloadError::HttpError {
                url: url.to_owned(),
                reason: "no stub registered for URL".to_owned(),
            }),
        }
    }
}

impl HttpClient for StubHttpClient {
    fn get_text(&self, url: &str) -> std::result::Result<String, DownloadError> {
        match self.lookup(url)? {
            Route::Text(body) => Ok(body),
            Route::Bytes(bytes) => Ok(String::from_utf8_lossy(&bytes).into_owned()),
            Route::NotFound => Err(DownloadError::NotFound {
                url: url.to_owned(),
            }),
        }
    }

    fn get_bytes(&self, url: &str) -> std::result::Result<Vec<u8>, DownloadError> {
        match self.lookup(url)? {
            Route::Text(body) => Ok(body.into_bytes()),
            Route::Bytes(bytes) => Ok(bytes),
            Route::NotFound => Err(DownloadError::NotFound {
                url: url.to_owned(),
            }),
        }
    }
}

/// One recorded BuildTools invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildInvocation {
    /// Path of the BuildTools jar passed to the runner.
    pub build_tools: Utf8PathBuf,
    /// Requested revision.
    pub revision: String,
    /// Working directory.
    pub working_dir: Utf8PathBuf,
}

/// A [`BuildToolRunner`] that writes canned output files instead of
/// running Java.
#[derive(Debug, Default)]
pub struct StubBuildRunner {
    outputs: Vec<String>,
    expected_revision: Option<String>,
    failure: Option<String>,
    invocations: RefCell<Vec<BuildInvocation>>,
}

impl StubBuildRunner {
    /// A runner that writes each of `outputs` into the working directory.
    #[must_use]
    pub fn producing(outputs: &[&str]) -> Self {
        Self {
            outputs: outputs.iter().map(|name| (*name).to_owned()).collect(),
            ..Self::default()
        }
    }

    /// A runner that fails with `reason` without writing anything.
    #[must_use]
    pub fn failing(reason: &str) -> Self {
        Self {
            failure: Some(reason.to_owned()),
            ..Self::default()
        }
    }

    /// Reject invocations for any revision other than `revision`.
    #[must_use]
    pub fn expecting_revision(mut self, revision: &str) -> Self {
        self.expected_revision = Some(revision.to_owned());
        self
    }

    /// Invocations recorded so far.
    #[must_use]
    pub fn invocations(&self) -> Vec<BuildInvocation> {
        self.invocations.borrow().clone()
    }
}

impl BuildToolRunner for StubBuildRunner {
    fn run(&self, build_tools: &Utf8Path, revision: &str, working_dir: &Utf8Path) -> Result<()> {
        self.invocations.borrow_mut().push(BuildInvocation {
            build_tools: build_tools.to_owned(),
            revision: revision.to_owned(),
            working_dir: working_dir.to_owned(),
        });
        if let Some(expected) = &self.expected_revision
            && expected != revision
        {
            return Err(UpdaterError::StubMismatch {
                message: format!("expected revision {expected}, got {revision}"),
            });
        }
        if let Some(reason) = &self.failure {
            return Err(UpdaterError::BuildFailed {
                reason: reason.clone(),
            });
        }
        for name in &self.outputs {
            std::fs::write(working_dir.join(name), name.as_bytes())?;
        }
        Ok(())
    }
}
