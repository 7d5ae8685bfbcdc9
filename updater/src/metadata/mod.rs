//! Typed upstream metadata and version resolution.
//!
//! Each upstream document is decoded into an explicit record with `serde`.
//! A document that is not valid JSON or lacks a required field is reported
//! as [`UpdaterError::InvalidMetadata`], and one that answers 404 as
//! [`UpdaterError::MetadataNotFound`]. Both are resolution failures rather
//! than raw lookup or transport errors.
//!
//! - [`vanilla`] — Mojang launcher manifest and per-version documents.
//! - [`spigot`] — Jenkins BuildTools job and Spigot revision documents.

pub mod spigot;
pub mod vanilla;

use crate::checksum::ChecksumRecord;
use crate::download::{DownloadError, HttpClient};
use crate::error::{Result, UpdaterError};
use serde::de::DeserializeOwned;

/// A concrete artefact ready to download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactDescriptor {
    /// Download URL.
    pub url: String,
    /// Checksum published alongside the artefact.
    pub checksum: ChecksumRecord,
}

/// Fetch `url` and decode it as `T`.
///
/// # Errors
///
/// Returns [`UpdaterError::MetadataNotFound`] when the document answers 404,
/// [`UpdaterError::Download`] on any other transport failure, and
/// [`UpdaterError::InvalidMetadata`] when the body does not decode.
pub fn fetch_json<T: DeserializeOwned>(client: &dyn HttpClient, url: &str) -> Result<T> {
    let body = client.get_text(url).map_err(|err| match err {
        DownloadError::NotFound { url: missing } => {
            UpdaterError::MetadataNotFound { url: missing }
        }
        other => UpdaterError::Download(other),
    })?;
    decode_json(url, &body)
}

/// Decode `body`, attributing failures to `url`.
///
/// # Errors
///
/// Returns [`UpdaterError::InvalidMetadata`] when the body does not decode.
pub fn decode_json<T: DeserializeOwned>(url: &str, body: &str) -> Result<T> {
    serde_json::from_str(body).map_err(|e| UpdaterError::InvalidMetadata {
        url: url.to_owned(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::download::MockHttpClient;
    use crate::error::FailureKind;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Named {
        name: String,
    }

    #[test]
    fn decode_reports_url_on_shape_mismatch() {
        let err = decode_json::<Named>("https://example.test/doc.json", r#"{"title":"x"}"#)
            .expect_err("missing field");
        match err {
            UpdaterError::InvalidMetadata { url, reason } => {
                assert_eq!(url, "https://example.test/doc.json");
                assert!(reason.contains("name"));
            }
            other => panic!("expected InvalidMetadata, got {other:?}"),
        }
    }

    #[test]
    fn missing_document_is_metadata_not_found() {
        let mut client = MockHttpClient::new();
        client.expect_get_text().returning(|url| {
            Err(DownloadError::NotFound {
                url: url.to_owned(),
            })
        });

        let err = fetch_json::<Named>(&client, "https://example.test/0.0.1.json")
            .expect_err("404");
        assert!(matches!(
            err,
            UpdaterError::MetadataNotFound { ref url } if url == "https://example.test/0.0.1.json"
        ));
        assert_eq!(err.kind(), FailureKind::Resolution);
    }

    #[test]
    fn server_error_stays_a_transport_failure() {
        let mut client = MockHttpClient::new();
        client.expect_get_text().returning(|url| {
            Err(DownloadError::HttpError {
                url: url.to_owned(),
                reason: "503".to_owned(),
            })
        });

        let err = fetch_json::<Named>(&client, "https://example.test/doc.json")
            .expect_err("503");
        assert_eq!(err.kind(), FailureKind::Transport);
    }

    #[test]
    fn decode_accepts_extra_fields() {
        let named: Named = decode_json("u", r#"{"name":"4123","refs":{}}"#).expect("decodes");
        assert_eq!(named.name, "4123");
    }
}
