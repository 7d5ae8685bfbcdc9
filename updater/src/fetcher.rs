//! Checksum-verified artefact download.
//!
//! The whole payload is held in memory and verified before the caller sees
//! it, so nothing unverified ever reaches a published path.

use crate::checksum::ChecksumRecord;
use crate::download::HttpClient;
use crate::error::{Result, UpdaterError};

/// Download `url` and verify it against `checksum`.
///
/// A mismatch is never retried: it indicates a corrupted or compromised
/// upstream rather than a transient fault.
///
/// # Errors
///
/// Returns [`UpdaterError::Download`] on transport failure and
/// [`UpdaterError::ChecksumMismatch`] when the digest differs.
pub fn fetch_verified(
    client: &dyn HttpClient,
    url: &str,
    checksum: &ChecksumRecord,
) -> Result<Vec<u8>> {
    let data = client.get_bytes(url)?;
    if !checksum.matches(&data) {
        return Err(UpdaterError::ChecksumMismatch {
            url: url.to_owned(),
            algorithm: checksum.algorithm(),
            expected: checksum.expected().to_owned(),
            actual: checksum.algorithm().hex_digest(&data),
        });
    }
    log::debug!("verified {} digest for {url}", checksum.algorithm());
    Ok(data)
}
