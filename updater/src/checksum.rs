//! Checksum records taken from trusted metadata.
//!
//! A [`ChecksumRecord`] pairs a digest algorithm with the expected
//! hex-encoded digest. Records are only ever built from upstream metadata,
//! never from the artefact being verified.

use crate::error::{Result, UpdaterError};
use md5::Md5;
use sha1::Sha1;
use sha2::{Digest, Sha256};
use std::fmt;

/// Digest algorithms published by the supported upstreams.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChecksumAlgorithm {
    /// SHA-1, used by the Mojang version documents.
    Sha1,
    /// MD5, used by the Jenkins module records.
    Md5,
    /// SHA-256.
    Sha256,
}

impl ChecksumAlgorithm {
    /// Length of a hex-encoded digest for this algorithm.
    #[must_use]
    pub const fn hex_len(self) -> usize {
        match self {
            Self::Md5 => 32,
            Self::Sha1 => 40,
            Self::Sha256 => 64,
        }
    }

    /// Compute the lowercase hex digest of `data`.
    #[must_use]
    pub fn hex_digest(self, data: &[u8]) -> String {
        match self {
            Self::Sha1 => format!("{:x}", Sha1::digest(data)),
            Self::Md5 => format!("{:x}", Md5::digest(data)),
            Self::Sha256 => format!("{:x}", Sha256::digest(data)),
        }
    }
}

impl fmt::Display for ChecksumAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Sha1 => "sha1",
            Self::Md5 => "md5",
            Self::Sha256 => "sha256",
        };
        f.write_str(name)
    }
}

/// An expected digest together with the algorithm that produced it.
///
/// # Examples
///
/// ```
/// use jar_updater::checksum::{ChecksumAlgorithm, ChecksumRecord};
///
/// let record = ChecksumRecord::new(ChecksumAlgorithm::Md5, "D41D8CD98F00B204E9800998ECF8427E")
///     .expect("valid md5");
/// assert_eq!(record.expected(), "d41d8cd98f00b204e9800998ecf8427e");
/// assert!(record.matches(b""));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ChecksumRecord {
    algorithm: ChecksumAlgorithm,
    expected: String,
}

impl ChecksumRecord {
    /// Build a record, validating length and hex alphabet.
    ///
    /// Upper-case digests are normalised to lower case.
    ///
    /// # Errors
    ///
    /// Returns [`UpdaterError::InvalidChecksum`] when the digest has the
    /// wrong length for `algorithm` or contains non-hex characters.
    pub fn new(algorithm: ChecksumAlgorithm, expected: &str) -> Result<Self> {
        let invalid = |reason: String| UpdaterError::InvalidChecksum {
            algorithm,
            value: expected.to_owned(),
            reason,
        };
        if expected.len() != algorithm.hex_len() {
            return Err(invalid(format!(
                "expected {} hex characters, got {}",
                algorithm.hex_len(),
                expected.len()
            )));
        }
        if let Some(bad) = expected.chars().find(|c| !c.is_ascii_hexdigit()) {
            return Err(invalid(format!("non-hex character '{bad}'")));
        }
        Ok(Self {
            algorithm,
            expected: expected.to_ascii_lowercase(),
        })
    }

    /// The digest algorithm.
    #[must_use]
    pub const fn algorithm(&self) -> ChecksumAlgorithm {
        self.algorithm
    }

    /// The expected lowercase hex digest.
    #[must_use]
    pub fn expected(&self) -> &str {
        &self.expected
    }

    /// Return true when `data` hashes to the expected digest.
    #[must_use]
    pub fn matches(&self, data: &[u8]) -> bool {
        self.algorithm.hex_digest(data) == self.expected
    }
}

impl fmt::Display for ChecksumRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.algorithm, self.expected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::sha1(ChecksumAlgorithm::Sha1, "a9993e364706816aba3e25717850c26c9cd0d89d")]
    #[case::md5(ChecksumAlgorithm::Md5, "900150983cd24fb0d6963f7d28e17f72")]
    #[case::sha256(
        ChecksumAlgorithm::Sha256,
        "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
    )]
    fn hex_digest_matches_known_vectors(#[case] algorithm: ChecksumAlgorithm, #[case] hex: &str) {
        assert_eq!(algorithm.hex_digest(b"abc"), hex);
    }

    #[test]
    fn rejects_wrong_length() {
        let err = ChecksumRecord::new(ChecksumAlgorithm::Sha1, "abcdef").expect_err("too short");
        assert!(matches!(err, UpdaterError::InvalidChecksum { .. }));
    }

    #[test]
    fn rejects_non_hex() {
        let mut bad = "a".repeat(31);
        bad.push('z');
        let err = ChecksumRecord::new(ChecksumAlgorithm::Md5, &bad).expect_err("non-hex");
        assert!(err.to_string().contains("non-hex"));
    }

    #[test]
    fn mismatching_payload_does_not_match() {
        let record = ChecksumRecord::new(
            ChecksumAlgorithm::Sha1,
            "a9993e364706816aba3e25717850c26c9cd0d89d",
        )
        .expect("valid");
        assert!(record.matches(b"abc"));
        assert!(!record.matches(b"abd"));
    }
}
