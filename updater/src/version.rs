//! Dotted numeric versions parsed from build output filenames.
//!
//! BuildTools names its output `spigot-<version>.jar`. The version is parsed
//! into integer components so candidates compare numerically: `1.20.10`
//! sorts above `1.20.1`, which sorts above `1.19.4`.

use std::fmt;
use std::str::FromStr;

/// A version made of dot-separated non-negative integers.
///
/// Ordering compares components left to right; when one version is a
/// prefix of the other, the shorter one sorts first (`1.20 < 1.20.0`).
///
/// # Examples
///
/// ```
/// use jar_updater::version::DottedVersion;
///
/// let a: DottedVersion = "1.20.10".parse().expect("numeric");
/// let b: DottedVersion = "1.20.1".parse().expect("numeric");
/// assert!(a > b);
/// assert_eq!(a.to_string(), "1.20.10");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DottedVersion(Vec<u32>);

impl DottedVersion {
    /// The numeric components.
    #[must_use]
    pub fn components(&self) -> &[u32] {
        &self.0
    }
}

/// Error returned when a string is not a dotted numeric version.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("\"{0}\" is not a dotted numeric version")]
pub struct ParseVersionError(String);

impl FromStr for DottedVersion {
    type Err = ParseVersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(ParseVersionError(s.to_owned()));
        }
        s.split('.')
            .map(|part| {
                // `u32::from_str` accepts a leading '+', which is not a version digit.
                if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
                    return Err(ParseVersionError(s.to_owned()));
                }
                part.parse::<u32>()
                    .map_err(|_| ParseVersionError(s.to_owned()))
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Self)
    }
}

impl fmt::Display for DottedVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = self.0.iter();
        if let Some(first) = parts.next() {
            write!(f, "{first}")?;
        }
        for part in parts {
            write!(f, ".{part}")?;
        }
        Ok(())
    }
}

/// Filename shape of a build output: `<prefix><version><suffix>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputPattern {
    prefix: &'static str,
    suffix: &'static str,
}

impl OutputPattern {
    /// Output pattern used by Spigot BuildTools.
    pub const SPIGOT: Self = Self::new("spigot-", ".jar");

    /// Create a pattern.
    #[must_use]
    pub const fn new(prefix: &'static str, suffix: &'static str) -> Self {
        Self { prefix, suffix }
    }

    /// Return true when `file_name` has the pattern's prefix and suffix.
    #[must_use]
    pub fn matches(&self, file_name: &str) -> bool {
        self.version_text(file_name).is_some()
    }

    /// Parse the version out of a matching filename.
    ///
    /// Returns `None` when the name does not match the pattern or the
    /// middle part is not a dotted numeric version.
    #[must_use]
    pub fn parse(&self, file_name: &str) -> Option<DottedVersion> {
        self.version_text(file_name)?.parse().ok()
    }

    /// The filename for `version` under this pattern.
    #[must_use]
    pub fn file_name(&self, version: &str) -> String {
        format!("{}{version}{}", self.prefix, self.suffix)
    }

    fn version_text<'a>(&self, file_name: &'a str) -> Option<&'a str> {
        file_name
            .strip_prefix(self.prefix)?
            .strip_suffix(self.suffix)
    }
}

impl fmt::Display for OutputPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}*{}", self.prefix, self.suffix)
    }
}

/// Pick the highest-versioned filename among `names`.
///
/// Names that do not match `pattern` or carry a non-numeric version are
/// ignored.
///
/// # Examples
///
/// ```
/// use jar_updater::version::{OutputPattern, select_latest};
///
/// let names = ["spigot-1.20.1.jar", "spigot-1.19.4.jar", "spigot-1.20.10.jar"];
/// let (name, version) = select_latest(OutputPattern::SPIGOT, names).expect("candidate");
/// assert_eq!(name, "spigot-1.20.10.jar");
/// assert_eq!(version.to_string(), "1.20.10");
/// ```
pub fn select_latest<I, S>(pattern: OutputPattern, names: I) -> Option<(S, DottedVersion)>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    names
        .into_iter()
        .filter_map(|name| {
            let version = pattern.parse(name.as_ref())?;
            Some((name, version))
        })
        .max_by(|(_, a), (_, b)| a.cmp(b))
}
