//! Publishing verified artefacts to their well-known paths.
//!
//! A well-known path is only ever replaced by a rename within its own
//! directory, so readers observe either the previous complete artefact or
//! the new one, never a partial write and never a missing path.

use crate::error::{Result, UpdaterError};
use crate::version::{DottedVersion, OutputPattern, select_latest};
use camino::{Utf8Path, Utf8PathBuf};
use std::fs::Permissions;
use std::io::{self, Write};
use tempfile::NamedTempFile;

/// A build output chosen for publishing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildOutput {
    /// Absolute path to the output file.
    pub path: Utf8PathBuf,
    /// Version parsed from the filename.
    pub version: DottedVersion,
}

/// Mode given to a newly published file on Unix.
#[cfg(unix)]
pub const DEFAULT_FILE_MODE: u32 = 0o644;

/// Replace `path` with `contents` via a temporary file in the same directory.
///
/// The replacement keeps the permissions of the file it replaces. A new
/// file gets [`DEFAULT_FILE_MODE`] on Unix rather than the owner-only mode
/// of the temporary file.
///
/// # Errors
///
/// Returns any I/O error from creating, writing, syncing, or renaming the
/// temporary file.
pub fn replace_file(path: &Utf8Path, contents: &[u8]) -> io::Result<()> {
    let parent = parent_dir(path)?;
    let permissions = published_permissions(path)?;
    let mut temp = NamedTempFile::new_in(parent)?;
    temp.write_all(contents)?;
    temp.flush()?;
    if let Some(permissions) = permissions {
        temp.as_file().set_permissions(permissions)?;
    }
    temp.as_file().sync_all()?;
    temp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

fn published_permissions(path: &Utf8Path) -> io::Result<Option<Permissions>> {
    match std::fs::metadata(path) {
        Ok(metadata) => Ok(Some(metadata.permissions())),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(default_permissions()),
        Err(e) => Err(e),
    }
}

#[cfg(unix)]
fn default_permissions() -> Option<Permissions> {
    use std::os::unix::fs::PermissionsExt;
    Some(Permissions::from_mode(DEFAULT_FILE_MODE))
}

#[cfg(not(unix))]
const fn default_permissions() -> Option<Permissions> {
    None
}

/// Publish verified bytes at `destination` (direct mode).
///
/// # Errors
///
/// Returns [`UpdaterError::Publish`] if the file cannot be replaced.
pub fn publish_bytes(destination: &Utf8Path, contents: &[u8]) -> Result<()> {
    log::debug!("publishing {} bytes to {destination}", contents.len());
    replace_file(destination, contents).map_err(|source| UpdaterError::Publish {
        path: destination.to_owned(),
        source,
    })
}

/// Find the build output in `directory` to publish.
///
/// With `requested` set, the output whose version equals it is chosen;
/// otherwise the highest version wins.
///
/// # Errors
///
/// Returns [`UpdaterError::MissingArtifact`] when no file matches
/// `pattern`, [`UpdaterError::RequestedBuildMissing`] when outputs exist but
/// none for the requested version, or an I/O error if the directory cannot
/// be listed.
pub fn discover_output(
    directory: &Utf8Path,
    pattern: OutputPattern,
    requested: Option<&DottedVersion>,
) -> Result<BuildOutput> {
    let names = list_file_names(directory)?;
    for name in names.iter().filter(|name| pattern.matches(name)) {
        if pattern.parse(name).is_none() {
            log::warn!("ignoring build output with non-numeric version: {name}");
        }
    }

    let selected = match requested {
        Some(wanted) => names
            .iter()
            .find_map(|name| {
                let version = pattern.parse(name)?;
                (&version == wanted).then(|| (name.as_str(), version))
            })
            .ok_or_else(|| missing(directory, pattern, &names, Some(wanted))),
        None => select_latest(pattern, names.iter().map(String::as_str))
            .ok_or_else(|| missing(directory, pattern, &names, None)),
    }?;

    let (name, version) = selected;
    log::debug!("selected build output {name} ({version})");
    Ok(BuildOutput {
        path: directory.join(name),
        version,
    })
}

fn missing(
    directory: &Utf8Path,
    pattern: OutputPattern,
    names: &[String],
    wanted: Option<&DottedVersion>,
) -> UpdaterError {
    let any_output = names.iter().any(|name| pattern.parse(name).is_some());
    match wanted {
        Some(version) if any_output => UpdaterError::RequestedBuildMissing {
            revision: version.to_string(),
            directory: directory.to_owned(),
        },
        _ => UpdaterError::MissingArtifact {
            pattern: pattern.to_string(),
            directory: directory.to_owned(),
        },
    }
}

fn list_file_names(directory: &Utf8Path) -> Result<Vec<String>> {
    let mut names = Vec::new();
    for item in directory.read_dir_utf8()? {
        let entry = item?;
        if entry.file_type()?.is_file() {
            names.push(entry.file_name().to_owned());
        }
    }
    Ok(names)
}

/// Point the symbolic link at `link` to `target`.
///
/// The new link is created under a temporary name beside `link` and renamed
/// over it, so `link` always resolves to either the old or the new target.
///
/// # Errors
///
/// Returns [`UpdaterError::Publish`] if the link cannot be created or
/// renamed into place.
pub fn repoint_link(link: &Utf8Path, target: &Utf8Path) -> Result<()> {
    let publish_err = |source: io::Error| UpdaterError::Publish {
        path: link.to_owned(),
        source,
    };
    let staging = staging_link_path(link).map_err(publish_err)?;
    match std::fs::symlink_metadata(&staging) {
        Ok(_) => std::fs::remove_file(&staging).map_err(publish_err)?,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => return Err(publish_err(e)),
    }
    create_symlink(target, &staging).map_err(publish_err)?;
    if let Err(source) = std::fs::rename(&staging, link) {
        // Leave no stray link behind; the original is untouched.
        if std::fs::remove_file(&staging).is_err() {
            log::warn!("could not remove staging link {staging}");
        }
        return Err(publish_err(source));
    }
    log::debug!("linked {link} -> {target}");
    Ok(())
}

fn staging_link_path(link: &Utf8Path) -> io::Result<Utf8PathBuf> {
    let parent = parent_dir(link)?;
    let name = link
        .file_name()
        .ok_or_else(|| io::Error::other(format!("{link} has no file name")))?;
    Ok(parent.join(format!(".{name}.next")))
}

fn parent_dir(path: &Utf8Path) -> io::Result<&Utf8Path> {
    match path.parent() {
        Some(parent) if parent.as_str().is_empty() => Ok(Utf8Path::new(".")),
        Some(parent) => Ok(parent),
        None => Err(io::Error::other(format!("{path} has no parent directory"))),
    }
}

#[cfg(unix)]
fn create_symlink(target: &Utf8Path, link: &Utf8Path) -> io::Result<()> {
    std::os::unix::fs::symlink(target, link)
}

#[cfg(windows)]
fn create_symlink(target: &Utf8Path, link: &Utf8Path) -> io::Result<()> {
    std::os::windows::fs::symlink_file(target, link)
}
