//! Operator-facing output lines.

use crate::orchestrator::{CheckOutcome, UpdateOutcome};
use crate::state::MarkerKind;
use std::fmt::Display;
use std::io::Write;

/// Write one line to `stderr`, ignoring write failures.
pub fn write_stderr_line(stderr: &mut dyn Write, message: impl Display) {
    if writeln!(stderr, "{message}").is_err() {
        // Best-effort logging; ignore write failures.
    }
}

/// Describe the outcome of an update run.
///
/// # Examples
///
/// ```
/// use jar_updater::orchestrator::UpdateOutcome;
/// use jar_updater::output::update_message;
///
/// let outcome = UpdateOutcome::UpToDate { version: "1.20.1".to_owned() };
/// assert_eq!(update_message("vanilla", &outcome), "vanilla 1.20.1 is up to date");
/// ```
#[must_use]
pub fn update_message(label: &str, outcome: &UpdateOutcome) -> String {
    match outcome {
        UpdateOutcome::UpToDate { version } => format!("{label} {version} is up to date"),
        UpdateOutcome::Updated {
            previous: Some(previous),
            version,
        } => format!("Updated {label} from {previous} to {version}"),
        UpdateOutcome::Updated {
            previous: None,
            version,
        } => format!("Installed {label} {version}"),
    }
}

/// Describe the outcome of a dry-run check.
#[must_use]
pub fn check_message(label: &str, outcome: &CheckOutcome) -> String {
    match outcome {
        CheckOutcome::UpToDate { version } => format!("{label} {version} is up to date"),
        CheckOutcome::NeedsUpdate {
            installed,
            available,
        } => format!(
            "{label} would update from {} to {available}",
            installed.as_deref().unwrap_or("nothing")
        ),
    }
}

/// Describe one installed marker for the status report.
#[must_use]
pub fn status_line(kind: MarkerKind, value: Option<&str>) -> String {
    match value {
        Some(installed) => format!("{kind}: {}", installed.trim()),
        None => format!("{kind}: not installed"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::fresh(
        UpdateOutcome::Updated { previous: None, version: "1.20.1".to_owned() },
        "Installed vanilla 1.20.1"
    )]
    #[case::upgrade(
        UpdateOutcome::Updated { previous: Some("1.19.4".to_owned()), version: "1.20.1".to_owned() },
        "Updated vanilla from 1.19.4 to 1.20.1"
    )]
    fn update_messages(#[case] outcome: UpdateOutcome, #[case] expected: &str) {
        assert_eq!(update_message("vanilla", &outcome), expected);
    }

    #[test]
    fn check_message_names_both_versions() {
        let outcome = CheckOutcome::NeedsUpdate {
            installed: None,
            available: "4123".to_owned(),
        };
        assert_eq!(
            check_message("spigot", &outcome),
            "spigot would update from nothing to 4123"
        );
    }

    #[test]
    fn status_line_reports_missing_marker() {
        assert_eq!(
            status_line(MarkerKind::SpigotBuild, None),
            "spigot build: not installed"
        );
        assert_eq!(
            status_line(MarkerKind::VanillaVersion, Some("1.20.1")),
            "vanilla version: 1.20.1"
        );
    }

    #[test]
    fn write_stderr_line_appends_newline() {
        let mut buffer = Vec::new();
        write_stderr_line(&mut buffer, "hello");
        assert_eq!(buffer, b"hello\n");
    }
}
