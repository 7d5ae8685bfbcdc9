//! The update lifecycle shared by every source.
//!
//! ```text
//! resolve -> compare with marker -> (up to date) done
//!                                -> (differs) install -> write marker
//! ```
//!
//! The marker is written strictly after a successful install, so a failed
//! or interrupted run is retried in full next time.

use crate::error::Result;
use crate::source::UpdateSource;
use crate::state::StateStore;

/// Result of an update run for one source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// The installed marker already matched upstream; nothing was fetched.
    UpToDate {
        /// The installed identifier.
        version: String,
    },
    /// A new artefact was published and the marker updated.
    Updated {
        /// The previously installed identifier, if any.
        previous: Option<String>,
        /// The newly installed identifier.
        version: String,
    },
}

/// Result of a dry-run check for one source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckOutcome {
    /// No update is needed.
    UpToDate {
        /// The installed identifier.
        version: String,
    },
    /// An update would be installed.
    NeedsUpdate {
        /// The installed identifier, if any.
        installed: Option<String>,
        /// The identifier upstream currently resolves to.
        available: String,
    },
}

/// Drives sources through resolve, compare, install and record.
#[derive(Debug, Clone)]
pub struct UpdateOrchestrator {
    state: StateStore,
}

impl UpdateOrchestrator {
    /// Create an orchestrator recording state in `state`.
    #[must_use]
    pub const fn new(state: StateStore) -> Self {
        Self { state }
    }

    /// Bring `source` up to date.
    ///
    /// # Errors
    ///
    /// Returns the first failure from resolution, installation, or marker
    /// I/O. On error the marker is left as it was.
    pub fn run<S: UpdateSource>(&self, source: &S) -> Result<UpdateOutcome> {
        let resolved = source.resolve()?;
        let installed = self.state.read(source.marker())?;
        if installed.as_deref() == Some(resolved.marker_value.as_str()) {
            log::info!(
                "{} {} is already installed",
                source.label(),
                resolved.marker_value
            );
            return Ok(UpdateOutcome::UpToDate {
                version: resolved.marker_value,
            });
        }

        log::info!(
            "updating {} from {} to {}",
            source.label(),
            installed.as_deref().unwrap_or("nothing"),
            resolved.marker_value
        );
        source.install(resolved.plan)?;
        self.state.write(source.marker(), &resolved.marker_value)?;
        Ok(UpdateOutcome::Updated {
            previous: installed,
            version: resolved.marker_value,
        })
    }

    /// Report whether `source` would be updated, without installing.
    ///
    /// # Errors
    ///
    /// Returns a resolution, transport, or marker read error.
    pub fn check<S: UpdateSource>(&self, source: &S) -> Result<CheckOutcome> {
        let resolved = source.resolve()?;
        let installed = self.state.read(source.marker())?;
        if installed.as_deref() == Some(resolved.marker_value.as_str()) {
            Ok(CheckOutcome::UpToDate {
                version: resolved.marker_value,
            })
        } else {
            Ok(CheckOutcome::NeedsUpdate {
                installed,
                available: resolved.marker_value,
            })
        }
    }
}

#[cfg(test)]
#[path = "orchestrator_tests.rs"]
mod tests;
