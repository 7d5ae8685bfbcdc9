//! Top-level flows behind each subcommand.
//!
//! Updating flows take the per-root [`RunLock`] first; dry runs and the
//! status report are read-only and skip it.

use crate::build::BuildToolRunner;
use crate::config::{Layout, SpigotEndpoints, VanillaEndpoints, VersionSelector};
use crate::download::HttpClient;
use crate::error::Result;
use crate::lock::RunLock;
use crate::orchestrator::UpdateOrchestrator;
use crate::output::{check_message, status_line, update_message, write_stderr_line};
use crate::source::{BuildToolsJar, SpigotServer, UpdateSource, VanillaServer};
use crate::state::{MarkerKind, StateStore};
use std::io::Write;

/// Shared inputs for one invocation.
pub struct UpdateContext<'a> {
    /// Filesystem layout of the server root.
    pub layout: &'a Layout,
    /// HTTP client for metadata and artefacts.
    pub client: &'a dyn HttpClient,
    /// Suppress progress lines.
    pub quiet: bool,
    /// Resolve and report only.
    pub dry_run: bool,
}

impl UpdateContext<'_> {
    /// Update the vanilla server jar.
    ///
    /// # Errors
    ///
    /// Returns the first failure; see [`UpdateOrchestrator::run`].
    pub fn vanilla(
        &self,
        endpoints: &VanillaEndpoints,
        selector: &VersionSelector,
        stderr: &mut dyn Write,
    ) -> Result<()> {
        let source = VanillaServer::new(self.client, self.layout, endpoints, selector);
        let _lock = self.lock()?;
        self.apply(&source, stderr)
    }

    /// Update the BuildTools jar, then build and link Spigot.
    ///
    /// BuildTools is brought current first so the build always runs with
    /// the newest tool. A BuildTools failure aborts before building.
    ///
    /// # Errors
    ///
    /// Returns the first failure from either stage.
    pub fn spigot(
        &self,
        endpoints: &SpigotEndpoints,
        runner: &dyn BuildToolRunner,
        selector: VersionSelector,
        stderr: &mut dyn Write,
    ) -> Result<()> {
        let tools = BuildToolsJar::new(self.client, self.layout, endpoints);
        let server = SpigotServer::new(self.client, runner, self.layout, endpoints, selector);
        let _lock = self.lock()?;
        self.apply(&tools, stderr)?;
        self.apply(&server, stderr)
    }

    fn lock(&self) -> Result<Option<RunLock>> {
        if self.dry_run {
            return Ok(None);
        }
        RunLock::acquire(self.layout).map(Some)
    }

    fn apply<S: UpdateSource>(&self, source: &S, stderr: &mut dyn Write) -> Result<()> {
        let orchestrator = UpdateOrchestrator::new(StateStore::new(self.layout.clone()));
        let message = if self.dry_run {
            check_message(source.label(), &orchestrator.check(source)?)
        } else {
            update_message(source.label(), &orchestrator.run(source)?)
        };
        if !self.quiet {
            write_stderr_line(stderr, message);
        }
        Ok(())
    }
}

/// Write one line per marker to `out`.
///
/// # Errors
///
/// Returns [`crate::error::UpdaterError::Marker`] if a marker exists but
/// cannot be read.
pub fn report_status(layout: &Layout, out: &mut dyn Write) -> Result<()> {
    let state = StateStore::new(layout.clone());
    write_stderr_line(out, format!("root: {}", layout.root()));
    for kind in MarkerKind::ALL {
        let value = state.read(kind)?;
        write_stderr_line(out, status_line(kind, value.as_deref()));
    }
    Ok(())
}
