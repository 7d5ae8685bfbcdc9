//! Update sources.
//!
//! A source knows how to turn the configured selector into a concrete
//! identifier (resolution) and how to put the matching artefact in place
//! (installation). The orchestrator compares the resolved identifier with
//! the installed marker and only installs on a difference.

pub mod spigot;
pub mod vanilla;

use crate::error::Result;
use crate::state::MarkerKind;

pub use spigot::{BuildToolsJar, SpigotServer};
pub use vanilla::VanillaServer;

/// The outcome of resolving a source against upstream metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved<P> {
    /// Identifier recorded in the marker once installed.
    pub marker_value: String,
    /// Whatever the source needs to install without re-resolving.
    pub plan: P,
}

/// A source of a published artefact.
pub trait UpdateSource {
    /// State carried from resolution into installation.
    type Plan;

    /// Short name used in log and status lines.
    fn label(&self) -> &'static str;

    /// Marker that records what this source last installed.
    fn marker(&self) -> MarkerKind;

    /// Resolve the selector to a concrete identifier.
    ///
    /// Resolution only fetches metadata; it never downloads artefacts or
    /// touches the filesystem.
    ///
    /// # Errors
    ///
    /// Returns a resolution or transport error.
    fn resolve(&self) -> Result<Resolved<Self::Plan>>;

    /// Fetch, verify, and publish the artefact described by `plan`.
    ///
    /// # Errors
    ///
    /// Returns any failure from fetching, verification, building, or
    /// publishing. A failed install leaves the published path untouched.
    fn install(&self, plan: Self::Plan) -> Result<()>;
}
