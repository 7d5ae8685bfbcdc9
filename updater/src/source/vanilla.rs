//! Vanilla server jar from the Mojang launcher metadata (direct mode).

use super::{Resolved, UpdateSource};
use crate::config::{Layout, VanillaEndpoints, VersionSelector};
use crate::download::HttpClient;
use crate::error::Result;
use crate::fetcher::fetch_verified;
use crate::metadata::vanilla::{VanillaRequest, VersionEntry, fetch_manifest, fetch_server_download};
use crate::publish::publish_bytes;
use crate::state::MarkerKind;

/// Publishes the official server jar at `server.jar`.
pub struct VanillaServer<'a> {
    client: &'a dyn HttpClient,
    layout: &'a Layout,
    endpoints: &'a VanillaEndpoints,
    request: VanillaRequest,
}

impl<'a> VanillaServer<'a> {
    /// Create the source for `selector`.
    #[must_use]
    pub fn new(
        client: &'a dyn HttpClient,
        layout: &'a Layout,
        endpoints: &'a VanillaEndpoints,
        selector: &VersionSelector,
    ) -> Self {
        Self {
            client,
            layout,
            endpoints,
            request: VanillaRequest::from_selector(selector),
        }
    }
}

impl UpdateSource for VanillaServer<'_> {
    type Plan = VersionEntry;

    fn label(&self) -> &'static str {
        "vanilla"
    }

    fn marker(&self) -> MarkerKind {
        MarkerKind::VanillaVersion
    }

    fn resolve(&self) -> Result<Resolved<VersionEntry>> {
        let manifest = fetch_manifest(self.client, &self.endpoints.manifest_url)?;
        let entry = manifest.resolve(&self.request)?.clone();
        log::debug!("vanilla {:?} resolved to {}", self.request, entry.id);
        Ok(Resolved {
            marker_value: entry.id.clone(),
            plan: entry,
        })
    }

    fn install(&self, plan: VersionEntry) -> Result<()> {
        let descriptor = fetch_server_download(self.client, &plan)?;
        let data = fetch_verified(self.client, &descriptor.url, &descriptor.checksum)?;
        publish_bytes(&self.layout.server_path(), &data)
    }
}
