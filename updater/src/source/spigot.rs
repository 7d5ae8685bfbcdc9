//! Spigot: the BuildTools jar (direct mode) and the Spigot server built
//! from it (build mode).

use super::{Resolved, UpdateSource};
use crate::build::BuildToolRunner;
use crate::config::{Layout, SpigotEndpoints, VersionSelector};
use crate::download::HttpClient;
use crate::error::{Result, UpdaterError};
use crate::fetcher::fetch_verified;
use crate::metadata::spigot::{BuildRef, build_artifact, latest_build, revision_build};
use crate::publish::{discover_output, publish_bytes, repoint_link};
use crate::state::MarkerKind;
use crate::version::{DottedVersion, OutputPattern};
use camino::{Utf8Path, Utf8PathBuf};

/// Publishes the newest BuildTools jar at `build-tools.jar`.
pub struct BuildToolsJar<'a> {
    client: &'a dyn HttpClient,
    layout: &'a Layout,
    endpoints: &'a SpigotEndpoints,
}

impl<'a> BuildToolsJar<'a> {
    /// Create the source.
    #[must_use]
    pub const fn new(
        client: &'a dyn HttpClient,
        layout: &'a Layout,
        endpoints: &'a SpigotEndpoints,
    ) -> Self {
        Self {
            client,
            layout,
            endpoints,
        }
    }
}

impl UpdateSource for BuildToolsJar<'_> {
    type Plan = BuildRef;

    fn label(&self) -> &'static str {
        "build tools"
    }

    fn marker(&self) -> MarkerKind {
        MarkerKind::BuildToolsBuild
    }

    fn resolve(&self) -> Result<Resolved<BuildRef>> {
        let build = latest_build(self.client, &self.endpoints.build_tools_job_url)?;
        Ok(Resolved {
            marker_value: build.build_number(),
            plan: build,
        })
    }

    fn install(&self, plan: BuildRef) -> Result<()> {
        let descriptor = build_artifact(self.client, &plan, &self.endpoints.build_tools_artifact)?;
        let data = fetch_verified(self.client, &descriptor.url, &descriptor.checksum)?;
        publish_bytes(&self.layout.build_tools_path(), &data)
    }
}

/// Builds Spigot with BuildTools and links `server.jar` to the output.
pub struct SpigotServer<'a> {
    client: &'a dyn HttpClient,
    runner: &'a dyn BuildToolRunner,
    layout: &'a Layout,
    endpoints: &'a SpigotEndpoints,
    selector: VersionSelector,
}

impl<'a> SpigotServer<'a> {
    /// Create the source for `selector`.
    #[must_use]
    pub const fn new(
        client: &'a dyn HttpClient,
        runner: &'a dyn BuildToolRunner,
        layout: &'a Layout,
        endpoints: &'a SpigotEndpoints,
        selector: VersionSelector,
    ) -> Self {
        Self {
            client,
            runner,
            layout,
            endpoints,
            selector,
        }
    }

    /// Choose the build output `server.jar` should point at.
    ///
    /// `latest` takes the highest numeric version present. An explicit
    /// revision takes exactly `spigot-<revision>.jar`.
    fn select_output(&self) -> Result<Utf8PathBuf> {
        let root = self.layout.root();
        let pattern = OutputPattern::SPIGOT;
        if self.selector.is_latest() {
            return discover_output(root, pattern, None).map(|output| output.path);
        }
        if let Ok(wanted) = self.selector.as_str().parse::<DottedVersion>() {
            return discover_output(root, pattern, Some(&wanted)).map(|output| output.path);
        }
        let path = root.join(pattern.file_name(self.selector.as_str()));
        if path.is_file() {
            Ok(path)
        } else {
            Err(UpdaterError::RequestedBuildMissing {
                revision: self.selector.to_string(),
                directory: root.to_owned(),
            })
        }
    }
}

impl UpdateSource for SpigotServer<'_> {
    type Plan = ();

    fn label(&self) -> &'static str {
        "spigot"
    }

    fn marker(&self) -> MarkerKind {
        MarkerKind::SpigotBuild
    }

    fn resolve(&self) -> Result<Resolved<()>> {
        let build = revision_build(self.client, &self.endpoints.versions_url, &self.selector)?;
        log::debug!("spigot revision {} is build {build}", self.selector);
        Ok(Resolved {
            marker_value: build,
            plan: (),
        })
    }

    fn install(&self, (): ()) -> Result<()> {
        let root = self.layout.root();
        self.runner
            .run(&self.layout.build_tools_path(), self.selector.as_str(), root)?;
        let output = self.select_output()?;
        // Link by bare file name so the root can be relocated.
        let target = output
            .file_name()
            .map_or(output.as_path(), Utf8Path::new);
        repoint_link(&self.layout.server_path(), target)
    }
}
