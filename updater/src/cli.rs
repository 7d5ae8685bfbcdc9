//! CLI argument definitions for the jar updater.
//!
//! Every option can also come from the environment, matching how the
//! container images configure the updater.

use crate::config::{
    DEFAULT_BUILD_TIMEOUT, DEFAULT_HTTP_TIMEOUT, DEFAULT_ROOT, Layout, SpigotEndpoints,
    UpdaterConfig, VanillaEndpoints, VersionSelector,
};
use camino::Utf8PathBuf;
use clap::{Args, Parser, Subcommand};
use std::time::Duration;

/// Keep a Minecraft server jar up to date.
#[derive(Parser, Debug)]
#[command(name = "jar-updater")]
#[command(version, about)]
#[command(long_about = concat!(
    "Keep a Minecraft server jar up to date.\n\n",
    "The vanilla source downloads the official server jar from Mojang and ",
    "verifies its SHA-1. The spigot source keeps the BuildTools jar current, ",
    "compiles Spigot with it, and links server.jar to the newest build output.\n\n",
    "Each source records what it installed in a marker file under the root; ",
    "when upstream still resolves to the same identifier nothing is fetched.",
))]
#[command(after_help = concat!(
    "EXAMPLES:\n",
    "  Install or update the latest vanilla release:\n",
    "    $ jar-updater vanilla\n\n",
    "  Pin a specific vanilla version:\n",
    "    $ jar-updater vanilla --version 1.20.1\n\n",
    "  Build the latest Spigot into a custom root:\n",
    "    $ jar-updater --root /srv/minecraft spigot\n\n",
    "  Check for updates without changing anything:\n",
    "    $ jar-updater --dry-run vanilla\n\n",
    "  Show what is installed:\n",
    "    $ jar-updater status",
))]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Command,

    /// Options shared by every subcommand.
    #[command(flatten)]
    pub global: GlobalArgs,
}

/// Options shared by every subcommand.
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Server root holding the published jar and markers.
    #[arg(long, env = "SERVER_ROOT", value_name = "DIR", default_value = DEFAULT_ROOT, global = true)]
    pub root: Utf8PathBuf,

    /// Per-request HTTP timeout in seconds.
    #[arg(long, value_name = "SECS", default_value_t = DEFAULT_HTTP_TIMEOUT.as_secs(), global = true)]
    pub http_timeout: u64,

    /// Resolve and report what would change without installing anything.
    #[arg(long, global = true)]
    pub dry_run: bool,

    /// Increase log verbosity (repeatable: -v, -vv).
    #[arg(
        short,
        long = "verbose",
        action = clap::ArgAction::Count,
        conflicts_with = "quiet",
        global = true
    )]
    pub verbosity: u8,

    /// Suppress progress output (errors still shown).
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

/// Available subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Update the vanilla server jar.
    Vanilla(VanillaArgs),

    /// Update BuildTools, then build and link Spigot.
    Spigot(SpigotArgs),

    /// Show installed markers.
    Status,
}

/// Arguments for the vanilla command.
#[derive(Args, Debug, Clone)]
pub struct VanillaArgs {
    /// Version to install: `release`, `snapshot`, `latest`, or an id.
    #[arg(long = "version", env = "MINECRAFT_VERSION", value_name = "SEL", default_value = "release")]
    pub selector: String,

    /// Launcher version manifest URL.
    #[arg(long, value_name = "URL", default_value = crate::config::VANILLA_MANIFEST_URL)]
    pub manifest_url: String,
}

/// Arguments for the spigot command.
#[derive(Args, Debug, Clone)]
pub struct SpigotArgs {
    /// Spigot revision to build: `latest` or a version such as `1.20.1`.
    #[arg(long = "version", env = "SPIGOT_VERSION", value_name = "SEL", default_value = VersionSelector::LATEST)]
    pub selector: String,

    /// Java launcher used to run BuildTools.
    #[arg(long, env = "JAVA", value_name = "PATH", default_value = "java")]
    pub java: Utf8PathBuf,

    /// Upper bound for one BuildTools run, in seconds.
    #[arg(long, value_name = "SECS", default_value_t = DEFAULT_BUILD_TIMEOUT.as_secs())]
    pub build_timeout: u64,

    /// Jenkins job publishing BuildTools.
    #[arg(long, value_name = "URL", default_value = crate::config::BUILD_TOOLS_JOB_URL)]
    pub build_tools_url: String,

    /// Base URL of Spigot revision documents.
    #[arg(long, value_name = "URL", default_value = crate::config::SPIGOT_VERSIONS_URL)]
    pub versions_url: String,
}

impl Cli {
    /// Build the run configuration for the selected subcommand.
    #[must_use]
    pub fn updater_config(&self) -> UpdaterConfig {
        let selector = match &self.command {
            Command::Vanilla(args) => VersionSelector::new(&args.selector),
            Command::Spigot(args) => VersionSelector::new(&args.selector),
            Command::Status => VersionSelector::default(),
        };
        UpdaterConfig {
            layout: Layout::new(self.global.root.clone()),
            selector,
            http_timeout: Duration::from_secs(self.global.http_timeout),
        }
    }
}

impl VanillaArgs {
    /// Endpoints selected on the command line.
    #[must_use]
    pub fn endpoints(&self) -> VanillaEndpoints {
        VanillaEndpoints {
            manifest_url: self.manifest_url.clone(),
        }
    }
}

impl SpigotArgs {
    /// Endpoints selected on the command line.
    #[must_use]
    pub fn endpoints(&self) -> SpigotEndpoints {
        SpigotEndpoints {
            build_tools_job_url: self.build_tools_url.clone(),
            versions_url: self.versions_url.clone(),
            ..SpigotEndpoints::default()
        }
    }

    /// BuildTools time limit.
    #[must_use]
    pub const fn build_timeout(&self) -> Duration {
        Duration::from_secs(self.build_timeout)
    }
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
