//! Jar updater library.
//!
//! Keeps a Minecraft server jar at a well-known path current with an
//! upstream source. Vanilla jars are downloaded from Mojang and verified by
//! SHA-1; Spigot is compiled locally with BuildTools, whose own jar is kept
//! current from Jenkins and verified by MD5. The `jar-updater` binary is a
//! thin wrapper over this crate.
//!
//! # Modules
//!
//! - [`build`] - BuildTools subprocess with a time limit
//! - [`checksum`] - Digest algorithms and validated checksum records
//! - [`cli`] - Command-line argument definitions
//! - [`commands`] - Flows behind each subcommand
//! - [`config`] - Root layout, selectors, endpoints, and run configuration
//! - [`download`] - HTTP client abstraction
//! - [`error`] - Error types and failure classes
//! - [`fetcher`] - Checksum-verified downloads
//! - [`lock`] - Per-root run lock
//! - [`metadata`] - Typed upstream metadata documents
//! - [`orchestrator`] - Resolve, compare, install, record
//! - [`output`] - Operator-facing messages
//! - [`publish`] - Atomic replacement of published paths
//! - [`source`] - Vanilla and Spigot update sources
//! - [`state`] - Installed-state marker files
//! - [`version`] - Dotted numeric versions of build outputs

pub mod build;
pub mod checksum;
pub mod cli;
pub mod commands;
pub mod config;
pub mod download;
pub mod error;
pub mod fetcher;
pub mod lock;
pub mod metadata;
pub mod orchestrator;
pub mod output;
pub mod publish;
pub mod source;
pub mod state;
pub mod version;

#[cfg(any(test, feature = "test-support"))]
pub mod test_utils;
