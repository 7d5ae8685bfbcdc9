//! Running Spigot BuildTools.
//!
//! BuildTools is a Java program that clones and compiles Spigot into the
//! working directory. It can take many minutes and may hang on network
//! trouble, so each run is bounded by a timeout after which the child is
//! killed.

use crate::error::{Result, UpdaterError};
use camino::{Utf8Path, Utf8PathBuf};
use std::process::{Command, Stdio};
use std::time::Duration;
use wait_timeout::ChildExt;

/// Abstraction over invoking the external build tool.
#[cfg_attr(test, mockall::automock)]
pub trait BuildToolRunner {
    /// Build `revision` with the BuildTools jar at `build_tools`, writing
    /// outputs into `working_dir`.
    ///
    /// # Errors
    ///
    /// Returns [`UpdaterError::BuildFailed`] when the tool cannot be
    /// started, exits unsuccessfully, or exceeds its time limit.
    fn run(&self, build_tools: &Utf8Path, revision: &str, working_dir: &Utf8Path) -> Result<()>;
}

/// Runs BuildTools as `<java> -jar <build_tools> --rev <revision>`.
#[derive(Debug, Clone)]
pub struct JavaBuildTools {
    java: Utf8PathBuf,
    timeout: Duration,
}

impl JavaBuildTools {
    /// Create a runner using the given Java launcher and time limit.
    #[must_use]
    pub fn new(java: impl Into<Utf8PathBuf>, timeout: Duration) -> Self {
        Self {
            java: java.into(),
            timeout,
        }
    }

    fn command(&self, build_tools: &Utf8Path, revision: &str, working_dir: &Utf8Path) -> Command {
        let mut cmd = Command::new(self.java.as_std_path());
        cmd.arg("-jar")
            .arg(build_tools.as_std_path())
            .args(["--rev", revision])
            .current_dir(working_dir.as_std_path())
            .stdin(Stdio::null());
        cmd
    }
}

impl BuildToolRunner for JavaBuildTools {
    fn run(&self, build_tools: &Utf8Path, revision: &str, working_dir: &Utf8Path) -> Result<()> {
        log::info!("running BuildTools for revision {revision} in {working_dir}");
        let cmd = self.command(build_tools, revision, working_dir);
        supervise(cmd, self.timeout)
    }
}

/// Spawn `cmd` and wait at most `timeout` for it to exit successfully.
///
/// Output is inherited so the build log streams to the operator.
fn supervise(mut cmd: Command, timeout: Duration) -> Result<()> {
    let program = cmd.get_program().to_string_lossy().into_owned();
    let mut child = cmd.spawn().map_err(|e| UpdaterError::BuildFailed {
        reason: format!("failed to start {program}: {e}"),
    })?;

    match child.wait_timeout(timeout)? {
        Some(status) if status.success() => Ok(()),
        Some(status) => Err(UpdaterError::BuildFailed {
            reason: format!("{program} exited with {status}"),
        }),
        None => {
            if let Err(e) = child.kill() {
                log::warn!("failed to kill timed-out build: {e}");
            }
            if let Err(e) = child.wait() {
                log::warn!("failed to reap timed-out build: {e}");
            }
            Err(UpdaterError::BuildFailed {
                reason: format!("timed out after {} seconds", timeout.as_secs()),
            })
        }
    }
}
