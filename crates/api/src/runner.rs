//! Process execution seam used by the CLI-backed adapters.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use anyhow::{Context, Result, anyhow, bail};
use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

/// Runs an external program and returns its standard output.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Resolve `program` to an executable path.
    fn resolve(&self, program: &Path) -> Result<PathBuf> {
        which::which(program).with_context(|| format!("'{}' was not found on PATH", program.display()))
    }

    /// Run `program` with `args`. A non-zero exit is an error carrying stderr.
    async fn run(&self, program: &Path, args: &[String]) -> Result<String>;
}

/// [`CommandRunner`] backed by `tokio::process`.
#[derive(Debug, Default, Clone)]
pub struct ProcessRunner;

#[async_trait]
impl CommandRunner for ProcessRunner {
    async fn run(&self, program: &Path, args: &[String]) -> Result<String> {
        debug!(program = %program.display(), ?args, "running command");
        let output = Command::new(program)
            .args(args)
            .env("AWS_PAGER", "")
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await
            .with_context(|| format!("failed to spawn {}", program.display()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let message = stderr.trim();
            if message.is_empty() {
                bail!("{} exited with {}", program.display(), output.status);
            }
            return Err(anyhow!("{message}"));
        }

        String::from_utf8(output.stdout).context("command output was not valid UTF-8")
    }
}
