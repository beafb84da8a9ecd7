//! uv command execution.

use crate::error::{RekapError, Result};
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

/// Wrapper for executing uv commands in a project directory.
pub struct UvExecutor {
    executable: PathBuf,
    project_dir: PathBuf,
}

impl UvExecutor {
    /// Create a new executor for the given uv executable and project.
    pub fn new(executable: PathBuf, project_dir: PathBuf) -> Self {
        Self {
            executable,
            project_dir,
        }
    }

    /// Get the path to the uv executable.
    pub fn executable(&self) -> &Path {
        &self.executable
    }

    /// Run `uv --version` and return the reported version line.
    ///
    /// Any failure to spawn or a non-zero exit means uv is not usable.
    pub fn version(&self) -> Result<String> {
        tracing::info!("Executing: {} --version", self.executable.display());

        let output = Command::new(&self.executable)
            .arg("--version")
            .current_dir(&self.project_dir)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .map_err(|e| {
                tracing::debug!("failed to spawn uv: {}", e);
                RekapError::UvNotFound
            })?;

        log_output(&output);

        if !output.status.success() {
            return Err(RekapError::UvNotFound);
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    /// Run `uv sync`, streaming its progress to the console.
    pub fn sync(&self) -> Result<()> {
        tracing::info!(
            "Executing: {} sync (in {})",
            self.executable.display(),
            self.project_dir.display()
        );

        let status = Command::new(&self.executable)
            .arg("sync")
            .current_dir(&self.project_dir)
            .status()
            .map_err(|e| RekapError::SyncFailed(e.to_string()))?;

        if !status.success() {
            return Err(RekapError::SyncFailed(match status.code() {
                Some(code) => format!("exit code {}", code),
                None => "terminated by signal".to_string(),
            }));
        }

        Ok(())
    }
}

fn log_output(output: &Output) {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    if !stdout.is_empty() {
        tracing::debug!("stdout:\n{}", stdout);
    }
    if !stderr.is_empty() {
        tracing::debug!("stderr:\n{}", stderr);
    }
}
