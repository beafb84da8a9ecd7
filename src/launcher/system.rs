//! Toolchain backed by real processes and the filesystem.

use crate::error::{RekapError, Result};
use crate::launcher::gate::Toolchain;
use crate::launcher::server::ServerCommand;
use crate::uv::{find_uv, UvExecutor};
use crate::venv::VenvLayout;
use std::path::PathBuf;

/// Runs uv, checks the venv on disk and spawns the server.
pub struct SystemToolchain {
    project_dir: PathBuf,
    uv_override: Option<PathBuf>,
    venv: VenvLayout,
    server: ServerCommand,
    uv: Option<UvExecutor>,
}

impl SystemToolchain {
    pub fn new(
        project_dir: PathBuf,
        uv_override: Option<PathBuf>,
        venv: VenvLayout,
        server: ServerCommand,
    ) -> Self {
        Self {
            project_dir,
            uv_override,
            venv,
            server,
            uv: None,
        }
    }

    pub fn venv(&self) -> &VenvLayout {
        &self.venv
    }

    /// The executor resolved by the tool check.
    fn executor(&self) -> Result<&UvExecutor> {
        self.uv.as_ref().ok_or(RekapError::UvNotFound)
    }
}

impl Toolchain for SystemToolchain {
    fn check_tool(&mut self) -> Result<String> {
        // Resolved afresh on every run so a re-run never reuses stale state.
        self.uv = None;

        let executable = match self.uv_override.clone() {
            Some(path) => path,
            None => find_uv().ok_or(RekapError::UvNotFound)?,
        };

        let executor = UvExecutor::new(executable, self.project_dir.clone());
        let version = executor.version()?;
        tracing::info!("using {} at {}", version, executor.executable().display());
        self.uv = Some(executor);
        Ok(version)
    }

    fn sync(&mut self) -> Result<()> {
        self.executor()?.sync()
    }

    fn check_venv(&mut self) -> Result<()> {
        let script = self.venv.activation_script();
        tracing::debug!("looking for {}", script.display());
        if self.venv.is_present() {
            Ok(())
        } else {
            Err(RekapError::VenvMissing(script))
        }
    }

    fn serve(&mut self) -> Result<i32> {
        let entry = self.project_dir.join(&self.server.entry_file);
        if !entry.exists() {
            tracing::warn!("entry file {} does not exist", entry.display());
        }

        println!("      {}", self.server.display());
        let mut cmd = self.server.build(&self.venv, &self.project_dir);
        tracing::info!("Executing: {:?}", cmd);

        let status = cmd.status().map_err(|source| RekapError::LaunchFailed {
            program: cmd.get_program().to_string_lossy().to_string(),
            source,
        })?;
        Ok(status.code().unwrap_or(1))
    }
}
