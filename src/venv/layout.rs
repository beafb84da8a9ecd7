//! Virtual environment layout and activation.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Directory holding scripts and executables inside a venv.
#[cfg(windows)]
const SCRIPTS_DIR: &str = "Scripts";

#[cfg(not(windows))]
const SCRIPTS_DIR: &str = "bin";

/// Activation script written by `uv sync` / `python -m venv`.
#[cfg(windows)]
const ACTIVATE_SCRIPT: &str = "activate.bat";

#[cfg(not(windows))]
const ACTIVATE_SCRIPT: &str = "activate";

/// Paths of a virtual environment rooted at a directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VenvLayout {
    root: PathBuf,
}

impl VenvLayout {
    /// Create a layout for the venv at `root`.
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// Resolve `venv_dir` against a project directory unless it is absolute.
    pub fn in_project(project_dir: &Path, venv_dir: &Path) -> Self {
        if venv_dir.is_absolute() {
            Self::new(venv_dir.to_path_buf())
        } else {
            Self::new(project_dir.join(venv_dir))
        }
    }

    /// Get the venv root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// `bin/` on Unix, `Scripts\` on Windows.
    pub fn scripts_dir(&self) -> PathBuf {
        self.root.join(SCRIPTS_DIR)
    }

    /// The activation artifact whose presence marks a usable venv.
    pub fn activation_script(&self) -> PathBuf {
        self.scripts_dir().join(ACTIVATE_SCRIPT)
    }

    /// Whether the activation artifact exists on disk.
    pub fn is_present(&self) -> bool {
        self.activation_script().is_file()
    }

    /// Path of an executable installed into the venv.
    pub fn executable(&self, name: &str) -> PathBuf {
        let path = self.scripts_dir().join(name);
        if cfg!(windows) && path.extension().is_none() {
            path.with_extension("exe")
        } else {
            path
        }
    }

    /// `PATH` with the venv's scripts directory in front.
    pub fn activated_path(&self, current: Option<OsString>) -> OsString {
        let mut entries = vec![self.scripts_dir()];
        if let Some(current) = current {
            entries.extend(std::env::split_paths(&current));
        }
        // Entries come from split_paths, so they never contain the separator.
        std::env::join_paths(entries).unwrap_or_else(|_| self.scripts_dir().into_os_string())
    }

    /// Apply what the activation script does to a child process environment.
    pub fn activate(&self, cmd: &mut Command) {
        cmd.env("VIRTUAL_ENV", &self.root)
            .env("PATH", self.activated_path(std::env::var_os("PATH")))
            .env_remove("PYTHONHOME");
    }
}
