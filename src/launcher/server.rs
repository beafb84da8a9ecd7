//! Web-application server process.

use crate::venv::VenvLayout;
use std::path::{Path, PathBuf};
use std::process::Command;

/// How to start the app server: `<module> run <entry file> [args...]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerCommand {
    pub module: String,
    pub entry_file: PathBuf,
    pub args: Vec<String>,
}

impl ServerCommand {
    pub fn new(module: impl Into<String>, entry_file: impl Into<PathBuf>) -> Self {
        Self {
            module: module.into(),
            entry_file: entry_file.into(),
            args: Vec::new(),
        }
    }

    /// Append extra server arguments.
    pub fn args(mut self, args: Vec<String>) -> Self {
        self.args = args;
        self
    }

    /// The program to execute: the venv's copy if installed, otherwise the bare
    /// name, resolved through the activated `PATH`.
    pub fn program(&self, venv: &VenvLayout) -> PathBuf {
        let installed = venv.executable(&self.module);
        if installed.is_file() {
            installed
        } else {
            PathBuf::from(&self.module)
        }
    }

    /// Arguments after the program name.
    pub fn argv(&self) -> Vec<String> {
        let mut argv = vec![
            "run".to_string(),
            self.entry_file.to_string_lossy().to_string(),
        ];
        argv.extend(self.args.iter().cloned());
        argv
    }

    /// Build the process in the project directory with the venv activated.
    pub fn build(&self, venv: &VenvLayout, project_dir: &Path) -> Command {
        let mut cmd = Command::new(self.program(venv));
        cmd.args(self.argv()).current_dir(project_dir);
        venv.activate(&mut cmd);
        cmd
    }

    /// Human-readable command line for status output.
    pub fn display(&self) -> String {
        format!("{} {}", self.module, self.argv().join(" "))
    }
}
