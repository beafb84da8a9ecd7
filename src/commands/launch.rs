//! `rekap launch` command implementation (also the default with no subcommand).

use crate::config::Config;
use crate::error::Result;
use crate::launcher::{pause, Launcher, ServerCommand, SystemToolchain};
use crate::venv::VenvLayout;
use std::path::{Path, PathBuf};

/// Arguments for the launch command.
pub struct LaunchArgs {
    /// Project directory
    pub path: PathBuf,
    /// uv executable override
    pub uv: Option<PathBuf>,
    pub config: Config,
    /// Wait for Enter after the server exits
    pub pause: bool,
}

/// Execute the launch command. Returns the server's exit code.
pub fn execute(args: LaunchArgs) -> Result<i32> {
    let project_dir = args.path.canonicalize().unwrap_or(args.path.clone());

    println!("Rekap RGU - {}", project_dir.display());
    println!();

    let toolchain = system_toolchain(&project_dir, args.uv, &args.config);
    let code = Launcher::new(toolchain).run()?;

    println!();
    println!("Application stopped (exit code {}).", code);
    pause(args.pause);

    Ok(code)
}

/// Build the process-backed toolchain from configuration.
///
/// The uv override wins over `uv_path` from rekap.toml.
pub fn system_toolchain(project_dir: &Path, uv: Option<PathBuf>, config: &Config) -> SystemToolchain {
    let venv = VenvLayout::in_project(project_dir, &config.venv_dir);
    let server = ServerCommand::new(config.server_module.clone(), config.entry_file.clone())
        .args(config.server_args.clone());

    SystemToolchain::new(
        project_dir.to_path_buf(),
        uv.or_else(|| config.uv_path.clone()),
        venv,
        server,
    )
}
