//! `rekap check` command implementation.

use crate::commands::launch::system_toolchain;
use crate::config::Config;
use crate::error::Result;
use crate::launcher::{Gate, Launcher};
use std::path::PathBuf;

/// Arguments for the check command.
pub struct CheckArgs {
    pub path: PathBuf,
    pub uv: Option<PathBuf>,
    pub config: Config,
}

/// Run every gate except the launch itself.
pub fn execute(args: CheckArgs) -> Result<()> {
    let project_dir = args.path.canonicalize().unwrap_or(args.path.clone());

    let toolchain = system_toolchain(&project_dir, args.uv, &args.config);
    Launcher::new(toolchain).stop_after(Gate::VenvCheck).run()?;

    println!();
    println!("Environment ready. Run 'rekap' to start the application.");
    Ok(())
}
