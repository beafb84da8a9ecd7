//! Environment bootstrap and app launch.
//!
//! A launch is four gates run in order: uv is installed, `uv sync` succeeds,
//! the venv exists, and the server runs. The first failing gate ends the run.

mod console;
mod gate;
mod server;
mod system;

pub use console::pause;
pub use gate::{Gate, Launcher, Toolchain};
pub use server::ServerCommand;
pub use system::SystemToolchain;
