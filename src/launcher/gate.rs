//! The ordered precondition gates of a launch.

use crate::error::Result;
use std::fmt;

/// One step of the launch sequence. Each gate is a precondition for the next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Gate {
    /// `uv --version` succeeds
    ToolCheck,
    /// `uv sync` succeeds
    Sync,
    /// The venv activation artifact exists
    VenvCheck,
    /// The server runs until it exits
    Launch,
}

impl Gate {
    /// All gates in execution order.
    pub const SEQUENCE: [Gate; 4] = [Gate::ToolCheck, Gate::Sync, Gate::VenvCheck, Gate::Launch];

    /// 1-based position in the sequence.
    pub fn position(self) -> usize {
        self as usize + 1
    }

    pub fn title(self) -> &'static str {
        match self {
            Gate::ToolCheck => "Checking uv",
            Gate::Sync => "Syncing dependencies",
            Gate::VenvCheck => "Checking virtual environment",
            Gate::Launch => "Starting application",
        }
    }
}

impl fmt::Display for Gate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}/{}] {}",
            self.position(),
            Gate::SEQUENCE.len(),
            self.title()
        )
    }
}

/// The side effects behind each gate.
///
/// [`crate::launcher::SystemToolchain`] runs real processes; tests substitute a
/// recorder to check ordering and short-circuiting.
pub trait Toolchain {
    /// Verify the environment manager is usable. Returns its version string.
    fn check_tool(&mut self) -> Result<String>;

    /// Materialize the venv from the manifest/lockfile.
    fn sync(&mut self) -> Result<()>;

    /// Verify the venv activation artifact exists.
    fn check_venv(&mut self) -> Result<()>;

    /// Run the server in the activated venv, blocking until it exits.
    /// Returns the server's exit code.
    fn serve(&mut self) -> Result<i32>;
}

/// Runs gates in order, stopping at the first failure.
pub struct Launcher<T: Toolchain> {
    toolchain: T,
    last_gate: Gate,
}

impl<T: Toolchain> Launcher<T> {
    /// A launcher that runs every gate, including the server.
    pub fn new(toolchain: T) -> Self {
        Self {
            toolchain,
            last_gate: Gate::Launch,
        }
    }

    /// Stop after `gate` instead of running the whole sequence.
    pub fn stop_after(mut self, gate: Gate) -> Self {
        self.last_gate = gate;
        self
    }

    /// Execute the gates. Returns the server exit code, or 0 when the
    /// sequence stops before [`Gate::Launch`].
    pub fn run(&mut self) -> Result<i32> {
        let mut exit_code = 0;

        for gate in Gate::SEQUENCE {
            if gate > self.last_gate {
                break;
            }

            println!("{}...", gate);
            tracing::debug!(?gate, "entering gate");

            match gate {
                Gate::ToolCheck => {
                    let version = self.toolchain.check_tool()?;
                    println!("      found {}", version);
                }
                Gate::Sync => self.toolchain.sync()?,
                Gate::VenvCheck => self.toolchain.check_venv()?,
                Gate::Launch => exit_code = self.toolchain.serve()?,
            }
        }

        Ok(exit_code)
    }

    /// Give back the toolchain.
    pub fn into_inner(self) -> T {
        self.toolchain
    }
}
