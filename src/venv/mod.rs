//! Virtual environment handling.
//!
//! uv creates the venv during `uv sync`; rekap only locates it and activates
//! it for the server process.

mod layout;

pub use layout::VenvLayout;
