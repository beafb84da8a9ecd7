//! Rekap RGU - launcher and reporting CLI
//!
//! Prepares the uv-managed environment of the Rekap RGU Streamlit app and
//! starts it, and offers the app's report and audit logic on the command line.

pub mod audit;
pub mod commands;
pub mod config;
pub mod error;
pub mod launcher;
pub mod logging;
pub mod pages;
pub mod report;
pub mod uv;
pub mod venv;

pub use config::Config;
pub use error::{RekapError, Result};
