//! Command implementations.

pub mod audit;
pub mod check;
pub mod info;
pub mod launch;
pub mod pages;
pub mod report;

/// Output format for listings and reports.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}
