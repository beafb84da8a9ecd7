//! Number input, result filtering and export.

use crate::audit::record::{AuditResult, AuditStatus};
use crate::error::Result;
use chrono::Local;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Read phone numbers from text: one per line, first `delimiter`-separated
/// column, trimmed, empties dropped.
pub fn parse_numbers(text: &str, delimiter: char) -> Vec<String> {
    text.lines()
        .filter_map(|line| line.split(delimiter).next())
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .map(String::from)
        .collect()
}

/// Which results to keep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Success,
    Error,
}

impl StatusFilter {
    pub fn matches(self, result: &AuditResult) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Success => result.status.is_success(),
            StatusFilter::Error => !result.status.is_success(),
        }
    }

    pub fn apply(self, results: &[AuditResult]) -> Vec<AuditResult> {
        results.iter().filter(|r| self.matches(r)).cloned().collect()
    }
}

/// Totals shown after an audit run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AuditSummary {
    pub success: usize,
    pub error: usize,
    pub total: usize,
}

impl AuditSummary {
    pub fn from_results(results: &[AuditResult]) -> Self {
        let success = results.iter().filter(|r| r.status.is_success()).count();
        Self {
            success,
            error: results.len() - success,
            total: results.len(),
        }
    }
}

/// `audit_results_YYYYMMDD_HHMMSS.<ext>` for the current local time.
pub fn default_file_name(extension: &str) -> String {
    format!(
        "audit_results_{}.{}",
        Local::now().format("%Y%m%d_%H%M%S"),
        extension
    )
}

/// Write results as pretty JSON. Returns the path written.
pub fn save_json(results: &[AuditResult], path: Option<&Path>) -> Result<PathBuf> {
    let path = path
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(default_file_name("json")));

    let json = serde_json::to_string_pretty(results)?;
    fs::write(&path, json)?;
    Ok(path)
}

/// Flat table row. Failed checks keep their number and carry the error in
/// `balance`, with `ERROR` in the card and package columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportRow {
    pub nomor: String,
    pub kartu: String,
    pub act_kartu: String,
    pub end_kartu: String,
    pub paket: String,
    pub act_paket: String,
    pub end_paket: String,
    pub balance: String,
}

impl From<&AuditResult> for ExportRow {
    fn from(r: &AuditResult) -> Self {
        let text = |v: &Option<String>| v.clone().unwrap_or_default();

        if r.status == AuditStatus::Success {
            Self {
                nomor: r.nomor.clone(),
                kartu: text(&r.kartu),
                act_kartu: text(&r.act_kartu),
                end_kartu: text(&r.end_kartu),
                paket: text(&r.paket),
                act_paket: text(&r.act_paket),
                end_paket: text(&r.end_paket),
                balance: r.balance.clone().unwrap_or_else(|| "0".to_string()),
            }
        } else {
            Self {
                nomor: r.nomor.clone(),
                kartu: "ERROR".to_string(),
                act_kartu: String::new(),
                end_kartu: String::new(),
                paket: "ERROR".to_string(),
                act_paket: String::new(),
                end_paket: String::new(),
                balance: r
                    .error
                    .clone()
                    .unwrap_or_else(|| "Unknown error".to_string()),
            }
        }
    }
}

/// Write results as CSV. Returns the path written.
pub fn save_csv(results: &[AuditResult], path: Option<&Path>) -> Result<PathBuf> {
    let path = path
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(default_file_name("csv")));

    let mut writer = csv::Writer::from_path(&path)?;
    for result in results {
        writer.serialize(ExportRow::from(result))?;
    }
    writer.flush()?;
    Ok(path)
}
