//! Row filters applied after labeling.

use crate::report::model::{FinalStatus, ReportRow};

/// Narrowing applied to labeled rows. Empty fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowFilter {
    pub final_status: Vec<FinalStatus>,
    /// Case-insensitive substring of `kode_produk`
    pub kode_produk: Option<String>,
    /// Case-insensitive substring of `tujuan`
    pub tujuan: Option<String>,
    /// Case-insensitive substring of `sn`
    pub sn: Option<String>,
}

impl RowFilter {
    pub fn is_empty(&self) -> bool {
        self.final_status.is_empty()
            && self.kode_produk.is_none()
            && self.tujuan.is_none()
            && self.sn.is_none()
    }

    pub fn matches(&self, row: &ReportRow) -> bool {
        if !self.final_status.is_empty() && !self.final_status.contains(&row.final_status) {
            return false;
        }
        if !contains_ci(Some(&row.kode_produk), self.kode_produk.as_deref()) {
            return false;
        }
        if !contains_ci(Some(&row.tujuan), self.tujuan.as_deref()) {
            return false;
        }
        contains_ci(row.sn.as_deref(), self.sn.as_deref())
    }

    /// Keep the rows that match, preserving order.
    pub fn apply(&self, rows: Vec<ReportRow>) -> Vec<ReportRow> {
        if self.is_empty() {
            return rows;
        }
        rows.into_iter().filter(|row| self.matches(row)).collect()
    }
}

/// Substring test; a missing value never matches a non-empty needle.
fn contains_ci(haystack: Option<&str>, needle: Option<&str>) -> bool {
    match needle.map(str::trim) {
        None | Some("") => true,
        Some(needle) => haystack
            .map(|h| h.to_lowercase().contains(&needle.to_lowercase()))
            .unwrap_or(false),
    }
}
