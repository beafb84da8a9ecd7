//! Transaction records and status labels.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Transaction status code meaning the supplier accepted the request.
pub const STATUS_SUCCESS: i64 = 20;

/// SN prefix of a directly confirmed success.
pub const VALID_SN_PREFIX: &str = "SUP";

/// One row of the `transaksi` export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    pub kode_produk: String,
    pub tujuan: String,
    pub status: i64,
    pub sn: Option<String>,
    /// `None` when the export has no timestamp for the row
    pub tgl_status: Option<NaiveDateTime>,
}

/// Per-row label from status code and SN.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum StatusLabel {
    #[serde(rename = "GAGAL")]
    Gagal,
    #[serde(rename = "SUKSES VALID")]
    SuksesValid,
    #[serde(rename = "SUKSES WAIT")]
    SuksesWait,
}

impl StatusLabel {
    pub fn as_str(self) -> &'static str {
        match self {
            StatusLabel::Gagal => "GAGAL",
            StatusLabel::SuksesValid => "SUKSES VALID",
            StatusLabel::SuksesWait => "SUKSES WAIT",
        }
    }
}

impl fmt::Display for StatusLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome for a destination, shared by all of its rows.
///
/// Variants are declared in label order so sorted output matches the labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum FinalStatus {
    #[serde(rename = "GAGAL A1")]
    GagalA1,
    #[serde(rename = "SUKSES LOSS")]
    SuksesLoss,
    #[serde(rename = "SUKSES PROFIT")]
    SuksesProfit,
}

impl FinalStatus {
    pub const ALL: [FinalStatus; 3] = [
        FinalStatus::SuksesProfit,
        FinalStatus::SuksesLoss,
        FinalStatus::GagalA1,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            FinalStatus::GagalA1 => "GAGAL A1",
            FinalStatus::SuksesLoss => "SUKSES LOSS",
            FinalStatus::SuksesProfit => "SUKSES PROFIT",
        }
    }

    /// Parse a label, case-insensitively, accepting `-`/`_` for spaces.
    pub fn parse(s: &str) -> Option<Self> {
        let normalized = s.trim().to_uppercase().replace(['-', '_'], " ");
        Self::ALL.into_iter().find(|st| st.as_str() == normalized)
    }

    pub fn is_success(self) -> bool {
        matches!(self, FinalStatus::SuksesProfit | FinalStatus::SuksesLoss)
    }
}

impl fmt::Display for FinalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A transaction after labeling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportRow {
    pub kode_produk: String,
    pub tujuan: String,
    pub status: i64,
    pub sn: Option<String>,
    pub tgl_status: Option<NaiveDate>,
    pub jam_status: Option<NaiveTime>,
    pub status_label: StatusLabel,
    pub final_status: FinalStatus,
}
