//! Loading transactions from a CSV export of the `transaksi` table.

use crate::error::{RekapError, Result};
use crate::report::model::Transaction;
use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde::Deserialize;
use std::io::Read;
use std::path::Path;

/// Which transactions to load.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportQuery {
    /// Product codes to include
    pub kode_list: Vec<String>,
    /// Inclusive start date
    pub tgl_awal: Option<NaiveDate>,
    /// Inclusive end date (the whole day is included)
    pub tgl_akhir: Option<NaiveDate>,
}

impl ReportQuery {
    /// Build a query from a comma-separated product list such as `"mdm, saka"`.
    pub fn new(kode_produk: &str) -> Self {
        Self {
            kode_list: parse_kode_list(kode_produk),
            ..Self::default()
        }
    }

    pub fn between(mut self, tgl_awal: Option<NaiveDate>, tgl_akhir: Option<NaiveDate>) -> Self {
        self.tgl_awal = tgl_awal;
        self.tgl_akhir = tgl_akhir;
        self
    }

    /// Whether a transaction falls inside the query.
    pub fn matches(&self, tx: &Transaction) -> bool {
        self.includes_kode(&tx.kode_produk) && self.in_range(tx.tgl_status)
    }

    pub fn includes_kode(&self, kode_produk: &str) -> bool {
        self.kode_list.iter().any(|k| k == kode_produk)
    }

    /// A row without a timestamp only passes when no date bound is set.
    pub fn in_range(&self, tgl_status: Option<NaiveDateTime>) -> bool {
        if self.tgl_awal.is_none() && self.tgl_akhir.is_none() {
            return true;
        }
        let Some(ts) = tgl_status else {
            return false;
        };
        if let Some(awal) = self.tgl_awal {
            if ts < start_of(awal) {
                return false;
            }
        }
        if let Some(akhir) = self.tgl_akhir {
            if ts >= start_of(akhir) + Duration::days(1) {
                return false;
            }
        }
        true
    }
}

fn start_of(date: NaiveDate) -> NaiveDateTime {
    date.and_time(chrono::NaiveTime::MIN)
}

/// Split a comma-separated product list, trimming entries and dropping empties.
pub fn parse_kode_list(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .map(String::from)
        .collect()
}

/// Parse `YYYY-MM-DD HH:MM:SS[.fff]`, `YYYY-MM-DDTHH:MM:SS` or a bare date.
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    const FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M"];

    FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .ok()
                .map(start_of)
        })
}

#[derive(Debug, Deserialize)]
struct CsvRow {
    kode_produk: String,
    tujuan: String,
    status: String,
    sn: Option<String>,
    tgl_status: Option<String>,
}

fn invalid_field(line: usize, field: &str, value: &str) -> RekapError {
    RekapError::InvalidInput(format!("line {}: invalid {} '{}'", line, field, value))
}

/// Read every transaction from CSV matching the query.
///
/// An empty product list selects nothing.
pub fn load_csv<R: Read>(reader: R, query: &ReportQuery) -> Result<Vec<Transaction>> {
    if query.kode_list.is_empty() {
        return Ok(Vec::new());
    }

    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut transactions = Vec::new();
    for (index, record) in csv_reader.deserialize::<CsvRow>().enumerate() {
        let row = record?;
        // Rows of other products are never parsed further.
        if !query.includes_kode(&row.kode_produk) {
            continue;
        }

        // Header is line 1
        let line = index + 2;
        let status = row
            .status
            .parse::<i64>()
            .map_err(|_| invalid_field(line, "status", &row.status))?;
        let tgl_status = match row.tgl_status.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(value) => {
                Some(parse_timestamp(value).ok_or_else(|| invalid_field(line, "tgl_status", value))?)
            }
        };

        if query.in_range(tgl_status) {
            transactions.push(Transaction {
                kode_produk: row.kode_produk,
                tujuan: row.tujuan,
                status,
                sn: row.sn.filter(|sn| !sn.is_empty()),
                tgl_status,
            });
        }
    }

    tracing::debug!(
        "loaded {} transaction(s) for {:?}",
        transactions.len(),
        query.kode_list
    );
    Ok(transactions)
}

/// Read transactions from a CSV file.
pub fn load_csv_file(path: &Path, query: &ReportQuery) -> Result<Vec<Transaction>> {
    let file = std::fs::File::open(path)?;
    load_csv(file, query)
}
