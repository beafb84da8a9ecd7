//! Summary matrix, dashboard metrics and usage calculation.

use crate::config::ReportConfig;
use crate::error::{RekapError, Result};
use crate::report::model::{FinalStatus, ReportRow};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashSet};

/// Counts per `(kode_produk, tujuan)` and final status.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SummaryMatrix {
    /// Status columns present in the data, in label order
    pub columns: Vec<FinalStatus>,
    pub rows: Vec<MatrixRow>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatrixRow {
    pub kode_produk: String,
    pub tujuan: String,
    /// One count per entry of [`SummaryMatrix::columns`]
    pub counts: Vec<usize>,
}

impl SummaryMatrix {
    pub fn build(rows: &[ReportRow]) -> Self {
        let columns: Vec<FinalStatus> = rows
            .iter()
            .map(|r| r.final_status)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let mut cells: BTreeMap<(&str, &str), BTreeMap<FinalStatus, usize>> = BTreeMap::new();
        for row in rows {
            *cells
                .entry((row.kode_produk.as_str(), row.tujuan.as_str()))
                .or_default()
                .entry(row.final_status)
                .or_default() += 1;
        }

        let rows = cells
            .into_iter()
            .map(|((kode_produk, tujuan), counts)| MatrixRow {
                kode_produk: kode_produk.to_string(),
                tujuan: tujuan.to_string(),
                counts: columns
                    .iter()
                    .map(|c| counts.get(c).copied().unwrap_or(0))
                    .collect(),
            })
            .collect();

        Self { columns, rows }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Headline numbers for a report.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Metrics {
    pub total: usize,
    pub unique_tujuan: usize,
    /// SUKSES PROFIT + SUKSES LOSS
    pub sukses: usize,
    pub gagal: usize,
    pub status_counts: BTreeMap<FinalStatus, usize>,
}

impl Metrics {
    pub fn compute(rows: &[ReportRow]) -> Self {
        let mut status_counts = BTreeMap::new();
        for row in rows {
            *status_counts.entry(row.final_status).or_insert(0) += 1;
        }

        let unique_tujuan = rows
            .iter()
            .map(|r| r.tujuan.as_str())
            .collect::<HashSet<_>>()
            .len();

        let count = |status: FinalStatus| status_counts.get(&status).copied().unwrap_or(0);

        Self {
            total: rows.len(),
            unique_tujuan,
            sukses: count(FinalStatus::SuksesProfit) + count(FinalStatus::SuksesLoss),
            gagal: count(FinalStatus::GagalA1),
            status_counts,
        }
    }

    pub fn count(&self, status: FinalStatus) -> usize {
        self.status_counts.get(&status).copied().unwrap_or(0)
    }
}

/// Reconciliation of balance movement against billed successes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Usage {
    pub harga: i64,
    pub saldo_awal: i64,
    pub saldo_akhir: i64,
    pub total_sukses_profit: usize,
    /// saldo_awal - saldo_akhir
    pub asumsi: i64,
    /// harga * total_sukses_profit
    pub actual: i64,
    /// actual - asumsi
    pub selisih: i64,
}

impl Usage {
    /// Fails when an amount does not fit in `i64`.
    pub fn calculate(input: &ReportConfig, metrics: &Metrics) -> Result<Self> {
        let total_sukses_profit = metrics.count(FinalStatus::SuksesProfit);
        let asumsi = input
            .saldo_awal
            .checked_sub(input.saldo_akhir)
            .ok_or_else(|| overflow("saldo_awal - saldo_akhir"))?;
        let actual = i64::try_from(total_sukses_profit)
            .ok()
            .and_then(|count| input.harga.checked_mul(count))
            .ok_or_else(|| overflow("harga x sukses profit"))?;
        let selisih = actual
            .checked_sub(asumsi)
            .ok_or_else(|| overflow("actual - asumsi"))?;

        Ok(Self {
            harga: input.harga,
            saldo_awal: input.saldo_awal,
            saldo_akhir: input.saldo_akhir,
            total_sukses_profit,
            asumsi,
            actual,
            selisih,
        })
    }

    /// Balance movement matches the billed successes exactly.
    pub fn is_match(&self) -> bool {
        self.selisih == 0
    }
}

fn overflow(what: &str) -> RekapError {
    RekapError::InvalidInput(format!("{} is out of range", what))
}

/// Format an integer with `,` thousands separators.
pub fn format_thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
