//! Labeling rules.

use crate::report::model::{
    FinalStatus, ReportRow, StatusLabel, Transaction, STATUS_SUCCESS, VALID_SN_PREFIX,
};
use std::collections::HashMap;

/// Label a single transaction.
pub fn status_label(tx: &Transaction) -> StatusLabel {
    if tx.status != STATUS_SUCCESS {
        return StatusLabel::Gagal;
    }
    match tx.sn.as_deref() {
        Some(sn) if sn.starts_with(VALID_SN_PREFIX) => StatusLabel::SuksesValid,
        _ => StatusLabel::SuksesWait,
    }
}

/// Final status for a destination given its label counts.
///
/// - exactly one VALID: profit
/// - more than one VALID: loss (double inject)
/// - no VALID, at least one WAIT: profit
/// - nothing successful: GAGAL A1
pub fn final_status(valid: usize, wait: usize) -> FinalStatus {
    match (valid, wait) {
        (1, _) => FinalStatus::SuksesProfit,
        (v, _) if v > 1 => FinalStatus::SuksesLoss,
        (0, w) if w > 0 => FinalStatus::SuksesProfit,
        _ => FinalStatus::GagalA1,
    }
}

#[derive(Default)]
struct Counts {
    valid: usize,
    wait: usize,
}

/// Label every transaction and assign the per-`tujuan` final status.
///
/// Input order is preserved.
pub fn label_transactions(transactions: Vec<Transaction>) -> Vec<ReportRow> {
    let labels: Vec<StatusLabel> = transactions.iter().map(status_label).collect();

    let mut per_tujuan: HashMap<&str, Counts> = HashMap::new();
    for (tx, label) in transactions.iter().zip(&labels) {
        let counts = per_tujuan.entry(tx.tujuan.as_str()).or_default();
        match label {
            StatusLabel::SuksesValid => counts.valid += 1,
            StatusLabel::SuksesWait => counts.wait += 1,
            StatusLabel::Gagal => {}
        }
    }

    let finals: HashMap<String, FinalStatus> = per_tujuan
        .into_iter()
        .map(|(tujuan, c)| (tujuan.to_string(), final_status(c.valid, c.wait)))
        .collect();

    transactions
        .into_iter()
        .zip(labels)
        .map(|(tx, status_label)| {
            let final_status = finals
                .get(&tx.tujuan)
                .copied()
                .unwrap_or(FinalStatus::GagalA1);
            ReportRow {
                tgl_status: tx.tgl_status.map(|ts| ts.date()),
                jam_status: tx.tgl_status.map(|ts| ts.time()),
                kode_produk: tx.kode_produk,
                tujuan: tx.tujuan,
                status: tx.status,
                sn: tx.sn,
                status_label,
                final_status,
            }
        })
        .collect()
}
