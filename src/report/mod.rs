//! Rekap RGU report: transaction labeling, summary matrix and usage check.

mod filter;
mod model;
mod rules;
mod source;
mod summary;

pub use filter::RowFilter;
pub use model::{FinalStatus, ReportRow, StatusLabel, Transaction};
pub use rules::{final_status, label_transactions, status_label};
pub use source::{load_csv, load_csv_file, parse_kode_list, parse_timestamp, ReportQuery};
pub use summary::{format_thousands, MatrixRow, Metrics, SummaryMatrix, Usage};

use crate::config::ReportConfig;
use crate::error::Result;
use serde::Serialize;

/// A fully computed report.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub kode_list: Vec<String>,
    pub metrics: Metrics,
    pub matrix: SummaryMatrix,
    pub usage: Usage,
    pub rows: Vec<ReportRow>,
}

impl Report {
    /// Label, filter and summarize the loaded transactions.
    pub fn build(
        query: &ReportQuery,
        transactions: Vec<Transaction>,
        filter: &RowFilter,
        usage_input: &ReportConfig,
    ) -> Result<Self> {
        let rows = filter.apply(label_transactions(transactions));
        let metrics = Metrics::compute(&rows);
        let matrix = SummaryMatrix::build(&rows);
        let usage = Usage::calculate(usage_input, &metrics)?;

        Ok(Self {
            kode_list: query.kode_list.clone(),
            metrics,
            matrix,
            usage,
            rows,
        })
    }

    /// Header line, e.g. `Rekap RGU - 2 Produk: mdm, saka`.
    pub fn title(&self) -> String {
        match self.kode_list.as_slice() {
            [] => "Rekap RGU".to_string(),
            [single] => format!("Rekap RGU - Produk: {}", single),
            many => format!("Rekap RGU - {} Produk: {}", many.len(), many.join(", ")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
kode_produk,tujuan,status,sn,tgl_status
mdm,0811,20,SUP001,2024-05-01 08:00:00
mdm,0811,40,,2024-05-01 07:00:00
mdm,0822,20,SUP002,2024-05-01 09:00:00
mdm,0822,20,SUP003,2024-05-01 09:05:00
mdm,0833,20,CHECK1,2024-05-01 10:00:00
mdm,0844,50,,2024-05-01 11:00:00
";

    #[test]
    fn test_build_end_to_end() {
        let query = ReportQuery::new("mdm");
        let txs = load_csv(SAMPLE.as_bytes(), &query).unwrap();
        let report =
            Report::build(&query, txs, &RowFilter::default(), &ReportConfig::default()).unwrap();

        assert_eq!(report.metrics.total, 6);
        assert_eq!(report.metrics.unique_tujuan, 4);
        // 0811 x2 and 0833 are profit, 0822 x2 are loss
        assert_eq!(report.metrics.count(FinalStatus::SuksesProfit), 3);
        assert_eq!(report.metrics.count(FinalStatus::SuksesLoss), 2);
        assert_eq!(report.metrics.gagal, 1);
        assert_eq!(report.matrix.rows.len(), 4);
        assert_eq!(report.usage.actual, 30_000);
    }

    #[test]
    fn test_filter_applies_after_final_status() {
        let query = ReportQuery::new("mdm");
        let txs = load_csv(SAMPLE.as_bytes(), &query).unwrap();
        let filter = RowFilter {
            sn: Some("SUP001".into()),
            ..RowFilter::default()
        };
        let report = Report::build(&query, txs, &filter, &ReportConfig::default()).unwrap();

        // The failed 0811 row is filtered out but the final status was decided
        // with it included.
        assert_eq!(report.rows.len(), 1);
        assert_eq!(report.rows[0].final_status, FinalStatus::SuksesProfit);
    }

    #[test]
    fn test_title() {
        let mk = |kode: &str| {
            Report::build(
                &ReportQuery::new(kode),
                Vec::new(),
                &RowFilter::default(),
                &ReportConfig::default(),
            )
            .unwrap()
        };
        assert_eq!(mk("").title(), "Rekap RGU");
        assert_eq!(mk("mdm").title(), "Rekap RGU - Produk: mdm");
        assert_eq!(mk("mdm, saka").title(), "Rekap RGU - 2 Produk: mdm, saka");
    }
}
