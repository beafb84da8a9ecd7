//! `rekap report` command implementation.

use crate::commands::OutputFormat;
use crate::config::ReportConfig;
use crate::error::Result;
use crate::report::{format_thousands, load_csv_file, Report, ReportQuery, RowFilter};
use chrono::NaiveDate;
use std::path::PathBuf;

/// Arguments for the report command.
pub struct ReportArgs {
    /// CSV export of the transaksi table
    pub input: PathBuf,
    /// Comma-separated product codes
    pub kode_produk: String,
    pub tgl_awal: Option<NaiveDate>,
    pub tgl_akhir: Option<NaiveDate>,
    pub filter: RowFilter,
    pub usage: ReportConfig,
    pub format: OutputFormat,
    /// Also print every labeled row
    pub show_rows: bool,
}

/// Execute the report command.
pub fn execute(args: ReportArgs) -> Result<()> {
    let query = ReportQuery::new(&args.kode_produk).between(args.tgl_awal, args.tgl_akhir);
    let transactions = load_csv_file(&args.input, &query)?;

    if transactions.is_empty() {
        eprintln!(
            "Warning: no data for product code(s): {}",
            args.kode_produk.trim()
        );
        return Ok(());
    }

    let report = Report::build(&query, transactions, &args.filter, &args.usage)?;

    match args.format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        OutputFormat::Text => print_text(&report, args.show_rows),
    }

    Ok(())
}

fn print_text(report: &Report, show_rows: bool) {
    let title = report.title();
    println!("{}", title);
    println!("{}", "=".repeat(title.chars().count()));
    println!();

    let m = &report.metrics;
    println!("Total entries:      {}", m.total);
    println!("Unique tujuan:      {}", m.unique_tujuan);
    println!("Total sukses:       {}", m.sukses);
    println!("Total gagal:        {}", m.gagal);
    for (status, count) in &m.status_counts {
        println!("  {:<16} {}", status.as_str(), count);
    }

    let u = &report.usage;
    println!();
    println!("Usage");
    println!("-----");
    println!("Asumsi pemakaian:   {}  (saldo awal - saldo akhir)", format_thousands(u.asumsi));
    println!(
        "Actual pemakaian:   {}  ({} x {} sukses profit)",
        format_thousands(u.actual),
        format_thousands(u.harga),
        u.total_sukses_profit
    );
    println!("Selisih:            {}", format_thousands(u.selisih));
    println!(
        "Status:             {}",
        if u.is_match() { "Cocok" } else { "Tidak Cocok" }
    );

    println!();
    println!("Summary Matrix");
    println!("--------------");
    if report.matrix.is_empty() {
        println!("(no rows match the filters)");
    } else {
        let mut header = format!("{:<12} {:<16}", "kode_produk", "tujuan");
        for column in &report.matrix.columns {
            header.push_str(&format!(" {:>14}", column.as_str()));
        }
        println!("{}", header);
        for row in &report.matrix.rows {
            let mut line = format!("{:<12} {:<16}", row.kode_produk, row.tujuan);
            for count in &row.counts {
                line.push_str(&format!(" {:>14}", count));
            }
            println!("{}", line);
        }
    }

    if show_rows {
        println!();
        println!("Raw Data");
        println!("--------");
        for row in &report.rows {
            println!(
                "{:<12} {:<16} {:>4} {:<16} {} {} {:<13} {}",
                row.kode_produk,
                row.tujuan,
                row.status,
                row.sn.as_deref().unwrap_or("-"),
                row.tgl_status.map(|d| d.to_string()).unwrap_or_else(|| "-".into()),
                row.jam_status.map(|t| t.to_string()).unwrap_or_else(|| "-".into()),
                row.status_label.as_str(),
                row.final_status.as_str()
            );
        }
    }
}
