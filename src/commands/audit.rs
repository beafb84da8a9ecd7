//! `rekap audit` command implementation.

use crate::audit::{
    parse_numbers, save_csv, save_json, AuditQueue, AuditResult, AuditSummary, HttpChecker,
    StatusFilter,
};
use crate::config::AuditConfig;
use crate::error::{RekapError, Result};
use std::path::PathBuf;
use std::thread;
use std::time::Duration;

/// How often progress is polled while the worker runs.
const PROGRESS_POLL: Duration = Duration::from_millis(250);

/// Arguments for the audit command.
pub struct AuditArgs {
    /// Numbers given on the command line
    pub numbers: Vec<String>,
    /// Text file with one number per line
    pub file: Option<PathBuf>,
    /// Column delimiter inside the file
    pub delimiter: char,
    pub config: AuditConfig,
    /// Which results to show and export
    pub status: StatusFilter,
    /// `Some(None)` exports to a timestamped file name
    pub json: Option<Option<PathBuf>>,
    pub csv: Option<Option<PathBuf>>,
}

/// Execute the audit command.
pub fn execute(args: AuditArgs) -> Result<()> {
    let mut numbers: Vec<String> = args
        .numbers
        .iter()
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty())
        .collect();
    if let Some(ref file) = args.file {
        let text = std::fs::read_to_string(file)?;
        numbers.extend(parse_numbers(&text, args.delimiter));
    }
    if numbers.is_empty() {
        return Err(RekapError::InvalidInput(
            "no numbers to audit (pass numbers or --file)".to_string(),
        ));
    }

    let cfg = &args.config;
    println!("Auditing {} number(s) against {}", numbers.len(), cfg.api_url);
    println!(
        "Delay {}s per request, queue capacity {}",
        cfg.delay_seconds, cfg.max_queue
    );
    println!();

    let checker = HttpChecker::new(cfg)?;
    let mut queue = AuditQueue::new(cfg.max_queue, Duration::from_secs(cfg.delay_seconds))?;
    queue.start(checker)?;

    let total = numbers.len();
    let mut printed = 0;
    let mut added = 0;
    for nomor in numbers {
        // A full queue frees a slot after each request; keep offering.
        while !queue.enqueue(nomor.clone()) {
            printed = print_new_results(&queue, printed);
        }
        added += 1;
        printed = print_new_results(&queue, printed);
    }
    tracing::debug!("added {} number(s) to queue", added);

    while queue.stats().completed() < total {
        thread::sleep(PROGRESS_POLL);
        printed = print_new_results(&queue, printed);
    }
    queue.stop();
    print_new_results(&queue, printed);

    let stats = queue.stats();
    println!();
    println!(
        "Processed: {}  Skipped: {}  Errors: {}",
        stats.processed, stats.skipped, stats.errors
    );

    let results = args.status.apply(&queue.results());
    let summary = AuditSummary::from_results(&results);

    println!();
    println!("Audit Results");
    println!("-------------");
    for result in &results {
        print_result(result);
    }
    println!();
    println!("Total sukses:   {}", summary.success);
    println!("Total error:    {}", summary.error);
    println!("Total diproses: {}", summary.total);

    if let Some(ref path) = args.json {
        let written = save_json(&results, path.as_deref())?;
        println!("Results saved to {}", written.display());
    }
    if let Some(ref path) = args.csv {
        let written = save_csv(&results, path.as_deref())?;
        println!("Results saved to {}", written.display());
    }

    Ok(())
}

/// Print results completed since the last call. Returns the new count.
fn print_new_results(queue: &AuditQueue, already_printed: usize) -> usize {
    let results = queue.results();
    for result in results.iter().skip(already_printed) {
        match result.error {
            Some(ref error) => println!("  {} ... {} ({})", result.nomor, result.status, error),
            None => println!("  {} ... {}", result.nomor, result.status),
        }
    }
    results.len()
}

fn print_result(r: &AuditResult) {
    let text = |v: &Option<String>| v.clone().unwrap_or_else(|| "-".to_string());
    if r.status.is_success() {
        println!(
            "{:<14} kartu: {} [{} - {}]  paket: {} [{} - {}]  balance: {}",
            r.nomor,
            text(&r.kartu),
            text(&r.act_kartu),
            text(&r.end_kartu),
            text(&r.paket),
            text(&r.act_paket),
            text(&r.end_paket),
            text(&r.balance)
        );
    } else {
        println!(
            "{:<14} {}: {}",
            r.nomor,
            r.status,
            r.error.as_deref().unwrap_or("Unknown error")
        );
    }
}
