//! Package-status audit of phone numbers.
//!
//! Numbers go through a bounded queue drained by one worker thread that calls
//! the package-status API and waits a fixed delay between requests.

mod checker;
mod export;
mod queue;
mod record;

pub use checker::{HttpChecker, NumberChecker};
pub use export::{
    default_file_name, parse_numbers, save_csv, save_json, AuditSummary, ExportRow, StatusFilter,
};
pub use queue::{AuditQueue, QueueStats, ENQUEUE_TIMEOUT};
pub use record::{normalize_msisdn, parse_api_response, AuditResult, AuditStatus};
