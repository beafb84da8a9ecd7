//! Diagnostic logging setup.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Verbosity levels for diagnostics.
/// - 0: warnings only
/// - 1: info (-v, show commands)
/// - 2: debug (-vv)
/// - 3+: trace (-vvv)
pub type Verbosity = u8;

/// Default filter directive for a verbosity level.
pub fn filter_directive(verbosity: Verbosity) -> &'static str {
    match verbosity {
        0 => "rekap=warn",
        1 => "rekap=info",
        2 => "rekap=debug",
        _ => "rekap=trace",
    }
}

/// Install the stderr logger. `RUST_LOG` takes precedence over `-v`.
pub fn init_cli_logger(verbosity: Verbosity) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_directive(verbosity)));

    // try_init: a second call (tests, embedding) keeps the first subscriber.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        )
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_directive_levels() {
        assert_eq!(filter_directive(0), "rekap=warn");
        assert_eq!(filter_directive(1), "rekap=info");
        assert_eq!(filter_directive(2), "rekap=debug");
        assert_eq!(filter_directive(3), "rekap=trace");
        assert_eq!(filter_directive(9), "rekap=trace");
    }
}
