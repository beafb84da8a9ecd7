//! Rekap CLI entry point.

use chrono::NaiveDate;
use clap::{Args, CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use rekap::audit::StatusFilter;
use rekap::commands::{self, audit, check, info, launch, pages, report};
use rekap::config::Config;
use rekap::error::Result;
use rekap::launcher::pause;
use rekap::logging::init_cli_logger;
use rekap::report::{FinalStatus, RowFilter};
use std::io;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "rekap")]
#[command(about = "Rekap RGU launcher and reporting CLI")]
#[command(version)]
#[command(author)]
struct Cli {
    /// Without a subcommand, the app in the current directory is launched
    #[command(subcommand)]
    command: Option<Command>,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to the uv executable (overrides auto-detection)
    #[arg(long, global = true, env = "REKAP_UV")]
    uv: Option<PathBuf>,

    /// Do not wait for Enter before exiting
    #[arg(long, global = true, env = "REKAP_NO_PAUSE")]
    no_pause: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Sync the environment and start the Streamlit app (default)
    Launch {
        /// Project directory
        #[arg(default_value = ".")]
        path: PathBuf,
    },

    /// Verify uv, sync dependencies and check the virtual environment
    Check {
        /// Project directory
        #[arg(default_value = ".")]
        path: PathBuf,
    },

    /// Show project, environment and page information
    Info {
        /// Project directory
        #[arg(default_value = ".")]
        path: PathBuf,
    },

    /// List the app's pages
    Pages {
        /// Project directory
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Build the RGU recap from a transaksi CSV export
    ///
    /// Defaults for harga and saldo come from the [report] section of the
    /// rekap.toml found in the current directory or its parents.
    Report(ReportCli),

    /// Check phone numbers against the package-status API
    ///
    /// API settings come from the [audit] section of the rekap.toml found in
    /// the current directory or its parents.
    Audit(AuditCli),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Args)]
struct ReportCli {
    /// CSV file with columns kode_produk,tujuan,status,sn,tgl_status
    input: PathBuf,

    /// Product codes, comma-separated
    #[arg(short, long)]
    kode: String,

    /// First day (YYYY-MM-DD)
    #[arg(long)]
    from: Option<NaiveDate>,

    /// Last day, inclusive (YYYY-MM-DD)
    #[arg(long)]
    to: Option<NaiveDate>,

    /// Keep only these final statuses (comma-separated)
    #[arg(long, value_delimiter = ',', value_parser = parse_final_status)]
    status: Vec<FinalStatus>,

    /// Filter on kode_produk (substring)
    #[arg(long)]
    filter_kode: Option<String>,

    /// Filter on tujuan (substring)
    #[arg(long)]
    filter_tujuan: Option<String>,

    /// Filter on sn (substring)
    #[arg(long)]
    filter_sn: Option<String>,

    /// Product price
    #[arg(long)]
    harga: Option<i64>,

    /// Opening balance
    #[arg(long)]
    saldo_awal: Option<i64>,

    /// Closing balance
    #[arg(long)]
    saldo_akhir: Option<i64>,

    /// Print every labeled row
    #[arg(long)]
    rows: bool,

    /// Output format
    #[arg(short, long, default_value = "text")]
    format: OutputFormat,
}

#[derive(Args)]
struct AuditCli {
    /// Phone numbers to check
    numbers: Vec<String>,

    /// Read numbers from a file (first column of each line)
    #[arg(long)]
    file: Option<PathBuf>,

    /// Column delimiter for --file
    #[arg(long, default_value_t = ',')]
    delimiter: char,

    /// Package-status endpoint
    #[arg(long)]
    api_url: Option<String>,

    /// API username
    #[arg(long)]
    username: Option<String>,

    /// Seconds to wait after each number
    #[arg(long)]
    delay: Option<u64>,

    /// Queue capacity
    #[arg(long)]
    max_queue: Option<usize>,

    /// Request timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// Which results to show and export
    #[arg(long, default_value = "all")]
    status: ResultFilter,

    /// Export results as JSON (default: audit_results_<timestamp>.json)
    #[arg(long, value_name = "FILE", require_equals = true)]
    json: Option<Option<PathBuf>>,

    /// Export results as CSV (default: audit_results_<timestamp>.csv)
    #[arg(long, value_name = "FILE", require_equals = true)]
    csv: Option<Option<PathBuf>>,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

impl From<OutputFormat> for commands::OutputFormat {
    fn from(f: OutputFormat) -> Self {
        match f {
            OutputFormat::Text => commands::OutputFormat::Text,
            OutputFormat::Json => commands::OutputFormat::Json,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum ResultFilter {
    All,
    Success,
    Error,
}

impl From<ResultFilter> for StatusFilter {
    fn from(f: ResultFilter) -> Self {
        match f {
            ResultFilter::All => StatusFilter::All,
            ResultFilter::Success => StatusFilter::Success,
            ResultFilter::Error => StatusFilter::Error,
        }
    }
}

fn parse_final_status(s: &str) -> std::result::Result<FinalStatus, String> {
    FinalStatus::parse(s).ok_or_else(|| {
        format!(
            "unknown status '{}' (expected one of: sukses-profit, sukses-loss, gagal-a1)",
            s
        )
    })
}

fn main() {
    let cli = Cli::parse();
    init_cli_logger(cli.verbose);

    let mut pause_on_error = false;
    let code = match run_cli(cli, &mut pause_on_error) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {}", e);
            if e.is_gate_failure() {
                pause(pause_on_error);
            }
            1
        }
    };
    std::process::exit(code);
}

/// Config from rekap.toml at or above `dir`, or defaults.
fn load_config(dir: &Path) -> Result<(Option<PathBuf>, Config)> {
    Ok(match Config::find(dir)? {
        Some((found, config)) => (Some(found), config),
        None => (None, Config::default()),
    })
}

fn run_cli(cli: Cli, pause_on_error: &mut bool) -> Result<i32> {
    let command = cli.command.unwrap_or(Command::Launch {
        path: PathBuf::from("."),
    });

    match command {
        Command::Launch { path } => {
            let (_, config) = load_config(&path)?;
            let pause = config.pause && !cli.no_pause;
            *pause_on_error = pause;
            launch::execute(launch::LaunchArgs {
                path,
                uv: cli.uv,
                config,
                pause,
            })
        }

        Command::Check { path } => {
            let (_, config) = load_config(&path)?;
            check::execute(check::CheckArgs {
                path,
                uv: cli.uv,
                config,
            })?;
            Ok(0)
        }

        Command::Info { path } => {
            let (config_dir, config) = load_config(&path)?;
            info::execute(info::InfoArgs {
                path,
                uv: cli.uv,
                config,
                config_dir,
            })?;
            Ok(0)
        }

        Command::Pages { path, format } => {
            pages::execute(pages::PagesArgs {
                path,
                format: format.into(),
            })?;
            Ok(0)
        }

        Command::Report(args) => {
            let config = Config::load_from_cwd()?.unwrap_or_default();
            let mut usage = config.report;
            if let Some(harga) = args.harga {
                usage.harga = harga;
            }
            if let Some(saldo_awal) = args.saldo_awal {
                usage.saldo_awal = saldo_awal;
            }
            if let Some(saldo_akhir) = args.saldo_akhir {
                usage.saldo_akhir = saldo_akhir;
            }

            report::execute(report::ReportArgs {
                input: args.input,
                kode_produk: args.kode,
                tgl_awal: args.from,
                tgl_akhir: args.to,
                filter: RowFilter {
                    final_status: args.status,
                    kode_produk: args.filter_kode,
                    tujuan: args.filter_tujuan,
                    sn: args.filter_sn,
                },
                usage,
                format: args.format.into(),
                show_rows: args.rows,
            })?;
            Ok(0)
        }

        Command::Audit(args) => {
            let config = Config::load_from_cwd()?.unwrap_or_default();
            let mut audit_config = config.audit;
            if let Some(api_url) = args.api_url {
                audit_config.api_url = api_url;
            }
            if let Some(username) = args.username {
                audit_config.username = username;
            }
            if let Some(delay) = args.delay {
                audit_config.delay_seconds = delay;
            }
            if let Some(max_queue) = args.max_queue {
                audit_config.max_queue = max_queue;
            }
            if let Some(timeout) = args.timeout {
                audit_config.timeout_seconds = timeout;
            }

            audit::execute(audit::AuditArgs {
                numbers: args.numbers,
                file: args.file,
                delimiter: args.delimiter,
                config: audit_config,
                status: args.status.into(),
                json: args.json,
                csv: args.csv,
            })?;
            Ok(0)
        }

        Command::Completions { shell } => {
            let mut cmd = Cli::command();
            generate(shell, &mut cmd, "rekap", &mut io::stdout());
            Ok(0)
        }
    }
}
