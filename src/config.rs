//! Configuration file handling for rekap.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// The configuration file name.
pub const CONFIG_FILE_NAME: &str = "rekap.toml";

/// Default Streamlit entry file.
pub const DEFAULT_ENTRY_FILE: &str = "main.py";

/// Default virtual environment directory.
pub const DEFAULT_VENV_DIR: &str = ".venv";

/// Default Python module used to serve the app.
pub const DEFAULT_SERVER_MODULE: &str = "streamlit";

/// Configuration from rekap.toml.
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct Config {
    /// Path to the uv executable
    pub uv_path: Option<PathBuf>,

    /// Entry file passed to `streamlit run`
    pub entry_file: PathBuf,

    /// Virtual environment directory, relative to the project root
    pub venv_dir: PathBuf,

    /// Executable inside the venv that serves the app
    pub server_module: String,

    /// Extra arguments appended after the entry file
    pub server_args: Vec<String>,

    /// Wait for Enter before exiting
    pub pause: bool,

    pub report: ReportConfig,

    pub audit: AuditConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            uv_path: None,
            entry_file: PathBuf::from(DEFAULT_ENTRY_FILE),
            venv_dir: PathBuf::from(DEFAULT_VENV_DIR),
            server_module: DEFAULT_SERVER_MODULE.to_string(),
            server_args: Vec::new(),
            pause: true,
            report: ReportConfig::default(),
            audit: AuditConfig::default(),
        }
    }
}

/// Usage calculator defaults for `rekap report`.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct ReportConfig {
    /// Product price
    pub harga: i64,
    /// Opening balance
    pub saldo_awal: i64,
    /// Closing balance
    pub saldo_akhir: i64,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            harga: 10_000,
            saldo_awal: 500_000,
            saldo_akhir: 300_000,
        }
    }
}

/// Package-status API settings for `rekap audit`.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct AuditConfig {
    pub api_url: String,
    pub username: String,
    pub identifier_kartu: String,
    pub identifier_paket: String,
    /// Pause after each processed number
    pub delay_seconds: u64,
    /// Queue capacity
    pub max_queue: usize,
    /// Per-request timeout
    pub timeout_seconds: u64,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:8005/get_package_status".to_string(),
            username: String::new(),
            identifier_kartu: "Kartu".to_string(),
            identifier_paket: "Freedom Internet 1.5GB/1Hari".to_string(),
            delay_seconds: 30,
            max_queue: 10,
            timeout_seconds: 30,
        }
    }
}

impl Config {
    /// Load configuration from rekap.toml in the given directory or its parents.
    ///
    /// Returns `Ok(None)` if no configuration file is found.
    pub fn load(start_dir: &Path) -> Result<Option<Self>> {
        Ok(Self::find(start_dir)?.map(|(_, config)| config))
    }

    /// Like [`Config::load`], but also returns the directory the file was found in.
    pub fn find(start_dir: &Path) -> Result<Option<(PathBuf, Self)>> {
        let mut current = start_dir
            .canonicalize()
            .unwrap_or_else(|_| start_dir.to_path_buf());

        loop {
            let config_path = current.join(CONFIG_FILE_NAME);
            if config_path.exists() {
                tracing::debug!("loading config from {}", config_path.display());
                let content = std::fs::read_to_string(&config_path)?;
                let config = Self::from_toml(&content)?;
                return Ok(Some((current, config)));
            }

            if !current.pop() {
                break;
            }
        }

        Ok(None)
    }

    /// Load configuration from the current directory.
    pub fn load_from_cwd() -> Result<Option<Self>> {
        let cwd = std::env::current_dir()?;
        Self::load(&cwd)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_parse_complete_config() {
        let toml = r#"
uv_path = "/opt/uv/bin/uv"
entry_file = "streamlit_app.py"
venv_dir = "env"
server_module = "streamlit"
server_args = ["--server.port", "8601"]
pause = false

[report]
harga = 12000
saldo_awal = 1000000
saldo_akhir = 400000

[audit]
api_url = "http://10.0.0.5:8005/get_package_status"
username = "ops"
identifier_kartu = "Kartu"
identifier_paket = "Freedom Internet 2GB/1Hari"
delay_seconds = 5
max_queue = 50
timeout_seconds = 10
"#;
        let config = Config::from_toml(toml).unwrap();
        assert_eq!(config.uv_path, Some(PathBuf::from("/opt/uv/bin/uv")));
        assert_eq!(config.entry_file, PathBuf::from("streamlit_app.py"));
        assert_eq!(config.venv_dir, PathBuf::from("env"));
        assert_eq!(config.server_args, vec!["--server.port", "8601"]);
        assert!(!config.pause);
        assert_eq!(config.report.harga, 12000);
        assert_eq!(config.report.saldo_awal, 1_000_000);
        assert_eq!(config.audit.username, "ops");
        assert_eq!(config.audit.max_queue, 50);
        assert_eq!(config.audit.delay_seconds, 5);
    }

    #[test]
    fn test_parse_minimal_config() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config.uv_path, None);
        assert_eq!(config.entry_file, PathBuf::from("main.py"));
        assert_eq!(config.venv_dir, PathBuf::from(".venv"));
        assert_eq!(config.server_module, "streamlit");
        assert!(config.pause);
        assert_eq!(config.report, ReportConfig::default());
        assert_eq!(config.audit, AuditConfig::default());
    }

    #[test]
    fn test_parse_partial_sections() {
        let toml = r#"
[audit]
username = "ops"
"#;
        let config = Config::from_toml(toml).unwrap();
        assert_eq!(config.audit.username, "ops");
        assert_eq!(config.audit.delay_seconds, 30);
        assert_eq!(config.audit.identifier_kartu, "Kartu");
        assert_eq!(config.report.harga, 10_000);
    }

    #[test]
    fn test_load_from_directory() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join(CONFIG_FILE_NAME),
            r#"
entry_file = "app.py"
pause = false
"#,
        )
        .unwrap();

        let config = Config::load(temp.path()).unwrap().unwrap();
        assert_eq!(config.entry_file, PathBuf::from("app.py"));
        assert!(!config.pause);
    }

    #[test]
    fn test_load_searches_parent_directories() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join(CONFIG_FILE_NAME),
            r#"entry_file = "parent.py""#,
        )
        .unwrap();

        let nested = temp.path().join("pages").join("sub");
        fs::create_dir_all(&nested).unwrap();

        let (dir, config) = Config::find(&nested).unwrap().unwrap();
        assert_eq!(config.entry_file, PathBuf::from("parent.py"));
        assert_eq!(dir, temp.path().canonicalize().unwrap());
    }

    #[test]
    fn test_load_returns_none_when_not_found() {
        let temp = TempDir::new().unwrap();
        assert!(Config::load(temp.path()).unwrap().is_none());
    }

    #[test]
    fn test_parse_invalid_toml() {
        assert!(Config::from_toml("this is not valid toml [[[").is_err());
    }
}
