//! `rekap info` command implementation.

use crate::config::{Config, CONFIG_FILE_NAME};
use crate::error::{RekapError, Result};
use crate::pages;
use crate::uv::find_uv;
use crate::venv::VenvLayout;
use std::path::{Path, PathBuf};

/// Arguments for the info command.
pub struct InfoArgs {
    /// Project directory
    pub path: PathBuf,
    /// uv executable override
    pub uv: Option<PathBuf>,
    pub config: Config,
    /// Directory rekap.toml was loaded from, if any
    pub config_dir: Option<PathBuf>,
}

/// Project metadata from pyproject.toml.
#[derive(Debug)]
pub struct ProjectInfo {
    pub name: String,
    pub version: Option<String>,
    pub requires_python: Option<String>,
    pub dependencies: Vec<String>,
}

/// Execute the info command.
pub fn execute(args: InfoArgs) -> Result<()> {
    let project_dir = args.path.canonicalize().unwrap_or(args.path.clone());

    println!("Project");
    println!("=======");
    println!();
    println!("Directory:      {}", project_dir.display());

    let pyproject_path = project_dir.join("pyproject.toml");
    if pyproject_path.exists() {
        match parse_project_info(&pyproject_path) {
            Ok(info) => {
                println!("Name:           {}", info.name);
                if let Some(ref version) = info.version {
                    println!("Version:        {}", version);
                }
                if let Some(ref python) = info.requires_python {
                    println!("Python:         {}", python);
                }
                if !info.dependencies.is_empty() {
                    println!("Dependencies:   {}", info.dependencies.join(", "));
                }
            }
            Err(e) => println!("pyproject.toml: ({})", e),
        }
    } else {
        println!("pyproject.toml: (missing)");
    }

    match args.config_dir {
        Some(ref dir) => println!("Config:         {}", dir.join(CONFIG_FILE_NAME).display()),
        None => println!("Config:         (defaults)"),
    }

    let entry = project_dir.join(&args.config.entry_file);
    println!(
        "Entry file:     {}{}",
        args.config.entry_file.display(),
        if entry.exists() { "" } else { " (missing)" }
    );

    println!();
    println!("Environment");
    println!("-----------");
    let uv = args.uv.or(args.config.uv_path.clone()).or_else(find_uv);
    match uv {
        Some(path) => println!("uv:             {}", path.display()),
        None => println!("uv:             (not found)"),
    }

    let venv = VenvLayout::in_project(&project_dir, &args.config.venv_dir);
    println!(
        "Venv:           {} ({})",
        venv.root().display(),
        if venv.is_present() { "ready" } else { "not synced" }
    );

    println!();
    println!("Pages");
    println!("-----");
    let pages = pages::discover(&project_dir)?;
    if pages.is_empty() {
        println!("(none)");
    }
    for page in pages {
        match page.number {
            Some(n) => println!("{:>3}  {}", n, page.title),
            None => println!("     {}", page.title),
        }
    }

    Ok(())
}

/// Parse project information from pyproject.toml.
fn parse_project_info(pyproject_path: &Path) -> Result<ProjectInfo> {
    let content = std::fs::read_to_string(pyproject_path)?;
    let pyproject: toml::Value = toml::from_str(&content)?;

    let project = pyproject
        .get("project")
        .ok_or_else(|| RekapError::ConfigError("[project] section missing".into()))?;

    let name = project
        .get("name")
        .and_then(|v| v.as_str())
        .ok_or_else(|| RekapError::ConfigError("[project].name missing".into()))?
        .to_string();

    let version = project
        .get("version")
        .and_then(|v| v.as_str())
        .map(|s| s.to_string());

    let requires_python = project
        .get("requires-python")
        .and_then(|v| v.as_str())
        .map(|s| s.to_string());

    let dependencies = project
        .get("dependencies")
        .and_then(|v| v.as_array())
        .map(|arr| {
            arr.iter()
                .filter_map(|v| v.as_str().map(|s| s.to_string()))
                .collect()
        })
        .unwrap_or_default();

    Ok(ProjectInfo {
        name,
        version,
        requires_python,
        dependencies,
    })
}
