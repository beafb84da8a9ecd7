//! Discovery of the app's pages under `pages/`.
//!
//! Streamlit turns every `pages/*.py` file into a screen. A numeric prefix
//! (`01_Rekap_Report.py`) sets the order; underscores in the rest become spaces
//! in the title.

use crate::error::Result;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Directory scanned for pages, relative to the project root.
pub const PAGES_DIR: &str = "pages";

/// A page discovered from the naming convention.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page {
    /// Ordering prefix, if the file has one
    pub number: Option<u32>,
    /// Title shown in the navigation
    pub title: String,
    pub path: PathBuf,
}

impl Page {
    /// Parse a page from its file name. Returns `None` for non-page files.
    pub fn from_path(path: &Path) -> Option<Self> {
        if path.extension().map(|ext| ext != "py").unwrap_or(true) {
            return None;
        }
        let stem = path.file_stem()?.to_str()?;
        if stem.starts_with('_') || stem.starts_with('.') {
            return None;
        }

        let (number, name) = match stem.split_once('_') {
            Some((prefix, rest))
                if !prefix.is_empty() && prefix.chars().all(|c| c.is_ascii_digit()) =>
            {
                (prefix.parse().ok(), rest)
            }
            _ => (None, stem),
        };

        let title = name
            .split('_')
            .filter(|word| !word.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        if title.is_empty() {
            return None;
        }

        Some(Self {
            number,
            title,
            path: path.to_path_buf(),
        })
    }
}

/// List the pages of the project at `project_dir`, in navigation order.
///
/// A project without a `pages/` directory has no pages.
pub fn discover(project_dir: &Path) -> Result<Vec<Page>> {
    let dir = project_dir.join(PAGES_DIR);
    if !dir.is_dir() {
        return Ok(Vec::new());
    }

    let mut pages: Vec<Page> = fs::read_dir(&dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .filter_map(|path| Page::from_path(&path))
        .collect();

    // Numbered pages first, then the rest by title.
    pages.sort_by(|a, b| {
        let key = |p: &Page| (p.number.is_none(), p.number, p.title.clone());
        key(a).cmp(&key(b))
    });

    Ok(pages)
}
