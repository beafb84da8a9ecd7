//! `rekap pages` command implementation.

use crate::commands::OutputFormat;
use crate::error::Result;
use crate::pages;
use std::path::PathBuf;

/// Arguments for the pages command.
pub struct PagesArgs {
    pub path: PathBuf,
    pub format: OutputFormat,
}

/// Execute the pages command.
pub fn execute(args: PagesArgs) -> Result<()> {
    let project_dir = args.path.canonicalize().unwrap_or(args.path.clone());
    let pages = pages::discover(&project_dir)?;

    match args.format {
        OutputFormat::Text => {
            if pages.is_empty() {
                println!("No pages found in {}", project_dir.join(pages::PAGES_DIR).display());
                return Ok(());
            }
            for page in &pages {
                let file = page
                    .path
                    .file_name()
                    .map(|f| f.to_string_lossy().to_string())
                    .unwrap_or_default();
                match page.number {
                    Some(n) => println!("{:>3}  {:<24} {}", n, page.title, file),
                    None => println!("     {:<24} {}", page.title, file),
                }
            }
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&pages)?;
            println!("{}", json);
        }
    }

    Ok(())
}
