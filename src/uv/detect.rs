//! uv executable detection.

use std::path::{Path, PathBuf};

/// Executable file name for the current platform.
#[cfg(windows)]
const UV_EXE: &str = "uv.exe";

#[cfg(not(windows))]
const UV_EXE: &str = "uv";

/// Returns the locations the official installers put uv in.
fn default_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    if let Ok(dir) = std::env::var("UV_INSTALL_DIR") {
        paths.push(PathBuf::from(dir).join(UV_EXE));
    }

    if let Some(home) = dirs::home_dir() {
        paths.push(home.join(".local").join("bin").join(UV_EXE));
        paths.push(home.join(".cargo").join("bin").join(UV_EXE));
    }

    #[cfg(target_os = "macos")]
    paths.push(PathBuf::from("/opt/homebrew/bin/uv"));

    paths
}

/// Check if a path is executable.
#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(windows)]
fn is_executable(path: &Path) -> bool {
    path.is_file()
        && path
            .extension()
            .map(|ext| ext.to_string_lossy().eq_ignore_ascii_case("exe"))
            .unwrap_or(false)
}

#[cfg(not(any(unix, windows)))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

/// Attempt to find the uv executable.
///
/// Detection order:
/// 1. PATH search (via `which`)
/// 2. Installer default locations (`UV_INSTALL_DIR`, `~/.local/bin`, `~/.cargo/bin`)
///
/// An explicit `--uv`/`REKAP_UV`/`uv_path` override bypasses detection entirely.
pub fn find_uv() -> Option<PathBuf> {
    if let Ok(path) = which::which("uv") {
        tracing::debug!("found uv on PATH: {}", path.display());
        return Some(path);
    }

    let found = default_paths()
        .into_iter()
        .find(|path| is_executable(path));
    if let Some(ref path) = found {
        tracing::debug!("found uv at install location: {}", path.display());
    }
    found
}
