//! Integration tests for the launch sequence, driven by a fake uv.
#![cfg(unix)]

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A project directory plus an isolated PATH and HOME.
struct Sandbox {
    root: TempDir,
}

impl Sandbox {
    fn new() -> Self {
        let root = TempDir::new().unwrap();
        for dir in ["project", "bin", "home"] {
            fs::create_dir(root.path().join(dir)).unwrap();
        }
        fs::write(root.path().join("project/main.py"), "").unwrap();
        Self { root }
    }

    fn project(&self) -> PathBuf {
        self.root.path().join("project")
    }

    fn bin(&self) -> PathBuf {
        self.root.path().join("bin")
    }

    fn log(&self) -> PathBuf {
        self.root.path().join("calls.log")
    }

    fn calls(&self) -> String {
        fs::read_to_string(self.log()).unwrap_or_default()
    }

    /// Install a uv whose `sync` exits with `sync_exit`. Calls are logged.
    fn install_uv(&self, sync_exit: i32) {
        let script = format!(
            "#!/bin/sh\n\
             echo \"uv $@\" >> \"{log}\"\n\
             case \"$1\" in\n\
               --version) echo \"uv 0.5.1\" ;;\n\
               sync) exit {sync_exit} ;;\n\
             esac\n",
            log = self.log().display(),
            sync_exit = sync_exit,
        );
        write_executable(&self.bin().join("uv"), &script);
    }

    /// Create the venv with an activation script and a streamlit exiting `code`.
    fn install_venv(&self, code: i32) {
        let bin = self.project().join(".venv/bin");
        fs::create_dir_all(&bin).unwrap();
        fs::write(bin.join("activate"), "# activate\n").unwrap();
        let script = format!(
            "#!/bin/sh\n\
             echo \"streamlit $@ venv=$VIRTUAL_ENV\" >> \"{log}\"\n\
             exit {code}\n",
            log = self.log().display(),
            code = code,
        );
        write_executable(&bin.join("streamlit"), &script);
    }

    #[allow(deprecated)]
    fn rekap(&self) -> Command {
        let mut cmd = Command::cargo_bin("rekap").unwrap();
        cmd.current_dir(self.project())
            .env("PATH", self.bin())
            .env("HOME", self.root.path().join("home"))
            .env_remove("UV_INSTALL_DIR")
            .env_remove("REKAP_UV")
            .env_remove("RUST_LOG")
            .arg("--no-pause");
        cmd
    }
}

fn write_executable(path: &Path, content: &str) {
    fs::write(path, content).unwrap();
    fs::set_permissions(path, fs::Permissions::from_mode(0o755)).unwrap();
}

#[test]
fn test_missing_uv() {
    let sandbox = Sandbox::new();

    sandbox
        .rekap()
        .assert()
        .code(1)
        .stdout(predicate::str::contains("[1/4] Checking uv"))
        .stdout(predicate::str::contains("[2/4]").not())
        .stderr(predicate::str::contains("uv not found"))
        .stderr(predicate::str::contains(
            "https://docs.astral.sh/uv/getting-started/installation/",
        ));
}

#[test]
fn test_sync_failure_stops_before_venv_check() {
    let sandbox = Sandbox::new();
    sandbox.install_uv(3);

    sandbox
        .rekap()
        .assert()
        .code(1)
        .stdout(predicate::str::contains("found uv 0.5.1"))
        .stdout(predicate::str::contains("[2/4] Syncing dependencies"))
        .stdout(predicate::str::contains("[3/4]").not())
        .stderr(predicate::str::contains("uv sync failed: exit code 3"));

    assert_eq!(sandbox.calls(), "uv --version\nuv sync\n");
}

#[test]
fn test_missing_venv_does_not_launch() {
    let sandbox = Sandbox::new();
    sandbox.install_uv(0);

    sandbox
        .rekap()
        .assert()
        .code(1)
        .stdout(predicate::str::contains("[3/4] Checking virtual environment"))
        .stdout(predicate::str::contains("[4/4]").not())
        .stderr(predicate::str::contains("Virtual environment not found"))
        .stderr(predicate::str::contains(".venv/bin/activate"));

    assert!(!sandbox.calls().contains("streamlit"));
}

#[test]
fn test_launches_streamlit_once() {
    let sandbox = Sandbox::new();
    sandbox.install_uv(0);
    sandbox.install_venv(0);

    sandbox
        .rekap()
        .assert()
        .success()
        .stdout(predicate::str::contains("[4/4] Starting application"))
        .stdout(predicate::str::contains("Application stopped (exit code 0)."));

    let calls = sandbox.calls();
    let launches: Vec<&str> = calls.lines().filter(|l| l.starts_with("streamlit")).collect();
    assert_eq!(launches.len(), 1);
    assert!(launches[0].starts_with("streamlit run main.py"));
    assert!(launches[0].ends_with("/.venv"));
}

#[test]
fn test_server_exit_code_is_returned() {
    let sandbox = Sandbox::new();
    sandbox.install_uv(0);
    sandbox.install_venv(7);

    sandbox
        .rekap()
        .arg("launch")
        .assert()
        .code(7)
        .stdout(predicate::str::contains("Application stopped (exit code 7)."));
}

#[test]
fn test_missing_server_binary_is_reported() {
    let sandbox = Sandbox::new();
    sandbox.install_uv(0);
    let bin = sandbox.project().join(".venv/bin");
    fs::create_dir_all(&bin).unwrap();
    fs::write(bin.join("activate"), "# activate\n").unwrap();

    sandbox
        .rekap()
        .assert()
        .code(1)
        .stdout(predicate::str::contains("[4/4] Starting application"))
        .stderr(predicate::str::contains("Failed to start streamlit"));
}

#[test]
fn test_rerun_repeats_every_gate() {
    let sandbox = Sandbox::new();
    sandbox.install_uv(0);
    sandbox.install_venv(0);

    sandbox.rekap().assert().success();
    sandbox.rekap().assert().success();

    let calls = sandbox.calls();
    assert_eq!(calls.matches("uv --version").count(), 2);
    assert_eq!(calls.matches("uv sync").count(), 2);
    assert_eq!(calls.matches("streamlit run").count(), 2);
}

#[test]
fn test_check_never_launches() {
    let sandbox = Sandbox::new();
    sandbox.install_uv(0);
    sandbox.install_venv(0);

    sandbox
        .rekap()
        .arg("check")
        .assert()
        .success()
        .stdout(predicate::str::contains("Environment ready"));

    assert!(!sandbox.calls().contains("streamlit"));
}

#[test]
fn test_uv_override_and_server_args_from_config() {
    let sandbox = Sandbox::new();
    sandbox.install_uv(0);
    sandbox.install_venv(0);
    let uv = sandbox.bin().join("uv");
    fs::rename(&uv, sandbox.root.path().join("home/uv-custom")).unwrap();

    fs::write(
        sandbox.project().join("rekap.toml"),
        "server_args = [\"--server.port\", \"8601\"]\n",
    )
    .unwrap();

    sandbox
        .rekap()
        .arg("--uv")
        .arg(sandbox.root.path().join("home/uv-custom"))
        .assert()
        .success();

    assert!(sandbox
        .calls()
        .contains("streamlit run main.py --server.port 8601"));
}
