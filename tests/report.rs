//! Integration tests for `rekap report`.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

#[allow(deprecated)]
fn rekap() -> Command {
    Command::cargo_bin("rekap").unwrap()
}

const TRANSAKSI: &str = "\
kode_produk,tujuan,status,sn,tgl_status
RGU5,081200000001,20,SUP123,2024-05-01 08:00:00
RGU5,081200000002,20,SUP200,2024-05-01 09:00:00
RGU5,081200000002,20,SUP201,2024-05-01 09:05:00
RGU5,081200000003,20,,2024-05-02 10:00:00
RGU5,081200000004,40,,2024-05-02 11:00:00
RGU9,081200000005,20,SUP999,2024-05-03 12:00:00
";

fn fixture(temp: &TempDir) -> PathBuf {
    let path = temp.path().join("transaksi.csv");
    fs::write(&path, TRANSAKSI).unwrap();
    path
}

#[test]
fn test_report_text() {
    let temp = TempDir::new().unwrap();
    let csv = fixture(&temp);

    rekap()
        .current_dir(temp.path())
        .args(["report", csv.to_str().unwrap(), "--kode", "RGU5"])
        .args(["--harga", "10000", "--saldo-awal", "50000", "--saldo-akhir", "30000"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Rekap RGU - Produk: RGU5"))
        .stdout(predicate::str::contains("Total entries:      5"))
        .stdout(predicate::str::contains("Unique tujuan:      4"))
        .stdout(predicate::str::contains("Cocok"))
        .stdout(predicate::str::contains("Tidak Cocok").not());
}

#[test]
fn test_report_json_with_status_filter() {
    let temp = TempDir::new().unwrap();
    let csv = fixture(&temp);

    let output = rekap()
        .current_dir(temp.path())
        .args(["report", csv.to_str().unwrap(), "--kode", "RGU5,RGU9"])
        .args(["--status", "sukses-loss", "--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let rows = report["rows"].as_array().unwrap();
    assert_eq!(rows.len(), 2);
    assert!(rows.iter().all(|r| r["tujuan"] == "081200000002"));
    assert!(rows.iter().all(|r| r["final_status"] == "SUKSES LOSS"));
    assert_eq!(report["metrics"]["total"], 2);
    assert_eq!(report["usage"]["total_sukses_profit"], 0);
}

#[test]
fn test_report_date_range_is_inclusive() {
    let temp = TempDir::new().unwrap();
    let csv = fixture(&temp);

    let output = rekap()
        .current_dir(temp.path())
        .args(["report", csv.to_str().unwrap(), "--kode", "RGU5"])
        .args(["--from", "2024-05-02", "--to", "2024-05-02", "--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["metrics"]["total"], 2);
}

#[test]
fn test_report_no_data_is_not_an_error() {
    let temp = TempDir::new().unwrap();
    let csv = fixture(&temp);

    rekap()
        .current_dir(temp.path())
        .args(["report", csv.to_str().unwrap(), "--kode", "XYZ"])
        .assert()
        .success()
        .stderr(predicate::str::contains("no data for product code(s): XYZ"));
}

#[test]
fn test_report_missing_file() {
    let temp = TempDir::new().unwrap();

    rekap()
        .current_dir(temp.path())
        .args(["report", "missing.csv", "--kode", "RGU5"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("error:"));
}

#[test]
fn test_report_usage_overflow_is_an_error() {
    let temp = TempDir::new().unwrap();
    let csv = fixture(&temp);

    rekap()
        .current_dir(temp.path())
        .args(["report", csv.to_str().unwrap(), "--kode", "RGU5"])
        .args(["--harga", &i64::MAX.to_string()])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("out of range"));
}

#[test]
fn test_report_ignores_bad_rows_of_other_products() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("transaksi.csv");
    fs::write(
        &path,
        format!("{}TSEL,081299999999,,,\nTSEL,081299999998,20,SUP1,kemarin\n", TRANSAKSI),
    )
    .unwrap();

    rekap()
        .current_dir(temp.path())
        .args(["report", path.to_str().unwrap(), "--kode", "RGU5"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Total entries:      5"));
}

#[test]
fn test_report_uses_config_from_current_directory() {
    let temp = TempDir::new().unwrap();
    let csv = fixture(&temp);
    fs::write(
        temp.path().join("rekap.toml"),
        "[report]\nharga = 5000\nsaldo_awal = 10000\nsaldo_akhir = 0\n",
    )
    .unwrap();

    let output = rekap()
        .current_dir(temp.path())
        .args(["report", csv.to_str().unwrap(), "--kode", "RGU5", "--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["usage"]["harga"], 5000);
    assert_eq!(report["usage"]["selisih"], 0);
}
