//! `spb analyze` / `spb quality` / `spb config-hash` end to end, over the
//! DEMO fixture written to a temp quotes directory.

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use spb_testkit::demo_quotes_dir;

fn defaults_yaml() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../../config/defaults.yaml")
}

/// Writes an overlay that puts DEMO on the allow-list.
fn demo_overlay(dir: &Path) -> PathBuf {
    let path = dir.join("demo.yaml");
    fs::write(&path, "analysis:\n  tickers: [\"DEMO\", \"MU\"]\n").unwrap();
    path
}

fn spb(work: &Path) -> Command {
    let mut cmd = Command::cargo_bin("spb").unwrap();
    cmd.current_dir(work).env_remove("SPB_QUOTES_DIR").env("RUST_LOG", "warn");
    cmd
}

#[test]
fn analyze_prints_the_record_as_json() {
    let quotes = demo_quotes_dir().unwrap();
    let work = tempfile::tempdir().unwrap();
    let overlay = demo_overlay(work.path());

    let out = spb(work.path())
        .arg("--config")
        .arg(defaults_yaml())
        .arg("--config")
        .arg(&overlay)
        .arg("--quotes-dir")
        .arg(quotes.path())
        .args(["analyze", "--ticker", "demo", "--mode", "close_open", "--boundary", "0.5"])
        .output()
        .unwrap();
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));

    let v: Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(v["ticker"], "DEMO");
    assert_eq!(v["mode"], "close_open");
    assert_eq!(v["label"], "Close-Open Price Difference");
    assert_eq!(v["record"]["allObsNumber"], 3);
    assert_eq!(v["record"]["obsBtwBoundaries"], 2);
    assert_eq!(v["record"]["std"], 0.645);
}

#[test]
fn daily_mode_ignores_the_cutoff_flag() {
    let quotes = demo_quotes_dir().unwrap();
    let work = tempfile::tempdir().unwrap();
    let overlay = demo_overlay(work.path());

    spb(work.path())
        .arg("--config")
        .arg(&overlay)
        .arg("--quotes-dir")
        .arg(quotes.path())
        .args([
            "analyze", "--ticker", "DEMO", "--mode", "close_open", "--boundary", "0.5", "--cutoff",
            "2300",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"allObsNumber\": 3"));
}

#[test]
fn env_var_supplies_the_quotes_dir() {
    let quotes = demo_quotes_dir().unwrap();
    let work = tempfile::tempdir().unwrap();
    let overlay = demo_overlay(work.path());

    spb(work.path())
        .env("SPB_QUOTES_DIR", quotes.path())
        .arg("--config")
        .arg(&overlay)
        .args([
            "analyze",
            "--ticker",
            "DEMO",
            "--mode",
            "intraprice_open",
            "--boundary",
            "0.3",
            "--cutoff",
            "1800",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"allObsNumber\": 4"))
        .stdout(predicate::str::contains("Intraday Price @1800 - Open Price Difference"));
}

#[test]
fn chart_flag_writes_text_histogram_to_stderr() {
    let quotes = demo_quotes_dir().unwrap();
    let work = tempfile::tempdir().unwrap();
    let overlay = demo_overlay(work.path());

    spb(work.path())
        .arg("--config")
        .arg(&overlay)
        .arg("--quotes-dir")
        .arg(quotes.path())
        .args(["analyze", "--ticker", "DEMO", "--mode", "open_priorclose", "--boundary", "0.2", "--chart"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Histogram of Stock Open-Prior Close Price Difference"))
        .stderr(predicate::str::contains("Ticker Symbol: DEMO"));
}

#[test]
fn invalid_inputs_fail_with_their_kind() {
    let work = tempfile::tempdir().unwrap();
    let cases: [(&[&str], &str); 6] = [
        (&["--ticker", "TWTR1", "--mode", "close_open", "--boundary", "0.5"], "INVALID_TICKER"),
        (&["--ticker", "TWTR", "--mode", "intra_open", "--boundary", "0.5"], "INVALID_MODE"),
        (&["--ticker", "TWTR", "--mode", "CLOSE_OPEN", "--boundary", "0.5"], "INVALID_MODE"),
        (&["--ticker", "TWTR", "--mode", "close_open", "--boundary", "-0.5"], "INVALID_BOUNDARY"),
        (
            &["--ticker", "TWTR", "--mode", "intraprice_open", "--boundary", "0.5", "--cutoff", "1200"],
            "INVALID_CUTOFF_TIME",
        ),
        (
            &["--ticker", "TWTR", "--mode", "intraprice_open", "--boundary", "0.5", "--cutoff", "2300"],
            "INVALID_CUTOFF_TIME",
        ),
    ];
    for (args, kind) in cases {
        spb(work.path())
            .arg("analyze")
            .args(args)
            .assert()
            .failure()
            .stdout(predicate::str::is_empty())
            .stderr(predicate::str::contains(kind));
    }
}

#[test]
fn missing_quotes_file_is_a_quote_source_error() {
    let work = tempfile::tempdir().unwrap();
    spb(work.path())
        .arg("--quotes-dir")
        .arg(work.path())
        .args(["analyze", "--ticker", "MU", "--mode", "close_open", "--boundary", "0.5"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("QUOTE_SOURCE"))
        .stderr(predicate::str::contains("MU.txt"));
}

#[test]
fn quality_reports_shifted_and_short_days() {
    let quotes = demo_quotes_dir().unwrap();
    let work = tempfile::tempdir().unwrap();
    let overlay = demo_overlay(work.path());

    spb(work.path())
        .arg("--config")
        .arg(&overlay)
        .arg("--quotes-dir")
        .arg(quotes.path())
        .args(["quality", "--ticker", "DEMO"])
        .assert()
        .success()
        .stdout(predicate::str::contains("ticker=DEMO"))
        .stdout(predicate::str::contains("trading_days=4"))
        .stdout(predicate::str::contains("shifted_days=1 [2018-03-13]"))
        .stdout(predicate::str::contains("short_sessions=1 [2018-03-14]"))
        .stdout(predicate::str::contains("days_without_session_start=0 []"));
}

#[test]
fn config_hash_prints_hash_and_canonical_json() {
    let work = tempfile::tempdir().unwrap();
    spb(work.path())
        .arg("config-hash")
        .arg(defaults_yaml())
        .assert()
        .success()
        .stdout(predicate::str::is_match("^config_hash=[0-9a-f]{64}\n").unwrap())
        .stdout(predicate::str::contains("\"default_cutoff\":\"1755\""));
}

#[test]
fn config_hash_rejects_unknown_keys() {
    let work = tempfile::tempdir().unwrap();
    let bad = work.path().join("bad.yaml");
    fs::write(&bad, "quotes:\n  folder: x\n").unwrap();
    spb(work.path())
        .arg("config-hash")
        .arg(&bad)
        .assert()
        .failure()
        .stderr(predicate::str::contains("CONFIG_INVALID"));
}
