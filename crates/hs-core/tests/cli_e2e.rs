//! End-to-end tests for the hall-scout binary.
//!
//! Every command runs with an isolated config home so a user's own spec
//! table cannot leak into the results.

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;
use std::path::Path;
use tempfile::TempDir;

fn hall_scout(home: &TempDir) -> Command {
    let mut cmd = cargo_bin_cmd!("hall-scout");
    cmd.env("XDG_CONFIG_HOME", home.path())
        .env_remove("HALL_SCOUT_SPEC_TABLE")
        .env_remove("HS_LOG")
        .env_remove("RUST_LOG");
    cmd
}

fn write(dir: &Path, name: &str, contents: &str) {
    std::fs::write(dir.join(name), contents).expect("write fixture");
}

fn stdout_json(output: &std::process::Output) -> serde_json::Value {
    serde_json::from_slice(&output.stdout).expect("stdout is JSON")
}

// ============================================================================
// Informational commands
// ============================================================================

mod info {
    use super::*;

    #[test]
    fn version_reports_schema() {
        let home = TempDir::new().unwrap();
        hall_scout(&home)
            .arg("version")
            .assert()
            .success()
            .stdout(predicate::str::contains("schema_version"));
    }

    #[test]
    fn specs_lists_builtin_models() {
        let home = TempDir::new().unwrap();
        let output = hall_scout(&home).arg("specs").output().unwrap();
        assert!(output.status.success());
        let json = stdout_json(&output);
        assert_eq!(json["spec_table"]["models"].as_array().unwrap().len(), 8);
        assert_eq!(json["config"]["source"], "builtin default");
    }

    #[test]
    fn specs_markdown_has_model_sections() {
        let home = TempDir::new().unwrap();
        hall_scout(&home)
            .args(["--format", "md", "specs"])
            .assert()
            .success()
            .stdout(predicate::str::contains("## マイジャグラー"));
    }

    #[test]
    fn unknown_flag_is_args_error() {
        let home = TempDir::new().unwrap();
        hall_scout(&home).args(["--bogus"]).assert().code(10);
    }
}

// ============================================================================
// Spec table handling
// ============================================================================

mod spec_table {
    use super::*;

    #[test]
    fn check_builtin_is_valid() {
        let home = TempDir::new().unwrap();
        let output = hall_scout(&home).arg("check").output().unwrap();
        assert!(output.status.success());
        assert_eq!(stdout_json(&output)["status"], "valid");
    }

    #[test]
    fn malformed_table_is_config_error() {
        let home = TempDir::new().unwrap();
        write(home.path(), "bad.json", "{ not json");
        hall_scout(&home)
            .args(["check", "--spec-table"])
            .arg(home.path().join("bad.json"))
            .assert()
            .code(11)
            .stderr(predicate::str::contains("\"status\": \"error\""));
    }

    #[test]
    fn table_missing_a_setting_is_rejected() {
        let home = TempDir::new().unwrap();
        write(
            home.path(),
            "five.json",
            r#"{"schema_version":"1.0.0","default_model":"X","models":[{"name":"X","settings":{
                "1":{"small_interval":400,"big_interval":300},
                "2":{"small_interval":390,"big_interval":295},
                "3":{"small_interval":380,"big_interval":290},
                "4":{"small_interval":370,"big_interval":285},
                "5":{"small_interval":360,"big_interval":280}}}]}"#,
        );
        hall_scout(&home)
            .arg("check")
            .env("HALL_SCOUT_SPEC_TABLE", home.path().join("five.json"))
            .assert()
            .code(11);
    }
}

// ============================================================================
// Estimation
// ============================================================================

mod estimate {
    use super::*;

    #[test]
    fn setting_six_like_counts() {
        let home = TempDir::new().unwrap();
        let output = hall_scout(&home)
            .args([
                "estimate",
                "--model",
                "アイムジャグラーEX",
                "--spins",
                "6000",
                "--small",
                "25",
                "--big",
                "25",
            ])
            .output()
            .unwrap();
        assert!(output.status.success());
        let json = stdout_json(&output);
        assert_eq!(json["posterior"]["most_likely_setting"], 6);
        assert_eq!(json["resolved_model"], "アイムジャグラー");
        assert_eq!(json["matched"], true);
        let total: f64 = json["posterior"]["probabilities"]
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_f64().unwrap())
            .sum();
        assert!((total - 1.0).abs() < 1e-9);
    }

    #[test]
    fn zero_spins_rejected() {
        let home = TempDir::new().unwrap();
        hall_scout(&home)
            .args(["estimate", "--model", "x", "--spins", "0", "--small", "0", "--big", "0"])
            .assert()
            .code(10);
    }

    #[test]
    fn summary_is_one_line() {
        let home = TempDir::new().unwrap();
        hall_scout(&home)
            .args([
                "-f", "summary", "estimate", "--model", "マイジャグラーV", "--spins", "3000",
                "--small", "8", "--big", "9",
            ])
            .assert()
            .success()
            .stdout(predicate::str::contains("most likely setting"));
    }
}

// ============================================================================
// Islands
// ============================================================================

#[test]
fn islands_partition_example() {
    let home = TempDir::new().unwrap();
    let output = hall_scout(&home)
        .args(["islands", "1", "2", "3", "10", "11", "50", "B-12"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let json = stdout_json(&output);
    assert_eq!(json["islands"], serde_json::json!([[1, 2, 3], [10, 11], [50]]));
    assert_eq!(json["positions"]["2"], "center");
    assert_eq!(json["positions"]["50"], "corner");
    assert_eq!(json["skipped"], serde_json::json!(["B-12"]));
}

// ============================================================================
// Analysis
// ============================================================================

mod analyze {
    use super::*;

    fn hall(dir: &Path) {
        write(
            dir,
            "0207.csv",
            "台番,G数,BB,RB\n1001,\"6,000\",25,25\n1002,4000,12,10\n1003,0,0,0\nB-12,3000,9,8\n",
        );
        write(
            dir,
            "0214.csv",
            "台番,G数,BB,RB\n1001,5000,18,17\n1002,5500,22,19\n",
        );
    }

    #[test]
    fn clean_run_reports_and_exports() {
        let home = TempDir::new().unwrap();
        let data = TempDir::new().unwrap();
        hall(data.path());
        write(data.path(), "manifest.txt", "2/7, 0207.csv\n2/14, 0214.csv\n");

        let output = hall_scout(&home)
            .args(["analyze", "--manifest"])
            .arg(data.path().join("manifest.txt"))
            .arg("--export")
            .arg(data.path())
            .output()
            .unwrap();
        assert_eq!(output.status.code(), Some(0));

        let json = stdout_json(&output);
        assert_eq!(json["status"], "ok");
        assert_eq!(json["analysis"]["source_count"], 2);
        assert_eq!(json["analysis"]["normalization"]["dropped_zero_spins"], 1);
        assert_eq!(json["analysis"]["normalization"]["spatially_excluded"], 1);
        assert_eq!(json["analysis"]["report"]["kpis"]["machine_count"], 4);

        let export = json["export_path"].as_str().unwrap();
        assert!(export.contains("analysis_"));
        let text = std::fs::read_to_string(export).unwrap();
        assert!(text.starts_with('\u{feff}'));
        // Header plus 5 estimated rows, the unplaced machine included.
        assert_eq!(text.lines().count(), 6);
    }

    #[test]
    fn failed_source_exits_partial() {
        let home = TempDir::new().unwrap();
        let data = TempDir::new().unwrap();
        hall(data.path());
        write(data.path(), "manifest.txt", "2/7, 0207.csv\n2/21, missing.csv\n");

        hall_scout(&home)
            .args(["--format", "md", "analyze", "--manifest"])
            .arg(data.path().join("manifest.txt"))
            .assert()
            .code(1)
            .stdout(predicate::str::contains("## Failed sources"))
            .stdout(predicate::str::contains("source 2/21 failed"))
            .stdout(predicate::str::contains("> The source was skipped"));
    }

    #[test]
    fn nothing_usable_exits_no_data() {
        let home = TempDir::new().unwrap();
        let data = TempDir::new().unwrap();
        write(data.path(), "manifest.txt", "2/7, missing.csv\n");

        hall_scout(&home)
            .args(["analyze", "--manifest"])
            .arg(data.path().join("manifest.txt"))
            .assert()
            .code(2);
    }

    #[test]
    fn empty_manifest_is_args_error() {
        let home = TempDir::new().unwrap();
        let data = TempDir::new().unwrap();
        write(data.path(), "manifest.txt", "# nothing yet\n\n");

        hall_scout(&home)
            .args(["analyze", "--manifest"])
            .arg(data.path().join("manifest.txt"))
            .assert()
            .code(10);
    }

    #[test]
    fn missing_manifest_is_io_error() {
        let home = TempDir::new().unwrap();
        hall_scout(&home)
            .args(["analyze", "--manifest", "/nonexistent/manifest.txt"])
            .assert()
            .code(21);
    }
}
