use assert_cmd::prelude::*;
use rstest::rstest;
use std::fs;
use std::path::PathBuf;
use std::process::Command;
use tempfile::tempdir;

fn write_valid_config(dir: &tempfile::TempDir) -> PathBuf {
    let toml = r#"
[rot_axis_adjust]
pos1 = [50.0, 100.0]
pos2 = [50.0, 10.0]
"#;
    let path = dir.path().join("cfg.toml");
    fs::write(&path, toml).unwrap();
    path
}

fn json_lines(stdout: &[u8]) -> Vec<serde_json::Value> {
    String::from_utf8_lossy(stdout)
        .lines()
        .filter(|l| l.starts_with('{'))
        .map(|l| serde_json::from_str(l).expect("valid JSON"))
        .collect()
}

/// One JSON line per run; the second run sees a flat surface.
#[rstest]
fn json_adjust_schema_over_repeated_runs() {
    let dir = tempdir().unwrap();
    let cfg = write_valid_config(&dir);

    let mut cmd = Command::cargo_bin("rotaxis").unwrap();
    cmd.arg("--json")
        .arg("--log-level")
        .arg("error")
        .arg("--config")
        .arg(&cfg)
        .args(["adjust", "--tilt-deg", "1.5", "--repeat", "2"]);

    let out = cmd.assert().success().get_output().stdout.clone();
    let lines = json_lines(&out);
    assert_eq!(lines.len(), 2, "stdout: {}", String::from_utf8_lossy(&out));

    let first = &lines[0];
    assert_eq!(first["run"], 1);
    assert_eq!(first["outcome"], "applied");
    assert_eq!(first["correction"]["outcome"], "applied");
    let c = first["correction"]["correction_deg"].as_f64().unwrap();
    assert!((c - 1.5).abs() < 1e-9, "got {c}");
    // Re-zeroed after the move.
    assert_eq!(first["a_position"].as_f64(), Some(0.0));
    assert!(first["messages"].as_array().unwrap().len() >= 5);

    // Status carries exactly the two screw entries with a z each.
    let results = first["status"]["results"].as_object().unwrap();
    assert_eq!(results.len(), 2);
    for key in ["screw1", "screw2"] {
        assert!(results[key]["z"].as_f64().is_some(), "{key} missing z");
    }

    let second = &lines[1];
    let c2 = second["correction"]["correction_deg"].as_f64().unwrap();
    assert!(c2.abs() < 1e-9, "got {c2}");
    let z1 = second["status"]["results"]["screw1"]["z"].as_f64().unwrap();
    let z2 = second["status"]["results"]["screw2"]["z"].as_f64().unwrap();
    assert!((z1 - z2).abs() < 1e-9);
}

#[rstest]
fn json_too_large_keeps_axis() {
    let dir = tempdir().unwrap();
    let cfg = write_valid_config(&dir);

    let out = Command::cargo_bin("rotaxis")
        .unwrap()
        .args(["--json", "--log-level", "error", "--config"])
        .arg(&cfg)
        .args(["adjust", "--tilt-deg", "-4", "--a-start", "0"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let v = &json_lines(&out)[0];
    assert_eq!(v["outcome"], "too_large");
    assert_eq!(v["correction"]["outcome"], "too_large");
    assert_eq!(v["a_position"].as_f64(), Some(0.0));
    assert_eq!(
        v["messages"].as_array().unwrap().last().unwrap(),
        "a_correction too large, not moving axis!"
    );
}

#[rstest]
fn json_disabled_has_null_correction() {
    let dir = tempdir().unwrap();
    let cfg = write_valid_config(&dir);

    let out = Command::cargo_bin("rotaxis")
        .unwrap()
        .args(["--json", "--log-level", "error", "--config"])
        .arg(&cfg)
        .args(["adjust", "--disabled"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let v = &json_lines(&out)[0];
    assert_eq!(v["outcome"], "motor_disabled");
    assert!(v["correction"].is_null());
    assert_eq!(v["status"], serde_json::json!({ "results": {} }));
}

/// Errors go to stderr as one JSON object with a stable reason and exit code.
#[rstest]
#[case(&["adjust", "SPEED=0"], 5, "Hardware")]
#[case(&["adjust", "SPEED"], 1, "Error")]
fn json_error_schema(#[case] args: &[&str], #[case] code: i32, #[case] reason: &str) {
    let dir = tempdir().unwrap();
    let cfg = write_valid_config(&dir);

    let out = Command::cargo_bin("rotaxis")
        .unwrap()
        .args(["--json", "--log-level", "off", "--config"])
        .arg(&cfg)
        .args(args)
        .assert()
        .code(code)
        .get_output()
        .stderr
        .clone();
    let v = json_lines(&out)
        .into_iter()
        .find(|v| v.get("reason").is_some())
        .expect("error object on stderr");
    assert_eq!(v["reason"], reason);
    assert_eq!(v["exit_code"], code);
    assert!(v["message"].as_str().is_some_and(|m| !m.is_empty()));
    assert!(v["messages"].is_array());
}

/// `--repeat 0` runs once, and a failing run is named against the clamped count.
#[rstest]
fn json_error_names_run_against_clamped_repeat() {
    let dir = tempdir().unwrap();
    let cfg = write_valid_config(&dir);

    let out = Command::cargo_bin("rotaxis")
        .unwrap()
        .args(["--json", "--log-level", "off", "--config"])
        .arg(&cfg)
        .args(["adjust", "--repeat", "0", "SPEED=0"])
        .assert()
        .code(5)
        .get_output()
        .stderr
        .clone();
    let v = json_lines(&out)
        .into_iter()
        .find(|v| v.get("reason").is_some())
        .expect("error object on stderr");
    let error = v["error"].as_str().unwrap();
    assert!(error.starts_with("run 1 of 1"), "got {error}");
}

#[rstest]
fn json_check_config_lists_points() {
    let dir = tempdir().unwrap();
    let cfg = write_valid_config(&dir);

    let out = Command::cargo_bin("rotaxis")
        .unwrap()
        .args(["--json", "--config"])
        .arg(&cfg)
        .arg("check-config")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let v = &json_lines(&out)[0];
    assert_eq!(v["ok"], true);
    assert_eq!(v["points"][0]["name"], "pos at 50.000,100.000");
    assert_eq!(v["points"][1]["y"].as_f64(), Some(10.0));
    assert_eq!(v["stepper"], "stepper_a");
}
