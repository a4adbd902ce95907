use std::path::PathBuf;
use std::process::Command;

fn temp_path(label: &str) -> PathBuf {
    std::env::temp_dir().join(format!(
        "tidecast-cli-{label}-{}",
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos()
    ))
}

fn fixture_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("tuning")
}

#[test]
fn cli_list_policies_writes_output() {
    let exe = env!("CARGO_BIN_EXE_tidecast-tester");
    let output_path = temp_path("list");
    let status = Command::new(exe)
        .args(["--list-policies", "--output"])
        .arg(&output_path)
        .status()
        .expect("run cli");
    assert!(status.success());
    let content = std::fs::read_to_string(output_path).expect("read output");
    assert!(content.contains("Available policies"));
    for key in ["idle", "hold", "tracker", "jittery"] {
        assert!(content.contains(key), "missing {key}");
    }
}

#[test]
fn cli_json_report_on_stdout_is_parseable() {
    let exe = env!("CARGO_BIN_EXE_tidecast-tester");
    let output = Command::new(exe)
        .args(["--report", "json", "--policies", "tracker,idle", "--seeds", "3,4", "--iterations", "2"])
        .output()
        .expect("run cli");
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json report");
    assert_eq!(report["summaries"].as_array().map(Vec::len), Some(2));
    assert_eq!(report["runs"].as_array().map(Vec::len), Some(8));
    assert_eq!(report["seeds"], serde_json::json!([3, 4]));
}

#[test]
fn cli_uses_tuning_dir_tables() {
    let exe = env!("CARGO_BIN_EXE_tidecast-tester");
    let output_path = temp_path("tuning.json");
    let status = Command::new(exe)
        .args(["--report", "json", "--policies", "hold", "--rod", "carbon_rod", "--iterations", "6"])
        .arg("--tuning-dir")
        .arg(fixture_dir())
        .arg("--output")
        .arg(&output_path)
        .status()
        .expect("run cli");
    assert!(status.success());
    let content = std::fs::read_to_string(output_path).expect("read output");
    let report: serde_json::Value = serde_json::from_str(&content).expect("json report");
    assert_eq!(report["loadout"]["rodId"], "carbon_rod");
    let runs = report["runs"].as_array().expect("runs");
    assert!(runs.iter().all(|run| {
        matches!(run["fish_id"].as_str(), Some("bluegill" | "pike"))
    }));
}

#[test]
fn cli_rejects_malformed_tuning() {
    let exe = env!("CARGO_BIN_EXE_tidecast-tester");
    let dir = temp_path("broken");
    std::fs::create_dir_all(&dir).expect("create dir");
    std::fs::write(dir.join("worlds.json"), "{\"worlds\": [").expect("write fixture");
    let output = Command::new(exe)
        .args(["--report", "json", "--iterations", "1", "--tuning-dir"])
        .arg(&dir)
        .output()
        .expect("run cli");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("failed to load tuning"), "{stderr}");
}

#[test]
fn cli_rejects_unknown_policies() {
    let exe = env!("CARGO_BIN_EXE_tidecast-tester");
    let output = Command::new(exe)
        .args(["--report", "csv", "--policies", "greedy"])
        .output()
        .expect("run cli");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Unknown policy"));
}
