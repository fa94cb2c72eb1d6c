use std::process::Command;

fn scenario_path() -> String {
    format!("{}/../../scenarios/default.toml", env!("CARGO_MANIFEST_DIR"))
}

#[test]
fn default_scenario_runs_to_completion() {
    let output = Command::new(env!("CARGO_BIN_EXE_tempo-defence"))
        .args(["--scenario", &scenario_path(), "--ticks", "400", "--log-filter", "warn"])
        .output()
        .expect("failed to launch tempo-defence binary");

    assert!(output.status.success(), "headless run should succeed");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("Welcome to Tempo Defence."));
    assert!(stdout.contains("rejected placements 0"));
    assert!(stdout.contains("on path"));
}

#[test]
fn missing_scenario_reports_an_error() {
    let output = Command::new(env!("CARGO_BIN_EXE_tempo-defence"))
        .args(["--scenario", "does/not/exist.toml", "--ticks", "1"])
        .output()
        .expect("failed to launch tempo-defence binary");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("failed to read scenario"));
}
