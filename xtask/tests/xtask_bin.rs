use std::process::Command;

fn xtask() -> Command {
    Command::new(env!("CARGO_BIN_EXE_xtask"))
}

#[test]
fn xtask_help_runs() {
    let output = xtask().arg("help").output().expect("run xtask");

    assert!(output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("xtask commands"));
}

#[test]
fn explain_coverage_passes() {
    let output = xtask().arg("explain-coverage").output().expect("run xtask");
    assert!(
        output.status.success(),
        "{}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(String::from_utf8_lossy(&output.stdout).contains("6 codes have explanations"));
}

#[test]
fn conform_flags_malformed_report() {
    let tmp = tempfile::TempDir::new().expect("temp dir");
    let out = tmp.path().join("com.app/app/1.0");
    std::fs::create_dir_all(&out).expect("mkdir");
    std::fs::write(out.join("compliance_result.json"), r#"{"schema": 7}"#).expect("write");

    let output = xtask()
        .arg("conform")
        .arg(tmp.path())
        .output()
        .expect("run xtask");
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("compliance_result.json"));
}

#[test]
fn conform_requires_reports() {
    let tmp = tempfile::TempDir::new().expect("temp dir");
    let output = xtask()
        .arg("conform")
        .arg(tmp.path())
        .output()
        .expect("run xtask");
    assert!(!output.status.success());
}
