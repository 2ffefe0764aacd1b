use std::{
    fs,
    io::Read,
    process::{Command, Stdio},
};

#[test]
fn cli_compiles_without_warnings() {
    let status = Command::new(env!("CARGO"))
        .current_dir(env!("CARGO_MANIFEST_DIR"))
        .args(["check", "--quiet", "--bin", "accuracy-mixer"])
        .status()
        .expect("failed to invoke cargo check for accuracy-mixer CLI binary");

    assert!(
        status.success(),
        "cargo check --bin accuracy-mixer should succeed"
    );
}

#[test]
fn summary_mode_prints_reference_lines() {
    let output = Command::new(env!("CARGO_BIN_EXE_accuracy-mixer"))
        .args(["--mode", "summary"])
        .env("RUST_LOG", "off")
        .output()
        .expect("failed to run accuracy-mixer in summary mode");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(
        lines,
        vec![
            "Grup predominant: 30/35 correctes (85.0%)",
            "Grup minoritari: 10/15 correctes (70.0%)",
            "Total: 80.5%",
        ]
    );
}

#[test]
fn out_of_range_weight_exits_with_error() {
    let output = Command::new(env!("CARGO_BIN_EXE_accuracy-mixer"))
        .args(["--mode", "summary", "--predominant-weight", "1.5"])
        .env("RUST_LOG", "off")
        .output()
        .expect("failed to run accuracy-mixer with an invalid weight");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("predominant_weight"), "stderr: {stderr}");
}

#[test]
fn command_line_flag_overrides_invalid_config_value() {
    let path = std::env::temp_dir().join(format!(
        "accuracy_mixer_override_{}.toml",
        std::process::id()
    ));
    fs::write(&path, "[inputs]\nminority_accuracy = 120.0\n").expect("write config");

    let output = Command::new(env!("CARGO_BIN_EXE_accuracy-mixer"))
        .args(["--mode", "summary", "--minority-accuracy", "50"])
        .arg("--config")
        .arg(&path)
        .env("RUST_LOG", "off")
        .output()
        .expect("failed to run accuracy-mixer with a config file");
    let _ = fs::remove_file(&path);

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(output.status.success(), "stderr: {stderr}");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.contains("Grup minoritari: 8/15 correctes (50.0%)"),
        "stdout: {stdout}"
    );
}

#[test]
fn closed_stdout_does_not_panic() {
    let mut child = Command::new(env!("CARGO_BIN_EXE_accuracy-mixer"))
        .args(["--mode", "scene"])
        .env("RUST_LOG", "off")
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("failed to spawn accuracy-mixer in scene mode");
    drop(child.stdout.take());

    let mut stderr = String::new();
    let _ = child
        .stderr
        .take()
        .expect("stderr is piped")
        .read_to_string(&mut stderr)
        .expect("read stderr");
    let _ = child.wait().expect("wait for accuracy-mixer");

    assert!(!stderr.contains("panicked"), "stderr: {stderr}");
}
