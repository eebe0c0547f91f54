use std::process::Command;

#[test]
fn headless_round_prints_summary() {
    let output = Command::new(env!("CARGO_BIN_EXE_wave-defence"))
        .args(["--ticks", "600", "--seed", "3"])
        .env("RUST_LOG", "warn")
        .output()
        .expect("failed to launch wave-defence binary");

    assert!(output.status.success(), "wave-defence should exit cleanly");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("ticks      600"), "unexpected summary: {stdout}");
    assert!(stdout.contains("wave       1"));
}

#[test]
fn malformed_config_fails_with_context() {
    let dir = std::env::temp_dir().join(format!("wave-defence-cli-{}", std::process::id()));
    std::fs::create_dir_all(&dir).expect("create temp dir");
    let config = dir.join("broken.toml");
    std::fs::write(&config, "starting_gold = \"lots\"").expect("write config");

    let output = Command::new(env!("CARGO_BIN_EXE_wave-defence"))
        .arg("--config")
        .arg(&config)
        .output()
        .expect("failed to launch wave-defence binary");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("failed to parse config"), "unexpected stderr: {stderr}");
}
