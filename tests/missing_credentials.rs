use std::process::Command;

#[test]
fn fails_fast_when_credentials_are_missing() {
    let bin = env!("CARGO_BIN_EXE_vco-clone");
    let output = Command::new(bin)
        .env_remove("VC_USERNAME")
        .env_remove("VC_PASSWORD")
        .output()
        .expect("run vco-clone");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("VC_USERNAME"), "stderr: {stderr}");
}

#[test]
fn fails_fast_when_only_username_is_set() {
    let bin = env!("CARGO_BIN_EXE_vco-clone");
    let output = Command::new(bin)
        .env("VC_USERNAME", "operator@example.com")
        .env_remove("VC_PASSWORD")
        .output()
        .expect("run vco-clone");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("VC_PASSWORD"), "stderr: {stderr}");
}
