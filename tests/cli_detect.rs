use tempfile::tempdir;

mod common;

use common::quickstack;

const BRANCHES: [&str; 4] = [
    "amazon-linux-2023",
    "amazon-linux",
    "debian-family",
    "generic",
];

#[test]
fn test_detect_json_reports_branch() {
    let home = tempdir().unwrap();
    let output = quickstack(home.path())
        .args(["detect", "--json"])
        .output()
        .unwrap();

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(output.status.success(), "stderr: {stderr}");

    let stdout = String::from_utf8_lossy(&output.stdout);
    let value: serde_json::Value = serde_json::from_str(stdout.trim()).unwrap();
    let branch = value["branch"].as_str().unwrap();
    assert!(BRANCHES.contains(&branch), "unexpected branch {branch}");
    assert!(value["environment"]["architecture"].is_string());
    assert!(value["commands"].is_array());
}

#[test]
fn test_detect_plain_output() {
    let home = tempdir().unwrap();
    let output = quickstack(home.path()).arg("detect").output().unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Install branch:"), "{stdout}");
}

#[test]
fn test_unknown_config_key_warns() {
    let home = tempdir().unwrap();
    let config = home.path().join("quickstack.toml");
    std::fs::write(&config, "[credentials]\nsecret_lenght = 24\n").unwrap();

    let output = quickstack(home.path())
        .arg("detect")
        .arg("--config")
        .arg(&config)
        .output()
        .unwrap();

    assert!(output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("did you mean 'secret_length'?"), "{stderr}");
}

#[test]
fn test_invalid_env_override_warns() {
    let home = tempdir().unwrap();
    let output = quickstack(home.path())
        .arg("detect")
        .env("PROFILE", "phpp")
        .env("QUICKSTACK_SECRET_LENGTH", "abc")
        .output()
        .unwrap();

    assert!(output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Invalid PROFILE value 'phpp'"), "{stderr}");
    assert!(stderr.contains("did you mean 'php'?"), "{stderr}");
    assert!(stderr.contains("QUICKSTACK_SECRET_LENGTH='abc'"), "{stderr}");
}
