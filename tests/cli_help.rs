use tempfile::tempdir;

mod common;

use common::quickstack;

#[test]
fn test_help_lists_commands() {
    let home = tempdir().unwrap();
    let output = quickstack(home.path()).arg("--help").output().unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("provision"), "{stdout}");
    assert!(stdout.contains("enable-https"));
    assert!(stdout.contains("detect"));
    assert!(stdout.contains("Run 'quickstack' without arguments to provision interactively."));
}

#[test]
fn test_enable_https_help_mentions_www() {
    let home = tempdir().unwrap();
    let output = quickstack(home.path())
        .args(["enable-https", "--help"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("--domain"));
    assert!(stdout.contains("www.<domain>"));
    assert!(stdout.contains("--staging"));
}

#[test]
fn test_version() {
    let home = tempdir().unwrap();
    let output = quickstack(home.path()).arg("--version").output().unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(
        stdout.trim(),
        format!("quickstack {}", env!("CARGO_PKG_VERSION"))
    );
}
