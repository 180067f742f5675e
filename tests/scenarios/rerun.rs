//! Scenario: Re-running on a Provisioned Host
//!
//! Journey: the operator runs quickstack a second time, e.g. after an
//! interrupted first run or to pick up a newer template.
//!
//! Success Criteria:
//! - Nothing is reinstalled
//! - `.env` keeps every value byte for byte and is re-secured
//! - Values the operator set by hand survive

use std::fs;
use std::os::unix::fs::PermissionsExt;

use quickstack::domain::value_objects::Profile;
use tempfile::tempdir;

use crate::common::*;

/// SCENARIO: second run on the same host
#[test]
fn scenario_second_run_is_idempotent() {
    let dir = tempdir().unwrap();
    let runner = fresh_host();
    let env = amazon_2023_arm();

    let first = provision_into(dir.path(), &env, &runner, Profile::Dynamic).unwrap();
    let dotenv_before = fs::read(dir.path().join(".env")).unwrap();
    let compose_before = fs::read_to_string(dir.path().join("docker-compose.yml")).unwrap();
    let installs_before = runner.count_matching("dnf -y install");

    // Someone loosened the permissions in between
    fs::set_permissions(dir.path().join(".env"), fs::Permissions::from_mode(0o644)).unwrap();

    let second = provision_into(dir.path(), &env, &runner, Profile::Dynamic).unwrap();

    assert_eq!(second.branch, None);
    assert_eq!(runner.count_matching("dnf -y install"), installs_before);
    assert_eq!(fs::read(dir.path().join(".env")).unwrap(), dotenv_before);
    assert_eq!(mode(&dir.path().join(".env")), 0o600);
    assert_eq!(first.credentials, second.credentials);
    assert_eq!(
        fs::read_to_string(dir.path().join("docker-compose.yml")).unwrap(),
        compose_before
    );
}

/// SCENARIO: operator edited a password, then switched from static to php
#[test]
fn scenario_hand_edited_secret_survives() {
    let dir = tempdir().unwrap();
    fs::write(
        dir.path().join(".env"),
        "# managed by hand\nMYSQL_ROOT_PASSWORD=operator-chosen-root-pw\n",
    )
    .unwrap();
    let runner = ready_host();

    let report = provision_into(dir.path(), &ubuntu_x86(), &runner, Profile::Dynamic).unwrap();

    assert_eq!(
        report.credentials.get("MYSQL_ROOT_PASSWORD"),
        Some("operator-chosen-root-pw")
    );
    // The first generated secret goes to the only missing generated name
    assert_eq!(
        report.credentials.get("MYSQL_PASSWORD"),
        Some("AAAAAAAAAAAAAAAAAAAA")
    );
    let dotenv = fs::read_to_string(dir.path().join(".env")).unwrap();
    assert!(dotenv.contains("MYSQL_ROOT_PASSWORD=operator-chosen-root-pw\n"));
}

/// SCENARIO: a corrupt credential store stops the run before files change
#[test]
fn scenario_corrupt_store_stops_run() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join(".env"), "MYSQL_ROOT_PASSWORD=x\nthis is not a pair\n").unwrap();
    let runner = ready_host();

    let err = provision_into(dir.path(), &ubuntu_x86(), &runner, Profile::Dynamic).unwrap_err();

    assert!(err.to_string().contains(".env"), "{err}");
    assert!(!dir.path().join("docker-compose.yml").exists());
    assert_eq!(
        fs::read_to_string(dir.path().join(".env")).unwrap(),
        "MYSQL_ROOT_PASSWORD=x\nthis is not a pair\n"
    );
}
