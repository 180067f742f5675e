//! Scenario: Fresh Host
//!
//! Journey: an operator launches a new arm64 Amazon Linux 2023 instance and
//! provisions the PHP stack without answering any prompts.
//!
//! Success Criteria:
//! - Runtime, compose plugin and stack come up in a fixed command order
//! - arm64 gets the adminer DB UI, bound to loopback
//! - `.env` and the summary are owner-only
//! - An already-provisioned runtime is left alone

use std::fs;
use std::sync::Arc;

use quickstack::application::installer::ComposeTool;
use quickstack::domain::ports::ProvisionEvent;
use quickstack::domain::services::InstallBranch;
use quickstack::domain::value_objects::Profile;
use quickstack::testing::RecordingSink;
use tempfile::tempdir;

use crate::common::*;

/// SCENARIO: arm64 Amazon Linux 2023, php profile, nothing installed
#[test]
fn scenario_fresh_arm64_amazon_2023_dynamic() {
    let dir = tempdir().unwrap();
    let runner = fresh_host();

    let report = provision_into(dir.path(), &amazon_2023_arm(), &runner, Profile::Dynamic).unwrap();

    assert_eq!(
        runner.commands(),
        vec![
            "sudo dnf -y update",
            "sudo dnf -y install docker",
            "sudo systemctl enable --now docker",
            "sudo usermod -aG docker ec2-user",
            "docker compose version",
            "sudo dnf -y install docker-compose-plugin",
            "docker compose version",
            "docker compose config -q || sudo docker-compose config -q",
            "docker compose up -d",
            "docker ps -a || sudo docker ps -a",
            "curl -s --max-time 2 http://169.254.169.254/latest/meta-data/public-ipv4",
            "hostname",
        ]
    );
    assert_eq!(report.branch, Some(InstallBranch::AmazonLinux2023));
    assert_eq!(report.compose, ComposeTool::InstalledPlugin);
    assert!(report.is_running());

    // arm64 swaps phpmyadmin for adminer
    let compose = fs::read_to_string(dir.path().join("docker-compose.yml")).unwrap();
    assert!(compose.contains("  adminer:\n"), "{compose}");
    assert!(compose.contains("\"127.0.0.1:8080:8080\""));
    assert!(!compose.contains("phpmyadmin"));
    assert!(!compose.contains("AAAAAAAA"), "secrets must stay in .env");

    let env_file = dir.path().join(".env");
    assert_eq!(mode(&env_file), 0o600);
    let dotenv = fs::read_to_string(&env_file).unwrap();
    assert!(dotenv.contains("MYSQL_ROOT_PASSWORD=AAAAAAAAAAAAAAAAAAAA\n"));
    assert!(dotenv.contains("MYSQL_DATABASE=appdb\n"));
    assert!(dotenv.contains("MYSQL_USER=appuser\n"));
    assert!(dotenv.contains("MYSQL_PASSWORD=BBBBBBBBBBBBBBBBBBBB\n"));

    let summary_path = dir.path().join("README_SECURE.txt");
    assert_eq!(report.summary_path, summary_path);
    assert_eq!(mode(&summary_path), 0o600);
    let summary = fs::read_to_string(&summary_path).unwrap();
    assert!(summary.contains("Public IP: 203.0.113.7"));
    assert!(summary.contains("Hostname:  ip-10-0-0-5"));
    assert!(summary.contains("80 -> nginx"));
    assert!(summary.contains("8080 -> adminer (127.0.0.1 only)"));
    assert!(summary.contains("\"MYSQL_ROOT_PASSWORD\": \"AAAAAAAAAAAAAAAAAAAA\""));

    assert!(dir.path().join("www/index.php").exists());
    assert!(dir.path().join("certbot/www").is_dir());
    assert!(dir.path().join("nginx/conf.d/default.conf").exists());
}

/// SCENARIO: docker and the compose plugin are already there
#[test]
fn scenario_runtime_already_present_installs_nothing() {
    let dir = tempdir().unwrap();
    let runner = ready_host();

    let report = provision_into(dir.path(), &ubuntu_x86(), &runner, Profile::Dynamic).unwrap();

    assert_eq!(report.branch, None);
    assert_eq!(report.compose, ComposeTool::Plugin);
    assert_eq!(runner.count_matching("apt-get"), 0);
    assert_eq!(runner.count_matching("install"), 0);
    assert!(runner.ran("sudo usermod -aG docker ec2-user"));
    assert!(report.topology.service("phpmyadmin").is_some());
}

/// SCENARIO: static profile has no database and no credentials
#[test]
fn scenario_static_site_has_no_credentials() {
    let dir = tempdir().unwrap();
    let runner = ready_host();

    let report = provision_into(dir.path(), &ubuntu_x86(), &runner, Profile::Static).unwrap();

    assert!(report.credentials.is_empty());
    assert_eq!(report.topology.services.len(), 1);
    let summary = fs::read_to_string(&report.summary_path).unwrap();
    assert!(summary.contains("(none for this profile)"));
    assert!(!summary.contains("8080"));
    assert!(dir.path().join("www/index.html").exists());
}

/// SCENARIO: the daemon refuses every start attempt
#[test]
fn scenario_start_failure_is_reported_not_fatal() {
    let dir = tempdir().unwrap();
    let runner = ready_host().respond("up -d", 1, "permission denied while trying to connect");
    let sink = RecordingSink::default();

    let report = provision_with_sink(
        dir.path(),
        &ubuntu_x86(),
        &runner,
        Profile::Dynamic,
        Arc::new(sink.clone()),
    )
    .unwrap();

    assert!(!report.is_running());
    assert_eq!(runner.count_matching("up -d"), 3);
    assert!(runner.ran("sudo docker-compose up -d --remove-orphans --build"));
    assert!(dir.path().join("docker-compose.yml").exists());
    let summary = fs::read_to_string(&report.summary_path).unwrap();
    assert!(summary.contains("NOT STARTED"));

    let attempts = sink
        .events()
        .into_iter()
        .filter(|e| matches!(e, ProvisionEvent::AttemptFinished { succeeded: false, .. }))
        .count();
    assert_eq!(attempts, 3);
    assert!(matches!(
        sink.events().last(),
        Some(ProvisionEvent::Completed { success: true, .. })
    ));
}
