//! Scenario: Enabling HTTPS
//!
//! Journey: after provisioning, the operator points DNS at the host and
//! switches the proxy to HTTPS.
//!
//! Success Criteria:
//! - A failed issuance leaves every file untouched
//! - A successful one patches the proxy and compose file and recreates only nginx
//! - Re-provisioning afterwards keeps HTTPS

use std::fs;

use quickstack::application::{
    AppLayout, EnableHttpsOptions, EnableHttpsResult, EnableHttpsUseCase, ProgressReporter,
    TlsSettings, TlsState,
};
use quickstack::config::TlsClient;
use quickstack::domain::ports::NoPrompt;
use quickstack::domain::value_objects::Profile;
use quickstack::infrastructure::LocalFs;
use quickstack::testing::ScriptedRunner;
use quickstack::{ProvisionError, ProvisionResult};
use tempfile::{tempdir, TempDir};

use crate::common::*;

const DOMAIN: &str = "shop.example.com";

fn provisioned_app() -> (TempDir, AppLayout) {
    let dir = tempdir().unwrap();
    let layout = AppLayout::new(dir.path().join("app"));
    provision_into(layout.root(), &ubuntu_x86(), &ready_host(), Profile::Dynamic).unwrap();
    (dir, layout)
}

fn enable(
    dir: &TempDir,
    layout: &AppLayout,
    runner: &ScriptedRunner,
) -> ProvisionResult<EnableHttpsResult> {
    let mut options = EnableHttpsOptions::new(layout.clone());
    options.domain = Some(DOMAIN.to_string());
    options.email = Some("ops@example.com".to_string());
    options.settings = TlsSettings {
        client: TlsClient::Container,
        letsencrypt_dir: dir.path().join("letsencrypt"),
        staging: false,
    };
    EnableHttpsUseCase::new(runner, &LocalFs, &NoPrompt).execute(
        &options,
        &mut ProgressReporter::silent(EnableHttpsUseCase::STEPS),
    )
}

/// SCENARIO: port 80 is firewalled, so the CA cannot reach the challenge
#[test]
fn scenario_unreachable_port_leaves_files_untouched() {
    let (dir, layout) = provisioned_app();
    let proxy_before = fs::read(layout.proxy_config()).unwrap();
    let compose_before = fs::read(layout.compose_file()).unwrap();
    let runner = ScriptedRunner::new().with_program("docker").respond(
        "certbot/certbot",
        1,
        "Timeout during connect (likely firewall problem)",
    );

    let err = enable(&dir, &layout, &runner).unwrap_err();

    match err {
        ProvisionError::CertificateIssuanceFailure { domain, output, .. } => {
            assert_eq!(domain, DOMAIN);
            assert!(output.contains("likely firewall problem"));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(fs::read(layout.proxy_config()).unwrap(), proxy_before);
    assert_eq!(fs::read(layout.compose_file()).unwrap(), compose_before);
    assert!(!layout.compose_backup().exists());
    assert!(!runner.ran("--force-recreate"));
}

/// SCENARIO: DNS is right and the certificate is issued
#[test]
fn scenario_https_enabled_then_kept_on_reprovision() {
    let (dir, layout) = provisioned_app();
    fs::create_dir_all(dir.path().join("letsencrypt/live").join(DOMAIN)).unwrap();
    let compose_before = fs::read_to_string(layout.compose_file()).unwrap();
    let runner = ScriptedRunner::new().with_program("docker");

    let result = enable(&dir, &layout, &runner).unwrap();

    assert!(result.is_complete());
    assert_eq!(result.state, TlsState::Activated);
    assert!(result.compose_patched);

    let issued = runner
        .commands()
        .into_iter()
        .find(|c| c.contains("certbot/certbot"))
        .unwrap();
    assert!(issued.contains(&format!("-d {} -d www.{}", DOMAIN, DOMAIN)));
    assert!(issued.contains("--webroot -w /var/www/certbot"));
    assert!(!issued.contains("--staging"));
    assert!(runner.ran("docker compose up -d --force-recreate --no-deps nginx"));
    assert_eq!(runner.count_matching("up -d"), 1);

    let proxy = fs::read_to_string(layout.proxy_config()).unwrap();
    assert!(proxy.contains("listen 443 ssl http2;"));
    assert!(proxy.contains(&format!("/etc/letsencrypt/live/{}/fullchain.pem", DOMAIN)));
    assert!(proxy.contains("return 301 https://$host$request_uri;"));
    let compose = fs::read_to_string(layout.compose_file()).unwrap();
    assert_eq!(compose.matches("\"443:443\"").count(), 1);
    assert_eq!(
        fs::read_to_string(layout.compose_backup()).unwrap(),
        compose_before
    );
    let summary = fs::read_to_string(layout.summary_file()).unwrap();
    assert!(summary.contains(&format!("https://{}", DOMAIN)));

    // A later provisioning run must not fall back to plain HTTP
    let report =
        provision_into(layout.root(), &ubuntu_x86(), &ready_host(), Profile::Dynamic).unwrap();
    assert_eq!(report.tls_domain.as_deref(), Some(DOMAIN));
    let proxy = fs::read_to_string(layout.proxy_config()).unwrap();
    assert!(proxy.contains("listen 443 ssl http2;"));
    let compose = fs::read_to_string(layout.compose_file()).unwrap();
    assert_eq!(compose.matches("\"443:443\"").count(), 1);
    let summary = fs::read_to_string(layout.summary_file()).unwrap();
    assert!(summary.contains("443 -> nginx"), "{summary}");
    assert!(summary.contains(&format!("https://{}", DOMAIN)));

    // Enabling again refreshes the HTTPS section instead of adding one
    enable(&dir, &layout, &runner).unwrap();
    let summary = fs::read_to_string(layout.summary_file()).unwrap();
    assert_eq!(summary.matches("\nHTTPS\n").count(), 1, "{summary}");
}

/// SCENARIO: enable-https on a host that was never provisioned
#[test]
fn scenario_https_before_provision_is_refused() {
    let dir = tempdir().unwrap();
    let layout = AppLayout::new(dir.path().join("app"));
    let runner = ScriptedRunner::new().with_program("docker");

    let err = enable(&dir, &layout, &runner).unwrap_err();

    assert!(matches!(err, ProvisionError::MissingPrerequisite { .. }));
    assert!(err.to_string().contains("quickstack provision"));
    assert!(runner.commands().is_empty());
}
