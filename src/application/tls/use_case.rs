//! Enable HTTPS Use Case
//!
//! Drives the TLS state machine for one domain:
//! 1. Check prerequisites and input (`CertPending`)
//! 2. Obtain a certificate over the HTTP-01 webroot (`CertIssued`)
//! 3. Rewrite the proxy config and publish port 443 (`ConfigPatched`)
//! 4. Recreate only the proxy container (`Activated`)
//!
//! Nothing is written before a certificate exists, so a failed issuance
//! leaves the running HTTP stack exactly as it was.

use tracing::{debug, info};

use crate::config::TlsClient;
use crate::domain::ports::{CommandRunner, CommandSpec, FileSystem, OperatorPrompt, ProvisionEvent};
use crate::domain::services::install_plan::PackageManager;
use crate::domain::services::proxy_config::ACME_WEBROOT;
use crate::domain::services::{
    add_https_port, infer_profile, render_proxy_config, PatchOutcome, ProxyMode, PROXY_SERVICE,
};
use crate::error::{ProvisionError, ProvisionResult};

use super::super::activator::StackActivator;
use super::super::layout::AppLayout;
use super::super::progress::ProgressReporter;
use super::super::summary::SummaryWriter;
use super::options::{EnableHttpsOptions, EnableHttpsResult, TlsSettings};
use super::state::{validate_domain, validate_email, TlsState};

const CERTBOT_IMAGE: &str = "certbot/certbot";

#[derive(Debug, Clone, PartialEq, Eq)]
struct TlsRequest {
    domain: String,
    email: String,
}

/// One domain's path through the TLS states
pub struct TlsIssuance<'a> {
    runner: &'a dyn CommandRunner,
    fs: &'a dyn FileSystem,
    layout: AppLayout,
    settings: TlsSettings,
    state: TlsState,
    request: Option<TlsRequest>,
    compose_patched: bool,
}

impl<'a> TlsIssuance<'a> {
    pub fn new(
        runner: &'a dyn CommandRunner,
        fs: &'a dyn FileSystem,
        layout: AppLayout,
        settings: TlsSettings,
    ) -> Self {
        Self {
            runner,
            fs,
            layout,
            settings,
            state: TlsState::NoTls,
            request: None,
            compose_patched: false,
        }
    }

    pub fn state(&self) -> TlsState {
        self.state
    }

    pub fn compose_patched(&self) -> bool {
        self.compose_patched
    }

    fn transition(&mut self, to: TlsState, progress: &ProgressReporter) -> ProvisionResult<()> {
        let from = self.state;
        self.state = from.advance_to(to)?;
        info!("TLS: {} -> {}", from, to);
        progress.emit(ProvisionEvent::TlsTransition {
            from: from.name().to_string(),
            to: to.name().to_string(),
        });
        Ok(())
    }

    fn guard(&self, to: TlsState) -> ProvisionResult<()> {
        self.state.advance_to(to).map(|_| ())
    }

    fn requested(&self) -> ProvisionResult<&TlsRequest> {
        self.request.as_ref().ok_or_else(|| ProvisionError::InvalidTransition {
            from: self.state.name().to_string(),
            to: TlsState::CertIssued.name().to_string(),
        })
    }

    /// `NoTls -> CertPending`: validated input against a provisioned app dir
    pub fn request(
        &mut self,
        domain: &str,
        email: &str,
        progress: &ProgressReporter,
    ) -> ProvisionResult<()> {
        self.guard(TlsState::CertPending)?;
        validate_domain(domain)?;
        validate_email(email)?;

        for path in [self.layout.compose_file(), self.layout.proxy_config()] {
            if !self.fs.exists(&path) {
                return Err(ProvisionError::MissingPrerequisite {
                    path,
                    hint: "Run 'quickstack provision' first.".to_string(),
                });
            }
        }

        self.request = Some(TlsRequest {
            domain: domain.to_string(),
            email: email.to_string(),
        });
        self.transition(TlsState::CertPending, progress)
    }

    /// Certificate client command line for the current request
    pub fn certbot_command(&self) -> ProvisionResult<String> {
        let request = self.requested()?;
        let webroot = self.layout.acme_webroot();
        let (prefix, webroot_arg) = match self.settings.client {
            TlsClient::Container => (
                format!(
                    "sudo docker run --rm -v {}:/etc/letsencrypt -v {}:{} {} certonly",
                    self.settings.letsencrypt_dir.display(),
                    webroot.display(),
                    ACME_WEBROOT,
                    CERTBOT_IMAGE
                ),
                ACME_WEBROOT.to_string(),
            ),
            TlsClient::Host => (
                "sudo certbot certonly".to_string(),
                webroot.display().to_string(),
            ),
        };

        let mut line = format!(
            "{} --webroot -w {} -d {} -d www.{} --email {} --agree-tos --no-eff-email --non-interactive --keep-until-expiring",
            prefix, webroot_arg, request.domain, request.domain, request.email
        );
        if self.settings.staging {
            line.push_str(" --staging");
        }
        Ok(line)
    }

    fn ensure_client(&self) -> ProvisionResult<()> {
        let domain = self.requested()?.domain.clone();
        match self.settings.client {
            TlsClient::Container => {
                if !self.runner.which("docker") {
                    return Err(ProvisionError::CertificateIssuanceFailure {
                        domain,
                        message: "docker is not installed; run 'quickstack provision' first"
                            .to_string(),
                        output: String::new(),
                    });
                }
            }
            TlsClient::Host => {
                if self.runner.which("certbot") {
                    return Ok(());
                }
                if let Some(manager) = PackageManager::PROBE_ORDER
                    .into_iter()
                    .find(|pm| self.runner.which(pm.binary()))
                {
                    self.runner.tolerate(&manager.install_line("certbot"))?;
                }
                if !self.runner.which("certbot") {
                    return Err(ProvisionError::CertificateIssuanceFailure {
                        domain,
                        message: "certbot is not installed and could not be installed".to_string(),
                        output: String::new(),
                    });
                }
            }
        }
        Ok(())
    }

    fn certificate_present(&self, domain: &str) -> ProvisionResult<bool> {
        let dir = self.settings.cert_dir(domain);
        if self.fs.exists(&dir) {
            return Ok(true);
        }
        // live/ is root-only on most hosts
        let probe = self
            .runner
            .tolerate(&format!("sudo test -d {}", dir.display()))?;
        Ok(probe.succeeded)
    }

    /// `CertPending -> CertIssued`: success is exit 0 and a certificate directory
    pub fn issue(&mut self, progress: &ProgressReporter) -> ProvisionResult<()> {
        self.guard(TlsState::CertIssued)?;
        self.ensure_client()?;
        self.fs.create_dir_all(&self.layout.acme_webroot())?;

        let domain = self.requested()?.domain.clone();
        let spec = CommandSpec::new(self.certbot_command()?).with_spinner("Requesting certificate");
        let result = self.runner.execute(&spec, false)?;

        if !result.succeeded {
            return Err(ProvisionError::CertificateIssuanceFailure {
                domain,
                message: format!(
                    "certificate client exited {}; check that DNS points here and port 80 is reachable",
                    result.exit_code
                ),
                output: result.output,
            });
        }
        if !self.certificate_present(&domain)? {
            return Err(ProvisionError::CertificateIssuanceFailure {
                message: format!(
                    "client reported success but {} does not exist",
                    self.settings.cert_dir(&domain).display()
                ),
                domain,
                output: result.output,
            });
        }
        self.transition(TlsState::CertIssued, progress)
    }

    /// `CertIssued -> ConfigPatched`: TLS proxy config plus the 443 mapping
    pub fn patch(&mut self, progress: &ProgressReporter) -> ProvisionResult<()> {
        self.guard(TlsState::ConfigPatched)?;
        let domain = self.requested()?.domain.clone();

        let compose_path = self.layout.compose_file();
        let manifest = self.fs.read(&compose_path)?;
        let profile = infer_profile(&manifest);

        let config = render_proxy_config(profile, &ProxyMode::Tls { domain });
        self.fs.write(&self.layout.proxy_config(), &config)?;
        info!("Proxy config switched to TLS ({})", self.layout.proxy_config().display());

        match add_https_port(&manifest, PROXY_SERVICE) {
            PatchOutcome::Patched(text) => {
                let backup = self.layout.compose_backup();
                self.fs.copy(&compose_path, &backup)?;
                self.fs.write(&compose_path, &text)?;
                self.compose_patched = true;
                info!("Published 443 (backup at {})", backup.display());
            }
            PatchOutcome::AlreadyPresent => {
                debug!("443 already published");
            }
            PatchOutcome::MarkerMissing(marker) => {
                progress.warn(
                    ProvisionError::ConfigPatchTargetMissing {
                        path: compose_path.clone(),
                        marker: marker.to_string(),
                    }
                    .to_string(),
                );
            }
        }

        self.transition(TlsState::ConfigPatched, progress)
    }

    /// `ConfigPatched -> Activated`: recreate the proxy only.
    ///
    /// Returns `false` and stays in `ConfigPatched` when every attempt fails.
    pub fn activate(&mut self, progress: &ProgressReporter) -> ProvisionResult<bool> {
        self.guard(TlsState::Activated)?;
        let activator = StackActivator::new(self.layout.root());
        if !activator.recreate(self.runner, PROXY_SERVICE, progress) {
            return Ok(false);
        }
        self.transition(TlsState::Activated, progress)?;
        Ok(true)
    }
}

/// Enable HTTPS use case
pub struct EnableHttpsUseCase<'a> {
    runner: &'a dyn CommandRunner,
    fs: &'a dyn FileSystem,
    prompt: &'a dyn OperatorPrompt,
}

impl<'a> EnableHttpsUseCase<'a> {
    pub const STEPS: usize = 4;

    pub fn new(
        runner: &'a dyn CommandRunner,
        fs: &'a dyn FileSystem,
        prompt: &'a dyn OperatorPrompt,
    ) -> Self {
        Self { runner, fs, prompt }
    }

    fn resolve(
        &self,
        given: Option<&str>,
        label: &str,
        field: &str,
        interactive: bool,
    ) -> ProvisionResult<String> {
        match given.map(str::trim).filter(|v| !v.is_empty()) {
            Some(value) => Ok(value.to_string()),
            None if interactive => Ok(self.prompt.input(label, None)?.trim().to_string()),
            None => Err(ProvisionError::InvalidInput {
                field: field.to_string(),
                message: format!("required; pass --{} or set it in the config", field),
            }),
        }
    }

    pub fn execute(
        &self,
        options: &EnableHttpsOptions,
        progress: &mut ProgressReporter,
    ) -> ProvisionResult<EnableHttpsResult> {
        let domain = self.resolve(
            options.domain.as_deref(),
            "Domain (e.g. example.com)",
            "domain",
            options.interactive,
        )?;
        let email = self.resolve(
            options.email.as_deref(),
            "Email for expiry notices",
            "email",
            options.interactive,
        )?;

        let mut tls = TlsIssuance::new(
            self.runner,
            self.fs,
            options.layout.clone(),
            options.settings.clone(),
        );

        progress.step("Check prerequisites", |p| tls.request(&domain, &email, p))?;

        if options.interactive && !options.assume_yes {
            let question = format!(
                "{} and www.{} must resolve to this host with port 80 reachable. Continue?",
                domain, domain
            );
            if !self.prompt.confirm(&question, true)? {
                return Err(ProvisionError::Aborted);
            }
        }

        progress.step("Request certificate", |p| tls.issue(p))?;
        progress.step("Update proxy configuration", |p| tls.patch(p))?;

        progress.begin("Restart proxy");
        let activated = tls.activate(progress)?;
        progress.finish(activated);

        let cert_dir = options.settings.cert_dir(&domain);
        SummaryWriter::new(self.fs, options.layout.summary_file()).append_https(&domain, &cert_dir)?;

        Ok(EnableHttpsResult {
            domain,
            state: tls.state(),
            cert_dir,
            compose_patched: tls.compose_patched(),
        })
    }
}
