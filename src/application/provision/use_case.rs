//! Provision Use Case
//!
//! One run, in order:
//! 1. Detect environment
//! 2. Install the container runtime and a compose tool
//! 3. Load or create credentials
//! 4. Write compose file, proxy config and placeholder site
//! 5. Start the stack (failure here only warns)
//! 6. Write the summary
//!
//! The profile is fixed before step 1 and never re-read.

use tracing::{debug, info};

use crate::domain::entities::{PortBinding, Topology};
use crate::domain::ports::{
    CommandRunner, EnvironmentSource, FileSystem, OperatorPrompt, ProvisionEvent,
};
use crate::domain::services::site::{index_file, placeholder_page};
use crate::domain::services::{
    render_proxy_config, render_with, select_branch, tls_domain, to_compose_yaml, ProxyMode,
    SecretGenerator, PROXY_SERVICE,
};
use crate::domain::value_objects::{EnvironmentDescriptor, Profile};
use crate::error::{ProvisionError, ProvisionResult};
use crate::infrastructure::DotenvCredentialStore;

use super::super::activator::StackActivator;
use super::super::credentials::{credential_specs, CredentialManager};
use super::super::installer::ensure_runtime_installed;
use super::super::progress::ProgressReporter;
use super::super::summary::{HostFacts, Summary, SummaryWriter};
use super::options::ProvisionOptions;
use super::result::ProvisionReport;

/// Provision use case - orchestrates one provisioning run
pub struct ProvisionUseCase<'a> {
    environment: &'a dyn EnvironmentSource,
    runner: &'a dyn CommandRunner,
    fs: &'a dyn FileSystem,
    secrets: &'a dyn SecretGenerator,
    prompt: &'a dyn OperatorPrompt,
}

impl<'a> ProvisionUseCase<'a> {
    pub const STEPS: usize = 6;

    pub fn new(
        environment: &'a dyn EnvironmentSource,
        runner: &'a dyn CommandRunner,
        fs: &'a dyn FileSystem,
        secrets: &'a dyn SecretGenerator,
        prompt: &'a dyn OperatorPrompt,
    ) -> Self {
        Self {
            environment,
            runner,
            fs,
            secrets,
            prompt,
        }
    }

    /// Execute and report completion, success or not
    pub fn execute(
        &self,
        options: &ProvisionOptions,
        progress: &mut ProgressReporter,
    ) -> ProvisionResult<ProvisionReport> {
        progress.emit(ProvisionEvent::Started {
            command: "provision".to_string(),
            total_steps: Self::STEPS,
        });
        let result = self.run(options, progress);
        progress.emit(ProvisionEvent::Completed {
            success: result.is_ok(),
            summary_path: result
                .as_ref()
                .ok()
                .map(|r| r.summary_path.display().to_string()),
        });
        result
    }

    fn select_profile(&self, options: &ProvisionOptions) -> ProvisionResult<Profile> {
        match options.profile {
            Some(profile) => Ok(profile),
            None if options.interactive => self.prompt.select_profile(Profile::default()),
            None => Ok(Profile::default()),
        }
    }

    fn run(
        &self,
        options: &ProvisionOptions,
        progress: &mut ProgressReporter,
    ) -> ProvisionResult<ProvisionReport> {
        let profile = self.select_profile(options)?;
        info!("Profile: {}", profile.display_name());
        progress.emit(ProvisionEvent::ProfileSelected { profile });

        let environment = progress.step("Detect environment", |p| {
            let env = self.environment.detect();
            p.emit(ProvisionEvent::Detected {
                environment: env.clone(),
                branch: select_branch(&env).name().to_string(),
            });
            Ok(env)
        })?;

        let install = progress.step("Install container runtime", |p| {
            ensure_runtime_installed(self.runner, &environment, &options.account, p)
        })?;

        let credentials = progress.step("Prepare credentials", |_| {
            let store = DotenvCredentialStore::new(self.fs, options.layout.credentials_file());
            let manager =
                CredentialManager::new(store, self.secrets, options.credentials.secret_length);
            manager.ensure_credentials(&credential_specs(profile, &options.credentials))
        })?;

        let activator = StackActivator::new(options.layout.root());
        let (topology, kept_domain, compose_valid) = progress.step("Write configuration", |p| {
            let (topology, kept_domain) = self.write_configuration(options, profile, &environment)?;
            let valid = activator.validate(self.runner, p)?;
            Ok((topology, kept_domain, valid))
        })?;

        progress.begin("Start containers");
        let activated = activator.activate(self.runner, progress);
        match activator.diagnostics(self.runner) {
            Ok(listing) if activated => debug!("Containers:\n{}", listing),
            Ok(listing) => info!("Containers:\n{}", listing),
            Err(e) => debug!("Container listing unavailable: {}", e),
        }
        progress.finish(activated);

        let summary_path = options.layout.summary_file();
        progress.step("Write summary", |_| {
            let summary = Summary {
                generated_at: chrono::Local::now(),
                host: HostFacts::gather(self.runner),
                environment: environment.clone(),
                profile,
                credentials: credentials.clone(),
                topology: topology.clone(),
                activated,
                app_dir: options.layout.root().to_path_buf(),
                https_domain: kept_domain.clone(),
            };
            SummaryWriter::new(self.fs, &summary_path).write(&summary)
        })?;

        Ok(ProvisionReport {
            environment,
            profile,
            branch: install.branch,
            compose: install.compose,
            credentials,
            topology,
            tls_domain: kept_domain,
            compose_valid,
            activated,
            summary_path,
        })
    }

    /// Compose file, proxy config, site placeholder and challenge webroot.
    ///
    /// An app dir already switched to TLS stays on TLS.
    fn write_configuration(
        &self,
        options: &ProvisionOptions,
        profile: Profile,
        environment: &EnvironmentDescriptor,
    ) -> ProvisionResult<(Topology, Option<String>)> {
        let layout = &options.layout;
        self.fs.create_dir_all(&layout.site_dir())?;
        self.fs.create_dir_all(&layout.acme_webroot())?;

        let mut topology = render_with(profile, environment, &options.templates);
        let kept_domain = if self.fs.exists(&layout.proxy_config()) {
            tls_domain(&self.fs.read(&layout.proxy_config())?)
        } else {
            None
        };
        let mode = match &kept_domain {
            Some(domain) => {
                info!("Keeping HTTPS for {}", domain);
                topology.publish(PROXY_SERVICE, PortBinding::public(443, 443));
                ProxyMode::Tls {
                    domain: domain.clone(),
                }
            }
            None => ProxyMode::Http,
        };

        let manifest = to_compose_yaml(&topology);
        serde_yaml_ng::from_str::<serde_yaml_ng::Value>(&manifest).map_err(|e| {
            ProvisionError::InvalidConfig {
                file: layout.compose_file(),
                message: format!("generated manifest does not parse: {}", e),
            }
        })?;

        self.fs.write(&layout.compose_file(), &manifest)?;
        self.fs
            .write(&layout.proxy_config(), &render_proxy_config(profile, &mode))?;
        info!("Wrote {}", layout.compose_file().display());

        let index = layout.site_dir().join(index_file(profile));
        let staged = layout.root().join(index_file(profile));
        if self.fs.exists(&index) {
            debug!("Keeping {}", index.display());
        } else if profile == Profile::Dynamic && self.fs.exists(&staged) {
            self.fs.copy(&staged, &index)?;
            info!("Copied {} into the site", staged.display());
        } else {
            self.fs.write(&index, placeholder_page(profile))?;
            info!("Placeholder page at {}", index.display());
        }

        Ok((topology, kept_domain))
    }
}
