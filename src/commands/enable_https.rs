//! Enable HTTPS command handler

use anyhow::Result;

use quickstack::application::{EnableHttpsOptions, EnableHttpsUseCase, ProgressReporter, TlsSettings};
use quickstack::config::TlsClient;
use quickstack::domain::ports::ProvisionEvent;
use quickstack::infrastructure::{LocalFs, RunLock};

use super::RunContext;
use crate::cli::Cli;

pub fn cmd_enable_https(
    cli: &Cli,
    domain: Option<String>,
    email: Option<String>,
    client: Option<TlsClient>,
    staging: bool,
) -> Result<()> {
    let ctx = RunContext::prepare(cli, true)?;
    let _lock = RunLock::acquire(ctx.layout.root())?;

    let mut settings = TlsSettings::from_config(&ctx.config);
    if let Some(client) = client {
        settings.client = client;
    }
    settings.staging |= staging;

    let mut options = EnableHttpsOptions::new(ctx.layout.clone());
    options.domain = domain.or_else(|| ctx.config.tls.domain.clone());
    options.email = email.or_else(|| ctx.config.tls.email.clone());
    options.settings = settings;
    options.interactive = ctx.interactive;
    options.assume_yes = cli.yes;

    let runner = ctx.runner();
    let fs = LocalFs::new();
    let prompt = ctx.prompt();
    let mut progress = ProgressReporter::new(ctx.sink(), EnableHttpsUseCase::STEPS);
    progress.emit(ProvisionEvent::Started {
        command: "enable-https".to_string(),
        total_steps: EnableHttpsUseCase::STEPS,
    });

    let result =
        EnableHttpsUseCase::new(&runner, &fs, prompt.as_ref()).execute(&options, &mut progress);
    progress.emit(ProvisionEvent::Completed {
        success: result.is_ok(),
        summary_path: Some(ctx.layout.summary_file().display().to_string()),
    });
    let result = result?;

    if !ctx.json {
        println!();
        if result.is_complete() {
            println!("HTTPS enabled: https://{}", result.domain);
        } else {
            println!(
                "Certificate issued and config updated, but the proxy did not restart. Run 'docker compose up -d --force-recreate --no-deps nginx' in {}.",
                ctx.layout.root().display()
            );
        }
    }
    Ok(())
}
