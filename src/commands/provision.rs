//! Provision command handler

use anyhow::Result;

use quickstack::application::{
    resolve_account, ProgressReporter, ProvisionOptions, ProvisionUseCase,
};
use quickstack::domain::services::OsSecretGenerator;
use quickstack::domain::value_objects::Profile;
use quickstack::infrastructure::{HostDetector, LocalFs, RunLock};

use super::RunContext;
use crate::cli::Cli;

pub fn cmd_provision(cli: &Cli, profile: Option<Profile>, account: Option<String>) -> Result<()> {
    let ctx = RunContext::prepare(cli, true)?;
    let _lock = RunLock::acquire(ctx.layout.root())?;

    let account = resolve_account(
        account.as_deref().or(ctx.config.runtime.account.as_deref()),
        |key| std::env::var(key).ok(),
    );
    let mut options = ProvisionOptions::from_config(&ctx.config, ctx.layout.clone(), account);
    if profile.is_some() {
        options.profile = profile;
    }
    options.interactive = ctx.interactive;

    let detector = HostDetector::default();
    let runner = ctx.runner();
    let fs = LocalFs::new();
    let prompt = ctx.prompt();
    let mut progress = ProgressReporter::new(ctx.sink(), ProvisionUseCase::STEPS);

    let report = ProvisionUseCase::new(&detector, &runner, &fs, &OsSecretGenerator, prompt.as_ref())
        .execute(&options, &mut progress)?;

    if !ctx.json {
        println!();
        if report.is_running() {
            println!("Stack is up: {} profile in {}", report.profile.name(), ctx.layout.root().display());
        } else {
            println!(
                "Files are in place but the stack did not start. See {}.",
                ctx.layout.log_file().display()
            );
        }
        println!("Credentials and endpoints: {}", report.summary_path.display());
        if report.branch.is_some() {
            println!("Log out and back in to use docker without sudo.");
        }
    }
    Ok(())
}
