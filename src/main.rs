//! quickstack CLI - web stack provisioning for fresh Linux hosts
//!
//! Usage: quickstack [COMMAND]
//!
//! Commands:
//!   provision     Install the runtime, write the stack and start it (default)
//!   enable-https  Obtain a certificate and switch the proxy to HTTPS
//!   detect        Print the detected environment and install branch

mod cli;
mod commands;

use anyhow::{Context, Result};
use clap::Parser;

use cli::{Cli, Commands};

fn main() -> Result<()> {
    let cli = Cli::parse();

    ctrlc::set_handler(|| {
        let _ = crossterm::execute!(std::io::stderr(), crossterm::cursor::Show);
        eprintln!("\nInterrupted. Re-running is safe: existing credentials and files are reused.");
        std::process::exit(130);
    })
    .context("setting Ctrl+C handler")?;

    match &cli.command {
        None => commands::provision::cmd_provision(&cli, None, None),
        Some(Commands::Provision { profile, account }) => {
            commands::provision::cmd_provision(&cli, *profile, account.clone())
        }
        Some(Commands::EnableHttps {
            domain,
            email,
            client,
            staging,
        }) => commands::enable_https::cmd_enable_https(
            &cli,
            domain.clone(),
            email.clone(),
            *client,
            *staging,
        ),
        Some(Commands::Detect) => commands::detect::cmd_detect(&cli),
    }
}
