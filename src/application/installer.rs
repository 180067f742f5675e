//! Container runtime and compose tool installation
//!
//! Docker already on the search path means nothing is installed. Otherwise
//! the selected branch runs; the generic branch first probes for a package
//! manager. Compose is then resolved by the cheapest route available.

use serde::Serialize;
use tracing::{info, warn};

use crate::domain::ports::{CommandRunner, CommandSpec};
use crate::domain::services::install_plan::{
    branch_commands, compose_download_url, generic_commands,
};
use crate::domain::services::{select_branch, InstallBranch, PackageManager, PlannedCommand};
use crate::domain::value_objects::EnvironmentDescriptor;
use crate::error::{ProvisionError, ProvisionResult};

use super::progress::ProgressReporter;

pub const COMPOSE_BINARY: &str = "/usr/local/bin/docker-compose";

/// How `docker compose` ended up available
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ComposeTool {
    /// `docker compose` plugin was already there
    Plugin,
    /// Standalone `docker-compose` was already on the path
    Standalone,
    /// Plugin installed through the package manager
    InstalledPlugin,
    /// Standalone binary downloaded from upstream releases
    Downloaded,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallReport {
    /// `None` when the runtime was already installed
    pub branch: Option<InstallBranch>,
    pub compose: ComposeTool,
    pub account: String,
}

/// Make sure the runtime and a compose tool exist
pub fn ensure_runtime_installed<R: CommandRunner + ?Sized>(
    runner: &R,
    env: &EnvironmentDescriptor,
    account: &str,
    progress: &ProgressReporter,
) -> ProvisionResult<InstallReport> {
    let branch = if runner.which("docker") {
        info!("docker already installed; skipping runtime installation");
        None
    } else {
        let branch = select_branch(env);
        install_runtime(runner, env, branch, progress)?;
        Some(branch)
    };

    grant_runtime_access(runner, account, progress)?;
    let compose = ensure_compose(runner, env, progress)?;

    Ok(InstallReport {
        branch,
        compose,
        account: account.to_string(),
    })
}

fn install_runtime<R: CommandRunner + ?Sized>(
    runner: &R,
    env: &EnvironmentDescriptor,
    branch: InstallBranch,
    progress: &ProgressReporter,
) -> ProvisionResult<()> {
    if env.is_unknown() {
        progress.warn(
            ProvisionError::EnvironmentUnknown {
                detail: env.to_string(),
            }
            .to_string(),
        );
    }

    let commands = match branch {
        InstallBranch::Generic => {
            let manager = probe_package_manager(runner).ok_or_else(|| {
                ProvisionError::InstallationFailure {
                    step: branch.name().to_string(),
                    message: "no supported package manager found (dnf, yum, apt-get)".to_string(),
                    output: String::new(),
                }
            })?;
            info!("Generic install through {}", manager.binary());
            generic_commands(manager)
        }
        fixed => branch_commands(fixed, env),
    };

    info!("Installing container runtime ({} branch)", branch);
    run_plan(runner, branch.name(), &commands, progress)?;

    if !runner.which("docker") {
        return Err(ProvisionError::InstallationFailure {
            step: branch.name().to_string(),
            message: "docker is still not on the search path after installation".to_string(),
            output: String::new(),
        });
    }
    Ok(())
}

fn run_plan<R: CommandRunner + ?Sized>(
    runner: &R,
    step: &str,
    commands: &[PlannedCommand],
    progress: &ProgressReporter,
) -> ProvisionResult<()> {
    for command in commands {
        let spec = CommandSpec::new(command.line.as_str()).with_spinner("Installing packages");
        if command.tolerated {
            let result = runner.execute(&spec, false)?;
            if !result.succeeded {
                progress.warn(format!(
                    "'{}' exited {}; continuing",
                    command.line, result.exit_code
                ));
            }
        } else {
            runner
                .execute(&spec, true)
                .map_err(|e| ProvisionError::installation(step, e))?;
        }
    }
    Ok(())
}

pub fn probe_package_manager<R: CommandRunner + ?Sized>(runner: &R) -> Option<PackageManager> {
    PackageManager::PROBE_ORDER
        .into_iter()
        .find(|pm| runner.which(pm.binary()))
}

/// Group membership takes effect on the next login
fn grant_runtime_access<R: CommandRunner + ?Sized>(
    runner: &R,
    account: &str,
    progress: &ProgressReporter,
) -> ProvisionResult<()> {
    let result = runner.tolerate(&format!("sudo usermod -aG docker {}", account))?;
    if !result.succeeded {
        progress.warn(format!(
            "could not add '{}' to the docker group; privileged fallbacks will be used",
            account
        ));
    }
    Ok(())
}

fn ensure_compose<R: CommandRunner + ?Sized>(
    runner: &R,
    env: &EnvironmentDescriptor,
    progress: &ProgressReporter,
) -> ProvisionResult<ComposeTool> {
    if runner.tolerate("docker compose version")?.succeeded {
        info!("Compose plugin available");
        return Ok(ComposeTool::Plugin);
    }
    if runner.which("docker-compose") {
        info!("Standalone docker-compose available");
        return Ok(ComposeTool::Standalone);
    }

    let available = PackageManager::PROBE_ORDER
        .into_iter()
        .filter(|pm| runner.which(pm.binary()));
    for manager in available {
        let result = runner.tolerate(&manager.install_line("docker-compose-plugin"))?;
        if !result.succeeded {
            warn!("Compose plugin package not available through {}", manager.binary());
        }
        if runner.tolerate("docker compose version")?.succeeded {
            info!("Compose plugin installed");
            return Ok(ComposeTool::InstalledPlugin);
        }
    }

    progress.warn("compose plugin unavailable; downloading the standalone binary");
    let url = compose_download_url(env.architecture);
    let download = CommandSpec::new(format!("sudo curl -fsSL {} -o {}", url, COMPOSE_BINARY))
        .with_spinner("Downloading docker-compose");
    runner
        .execute(&download, true)
        .and_then(|_| runner.require(&format!("sudo chmod +x {}", COMPOSE_BINARY)))
        .map_err(|e| ProvisionError::installation("compose-download", e))?;

    Ok(ComposeTool::Downloaded)
}

/// Account added to the `docker` group: configured, else the invoking user
pub fn resolve_account(configured: Option<&str>, get_env: impl Fn(&str) -> Option<String>) -> String {
    let present = |value: Option<String>| value.filter(|a| !a.trim().is_empty());
    present(configured.map(str::to_string))
        .or_else(|| present(get_env("SUDO_USER")))
        .or_else(|| present(get_env("USER")))
        .or_else(|| present(get_env("LOGNAME")))
        .unwrap_or_else(|| "ec2-user".to_string())
}
