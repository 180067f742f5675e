//! Stack activation
//!
//! Brings the compose project up through a privilege and tool cascade:
//! the plugin as the current user, the standalone tool as the current user,
//! then the standalone tool under sudo. The first success wins.

use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::domain::ports::{CommandRunner, CommandSpec};
use crate::error::{ProvisionError, ProvisionResult};

use super::cascade::{CascadeOutcome, StrategyCascade};
use super::progress::ProgressReporter;

pub struct StackActivator {
    app_dir: PathBuf,
}

impl StackActivator {
    pub fn new(app_dir: impl AsRef<Path>) -> Self {
        Self {
            app_dir: app_dir.as_ref().to_path_buf(),
        }
    }

    /// Attempt lines for starting the whole stack
    pub fn start_cascade(&self) -> StrategyCascade {
        self.cascade(
            [
                "docker compose up -d",
                "docker-compose up -d",
                "sudo docker-compose up -d --remove-orphans --build",
            ],
            "Starting containers",
        )
    }

    /// Attempt lines for recreating one service with the others untouched
    pub fn recreate_cascade(&self, service: &str) -> StrategyCascade {
        let tail = format!("up -d --force-recreate --no-deps {}", service);
        self.cascade(
            [
                format!("docker compose {}", tail),
                format!("docker-compose {}", tail),
                format!("sudo docker-compose {}", tail),
            ],
            &format!("Restarting {}", service),
        )
    }

    fn cascade<I, S>(&self, lines: I, label: &str) -> StrategyCascade
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        lines.into_iter().fold(StrategyCascade::new(), |cascade, line| {
            cascade.then(
                CommandSpec::new(line)
                    .in_dir(&self.app_dir)
                    .with_spinner(label),
            )
        })
    }

    /// Start the stack; `false` after a surfaced `ActivationFailure` warning
    pub fn activate<R: CommandRunner + ?Sized>(
        &self,
        runner: &R,
        progress: &ProgressReporter,
    ) -> bool {
        let outcome = self.start_cascade().run(runner, progress);
        report(&outcome, progress)
    }

    /// Recreate only `service`, e.g. the proxy after a config change
    pub fn recreate<R: CommandRunner + ?Sized>(
        &self,
        runner: &R,
        service: &str,
        progress: &ProgressReporter,
    ) -> bool {
        let outcome = self.recreate_cascade(service).run(runner, progress);
        report(&outcome, progress)
    }

    /// `docker compose config -q` as a pre-flight check; never fatal
    pub fn validate<R: CommandRunner + ?Sized>(
        &self,
        runner: &R,
        progress: &ProgressReporter,
    ) -> ProvisionResult<bool> {
        let spec = CommandSpec::new("docker compose config -q || sudo docker-compose config -q")
            .in_dir(&self.app_dir);
        let result = runner.execute(&spec, false)?;
        if !result.succeeded {
            progress.warn(format!(
                "compose file did not validate (exit {}): {}",
                result.exit_code,
                result.text()
            ));
        }
        Ok(result.succeeded)
    }

    /// Container listing for the log; output only
    pub fn diagnostics<R: CommandRunner + ?Sized>(&self, runner: &R) -> ProvisionResult<String> {
        let spec = CommandSpec::new("docker ps -a || sudo docker ps -a").in_dir(&self.app_dir);
        let result = runner.execute(&spec, false)?;
        Ok(result.output)
    }
}

fn report(outcome: &CascadeOutcome, progress: &ProgressReporter) -> bool {
    if let Some(winner) = outcome.winner {
        info!("Activated via: {}", outcome.records[winner].label);
        return true;
    }
    let failure = ProvisionError::ActivationFailure {
        attempts: outcome.attempts(),
        last_output: outcome.last_output().trim().to_string(),
    };
    warn!("Inspect with 'docker compose logs' in the app directory");
    progress.warn(failure.to_string());
    false
}
