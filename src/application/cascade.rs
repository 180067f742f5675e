//! Ordered fallback over alternative command lines
//!
//! Attempts run in order and the cascade stops at the first success. Every
//! attempt is recorded with its captured output, whether it won or not.

use tracing::{info, warn};

use crate::domain::ports::{CommandResult, CommandRunner, CommandSpec, ProvisionEvent};

use super::progress::ProgressReporter;

/// One finished attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttemptRecord {
    pub label: String,
    pub result: CommandResult,
}

#[derive(Debug, Clone, Default)]
pub struct CascadeOutcome {
    pub records: Vec<AttemptRecord>,
    /// Index into `records` of the successful attempt
    pub winner: Option<usize>,
}

impl CascadeOutcome {
    pub fn succeeded(&self) -> bool {
        self.winner.is_some()
    }

    pub fn attempts(&self) -> usize {
        self.records.len()
    }

    pub fn last_output(&self) -> &str {
        self.records
            .last()
            .map(|r| r.result.output.as_str())
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default)]
pub struct StrategyCascade {
    attempts: Vec<CommandSpec>,
}

impl StrategyCascade {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn then(mut self, spec: CommandSpec) -> Self {
        self.attempts.push(spec);
        self
    }

    pub fn len(&self) -> usize {
        self.attempts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attempts.is_empty()
    }

    /// Run attempts until one succeeds.
    ///
    /// A command that cannot be spawned counts as a failed attempt.
    pub fn run<R: CommandRunner + ?Sized>(
        &self,
        runner: &R,
        progress: &ProgressReporter,
    ) -> CascadeOutcome {
        let mut outcome = CascadeOutcome::default();

        for (i, spec) in self.attempts.iter().enumerate() {
            let result = runner
                .run(spec)
                .unwrap_or_else(|e| CommandResult::new(-1, e.to_string()));

            if result.succeeded {
                info!("Attempt {}/{} succeeded: {}", i + 1, self.len(), spec.line);
            } else {
                warn!(
                    "Attempt {}/{} failed (exit {}): {}",
                    i + 1,
                    self.len(),
                    result.exit_code,
                    spec.line
                );
            }
            if progress.wants_detail() {
                progress.emit(ProvisionEvent::AttemptFinished {
                    label: spec.line.clone(),
                    exit_code: result.exit_code,
                    succeeded: result.succeeded,
                });
            }

            let won = result.succeeded;
            outcome.records.push(AttemptRecord {
                label: spec.line.clone(),
                result,
            });
            if won {
                outcome.winner = Some(i);
                break;
            }
        }
        outcome
    }
}
