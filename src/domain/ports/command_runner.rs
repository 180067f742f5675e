//! CommandRunner port - execution of external tools
//!
//! Package managers, the container engine, the compose tool and the
//! certificate client are all driven through this seam as opaque processes.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::{ProvisionError, ProvisionResult};

/// A shell command line plus how to run it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    /// Full command line, interpreted by `sh -c`
    pub line: String,
    /// Working directory; inherits the process cwd when `None`
    pub current_dir: Option<PathBuf>,
    /// When set, a spinner with this label runs while the command does
    pub label: Option<String>,
}

impl CommandSpec {
    pub fn new(line: impl Into<String>) -> Self {
        Self {
            line: line.into(),
            current_dir: None,
            label: None,
        }
    }

    pub fn in_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.current_dir = Some(dir.as_ref().to_path_buf());
        self
    }

    pub fn with_spinner(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

impl From<&str> for CommandSpec {
    fn from(line: &str) -> Self {
        CommandSpec::new(line)
    }
}

impl From<String> for CommandSpec {
    fn from(line: String) -> Self {
        CommandSpec::new(line)
    }
}

/// Outcome of one external command
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandResult {
    pub exit_code: i32,
    /// stdout and stderr merged in arrival order
    pub output: String,
    pub succeeded: bool,
}

impl CommandResult {
    pub fn new(exit_code: i32, output: impl Into<String>) -> Self {
        Self {
            exit_code,
            output: output.into(),
            succeeded: exit_code == 0,
        }
    }

    /// Trimmed output, convenient for single-value probes
    pub fn text(&self) -> &str {
        self.output.trim()
    }
}

/// Executes external commands
pub trait CommandRunner {
    /// Run a command to completion and capture its merged output.
    ///
    /// A non-zero exit is not an error here; only failing to spawn is.
    fn run(&self, spec: &CommandSpec) -> ProvisionResult<CommandResult>;

    /// Search-path lookup for `program`
    fn which(&self, program: &str) -> bool;

    /// Run a command; with `require_success`, a non-zero exit becomes
    /// `CommandFailure` carrying the captured output.
    fn execute(&self, spec: &CommandSpec, require_success: bool) -> ProvisionResult<CommandResult> {
        let result = self.run(spec)?;
        if require_success && !result.succeeded {
            return Err(ProvisionError::CommandFailure {
                command: spec.line.clone(),
                exit_code: result.exit_code,
                output: result.output,
            });
        }
        Ok(result)
    }

    /// Shorthand for `execute(CommandSpec::new(line), true)`
    fn require(&self, line: &str) -> ProvisionResult<CommandResult> {
        self.execute(&CommandSpec::new(line), true)
    }

    /// Shorthand for a tolerated command whose failure is only logged
    fn tolerate(&self, line: &str) -> ProvisionResult<CommandResult> {
        self.execute(&CommandSpec::new(line), false)
    }
}

impl<R: CommandRunner + ?Sized> CommandRunner for &R {
    fn run(&self, spec: &CommandSpec) -> ProvisionResult<CommandResult> {
        (**self).run(spec)
    }

    fn which(&self, program: &str) -> bool {
        (**self).which(program)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(i32);

    impl CommandRunner for Fixed {
        fn run(&self, _spec: &CommandSpec) -> ProvisionResult<CommandResult> {
            Ok(CommandResult::new(self.0, "boom\n"))
        }

        fn which(&self, _program: &str) -> bool {
            false
        }
    }

    #[test]
    fn succeeded_follows_exit_code() {
        assert!(CommandResult::new(0, "").succeeded);
        assert!(!CommandResult::new(127, "").succeeded);
    }

    #[test]
    fn execute_requires_success_when_asked() {
        let err = Fixed(2).require("false").unwrap_err();
        match err {
            ProvisionError::CommandFailure {
                command,
                exit_code,
                output,
            } => {
                assert_eq!(command, "false");
                assert_eq!(exit_code, 2);
                assert_eq!(output, "boom\n");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn tolerated_failure_returns_result() {
        let result = Fixed(1).tolerate("false").unwrap();
        assert_eq!(result.exit_code, 1);
        assert_eq!(result.text(), "boom");
    }

    #[test]
    fn spec_builder() {
        let spec = CommandSpec::new("docker compose up -d")
            .in_dir("/srv/app")
            .with_spinner("Starting containers");
        assert_eq!(spec.current_dir.as_deref(), Some(Path::new("/srv/app")));
        assert_eq!(spec.label.as_deref(), Some("Starting containers"));
    }
}
