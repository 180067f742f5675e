//! System command runner
//!
//! Runs command lines through `sh -c` with stderr folded into stdout, so the
//! captured output keeps the order the tool printed it in.

use std::io::{BufRead, BufReader};
use std::process::{Command, Stdio};

use tracing::info;

use crate::domain::ports::{CommandResult, CommandRunner, CommandSpec};
use crate::error::ProvisionResult;
use crate::ui::SpinnerHandle;

/// Runs real processes on the host
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemCommandRunner {
    animate: bool,
    unicode: bool,
}

impl SystemCommandRunner {
    /// `animate` enables the spinner for commands that carry a label
    pub fn new(animate: bool, unicode: bool) -> Self {
        Self { animate, unicode }
    }
}

impl CommandRunner for SystemCommandRunner {
    fn run(&self, spec: &CommandSpec) -> ProvisionResult<CommandResult> {
        info!("> {}", spec.line);

        let mut command = Command::new("sh");
        command
            .arg("-c")
            .arg(format!("exec 2>&1\n{}", spec.line))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null());
        if let Some(dir) = &spec.current_dir {
            command.current_dir(dir);
        }

        let spinner = match &spec.label {
            Some(label) if self.animate => Some(SpinnerHandle::start(label.clone(), self.unicode)),
            _ => None,
        };

        let outcome = capture(&mut command);

        if let Some(spinner) = spinner {
            spinner.stop();
        }

        let (exit_code, output) = outcome?;
        if exit_code != 0 {
            info!("  (exit {})", exit_code);
        }
        Ok(CommandResult::new(exit_code, output))
    }

    fn which(&self, program: &str) -> bool {
        which::which(program).is_ok()
    }
}

fn capture(command: &mut Command) -> ProvisionResult<(i32, String)> {
    let mut child = command.spawn()?;
    let mut output = String::new();
    if let Some(stdout) = child.stdout.take() {
        let reader = BufReader::new(stdout);
        for line in reader.split(b'\n') {
            let line = String::from_utf8_lossy(&line?).into_owned();
            info!("    {}", line);
            output.push_str(&line);
            output.push('\n');
        }
    }
    let status = child.wait()?;
    // Killed by a signal: no exit code
    Ok((status.code().unwrap_or(-1), output))
}
