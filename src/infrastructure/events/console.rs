//! Console Event Sink
//!
//! Human-readable progress: `[i/n] title ... done` on one line per step.

use std::io::{self, Write};
use std::sync::Mutex;

use crate::domain::ports::{ProvisionEvent, ProvisionEventSink};

pub struct ConsoleEventSink {
    writer: Mutex<Box<dyn Write + Send>>,
    verbose: bool,
}

impl ConsoleEventSink {
    pub fn stdout(verbose: bool) -> Self {
        Self {
            writer: Mutex::new(Box::new(io::stdout())),
            verbose,
        }
    }

    pub fn with_writer<W: Write + Send + 'static>(writer: W, verbose: bool) -> Self {
        Self {
            writer: Mutex::new(Box::new(writer)),
            verbose,
        }
    }

    fn emit(&self, text: &str, newline: bool) {
        if let Ok(mut writer) = self.writer.lock() {
            let _ = if newline {
                writeln!(writer, "{}", text)
            } else {
                write!(writer, "{}", text)
            };
            let _ = writer.flush();
        }
    }
}

impl ProvisionEventSink for ConsoleEventSink {
    fn on_event(&self, event: ProvisionEvent) {
        match event {
            ProvisionEvent::Started { .. } => {}
            ProvisionEvent::Detected {
                environment,
                branch,
            } => {
                self.emit(&format!("Detected {} (install branch: {})", environment, branch), true);
            }
            ProvisionEvent::ProfileSelected { profile } => {
                self.emit(&format!("Profile: {} ({})", profile, profile.display_name()), true);
            }
            ProvisionEvent::StepStarted {
                index,
                total,
                title,
            } => {
                self.emit(&format!("[{}/{}] {} ... ", index, total, title), false);
            }
            ProvisionEvent::StepFinished { ok, .. } => {
                self.emit(if ok { "done" } else { "FAILED" }, true);
            }
            ProvisionEvent::AttemptFinished {
                label,
                exit_code,
                succeeded,
            } => {
                if self.verbose && !succeeded {
                    self.emit(&format!("\n    attempt failed ({}): {}", exit_code, label), true);
                }
            }
            ProvisionEvent::Warning { message } => {
                self.emit(&format!("\nWarning: {}", message), true);
            }
            ProvisionEvent::TlsTransition { from, to } => {
                if self.verbose {
                    self.emit(&format!("\n    tls: {} -> {}", from, to), true);
                }
            }
            ProvisionEvent::Completed {
                success,
                summary_path,
            } => {
                if success {
                    self.emit("Provisioning complete.", true);
                } else {
                    self.emit("Provisioning finished with errors.", true);
                }
                if let Some(path) = summary_path {
                    self.emit(&format!("Summary written to {} (mode 600).", path), true);
                }
            }
        }
    }

    fn wants_detailed_events(&self) -> bool {
        self.verbose
    }
}
