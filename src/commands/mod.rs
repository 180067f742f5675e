//! Command handlers
//!
//! Each handler loads the layered config, sets up logging and the event
//! sink, then hands off to a use case.

pub mod detect;
pub mod enable_https;
pub mod provision;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use tracing::warn;

use quickstack::application::AppLayout;
use quickstack::config::{load_layered, Config, Verbosity};
use quickstack::domain::ports::{NoPrompt, OperatorPrompt, ProvisionEventSink};
use quickstack::infrastructure::{ConsoleEventSink, JsonEventSink, SystemCommandRunner};
use quickstack::ui::{detect_capabilities, DialoguerPrompt, TerminalCapabilities};

use crate::cli::Cli;

/// Everything a command needs once flags, config and terminal are resolved
pub struct RunContext {
    pub config: Config,
    pub layout: AppLayout,
    pub interactive: bool,
    pub json: bool,
    pub verbosity: Verbosity,
    pub caps: TerminalCapabilities,
}

impl RunContext {
    /// Resolve config and install logging; `log_to_file` adds the app-dir run log
    pub fn prepare(cli: &Cli, log_to_file: bool) -> Result<Self> {
        let search_dir = cli.dir.clone().unwrap_or_else(AppLayout::default_root);
        let (config, warnings, source) = load_layered(cli.config.as_deref(), &search_dir)?;

        let root: PathBuf = cli
            .dir
            .clone()
            .or_else(|| config.paths.app_dir.clone())
            .unwrap_or(search_dir);
        let layout = AppLayout::new(root);

        let verbosity = config.output.verbosity.with_flags(cli.verbose);
        let log_file = (log_to_file && config.output.log_file).then(|| layout.log_file());
        quickstack::logging::init(verbosity, log_file.as_deref())?;

        if let Some(path) = &source {
            tracing::debug!("Config loaded from {}", path.display());
        }
        for warning in &warnings {
            warn!("{}", warning);
        }

        let caps = detect_capabilities();
        let interactive = !cli.yes && !cli.json && !config.runtime.noninteractive && caps.can_prompt();

        Ok(Self {
            config,
            layout,
            interactive,
            json: cli.json,
            verbosity,
            caps,
        })
    }

    pub fn sink(&self) -> Arc<dyn ProvisionEventSink> {
        if self.json {
            Arc::new(JsonEventSink::stdout())
        } else {
            Arc::new(ConsoleEventSink::stdout(self.verbosity >= Verbosity::Verbose))
        }
    }

    pub fn runner(&self) -> SystemCommandRunner {
        SystemCommandRunner::new(
            self.caps.can_animate() && !self.json,
            self.caps.supports_unicode,
        )
    }

    pub fn prompt(&self) -> Box<dyn OperatorPrompt> {
        if self.interactive {
            Box::new(DialoguerPrompt)
        } else {
            Box::new(NoPrompt)
        }
    }
}
