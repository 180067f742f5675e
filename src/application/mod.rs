//! Application Layer
//!
//! Use cases that wire domain services to ports. Nothing here touches the
//! host directly; every side effect goes through a port.
//!
//! ## Structure
//!
//! - `provision/` - the end-to-end provisioning run
//! - `tls/` - HTTPS enablement state machine
//! - `installer` - runtime and compose tool installation
//! - `credentials` - credential manager
//! - `activator` - compose start/recreate cascades
//! - `summary` - `README_SECURE.txt`
//! - `cascade` - ordered fallback over command lines
//! - `progress` - numbered step reporting
//! - `layout` - app directory paths

pub mod activator;
pub mod cascade;
pub mod credentials;
pub mod installer;
pub mod layout;
pub mod progress;
pub mod provision;
pub mod summary;
pub mod tls;

pub use activator::StackActivator;
pub use cascade::{AttemptRecord, CascadeOutcome, StrategyCascade};
pub use credentials::{credential_specs, CredentialManager};
pub use installer::{ensure_runtime_installed, resolve_account, ComposeTool, InstallReport};
pub use layout::AppLayout;
pub use progress::ProgressReporter;
pub use provision::{ProvisionOptions, ProvisionReport, ProvisionUseCase};
pub use summary::{HostFacts, Summary, SummaryWriter};
pub use tls::{EnableHttpsOptions, EnableHttpsResult, EnableHttpsUseCase, TlsSettings, TlsState};
