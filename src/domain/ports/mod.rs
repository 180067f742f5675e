//! Domain Ports
//!
//! Seams between the provisioning logic and the outside world.

pub mod command_runner;
pub mod credential_store;
pub mod environment_source;
pub mod file_system;
pub mod operator_prompt;
pub mod provision_events;

pub use command_runner::{CommandResult, CommandRunner, CommandSpec};
pub use credential_store::CredentialStore;
pub use environment_source::EnvironmentSource;
pub use file_system::{FileSystem, FsError, FsResult};
pub use operator_prompt::{NoPrompt, OperatorPrompt};
pub use provision_events::{NoopEventSink, ProvisionEvent, ProvisionEventSink};
