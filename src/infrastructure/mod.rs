//! Infrastructure Layer
//!
//! Concrete implementations of domain ports. All host I/O lives here.
//!
//! ## Structure
//!
//! - `detect` - os-release and kernel machine type
//! - `process` - `sh -c` command runner
//! - `fs/` - local file system and run lock
//! - `credential_store` - `.env` persistence
//! - `events/` - console and NDJSON event sinks

pub mod credential_store;
pub mod detect;
pub mod events;
pub mod fs;
pub mod process;

pub use credential_store::DotenvCredentialStore;
pub use detect::HostDetector;
pub use events::{ConsoleEventSink, JsonEventSink};
pub use fs::{LocalFs, RunLock};
pub use process::SystemCommandRunner;
