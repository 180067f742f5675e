//! quickstack - web stack provisioning for fresh Linux hosts
//!
//! Detects the distribution and architecture, installs a container runtime
//! and compose tool, generates credentials and a compose project (reverse
//! proxy, optional PHP runtime, database and DB admin UI), starts it, and can
//! later switch the proxy to HTTPS with a certificate from an ACME CA.

pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod logging;
#[cfg(any(test, feature = "testing"))]
#[doc(hidden)]
pub mod testing;
pub mod ui;

// Re-exports for convenience
pub use application::{
    AppLayout, EnableHttpsOptions, EnableHttpsUseCase, ProgressReporter, ProvisionOptions,
    ProvisionReport, ProvisionUseCase,
};
pub use config::Config;
pub use domain::value_objects::{Architecture, EnvironmentDescriptor, Profile};
pub use error::{ProvisionError, ProvisionResult};
