//! Domain Services
//!
//! Stateless provisioning logic:
//! - `install_plan` - branch table and install command lines
//! - `compose_generator` - topology and compose YAML
//! - `proxy_config` - nginx server blocks
//! - `compose_patch` - HTTPS port insertion
//! - `secrets` - CSPRNG secrets
//! - `site` - placeholder pages

pub mod compose_generator;
pub mod compose_patch;
pub mod install_plan;
pub mod proxy_config;
pub mod secrets;
pub mod site;

pub use compose_generator::{
    infer_profile, render, render_with, to_compose_yaml, TemplateSettings, PROXY_SERVICE,
};
pub use compose_patch::{add_https_port, PatchOutcome};
pub use install_plan::{select_branch, InstallBranch, PackageManager, PlannedCommand};
pub use proxy_config::{render_proxy_config, tls_domain, ProxyMode};
pub use secrets::{OsSecretGenerator, SecretGenerator};
