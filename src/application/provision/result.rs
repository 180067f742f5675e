//! Provision Result

use std::path::PathBuf;

use crate::domain::entities::{CredentialSet, Topology};
use crate::domain::services::InstallBranch;
use crate::domain::value_objects::{EnvironmentDescriptor, Profile};

use super::super::installer::ComposeTool;

/// What a provisioning run did
#[derive(Debug, Clone)]
pub struct ProvisionReport {
    pub environment: EnvironmentDescriptor,
    pub profile: Profile,
    /// `None` when the runtime was already installed
    pub branch: Option<InstallBranch>,
    pub compose: ComposeTool,
    pub credentials: CredentialSet,
    pub topology: Topology,
    /// Domain kept from an earlier HTTPS enablement
    pub tls_domain: Option<String>,
    pub compose_valid: bool,
    pub activated: bool,
    pub summary_path: PathBuf,
}

impl ProvisionReport {
    pub fn is_running(&self) -> bool {
        self.activated
    }
}
