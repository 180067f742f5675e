//! Provision Options

use crate::config::{Config, CredentialsConfig};
use crate::domain::services::TemplateSettings;
use crate::domain::value_objects::Profile;

use super::super::layout::AppLayout;

/// Options for the provision use case
#[derive(Debug, Clone)]
pub struct ProvisionOptions {
    pub layout: AppLayout,
    /// Preset profile; asked (or defaulted) when absent
    pub profile: Option<Profile>,
    /// Whether the operator may be prompted
    pub interactive: bool,
    /// Account added to the `docker` group
    pub account: String,
    pub credentials: CredentialsConfig,
    pub templates: TemplateSettings,
}

impl ProvisionOptions {
    pub fn new(layout: AppLayout, account: impl Into<String>) -> Self {
        Self {
            layout,
            profile: None,
            interactive: false,
            account: account.into(),
            credentials: CredentialsConfig::default(),
            templates: TemplateSettings::default(),
        }
    }

    pub fn from_config(config: &Config, layout: AppLayout, account: impl Into<String>) -> Self {
        Self {
            layout,
            profile: config.runtime.profile,
            interactive: !config.runtime.noninteractive,
            account: account.into(),
            credentials: config.credentials.clone(),
            templates: TemplateSettings {
                letsencrypt_dir: config.paths.letsencrypt_dir.display().to_string(),
            },
        }
    }

    pub fn with_profile(mut self, profile: Profile) -> Self {
        self.profile = Some(profile);
        self
    }
}
