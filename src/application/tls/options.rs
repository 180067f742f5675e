//! TLS options and results

use std::path::PathBuf;

use crate::config::{Config, TlsClient};

use super::super::layout::AppLayout;
use super::state::TlsState;

/// Certificate client settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TlsSettings {
    pub client: TlsClient,
    /// Host directory the client writes to; live certificates under `live/`
    pub letsencrypt_dir: PathBuf,
    pub staging: bool,
}

impl Default for TlsSettings {
    fn default() -> Self {
        Self {
            client: TlsClient::Container,
            letsencrypt_dir: PathBuf::from("/etc/letsencrypt"),
            staging: false,
        }
    }
}

impl TlsSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            client: config.tls.client,
            letsencrypt_dir: config.paths.letsencrypt_dir.clone(),
            staging: config.tls.staging,
        }
    }

    /// Host directory holding `fullchain.pem` and `privkey.pem` for `domain`
    pub fn cert_dir(&self, domain: &str) -> PathBuf {
        self.letsencrypt_dir.join("live").join(domain)
    }
}

/// Options for `enable-https`
#[derive(Debug, Clone)]
pub struct EnableHttpsOptions {
    pub layout: AppLayout,
    pub domain: Option<String>,
    pub email: Option<String>,
    pub settings: TlsSettings,
    /// Prompts allowed for missing values and the DNS confirmation
    pub interactive: bool,
    /// Skip the DNS confirmation
    pub assume_yes: bool,
}

impl EnableHttpsOptions {
    pub fn new(layout: AppLayout) -> Self {
        Self {
            layout,
            domain: None,
            email: None,
            settings: TlsSettings::default(),
            interactive: false,
            assume_yes: false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct EnableHttpsResult {
    pub domain: String,
    pub state: TlsState,
    pub cert_dir: PathBuf,
    /// Whether `"443:443"` was inserted (false when already present or unpatchable)
    pub compose_patched: bool,
}

impl EnableHttpsResult {
    pub fn is_complete(&self) -> bool {
        self.state == TlsState::Activated
    }
}
