//! Configuration type definitions

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::services::secrets::{DEFAULT_SECRET_LENGTH, MIN_SECRET_LENGTH};
use crate::domain::value_objects::Profile;
use crate::error::{ProvisionError, ProvisionResult};

use super::loader::{self, ConfigWarning};

/// Where things live on the host
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// App directory holding the compose project; `--dir` wins
    #[serde(default)]
    pub app_dir: Option<PathBuf>,

    /// Certificate client data directory; certificates sit under `live/`
    #[serde(default = "default_letsencrypt_dir")]
    pub letsencrypt_dir: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            app_dir: None,
            letsencrypt_dir: default_letsencrypt_dir(),
        }
    }
}

fn default_letsencrypt_dir() -> PathBuf {
    PathBuf::from("/etc/letsencrypt")
}

/// Credential generation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CredentialsConfig {
    #[serde(default = "default_secret_length")]
    pub secret_length: usize,

    #[serde(default = "default_database")]
    pub database: String,

    #[serde(default = "default_db_user")]
    pub user: String,
}

impl Default for CredentialsConfig {
    fn default() -> Self {
        Self {
            secret_length: default_secret_length(),
            database: default_database(),
            user: default_db_user(),
        }
    }
}

fn default_secret_length() -> usize {
    DEFAULT_SECRET_LENGTH
}

fn default_database() -> String {
    "appdb".to_string()
}

fn default_db_user() -> String {
    "appuser".to_string()
}

/// Run behaviour
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RuntimeConfig {
    /// Preset profile; prompts are skipped for it
    #[serde(default)]
    pub profile: Option<Profile>,

    /// Never prompt; missing values fall back to defaults or fail
    #[serde(default)]
    pub noninteractive: bool,

    /// Account added to the `docker` group (default: invoking user)
    #[serde(default)]
    pub account: Option<String>,
}

/// Where the certificate client runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TlsClient {
    /// `certbot/certbot` image, nothing installed on the host
    #[default]
    Container,
    /// Host `certbot`, installed through the package manager if missing
    Host,
}

impl TlsClient {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "container" | "docker" => Some(TlsClient::Container),
            "host" => Some(TlsClient::Host),
            _ => None,
        }
    }
}

/// Certificate issuance
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TlsConfig {
    #[serde(default)]
    pub domain: Option<String>,

    #[serde(default)]
    pub email: Option<String>,

    #[serde(default)]
    pub client: TlsClient,

    /// Use the CA's staging endpoint
    #[serde(default)]
    pub staging: bool,
}

/// Verbosity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Verbosity {
    Quiet,
    #[default]
    Normal,
    Verbose,
    Debug,
}

impl Verbosity {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "quiet" => Some(Verbosity::Quiet),
            "normal" => Some(Verbosity::Normal),
            "verbose" => Some(Verbosity::Verbose),
            "debug" => Some(Verbosity::Debug),
            _ => None,
        }
    }

    /// Raise to at least the level implied by `-v` flags
    pub fn with_flags(self, count: u8) -> Self {
        let from_flags = match count {
            0 => Verbosity::Quiet,
            1 => Verbosity::Verbose,
            _ => Verbosity::Debug,
        };
        self.max(from_flags)
    }
}

impl PartialOrd for Verbosity {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Verbosity {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        (*self as u8).cmp(&(*other as u8))
    }
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub verbosity: Verbosity,

    /// Append the run log to `<app>/provision.log`
    #[serde(default = "default_true")]
    pub log_file: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            verbosity: Verbosity::Normal,
            log_file: true,
        }
    }
}

fn default_true() -> bool {
    true
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub paths: PathsConfig,

    #[serde(default)]
    pub credentials: CredentialsConfig,

    #[serde(default)]
    pub runtime: RuntimeConfig,

    #[serde(default)]
    pub tls: TlsConfig,

    #[serde(default)]
    pub output: OutputConfig,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> ProvisionResult<Self> {
        Ok(Self::load_with_warnings(path)?.0)
    }

    /// Load configuration and return non-fatal warnings (e.g. unknown keys)
    pub fn load_with_warnings(path: &Path) -> ProvisionResult<(Self, Vec<ConfigWarning>)> {
        loader::load_with_warnings(path)
    }

    /// Reject values no run can succeed with
    pub fn validate(&self, source: &Path) -> ProvisionResult<()> {
        if self.credentials.secret_length < MIN_SECRET_LENGTH {
            return Err(ProvisionError::InvalidConfig {
                file: source.to_path_buf(),
                message: format!(
                    "credentials.secret_length must be at least {} (got {})",
                    MIN_SECRET_LENGTH, self.credentials.secret_length
                ),
            });
        }
        if self.credentials.user.trim().is_empty() || self.credentials.database.trim().is_empty()
        {
            return Err(ProvisionError::InvalidConfig {
                file: source.to_path_buf(),
                message: "credentials.user and credentials.database must not be empty".to_string(),
            });
        }
        Ok(())
    }

    /// Host directory the certificate client writes live certificates to
    pub fn cert_root(&self) -> PathBuf {
        self.paths.letsencrypt_dir.join("live")
    }
}
