//! App directory layout
//!
//! Every file a run reads or writes, relative to one app directory.

use std::path::{Path, PathBuf};

pub const COMPOSE_FILE: &str = "docker-compose.yml";
pub const PROXY_CONFIG: &str = "nginx/conf.d/default.conf";
pub const CREDENTIALS_FILE: &str = ".env";
pub const SUMMARY_FILE: &str = "README_SECURE.txt";
pub const LOG_FILE: &str = "provision.log";
/// Suffix of the compose copy taken before the HTTPS patch
pub const HTTPS_BACKUP_SUFFIX: &str = ".bak_https";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppLayout {
    root: PathBuf,
}

impl AppLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// `$HOME/app`, or `./app` when there is no home directory
    pub fn default_root() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("app")
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn compose_file(&self) -> PathBuf {
        self.root.join(COMPOSE_FILE)
    }

    pub fn compose_backup(&self) -> PathBuf {
        self.root
            .join(format!("{}{}", COMPOSE_FILE, HTTPS_BACKUP_SUFFIX))
    }

    pub fn proxy_config(&self) -> PathBuf {
        self.root.join(PROXY_CONFIG)
    }

    pub fn credentials_file(&self) -> PathBuf {
        self.root.join(CREDENTIALS_FILE)
    }

    pub fn summary_file(&self) -> PathBuf {
        self.root.join(SUMMARY_FILE)
    }

    pub fn log_file(&self) -> PathBuf {
        self.root.join(LOG_FILE)
    }

    /// Host side of the site bind mount
    pub fn site_dir(&self) -> PathBuf {
        self.root.join("www")
    }

    /// Host side of the ACME challenge webroot
    pub fn acme_webroot(&self) -> PathBuf {
        self.root.join("certbot").join("www")
    }
}
