//! Environment detection from the running host

use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::domain::ports::EnvironmentSource;
use crate::domain::value_objects::EnvironmentDescriptor;
use crate::error::ProvisionError;

pub const OS_RELEASE: &str = "/etc/os-release";
const KERNEL_ARCH: &str = "/proc/sys/kernel/arch";

/// Reads the machine identity; never fails
#[derive(Debug, Clone)]
pub struct HostDetector {
    os_release: PathBuf,
    kernel_arch: PathBuf,
}

impl Default for HostDetector {
    fn default() -> Self {
        Self {
            os_release: PathBuf::from(OS_RELEASE),
            kernel_arch: PathBuf::from(KERNEL_ARCH),
        }
    }
}

impl HostDetector {
    pub fn with_paths(os_release: impl AsRef<Path>, kernel_arch: impl AsRef<Path>) -> Self {
        Self {
            os_release: os_release.as_ref().to_path_buf(),
            kernel_arch: kernel_arch.as_ref().to_path_buf(),
        }
    }

    pub fn detect(&self) -> EnvironmentDescriptor {
        let content = std::fs::read_to_string(&self.os_release).ok();
        let machine = std::fs::read_to_string(&self.kernel_arch)
            .map(|m| m.trim().to_string())
            .ok()
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| std::env::consts::ARCH.to_string());

        let env = EnvironmentDescriptor::from_os_release(content.as_deref(), &machine);
        if env.is_unknown() {
            let notice = ProvisionError::EnvironmentUnknown {
                detail: format!("no distribution id in {}", self.os_release.display()),
            };
            warn!("{}", notice);
        }
        info!("Detected {}", env);
        env
    }
}

impl EnvironmentSource for HostDetector {
    fn detect(&self) -> EnvironmentDescriptor {
        HostDetector::detect(self)
    }
}
