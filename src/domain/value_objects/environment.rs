//! Environment descriptor - the machine identity every decision keys on

use serde::Serialize;

use super::Architecture;

/// Normalized machine identity, captured once per run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Default)]
pub struct EnvironmentDescriptor {
    /// `ID` from os-release, lower-cased (e.g. "amzn", "ubuntu")
    pub distribution_id: String,
    /// `ID_LIKE` from os-release, lower-cased (e.g. "rhel fedora")
    pub distribution_family: String,
    /// `VERSION_ID` from os-release (e.g. "2023", "22.04")
    pub version_id: String,
    pub architecture: Architecture,
    /// Raw kernel machine type, kept for logs
    pub machine: String,
}

impl EnvironmentDescriptor {
    pub fn new(
        distribution_id: impl Into<String>,
        distribution_family: impl Into<String>,
        version_id: impl Into<String>,
        machine: impl Into<String>,
    ) -> Self {
        let machine = machine.into();
        Self {
            distribution_id: distribution_id.into().trim().to_lowercase(),
            distribution_family: distribution_family.into().trim().to_lowercase(),
            version_id: version_id.into().trim().to_string(),
            architecture: Architecture::from_machine(&machine),
            machine,
        }
    }

    /// Build from the text of an os-release file and a machine type.
    ///
    /// Lines without `=` and comments are ignored; surrounding quotes are stripped.
    pub fn from_os_release(content: Option<&str>, machine: &str) -> Self {
        let mut id = String::new();
        let mut like = String::new();
        let mut version = String::new();

        for line in content.unwrap_or_default().lines() {
            let line = line.trim();
            if line.starts_with('#') {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            let value = value.trim().trim_matches('"').trim_matches('\'');
            match key.trim() {
                "ID" => id = value.to_string(),
                "ID_LIKE" => like = value.to_string(),
                "VERSION_ID" => version = value.to_string(),
                _ => {}
            }
        }

        Self::new(id, like, version, machine)
    }

    /// No distribution identity was found
    pub fn is_unknown(&self) -> bool {
        self.distribution_id.is_empty() && self.distribution_family.is_empty()
    }

    /// True if either the id or the family hint contains any of `needles`
    pub fn matches_any(&self, needles: &[&str]) -> bool {
        needles.iter().any(|n| {
            self.distribution_id.contains(n)
                || self.distribution_family.split_whitespace().any(|f| f.contains(n))
        })
    }
}

impl std::fmt::Display for EnvironmentDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let id = if self.distribution_id.is_empty() {
            "unknown"
        } else {
            &self.distribution_id
        };
        write!(f, "distro={} ", id)?;
        if !self.version_id.is_empty() {
            write!(f, "version={} ", self.version_id)?;
        }
        if !self.distribution_family.is_empty() {
            write!(f, "like=\"{}\" ", self.distribution_family)?;
        }
        write!(f, "arch={} ({})", self.architecture, self.machine)
    }
}
