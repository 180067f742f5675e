//! Architecture value object - the CPU family the host runs on
//!
//! Only two families matter for image and binary selection. Anything the
//! kernel reports that is not 64-bit ARM lands on `X86_64`, 32-bit ARM
//! included: no aarch64 artifact runs there.

use serde::{Deserialize, Serialize};

/// Normalized CPU architecture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Architecture {
    /// x86_64 / amd64, also the fallback for unknown machine types
    #[default]
    X86_64,
    /// aarch64 / arm64
    Arm64,
}

impl Architecture {
    /// Normalize a kernel machine string (`uname -m`)
    pub fn from_machine(machine: &str) -> Self {
        let m = machine.trim().to_lowercase();
        if m == "aarch64" || m == "arm64" {
            Architecture::Arm64
        } else {
            Architecture::X86_64
        }
    }

    pub fn is_arm(&self) -> bool {
        matches!(self, Architecture::Arm64)
    }

    /// Suffix used by upstream release artifacts (compose standalone binary)
    pub fn release_suffix(&self) -> &'static str {
        match self {
            Architecture::X86_64 => "x86_64",
            Architecture::Arm64 => "aarch64",
        }
    }
}

impl std::fmt::Display for Architecture {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Architecture::X86_64 => write!(f, "x86_64"),
            Architecture::Arm64 => write!(f, "arm64"),
        }
    }
}
