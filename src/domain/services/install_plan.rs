//! Install plan selection
//!
//! An ordered table of `(predicate, branch)` rules. Selection is first-match
//! and total: the last rule always matches. Each branch expands to the
//! privileged command lines that install the container runtime.

use serde::Serialize;

use crate::domain::value_objects::{Architecture, EnvironmentDescriptor};

/// Installation strategy for the container runtime
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum InstallBranch {
    AmazonLinux2023,
    AmazonLinux,
    DebianFamily,
    Generic,
}

impl InstallBranch {
    pub fn name(&self) -> &'static str {
        match self {
            InstallBranch::AmazonLinux2023 => "amazon-linux-2023",
            InstallBranch::AmazonLinux => "amazon-linux",
            InstallBranch::DebianFamily => "debian-family",
            InstallBranch::Generic => "generic",
        }
    }
}

impl std::fmt::Display for InstallBranch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// One row of the selection table
pub struct BranchRule {
    pub branch: InstallBranch,
    pub matches: fn(&EnvironmentDescriptor) -> bool,
}

fn is_amazon(env: &EnvironmentDescriptor) -> bool {
    env.matches_any(&["amzn", "amazon"])
}

fn is_amazon_2023(env: &EnvironmentDescriptor) -> bool {
    is_amazon(env) && env.version_id.starts_with("2023")
}

const DEBIAN_IDS: [&str; 4] = ["ubuntu", "debian", "raspbian", "pop"];

fn is_debian_family(env: &EnvironmentDescriptor) -> bool {
    DEBIAN_IDS.contains(&env.distribution_id.as_str())
        || env
            .distribution_family
            .split_whitespace()
            .any(|f| f.contains("debian") || f.contains("ubuntu"))
}

fn always(_: &EnvironmentDescriptor) -> bool {
    true
}

/// Ordered selection table; the final rule is the catch-all
pub const INSTALL_RULES: &[BranchRule] = &[
    BranchRule {
        branch: InstallBranch::AmazonLinux2023,
        matches: is_amazon_2023,
    },
    BranchRule {
        branch: InstallBranch::AmazonLinux,
        matches: is_amazon,
    },
    BranchRule {
        branch: InstallBranch::DebianFamily,
        matches: is_debian_family,
    },
    BranchRule {
        branch: InstallBranch::Generic,
        matches: always,
    },
];

/// First-match branch selection
pub fn select_branch(env: &EnvironmentDescriptor) -> InstallBranch {
    INSTALL_RULES
        .iter()
        .find(|rule| (rule.matches)(env))
        .map(|rule| rule.branch)
        .unwrap_or(InstallBranch::Generic)
}

/// A command line in a plan; tolerated commands may fail without aborting
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedCommand {
    pub line: String,
    pub tolerated: bool,
}

impl PlannedCommand {
    fn required(line: impl Into<String>) -> Self {
        Self {
            line: line.into(),
            tolerated: false,
        }
    }

    fn tolerated(line: impl Into<String>) -> Self {
        Self {
            line: line.into(),
            tolerated: true,
        }
    }
}

/// Package manager probed by the generic branch, in probe order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageManager {
    Dnf,
    Yum,
    AptGet,
}

impl PackageManager {
    pub const PROBE_ORDER: [PackageManager; 3] =
        [PackageManager::Dnf, PackageManager::Yum, PackageManager::AptGet];

    pub fn binary(&self) -> &'static str {
        match self {
            PackageManager::Dnf => "dnf",
            PackageManager::Yum => "yum",
            PackageManager::AptGet => "apt-get",
        }
    }

    /// Privileged install line for `packages`
    pub fn install_line(&self, packages: &str) -> String {
        match self {
            PackageManager::Dnf => format!("sudo dnf -y install {}", packages),
            PackageManager::Yum => format!("sudo yum -y install {}", packages),
            PackageManager::AptGet => format!("sudo apt-get install -y {}", packages),
        }
    }
}

const ENABLE_DOCKER: &str = "sudo systemctl enable --now docker";

/// Command lines for a fixed branch. `Generic` needs a probed package
/// manager; see [`generic_commands`].
pub fn branch_commands(branch: InstallBranch, env: &EnvironmentDescriptor) -> Vec<PlannedCommand> {
    match branch {
        InstallBranch::AmazonLinux2023 => vec![
            PlannedCommand::required("sudo dnf -y update"),
            PlannedCommand::required("sudo dnf -y install docker"),
            PlannedCommand::required(ENABLE_DOCKER),
        ],
        InstallBranch::AmazonLinux => vec![
            PlannedCommand::tolerated("sudo amazon-linux-extras enable docker"),
            PlannedCommand::required("sudo yum -y update"),
            PlannedCommand::required("sudo yum -y install docker"),
            PlannedCommand::required(ENABLE_DOCKER),
        ],
        InstallBranch::DebianFamily => debian_commands(debian_channel(env)),
        InstallBranch::Generic => Vec::new(),
    }
}

/// Docker apt repository channel for a Debian-family descriptor
pub fn debian_channel(env: &EnvironmentDescriptor) -> &'static str {
    match env.distribution_id.as_str() {
        "debian" | "raspbian" => "debian",
        _ => "ubuntu",
    }
}

fn debian_commands(channel: &str) -> Vec<PlannedCommand> {
    vec![
        PlannedCommand::required("sudo apt-get update -y"),
        PlannedCommand::required("sudo apt-get install -y ca-certificates curl gnupg lsb-release"),
        PlannedCommand::required("sudo install -m 0755 -d /etc/apt/keyrings"),
        PlannedCommand::required(format!(
            "curl -fsSL https://download.docker.com/linux/{channel}/gpg | sudo gpg --dearmor --yes -o /etc/apt/keyrings/docker.gpg"
        )),
        PlannedCommand::required(format!(
            "echo \"deb [arch=$(dpkg --print-architecture) signed-by=/etc/apt/keyrings/docker.gpg] https://download.docker.com/linux/{channel} $(lsb_release -cs) stable\" | sudo tee /etc/apt/sources.list.d/docker.list > /dev/null"
        )),
        PlannedCommand::required("sudo apt-get update -y"),
        PlannedCommand::required(
            "sudo apt-get install -y docker-ce docker-ce-cli containerd.io docker-compose-plugin",
        ),
        PlannedCommand::required(ENABLE_DOCKER),
    ]
}

/// Command lines for the generic branch once a package manager is known
pub fn generic_commands(manager: PackageManager) -> Vec<PlannedCommand> {
    match manager {
        PackageManager::Dnf => vec![
            PlannedCommand::required("sudo dnf -y update"),
            PlannedCommand::required(manager.install_line("docker")),
            PlannedCommand::required(ENABLE_DOCKER),
        ],
        PackageManager::Yum => vec![
            PlannedCommand::required("sudo yum -y update"),
            PlannedCommand::required(manager.install_line("docker")),
            PlannedCommand::required(ENABLE_DOCKER),
        ],
        PackageManager::AptGet => vec![
            PlannedCommand::required("sudo apt-get update -y"),
            PlannedCommand::required(manager.install_line("docker.io")),
            PlannedCommand::required(ENABLE_DOCKER),
        ],
    }
}

/// Upstream URL of the standalone compose binary for `arch`
pub fn compose_download_url(arch: Architecture) -> String {
    format!(
        "https://github.com/docker/compose/releases/latest/download/docker-compose-linux-{}",
        arch.release_suffix()
    )
}
