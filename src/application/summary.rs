//! Summary writer
//!
//! `README_SECURE.txt`: credentials, endpoints and next steps, owner-only.

use std::net::IpAddr;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use tracing::{debug, info};

use crate::domain::entities::{CredentialSet, Topology};
use crate::domain::ports::{CommandRunner, FileSystem};
use crate::domain::value_objects::{EnvironmentDescriptor, Profile};
use crate::error::ProvisionResult;

pub const UNKNOWN: &str = "UNKNOWN";

const METADATA_IP: &str =
    "curl -s --max-time 2 http://169.254.169.254/latest/meta-data/public-ipv4";

/// Facts about the host, each best-effort
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostFacts {
    pub public_ip: String,
    pub hostname: String,
}

impl HostFacts {
    /// Cloud metadata for the public address, `hostname` for the name.
    /// Anything unavailable is `UNKNOWN`.
    pub fn gather<R: CommandRunner + ?Sized>(runner: &R) -> Self {
        let public_ip = runner
            .tolerate(METADATA_IP)
            .ok()
            .filter(|r| r.succeeded)
            .map(|r| r.text().to_string())
            .filter(|ip| ip.parse::<IpAddr>().is_ok())
            .unwrap_or_else(|| UNKNOWN.to_string());

        let hostname = runner
            .tolerate("hostname")
            .ok()
            .filter(|r| r.succeeded && !r.text().is_empty())
            .map(|r| r.text().to_string())
            .unwrap_or_else(|| UNKNOWN.to_string());

        debug!("Host facts: ip={} hostname={}", public_ip, hostname);
        Self {
            public_ip,
            hostname,
        }
    }
}

/// Everything the summary file reports
#[derive(Debug, Clone)]
pub struct Summary {
    pub generated_at: DateTime<Local>,
    pub host: HostFacts,
    pub environment: EnvironmentDescriptor,
    pub profile: Profile,
    pub credentials: CredentialSet,
    pub topology: Topology,
    pub activated: bool,
    pub app_dir: PathBuf,
    /// Domain served over TLS, when HTTPS is already enabled
    pub https_domain: Option<String>,
}

impl Summary {
    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str("QUICKSTACK PROVISIONING SUMMARY\n");
        out.push_str("===============================\n\n");
        out.push_str(&format!(
            "Generated: {}\n",
            self.generated_at.format("%Y-%m-%d %H:%M:%S %z")
        ));
        out.push_str(&format!("Public IP: {}\n", self.host.public_ip));
        out.push_str(&format!("Hostname:  {}\n", self.host.hostname));
        out.push_str(&format!("System:    {}\n", self.environment));
        out.push_str(&format!("Profile:   {}\n", self.profile.display_name()));
        out.push_str(&format!("App dir:   {}\n", self.app_dir.display()));
        out.push_str(&format!(
            "Stack:     {}\n\n",
            if self.activated {
                "running"
            } else {
                "NOT STARTED (see provision.log)"
            }
        ));

        out.push_str("Credentials\n-----------\n");
        if self.credentials.is_empty() {
            out.push_str("(none for this profile)\n");
        } else {
            let json = serde_json::to_string_pretty(&self.credentials)
                .unwrap_or_else(|_| "{}".to_string());
            out.push_str(&json);
            out.push('\n');
        }

        out.push_str("\nPorts\n-----\n");
        for line in port_lines(&self.topology) {
            out.push_str(&format!("  {}\n", line));
        }

        if let Some(domain) = &self.https_domain {
            out.push_str(HTTPS_HEADING);
            out.push_str(&https_line(domain));
        }

        out.push_str("\nNotes\n-----\n");
        out.push_str("  - This file and .env are readable by the owner only. Keep it that way.\n");
        out.push_str("  - Re-running quickstack keeps the credentials above.\n");
        if self.profile.has_database() {
            out.push_str(
                "  - The database UI listens on 127.0.0.1 only; reach it with\n      ssh -L 8080:127.0.0.1:8080 <user>@<host>\n",
            );
        }
        if self.https_domain.is_none() {
            out.push_str(
                "  - Enable HTTPS once DNS points here:\n      quickstack enable-https --domain <domain> --email <email>\n",
            );
        }
        out
    }
}

const HTTPS_HEADING: &str = "\nHTTPS\n-----\n";

fn https_line(domain: &str) -> String {
    format!("  https://{}, https://www.{}\n", domain, domain)
}

/// One line per published port, e.g. `80 -> nginx`
pub fn port_lines(topology: &Topology) -> Vec<String> {
    let mut lines = Vec::new();
    for service in &topology.services {
        for port in &service.ports {
            match &port.host_ip {
                None => lines.push(format!("{} -> {}", port.host, service.name)),
                Some(ip) => lines.push(format!(
                    "{} -> {} ({} only)",
                    port.host, service.name, ip
                )),
            }
        }
    }
    lines
}

pub struct SummaryWriter<F: FileSystem> {
    fs: F,
    path: PathBuf,
}

impl<F: FileSystem> SummaryWriter<F> {
    pub fn new(fs: F, path: impl Into<PathBuf>) -> Self {
        Self {
            fs,
            path: path.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn write(&self, summary: &Summary) -> ProvisionResult<()> {
        self.fs.write_private(&self.path, &summary.render())?;
        info!("Summary written to {} (mode 600)", self.path.display());
        Ok(())
    }

    /// Record an enabled HTTPS endpoint; creates the file if missing.
    ///
    /// An existing HTTPS section is replaced, never repeated.
    pub fn append_https(&self, domain: &str, cert_dir: &Path) -> ProvisionResult<()> {
        let mut content = if self.fs.exists(&self.path) {
            self.fs.read(&self.path)?
        } else {
            String::new()
        };
        let section = format!(
            "{}{}  443 -> nginx\n  Certificate: {}\n",
            HTTPS_HEADING,
            https_line(domain),
            cert_dir.display()
        );

        match content.find(HTTPS_HEADING) {
            Some(start) => {
                let body = start + HTTPS_HEADING.len();
                let end = content[body..]
                    .find("\n\n")
                    .map(|i| body + i + 1)
                    .unwrap_or(content.len());
                content.replace_range(start..end, &section);
            }
            None => {
                if !content.is_empty() && !content.ends_with('\n') {
                    content.push('\n');
                }
                content.push_str(&section);
            }
        }
        self.fs.write_private(&self.path, &content)?;
        Ok(())
    }
}
