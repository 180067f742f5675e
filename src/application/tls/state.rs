//! TLS enablement states
//!
//! `NoTls -> CertPending -> CertIssued -> ConfigPatched -> Activated`.
//! Each state is reachable only from its predecessor.

use serde::Serialize;

use crate::error::{ProvisionError, ProvisionResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TlsState {
    NoTls,
    CertPending,
    CertIssued,
    ConfigPatched,
    Activated,
}

impl TlsState {
    pub fn name(&self) -> &'static str {
        match self {
            TlsState::NoTls => "no_tls",
            TlsState::CertPending => "cert_pending",
            TlsState::CertIssued => "cert_issued",
            TlsState::ConfigPatched => "config_patched",
            TlsState::Activated => "activated",
        }
    }

    pub fn next(&self) -> Option<TlsState> {
        match self {
            TlsState::NoTls => Some(TlsState::CertPending),
            TlsState::CertPending => Some(TlsState::CertIssued),
            TlsState::CertIssued => Some(TlsState::ConfigPatched),
            TlsState::ConfigPatched => Some(TlsState::Activated),
            TlsState::Activated => None,
        }
    }

    /// Checked single step forward
    pub fn advance_to(self, to: TlsState) -> ProvisionResult<TlsState> {
        if self.next() == Some(to) {
            Ok(to)
        } else {
            Err(ProvisionError::InvalidTransition {
                from: self.name().to_string(),
                to: to.name().to_string(),
            })
        }
    }
}

impl std::fmt::Display for TlsState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Host name check: dot-separated labels of letters, digits and inner hyphens
pub fn validate_domain(domain: &str) -> ProvisionResult<()> {
    let invalid = |message: &str| ProvisionError::InvalidInput {
        field: "domain".to_string(),
        message: format!("'{}' {}", domain, message),
    };

    if domain.is_empty() || domain.len() > 253 {
        return Err(invalid("must be 1-253 characters"));
    }
    if domain.contains("://") || domain.contains('/') {
        return Err(invalid("must be a bare host name without scheme or path"));
    }
    let labels: Vec<&str> = domain.split('.').collect();
    if labels.len() < 2 {
        return Err(invalid("must contain at least one dot"));
    }
    let label_ok = |l: &&str| {
        !l.is_empty()
            && l.len() <= 63
            && !l.starts_with('-')
            && !l.ends_with('-')
            && l.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
    };
    if !labels.iter().all(label_ok) {
        return Err(invalid("is not a valid host name"));
    }
    Ok(())
}

pub fn validate_email(email: &str) -> ProvisionResult<()> {
    let invalid = || ProvisionError::InvalidInput {
        field: "email".to_string(),
        message: format!("'{}' is not an email address", email),
    };
    if email.chars().any(char::is_whitespace) {
        return Err(invalid());
    }
    let (local, host) = email.split_once('@').ok_or_else(invalid)?;
    if local.is_empty() || host.contains('@') || !host.contains('.') || host.ends_with('.') {
        return Err(invalid());
    }
    Ok(())
}
