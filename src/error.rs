//! Error types for quickstack
//!
//! Every fallible step returns a `ProvisionError`. Some variants are warnings
//! that the orchestrator logs and moves past; `is_fatal` tells them apart.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for provisioning operations
pub type ProvisionResult<T> = Result<T, ProvisionError>;

/// Main error type for provisioning operations
#[derive(Error, Debug)]
pub enum ProvisionError {
    /// Distribution could not be identified; the generic install branch is used
    #[error("unknown environment ({detail}); using generic fallback")]
    EnvironmentUnknown { detail: String },

    /// An external command exited non-zero where success was required
    #[error("command failed ({exit_code}): {command}\nOutput:\n{output}")]
    CommandFailure {
        command: String,
        exit_code: i32,
        output: String,
    },

    /// The container runtime or compose tool could not be installed
    #[error("installation failed during '{step}': {message}")]
    InstallationFailure {
        step: String,
        message: String,
        output: String,
    },

    /// The credential store exists but cannot be parsed
    #[error("credential store {path} is corrupt at line {line}: {message}")]
    CredentialStoreCorrupt {
        path: PathBuf,
        line: usize,
        message: String,
    },

    /// Every activation strategy failed
    #[error("stack activation failed after {attempts} attempt(s). Last output:\n{last_output}")]
    ActivationFailure { attempts: usize, last_output: String },

    /// The certificate authority client did not produce a certificate
    #[error("certificate issuance for {domain} failed: {message}")]
    CertificateIssuanceFailure {
        domain: String,
        message: String,
        output: String,
    },

    /// A structural marker the patcher relies on is absent
    #[error("cannot patch {path}: {marker} not found")]
    ConfigPatchTargetMissing { path: PathBuf, marker: String },

    /// A file the current command depends on does not exist
    #[error("{path} not found. {hint}")]
    MissingPrerequisite { path: PathBuf, hint: String },

    /// Operator input rejected by validation
    #[error("invalid {field}: {message}")]
    InvalidInput { field: String, message: String },

    /// Configuration file or override rejected
    #[error("invalid configuration in {file}: {message}")]
    InvalidConfig { file: PathBuf, message: String },

    /// A TLS state machine step was invoked from the wrong state
    #[error("cannot move from {from} to {to}")]
    InvalidTransition { from: String, to: String },

    /// Another run holds the lock on the app directory
    #[error("another provisioning run is active in {dir}")]
    RunInProgress { dir: PathBuf },

    /// The operator declined a confirmation prompt
    #[error("aborted by user")]
    Aborted,

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ProvisionError {
    /// Whether this error should terminate the run with a non-zero status.
    pub fn is_fatal(&self) -> bool {
        !matches!(
            self,
            ProvisionError::EnvironmentUnknown { .. }
                | ProvisionError::ActivationFailure { .. }
                | ProvisionError::ConfigPatchTargetMissing { .. }
        )
    }

    /// Captured command output attached to this error, if any.
    pub fn captured_output(&self) -> Option<&str> {
        match self {
            ProvisionError::CommandFailure { output, .. }
            | ProvisionError::InstallationFailure { output, .. }
            | ProvisionError::CertificateIssuanceFailure { output, .. } => Some(output),
            ProvisionError::ActivationFailure { last_output, .. } => Some(last_output),
            _ => None,
        }
    }

    pub(crate) fn installation(step: impl Into<String>, source: ProvisionError) -> Self {
        let output = source.captured_output().unwrap_or_default().to_string();
        ProvisionError::InstallationFailure {
            step: step.into(),
            message: source.to_string(),
            output,
        }
    }
}
