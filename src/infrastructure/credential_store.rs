//! Dotenv credential store
//!
//! `KEY=value` lines in `<app>/.env`, mode 0600. The compose tool reads the
//! same file to resolve `${NAME}` placeholders.

use std::path::{Path, PathBuf};

use crate::domain::entities::CredentialSet;
use crate::domain::ports::{CredentialStore, FileSystem};
use crate::error::{ProvisionError, ProvisionResult};

pub struct DotenvCredentialStore<F: FileSystem> {
    fs: F,
    path: PathBuf,
}

impl<F: FileSystem> DotenvCredentialStore<F> {
    pub fn new(fs: F, path: impl Into<PathBuf>) -> Self {
        Self {
            fs,
            path: path.into(),
        }
    }
}

impl<F: FileSystem> CredentialStore for DotenvCredentialStore<F> {
    fn load(&self) -> ProvisionResult<Option<CredentialSet>> {
        if !self.fs.exists(&self.path) {
            return Ok(None);
        }
        let content = self.fs.read(&self.path)?;
        CredentialSet::parse(&content)
            .map(Some)
            .map_err(|e| ProvisionError::CredentialStoreCorrupt {
                path: self.path.clone(),
                line: e.line,
                message: e.message,
            })
    }

    fn save(&self, credentials: &CredentialSet) -> ProvisionResult<()> {
        self.fs
            .write_private(&self.path, &credentials.to_dotenv())
            .map_err(Into::into)
    }

    fn secure(&self) -> ProvisionResult<()> {
        self.fs.restrict_to_owner(&self.path).map_err(Into::into)
    }

    fn location(&self) -> &Path {
        &self.path
    }
}
