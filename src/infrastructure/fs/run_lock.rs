//! Advisory lock on the app directory
//!
//! Two simultaneous runs against one directory would race on the credential
//! store and the compose project. The second run fails fast instead.

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use fs2::FileExt;

use crate::error::{ProvisionError, ProvisionResult};

pub const LOCK_FILE: &str = ".quickstack.lock";

/// Held for the lifetime of a run; released on drop
#[derive(Debug)]
pub struct RunLock {
    file: File,
    path: PathBuf,
}

impl RunLock {
    pub fn acquire(dir: &Path) -> ProvisionResult<Self> {
        fs::create_dir_all(dir)?;
        let path = dir.join(LOCK_FILE);
        let file = File::create(&path)?;
        file.try_lock_exclusive()
            .map_err(|_| ProvisionError::RunInProgress {
                dir: dir.to_path_buf(),
            })?;
        Ok(Self { file, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for RunLock {
    fn drop(&mut self) {
        let _ = self.file.unlock();
    }
}
