//! Local File System Implementation
//!
//! Implements the FileSystem port for local disk operations. Writes go
//! through a temp file in the target directory and a rename.

use std::io::Write;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;

use tracing::debug;

use crate::domain::ports::file_system::{FileSystem, FsError, FsResult};

/// Local file system implementation
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFs;

impl LocalFs {
    pub fn new() -> Self {
        Self
    }

    fn write_atomic(&self, path: &Path, content: &str, mode: Option<u32>) -> FsResult<()> {
        let parent = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(parent).map_err(|e| FsError::at(e, parent))?;

        if let Ok(previous) = std::fs::read_to_string(path) {
            if previous != content {
                log_replacement(path, &previous, content);
            }
        }

        let mut tmp = tempfile::NamedTempFile::new_in(parent).map_err(|e| FsError::at(e, parent))?;
        tmp.write_all(content.as_bytes())
            .map_err(|e| FsError::at(e, path))?;
        tmp.as_file().sync_all().map_err(|e| FsError::at(e, path))?;
        let perms = std::fs::Permissions::from_mode(mode.unwrap_or(0o644));
        tmp.as_file()
            .set_permissions(perms)
            .map_err(|e| FsError::at(e, path))?;
        tmp.persist(path).map_err(|e| FsError::at(e.error, path))?;
        Ok(())
    }
}

/// Overwrites are expected every run; the diff is only interesting in debug logs
fn log_replacement(path: &Path, old: &str, new: &str) {
    let diff = similar::TextDiff::from_lines(old, new);
    let unified = diff
        .unified_diff()
        .context_radius(2)
        .header("previous", "generated")
        .to_string();
    debug!(path = %path.display(), "replacing file content:\n{}", unified);
}

impl FileSystem for LocalFs {
    fn read(&self, path: &Path) -> FsResult<String> {
        std::fs::read_to_string(path).map_err(|e| FsError::at(e, path))
    }

    fn write(&self, path: &Path, content: &str) -> FsResult<()> {
        self.write_atomic(path, content, None)
    }

    fn write_private(&self, path: &Path, content: &str) -> FsResult<()> {
        self.write_atomic(path, content, Some(0o600))
    }

    fn restrict_to_owner(&self, path: &Path) -> FsResult<()> {
        std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))
            .map_err(|e| FsError::at(e, path))
    }

    fn mode(&self, path: &Path) -> FsResult<u32> {
        let meta = std::fs::metadata(path).map_err(|e| FsError::at(e, path))?;
        Ok(meta.permissions().mode() & 0o777)
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn create_dir_all(&self, path: &Path) -> FsResult<()> {
        std::fs::create_dir_all(path).map_err(|e| FsError::at(e, path))
    }

    fn copy(&self, from: &Path, to: &Path) -> FsResult<()> {
        std::fs::copy(from, to)
            .map(|_| ())
            .map_err(|e| FsError::at(e, from))
    }
}
