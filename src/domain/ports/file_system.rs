//! FileSystem port - abstraction over the app directory's file I/O
//!
//! Use cases write generated artifacts through this trait so they can run
//! against a temp directory in tests.

use std::path::{Path, PathBuf};

/// Result type for file system operations
pub type FsResult<T> = Result<T, FsError>;

/// File system operation errors
#[derive(Debug)]
pub enum FsError {
    /// File not found
    NotFound(PathBuf),
    /// Permission denied
    PermissionDenied(PathBuf),
    /// I/O error
    Io(std::io::Error),
}

impl FsError {
    /// Attach the path the failing operation was working on
    pub fn at(err: std::io::Error, path: &Path) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => FsError::NotFound(path.to_path_buf()),
            std::io::ErrorKind::PermissionDenied => FsError::PermissionDenied(path.to_path_buf()),
            _ => FsError::Io(err),
        }
    }
}

impl From<std::io::Error> for FsError {
    fn from(err: std::io::Error) -> Self {
        FsError::at(err, Path::new(""))
    }
}

impl std::fmt::Display for FsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FsError::NotFound(path) => write!(f, "File not found: {}", path.display()),
            FsError::PermissionDenied(path) => {
                write!(f, "Permission denied: {}", path.display())
            }
            FsError::Io(err) => write!(f, "I/O error: {}", err),
        }
    }
}

impl std::error::Error for FsError {}

impl From<FsError> for crate::error::ProvisionError {
    fn from(err: FsError) -> Self {
        match err {
            FsError::Io(io) => crate::error::ProvisionError::Io(io),
            other => crate::error::ProvisionError::Io(std::io::Error::other(other.to_string())),
        }
    }
}

/// Abstract file system interface
///
/// Implementations:
/// - `LocalFs` - standard file I/O with atomic writes
pub trait FileSystem {
    /// Read file content as string
    fn read(&self, path: &Path) -> FsResult<String>;

    /// Write content to file atomically (temp file + rename)
    fn write(&self, path: &Path, content: &str) -> FsResult<()>;

    /// Write atomically and restrict the file to its owner (mode 0600)
    fn write_private(&self, path: &Path, content: &str) -> FsResult<()>;

    /// Re-assert owner-only permissions on an existing file
    fn restrict_to_owner(&self, path: &Path) -> FsResult<()>;

    /// Unix permission bits of a file (e.g. 0o600)
    fn mode(&self, path: &Path) -> FsResult<u32>;

    /// Check if a file or directory exists
    fn exists(&self, path: &Path) -> bool;

    /// Create directory and parents
    fn create_dir_all(&self, path: &Path) -> FsResult<()>;

    /// Copy a file, overwriting the destination
    fn copy(&self, from: &Path, to: &Path) -> FsResult<()>;
}

impl<F: FileSystem + ?Sized> FileSystem for &F {
    fn read(&self, path: &Path) -> FsResult<String> {
        (**self).read(path)
    }

    fn write(&self, path: &Path, content: &str) -> FsResult<()> {
        (**self).write(path, content)
    }

    fn write_private(&self, path: &Path, content: &str) -> FsResult<()> {
        (**self).write_private(path, content)
    }

    fn restrict_to_owner(&self, path: &Path) -> FsResult<()> {
        (**self).restrict_to_owner(path)
    }

    fn mode(&self, path: &Path) -> FsResult<u32> {
        (**self).mode(path)
    }

    fn exists(&self, path: &Path) -> bool {
        (**self).exists(path)
    }

    fn create_dir_all(&self, path: &Path) -> FsResult<()> {
        (**self).create_dir_all(path)
    }

    fn copy(&self, from: &Path, to: &Path) -> FsResult<()> {
        (**self).copy(from, to)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fs_error_display() {
        let err = FsError::NotFound(PathBuf::from("docker-compose.yml"));
        assert!(err.to_string().contains("docker-compose.yml"));
    }

    #[test]
    fn fs_error_at_keeps_path() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "not found");
        let fs_err = FsError::at(io_err, Path::new(".env"));
        assert!(matches!(fs_err, FsError::NotFound(p) if p == Path::new(".env")));
    }

    #[test]
    fn converts_into_provision_error() {
        let err: crate::error::ProvisionError =
            FsError::PermissionDenied(PathBuf::from("/etc/x")).into();
        assert!(err.to_string().contains("/etc/x"));
    }
}
