use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::core::error::{Result, StoreError};

/// What the provisioner had to do to make a parent directory available.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProvisionOutcome {
    /// The directory was missing and has been created.
    Created,
    /// The directory was already there.
    AlreadyPresent,
}

/// Makes sure the directory a target file lives in exists before anything
/// writes to it.
///
/// Only one level is created. A target like `out/nested/file.txt` where `out`
/// itself is missing fails instead of building the whole chain.
#[derive(Debug, Default, Clone, Copy)]
pub struct DirectoryProvisioner;

impl DirectoryProvisioner {
    pub fn new() -> Self {
        Self
    }

    /// Returns the directory that holds `target`.
    ///
    /// A bare file name has an empty parent, which stands for the current
    /// directory. A path with no parent at all (`/`) cannot hold a file.
    pub fn parent_of(target: &Path) -> Result<PathBuf> {
        match target.parent() {
            Some(parent) if parent.as_os_str().is_empty() => Ok(PathBuf::from(".")),
            Some(parent) => Ok(parent.to_path_buf()),
            None => Err(StoreError::InvalidPath {
                path: target.to_path_buf(),
                reason: "path has no parent directory".to_string(),
            }),
        }
    }

    /// Ensures the parent directory of `target` exists.
    pub fn ensure_parent(&self, target: &Path) -> Result<ProvisionOutcome> {
        let dir = Self::parent_of(target)?;

        if dir.is_dir() {
            debug!(dir = %dir.display(), "parent directory already present");
            return Ok(ProvisionOutcome::AlreadyPresent);
        }

        if dir.exists() {
            return Err(StoreError::DirectoryProvisionFailed {
                path: dir,
                source: io::Error::new(
                    io::ErrorKind::AlreadyExists,
                    "parent path exists but is not a directory",
                ),
            });
        }

        match fs::create_dir(&dir) {
            Ok(()) => {
                info!(dir = %dir.display(), "created output directory");
                Ok(ProvisionOutcome::Created)
            }
            // Lost a race with someone else creating it; that is still success.
            Err(error) if error.kind() == io::ErrorKind::AlreadyExists && dir.is_dir() => {
                Ok(ProvisionOutcome::AlreadyPresent)
            }
            Err(source) => Err(StoreError::DirectoryProvisionFailed { path: dir, source }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_creates_missing_parent() {
        let dir = tempdir().unwrap();
        let target = dir.path().join("output").join("file.txt");

        let outcome = DirectoryProvisioner::new().ensure_parent(&target).unwrap();

        assert_eq!(outcome, ProvisionOutcome::Created);
        assert!(dir.path().join("output").is_dir());
    }

    #[test]
    fn test_existing_parent_is_noop() {
        let dir = tempdir().unwrap();
        let target = dir.path().join("file.txt");

        let outcome = DirectoryProvisioner::new().ensure_parent(&target).unwrap();
        assert_eq!(outcome, ProvisionOutcome::AlreadyPresent);
    }

    #[test]
    fn test_only_one_level_is_created() {
        let dir = tempdir().unwrap();
        let target = dir.path().join("a").join("b").join("file.txt");

        let result = DirectoryProvisioner::new().ensure_parent(&target);

        assert!(matches!(
            result,
            Err(StoreError::DirectoryProvisionFailed { .. })
        ));
        assert!(!dir.path().join("a").exists());
    }

    #[test]
    fn test_parent_that_is_a_file_fails() {
        let dir = tempdir().unwrap();
        let blocker = dir.path().join("output");
        fs::write(&blocker, "not a directory").unwrap();

        let result = DirectoryProvisioner::new().ensure_parent(&blocker.join("file.txt"));
        assert!(matches!(
            result,
            Err(StoreError::DirectoryProvisionFailed { .. })
        ));
    }

    #[test]
    fn test_bare_file_name_uses_current_dir() {
        assert_eq!(
            DirectoryProvisioner::parent_of(Path::new("file.txt")).unwrap(),
            PathBuf::from(".")
        );
    }

    #[test]
    fn test_root_is_rejected() {
        let result = DirectoryProvisioner::parent_of(Path::new("/"));
        assert!(matches!(result, Err(StoreError::InvalidPath { .. })));
    }
}
