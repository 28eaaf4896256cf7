//! Scratch directory owned by a single build
//!
//! The directory is removed when [`WorkingDirectory::close`] is called or,
//! on every other exit path (errors, panics, cancelled tasks), when the
//! guard is dropped.

use crate::error::{PackagingError, ResourceError};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const PREFIX: &str = "epub_";

/// Lifecycle of a working directory
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkdirState {
    Created,
    Populated,
    Packaged,
    CleanedUp,
    Failed,
}

/// Exclusively owned, uniquely named scratch directory
#[derive(Debug)]
pub struct WorkingDirectory {
    dir: Option<TempDir>,
    path: PathBuf,
    state: WorkdirState,
}

impl WorkingDirectory {
    /// Allocate a fresh directory under `root`, creating `root` if needed
    pub fn create(root: &Path) -> Result<Self, ResourceError> {
        fs::create_dir_all(root).map_err(ResourceError::ScratchDir)?;
        let dir = tempfile::Builder::new()
            .prefix(PREFIX)
            .tempdir_in(root)
            .map_err(ResourceError::ScratchDir)?;
        let path = dir.path().to_path_buf();

        tracing::debug!("Created scratch directory {:?}", path);
        Ok(Self {
            dir: Some(dir),
            path,
            state: WorkdirState::Created,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn state(&self) -> WorkdirState {
        self.state
    }

    /// Write an artifact at `relative`, creating parent directories
    pub fn write(&mut self, relative: &str, bytes: &[u8]) -> Result<(), PackagingError> {
        let target = self.path.join(relative);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&target, bytes)?;
        self.state = WorkdirState::Populated;
        tracing::debug!("Wrote {} ({} bytes)", relative, bytes.len());
        Ok(())
    }

    /// Read an artifact back
    pub fn read(&self, relative: &str) -> Result<Vec<u8>, PackagingError> {
        let target = self.path.join(relative);
        fs::read(&target).map_err(|source| PackagingError::MissingArtifact {
            path: PathBuf::from(relative),
            source,
        })
    }

    /// Record that the archive was finalized at its output path
    pub fn mark_packaged(&mut self) {
        self.state = WorkdirState::Packaged;
    }

    /// Record that the build failed; the directory is still removed on drop
    pub fn mark_failed(&mut self) {
        self.state = WorkdirState::Failed;
    }

    /// Remove the directory and everything in it, reporting failures
    pub fn close(mut self) -> Result<(), ResourceError> {
        let result = match self.dir.take() {
            Some(dir) => dir.close().map_err(ResourceError::ScratchDir),
            None => Ok(()),
        };
        if result.is_ok() {
            self.state = WorkdirState::CleanedUp;
            tracing::debug!("Removed scratch directory {:?}", self.path);
        }
        result
    }
}

impl Drop for WorkingDirectory {
    fn drop(&mut self) {
        if let Some(dir) = self.dir.take() {
            match dir.close() {
                Ok(()) => {
                    tracing::debug!(
                        "Removed scratch directory {:?} (state: {:?})",
                        self.path,
                        self.state
                    );
                }
                Err(e) => {
                    tracing::warn!("Failed to remove scratch directory {:?}: {}", self.path, e);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lifecycle() {
        let root = tempfile::tempdir().unwrap();
        let mut workdir = WorkingDirectory::create(root.path()).unwrap();
        let path = workdir.path().to_path_buf();

        assert_eq!(workdir.state(), WorkdirState::Created);
        assert!(path.is_dir());
        assert!(path
            .file_name()
            .unwrap()
            .to_str()
            .unwrap()
            .starts_with("epub_"));

        workdir.write("META-INF/container.xml", b"<container/>").unwrap();
        assert_eq!(workdir.state(), WorkdirState::Populated);
        assert_eq!(workdir.read("META-INF/container.xml").unwrap(), b"<container/>");

        workdir.mark_packaged();
        assert_eq!(workdir.state(), WorkdirState::Packaged);

        workdir.close().unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn test_drop_removes_directory() {
        let root = tempfile::tempdir().unwrap();
        let path = {
            let mut workdir = WorkingDirectory::create(root.path()).unwrap();
            workdir.write("chapter1.xhtml", b"x").unwrap();
            workdir.mark_failed();
            workdir.path().to_path_buf()
        };
        assert!(!path.exists());
    }

    #[test]
    fn test_directories_are_unique() {
        let root = tempfile::tempdir().unwrap();
        let a = WorkingDirectory::create(root.path()).unwrap();
        let b = WorkingDirectory::create(root.path()).unwrap();
        assert_ne!(a.path(), b.path());
    }

    #[test]
    fn test_missing_artifact() {
        let root = tempfile::tempdir().unwrap();
        let workdir = WorkingDirectory::create(root.path()).unwrap();
        let err = workdir.read("content.opf").unwrap_err();
        assert!(matches!(err, PackagingError::MissingArtifact { .. }));
    }

    #[test]
    fn test_create_fails_fast_on_bad_root() {
        let root = tempfile::tempdir().unwrap();
        let file = root.path().join("not-a-dir");
        fs::write(&file, b"").unwrap();

        let err = WorkingDirectory::create(&file).unwrap_err();
        assert!(matches!(err, ResourceError::ScratchDir(_)));
    }
}
