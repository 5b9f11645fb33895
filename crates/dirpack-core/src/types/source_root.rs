//! Validated archive source directory.

use crate::ArchiveError;
use crate::Result;
use std::path::Path;
use std::path::PathBuf;

use super::clean_path;

/// The directory whose contents are written into an archive.
///
/// The given path is cleaned lexically, checked to exist and be a
/// directory, then canonicalized. Every walked entry must sit beneath
/// this root.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SourceRoot(PathBuf);

impl SourceRoot {
    /// Validates `path` as an archive source.
    ///
    /// # Errors
    ///
    /// Returns `SourceNotFound` if nothing exists at the path,
    /// `NotADirectory` if it is not a directory, or `Io` if it cannot be
    /// canonicalized.
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        let cleaned = clean_path(path.as_ref());

        let metadata = match std::fs::metadata(&cleaned) {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(ArchiveError::SourceNotFound { path: cleaned });
            }
            Err(e) => return Err(ArchiveError::Io(e)),
        };

        if !metadata.is_dir() {
            return Err(ArchiveError::NotADirectory { path: cleaned });
        }

        Ok(Self(cleaned.canonicalize()?))
    }

    /// Returns the canonical root path.
    #[inline]
    #[must_use]
    pub fn as_path(&self) -> &Path {
        &self.0
    }

    /// Returns `path` relative to the root.
    ///
    /// # Errors
    ///
    /// Returns `IllegalPath` if `path` is not beneath the root.
    pub fn relative<'a>(&self, path: &'a Path) -> Result<&'a Path> {
        path.strip_prefix(&self.0)
            .map_err(|_| ArchiveError::IllegalPath {
                path: path.to_path_buf(),
            })
    }
}
