//! Validated extraction destination.

use crate::ArchiveError;
use crate::Result;
use std::path::Path;
use std::path::PathBuf;

/// An existing directory that archive entries are extracted into.
///
/// The path is canonicalized on construction, so containment checks in
/// [`SafePath`](super::SafePath) compare absolute paths with no `.`, `..`
/// or symlinked components on the destination side.
///
/// # Examples
///
/// ```no_run
/// use dirpack_core::types::DestDir;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let dest = DestDir::new("/tmp/extract")?;
/// let target = dest.join("file.txt");
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DestDir(PathBuf);

impl DestDir {
    /// Validates that `path` is an existing directory.
    ///
    /// # Errors
    ///
    /// Returns `DestinationNotFound` if nothing exists at `path`,
    /// `NotADirectory` if it is not a directory, or `Io` if it cannot be
    /// canonicalized.
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let metadata = match std::fs::metadata(path) {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(ArchiveError::DestinationNotFound {
                    path: path.to_path_buf(),
                });
            }
            Err(e) => return Err(ArchiveError::Io(e)),
        };

        if !metadata.is_dir() {
            return Err(ArchiveError::NotADirectory {
                path: path.to_path_buf(),
            });
        }

        Ok(Self(path.canonicalize()?))
    }

    /// Returns the canonical destination path.
    #[inline]
    #[must_use]
    pub fn as_path(&self) -> &Path {
        &self.0
    }

    /// Joins a path component onto the destination.
    ///
    /// The result is not checked for containment; use
    /// [`SafePath::resolve`](super::SafePath::resolve) for archive entry names.
    #[inline]
    #[must_use]
    pub fn join(&self, path: impl AsRef<Path>) -> PathBuf {
        self.0.join(path)
    }

    /// Converts into the underlying `PathBuf`.
    #[inline]
    #[must_use]
    pub fn into_path_buf(self) -> PathBuf {
        self.0
    }
}
