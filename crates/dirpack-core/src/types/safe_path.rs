//! Lexical path cleaning and the destination containment check.

use crate::ArchiveError;
use crate::Result;
use std::path::Component;
use std::path::Path;
use std::path::PathBuf;

use super::DestDir;

/// An extraction target proven to lie inside a destination directory.
///
/// Built only through [`SafePath::resolve`], which joins an archive entry
/// name onto the destination, cleans the result lexically and checks that
/// it is still beneath the destination.
///
/// # Examples
///
/// ```no_run
/// use dirpack_core::types::DestDir;
/// use dirpack_core::types::SafePath;
/// use std::path::Path;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let dest = DestDir::new("/tmp/out")?;
///
/// let safe = SafePath::resolve(Path::new("a/./b/../c.txt"), &dest)?;
/// assert_eq!(safe.relative(), Path::new("a/c.txt"));
///
/// assert!(SafePath::resolve(Path::new("../escape.txt"), &dest).is_err());
/// assert!(SafePath::resolve(Path::new("/etc/passwd"), &dest).is_err());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SafePath {
    target: PathBuf,
    relative: PathBuf,
}

impl SafePath {
    /// Resolves an entry name against `dest`.
    ///
    /// `..` components are allowed as long as the cleaned target stays
    /// inside the destination (`a/../b` is fine, `a/../../b` is not).
    ///
    /// # Errors
    ///
    /// Returns `IllegalPath` if the name is absolute or if the cleaned
    /// target is not beneath the destination.
    pub fn resolve(name: &Path, dest: &DestDir) -> Result<Self> {
        if name.has_root()
            || name
                .components()
                .any(|c| matches!(c, Component::Prefix(_) | Component::RootDir))
        {
            return Err(ArchiveError::IllegalPath {
                path: name.to_path_buf(),
            });
        }

        let target = clean_path(&dest.as_path().join(name));
        let Ok(relative) = target.strip_prefix(dest.as_path()) else {
            return Err(ArchiveError::IllegalPath { path: target });
        };
        let relative = relative.to_path_buf();

        Ok(Self { target, relative })
    }

    /// Absolute target path.
    #[inline]
    #[must_use]
    pub fn as_path(&self) -> &Path {
        &self.target
    }

    /// Target relative to the destination; empty for the destination itself.
    #[inline]
    #[must_use]
    pub fn relative(&self) -> &Path {
        &self.relative
    }

    /// Returns `true` if the entry resolves to the destination itself.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.relative.as_os_str().is_empty()
    }

    /// Converts into the absolute target path.
    #[inline]
    #[must_use]
    pub fn into_path_buf(self) -> PathBuf {
        self.target
    }
}

/// Cleans a path lexically, without touching the filesystem.
///
/// - `.` components are dropped
/// - `..` removes the preceding normal component
/// - `..` directly after the root is dropped (`/..` is `/`)
/// - leading `..` of a relative path are kept
/// - an empty result becomes `.`
///
/// # Examples
///
/// ```
/// use dirpack_core::types::clean_path;
/// use std::path::Path;
///
/// assert_eq!(clean_path(Path::new("a/./b/../c/")), Path::new("a/c"));
/// assert_eq!(clean_path(Path::new("/../x")), Path::new("/x"));
/// assert_eq!(clean_path(Path::new("../x")), Path::new("../x"));
/// assert_eq!(clean_path(Path::new("a/..")), Path::new("."));
/// ```
#[must_use]
pub fn clean_path(path: &Path) -> PathBuf {
    let mut parts: Vec<Component<'_>> = Vec::new();

    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match parts.last() {
                Some(Component::Normal(_)) => {
                    parts.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                Some(Component::ParentDir | Component::CurDir) | None => {
                    parts.push(Component::ParentDir);
                }
            },
            other => parts.push(other),
        }
    }

    if parts.is_empty() {
        return PathBuf::from(".");
    }
    parts.iter().collect()
}
