//! Depth-first source tree traversal with ignore-rule filtering.

use crate::ArchiveError;
use crate::IgnoreMatcher;
use crate::Result;
use crate::types::SourceRoot;
use std::path::PathBuf;
use walkdir::WalkDir;

/// Walks a source tree, yielding every path that may become an entry.
///
/// Symbolic links are never followed. The root itself is not yielded.
/// Paths matched by the ignore matcher are dropped, and a matched directory
/// is not descended into.
///
/// # Examples
///
/// ```no_run
/// use dirpack_core::creation::walker::TreeWalker;
/// use dirpack_core::types::SourceRoot;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let root = SourceRoot::new("./project")?;
/// for entry in TreeWalker::new(&root).with_sorted(true).walk() {
///     let entry = entry?;
///     println!("{}", entry.relative.display());
/// }
/// # Ok(())
/// # }
/// ```
pub struct TreeWalker<'a> {
    root: &'a SourceRoot,
    matcher: Option<&'a dyn IgnoreMatcher>,
    sorted: bool,
}

impl<'a> TreeWalker<'a> {
    /// Creates a walker over `root` with no ignore rules.
    #[must_use]
    pub fn new(root: &'a SourceRoot) -> Self {
        Self {
            root,
            matcher: None,
            sorted: false,
        }
    }

    /// Sets the matcher consulted for every candidate path.
    #[must_use]
    pub fn with_matcher(mut self, matcher: Option<&'a dyn IgnoreMatcher>) -> Self {
        self.matcher = matcher;
        self
    }

    /// Visits directory children in file-name order.
    #[must_use]
    pub fn with_sorted(mut self, sorted: bool) -> Self {
        self.sorted = sorted;
        self
    }

    /// Returns an iterator over the walked entries.
    ///
    /// # Errors
    ///
    /// Items are `Io` errors when a directory cannot be read, or
    /// `IllegalPath` when a walked path is not beneath the root.
    #[must_use]
    pub fn walk(&self) -> Walk<'a> {
        let mut walker = WalkDir::new(self.root.as_path()).follow_links(false);
        if self.sorted {
            walker = walker.sort_by_file_name();
        }

        Walk {
            it: walker.into_iter(),
            root: self.root,
            matcher: self.matcher,
        }
    }
}

/// Iterator returned by [`TreeWalker::walk`].
pub struct Walk<'a> {
    it: walkdir::IntoIter,
    root: &'a SourceRoot,
    matcher: Option<&'a dyn IgnoreMatcher>,
}

impl Iterator for Walk<'_> {
    type Item = Result<WalkedEntry>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let entry = match self.it.next()? {
                Ok(entry) => entry,
                Err(e) => return Some(Err(ArchiveError::Io(e.into()))),
            };

            if entry.depth() == 0 {
                continue;
            }

            let relative = match self.root.relative(entry.path()) {
                Ok(relative) => relative.to_path_buf(),
                Err(e) => return Some(Err(e)),
            };

            let file_type = entry.file_type();
            let kind = if file_type.is_dir() {
                WalkedKind::Directory
            } else if file_type.is_file() {
                WalkedKind::File
            } else {
                WalkedKind::Other
            };

            if kind != WalkedKind::Other
                && let Some(matcher) = self.matcher
                && matcher.matches(&relative, kind == WalkedKind::Directory)
            {
                tracing::debug!(path = %relative.display(), "ignored by rules");
                if kind == WalkedKind::Directory {
                    self.it.skip_current_dir();
                }
                continue;
            }

            return Some(Ok(WalkedEntry {
                path: entry.into_path(),
                relative,
                kind,
            }));
        }
    }
}

/// A path found by the walker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkedEntry {
    /// Absolute filesystem path.
    pub path: PathBuf,

    /// Path relative to the source root; becomes the entry name.
    pub relative: PathBuf,

    /// What kind of filesystem object was found.
    pub kind: WalkedKind,
}

/// Kind of filesystem object, as seen without following symlinks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkedKind {
    /// Regular file.
    File,

    /// Directory.
    Directory,

    /// Symlink, socket, fifo, device or anything else.
    Other,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::GitIgnore;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn sample_tree() -> TempDir {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("d1/d2")).unwrap();
        fs::write(temp.path().join("b.txt"), "b").unwrap();
        fs::write(temp.path().join("a.txt"), "a").unwrap();
        fs::write(temp.path().join("d1/f11.txt"), "f11").unwrap();
        fs::write(temp.path().join("d1/d2/f21.txt"), "f21").unwrap();
        temp
    }

    fn relatives(walk: Walk<'_>) -> Vec<PathBuf> {
        walk.map(|e| e.unwrap().relative).collect()
    }

    #[test]
    fn test_walk_skips_root_and_finds_everything() {
        let temp = sample_tree();
        let root = SourceRoot::new(temp.path()).unwrap();
        let mut found = relatives(TreeWalker::new(&root).walk());
        found.sort();
        assert_eq!(
            found,
            vec![
                PathBuf::from("a.txt"),
                PathBuf::from("b.txt"),
                PathBuf::from("d1"),
                PathBuf::from("d1/d2"),
                PathBuf::from("d1/d2/f21.txt"),
                PathBuf::from("d1/f11.txt"),
            ]
        );
    }

    #[test]
    fn test_walk_sorted_is_depth_first_by_name() {
        let temp = sample_tree();
        let root = SourceRoot::new(temp.path()).unwrap();
        let found = relatives(TreeWalker::new(&root).with_sorted(true).walk());
        assert_eq!(
            found,
            vec![
                PathBuf::from("a.txt"),
                PathBuf::from("b.txt"),
                PathBuf::from("d1"),
                PathBuf::from("d1/d2"),
                PathBuf::from("d1/d2/f21.txt"),
                PathBuf::from("d1/f11.txt"),
            ]
        );
    }

    #[test]
    fn test_walk_parents_before_children() {
        let temp = sample_tree();
        let root = SourceRoot::new(temp.path()).unwrap();
        let found = relatives(TreeWalker::new(&root).walk());
        let pos = |p: &str| found.iter().position(|f| f == Path::new(p)).unwrap();
        assert!(pos("d1") < pos("d1/f11.txt"));
        assert!(pos("d1/d2") < pos("d1/d2/f21.txt"));
    }

    #[test]
    fn test_walk_ignored_directory_not_descended() {
        let temp = sample_tree();
        let root = SourceRoot::new(temp.path()).unwrap();
        let rules = GitIgnore::from_lines(["d2/"]).unwrap();
        let found = relatives(
            TreeWalker::new(&root)
                .with_matcher(Some(&rules))
                .with_sorted(true)
                .walk(),
        );
        assert!(!found.contains(&PathBuf::from("d1/d2")));
        assert!(!found.contains(&PathBuf::from("d1/d2/f21.txt")));
        assert!(found.contains(&PathBuf::from("d1/f11.txt")));
    }

    #[test]
    fn test_walk_negation_cannot_reach_inside_ignored_directory() {
        let temp = sample_tree();
        let root = SourceRoot::new(temp.path()).unwrap();
        let rules = GitIgnore::from_lines(["d1", "!d1/f11.txt"]).unwrap();
        let found = relatives(TreeWalker::new(&root).with_matcher(Some(&rules)).walk());
        assert!(!found.iter().any(|p| p.starts_with("d1")));
    }

    #[test]
    fn test_walk_kinds() {
        let temp = sample_tree();
        let root = SourceRoot::new(temp.path()).unwrap();
        for entry in TreeWalker::new(&root).walk() {
            let entry = entry.unwrap();
            let expected = if entry.path.is_dir() {
                WalkedKind::Directory
            } else {
                WalkedKind::File
            };
            assert_eq!(entry.kind, expected, "{}", entry.relative.display());
            assert!(entry.path.is_absolute());
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_walk_symlink_reported_as_other_and_not_followed() {
        let temp = sample_tree();
        std::os::unix::fs::symlink(temp.path().join("d1"), temp.path().join("link")).unwrap();
        let root = SourceRoot::new(temp.path()).unwrap();

        let entries: Vec<_> = TreeWalker::new(&root).walk().map(Result::unwrap).collect();
        let link = entries
            .iter()
            .find(|e| e.relative == Path::new("link"))
            .unwrap();
        assert_eq!(link.kind, WalkedKind::Other);
        assert_eq!(
            entries
                .iter()
                .filter(|e| e.relative.starts_with("link"))
                .count(),
            1
        );
    }
}
