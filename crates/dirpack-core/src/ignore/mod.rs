//! Ignore-rule support for archive creation.
//!
//! The writer only depends on [`IgnoreMatcher`]; pattern syntax, negation
//! precedence and compilation live in [`GitIgnore`].

pub mod gitignore;

pub use gitignore::GitIgnore;

use std::path::Path;

use crate::Result;
use crate::creation::ArchiveConfig;

/// Name of the pattern file looked up at the root of the archived tree.
pub const IGNORE_FILE_NAME: &str = ".gitignore";

/// Implicit rule excluding version-control directories at any depth.
pub const VCS_DIR_RULE: &str = "**/.git";

/// Decides whether a path relative to the archive root is excluded.
///
/// Implementations must not touch the filesystem: `is_dir` tells them
/// whether the candidate is a directory.
///
/// # Examples
///
/// ```
/// use dirpack_core::IgnoreMatcher;
/// use std::path::Path;
///
/// struct SkipTarget;
///
/// impl IgnoreMatcher for SkipTarget {
///     fn matches(&self, relative_path: &Path, is_dir: bool) -> bool {
///         is_dir && relative_path == Path::new("target")
///     }
/// }
///
/// assert!(SkipTarget.matches(Path::new("target"), true));
/// assert!(!SkipTarget.matches(Path::new("src"), true));
/// ```
pub trait IgnoreMatcher {
    /// Returns `true` if the path must be left out of the archive.
    fn matches(&self, relative_path: &Path, is_dir: bool) -> bool;
}

impl<M: IgnoreMatcher + ?Sized> IgnoreMatcher for &M {
    fn matches(&self, relative_path: &Path, is_dir: bool) -> bool {
        (**self).matches(relative_path, is_dir)
    }
}

/// Builds the rule set for one archive call rooted at `root`.
///
/// | `honor_ignore_rules` | `exclude_vcs_dir` | rules |
/// |---|---|---|
/// | no | no | none |
/// | yes | no | `.gitignore` file + `.gitignore` |
/// | no | yes | `**/.git` |
/// | yes | yes | `.gitignore` file + `**/.git` + `.gitignore` |
///
/// # Errors
///
/// Returns `IgnoreFile` if `honor_ignore_rules` is set and the pattern file
/// cannot be read, or `InvalidPattern` for a rule that fails to compile.
pub fn build_matcher(root: &Path, config: &ArchiveConfig) -> Result<Option<GitIgnore>> {
    let ignore_file = root.join(IGNORE_FILE_NAME);

    let matcher = match (config.honor_ignore_rules, config.exclude_vcs_dir) {
        (true, true) => Some(GitIgnore::from_file_and_lines(
            &ignore_file,
            [VCS_DIR_RULE, IGNORE_FILE_NAME],
        )?),
        (true, false) => Some(GitIgnore::from_file_and_lines(
            &ignore_file,
            [IGNORE_FILE_NAME],
        )?),
        (false, true) => Some(GitIgnore::from_lines([VCS_DIR_RULE])?),
        (false, false) => None,
    };

    if let Some(gi) = &matcher {
        tracing::debug!(rules = gi.len(), root = %root.display(), "compiled ignore rules");
    }

    Ok(matcher)
}
