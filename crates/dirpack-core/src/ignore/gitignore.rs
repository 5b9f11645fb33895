//! Gitignore-style pattern matching built on `globset`.

use std::fs;
use std::path::Component;
use std::path::Path;

use globset::Candidate;
use globset::GlobBuilder;
use globset::GlobSet;
use globset::GlobSetBuilder;

use super::IgnoreMatcher;
use crate::ArchiveError;
use crate::Result;

/// Per-glob bookkeeping, indexed like the compiled `GlobSet`.
#[derive(Debug, Clone, Copy)]
struct GlobMeta {
    negate: bool,
    dir_only: bool,
    /// Glob matches paths beneath the rule's target rather than the target.
    descendant: bool,
}

/// A parsed, not yet compiled, ignore rule.
#[derive(Debug, PartialEq, Eq)]
struct Rule {
    glob: String,
    negate: bool,
    dir_only: bool,
}

/// Compiled set of gitignore rules.
///
/// Supported syntax:
/// - blank lines and lines starting with `#` are skipped
/// - `\#` and `\!` escape a leading `#` or `!`
/// - `!pattern` re-includes a path excluded by an earlier rule
/// - `pattern/` only matches directories
/// - a leading or inner `/` anchors the rule to the root; otherwise the
///   rule matches at any depth
/// - `*`, `?`, `[...]` and `**` glob syntax
///
/// The last matching rule decides. A rule matching a directory also
/// matches everything beneath it.
///
/// # Examples
///
/// ```
/// use dirpack_core::GitIgnore;
/// use dirpack_core::IgnoreMatcher;
/// use std::path::Path;
///
/// let ignore = GitIgnore::from_lines(["*.log", "!keep.log", "build/"])?;
/// assert!(ignore.matches(Path::new("debug.log"), false));
/// assert!(!ignore.matches(Path::new("keep.log"), false));
/// assert!(ignore.matches(Path::new("build"), true));
/// assert!(!ignore.matches(Path::new("build"), false));
/// # Ok::<(), dirpack_core::ArchiveError>(())
/// ```
#[derive(Debug, Clone)]
pub struct GitIgnore {
    set: GlobSet,
    meta: Vec<GlobMeta>,
    rules: usize,
}

impl GitIgnore {
    /// Compiles rules from individual pattern lines.
    pub fn from_lines<I, S>(lines: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut builder = GlobSetBuilder::new();
        let mut meta = Vec::new();
        let mut rules = 0;

        for line in lines {
            let Some(rule) = parse_line(line.as_ref()) else {
                continue;
            };
            rules += 1;

            let descendants = format!("{}/**", rule.glob);
            for (glob, descendant) in [(rule.glob.as_str(), false), (descendants.as_str(), true)] {
                let compiled = GlobBuilder::new(glob)
                    .literal_separator(true)
                    .build()
                    .map_err(|e| ArchiveError::InvalidPattern {
                        pattern: line.as_ref().to_string(),
                        reason: e.kind().to_string(),
                    })?;
                builder.add(compiled);
                meta.push(GlobMeta {
                    negate: rule.negate,
                    dir_only: rule.dir_only,
                    descendant,
                });
            }
        }

        let set = builder.build().map_err(|e| ArchiveError::InvalidPattern {
            pattern: e.glob().unwrap_or_default().to_string(),
            reason: e.kind().to_string(),
        })?;

        Ok(Self { set, meta, rules })
    }

    /// Compiles the rules in `path`, followed by `extra` lines.
    ///
    /// The file must exist; its absence is an `IgnoreFile` error.
    pub fn from_file_and_lines<I, S>(path: &Path, extra: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let content = fs::read_to_string(path).map_err(|source| ArchiveError::IgnoreFile {
            path: path.to_path_buf(),
            source,
        })?;

        let lines = content
            .lines()
            .map(str::to_string)
            .chain(extra.into_iter().map(|s| s.as_ref().to_string()));
        Self::from_lines(lines)
    }

    /// Number of effective rules (comments and blank lines excluded).
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules
    }

    /// Returns `true` if no rule was compiled.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules == 0
    }
}

impl IgnoreMatcher for GitIgnore {
    fn matches(&self, relative_path: &Path, is_dir: bool) -> bool {
        let normalized = to_slash(relative_path);
        if normalized.is_empty() {
            return false;
        }

        let candidate = Candidate::new(&normalized);
        self.set
            .matches_candidate(&candidate)
            .into_iter()
            .filter(|&idx| {
                let meta = self.meta[idx];
                meta.descendant || !meta.dir_only || is_dir
            })
            .max()
            .is_some_and(|idx| !self.meta[idx].negate)
    }
}

/// Parses one line of an ignore file into a rule.
fn parse_line(line: &str) -> Option<Rule> {
    let line = line.trim_end_matches('\r');
    // A trailing "\ " keeps its escaped space.
    let line = if line.ends_with("\\ ") {
        line
    } else {
        line.trim_end()
    };

    if line.is_empty() || line.starts_with('#') {
        return None;
    }

    let (negate, mut pattern) = match line.strip_prefix('!') {
        Some(rest) => (true, rest),
        None => (false, line),
    };
    if pattern.starts_with("\\#") || pattern.starts_with("\\!") {
        pattern = &pattern[1..];
    }

    let dir_only = pattern.ends_with('/');
    let pattern = pattern.trim_end_matches('/');

    let (anchored, pattern) = match pattern.strip_prefix('/') {
        Some(rest) => (true, rest),
        None => (pattern.contains('/'), pattern),
    };
    if pattern.is_empty() {
        return None;
    }

    let glob = if anchored || pattern.starts_with("**/") {
        pattern.to_string()
    } else {
        format!("**/{pattern}")
    };

    Some(Rule {
        glob,
        negate,
        dir_only,
    })
}

/// Joins the normal components of a relative path with `/`.
fn to_slash(path: &Path) -> String {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}
