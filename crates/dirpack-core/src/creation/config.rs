//! Configuration for archive creation operations.

use crate::CompressionLevel;
use crate::Result;

/// Configuration for archive creation operations.
///
/// Controls which paths of the source tree become entries, the traversal
/// order and the gzip level used by the compressed variant.
///
/// # Examples
///
/// ```
/// use dirpack_core::ArchiveConfig;
/// use dirpack_core::CompressionLevel;
///
/// // Archive everything, natural order
/// let config = ArchiveConfig::default();
///
/// // Typical source checkout
/// let custom = ArchiveConfig::git_repo()
///     .with_compression_level(CompressionLevel::BestCompression);
/// assert!(custom.honor_ignore_rules && custom.exclude_vcs_dir);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArchiveConfig {
    /// Apply the rules of `.gitignore` at the root of the source tree.
    ///
    /// The pattern file itself is left out of the archive. It must exist
    /// when this is set.
    ///
    /// Default: `false`.
    pub honor_ignore_rules: bool,

    /// Leave `.git` directories out of the archive at any depth.
    ///
    /// Default: `false`.
    pub exclude_vcs_dir: bool,

    /// Gzip level used by `compress_and_archive`.
    ///
    /// Ignored by the uncompressed writer.
    ///
    /// Default: [`CompressionLevel::Default`].
    pub compression_level: CompressionLevel,

    /// Visit directory children in file-name order.
    ///
    /// Makes archives of the same tree byte-for-byte reproducible apart
    /// from timestamps. When `false` the filesystem order is used.
    ///
    /// Default: `false`.
    pub sorted: bool,
}

impl ArchiveConfig {
    /// Creates a new `ArchiveConfig` with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a configuration for a git checkout: `.gitignore` rules are
    /// honored and `.git` directories are left out.
    #[must_use]
    pub fn git_repo() -> Self {
        Self::default()
            .with_honor_ignore_rules(true)
            .with_exclude_vcs_dir(true)
    }

    /// Sets whether `.gitignore` rules are applied.
    #[must_use]
    pub fn with_honor_ignore_rules(mut self, honor: bool) -> Self {
        self.honor_ignore_rules = honor;
        self
    }

    /// Sets whether `.git` directories are excluded.
    #[must_use]
    pub fn with_exclude_vcs_dir(mut self, exclude: bool) -> Self {
        self.exclude_vcs_dir = exclude;
        self
    }

    /// Sets the gzip level.
    #[must_use]
    pub fn with_compression_level(mut self, level: CompressionLevel) -> Self {
        self.compression_level = level;
        self
    }

    /// Sets whether directory children are visited in sorted order.
    #[must_use]
    pub fn with_sorted(mut self, sorted: bool) -> Self {
        self.sorted = sorted;
        self
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns `InvalidCompressionLevel` if an explicit level is above 9.
    pub fn validate(&self) -> Result<()> {
        self.compression_level.validate()
    }
}
