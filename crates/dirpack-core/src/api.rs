//! High-level public API for archiving and extracting directory trees.

use std::io::Read;
use std::io::Write;
use std::path::Path;

use tracing::instrument;

use crate::ExtractionReport;
use crate::GitIgnore;
use crate::IgnoreMatcher;
use crate::Result;
use crate::compression::gzip_reader;
use crate::compression::gzip_writer;
use crate::creation::ArchiveConfig;
use crate::creation::CreationReport;
use crate::creation::TreeWriter;
use crate::extraction::TreeReader;
use crate::ignore::build_matcher;
use crate::io::CountingWriter;
use crate::types::DestDir;
use crate::types::SourceRoot;

/// Writes the tree rooted at `source_dir` to `sink` as a tar stream.
///
/// Directories and regular files become entries named by their path
/// relative to `source_dir`; the root itself has no entry. Symbolic links
/// are not followed and, like other special files, are skipped and listed
/// in the report warnings.
///
/// # Errors
///
/// Returns an error if:
/// - `source_dir` does not exist or is not a directory (nothing is written)
/// - `config.honor_ignore_rules` is set and `.gitignore` cannot be read or
///   contains an invalid pattern (nothing is written)
/// - reading a file or writing to `sink` fails
///
/// # Examples
///
/// ```no_run
/// use dirpack_core::ArchiveConfig;
/// use dirpack_core::archive;
/// use std::fs::File;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = ArchiveConfig::default().with_honor_ignore_rules(true);
/// let report = archive("./project", File::create("project.tar")?, &config)?;
/// println!("Archived {} files", report.files_added);
/// # Ok(())
/// # }
/// ```
#[instrument(skip_all, fields(source = %source_dir.as_ref().display()), err)]
pub fn archive<P: AsRef<Path>, W: Write>(
    source_dir: P,
    sink: W,
    config: &ArchiveConfig,
) -> Result<CreationReport> {
    let (root, matcher) = prepare_source(source_dir.as_ref(), config)?;

    let (_, report) = write_tree(&root, matcher.as_ref(), sink, config)?;

    tracing::info!(
        files = report.files_added,
        directories = report.directories_added,
        skipped = report.entries_skipped,
        bytes = report.bytes_compressed,
        "archive written"
    );
    Ok(report)
}

/// Extracts the tar stream read from `source` into `dest_dir`.
///
/// # Errors
///
/// Returns an error if:
/// - `dest_dir` does not exist or is not a directory (nothing is read)
/// - the stream is not a valid tar archive
/// - an entry name is absolute or resolves outside `dest_dir`
/// - a directory or file cannot be created or written
///
/// Entries extracted before the failure are left in place.
///
/// # Examples
///
/// ```no_run
/// use dirpack_core::unarchive;
/// use std::fs::File;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let report = unarchive("/tmp/output", File::open("project.tar")?)?;
/// println!("Extracted {} files", report.files_extracted);
/// # Ok(())
/// # }
/// ```
#[instrument(skip_all, fields(dest = %dest_dir.as_ref().display()), err)]
pub fn unarchive<P: AsRef<Path>, R: Read>(dest_dir: P, source: R) -> Result<ExtractionReport> {
    let dest = DestDir::new(dest_dir)?;
    let report = TreeReader::new(&dest).unpack(source)?;
    log_extraction(&report);
    Ok(report)
}

/// Like [`archive`], with the tar stream gzip-compressed at
/// `config.compression_level`.
///
/// # Errors
///
/// The errors of [`archive`], plus `InvalidCompressionLevel` for an explicit
/// level above 9 (nothing is written).
///
/// # Examples
///
/// ```no_run
/// use dirpack_core::ArchiveConfig;
/// use dirpack_core::CompressionLevel;
/// use dirpack_core::compress_and_archive;
/// use std::fs::File;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = ArchiveConfig::default()
///     .with_exclude_vcs_dir(true)
///     .with_compression_level(CompressionLevel::BestCompression);
/// let report = compress_and_archive("./project", File::create("project.tar.gz")?, &config)?;
/// println!("{:.1}x smaller", report.compression_ratio());
/// # Ok(())
/// # }
/// ```
#[instrument(
    skip_all,
    fields(source = %source_dir.as_ref().display(), level = ?config.compression_level),
    err
)]
pub fn compress_and_archive<P: AsRef<Path>, W: Write>(
    source_dir: P,
    sink: W,
    config: &ArchiveConfig,
) -> Result<CreationReport> {
    config.validate()?;
    let (root, matcher) = prepare_source(source_dir.as_ref(), config)?;

    let encoder = gzip_writer(CountingWriter::new(sink), config.compression_level);
    let (encoder, mut report) = write_tree(&root, matcher.as_ref(), encoder, config)?;
    let mut counting_writer = encoder.finish()?;
    counting_writer.flush()?;
    report.bytes_compressed = counting_writer.total_bytes();

    tracing::info!(
        files = report.files_added,
        directories = report.directories_added,
        skipped = report.entries_skipped,
        bytes = report.bytes_compressed,
        "compressed archive written"
    );
    Ok(report)
}

/// Like [`unarchive`], for a gzip-compressed tar stream.
///
/// The gzip envelope is checked before the destination, so a source that
/// is not gzip fails with `InvalidCompression` whatever `dest_dir` is.
///
/// # Errors
///
/// The errors of [`unarchive`], plus `InvalidCompression` when `source`
/// does not start with a gzip header.
///
/// # Examples
///
/// ```no_run
/// use dirpack_core::decompress_and_unarchive;
/// use std::fs::File;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let report = decompress_and_unarchive("/tmp/output", File::open("project.tar.gz")?)?;
/// # Ok(())
/// # }
/// ```
#[instrument(skip_all, fields(dest = %dest_dir.as_ref().display()), err)]
pub fn decompress_and_unarchive<P: AsRef<Path>, R: Read>(
    dest_dir: P,
    source: R,
) -> Result<ExtractionReport> {
    let decoder = gzip_reader(source)?;
    let dest = DestDir::new(dest_dir)?;
    let report = TreeReader::new(&dest).unpack(decoder)?;
    log_extraction(&report);
    Ok(report)
}

/// Validates the source and compiles its ignore rules before any output.
fn prepare_source(
    source_dir: &Path,
    config: &ArchiveConfig,
) -> Result<(SourceRoot, Option<GitIgnore>)> {
    let root = SourceRoot::new(source_dir)?;
    let matcher = build_matcher(root.as_path(), config)?;
    Ok((root, matcher))
}

fn write_tree<W: Write>(
    root: &SourceRoot,
    matcher: Option<&GitIgnore>,
    sink: W,
    config: &ArchiveConfig,
) -> Result<(W, CreationReport)> {
    let mut writer = TreeWriter::new(sink)
        .with_matcher(matcher.map(|m| m as &dyn IgnoreMatcher))
        .with_sorted(config.sorted);
    writer.append_tree(root)?;
    writer.finish()
}

fn log_extraction(report: &ExtractionReport) {
    tracing::info!(
        files = report.files_extracted,
        directories = report.directories_created,
        skipped = report.entries_skipped,
        bytes = report.bytes_written,
        "archive extracted"
    );
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::ArchiveError;
    use crate::CompressionLevel;
    use crate::test_utils::write_file;
    use std::fs;
    use tempfile::TempDir;
    use tracing_test::traced_test;

    #[test]
    fn test_archive_round_trip() {
        let src = TempDir::new().unwrap();
        write_file(src.path(), "d1/f11.txt", b"eleven");
        write_file(src.path(), "f1.txt", b"one");

        let mut buf = Vec::new();
        let report = archive(src.path(), &mut buf, &ArchiveConfig::default()).unwrap();
        assert_eq!(report.files_added, 2);
        assert_eq!(report.bytes_compressed, buf.len() as u64);

        let dest = TempDir::new().unwrap();
        let report = unarchive(dest.path(), buf.as_slice()).unwrap();
        assert_eq!(report.files_extracted, 2);
        assert_eq!(fs::read(dest.path().join("d1/f11.txt")).unwrap(), b"eleven");
    }

    #[test]
    fn test_archive_missing_ignore_file_writes_nothing() {
        let src = TempDir::new().unwrap();
        write_file(src.path(), "f1.txt", b"one");

        let mut buf = Vec::new();
        let config = ArchiveConfig::default().with_honor_ignore_rules(true);
        let result = archive(src.path(), &mut buf, &config);
        assert!(matches!(result, Err(ArchiveError::IgnoreFile { .. })));
        assert!(buf.is_empty());
    }

    #[test]
    fn test_compress_invalid_level_writes_nothing() {
        let src = TempDir::new().unwrap();
        let mut buf = Vec::new();
        let config = ArchiveConfig::default().with_compression_level(CompressionLevel::Level(11));
        let result = compress_and_archive(src.path(), &mut buf, &config);
        assert!(matches!(
            result,
            Err(ArchiveError::InvalidCompressionLevel { level: 11 })
        ));
        assert!(buf.is_empty());
    }

    #[test]
    fn test_compressed_round_trip_reports_output_size() {
        let src = TempDir::new().unwrap();
        write_file(src.path(), "big.txt", "repeat ".repeat(4096).as_bytes());

        let mut buf = Vec::new();
        let report = compress_and_archive(src.path(), &mut buf, &ArchiveConfig::default()).unwrap();
        assert_eq!(report.bytes_compressed, buf.len() as u64);
        assert!(report.compression_ratio() > 1.0);

        let dest = TempDir::new().unwrap();
        decompress_and_unarchive(dest.path(), buf.as_slice()).unwrap();
        assert_eq!(
            fs::read(dest.path().join("big.txt")).unwrap(),
            "repeat ".repeat(4096).as_bytes()
        );
    }

    #[test]
    fn test_decompress_checks_envelope_before_destination() {
        let missing = TempDir::new().unwrap().path().join("gone");
        let result = decompress_and_unarchive(&missing, &b"plain tar bytes"[..]);
        assert!(matches!(result, Err(ArchiveError::InvalidCompression { .. })));
    }

    #[test]
    fn test_unarchive_missing_destination() {
        let missing = TempDir::new().unwrap().path().join("gone");
        let result = unarchive(&missing, &[0u8; 0][..]);
        assert!(matches!(
            result,
            Err(ArchiveError::DestinationNotFound { .. })
        ));
    }

    #[test]
    #[traced_test]
    fn test_archive_logs_summary() {
        let src = TempDir::new().unwrap();
        write_file(src.path(), "f1.txt", b"one");

        archive(src.path(), std::io::sink(), &ArchiveConfig::default()).unwrap();
        assert!(logs_contain("archive written"));
        assert!(logs_contain("added file"));
    }

    #[test]
    #[traced_test]
    fn test_failed_call_logs_error() {
        let file = TempDir::new().unwrap();
        let path = file.path().join("plain.txt");
        fs::write(&path, "x").unwrap();

        let result = archive(&path, std::io::sink(), &ArchiveConfig::default());
        assert!(result.is_err());
        assert!(logs_contain("not a directory"));
    }
}
