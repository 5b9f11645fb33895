//! Tar stream reader that rebuilds a tree under a destination directory.

use std::fs::File;
use std::fs::create_dir_all;
use std::io::BufWriter;
use std::io::Read;
use std::io::Write;
use std::path::Path;
use std::time::Instant;

use tar::Archive;
use tar::EntryType;

use crate::ArchiveError;
use crate::ExtractionReport;
use crate::Result;
use crate::types::DestDir;
use crate::types::SafePath;

/// Extracts directory and regular-file entries into a destination.
///
/// Every entry name is resolved with [`SafePath::resolve`] before anything
/// touches the filesystem; the first name that is absolute or escapes the
/// destination aborts the whole extraction. Entries of any other type are
/// skipped and recorded in the report.
///
/// Extraction is streaming: entries already written stay on disk when a
/// later entry fails.
///
/// # Examples
///
/// ```no_run
/// use dirpack_core::extraction::TreeReader;
/// use dirpack_core::types::DestDir;
/// use std::fs::File;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let dest = DestDir::new("/tmp/out")?;
/// let report = TreeReader::new(&dest).unpack(File::open("tree.tar")?)?;
/// println!("{} files", report.files_extracted);
/// # Ok(())
/// # }
/// ```
pub struct TreeReader<'d> {
    dest: &'d DestDir,
    report: ExtractionReport,
}

impl<'d> TreeReader<'d> {
    /// Creates a reader extracting into `dest`.
    #[must_use]
    pub fn new(dest: &'d DestDir) -> Self {
        Self {
            dest,
            report: ExtractionReport::default(),
        }
    }

    /// Reads entries from `source` until the end-of-archive marker.
    ///
    /// # Errors
    ///
    /// - `InvalidArchive` if a header cannot be parsed
    /// - `IllegalPath` if an entry name is absolute or escapes the destination
    /// - `Io` if a directory or file cannot be created or written
    pub fn unpack<R: Read>(mut self, source: R) -> Result<ExtractionReport> {
        let start = Instant::now();
        let mut archive = Archive::new(source);

        let entries = archive.entries().map_err(ArchiveError::InvalidArchive)?;

        for entry_result in entries {
            let mut entry = entry_result.map_err(ArchiveError::InvalidArchive)?;

            let name = entry
                .path()
                .map_err(ArchiveError::InvalidArchive)?
                .into_owned();
            let safe_path = SafePath::resolve(&name, self.dest)?;

            let mode = entry.header().mode().map_err(ArchiveError::InvalidArchive)? & 0o7777;

            match entry.header().entry_type() {
                EntryType::Directory => self.create_directory(&safe_path, mode)?,
                EntryType::Regular | EntryType::Continuous => {
                    self.extract_file(&mut entry, &safe_path, mode)?;
                }
                other => self.skip(&name, other),
            }
        }

        self.report.duration = start.elapsed();
        Ok(self.report)
    }

    fn create_directory(&mut self, safe_path: &SafePath, mode: u32) -> Result<()> {
        let target = safe_path.as_path();
        if std::fs::metadata(target).is_ok() {
            return Ok(());
        }

        let mut builder = std::fs::DirBuilder::new();
        builder.recursive(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::DirBuilderExt;
            use std::os::unix::fs::PermissionsExt;
            builder.mode(mode);
            builder.create(target)?;
            // DirBuilder::mode is filtered by the umask.
            std::fs::set_permissions(target, std::fs::Permissions::from_mode(mode))?;
        }
        #[cfg(not(unix))]
        {
            let _ = mode;
            builder.create(target)?;
        }

        self.report.directories_created += 1;
        tracing::debug!(path = %safe_path.relative().display(), mode, "created directory");
        Ok(())
    }

    fn extract_file<R: Read>(
        &mut self,
        reader: &mut R,
        safe_path: &SafePath,
        mode: u32,
    ) -> Result<()> {
        let target = safe_path.as_path();

        if let Some(parent) = target.parent() {
            create_dir_all(parent)?;
        }

        let file = File::create(target)?;
        let mut writer = BufWriter::with_capacity(64 * 1024, file);
        let bytes = std::io::copy(reader, &mut writer)?;
        writer.flush()?;
        drop(writer);

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(target, std::fs::Permissions::from_mode(mode))?;
        }
        #[cfg(not(unix))]
        let _ = mode;

        self.report.files_extracted += 1;
        self.report.bytes_written += bytes;
        tracing::debug!(path = %safe_path.relative().display(), bytes, "extracted file");
        Ok(())
    }

    fn skip(&mut self, name: &Path, kind: EntryType) {
        self.report.entries_skipped += 1;
        self.report
            .add_warning(format!("skipped {}: unsupported entry type {kind:?}", name.display()));
        tracing::debug!(path = %name.display(), kind = ?kind, "skipped entry");
    }
}
