//! Tar stream writer for a source tree.

use crate::IgnoreMatcher;
use crate::Result;
use crate::creation::report::CreationReport;
use crate::creation::walker::TreeWalker;
use crate::creation::walker::WalkedEntry;
use crate::creation::walker::WalkedKind;
use crate::io::CountingWriter;
use crate::types::SourceRoot;
use std::fs::File;
use std::io;
use std::io::Read;
use std::io::Write;
use std::path::Path;
use std::time::Instant;
use tar::Builder;
use tar::EntryType;
use tar::Header;

/// Writes directories and regular files of a source tree as tar entries.
///
/// Entries use GNU headers, so names longer than 100 bytes are carried in
/// GNU long-name records. Every header carries the permission bits, owner
/// and modification time of the source object.
///
/// Nothing is written to the sink until [`TreeWriter::append_tree`] runs,
/// and the end-of-archive trailer is written by [`TreeWriter::finish`].
///
/// # Examples
///
/// ```no_run
/// use dirpack_core::creation::TreeWriter;
/// use dirpack_core::types::SourceRoot;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let root = SourceRoot::new("./project")?;
/// let mut writer = TreeWriter::new(Vec::new()).with_sorted(true);
/// writer.append_tree(&root)?;
/// let (bytes, report) = writer.finish()?;
/// println!("{} files, {} bytes", report.files_added, bytes.len());
/// # Ok(())
/// # }
/// ```
pub struct TreeWriter<'m, W: Write> {
    builder: Builder<CountingWriter<W>>,
    matcher: Option<&'m dyn IgnoreMatcher>,
    sorted: bool,
    report: CreationReport,
    start: Instant,
}

impl<'m, W: Write> TreeWriter<'m, W> {
    /// Creates a writer over `sink`.
    pub fn new(sink: W) -> Self {
        Self {
            builder: Builder::new(CountingWriter::new(sink)),
            matcher: None,
            sorted: false,
            report: CreationReport::default(),
            start: Instant::now(),
        }
    }

    /// Sets the matcher deciding which paths are left out.
    #[must_use]
    pub fn with_matcher(mut self, matcher: Option<&'m dyn IgnoreMatcher>) -> Self {
        self.matcher = matcher;
        self
    }

    /// Visits directory children in file-name order.
    #[must_use]
    pub fn with_sorted(mut self, sorted: bool) -> Self {
        self.sorted = sorted;
        self
    }

    /// Appends one entry per eligible path beneath `root`.
    ///
    /// # Errors
    ///
    /// Returns the first walk, read or write failure. Entries appended
    /// before the failure remain in the sink.
    pub fn append_tree(&mut self, root: &SourceRoot) -> Result<()> {
        let walker = TreeWalker::new(root)
            .with_matcher(self.matcher)
            .with_sorted(self.sorted);

        for entry in walker.walk() {
            let entry = entry?;
            match entry.kind {
                WalkedKind::Directory => self.append_directory(&entry)?,
                WalkedKind::File => self.append_file(&entry)?,
                WalkedKind::Other => self.skip(&entry),
            }
        }

        Ok(())
    }

    /// Writes the end-of-archive trailer and flushes the sink.
    ///
    /// # Errors
    ///
    /// Returns an error if the trailer cannot be written or the sink fails
    /// to flush.
    pub fn finish(self) -> Result<(W, CreationReport)> {
        let Self {
            mut builder,
            mut report,
            start,
            ..
        } = self;

        builder.finish()?;
        let mut counting_writer = builder.into_inner()?;
        counting_writer.flush()?;

        report.bytes_compressed = counting_writer.total_bytes();
        report.duration = start.elapsed();

        Ok((counting_writer.into_inner(), report))
    }

    fn append_directory(&mut self, entry: &WalkedEntry) -> Result<()> {
        let metadata = std::fs::metadata(&entry.path)?;

        let mut header = Header::new_gnu();
        header.set_entry_type(EntryType::Directory);
        header.set_size(0);
        set_metadata(&mut header, &metadata);

        self.builder
            .append_data(&mut header, &entry.relative, std::io::empty())?;

        self.report.directories_added += 1;
        tracing::debug!(path = %entry.relative.display(), "added directory");
        Ok(())
    }

    fn append_file(&mut self, entry: &WalkedEntry) -> Result<()> {
        let mut file = File::open(&entry.path)?;
        let metadata = file.metadata()?;
        let size = metadata.len();

        let mut header = Header::new_gnu();
        header.set_entry_type(EntryType::Regular);
        header.set_size(size);
        set_metadata(&mut header, &metadata);

        append_sized(&mut self.builder, &mut header, &entry.relative, &mut file, size)?;

        self.report.files_added += 1;
        self.report.bytes_written += size;
        tracing::debug!(path = %entry.relative.display(), size, "added file");
        Ok(())
    }

    fn skip(&mut self, entry: &WalkedEntry) {
        self.report.entries_skipped += 1;
        self.report.add_warning(format!(
            "skipped {}: not a regular file or directory",
            entry.relative.display()
        ));
        tracing::debug!(path = %entry.relative.display(), "skipped special file");
    }
}

/// Appends an entry whose body is exactly `size` bytes of `reader`.
///
/// The header size is taken before the copy, so a source that grows or
/// shrinks in the meantime fails the entry instead of desynchronizing the
/// stream.
fn append_sized<W: Write, R: Read>(
    builder: &mut Builder<W>,
    header: &mut Header,
    name: &Path,
    reader: R,
    size: u64,
) -> Result<()> {
    let mut body = reader.take(size);
    builder.append_data(header, name, &mut body)?;

    let missing = body.limit();
    let mut rest = body.into_inner();
    if missing != 0 || rest.read(&mut [0u8; 1])? != 0 {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!(
                "{} changed size while being archived (expected {size} bytes)",
                name.display()
            ),
        )
        .into());
    }
    Ok(())
}

/// Copies permission bits, owner and mtime into a header.
#[cfg(unix)]
fn set_metadata(header: &mut Header, metadata: &std::fs::Metadata) {
    use std::os::unix::fs::MetadataExt;
    header.set_mode(metadata.mode() & 0o7777);
    header.set_uid(u64::from(metadata.uid()));
    header.set_gid(u64::from(metadata.gid()));
    // mtime can be negative for dates before epoch, clamp to 0
    #[allow(clippy::cast_sign_loss)]
    let mtime = metadata.mtime().max(0) as u64;
    header.set_mtime(mtime);
}

#[cfg(not(unix))]
fn set_metadata(header: &mut Header, metadata: &std::fs::Metadata) {
    let mode = match (metadata.is_dir(), metadata.permissions().readonly()) {
        (true, _) => 0o755,
        (false, true) => 0o444,
        (false, false) => 0o644,
    };
    header.set_mode(mode);

    if let Ok(modified) = metadata.modified()
        && let Ok(duration) = modified.duration_since(std::time::UNIX_EPOCH)
    {
        header.set_mtime(duration.as_secs());
    }
}
