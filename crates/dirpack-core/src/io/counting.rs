//! Byte-counting sink wrapper.

use std::io::Write;

/// Write adapter that counts the bytes accepted by the inner sink.
///
/// Wrapped around the caller's sink so the creation report can state how
/// many bytes actually left the writer, after tar framing and, when
/// present, gzip compression.
///
/// # Examples
///
/// ```
/// use dirpack_core::io::CountingWriter;
/// use std::io::Write;
///
/// let mut writer = CountingWriter::new(Vec::new());
/// writer.write_all(b"entry ")?;
/// writer.write_all(b"bytes")?;
///
/// assert_eq!(writer.total_bytes(), 11);
/// assert_eq!(writer.into_inner(), b"entry bytes");
/// # Ok::<(), std::io::Error>(())
/// ```
#[derive(Debug)]
pub struct CountingWriter<W> {
    inner: W,
    bytes_written: u64,
}

impl<W> CountingWriter<W> {
    /// Wraps `inner` with a zeroed counter.
    #[must_use]
    pub fn new(inner: W) -> Self {
        Self {
            inner,
            bytes_written: 0,
        }
    }

    /// Bytes accepted by the inner sink so far.
    #[must_use]
    pub fn total_bytes(&self) -> u64 {
        self.bytes_written
    }

    /// Returns the inner sink.
    #[must_use]
    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: Write> Write for CountingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let bytes = self.inner.write(buf)?;
        self.bytes_written += bytes as u64;
        Ok(bytes)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.inner.flush()
    }
}
