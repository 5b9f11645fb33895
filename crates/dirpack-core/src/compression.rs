//! Gzip compression filter wrapped around the archive byte stream.
//!
//! The tar writer and reader never know compression is happening: the
//! encoder is just another [`Write`] sink and the decoder just another
//! [`Read`] source.
//!
//! # Level Mapping
//!
//! | Level | flate2 |
//! |-------|--------|
//! | `NoCompression` | 0 (stored blocks) |
//! | `BestSpeed` | 1 |
//! | `Default` | 6 |
//! | `BestCompression` | 9 |
//! | `HuffmanOnly` | 1 |
//! | `Level(n)` | n |

use std::io::Chain;
use std::io::Cursor;
use std::io::Read;
use std::io::Write;

use flate2::read::GzDecoder;
use flate2::write::GzEncoder;

use crate::ArchiveError;
use crate::Result;

/// Gzip member header magic bytes.
const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Decoder returned by [`gzip_reader`]: the already-consumed magic bytes
/// chained in front of the rest of the source.
pub type GzipSource<R> = GzDecoder<Chain<Cursor<[u8; 2]>, R>>;

/// Compression level for the gzip filter.
///
/// # Examples
///
/// ```
/// use dirpack_core::CompressionLevel;
///
/// let level = CompressionLevel::BestCompression;
/// assert_eq!(level.to_flate2(), flate2::Compression::best());
/// assert_eq!(CompressionLevel::default(), CompressionLevel::Default);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CompressionLevel {
    /// Store blocks without compressing them.
    NoCompression,

    /// Fastest deflate level.
    BestSpeed,

    /// Balanced default level.
    #[default]
    Default,

    /// Smallest output, slowest.
    BestCompression,

    /// Entropy coding only, no string matching.
    ///
    /// The deflate backend has no strategy switch, so this produces the
    /// same stream as `BestSpeed`.
    HuffmanOnly,

    /// Explicit deflate level in the range 0-9.
    Level(u8),
}

impl CompressionLevel {
    /// Converts to the `flate2` compression level.
    ///
    /// Out-of-range explicit levels are clamped to 9; use
    /// [`CompressionLevel::validate`] to reject them instead.
    #[must_use]
    pub fn to_flate2(self) -> flate2::Compression {
        match self {
            Self::NoCompression => flate2::Compression::none(),
            Self::BestSpeed | Self::HuffmanOnly => flate2::Compression::fast(),
            Self::Default => flate2::Compression::default(),
            Self::BestCompression => flate2::Compression::best(),
            Self::Level(n) => flate2::Compression::new(u32::from(n.min(9))),
        }
    }

    /// Checks that an explicit level is within 0-9.
    pub fn validate(self) -> Result<()> {
        match self {
            Self::Level(level) if level > 9 => {
                Err(ArchiveError::InvalidCompressionLevel { level })
            }
            _ => Ok(()),
        }
    }

    /// All named levels, in increasing order of effort.
    #[must_use]
    pub const fn named() -> [Self; 5] {
        [
            Self::NoCompression,
            Self::HuffmanOnly,
            Self::BestSpeed,
            Self::Default,
            Self::BestCompression,
        ]
    }
}

/// Wraps a sink in a gzip encoder.
///
/// The caller must call [`GzEncoder::finish`] to write the gzip trailer.
#[must_use]
pub fn gzip_writer<W: Write>(sink: W, level: CompressionLevel) -> GzEncoder<W> {
    GzEncoder::new(sink, level.to_flate2())
}

/// Wraps a source in a gzip decoder after checking the envelope magic.
///
/// The two magic bytes are consumed from `source` and replayed in front of
/// the decoder, so no buffering of the rest of the stream is needed.
///
/// # Errors
///
/// Returns `InvalidCompression` if the stream is shorter than the magic or
/// does not start with it, and `Io` for any other read failure.
pub fn gzip_reader<R: Read>(mut source: R) -> Result<GzipSource<R>> {
    let mut magic = [0u8; 2];
    source.read_exact(&mut magic).map_err(|e| {
        if e.kind() == std::io::ErrorKind::UnexpectedEof {
            ArchiveError::InvalidCompression {
                reason: "stream too short for a gzip header".to_string(),
            }
        } else {
            ArchiveError::Io(e)
        }
    })?;

    if magic != GZIP_MAGIC {
        return Err(ArchiveError::InvalidCompression {
            reason: format!("missing gzip magic, found {:02x}{:02x}", magic[0], magic[1]),
        });
    }

    Ok(GzDecoder::new(Cursor::new(magic).chain(source)))
}
