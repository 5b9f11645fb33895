//! Archive extraction.
//!
//! [`TreeReader`] consumes an uncompressed tar stream; the compressed
//! variant wraps the source in a gzip decoder first.

pub mod tar;

pub use self::tar::TreeReader;
