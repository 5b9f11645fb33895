//! Directory-tree archiving to tar streams, with extraction that refuses to
//! write outside its destination.
//!
//! `dirpack-core` writes the directories and regular files of a tree as a
//! tar stream, optionally filtered by the tree's `.gitignore` and with
//! `.git` directories left out, and reads such streams back into a
//! destination directory. Both directions have a gzip-compressed variant.
//!
//! # Examples
//!
//! ```no_run
//! use dirpack_core::ArchiveConfig;
//! use dirpack_core::compress_and_archive;
//! use dirpack_core::decompress_and_unarchive;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ArchiveConfig::default()
//!     .with_honor_ignore_rules(true)
//!     .with_exclude_vcs_dir(true);
//!
//! let mut buf = Vec::new();
//! let created = compress_and_archive("./project", &mut buf, &config)?;
//! let extracted = decompress_and_unarchive("/tmp/copy", buf.as_slice())?;
//! assert_eq!(created.files_added, extracted.files_extracted);
//! # Ok(())
//! # }
//! ```
//!
//! # Logging
//!
//! The library emits `tracing` events: `debug` per entry and per skipped
//! object, `info` per completed call. Installing a subscriber is left to
//! the application.

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod api;
pub mod compression;
pub mod creation;
pub mod error;
pub mod extraction;
pub mod ignore;
pub mod io;
pub mod report;
pub mod types;

#[doc(hidden)]
pub mod test_utils;

pub use api::archive;
pub use api::compress_and_archive;
pub use api::decompress_and_unarchive;
pub use api::unarchive;
pub use compression::CompressionLevel;
pub use creation::ArchiveConfig;
pub use creation::CreationReport;
pub use error::ArchiveError;
pub use error::Result;
pub use ignore::GitIgnore;
pub use ignore::IgnoreMatcher;
pub use report::ExtractionReport;
