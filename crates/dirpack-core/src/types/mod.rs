//! Validated path wrappers for archive roots and entry targets.
//!
//! Each type is checked on construction and cannot be built from a raw
//! `PathBuf` without going through that check:
//!
//! - [`SourceRoot`]: existing directory to archive, absolute
//! - [`DestDir`]: existing directory to extract into, absolute
//! - [`SafePath`]: entry target proven to lie inside a [`DestDir`]

pub mod dest_dir;
pub mod safe_path;
pub mod source_root;

pub use dest_dir::DestDir;
pub use safe_path::SafePath;
pub use safe_path::clean_path;
pub use source_root::SourceRoot;
