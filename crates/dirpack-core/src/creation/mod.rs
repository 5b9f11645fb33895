//! Archive creation.
//!
//! [`TreeWalker`] enumerates the source tree and applies ignore rules,
//! [`TreeWriter`] turns each walked path into a tar entry.

pub mod config;
pub mod report;
pub mod tar;
pub mod walker;

pub use config::ArchiveConfig;
pub use report::CreationReport;
pub use self::tar::TreeWriter;
pub use walker::TreeWalker;
pub use walker::WalkedEntry;
pub use walker::WalkedKind;
