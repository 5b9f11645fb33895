//! I/O adapters shared by the writer and the compressed variants.

pub mod counting;

pub use counting::CountingWriter;
