//! Byte-level substrate for the cbor-tree binary codec.
//!
//! [`Writer`] is an auto-growing output buffer with big-endian integer
//! writes; [`Reader`] is a cursor over a borrowed input slice whose
//! `try_*` methods bounds-check every read instead of panicking.

mod error;
mod reader;
mod writer;

pub use error::BufferError;
pub use reader::Reader;
pub use writer::Writer;
