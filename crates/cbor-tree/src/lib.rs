//! An in-memory generic value model with two wire codecs.
//!
//! The centre of the crate is [`Tree`], an arena holding a tree of
//! tagged-variant nodes: integers, byte/text strings, floats and other
//! simple values, tags, and the two containers (arrays and maps of
//! key/value pairs). Containers keep their children in an intrusive
//! doubly-linked list addressed by [`NodeId`] handles, so insertion and
//! removal anywhere in a container is O(1) once the node is in hand.
//!
//! Two codecs build and consume the same tree:
//!
//! - [`cbor`] — a binary format with CBOR major-type/length headers,
//!   indefinite-length streaming decode and minimal-width encode;
//! - [`json`] — a JSON text format with comment support on decode.
//!
//! Path-based editing of the tree lives in the companion
//! `cbor-tree-pointer` crate.

pub mod cbor;
pub mod fs;
pub mod json;
pub mod value;

pub use fs::FileError;
pub use value::{Kind, NodeId, Simple, Tree};
