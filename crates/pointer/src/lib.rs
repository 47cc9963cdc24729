//! Path addressing for `cbor-tree` value trees, in the JSON-Pointer
//! style.
//!
//! A path is a `/`-separated list of segments; the leading empty segment
//! selects the root, and each segment un-escapes `~1` to `/` and `~0` to
//! `~` before use. On maps a segment matches a pair key; on arrays it is
//! a zero-based index, with `-` meaning the last element (or, for
//! insertion, the append position).
//!
//! A path that does not resolve is an absence (`None`), never a panic or
//! a hard error; mutating operations on unresolved paths leave the tree
//! untouched.

mod edit;
mod find;
mod util;

pub use edit::{add, mv, remove, set};
pub use find::get;
