//! The text codec.
//!
//! Decoding accepts a superset of JSON: `//` line comments and nestable
//! `/* */` block comments count as whitespace. Encoding is compact
//! except for a single space after `:` and `,`, formats floats with a
//! fixed six decimals (intentionally lossy), and `\uXXXX`-escapes every
//! non-ASCII code point.
//!
//! Byte strings have no JSON shape of their own; they serialize as
//! `data:application/octet-stream;base64,` URI strings and the decoder
//! turns such strings back into byte strings.

mod decoder;
mod encoder;
mod error;

pub use decoder::{decode, JsonDecoder};
pub use encoder::encode;
pub use error::JsonError;

pub(crate) const DATA_URI_PREFIX: &str = "data:application/octet-stream;base64,";
