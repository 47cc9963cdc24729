//! The binary codec.
//!
//! Items are framed by a single header byte: the top 3 bits pick the
//! major type, the bottom 5 ("additional info") pick how the value or
//! length is carried — an immediate 0..=23, a big-endian 1/2/4/8-byte
//! field, or (for strings and containers) indefinite length terminated
//! by a break byte.
//!
//! The encoder is minimal-width for integers, string lengths and tag
//! numbers, and minimal-precision for floats; containers, on the other
//! hand, always serialize indefinite-length, and strings always
//! definite, whatever shape they were decoded from.

mod constants;
mod decoder;
mod encoder;
mod error;

pub use decoder::{decode, CborDecoder};
pub use encoder::{encode, CborEncoder};
pub use error::CborError;
