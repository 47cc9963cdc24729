use thiserror::Error;

/// Malformed-input failures of the binary decoder. Every variant carries
/// the byte offset of the item that could not be read; any failure
/// aborts the whole parse with no partial tree.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CborError {
    #[error("unexpected end of input at offset {offset}")]
    EndOfInput { offset: usize },
    #[error("unknown additional info {info} for major type {major} at offset {offset}")]
    UnknownAdditional { major: u8, info: u8, offset: usize },
    #[error("indefinite-length chunk has mismatched major type at offset {offset}")]
    ChunkTypeMismatch { offset: usize },
    #[error("tag item at offset {offset} has no content item")]
    MissingTagContent { offset: usize },
}
