//! File load/save wrappers: read all bytes then decode, or encode then
//! write all bytes. Nothing here streams.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::cbor::CborError;
use crate::json::JsonError;
use crate::value::{NodeId, Tree};

#[derive(Debug, Error)]
pub enum FileError {
    #[error("i/o failure: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] JsonError),
    #[error(transparent)]
    Cbor(#[from] CborError),
}

pub fn load_json(tree: &mut Tree, path: impl AsRef<Path>) -> Result<NodeId, FileError> {
    let content = fs::read(path)?;
    Ok(crate::json::decode(tree, &content)?)
}

pub fn save_json(tree: &Tree, id: NodeId, path: impl AsRef<Path>) -> Result<(), FileError> {
    let text = crate::json::encode(tree, id);
    Ok(fs::write(path, text)?)
}

pub fn load_cbor(tree: &mut Tree, path: impl AsRef<Path>) -> Result<NodeId, FileError> {
    let content = fs::read(path)?;
    let (id, _) = crate::cbor::decode(tree, &content)?;
    Ok(id)
}

pub fn save_cbor(tree: &Tree, id: NodeId, path: impl AsRef<Path>) -> Result<(), FileError> {
    let buf = crate::cbor::encode(tree, id);
    Ok(fs::write(path, buf)?)
}
