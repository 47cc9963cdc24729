//! Binary decoder.

use cbor_tree_buffers::Reader;

use super::constants::*;
use super::error::CborError;
use crate::value::{Kind, NodeId, Tree};

/// Decodes one item starting at the beginning of `buf` and returns the
/// root node id together with the number of bytes consumed. Trailing
/// bytes are left for the caller.
pub fn decode(tree: &mut Tree, buf: &[u8]) -> Result<(NodeId, usize), CborError> {
    let mut decoder = CborDecoder::new(buf);
    let root = decoder.read_any(tree)?;
    Ok((root, decoder.reader.x))
}

pub struct CborDecoder<'a> {
    pub reader: Reader<'a>,
}

impl<'a> CborDecoder<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self {
            reader: Reader::new(buf),
        }
    }

    fn eof(&self) -> CborError {
        CborError::EndOfInput {
            offset: self.reader.x,
        }
    }

    /// Resolves the additional-info field into a count. `None` means
    /// indefinite length, legal only for strings and containers.
    fn read_count(&mut self, major: u8, info: u8) -> Result<Option<u64>, CborError> {
        match info {
            0..=23 => Ok(Some(info as u64)),
            24 => Ok(Some(self.reader.try_u8().map_err(|_| self.eof())? as u64)),
            25 => Ok(Some(self.reader.try_u16().map_err(|_| self.eof())? as u64)),
            26 => Ok(Some(self.reader.try_u32().map_err(|_| self.eof())? as u64)),
            27 => Ok(Some(self.reader.try_u64().map_err(|_| self.eof())?)),
            INFO_INDEFINITE
                if matches!(major, MAJOR_BYTES | MAJOR_TEXT | MAJOR_ARRAY | MAJOR_MAP) =>
            {
                Ok(None)
            }
            _ => Err(CborError::UnknownAdditional {
                major,
                info,
                // The header byte has already been consumed.
                offset: self.reader.x - 1,
            }),
        }
    }

    /// Like [`read_count`](Self::read_count) for majors where indefinite
    /// length is never legal (integers and tags).
    fn read_definite(&mut self, major: u8, info: u8) -> Result<u64, CborError> {
        match self.read_count(major, info)? {
            Some(val) => Ok(val),
            None => Err(CborError::UnknownAdditional {
                major,
                info,
                offset: self.reader.x - 1,
            }),
        }
    }

    /// Reads the next item and all of its descendants into `tree`.
    pub fn read_any(&mut self, tree: &mut Tree) -> Result<NodeId, CborError> {
        let header = self.reader.try_u8().map_err(|_| self.eof())?;
        let major = header >> 5;
        let info = header & 0x1f;
        match major {
            MAJOR_UINT => {
                let magnitude = self.read_definite(major, info)?;
                Ok(tree.new_uinteger(magnitude))
            }
            MAJOR_NINT => {
                let magnitude = self.read_definite(major, info)?;
                Ok(tree.new_nint(magnitude))
            }
            MAJOR_BYTES | MAJOR_TEXT => self.read_string(tree, major, info),
            MAJOR_ARRAY => {
                let arr = tree.new_array();
                match self.read_count(major, info)? {
                    Some(size) => {
                        for _ in 0..size {
                            let child = self.read_any(tree)?;
                            tree.insert_tail(arr, child);
                        }
                    }
                    None => {
                        while !self.take_break()? {
                            let child = self.read_any(tree)?;
                            tree.insert_tail(arr, child);
                        }
                    }
                }
                Ok(arr)
            }
            MAJOR_MAP => {
                let map = tree.new_map();
                match self.read_count(major, info)? {
                    Some(size) => {
                        for _ in 0..size {
                            self.read_entry(tree, map)?;
                        }
                    }
                    None => {
                        while !self.take_break()? {
                            self.read_entry(tree, map)?;
                        }
                    }
                }
                Ok(map)
            }
            MAJOR_TAG => {
                let tag = self.read_definite(major, info)?;
                if self.reader.size() == 0 {
                    return Err(CborError::MissingTagContent {
                        offset: self.reader.x,
                    });
                }
                let content = self.read_any(tree)?;
                Ok(tree.new_tag(tag, content))
            }
            _ => self.read_simple(tree, info),
        }
    }

    /// Definite strings copy the payload in one shot; indefinite strings
    /// concatenate chunk payloads, requiring every chunk to repeat the
    /// parent's major type.
    fn read_string(&mut self, tree: &mut Tree, major: u8, info: u8) -> Result<NodeId, CborError> {
        let is_text = major == MAJOR_TEXT;
        match self.read_count(major, info)? {
            Some(size) => {
                let payload = self.reader.try_buf(size as usize).map_err(|_| self.eof())?;
                Ok(if is_text {
                    tree.new_text_bytes(payload)
                } else {
                    tree.new_bytes(payload)
                })
            }
            None => {
                let id = if is_text {
                    tree.new_string("")
                } else {
                    tree.new_bytes(&[])
                };
                loop {
                    let chunk_at = self.reader.x;
                    if self.take_break()? {
                        break;
                    }
                    let chunk = self.read_any(tree)?;
                    let want = if is_text { Kind::Text } else { Kind::Bytes };
                    if tree.kind(chunk) != want {
                        return Err(CborError::ChunkTypeMismatch { offset: chunk_at });
                    }
                    let payload = tree.str_bytes(chunk).to_vec();
                    tree.blob_extend(id, &payload);
                }
                Ok(id)
            }
        }
    }

    fn read_entry(&mut self, tree: &mut Tree, map: NodeId) -> Result<(), CborError> {
        let key = self.read_any(tree)?;
        let value = self.read_any(tree)?;
        let pair = tree.new_pair(key, value);
        tree.insert_tail(map, pair);
        Ok(())
    }

    /// Consumes a break byte if one is next. Running out of input while
    /// looking for the break is a truncation error.
    fn take_break(&mut self) -> Result<bool, CborError> {
        let byte = self.reader.try_peek().map_err(|_| self.eof())?;
        if byte == BREAK {
            self.reader.x += 1;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    fn read_simple(&mut self, tree: &mut Tree, info: u8) -> Result<NodeId, CborError> {
        match info {
            SIMPLE_FALSE => Ok(tree.new_boolean(false)),
            SIMPLE_TRUE => Ok(tree.new_boolean(true)),
            SIMPLE_NULL => Ok(tree.new_null()),
            SIMPLE_UNDEFINED => Ok(tree.new_undefined()),
            0..=19 => Ok(tree.new_extension(info)),
            24 => {
                let code = self.reader.try_u8().map_err(|_| self.eof())?;
                Ok(tree.new_extension(code))
            }
            25 => {
                let bits = self.reader.try_u16().map_err(|_| self.eof())?;
                Ok(tree.new_float(promote_half(bits)))
            }
            26 => {
                let bits = self.reader.try_u32().map_err(|_| self.eof())?;
                Ok(tree.new_float(promote_single(bits)))
            }
            27 => {
                let bits = self.reader.try_u64().map_err(|_| self.eof())?;
                Ok(tree.new_float(f64::from_bits(bits)))
            }
            _ => Err(CborError::UnknownAdditional {
                major: MAJOR_SIMPLE,
                info,
                offset: self.reader.x - 1,
            }),
        }
    }
}

/// Widens half-precision bits to f64 by field repacking: the fraction
/// shifts into the top of the 52-bit field, normal exponents rebias, and
/// the all-ones exponent maps to the f64 all-ones class. A zero exponent
/// stays zero, so half subnormals collapse toward zero instead of
/// renormalizing.
fn promote_half(bits: u16) -> f64 {
    let sign = (bits >> 15) as u64;
    let exp = ((bits >> 10) & 0x1f) as u64;
    let frac = (bits & 0x3ff) as u64;
    let mut out = frac << (52 - 10);
    out |= sign << 63;
    if exp == 0x1f {
        out |= 0x7ff << 52;
    } else if exp != 0 {
        out |= (exp - 15 + 1023) << 52;
    }
    f64::from_bits(out)
}

/// Single-precision analogue of [`promote_half`], with the same
/// subnormal collapse.
fn promote_single(bits: u32) -> f64 {
    let sign = (bits >> 31) as u64;
    let exp = ((bits >> 23) & 0xff) as u64;
    let frac = (bits & 0x7f_ffff) as u64;
    let mut out = frac << (52 - 23);
    out |= sign << 63;
    if exp == 0xff {
        out |= 0x7ff << 52;
    } else if exp != 0 {
        out |= (exp - 127 + 1023) << 52;
    }
    f64::from_bits(out)
}
