//! Binary encoder.

use cbor_tree_buffers::Writer;

use super::constants::*;
use crate::value::{NodeId, Simple, Tree, Variant};

/// Serializes the tree rooted at `id`.
pub fn encode(tree: &Tree, id: NodeId) -> Vec<u8> {
    let mut encoder = CborEncoder::new();
    encoder.encode(tree, id)
}

#[derive(Default)]
pub struct CborEncoder {
    pub writer: Writer,
}

impl CborEncoder {
    pub fn new() -> Self {
        Self {
            writer: Writer::new(),
        }
    }

    pub fn encode(&mut self, tree: &Tree, id: NodeId) -> Vec<u8> {
        self.writer.reset();
        self.write_any(tree, id);
        self.writer.flush()
    }

    pub fn write_any(&mut self, tree: &Tree, id: NodeId) {
        match tree.variant(id) {
            Variant::Uint(magnitude) => self.write_header(MAJOR_UINT, *magnitude),
            Variant::Nint(magnitude) => self.write_header(MAJOR_NINT, *magnitude),
            Variant::Bytes(payload) => {
                self.write_header(MAJOR_BYTES, payload.len() as u64);
                self.writer.buf(payload);
            }
            Variant::Text(payload) => {
                self.write_header(MAJOR_TEXT, payload.len() as u64);
                self.writer.buf(payload);
            }
            Variant::Array(_) => {
                self.writer.u8((MAJOR_ARRAY << 5) | INFO_INDEFINITE);
                let mut child = tree.first(id);
                while let Some(c) = child {
                    self.write_any(tree, c);
                    child = tree.next(id, c);
                }
                self.writer.u8(BREAK);
            }
            Variant::Map(_) => {
                self.writer.u8((MAJOR_MAP << 5) | INFO_INDEFINITE);
                let mut child = tree.first(id);
                while let Some(c) = child {
                    self.write_any(tree, c);
                    child = tree.next(id, c);
                }
                self.writer.u8(BREAK);
            }
            Variant::Pair { key, value } => {
                self.write_any(tree, *key);
                // An emptied value slot serializes as null.
                match value {
                    Some(val) => self.write_any(tree, *val),
                    None => self.writer.u8((MAJOR_SIMPLE << 5) | SIMPLE_NULL),
                }
            }
            Variant::Tag { tag, content } => {
                self.write_header(MAJOR_TAG, *tag);
                match content {
                    Some(c) => self.write_any(tree, *c),
                    None => self.writer.u8((MAJOR_SIMPLE << 5) | SIMPLE_NULL),
                }
            }
            Variant::Simple(simple) => self.write_simple(*simple),
        }
    }

    /// Minimal-width header: immediate below 24, then the narrowest of
    /// the 1/2/4/8-byte big-endian fields that fits.
    fn write_header(&mut self, major: u8, val: u64) {
        let overlay = major << 5;
        if val < 24 {
            self.writer.u8(overlay | val as u8);
        } else if val <= 0xff {
            self.writer.u8(overlay | 24);
            self.writer.u8(val as u8);
        } else if val <= 0xffff {
            self.writer.u8u16(overlay | 25, val as u16);
        } else if val <= 0xffff_ffff {
            self.writer.u8u32(overlay | 26, val as u32);
        } else {
            self.writer.u8u64(overlay | 27, val);
        }
    }

    fn write_simple(&mut self, simple: Simple) {
        const OVERLAY: u8 = MAJOR_SIMPLE << 5;
        match simple {
            Simple::False => self.writer.u8(OVERLAY | SIMPLE_FALSE),
            Simple::True => self.writer.u8(OVERLAY | SIMPLE_TRUE),
            Simple::Null => self.writer.u8(OVERLAY | SIMPLE_NULL),
            Simple::Undefined => self.writer.u8(OVERLAY | SIMPLE_UNDEFINED),
            Simple::Extension(code) => {
                if code < 20 {
                    self.writer.u8(OVERLAY | code);
                } else {
                    self.writer.u8(OVERLAY | 24);
                    self.writer.u8(code);
                }
            }
            Simple::Float(real) => self.write_float(real),
        }
    }

    /// Minimal-precision float: a half or single header is used when the
    /// fraction's significant bits fit the narrower field and the
    /// exponent fits the narrower range. The zero and all-ones exponent
    /// classes carry over field-for-field, so width is chosen by the
    /// fraction alone there.
    fn write_float(&mut self, real: f64) {
        const OVERLAY: u8 = MAJOR_SIMPLE << 5;
        let bits = real.to_bits();
        let sign = bits >> 63;
        let exp = ((bits >> 52) & 0x7ff) as i64;
        let frac = bits & 0xf_ffff_ffff_ffff;
        let needed = if frac == 0 {
            0
        } else {
            52 - frac.trailing_zeros() as i64
        };
        if exp == 0 || exp == 0x7ff {
            let all_ones = exp != 0;
            if needed <= 10 {
                let mut out = (frac >> (52 - 10)) as u16;
                out |= (sign as u16) << 15;
                if all_ones {
                    out |= 0x1f << 10;
                }
                self.writer.u8u16(OVERLAY | 25, out);
            } else if needed <= 23 {
                let mut out = (frac >> (52 - 23)) as u32;
                out |= (sign as u32) << 31;
                if all_ones {
                    out |= 0xff << 23;
                }
                self.writer.u8u32(OVERLAY | 26, out);
            } else {
                self.writer.u8u64(OVERLAY | 27, bits);
            }
        } else {
            let unbiased = exp - 1023;
            if (-14..=15).contains(&unbiased) && needed <= 10 {
                let mut out = (frac >> (52 - 10)) as u16;
                out |= (sign as u16) << 15;
                out |= ((unbiased + 15) as u16) << 10;
                self.writer.u8u16(OVERLAY | 25, out);
            } else if (-126..=127).contains(&unbiased) && needed <= 23 {
                let mut out = (frac >> (52 - 23)) as u32;
                out |= (sign as u32) << 31;
                out |= ((unbiased + 127) as u32) << 23;
                self.writer.u8u32(OVERLAY | 26, out);
            } else {
                self.writer.u8u64(OVERLAY | 27, bits);
            }
        }
    }
}
