//! Text encoder.

use std::fmt::Write as _;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

use super::DATA_URI_PREFIX;
use crate::value::{NodeId, Simple, Tree, Variant};

/// Serializes the tree rooted at `id` as JSON text.
pub fn encode(tree: &Tree, id: NodeId) -> String {
    let mut out = String::new();
    write_any(&mut out, tree, id);
    out
}

fn write_any(out: &mut String, tree: &Tree, id: NodeId) {
    match tree.variant(id) {
        Variant::Map(_) => {
            out.push('{');
            let mut child = tree.first(id);
            while let Some(pair) = child {
                write_any(out, tree, pair);
                child = tree.next(id, pair);
                if child.is_some() {
                    out.push_str(", ");
                }
            }
            out.push('}');
        }
        Variant::Array(_) => {
            out.push('[');
            let mut child = tree.first(id);
            while let Some(element) = child {
                write_any(out, tree, element);
                child = tree.next(id, element);
                if child.is_some() {
                    out.push_str(", ");
                }
            }
            out.push(']');
        }
        Variant::Pair { key, value } => {
            write_any(out, tree, *key);
            out.push_str(": ");
            match value {
                Some(val) => write_any(out, tree, *val),
                None => out.push_str("null"),
            }
        }
        Variant::Uint(magnitude) => {
            let _ = write!(out, "{magnitude}");
        }
        Variant::Nint(magnitude) => {
            let _ = write!(out, "{}", -1 - *magnitude as i128);
        }
        Variant::Text(payload) => write_string(out, payload),
        Variant::Bytes(payload) => {
            out.push('"');
            out.push_str(DATA_URI_PREFIX);
            out.push_str(&STANDARD.encode(payload));
            out.push('"');
        }
        // Tags are transparent in text form.
        Variant::Tag { content, .. } => match content {
            Some(c) => write_any(out, tree, *c),
            None => out.push_str("null"),
        },
        Variant::Simple(simple) => match simple {
            Simple::True => out.push_str("true"),
            Simple::False => out.push_str("false"),
            // Undefined and extension codes have no text form.
            Simple::Null | Simple::Undefined | Simple::Extension(_) => out.push_str("null"),
            Simple::Float(real) => {
                let _ = write!(out, "{real:.6}");
            }
        },
    }
}

/// Re-escapes a string payload. The payload is walked as UTF-8 by hand:
/// ASCII printables pass through, everything else is `\uXXXX`-escaped
/// (astral code points as a surrogate pair). The walk stops at the first
/// malformed byte sequence.
fn write_string(out: &mut String, payload: &[u8]) {
    out.push('"');
    let len = payload.len();
    let mut off = 0;
    while off < len {
        match payload[off] {
            b'\n' => {
                out.push_str("\\n");
                off += 1;
            }
            b'\t' => {
                out.push_str("\\t");
                off += 1;
            }
            b'\\' => {
                out.push_str("\\\\");
                off += 1;
            }
            b'\r' => {
                out.push_str("\\r");
                off += 1;
            }
            0x0c => {
                out.push_str("\\f");
                off += 1;
            }
            lead => {
                let code: u32;
                if lead <= 0x7f {
                    code = lead as u32;
                    off += 1;
                } else if (0xc0..=0xdf).contains(&lead) && off + 1 < len {
                    code = ((lead as u32 & 0x1f) << 6) | (payload[off + 1] as u32 & 0x3f);
                    off += 2;
                } else if (0xe0..=0xef).contains(&lead) && off + 2 < len {
                    code = ((lead as u32 & 0x0f) << 12)
                        | ((payload[off + 1] as u32 & 0x3f) << 6)
                        | (payload[off + 2] as u32 & 0x3f);
                    off += 3;
                } else if (0xf0..=0xf7).contains(&lead) && off + 3 < len {
                    code = ((lead as u32 & 0x07) << 18)
                        | ((payload[off + 1] as u32 & 0x3f) << 12)
                        | ((payload[off + 2] as u32 & 0x3f) << 6)
                        | (payload[off + 3] as u32 & 0x3f);
                    off += 4;
                } else {
                    break;
                }
                if code <= 0x7f {
                    if (0x20..=0x7e).contains(&code) {
                        out.push(code as u8 as char);
                    } else {
                        let _ = write!(out, "\\u{code:04x}");
                    }
                } else if code <= 0xd7ff || (0xe000..=0xffff).contains(&code) {
                    let _ = write!(out, "\\u{code:04x}");
                } else if code <= 0x10_ffff {
                    let astral = code - 0x10000;
                    let _ = write!(out, "\\u{:04x}", ((astral >> 10) & 0x3ff) | 0xd800);
                    let _ = write!(out, "\\u{:04x}", (astral & 0x3ff) | 0xdc00);
                }
            }
        }
    }
    out.push('"');
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Tree;

    fn enc(build: impl FnOnce(&mut Tree) -> NodeId) -> String {
        let mut tree = Tree::new();
        let id = build(&mut tree);
        encode(&tree, id)
    }

    #[test]
    fn containers_get_single_space_separators() {
        let out = enc(|t| {
            let map = t.new_map();
            let k = t.new_string("a");
            let v = t.new_integer(1);
            let pair = t.new_pair(k, v);
            t.insert_tail(map, pair);
            let k = t.new_string("b");
            let arr = t.new_array();
            for i in [1i64, 2] {
                let n = t.new_integer(i);
                t.insert_tail(arr, n);
            }
            let pair = t.new_pair(k, arr);
            t.insert_tail(map, pair);
            map
        });
        assert_eq!(out, r#"{"a": 1, "b": [1, 2]}"#);
    }

    #[test]
    fn floats_use_fixed_six_decimals() {
        assert_eq!(enc(|t| t.new_float(1.5)), "1.500000");
        assert_eq!(enc(|t| t.new_float(-0.25)), "-0.250000");
        // Intentionally lossy for tiny magnitudes.
        assert_eq!(enc(|t| t.new_float(1e-9)), "0.000000");
    }

    #[test]
    fn negative_magnitudes_below_i64_min_still_print() {
        assert_eq!(
            enc(|t| t.new_nint(u64::MAX)),
            "-18446744073709551616"
        );
    }

    #[test]
    fn strings_escape_controls_and_non_ascii() {
        assert_eq!(enc(|t| t.new_string("a\tb")), r#""a\tb""#);
        assert_eq!(enc(|t| t.new_string("\u{e9}")), r#""\u00e9""#);
        assert_eq!(enc(|t| t.new_string("\u{1f600}")), r#""\ud83d\ude00""#);
        assert_eq!(enc(|t| t.new_string("\u{1}")), r#""\u0001""#);
        // A double quote is printable ASCII and passes through unescaped.
        assert_eq!(enc(|t| t.new_string("a\"b")), "\"a\"b\"");
    }

    #[test]
    fn bytes_serialize_as_data_uri() {
        assert_eq!(
            enc(|t| t.new_bytes(&[1, 2, 3])),
            r#""data:application/octet-stream;base64,AQID""#
        );
    }

    #[test]
    fn undefined_and_tags_flatten() {
        assert_eq!(enc(|t| t.new_undefined()), "null");
        assert_eq!(enc(|t| t.new_extension(5)), "null");
        let out = enc(|t| {
            let n = t.new_integer(3);
            t.new_tag(1, n)
        });
        assert_eq!(out, "3");
    }
}
