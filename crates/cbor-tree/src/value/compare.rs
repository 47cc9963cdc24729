//! Structural equality between subtrees.

use super::{NodeId, Simple, Tree, Variant};

impl Tree {
    /// Deep structural equality: same variant shape, same scalar
    /// payloads, children pairwise equal in list order. Node identity
    /// and parentage are ignored, so a node always equals its
    /// [`duplicate`](Tree::duplicate). NaN floats compare equal to each
    /// other.
    pub fn deep_eq(&self, a: NodeId, b: NodeId) -> bool {
        match (self.variant(a), self.variant(b)) {
            (Variant::Uint(x), Variant::Uint(y)) => x == y,
            (Variant::Nint(x), Variant::Nint(y)) => x == y,
            (Variant::Bytes(x), Variant::Bytes(y)) => x == y,
            (Variant::Text(x), Variant::Text(y)) => x == y,
            (Variant::Simple(Simple::Float(x)), Variant::Simple(Simple::Float(y))) => {
                x == y || (x.is_nan() && y.is_nan())
            }
            (Variant::Simple(x), Variant::Simple(y)) => x == y,
            (Variant::Pair { .. }, Variant::Pair { .. }) => {
                let keys_eq = match (self.pair_key(a), self.pair_key(b)) {
                    (Some(x), Some(y)) => self.deep_eq(x, y),
                    _ => false,
                };
                keys_eq
                    && match (self.pair_value(a), self.pair_value(b)) {
                        (Some(x), Some(y)) => self.deep_eq(x, y),
                        (None, None) => true,
                        _ => false,
                    }
            }
            (Variant::Tag { tag: x, .. }, Variant::Tag { tag: y, .. }) => {
                x == y
                    && match (self.tag_content(a), self.tag_content(b)) {
                        (Some(x), Some(y)) => self.deep_eq(x, y),
                        (None, None) => true,
                        _ => false,
                    }
            }
            (Variant::Array(_), Variant::Array(_)) | (Variant::Map(_), Variant::Map(_)) => {
                let mut left = self.first(a);
                let mut right = self.first(b);
                loop {
                    match (left, right) {
                        (Some(x), Some(y)) => {
                            if !self.deep_eq(x, y) {
                                return false;
                            }
                            left = self.next(a, x);
                            right = self.next(b, y);
                        }
                        (None, None) => return true,
                        _ => return false,
                    }
                }
            }
            _ => false,
        }
    }
}
