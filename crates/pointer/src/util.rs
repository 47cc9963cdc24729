use std::borrow::Cow;

use cbor_tree::{NodeId, Tree};

/// Un-escapes one path segment: `~1` before `~0`, so `~01` comes out as
/// the literal `~1`.
pub(crate) fn unescape(segment: &str) -> Cow<'_, str> {
    if segment.contains('~') {
        Cow::Owned(segment.replace("~1", "/").replace("~0", "~"))
    } else {
        Cow::Borrowed(segment)
    }
}

/// Linear scan of a map's pairs for a key equal to `segment`.
pub(crate) fn find_key(tree: &Tree, map: NodeId, segment: &str) -> Option<NodeId> {
    let mut child = tree.first(map);
    while let Some(pair) = child {
        if let Some(key) = tree.pair_key(pair) {
            if tree.eq_str(key, segment) {
                return Some(pair);
            }
        }
        child = tree.next(map, pair);
    }
    None
}

/// Resolves an array segment to an element: `-` is the last element,
/// anything else must parse as a non-negative index within range.
pub(crate) fn index_element(tree: &Tree, array: NodeId, segment: &str) -> Option<NodeId> {
    if segment == "-" {
        return tree.last(array);
    }
    let index: usize = segment.parse().ok()?;
    let mut element = tree.first(array)?;
    for _ in 0..index {
        element = tree.next(array, element)?;
    }
    Some(element)
}
