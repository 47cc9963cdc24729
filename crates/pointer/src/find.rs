use cbor_tree::{NodeId, Tree};

use crate::util::{find_key, index_element, unescape};

/// Resolves `path` from `root` and returns the addressed node. Map
/// segments resolve to the pair's value. Absence (`None`) covers every
/// failure: unmatched key, out-of-range or unparseable index, or a
/// non-container in the middle of the path.
pub fn get(tree: &Tree, root: NodeId, path: &str) -> Option<NodeId> {
    let mut current: Option<NodeId> = None;
    for (i, raw) in path.split('/').enumerate() {
        if i == 0 && raw.is_empty() {
            current = Some(root);
            continue;
        }
        let segment = unescape(raw);
        let node = current?;
        if tree.is_map(node) {
            let pair = find_key(tree, node, &segment)?;
            current = tree.pair_value(pair);
        } else if tree.is_array(node) {
            current = Some(index_element(tree, node, &segment)?);
        } else {
            return None;
        }
    }
    current
}

/// Resolves `path` to the slot that owns its target: the owning
/// container paired with the directly-owned child (the pair for a map
/// entry, the element for an array slot). The root itself has no slot.
pub(crate) fn resolve_slot(tree: &Tree, root: NodeId, path: &str) -> Option<(NodeId, NodeId)> {
    let segments: Vec<&str> = path.split('/').collect();
    let last_index = segments.len() - 1;
    let mut current: Option<NodeId> = None;
    for (i, raw) in segments.iter().enumerate() {
        let last = i == last_index;
        if i == 0 && raw.is_empty() {
            if last {
                return None;
            }
            current = Some(root);
            continue;
        }
        let segment = unescape(raw);
        let node = current?;
        if tree.is_map(node) {
            let pair = find_key(tree, node, &segment)?;
            if last {
                return Some((node, pair));
            }
            current = tree.pair_value(pair);
        } else if tree.is_array(node) {
            let element = index_element(tree, node, &segment)?;
            if last {
                return Some((node, element));
            }
            current = Some(element);
        } else {
            return None;
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (Tree, NodeId) {
        let mut tree = Tree::new();
        let root = tree.from_json(&serde_json::json!({
            "a/b": 1,
            "m~n": 2,
            "list": [10, 20, 30],
            "deep": {"inner": [true]},
        }));
        (tree, root)
    }

    #[test]
    fn root_and_empty_paths() {
        let (tree, root) = sample();
        assert_eq!(get(&tree, root, ""), Some(root));
        // A path without the leading separator never resolves.
        assert_eq!(get(&tree, root, "list"), None);
    }

    #[test]
    fn escaped_segments() {
        let (tree, root) = sample();
        let v = get(&tree, root, "/a~1b").unwrap();
        assert_eq!(tree.integer(v), 1);
        let v = get(&tree, root, "/m~0n").unwrap();
        assert_eq!(tree.integer(v), 2);
    }

    #[test]
    fn array_indices_and_dash() {
        let (tree, root) = sample();
        assert_eq!(tree.integer(get(&tree, root, "/list/0").unwrap()), 10);
        assert_eq!(tree.integer(get(&tree, root, "/list/2").unwrap()), 30);
        assert_eq!(tree.integer(get(&tree, root, "/list/-").unwrap()), 30);
        assert_eq!(get(&tree, root, "/list/3"), None);
        assert_eq!(get(&tree, root, "/list/x"), None);
    }

    #[test]
    fn descent_through_both_container_kinds() {
        let (tree, root) = sample();
        let v = get(&tree, root, "/deep/inner/0").unwrap();
        assert!(tree.boolean(v));
        // Scalars terminate the walk.
        assert_eq!(get(&tree, root, "/a~1b/anything"), None);
        assert_eq!(get(&tree, root, "/missing"), None);
    }

    #[test]
    fn slot_resolution_keeps_the_pair() {
        let (tree, root) = sample();
        let (owner, slot) = resolve_slot(&tree, root, "/list/1").unwrap();
        assert!(tree.is_array(owner));
        assert_eq!(tree.integer(slot), 20);
        let (owner, slot) = resolve_slot(&tree, root, "/a~1b").unwrap();
        assert_eq!(owner, root);
        assert!(tree.is_pair(slot));
        assert_eq!(resolve_slot(&tree, root, ""), None);
    }
}
