use cbor_tree::{NodeId, Tree};

use crate::find::{get, resolve_slot};
use crate::util::{find_key, index_element, unescape};

/// Places `val` at `path`. On a map the last segment replaces an
/// existing key's value or appends a new pair; on an array `-` appends
/// and a numeric index inserts before the element currently at that
/// index, which must exist. Returns the id actually linked in (a copy
/// when `val` was already owned), or `None` if the path did not resolve.
pub fn add(tree: &mut Tree, root: NodeId, path: &str, val: NodeId) -> Option<NodeId> {
    let segments: Vec<String> = path.split('/').map(|s| unescape(s).into_owned()).collect();
    let last_index = segments.len() - 1;
    let mut current: Option<NodeId> = None;
    for (i, segment) in segments.iter().enumerate() {
        let last = i == last_index;
        if i == 0 && segment.is_empty() {
            // The root has no enclosing slot to add into.
            if last {
                return None;
            }
            current = Some(root);
            continue;
        }
        let node = current?;
        if tree.is_map(node) {
            match find_key(tree, node, segment) {
                Some(pair) if last => return tree.set_pair_value(pair, val),
                Some(pair) => current = tree.pair_value(pair),
                None if last => {
                    let key = tree.new_string(segment);
                    let pair = tree.new_pair(key, val);
                    tree.insert_tail(node, pair)?;
                    return tree.pair_value(pair);
                }
                None => return None,
            }
        } else if tree.is_array(node) {
            if segment == "-" {
                if last {
                    return tree.insert_tail(node, val);
                }
                current = tree.last(node);
            } else {
                let element = index_element(tree, node, segment)?;
                if last {
                    return tree.insert_before(node, element, val);
                }
                current = Some(element);
            }
        } else {
            return None;
        }
    }
    None
}

/// Builds a value tree from a host JSON value and delegates to [`add`].
pub fn set(
    tree: &mut Tree,
    root: NodeId,
    path: &str,
    value: &serde_json::Value,
) -> Option<NodeId> {
    let val = tree.from_json(value);
    add(tree, root, path, val)
}

/// Detaches the node at `path` and returns it. A map entry detaches its
/// whole pair from the map, then unwraps it: the returned node is the
/// value, and the pair shell is discarded.
pub fn remove(tree: &mut Tree, root: NodeId, path: &str) -> Option<NodeId> {
    let target = get(tree, root, path)?;
    let parent = tree.parent(target)?;
    if tree.is_pair(parent) {
        let map = tree.parent(parent)?;
        tree.remove(map, parent);
        tree.take_pair_value(parent)
    } else if tree.is_array(parent) {
        tree.remove(parent, target);
        Some(target)
    } else {
        // Tag content is not pointer-addressable for removal.
        None
    }
}

/// Moves the node at `src` to `dest`. The source's map pair, if any, is
/// unwrapped on the way: only the value travels, under the destination's
/// own key. A destination inside the moved subtree is rejected before
/// anything is detached; moving a node onto its current position is a
/// successful no-op. Returns the moved node.
pub fn mv(tree: &mut Tree, root: NodeId, src: &str, dest: &str) -> Option<NodeId> {
    let (owner, slot) = resolve_slot(tree, root, src)?;
    let payload = if tree.is_pair(slot) {
        tree.pair_value(slot)?
    } else {
        slot
    };

    let segments: Vec<String> = dest.split('/').map(|s| unescape(s).into_owned()).collect();
    let last_index = segments.len() - 1;
    let mut current: Option<NodeId> = None;
    for (i, segment) in segments.iter().enumerate() {
        let last = i == last_index;
        if i == 0 && segment.is_empty() {
            if last {
                return None;
            }
            current = Some(root);
            continue;
        }
        let node = current?;
        // Any walk into the moved subtree passes through the slot or its
        // payload first; rejecting here keeps the tree untouched.
        if node == slot || node == payload {
            return None;
        }
        if tree.is_map(node) {
            match find_key(tree, node, segment) {
                Some(pair) if last => {
                    if pair == slot {
                        return Some(payload);
                    }
                    detach(tree, owner, slot);
                    return tree.set_pair_value(pair, payload);
                }
                Some(pair) => current = tree.pair_value(pair),
                None if last => {
                    detach(tree, owner, slot);
                    let key = tree.new_string(segment);
                    let pair = tree.new_pair(key, payload);
                    tree.insert_tail(node, pair)?;
                    return tree.pair_value(pair);
                }
                None => return None,
            }
        } else if tree.is_array(node) {
            if segment == "-" {
                if last {
                    detach(tree, owner, slot);
                    return tree.insert_tail(node, payload);
                }
                current = tree.last(node);
            } else {
                let element = index_element(tree, node, segment)?;
                if last {
                    if element == slot {
                        return Some(payload);
                    }
                    detach(tree, owner, slot);
                    return tree.insert_before(node, element, payload);
                }
                current = Some(element);
            }
        } else {
            return None;
        }
    }
    None
}

/// Unlinks the source slot, unwrapping a map pair so its value is left
/// unowned and ready for reinsertion.
fn detach(tree: &mut Tree, owner: NodeId, slot: NodeId) {
    tree.remove(owner, slot);
    if tree.is_pair(slot) {
        tree.take_pair_value(slot);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn array_of(tree: &mut Tree, items: &[i64]) -> NodeId {
        let arr = tree.new_array();
        for &i in items {
            let n = tree.new_integer(i);
            tree.insert_tail(arr, n);
        }
        arr
    }

    fn items(tree: &Tree, arr: NodeId) -> Vec<i64> {
        let mut out = Vec::new();
        let mut cur = tree.first(arr);
        while let Some(id) = cur {
            out.push(tree.integer(id));
            cur = tree.next(arr, id);
        }
        out
    }

    #[test]
    fn add_into_map_creates_and_replaces() {
        let mut tree = Tree::new();
        let root = tree.new_map();
        let v = tree.new_integer(1);
        let linked = add(&mut tree, root, "/k", v).unwrap();
        assert_eq!(get(&tree, root, "/k"), Some(linked));
        let v2 = tree.new_integer(2);
        add(&mut tree, root, "/k", v2).unwrap();
        assert_eq!(tree.integer(get(&tree, root, "/k").unwrap()), 2);
        // The replaced value is detached, not reachable by path.
        assert!(tree.parent(linked).is_none());
    }

    #[test]
    fn add_array_inserts_before_index() {
        let mut tree = Tree::new();
        let root = array_of(&mut tree, &[10, 20, 30]);
        let v = tree.new_integer(5);
        add(&mut tree, root, "/0", v).unwrap();
        assert_eq!(items(&tree, root), [5, 10, 20, 30]);
        let v = tree.new_integer(99);
        add(&mut tree, root, "/-", v).unwrap();
        assert_eq!(items(&tree, root), [5, 10, 20, 30, 99]);
        // Index must resolve to an existing element.
        let v = tree.new_integer(0);
        assert_eq!(add(&mut tree, root, "/9", v), None);
    }

    #[test]
    fn add_at_root_is_absence() {
        let mut tree = Tree::new();
        let root = tree.new_map();
        let v = tree.new_integer(1);
        assert_eq!(add(&mut tree, root, "", v), None);
    }

    #[test]
    fn set_builds_from_host_values() {
        let mut tree = Tree::new();
        let root = tree.new_map();
        set(&mut tree, root, "/cfg", &serde_json::json!({"on": true})).unwrap();
        assert!(tree.boolean(get(&tree, root, "/cfg/on").unwrap()));
    }

    #[test]
    fn remove_map_entry_unwraps_the_pair() {
        let mut tree = Tree::new();
        let root = tree.from_json(&serde_json::json!({"a": 7, "b": 8}));
        let removed = remove(&mut tree, root, "/a").unwrap();
        assert_eq!(tree.integer(removed), 7);
        assert!(!tree.is_pair(removed));
        assert!(tree.parent(removed).is_none());
        assert_eq!(get(&tree, root, "/a"), None);
        assert_eq!(tree.integer(get(&tree, root, "/b").unwrap()), 8);
    }

    #[test]
    fn remove_array_element() {
        let mut tree = Tree::new();
        let root = array_of(&mut tree, &[1, 2, 3]);
        let removed = remove(&mut tree, root, "/1").unwrap();
        assert_eq!(tree.integer(removed), 2);
        assert_eq!(items(&tree, root), [1, 3]);
        assert_eq!(remove(&mut tree, root, "/5"), None);
    }

    #[test]
    fn mv_between_containers_unwraps_map_source() {
        let mut tree = Tree::new();
        let root = tree.from_json(&serde_json::json!({"a": 42, "list": [1, 2]}));
        let moved = mv(&mut tree, root, "/a", "/list/-").unwrap();
        assert_eq!(tree.integer(moved), 42);
        let list = get(&tree, root, "/list").unwrap();
        assert_eq!(items(&tree, list), [1, 2, 42]);
        assert_eq!(get(&tree, root, "/a"), None);
    }

    #[test]
    fn mv_to_missing_map_key_creates_it() {
        let mut tree = Tree::new();
        let root = tree.from_json(&serde_json::json!({"list": [9], "m": {}}));
        mv(&mut tree, root, "/list/0", "/m/k").unwrap();
        assert_eq!(tree.integer(get(&tree, root, "/m/k").unwrap()), 9);
        let list = get(&tree, root, "/list").unwrap();
        assert!(tree.container_empty(list));
    }

    #[test]
    fn mv_rejects_destination_inside_source() {
        let mut tree = Tree::new();
        let root = tree.from_json(&serde_json::json!({"a": {"b": {}}}));
        assert_eq!(mv(&mut tree, root, "/a", "/a/b/x"), None);
        // Nothing was detached by the failed attempt.
        assert!(get(&tree, root, "/a/b").is_some());
    }

    #[test]
    fn mv_onto_own_position_is_a_no_op() {
        let mut tree = Tree::new();
        let root = tree.from_json(&serde_json::json!({"a": 1, "list": [10, 20]}));
        let kept = mv(&mut tree, root, "/a", "/a").unwrap();
        assert_eq!(tree.integer(kept), 1);
        assert_eq!(tree.integer(get(&tree, root, "/a").unwrap()), 1);
        let kept = mv(&mut tree, root, "/list/1", "/list/1").unwrap();
        assert_eq!(tree.integer(kept), 20);
        let list = get(&tree, root, "/list").unwrap();
        assert_eq!(items(&tree, list), [10, 20]);
    }

    #[test]
    fn mv_within_an_array_reorders() {
        let mut tree = Tree::new();
        let root = array_of(&mut tree, &[1, 2, 3]);
        mv(&mut tree, root, "/2", "/0").unwrap();
        assert_eq!(items(&tree, root), [3, 1, 2]);
    }
}
