//! Intrusive doubly-linked child lists for arrays and maps.
//!
//! Every operation validates ownership through the `parent`
//! back-reference before touching a link: an operation on a mismatched
//! (container, node) pair is a no-op or reports absence, never corrupts
//! the list. Inserting a value that already has a parent anywhere in the
//! arena links in a deep copy instead, leaving the original in place;
//! this copy-on-reinsert rule applies to all four inserts.

use super::{ListEnds, NodeId, Tree, Variant};

impl Tree {
    fn ends(&self, container: NodeId) -> Option<ListEnds> {
        match self.variant(container) {
            Variant::Array(e) | Variant::Map(e) => Some(*e),
            _ => None,
        }
    }

    fn ends_mut(&mut self, container: NodeId) -> Option<&mut ListEnds> {
        match &mut self.node_mut(container).variant {
            Variant::Array(e) | Variant::Map(e) => Some(e),
            _ => None,
        }
    }

    /// Checks the container/child kind contract (maps hold pairs, arrays
    /// hold anything but pairs) and applies copy-on-reinsert.
    fn admit(&mut self, container: NodeId, val: NodeId) -> Option<NodeId> {
        let child_is_pair = self.is_pair(val);
        match self.variant(container) {
            Variant::Map(_) if child_is_pair => {}
            Variant::Array(_) if !child_is_pair => {}
            _ => return None,
        }
        Some(self.disown(val))
    }

    /// Appends `val` to the end of `container`'s child list. Returns the
    /// id actually linked in (a copy's id when `val` was already owned),
    /// or `None` on structural misuse.
    pub fn insert_tail(&mut self, container: NodeId, val: NodeId) -> Option<NodeId> {
        let val = self.admit(container, val)?;
        let ends = self.ends(container)?;
        self.node_mut(val).prev = ends.last;
        self.node_mut(val).next = None;
        if let Some(last) = ends.last {
            self.node_mut(last).next = Some(val);
        }
        let first = ends.first.or(Some(val));
        if let Some(e) = self.ends_mut(container) {
            e.first = first;
            e.last = Some(val);
        }
        self.node_mut(val).parent = Some(container);
        Some(val)
    }

    /// Prepends `val` to `container`'s child list.
    pub fn insert_head(&mut self, container: NodeId, val: NodeId) -> Option<NodeId> {
        let val = self.admit(container, val)?;
        let ends = self.ends(container)?;
        self.node_mut(val).next = ends.first;
        self.node_mut(val).prev = None;
        if let Some(first) = ends.first {
            self.node_mut(first).prev = Some(val);
        }
        let last = ends.last.or(Some(val));
        if let Some(e) = self.ends_mut(container) {
            e.first = Some(val);
            e.last = last;
        }
        self.node_mut(val).parent = Some(container);
        Some(val)
    }

    /// Inserts `val` immediately before `anchor`, which must already be
    /// a child of `container`.
    pub fn insert_before(
        &mut self,
        container: NodeId,
        anchor: NodeId,
        val: NodeId,
    ) -> Option<NodeId> {
        if self.node(anchor).parent != Some(container) {
            return None;
        }
        let val = self.admit(container, val)?;
        let prev = self.node(anchor).prev;
        match prev {
            Some(prev) => self.node_mut(prev).next = Some(val),
            None => {
                if let Some(e) = self.ends_mut(container) {
                    e.first = Some(val);
                }
            }
        }
        self.node_mut(val).prev = prev;
        self.node_mut(val).next = Some(anchor);
        self.node_mut(anchor).prev = Some(val);
        self.node_mut(val).parent = Some(container);
        Some(val)
    }

    /// Inserts `val` immediately after `anchor`, which must already be a
    /// child of `container`.
    pub fn insert_after(
        &mut self,
        container: NodeId,
        anchor: NodeId,
        val: NodeId,
    ) -> Option<NodeId> {
        if self.node(anchor).parent != Some(container) {
            return None;
        }
        let val = self.admit(container, val)?;
        let next = self.node(anchor).next;
        match next {
            Some(next) => self.node_mut(next).prev = Some(val),
            None => {
                if let Some(e) = self.ends_mut(container) {
                    e.last = Some(val);
                }
            }
        }
        self.node_mut(val).next = next;
        self.node_mut(val).prev = Some(anchor);
        self.node_mut(anchor).next = Some(val);
        self.node_mut(val).parent = Some(container);
        Some(val)
    }

    /// Unlinks `val` from `container`. A no-op unless `container`
    /// actually owns `val`.
    pub fn remove(&mut self, container: NodeId, val: NodeId) {
        if !self.is_container(container) || self.node(val).parent != Some(container) {
            return;
        }
        let prev = self.node(val).prev;
        let next = self.node(val).next;
        if let Some(prev) = prev {
            self.node_mut(prev).next = next;
        }
        if let Some(next) = next {
            self.node_mut(next).prev = prev;
        }
        if let Some(e) = self.ends_mut(container) {
            if e.first == Some(val) {
                e.first = next;
            }
            if e.last == Some(val) {
                e.last = prev;
            }
        }
        let node = self.node_mut(val);
        node.prev = None;
        node.next = None;
        node.parent = None;
    }

    pub fn first(&self, container: NodeId) -> Option<NodeId> {
        self.ends(container)?.first
    }

    pub fn last(&self, container: NodeId) -> Option<NodeId> {
        self.ends(container)?.last
    }

    /// The sibling after `val`, provided `container` owns it.
    pub fn next(&self, container: NodeId, val: NodeId) -> Option<NodeId> {
        if !self.is_container(container) || self.node(val).parent != Some(container) {
            return None;
        }
        self.node(val).next
    }

    /// The sibling before `val`, provided `container` owns it.
    pub fn prev(&self, container: NodeId, val: NodeId) -> Option<NodeId> {
        if !self.is_container(container) || self.node(val).parent != Some(container) {
            return None;
        }
        self.node(val).prev
    }
}

#[cfg(test)]
mod tests {
    use crate::Tree;

    #[test]
    fn tail_insert_links_both_ways() {
        let mut tree = Tree::new();
        let arr = tree.new_array();
        let a = tree.new_integer(1);
        let b = tree.new_integer(2);
        tree.insert_tail(arr, a);
        tree.insert_tail(arr, b);
        assert_eq!(tree.first(arr), Some(a));
        assert_eq!(tree.last(arr), Some(b));
        assert_eq!(tree.next(arr, a), Some(b));
        assert_eq!(tree.prev(arr, b), Some(a));
        assert_eq!(tree.parent(b), Some(arr));
    }

    #[test]
    fn remove_restores_adjacent_links() {
        let mut tree = Tree::new();
        let arr = tree.new_array();
        let a = tree.new_integer(1);
        let b = tree.new_integer(2);
        let c = tree.new_integer(3);
        for v in [a, b, c] {
            tree.insert_tail(arr, v);
        }
        tree.remove(arr, b);
        assert_eq!(tree.next(arr, a), Some(c));
        assert_eq!(tree.prev(arr, c), Some(a));
        assert!(tree.parent(b).is_none());
        tree.remove(arr, a);
        tree.remove(arr, c);
        assert!(tree.container_empty(arr));
    }

    #[test]
    fn head_and_positional_inserts() {
        let mut tree = Tree::new();
        let arr = tree.new_array();
        let b = tree.new_integer(2);
        tree.insert_tail(arr, b);
        let a = tree.new_integer(1);
        tree.insert_head(arr, a);
        let mid = tree.new_integer(15);
        tree.insert_before(arr, b, mid);
        let end = tree.new_integer(3);
        tree.insert_after(arr, b, end);
        let order: Vec<i64> = {
            let mut out = Vec::new();
            let mut cur = tree.first(arr);
            while let Some(id) = cur {
                out.push(tree.integer(id));
                cur = tree.next(arr, id);
            }
            out
        };
        assert_eq!(order, [1, 15, 2, 3]);
    }

    #[test]
    fn mismatched_container_is_a_no_op() {
        let mut tree = Tree::new();
        let arr1 = tree.new_array();
        let arr2 = tree.new_array();
        let v = tree.new_integer(1);
        tree.insert_tail(arr1, v);
        // arr2 does not own v: navigation reports absence, remove is inert.
        assert_eq!(tree.next(arr2, v), None);
        tree.remove(arr2, v);
        assert_eq!(tree.parent(v), Some(arr1));
        // Anchors must belong to the target container too.
        let w = tree.new_integer(2);
        assert_eq!(tree.insert_before(arr2, v, w), None);
    }

    #[test]
    fn pair_cannot_enter_an_array_and_maps_take_only_pairs() {
        let mut tree = Tree::new();
        let arr = tree.new_array();
        let map = tree.new_map();
        let k = tree.new_string("k");
        let v = tree.new_integer(1);
        let pair = tree.new_pair(k, v);
        assert_eq!(tree.insert_tail(arr, pair), None);
        let loose = tree.new_integer(2);
        assert_eq!(tree.insert_tail(map, loose), None);
        assert_eq!(tree.insert_tail(map, pair), Some(pair));
    }

    #[test]
    fn owned_value_is_copied_on_reinsert() {
        let mut tree = Tree::new();
        let a = tree.new_array();
        let b = tree.new_array();
        let v = tree.new_string("shared");
        tree.insert_tail(a, v);
        let copy = tree.insert_tail(b, v).unwrap();
        assert_ne!(copy, v);
        assert_eq!(tree.parent(v), Some(a));
        assert_eq!(tree.parent(copy), Some(b));
        assert!(tree.eq_str(copy, "shared"));
    }
}
