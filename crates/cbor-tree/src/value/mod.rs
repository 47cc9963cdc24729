//! The tagged-variant value model.
//!
//! Nodes live in an arena owned by [`Tree`]; every structural link —
//! parent, siblings, container ends, pair slots, tag content — is an
//! `Option<NodeId>` index into that arena rather than a reference, so the
//! intrusive doubly-linked container lists need no aliasing pointers.
//! Detached nodes simply become unreachable and are reclaimed when the
//! tree is dropped.

mod compare;
mod list;

/// Index of a node inside a [`Tree`] arena.
pub type NodeId = u32;

/// The minor category of `Simple` nodes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Simple {
    False,
    True,
    Null,
    Undefined,
    /// An unassigned/raw simple-value code.
    Extension(u8),
    /// All floating widths normalize to one 64-bit representation.
    Float(f64),
}

/// Ends of a container's child list.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct ListEnds {
    pub first: Option<NodeId>,
    pub last: Option<NodeId>,
}

#[derive(Debug, Clone)]
pub(crate) enum Variant {
    Uint(u64),
    /// Negative integer stored as magnitude; the value is `-1 - magnitude`.
    Nint(u64),
    Bytes(Vec<u8>),
    Text(Vec<u8>),
    Array(ListEnds),
    Map(ListEnds),
    /// Key/value association, the only legal child of a `Map`. The value
    /// slot is empty only transiently, after a pointer-remove detaches it.
    Pair {
        key: NodeId,
        value: Option<NodeId>,
    },
    Tag {
        tag: u64,
        content: Option<NodeId>,
    },
    Simple(Simple),
}

/// Fieldless view of a node's variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Uint,
    Nint,
    Bytes,
    Text,
    Array,
    Map,
    Pair,
    Tag,
    Simple,
}

#[derive(Debug)]
pub(crate) struct Node {
    pub variant: Variant,
    pub parent: Option<NodeId>,
    pub prev: Option<NodeId>,
    pub next: Option<NodeId>,
}

/// Arena-backed value tree.
///
/// All operations take node ids as handles. A `Tree` may hold several
/// disjoint trees at once; ownership is tracked per node through the
/// `parent` back-reference, which every list operation validates before
/// touching any link.
#[derive(Debug, Default)]
pub struct Tree {
    pub(crate) nodes: Vec<Node>,
}

impl Tree {
    pub fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    pub(crate) fn alloc(&mut self, variant: Variant) -> NodeId {
        let id = self.nodes.len() as NodeId;
        self.nodes.push(Node {
            variant,
            parent: None,
            prev: None,
            next: None,
        });
        id
    }

    #[inline]
    pub(crate) fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id as usize]
    }

    #[inline]
    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id as usize]
    }

    #[inline]
    pub(crate) fn variant(&self, id: NodeId) -> &Variant {
        &self.node(id).variant
    }

    // ------------------------------------------------------------------
    // Constructors
    // ------------------------------------------------------------------

    pub fn new_integer(&mut self, i: i64) -> NodeId {
        if i < 0 {
            self.alloc(Variant::Nint((-1 - i) as u64))
        } else {
            self.alloc(Variant::Uint(i as u64))
        }
    }

    pub fn new_uinteger(&mut self, u: u64) -> NodeId {
        self.alloc(Variant::Uint(u))
    }

    /// Negative integer from its stored magnitude; the value is
    /// `-1 - magnitude`, which covers negatives below `i64::MIN`.
    pub fn new_nint(&mut self, magnitude: u64) -> NodeId {
        self.alloc(Variant::Nint(magnitude))
    }

    pub fn new_string(&mut self, s: &str) -> NodeId {
        self.alloc(Variant::Text(s.as_bytes().to_vec()))
    }

    pub fn new_bytes(&mut self, b: &[u8]) -> NodeId {
        self.alloc(Variant::Bytes(b.to_vec()))
    }

    /// Text string from raw bytes, which need not be valid UTF-8.
    pub fn new_text_bytes(&mut self, b: &[u8]) -> NodeId {
        self.alloc(Variant::Text(b.to_vec()))
    }

    pub fn new_boolean(&mut self, b: bool) -> NodeId {
        self.alloc(Variant::Simple(if b { Simple::True } else { Simple::False }))
    }

    pub fn new_null(&mut self) -> NodeId {
        self.alloc(Variant::Simple(Simple::Null))
    }

    pub fn new_undefined(&mut self) -> NodeId {
        self.alloc(Variant::Simple(Simple::Undefined))
    }

    pub fn new_extension(&mut self, code: u8) -> NodeId {
        self.alloc(Variant::Simple(Simple::Extension(code)))
    }

    pub fn new_float(&mut self, real: f64) -> NodeId {
        self.alloc(Variant::Simple(Simple::Float(real)))
    }

    pub fn new_array(&mut self) -> NodeId {
        self.alloc(Variant::Array(ListEnds::default()))
    }

    pub fn new_map(&mut self) -> NodeId {
        self.alloc(Variant::Map(ListEnds::default()))
    }

    /// Builds a key/value pair. Arguments that are already owned
    /// elsewhere are deep-copied, never re-parented.
    pub fn new_pair(&mut self, key: NodeId, value: NodeId) -> NodeId {
        let key = self.disown(key);
        let value = self.disown(value);
        let pair = self.alloc(Variant::Pair {
            key,
            value: Some(value),
        });
        self.node_mut(key).parent = Some(pair);
        self.node_mut(value).parent = Some(pair);
        pair
    }

    /// Builds a tagged value around `content` (copy-on-reinsert applies).
    pub fn new_tag(&mut self, tag: u64, content: NodeId) -> NodeId {
        let content = self.disown(content);
        let id = self.alloc(Variant::Tag {
            tag,
            content: Some(content),
        });
        self.node_mut(content).parent = Some(id);
        id
    }

    /// Returns `val` if unowned, otherwise a deep copy of it.
    pub(crate) fn disown(&mut self, val: NodeId) -> NodeId {
        if self.node(val).parent.is_some() {
            self.duplicate(val)
        } else {
            val
        }
    }

    // ------------------------------------------------------------------
    // Predicates
    // ------------------------------------------------------------------

    pub fn kind(&self, id: NodeId) -> Kind {
        match self.variant(id) {
            Variant::Uint(_) => Kind::Uint,
            Variant::Nint(_) => Kind::Nint,
            Variant::Bytes(_) => Kind::Bytes,
            Variant::Text(_) => Kind::Text,
            Variant::Array(_) => Kind::Array,
            Variant::Map(_) => Kind::Map,
            Variant::Pair { .. } => Kind::Pair,
            Variant::Tag { .. } => Kind::Tag,
            Variant::Simple(_) => Kind::Simple,
        }
    }

    /// True for both text and byte strings.
    pub fn is_string(&self, id: NodeId) -> bool {
        matches!(self.variant(id), Variant::Text(_) | Variant::Bytes(_))
    }

    pub fn is_map(&self, id: NodeId) -> bool {
        matches!(self.variant(id), Variant::Map(_))
    }

    pub fn is_array(&self, id: NodeId) -> bool {
        matches!(self.variant(id), Variant::Array(_))
    }

    pub fn is_container(&self, id: NodeId) -> bool {
        matches!(self.variant(id), Variant::Array(_) | Variant::Map(_))
    }

    pub fn is_pair(&self, id: NodeId) -> bool {
        matches!(self.variant(id), Variant::Pair { .. })
    }

    pub fn is_integer(&self, id: NodeId) -> bool {
        matches!(self.variant(id), Variant::Uint(_) | Variant::Nint(_))
    }

    pub fn is_float(&self, id: NodeId) -> bool {
        matches!(self.variant(id), Variant::Simple(Simple::Float(_)))
    }

    pub fn is_boolean(&self, id: NodeId) -> bool {
        matches!(
            self.variant(id),
            Variant::Simple(Simple::True) | Variant::Simple(Simple::False)
        )
    }

    pub fn is_null(&self, id: NodeId) -> bool {
        matches!(self.variant(id), Variant::Simple(Simple::Null))
    }

    pub fn is_undefined(&self, id: NodeId) -> bool {
        matches!(self.variant(id), Variant::Simple(Simple::Undefined))
    }

    /// True when `id` is a container with no children. False for
    /// non-containers.
    pub fn container_empty(&self, id: NodeId) -> bool {
        match self.variant(id) {
            Variant::Array(ends) | Variant::Map(ends) => {
                ends.first.is_none() && ends.last.is_none()
            }
            _ => false,
        }
    }

    // ------------------------------------------------------------------
    // Coercing accessors — mismatched kinds yield zero/empty, never fail.
    // ------------------------------------------------------------------

    /// Integer view; floats truncate toward zero.
    pub fn integer(&self, id: NodeId) -> i64 {
        match self.variant(id) {
            Variant::Uint(m) => *m as i64,
            Variant::Nint(m) => -1 - *m as i64,
            Variant::Simple(Simple::Float(f)) => *f as i64,
            _ => 0,
        }
    }

    pub fn float(&self, id: NodeId) -> f64 {
        match self.variant(id) {
            Variant::Uint(m) => *m as f64,
            Variant::Nint(m) => (-1 - *m as i64) as f64,
            Variant::Simple(Simple::Float(f)) => *f,
            _ => 0.0,
        }
    }

    pub fn boolean(&self, id: NodeId) -> bool {
        matches!(self.variant(id), Variant::Simple(Simple::True))
    }

    /// Lossy UTF-8 view of a string blob.
    pub fn as_str(&self, id: NodeId) -> std::borrow::Cow<'_, str> {
        match self.variant(id) {
            Variant::Text(b) | Variant::Bytes(b) => String::from_utf8_lossy(b),
            _ => "".into(),
        }
    }

    pub fn str_bytes(&self, id: NodeId) -> &[u8] {
        match self.variant(id) {
            Variant::Text(b) | Variant::Bytes(b) => b,
            _ => &[],
        }
    }

    pub fn str_len(&self, id: NodeId) -> usize {
        self.str_bytes(id).len()
    }

    // ------------------------------------------------------------------
    // Comparison — a closed set of probes.
    // ------------------------------------------------------------------

    /// Byte-for-byte string equality; only ever true for string nodes of
    /// exactly matching length.
    pub fn eq_str(&self, id: NodeId, probe: &str) -> bool {
        match self.variant(id) {
            Variant::Text(b) | Variant::Bytes(b) => {
                b.len() == probe.len() && b.as_slice() == probe.as_bytes()
            }
            _ => false,
        }
    }

    /// Exact equality against a single-precision probe; only float nodes
    /// compare, after narrowing to f32.
    pub fn eq_f32(&self, id: NodeId, probe: f32) -> bool {
        match self.variant(id) {
            Variant::Simple(Simple::Float(f)) => *f as f32 == probe,
            _ => false,
        }
    }

    pub fn eq_f64(&self, id: NodeId, probe: f64) -> bool {
        match self.variant(id) {
            Variant::Simple(Simple::Float(f)) => *f == probe,
            _ => false,
        }
    }

    // ------------------------------------------------------------------
    // Blob growth (used by the codecs while assembling strings)
    // ------------------------------------------------------------------

    pub fn blob_push(&mut self, id: NodeId, byte: u8) {
        if let Variant::Text(b) | Variant::Bytes(b) = &mut self.node_mut(id).variant {
            b.push(byte);
        }
    }

    pub fn blob_push_char(&mut self, id: NodeId, ch: char) {
        if let Variant::Text(b) | Variant::Bytes(b) = &mut self.node_mut(id).variant {
            let mut utf8 = [0u8; 4];
            b.extend_from_slice(ch.encode_utf8(&mut utf8).as_bytes());
        }
    }

    pub fn blob_extend(&mut self, id: NodeId, bytes: &[u8]) {
        if let Variant::Text(b) | Variant::Bytes(b) = &mut self.node_mut(id).variant {
            b.extend_from_slice(bytes);
        }
    }

    // ------------------------------------------------------------------
    // Pair and tag slots
    // ------------------------------------------------------------------

    pub fn pair_key(&self, id: NodeId) -> Option<NodeId> {
        match self.variant(id) {
            Variant::Pair { key, .. } => Some(*key),
            _ => None,
        }
    }

    pub fn pair_value(&self, id: NodeId) -> Option<NodeId> {
        match self.variant(id) {
            Variant::Pair { value, .. } => *value,
            _ => None,
        }
    }

    /// Replaces a pair's value slot, detaching the old value. An
    /// already-owned replacement is deep-copied (copy-on-reinsert).
    /// Returns the id actually linked in.
    pub fn set_pair_value(&mut self, pair: NodeId, val: NodeId) -> Option<NodeId> {
        if !self.is_pair(pair) {
            return None;
        }
        let val = self.disown(val);
        if let Variant::Pair { value, .. } = &mut self.node_mut(pair).variant {
            let old = value.replace(val);
            if let Some(old) = old {
                self.node_mut(old).parent = None;
            }
        }
        self.node_mut(val).parent = Some(pair);
        Some(val)
    }

    /// Detaches and returns a pair's value, leaving the slot empty.
    pub fn take_pair_value(&mut self, pair: NodeId) -> Option<NodeId> {
        let taken = match &mut self.node_mut(pair).variant {
            Variant::Pair { value, .. } => value.take(),
            _ => None,
        };
        if let Some(val) = taken {
            self.node_mut(val).parent = None;
        }
        taken
    }

    pub fn tag_number(&self, id: NodeId) -> u64 {
        match self.variant(id) {
            Variant::Tag { tag, .. } => *tag,
            _ => 0,
        }
    }

    pub fn tag_content(&self, id: NodeId) -> Option<NodeId> {
        match self.variant(id) {
            Variant::Tag { content, .. } => *content,
            _ => None,
        }
    }

    /// The structural parent: a container for list children, a pair for
    /// its key/value, a tag for its content.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    // ------------------------------------------------------------------
    // Deep copy
    // ------------------------------------------------------------------

    /// Full recursive structural copy; the result shares no nodes with
    /// the original and has no parent.
    pub fn duplicate(&mut self, id: NodeId) -> NodeId {
        match self.variant(id) {
            Variant::Uint(m) => {
                let m = *m;
                self.alloc(Variant::Uint(m))
            }
            Variant::Nint(m) => {
                let m = *m;
                self.alloc(Variant::Nint(m))
            }
            Variant::Bytes(b) => {
                let b = b.clone();
                self.alloc(Variant::Bytes(b))
            }
            Variant::Text(b) => {
                let b = b.clone();
                self.alloc(Variant::Text(b))
            }
            Variant::Simple(s) => {
                let s = *s;
                self.alloc(Variant::Simple(s))
            }
            Variant::Pair { key, value } => {
                let (key, value) = (*key, *value);
                let key_dup = self.duplicate(key);
                // An emptied value slot copies as an absence-equivalent Null.
                let val_dup = match value {
                    Some(v) => self.duplicate(v),
                    None => self.new_null(),
                };
                self.new_pair(key_dup, val_dup)
            }
            Variant::Tag { tag, content } => {
                let (tag, content) = (*tag, *content);
                let content_dup = match content {
                    Some(c) => self.duplicate(c),
                    None => self.new_null(),
                };
                self.new_tag(tag, content_dup)
            }
            Variant::Array(_) | Variant::Map(_) => {
                let dup = if self.is_array(id) {
                    self.new_array()
                } else {
                    self.new_map()
                };
                let mut child = self.first(id);
                while let Some(c) = child {
                    let next = self.next(id, c);
                    let child_dup = self.duplicate(c);
                    self.insert_tail(dup, child_dup);
                    child = next;
                }
                dup
            }
        }
    }

    // ------------------------------------------------------------------
    // Host-value construction
    // ------------------------------------------------------------------

    /// Recursively builds a value tree from a host JSON value. Key order
    /// of objects is preserved.
    pub fn from_json(&mut self, v: &serde_json::Value) -> NodeId {
        match v {
            serde_json::Value::Null => self.new_null(),
            serde_json::Value::Bool(b) => self.new_boolean(*b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    self.new_integer(i)
                } else if let Some(u) = n.as_u64() {
                    self.new_uinteger(u)
                } else {
                    self.new_float(n.as_f64().unwrap_or(0.0))
                }
            }
            serde_json::Value::String(s) => self.new_string(s),
            serde_json::Value::Array(items) => {
                let arr = self.new_array();
                for item in items {
                    let child = self.from_json(item);
                    self.insert_tail(arr, child);
                }
                arr
            }
            serde_json::Value::Object(obj) => {
                let map = self.new_map();
                for (k, v) in obj {
                    let key = self.new_string(k);
                    let val = self.from_json(v);
                    let pair = self.new_pair(key, val);
                    self.insert_tail(map, pair);
                }
                map
            }
        }
    }
}
