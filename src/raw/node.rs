use core::borrow::Borrow;

use smallvec::SmallVec;

use super::degree::Degree;
use super::handle::Handle;

// Inline capacity for node storage. Degrees up to t = 4 (seven keys, eight
// children) live entirely inline; larger degrees spill to the heap.
pub(crate) const INLINE_KEYS: usize = 7;
pub(crate) const INLINE_CHILDREN: usize = INLINE_KEYS + 1;

pub(crate) type Keys<K> = SmallVec<[K; INLINE_KEYS]>;
pub(crate) type Children = SmallVec<[Handle; INLINE_CHILDREN]>;

/// A single tree node: up to `2t - 1` strictly ascending keys, plus one
/// child handle per key gap when the node is internal. `leaf` is fixed at
/// construction; `children` stays empty exactly when `leaf` is set.
#[derive(Clone)]
pub(crate) struct Node<K> {
    leaf: bool,
    keys: Keys<K>,
    children: Children,
}

/// Result of searching for a key within one node.
pub(crate) enum SearchResult {
    /// Key was found at the given index.
    Found(usize),
    /// Key was not found; index is the child to descend into, which is also
    /// the position the key would occupy in this node.
    NotFound(usize),
}

impl<K> Node<K> {
    pub(crate) fn new_leaf() -> Self {
        Self {
            leaf: true,
            keys: SmallVec::new(),
            children: SmallVec::new(),
        }
    }

    pub(crate) fn new_internal() -> Self {
        Self {
            leaf: false,
            keys: SmallVec::new(),
            children: SmallVec::new(),
        }
    }

    pub(crate) const fn is_leaf(&self) -> bool {
        self.leaf
    }

    pub(crate) fn key_count(&self) -> usize {
        self.keys.len()
    }

    pub(crate) fn child_count(&self) -> usize {
        self.children.len()
    }

    /// Whether the node holds its capacity of `2t - 1` keys.
    pub(crate) fn is_full(&self, degree: Degree) -> bool {
        debug_assert!(self.keys.len() <= degree.max_keys());
        self.keys.len() == degree.max_keys()
    }

    /// Whether the node holds strictly more than the `t - 1` floor, i.e. can
    /// give up one key (to a removal below it or to a thin sibling) without
    /// underflowing.
    pub(crate) fn can_lend(&self, degree: Degree) -> bool {
        self.keys.len() > degree.min_keys()
    }

    #[inline]
    pub(crate) fn key(&self, index: usize) -> &K {
        &self.keys[index]
    }

    #[inline]
    pub(crate) fn child(&self, index: usize) -> Handle {
        self.children[index]
    }

    /// Inserts `key` at `index`, keeping the strict ascent intact when
    /// `index` came from a failed search. Children are not adjusted; the
    /// caller owns that concern.
    pub(crate) fn insert_key(&mut self, index: usize, key: K) {
        self.keys.insert(index, key);
    }

    pub(crate) fn remove_key(&mut self, index: usize) -> K {
        self.keys.remove(index)
    }

    /// Overwrites the key at `index` in place, returning the displaced key.
    pub(crate) fn replace_key(&mut self, index: usize, key: K) -> K {
        core::mem::replace(&mut self.keys[index], key)
    }

    pub(crate) fn insert_child(&mut self, index: usize, child: Handle) {
        debug_assert!(!self.leaf);
        self.children.insert(index, child);
    }

    /// Appends a child without touching the keys. Only used while wiring up
    /// a freshly grown root.
    pub(crate) fn push_child(&mut self, child: Handle) {
        debug_assert!(!self.leaf);
        self.children.push(child);
    }

    /// Detaches the last key and, on an internal node, the last child.
    pub(crate) fn pop_back(&mut self) -> (K, Option<Handle>) {
        let key = self.keys.pop().unwrap();
        let child = if self.leaf { None } else { Some(self.children.pop().unwrap()) };
        (key, child)
    }

    /// Detaches the first key and, on an internal node, the first child.
    pub(crate) fn pop_front(&mut self) -> (K, Option<Handle>) {
        let key = self.keys.remove(0);
        let child = if self.leaf { None } else { Some(self.children.remove(0)) };
        (key, child)
    }

    pub(crate) fn push_back(&mut self, key: K, child: Option<Handle>) {
        debug_assert_eq!(self.leaf, child.is_none());
        self.keys.push(key);
        if let Some(child) = child {
            self.children.push(child);
        }
    }

    pub(crate) fn push_front(&mut self, key: K, child: Option<Handle>) {
        debug_assert_eq!(self.leaf, child.is_none());
        self.keys.insert(0, key);
        if let Some(child) = child {
            self.children.insert(0, child);
        }
    }

    /// Removes the separator key at `index` together with the child to its
    /// right, returning both. The caller merges the detached child into the
    /// one remaining at `index`.
    pub(crate) fn remove_separator(&mut self, index: usize) -> (K, Handle) {
        debug_assert!(!self.leaf);
        let key = self.keys.remove(index);
        let child = self.children.remove(index + 1);
        (key, child)
    }

    /// Splits a full node in half. The upper `t - 1` keys (and upper `t`
    /// children, when internal) move into a fresh sibling of the same leaf
    /// status; the median key is handed back for the parent to absorb.
    pub(crate) fn split(&mut self, degree: Degree) -> (K, Node<K>) {
        debug_assert!(self.is_full(degree));

        let t = degree.get();
        let mut right = if self.leaf { Node::new_leaf() } else { Node::new_internal() };
        right.keys = self.keys.drain(t..).collect();
        if !self.leaf {
            right.children = self.children.drain(t..).collect();
        }
        let median = self.keys.pop().unwrap();

        debug_assert_eq!(self.keys.len(), degree.min_keys());
        debug_assert_eq!(right.keys.len(), degree.min_keys());
        debug_assert!(self.leaf || self.children.len() == t);
        debug_assert!(right.leaf || right.children.len() == t);
        (median, right)
    }
}

impl<K: Ord> Node<K> {
    /// Binary-searches this node's keys for `key`.
    #[inline]
    pub(crate) fn search<Q>(&self, key: &Q) -> SearchResult
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        match self.keys.binary_search_by(|k| k.borrow().cmp(key)) {
            Ok(index) => SearchResult::Found(index),
            Err(index) => SearchResult::NotFound(index),
        }
    }

    /// Absorbs `separator` and the whole of `right`, which must be the
    /// sibling immediately after this node. Both operands hold `t - 1` keys
    /// coming in; the merged node holds exactly `2t - 1`.
    pub(crate) fn merge_with_right(&mut self, separator: K, mut right: Node<K>, degree: Degree) {
        debug_assert_eq!(self.leaf, right.leaf);
        debug_assert_eq!(self.keys.len(), degree.min_keys());
        debug_assert_eq!(right.keys.len(), degree.min_keys());
        debug_assert!(self.keys.last().is_none_or(|last| *last < separator));
        debug_assert!(right.keys.first().is_none_or(|first| separator < *first));

        self.keys.push(separator);
        self.keys.append(&mut right.keys);
        self.children.append(&mut right.children);

        debug_assert!(self.is_full(degree));
        debug_assert!(self.leaf || self.children.len() == degree.max_children());
    }
}
