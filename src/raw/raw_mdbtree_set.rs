use core::borrow::Borrow;
use core::cmp::Ordering;

use super::arena::Arena;
use super::degree::Degree;
use super::handle::Handle;
use super::node::{Node, SearchResult};

/// The core B-tree engine backing `MDBTreeSet`.
///
/// All mutation is single-pass and top-down: insert splits any full node
/// before stepping into it, remove thickens any minimum-size node before
/// stepping into it, so no upward fixup phase exists. The root handle is
/// always valid; an empty tree is a leaf root with zero keys.
pub(crate) struct RawMDBTreeSet<K> {
    /// Arena storing every node of the tree.
    nodes: Arena<Node<K>>,
    /// Handle to the root node. Never dangling.
    root: Handle,
    /// Minimum degree, fixed at construction.
    degree: Degree,
    /// Number of keys currently stored.
    len: usize,
}

/// What the removal descent is currently chasing. The caller's borrowed key
/// drives the descent until an internal hit swaps in a predecessor or
/// successor, which is then chased by value into the subtree it came from.
enum Target<'a, K, Q: ?Sized> {
    Probe(&'a Q),
    Key(K),
}

impl<K, Q> Target<'_, K, Q>
where
    K: Borrow<Q> + Ord,
    Q: ?Sized + Ord,
{
    fn search_in(&self, node: &Node<K>) -> SearchResult {
        match self {
            Target::Probe(query) => node.search(*query),
            Target::Key(key) => node.search(key.borrow()),
        }
    }
}

impl<K> RawMDBTreeSet<K> {
    pub(crate) fn new(degree: Degree) -> Self {
        let mut nodes = Arena::new();
        let root = nodes.alloc(Node::new_leaf());
        Self {
            nodes,
            root,
            degree,
            len: 0,
        }
    }

    pub(crate) fn with_capacity(degree: Degree, capacity: usize) -> Self {
        let mut nodes = Arena::with_capacity(1 + capacity.div_ceil(degree.max_keys()));
        let root = nodes.alloc(Node::new_leaf());
        Self {
            nodes,
            root,
            degree,
            len: 0,
        }
    }

    pub(crate) const fn len(&self) -> usize {
        self.len
    }

    pub(crate) const fn degree(&self) -> Degree {
        self.degree
    }

    pub(crate) fn capacity(&self) -> usize {
        self.nodes.capacity().saturating_sub(1).saturating_mul(self.degree.max_keys())
    }

    /// Drops every key, resetting to an empty leaf root.
    pub(crate) fn clear(&mut self) {
        self.nodes.clear();
        self.root = self.nodes.alloc(Node::new_leaf());
        self.len = 0;
    }

    /// Visits every key in ascending order.
    pub(crate) fn for_each_in_order(&self, mut visit: impl FnMut(&K)) {
        self.walk(self.root, &mut visit);
    }

    fn walk(&self, handle: Handle, visit: &mut impl FnMut(&K)) {
        let node = self.nodes.get(handle);
        for index in 0..node.key_count() {
            if !node.is_leaf() {
                self.walk(node.child(index), visit);
            }
            visit(node.key(index));
        }
        if !node.is_leaf() {
            self.walk(node.child(node.key_count()), visit);
        }
    }
}

impl<K: Ord> RawMDBTreeSet<K> {
    /// Descends from the root looking for `key`. Returns the node and index
    /// holding it, if present.
    pub(crate) fn search<Q>(&self, key: &Q) -> Option<(Handle, usize)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let mut current = self.root;
        loop {
            let node = self.nodes.get(current);
            match node.search(key) {
                SearchResult::Found(index) => return Some((current, index)),
                SearchResult::NotFound(index) => {
                    if node.is_leaf() {
                        return None;
                    }
                    current = node.child(index);
                }
            }
        }
    }

    /// Returns a reference to the stored key equal to `key`.
    pub(crate) fn get<Q>(&self, key: &Q) -> Option<&K>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let (handle, index) = self.search(key)?;
        Some(self.nodes.get(handle).key(index))
    }

    /// Inserts `key`, returning the equal key it displaced if one was
    /// already stored.
    ///
    /// A single top-down pass: any full child is split before the descent
    /// steps into it, so every node entered has room for the one key that a
    /// deeper split could push up into it.
    pub(crate) fn insert(&mut self, key: K) -> Option<K> {
        if self.nodes.get(self.root).is_full(self.degree) {
            self.grow_root();
        }

        let mut current = self.root;
        loop {
            debug_assert!(!self.nodes.get(current).is_full(self.degree));

            let node = self.nodes.get(current);
            match node.search(&key) {
                SearchResult::Found(index) => {
                    // Equal key anywhere on the path overwrites in place.
                    return Some(self.nodes.get_mut(current).replace_key(index, key));
                }
                SearchResult::NotFound(index) => {
                    if node.is_leaf() {
                        self.nodes.get_mut(current).insert_key(index, key);
                        self.len += 1;
                        return None;
                    }

                    let child = node.child(index);
                    if !self.nodes.get(child).is_full(self.degree) {
                        current = child;
                        continue;
                    }

                    self.split_child(current, index);
                    // The split child's median now sits at `index`; re-aim
                    // around it.
                    let node = self.nodes.get(current);
                    match key.cmp(node.key(index)) {
                        Ordering::Less => current = node.child(index),
                        Ordering::Greater => current = node.child(index + 1),
                        Ordering::Equal => {
                            return Some(self.nodes.get_mut(current).replace_key(index, key));
                        }
                    }
                }
            }
        }
    }

    /// Installs a fresh internal root above the current (full) root and
    /// splits the old root under it. The only depth-increasing step.
    fn grow_root(&mut self) {
        let old_root = self.root;
        let mut new_root = Node::new_internal();
        new_root.push_child(old_root);
        self.root = self.nodes.alloc(new_root);
        self.split_child(self.root, 0);
    }

    /// Splits the full child at `index` of `parent`, promoting the child's
    /// median key into `parent` at that same index.
    fn split_child(&mut self, parent: Handle, index: usize) {
        debug_assert!(!self.nodes.get(parent).is_full(self.degree));

        let child = self.nodes.get(parent).child(index);
        let (median, right) = self.nodes.get_mut(child).split(self.degree);
        let right = self.nodes.alloc(right);

        let parent_node = self.nodes.get_mut(parent);
        parent_node.insert_key(index, median);
        parent_node.insert_child(index + 1, right);
        debug_assert_eq!(parent_node.key_count() + 1, parent_node.child_count());
    }

    /// Removes the key equal to `key`, returning it, or `None` if absent.
    ///
    /// A single top-down pass: any minimum-size child is thickened (by
    /// rotation from a sibling, or by merge) before the descent steps into
    /// it, so every node entered can afford to lose a key. When the key is
    /// hit in an internal node it is swapped for its in-order predecessor or
    /// successor, and the descent continues after that stand-in; when both
    /// flanking children are thin, the key is pulled down into a merged
    /// child instead and chased there.
    ///
    /// A miss leaves the key set untouched, although thickening on the way
    /// down may already have reshaped ancestors; every invariant still
    /// holds.
    pub(crate) fn remove<Q>(&mut self, key: &Q) -> Option<K>
    where
        K: Borrow<Q> + Clone,
        Q: ?Sized + Ord,
    {
        let mut target: Target<'_, K, Q> = Target::Probe(key);
        let mut displaced: Option<K> = None;
        let mut current = self.root;

        loop {
            debug_assert!(current == self.root || self.nodes.get(current).can_lend(self.degree));

            let node = self.nodes.get(current);
            match target.search_in(node) {
                SearchResult::Found(index) if node.is_leaf() => {
                    let removed = self.nodes.get_mut(current).remove_key(index);
                    self.len -= 1;
                    // When a predecessor/successor swap happened above, the
                    // key the caller removed is the one the swap displaced.
                    return Some(displaced.unwrap_or(removed));
                }
                SearchResult::Found(index) => {
                    current = self.remove_from_internal(current, index, &mut target, &mut displaced);
                }
                SearchResult::NotFound(_) if node.is_leaf() => {
                    return None;
                }
                SearchResult::NotFound(index) => {
                    current = self.descend_thickened(current, index);
                }
            }
        }
    }

    /// Removal hit a key at `index` of the internal node `handle`. Swaps the
    /// key for its predecessor (left subtree rich), else its successor
    /// (right subtree rich), else merges both thin flanks around it. Returns
    /// the child to continue the removal in.
    fn remove_from_internal<'a, Q>(
        &mut self,
        handle: Handle,
        index: usize,
        target: &mut Target<'a, K, Q>,
        displaced: &mut Option<K>,
    ) -> Handle
    where
        K: Borrow<Q> + Clone,
        Q: ?Sized + Ord,
    {
        let node = self.nodes.get(handle);
        let before = node.child(index);
        let after = node.child(index + 1);

        if self.nodes.get(before).can_lend(self.degree) {
            let predecessor = self.last_key_of(before).clone();
            let old = self.nodes.get_mut(handle).replace_key(index, predecessor.clone());
            debug_assert!(displaced.is_none());
            *displaced = Some(old);
            *target = Target::Key(predecessor);
            before
        } else if self.nodes.get(after).can_lend(self.degree) {
            let successor = self.first_key_of(after).clone();
            let old = self.nodes.get_mut(handle).replace_key(index, successor.clone());
            debug_assert!(displaced.is_none());
            *displaced = Some(old);
            *target = Target::Key(successor);
            after
        } else {
            // Both flanks sit at the minimum: pull the key down between them
            // and keep chasing it inside the merged child.
            self.merge_children(handle, index)
        }
    }

    /// Removal wants to descend into the child at `index` of `handle`.
    /// Thickens that child first if it sits at the minimum, borrowing from a
    /// sibling that can spare a key or merging with one that cannot.
    /// Returns the child to descend into.
    fn descend_thickened(&mut self, parent: Handle, index: usize) -> Handle {
        let parent_node = self.nodes.get(parent);
        let child = parent_node.child(index);
        if self.nodes.get(child).can_lend(self.degree) {
            return child;
        }

        let left = (index > 0).then(|| parent_node.child(index - 1));
        let right = (index + 1 < parent_node.child_count()).then(|| parent_node.child(index + 1));

        if let Some(left) = left
            && self.nodes.get(left).can_lend(self.degree)
        {
            self.rotate_right(parent, index);
            child
        } else if let Some(right) = right
            && self.nodes.get(right).can_lend(self.degree)
        {
            self.rotate_left(parent, index);
            child
        } else if left.is_some() {
            self.merge_children(parent, index - 1)
        } else {
            self.merge_children(parent, index)
        }
    }

    /// Rotates one key clockwise through `parent`: the separator before the
    /// child at `index` drops to the child's front, and the left sibling's
    /// last key (plus its last child, when internal) moves up and over.
    fn rotate_right(&mut self, parent: Handle, index: usize) {
        let parent_node = self.nodes.get(parent);
        let left = parent_node.child(index - 1);
        let child = parent_node.child(index);
        debug_assert!(self.nodes.get(left).can_lend(self.degree));
        debug_assert!(!self.nodes.get(child).can_lend(self.degree));

        let (spare_key, spare_child) = self.nodes.get_mut(left).pop_back();
        let separator = self.nodes.get_mut(parent).replace_key(index - 1, spare_key);
        self.nodes.get_mut(child).push_front(separator, spare_child);
    }

    /// Mirror image of [`Self::rotate_right`]: the separator after the child
    /// drops to its back, refilled from the right sibling's front.
    fn rotate_left(&mut self, parent: Handle, index: usize) {
        let parent_node = self.nodes.get(parent);
        let right = parent_node.child(index + 1);
        let child = parent_node.child(index);
        debug_assert!(self.nodes.get(right).can_lend(self.degree));
        debug_assert!(!self.nodes.get(child).can_lend(self.degree));

        let (spare_key, spare_child) = self.nodes.get_mut(right).pop_front();
        let separator = self.nodes.get_mut(parent).replace_key(index, spare_key);
        self.nodes.get_mut(child).push_back(separator, spare_child);
    }

    /// Merges the two children flanking the separator at `index` of
    /// `parent` into the left one, pulling the separator down between them
    /// and releasing the right child's slot. If that drains an internal
    /// root, the merged child becomes the new root and the tree loses one
    /// level - the only depth-decreasing step. Returns the merged child.
    fn merge_children(&mut self, parent: Handle, index: usize) -> Handle {
        let (separator, right) = self.nodes.get_mut(parent).remove_separator(index);
        let left = self.nodes.get(parent).child(index);
        let right_node = self.nodes.take(right);
        self.nodes.get_mut(left).merge_with_right(separator, right_node, self.degree);

        if parent == self.root && self.nodes.get(parent).key_count() == 0 {
            self.nodes.free(parent);
            self.root = left;
        }
        left
    }

    /// Largest key in the subtree at `handle`: the last key of its rightmost
    /// leaf.
    fn last_key_of(&self, handle: Handle) -> &K {
        let mut current = handle;
        loop {
            let node = self.nodes.get(current);
            if node.is_leaf() {
                return node.key(node.key_count() - 1);
            }
            current = node.child(node.child_count() - 1);
        }
    }

    /// Smallest key in the subtree at `handle`: the first key of its
    /// leftmost leaf.
    fn first_key_of(&self, handle: Handle) -> &K {
        let mut current = handle;
        loop {
            let node = self.nodes.get(current);
            if node.is_leaf() {
                return node.key(0);
            }
            current = node.child(0);
        }
    }
}

impl<K: Clone> Clone for RawMDBTreeSet<K> {
    fn clone(&self) -> Self {
        // Handles are arena indices, so cloning the arena wholesale keeps
        // every child reference valid in the copy.
        Self {
            nodes: self.nodes.clone(),
            root: self.root,
            degree: self.degree,
            len: self.len,
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
#[allow(clippy::uninlined_format_args)]
mod tests {
    use alloc::format;
    use alloc::string::String;
    use alloc::vec::Vec;

    use proptest::prelude::*;

    use super::*;

    impl<K: Ord + Clone> RawMDBTreeSet<K> {
        /// Validates every structural invariant. Panics with a description
        /// of each violation found.
        pub(crate) fn validate_invariants(&self) {
            let mut errors: Vec<String> = Vec::new();
            let mut leaf_depth: Option<usize> = None;
            let mut key_total = 0usize;
            let mut node_total = 0usize;

            self.validate_node(self.root, 0, None, None, &mut leaf_depth, &mut key_total, &mut node_total, &mut errors);

            // Root key floor: zero keys only for an empty leaf root.
            let root = self.nodes.get(self.root);
            if root.key_count() == 0 && (!root.is_leaf() || self.len != 0) {
                errors.push(format!("empty root on a tree of len {}", self.len));
            }

            if key_total != self.len {
                errors.push(format!("len mismatch: stored {}, counted {}", self.len, key_total));
            }

            // Every arena slot must be reachable from the root; merges and
            // root shrinks must not leak nodes.
            if node_total != self.nodes.len() {
                errors.push(format!("arena holds {} nodes, tree reaches {}", self.nodes.len(), node_total));
            }

            // Strictly ascending in-order traversal covers both per-node
            // ascent and global uniqueness.
            let keys = self.in_order();
            for pair in keys.windows(2) {
                if pair[0] >= pair[1] {
                    errors.push(String::from("in-order traversal is not strictly ascending"));
                }
            }

            assert!(errors.is_empty(), "tree invariant violations:\n{}", errors.join("\n"));
        }

        #[allow(clippy::too_many_arguments)]
        fn validate_node(
            &self,
            handle: Handle,
            depth: usize,
            lower: Option<&K>,
            upper: Option<&K>,
            leaf_depth: &mut Option<usize>,
            key_total: &mut usize,
            node_total: &mut usize,
            errors: &mut Vec<String>,
        ) {
            let node = self.nodes.get(handle);
            *key_total += node.key_count();
            *node_total += 1;

            if depth > 0 && node.key_count() < self.degree.min_keys() {
                errors.push(format!(
                    "node at depth {} holds {} keys, below the floor of {}",
                    depth,
                    node.key_count(),
                    self.degree.min_keys()
                ));
            }
            if node.key_count() > self.degree.max_keys() {
                errors.push(format!(
                    "node at depth {} holds {} keys, above the cap of {}",
                    depth,
                    node.key_count(),
                    self.degree.max_keys()
                ));
            }

            for index in 1..node.key_count() {
                if node.key(index - 1) >= node.key(index) {
                    errors.push(format!("keys out of order at depth {} index {}", depth, index));
                }
            }

            // Subtree bounds: every key must lie strictly inside the open
            // interval its ancestors established.
            if node.key_count() > 0 {
                if let Some(lower) = lower
                    && node.key(0) <= lower
                {
                    errors.push(format!("separator ordering broken below lower bound at depth {}", depth));
                }
                if let Some(upper) = upper
                    && node.key(node.key_count() - 1) >= upper
                {
                    errors.push(format!("separator ordering broken above upper bound at depth {}", depth));
                }
            }

            if node.is_leaf() {
                if node.child_count() != 0 {
                    errors.push(format!("leaf at depth {} has children", depth));
                }
                match *leaf_depth {
                    None => *leaf_depth = Some(depth),
                    Some(expected) => {
                        if depth != expected {
                            errors.push(format!("leaf at depth {}, expected all leaves at {}", depth, expected));
                        }
                    }
                }
            } else {
                if node.child_count() != node.key_count() + 1 {
                    errors.push(format!(
                        "internal node at depth {} has {} keys but {} children",
                        depth,
                        node.key_count(),
                        node.child_count()
                    ));
                }
                for index in 0..node.child_count() {
                    let child_lower = if index == 0 { lower } else { Some(node.key(index - 1)) };
                    let child_upper = if index == node.key_count() { upper } else { Some(node.key(index)) };
                    self.validate_node(
                        node.child(index),
                        depth + 1,
                        child_lower,
                        child_upper,
                        leaf_depth,
                        key_total,
                        node_total,
                        errors,
                    );
                }
            }
        }

        pub(crate) fn in_order(&self) -> Vec<K> {
            let mut keys = Vec::with_capacity(self.len);
            self.for_each_in_order(|key| keys.push(key.clone()));
            keys
        }

        /// Number of levels from the root to the leaves, inclusive.
        pub(crate) fn depth(&self) -> usize {
            let mut depth = 1;
            let mut current = self.root;
            while !self.nodes.get(current).is_leaf() {
                depth += 1;
                current = self.nodes.get(current).child(0);
            }
            depth
        }

        pub(crate) fn node_count(&self) -> usize {
            self.nodes.len()
        }

        fn root_keys(&self) -> Vec<K> {
            let root = self.nodes.get(self.root);
            (0..root.key_count()).map(|index| root.key(index).clone()).collect()
        }

        fn child_keys(&self, index: usize) -> Vec<K> {
            let child = self.nodes.get(self.nodes.get(self.root).child(index));
            (0..child.key_count()).map(|i| child.key(i).clone()).collect()
        }
    }

    fn tree(t: usize) -> RawMDBTreeSet<i64> {
        RawMDBTreeSet::new(Degree::new(t).unwrap())
    }

    #[test]
    fn empty_tree_is_a_bare_leaf_root() {
        let tree = tree(2);
        assert_eq!(tree.len(), 0);
        assert_eq!(tree.depth(), 1);
        assert_eq!(tree.node_count(), 1);
        tree.validate_invariants();
    }

    #[test]
    fn ascending_fill_reaches_depth_three() {
        // Ten ascending keys at t = 2 force two root growths.
        let mut tree = tree(2);
        for key in 1..=10 {
            assert_eq!(tree.insert(key), None);
            tree.validate_invariants();
        }

        assert_eq!(tree.len(), 10);
        assert_eq!(tree.depth(), 3);
        assert_eq!(tree.in_order(), (1..=10).collect::<Vec<_>>());
    }

    #[test]
    fn duplicate_insert_overwrites_in_place() {
        let mut tree = tree(2);
        assert_eq!(tree.insert(5), None);
        assert_eq!(tree.insert(5), Some(5));
        assert_eq!(tree.len(), 1);
        assert_eq!(tree.get(&5), Some(&5));
        tree.validate_invariants();
    }

    #[test]
    fn root_growth_after_filling_the_root() {
        let mut tree = tree(2);
        for key in [10, 20, 30] {
            tree.insert(key);
        }
        // Three keys fill a t = 2 root exactly.
        assert_eq!(tree.depth(), 1);
        assert_eq!(tree.root_keys(), [10, 20, 30]);

        tree.insert(40);
        assert_eq!(tree.depth(), 2);
        assert_eq!(tree.root_keys(), [20]);
        assert_eq!(tree.child_keys(0), [10]);
        assert_eq!(tree.child_keys(1), [30, 40]);
        tree.validate_invariants();
    }

    #[test]
    fn removing_an_internal_key_merges_thin_flanks() {
        let mut tree = tree(2);
        for key in [10, 20, 30, 40] {
            tree.insert(key);
        }
        tree.remove(&40);
        let nodes_before = tree.node_count();

        // 20 sits in the root with both children down to one key, so the
        // merge path runs and the root shrinks back to a single leaf.
        assert_eq!(tree.remove(&20), Some(20));
        tree.validate_invariants();
        assert_eq!(tree.len(), 2);
        assert_eq!(tree.depth(), 1);
        assert_eq!(tree.node_count(), nodes_before - 2);
        assert_eq!(tree.in_order(), [10, 30]);
    }

    #[test]
    fn removing_an_internal_key_falls_back_to_the_successor() {
        let mut tree = tree(2);
        for key in [10, 20, 30, 40] {
            tree.insert(key);
        }
        // Root key 20 with a thin left flank [10] and a rich right flank
        // [30, 40]: successor 30 replaces it.
        assert_eq!(tree.remove(&20), Some(20));
        tree.validate_invariants();
        assert_eq!(tree.root_keys(), [30]);
        assert_eq!(tree.in_order(), [10, 30, 40]);
    }

    #[test]
    fn removing_an_internal_key_prefers_the_predecessor() {
        let mut tree = tree(2);
        for key in [10, 20, 30, 40, 5, 15] {
            tree.insert(key);
        }
        // Root key 20 flanked by [5, 10, 15] on the left: predecessor 15
        // replaces it.
        assert_eq!(tree.remove(&20), Some(20));
        tree.validate_invariants();
        assert_eq!(tree.in_order(), [5, 10, 15, 30, 40]);
        assert!(tree.get(&20).is_none());
    }

    #[test]
    fn removing_the_last_key_leaves_an_empty_leaf_root() {
        let mut tree = tree(2);
        tree.insert(7);
        assert_eq!(tree.remove(&7), Some(7));
        assert_eq!(tree.len(), 0);
        assert_eq!(tree.depth(), 1);
        assert_eq!(tree.node_count(), 1);
        tree.validate_invariants();

        // The empty tree keeps working.
        assert_eq!(tree.remove(&7), None);
        tree.insert(9);
        assert_eq!(tree.get(&9), Some(&9));
    }

    #[test]
    fn missing_key_leaves_contents_untouched() {
        let mut tree = tree(2);
        for key in 0..32 {
            tree.insert(key * 2);
        }
        let before = tree.in_order();

        // Misses may reshape the tree on the way down but never its
        // contents.
        assert_eq!(tree.remove(&7), None);
        tree.validate_invariants();
        assert_eq!(tree.len(), 32);
        assert_eq!(tree.in_order(), before);
    }

    #[test]
    fn clear_resets_to_empty() {
        let mut tree = tree(3);
        for key in 0..100 {
            tree.insert(key);
        }
        tree.clear();
        assert_eq!(tree.len(), 0);
        assert_eq!(tree.node_count(), 1);
        tree.validate_invariants();
    }

    #[test]
    fn clone_detaches_storage() {
        let mut tree = tree(2);
        for key in 0..50 {
            tree.insert(key);
        }
        let snapshot = tree.clone();
        for key in 0..25 {
            tree.remove(&key);
        }

        assert_eq!(snapshot.len(), 50);
        assert_eq!(snapshot.in_order(), (0..50).collect::<Vec<_>>());
        snapshot.validate_invariants();
        tree.validate_invariants();
    }

    proptest! {
        /// Randomized churn at several degrees, validating the structural
        /// invariants throughout and draining to empty at the end.
        #[test]
        fn soak_insert_search_remove(
            t in 2usize..6,
            mut keys in proptest::collection::vec(-5_000i64..5_000, 1..800),
            seed in any::<u64>(),
        ) {
            let mut tree = tree(t);
            let mut expected: alloc::collections::BTreeSet<i64> = alloc::collections::BTreeSet::new();

            for (step, &key) in keys.iter().enumerate() {
                let displaced = tree.insert(key);
                prop_assert_eq!(displaced.is_some(), !expected.insert(key));
                if step % 64 == 0 {
                    tree.validate_invariants();
                }
            }
            tree.validate_invariants();
            prop_assert_eq!(tree.len(), expected.len());

            for key in &expected {
                prop_assert_eq!(tree.get(key), Some(key));
            }

            // Remove in an order unrelated to insertion order.
            let mut state = seed | 1;
            keys.sort_unstable();
            keys.dedup();
            while !keys.is_empty() {
                state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
                let key = keys.swap_remove((state >> 33) as usize % keys.len());
                prop_assert_eq!(tree.remove(&key), Some(key));
                prop_assert!(expected.remove(&key));
                if keys.len() % 64 == 0 {
                    tree.validate_invariants();
                }
            }

            prop_assert_eq!(tree.len(), 0);
            assert_eq!(tree.depth(), 1);
            tree.validate_invariants();
        }

        /// Insertion order never changes the resulting key set.
        #[test]
        fn contents_are_permutation_invariant(
            keys in proptest::collection::vec(-1_000i64..1_000, 1..200),
            rotation in any::<usize>(),
        ) {
            let mut forward = tree(2);
            for &key in &keys {
                forward.insert(key);
            }

            let mut rotated = tree(2);
            let pivot = rotation % keys.len();
            for &key in keys[pivot..].iter().chain(&keys[..pivot]) {
                rotated.insert(key);
            }

            prop_assert_eq!(forward.in_order(), rotated.in_order());
        }
    }
}
