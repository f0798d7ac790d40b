use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;
use core::cmp::Ordering::{Equal, Greater, Less};
use core::marker::PhantomData;

use smallvec::SmallVec;

use super::bounds::Bounds;
use super::fuzzy;
use super::node::{Branch, Link, Node, Slot, clone_link, dismantle, size_of};
use super::traverse::{Traversal, TraversalMut, drain_sorted};
use crate::normalize::{Folded, KeyNormalizer, display_key, fold_key};

/// The core ternary search tree backing `TstMap`.
///
/// Keys are folded through `N` before they touch the tree. The empty key cannot be spelled
/// by a node chain, so it lives in a dedicated slot.
pub(crate) struct RawTstMap<V, N> {
    root: Link<V>,
    empty: Option<Slot<V>>,
    _normalizer: PhantomData<N>,
}

/// One step of a removal path.
struct PathElement {
    /// The branch taken out of the node at this depth.
    branch: Branch,
    /// The node holds no value and its only child is the one on `branch`.
    sole_child: bool,
}

/// Type alias for a removal path (stack of path elements).
type Path = SmallVec<[PathElement; 24]>;

impl<V, N> RawTstMap<V, N> {
    /// Creates a new, empty tree.
    pub(crate) const fn new() -> Self {
        RawTstMap {
            root: None,
            empty: None,
            _normalizer: PhantomData,
        }
    }

    /// Returns the number of keys in the tree.
    pub(crate) fn len(&self) -> usize {
        size_of(&self.root) + usize::from(self.empty.is_some())
    }

    /// Returns true if the tree contains no keys.
    pub(crate) const fn is_empty(&self) -> bool {
        self.root.is_none() && self.empty.is_none()
    }

    /// Clears all keys from the tree.
    pub(crate) fn clear(&mut self) {
        self.empty = None;
        dismantle(self.root.take());
    }

    /// Drains all entries in ascending key order, leaving the tree empty.
    pub(crate) fn drain_to_vec(&mut self) -> Vec<(String, V)> {
        let len = self.len();
        drain_sorted(self.root.take(), self.empty.take(), len)
    }

    /// An in-order walk over the keys inside `bounds`.
    pub(crate) fn traverse(&self, bounds: Bounds) -> Traversal<'_, V> {
        Traversal::new(&self.root, self.empty.as_ref(), bounds)
    }

    /// An in-order walk handing out the slots inside `bounds` mutably.
    pub(crate) fn traverse_mut(&mut self, bounds: Bounds) -> TraversalMut<'_, V> {
        TraversalMut::new(&mut self.root, self.empty.as_mut(), bounds)
    }

    /// An in-order walk over the keys that do not start with the folded `prefix`.
    pub(crate) fn traverse_excluding(&self, prefix: Folded) -> Traversal<'_, V> {
        Traversal::excluding(&self.root, self.empty.as_ref(), prefix)
    }

    /// An in-order walk over the keys starting with the folded `prefix`.
    pub(crate) fn traverse_prefix(&self, prefix: Folded) -> Traversal<'_, V> {
        if prefix.is_empty() {
            return self.traverse(Bounds::full());
        }
        Traversal::prefixed(self.find(&prefix), prefix)
    }

    /// Finds the node consuming the last character of a non-empty folded key.
    fn find(&self, folded: &[char]) -> Option<&Node<V>> {
        let mut link = &self.root;
        let mut index = 0;
        loop {
            let node = link.as_deref()?;
            match folded.get(index)?.cmp(&node.split) {
                Less => link = &node.lower,
                Greater => link = &node.higher,
                Equal => {
                    index += 1;
                    if index == folded.len() {
                        return Some(node);
                    }
                    link = &node.equal;
                }
            }
        }
    }

    /// Returns the slot for a folded key.
    pub(crate) fn slot(&self, folded: &[char]) -> Option<&Slot<V>> {
        if folded.is_empty() {
            return self.empty.as_ref();
        }
        self.find(folded)?.slot.as_ref()
    }

    /// Returns the slot for a folded key mutably.
    pub(crate) fn slot_mut(&mut self, folded: &[char]) -> Option<&mut Slot<V>> {
        if folded.is_empty() {
            return self.empty.as_mut();
        }
        let mut link = &mut self.root;
        let mut index = 0;
        loop {
            let node = link.as_deref_mut()?;
            match folded[index].cmp(&node.split) {
                Less => link = &mut node.lower,
                Greater => link = &mut node.higher,
                Equal => {
                    index += 1;
                    if index == folded.len() {
                        return node.slot.as_mut();
                    }
                    link = &mut node.equal;
                }
            }
        }
    }

    /// Inserts a value under a folded key, returning the previous value and a reference to
    /// the stored one. `key` is the caller's spelling, kept for folding normalizers.
    pub(crate) fn insert_folded(&mut self, folded: &[char], key: Option<Box<str>>, value: V) -> (Option<V>, &mut V) {
        let slot = Slot::new(value, key);
        if folded.is_empty() {
            let old = self.empty.take();
            let new = self.empty.insert(slot);
            return (old.map(|s| s.value), &mut new.value);
        }

        // Counters along the path only move when the key is new.
        let is_new = self.slot(folded).is_none();
        let mut link = &mut self.root;
        let mut index = 0;
        loop {
            let c = folded[index];
            let node = link.get_or_insert_with(|| Box::new(Node::new(c)));
            if is_new {
                node.size += 1;
            }
            match c.cmp(&node.split) {
                Less => link = &mut node.lower,
                Greater => link = &mut node.higher,
                Equal => {
                    index += 1;
                    if index == folded.len() {
                        let old = node.slot.take();
                        let new = node.slot.insert(slot);
                        return (old.map(|s| s.value), &mut new.value);
                    }
                    link = &mut node.equal;
                }
            }
        }
    }

    /// Records the branches from the root to the node holding a non-empty folded key, and
    /// the depth of the topmost node that becomes dangling once the key's value is gone.
    fn removal_path(&self, folded: &[char]) -> Option<(Path, Option<usize>)> {
        let mut path = Path::new();
        let mut link = &self.root;
        let mut index = 0;
        let terminal = loop {
            let node = link.as_deref()?;
            let branch = match folded[index].cmp(&node.split) {
                Less => Branch::Lower,
                Greater => Branch::Higher,
                Equal if index + 1 == folded.len() => break node,
                Equal => Branch::Equal,
            };
            path.push(PathElement {
                branch,
                sole_child: node.slot.is_none() && node.child_count() == 1,
            });
            if branch == Branch::Equal {
                index += 1;
            }
            link = node.child(branch);
        };

        terminal.slot.as_ref()?;
        if terminal.child_count() > 0 {
            return Some((path, None));
        }
        let mut cut = path.len();
        while cut > 0 && path[cut - 1].sole_child {
            cut -= 1;
        }
        Some((path, Some(cut)))
    }

    /// Removes the value under a non-empty folded key.
    ///
    /// Counters are decremented along the whole search path, then the topmost node left
    /// without a value or children is detached together with the chain below it.
    fn remove_folded(&mut self, folded: &[char]) -> Option<Slot<V>> {
        let (path, cut) = self.removal_path(folded)?;
        let mut link = &mut self.root;
        for depth in 0..=path.len() {
            if cut == Some(depth) {
                let mut detached = link.take()?;
                tracing::trace!(depth, "pruned dangling branch");
                let mut node: &mut Node<V> = &mut detached;
                for step in &path[depth..] {
                    node = node.child_mut(step.branch).as_deref_mut()?;
                }
                let slot = node.slot.take();
                dismantle(Some(detached));
                return slot;
            }
            let node = link.as_deref_mut()?;
            node.size -= 1;
            if depth == path.len() {
                return node.slot.take();
            }
            link = node.child_mut(path[depth].branch);
        }
        None
    }

    /// Removes a folded key, returning the stored slot.
    pub(crate) fn remove_slot(&mut self, folded: &[char]) -> Option<Slot<V>> {
        if folded.is_empty() {
            return self.empty.take();
        }
        self.remove_folded(folded)
    }

    /// Gets the folded key and slot at `rank` (0-indexed position in sorted order).
    pub(crate) fn get_by_rank(&self, rank: usize) -> Option<(Folded, &Slot<V>)> {
        if rank >= self.len() {
            return None;
        }
        let mut remaining = rank;
        if let Some(slot) = &self.empty {
            if remaining == 0 {
                return Some((Folded::new(), slot));
            }
            remaining -= 1;
        }

        let mut path = Folded::new();
        let mut link = &self.root;
        loop {
            let node = link.as_deref()?;
            let lower = size_of(&node.lower);
            if remaining < lower {
                link = &node.lower;
                continue;
            }
            remaining -= lower;
            if let Some(slot) = &node.slot {
                if remaining == 0 {
                    path.push(node.split);
                    return Some((path, slot));
                }
                remaining -= 1;
            }
            let equal = size_of(&node.equal);
            if remaining < equal {
                path.push(node.split);
                link = &node.equal;
                continue;
            }
            remaining -= equal;
            link = &node.higher;
        }
    }

    /// Gets the folded key and a mutable slot at `rank`.
    pub(crate) fn get_by_rank_mut(&mut self, rank: usize) -> Option<(Folded, &mut Slot<V>)> {
        if rank >= self.len() {
            return None;
        }
        let mut remaining = rank;
        if self.empty.is_some() {
            if remaining == 0 {
                return self.empty.as_mut().map(|slot| (Folded::new(), slot));
            }
            remaining -= 1;
        }

        let mut path = Folded::new();
        let mut link = &mut self.root;
        loop {
            let node = link.as_deref_mut()?;
            let lower = size_of(&node.lower);
            if remaining < lower {
                link = &mut node.lower;
                continue;
            }
            remaining -= lower;
            if node.slot.is_some() {
                if remaining == 0 {
                    path.push(node.split);
                    return node.slot.as_mut().map(|slot| (path, slot));
                }
                remaining -= 1;
            }
            let equal = size_of(&node.equal);
            if remaining < equal {
                path.push(node.split);
                link = &mut node.equal;
                continue;
            }
            remaining -= equal;
            link = &mut node.higher;
        }
    }

    /// The reported key and value at `rank`.
    pub(crate) fn entry_at(&self, rank: usize) -> Option<(String, &V)> {
        let (path, slot) = self.get_by_rank(rank)?;
        Some((slot.key_string(&path), &slot.value))
    }

    /// Removes the entry at `rank`, returning the reported key and value.
    pub(crate) fn remove_at(&mut self, rank: usize) -> Option<(String, V)> {
        let (folded, _) = self.get_by_rank(rank)?;
        let slot = self.remove_slot(&folded)?;
        let key = slot.key_string(&folded);
        Some((key, slot.value))
    }

    /// Returns the rank of a folded key, or `None` if it is not present.
    pub(crate) fn rank_of(&self, folded: &[char]) -> Option<usize> {
        let has_empty = self.empty.is_some();
        if folded.is_empty() {
            return has_empty.then_some(0);
        }
        let mut rank = usize::from(has_empty);
        let mut link = &self.root;
        let mut index = 0;
        loop {
            let node = link.as_deref()?;
            match folded[index].cmp(&node.split) {
                Less => link = &node.lower,
                Greater => {
                    rank += size_of(&node.lower) + node.own() + size_of(&node.equal);
                    link = &node.higher;
                }
                Equal => {
                    rank += size_of(&node.lower);
                    index += 1;
                    if index == folded.len() {
                        return node.slot.is_some().then_some(rank);
                    }
                    rank += node.own();
                    link = &node.equal;
                }
            }
        }
    }

    /// Returns the number of keys strictly less than a folded key, present or not.
    pub(crate) fn rank_lower_bound(&self, folded: &[char]) -> usize {
        if folded.is_empty() {
            return 0;
        }
        let mut rank = usize::from(self.empty.is_some());
        let mut link = &self.root;
        let mut index = 0;
        while let Some(node) = link.as_deref() {
            match folded[index].cmp(&node.split) {
                Less => link = &node.lower,
                Greater => {
                    rank += size_of(&node.lower) + node.own() + size_of(&node.equal);
                    link = &node.higher;
                }
                Equal => {
                    rank += size_of(&node.lower);
                    index += 1;
                    if index == folded.len() {
                        break;
                    }
                    rank += node.own();
                    link = &node.equal;
                }
            }
        }
        rank
    }

    /// The rank range `[lo, hi)` covered by `bounds`.
    pub(crate) fn rank_range(&self, bounds: &Bounds) -> (usize, usize) {
        let lo = bounds.start().map_or(0, |start| self.rank_lower_bound(start));
        let hi = bounds.end().map_or_else(|| self.len(), |end| self.rank_lower_bound(end));
        (lo, hi.max(lo))
    }

    /// Every reported key within `max_distance` of a folded query.
    pub(crate) fn match_almost(&self, query: &[char], max_distance: usize, tolerance: usize) -> Vec<String> {
        fuzzy::match_almost(&self.root, self.empty.as_ref(), query, max_distance, tolerance)
    }
}

impl<V, N: KeyNormalizer> RawTstMap<V, N> {
    /// Inserts a key-value pair, returning the previous value for the key.
    pub(crate) fn insert(&mut self, key: &str, value: V) -> Option<V> {
        self.insert_folded(&fold_key::<N>(key), display_key::<N>(key), value).0
    }

    pub(crate) fn get(&self, key: &str) -> Option<&V> {
        self.slot(&fold_key::<N>(key)).map(|slot| &slot.value)
    }

    pub(crate) fn get_mut(&mut self, key: &str) -> Option<&mut V> {
        self.slot_mut(&fold_key::<N>(key)).map(|slot| &mut slot.value)
    }

    /// Removes a key, returning the reported key and value.
    pub(crate) fn remove_entry(&mut self, key: &str) -> Option<(String, V)> {
        let folded = fold_key::<N>(key);
        let slot = self.remove_slot(&folded)?;
        let key = slot.key.map_or_else(|| String::from(key), String::from);
        Some((key, slot.value))
    }
}

impl<V: Clone, N> Clone for RawTstMap<V, N> {
    fn clone(&self) -> Self {
        RawTstMap {
            root: clone_link(&self.root),
            empty: self.empty.clone(),
            _normalizer: PhantomData,
        }
    }
}

impl<V, N> Drop for RawTstMap<V, N> {
    fn drop(&mut self) {
        // Dismantle iteratively so long key chains cannot overflow the stack.
        self.clear();
    }
}
