use alloc::string::String;
use core::fmt;

use super::{Cursor, Iter, IterMut, Keys, TstMap, Values, ValuesMut};
use crate::TstSet;
use crate::error::{Error, Result};
use crate::normalize::{Exact, KeyNormalizer, display_key, fold_key};
use crate::raw::{Bounds, RawTstMap};

/// A read-only view of the entries of a `TstMap` whose keys lie in a half-open range
/// `[from, to)`. Either end may be open.
///
/// Created by [`TstMap::head_map`], [`TstMap::tail_map`], [`TstMap::sub_map`] and
/// [`TstMap::prefix_match`]. Views can be narrowed further but never widened.
///
/// # Examples
///
/// ```
/// use tst_tree::TstMap;
///
/// let map = TstMap::from([("apple", 1), ("banana", 2), ("cherry", 3), ("date", 4)]);
/// let view = map.sub_map("b", "d")?;
/// assert_eq!(view.len(), 2);
/// assert_eq!(view.keys().collect::<Vec<_>>(), ["banana", "cherry"]);
/// assert_eq!(view.get("apple"), None);
/// assert!(view.head_map("e").is_err());
/// # Ok::<(), tst_tree::Error>(())
/// ```
pub struct SubMap<'a, V, N = Exact> {
    tree: &'a RawTstMap<V, N>,
    bounds: Bounds,
}

/// A mutable view of the entries of a `TstMap` whose keys lie in a half-open range.
///
/// Writes are checked against the range: inserting a key outside it fails with
/// [`Error::KeyOutOfRange`] and leaves the map unchanged.
///
/// # Examples
///
/// ```
/// use tst_tree::{Error, TstMap};
///
/// let mut map = TstMap::from([("a", 1), ("m", 2), ("z", 3)]);
/// let mut view = map.sub_map_mut("b", "y")?;
/// assert_eq!(view.insert("k", 10), Ok(None));
/// assert!(matches!(view.insert("z", 0), Err(Error::KeyOutOfRange { .. })));
/// view.clear();
/// assert_eq!(map.keys().collect::<Vec<_>>(), ["a", "z"]);
/// # Ok::<(), Error>(())
/// ```
pub struct SubMapMut<'a, V, N = Exact> {
    tree: &'a mut RawTstMap<V, N>,
    bounds: Bounds,
}

impl<V, N> TstMap<V, N> {
    /// Returns a read-only view of the whole map.
    pub fn as_sub_map(&self) -> SubMap<'_, V, N> {
        SubMap::new(&self.raw, Bounds::full())
    }
}

impl<V, N: KeyNormalizer> TstMap<V, N> {
    /// Returns a view of the entries whose keys are strictly less than `to`.
    ///
    /// # Examples
    ///
    /// ```
    /// use tst_tree::TstMap;
    ///
    /// let map = TstMap::from([("a", 1), ("b", 2), ("c", 3)]);
    /// assert_eq!(map.head_map("b").keys().collect::<Vec<_>>(), ["a"]);
    /// ```
    pub fn head_map(&self, to: &str) -> SubMap<'_, V, N> {
        SubMap::new(&self.raw, Bounds::below(fold_key::<N>(to)))
    }

    /// Returns a view of the entries whose keys are greater than or equal to `from`.
    ///
    /// # Examples
    ///
    /// ```
    /// use tst_tree::TstMap;
    ///
    /// let map = TstMap::from([("a", 1), ("b", 2), ("c", 3)]);
    /// assert_eq!(map.tail_map("b").keys().collect::<Vec<_>>(), ["b", "c"]);
    /// ```
    pub fn tail_map(&self, from: &str) -> SubMap<'_, V, N> {
        SubMap::new(&self.raw, Bounds::at_or_above(fold_key::<N>(from)))
    }

    /// Returns a view of the entries whose keys lie in `[from, to)`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if `from > to`.
    pub fn sub_map(&self, from: &str, to: &str) -> Result<SubMap<'_, V, N>> {
        Ok(SubMap::new(&self.raw, Bounds::full().sub::<N>(from, to)?))
    }

    /// Returns a mutable view of the entries whose keys are strictly less than `to`.
    pub fn head_map_mut(&mut self, to: &str) -> SubMapMut<'_, V, N> {
        SubMapMut::new(&mut self.raw, Bounds::below(fold_key::<N>(to)))
    }

    /// Returns a mutable view of the entries whose keys are greater than or equal to `from`.
    pub fn tail_map_mut(&mut self, from: &str) -> SubMapMut<'_, V, N> {
        SubMapMut::new(&mut self.raw, Bounds::at_or_above(fold_key::<N>(from)))
    }

    /// Returns a mutable view of the entries whose keys lie in `[from, to)`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if `from > to`.
    pub fn sub_map_mut(&mut self, from: &str, to: &str) -> Result<SubMapMut<'_, V, N>> {
        let bounds = Bounds::full().sub::<N>(from, to)?;
        Ok(SubMapMut::new(&mut self.raw, bounds))
    }

    /// Returns a mutable view of the entries whose keys start with `prefix`.
    pub fn prefix_match_mut(&mut self, prefix: &str) -> SubMapMut<'_, V, N> {
        SubMapMut::new(&mut self.raw, Bounds::prefix(fold_key::<N>(prefix)))
    }
}

impl<'a, V, N> SubMap<'a, V, N> {
    pub(crate) fn new(tree: &'a RawTstMap<V, N>, bounds: Bounds) -> Self {
        SubMap { tree, bounds }
    }

    fn ranks(&self) -> (usize, usize) {
        self.tree.rank_range(&self.bounds)
    }

    /// Returns the number of entries in the view.
    ///
    /// # Complexity
    ///
    /// O(depth + bound length)
    #[must_use]
    pub fn len(&self) -> usize {
        let (lo, hi) = self.ranks();
        hi - lo
    }

    /// Returns `true` if the view contains no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Gets an iterator over the entries of the view, sorted by key.
    pub fn iter(&self) -> Iter<'a, V> {
        Iter::new(self.tree.traverse(self.bounds.clone()), self.len())
    }

    /// Gets an iterator over the keys of the view, in sorted order.
    pub fn keys(&self) -> Keys<'a, V> {
        Keys { inner: self.iter() }
    }

    /// Gets an iterator over the values of the view, in order by key.
    pub fn values(&self) -> Values<'a, V> {
        Values { inner: self.iter() }
    }

    /// Returns the entry at position `rank` within the view.
    #[must_use]
    pub fn get_by_rank(&self, rank: usize) -> Option<(String, &'a V)> {
        let (lo, hi) = self.ranks();
        let rank = lo.checked_add(rank).filter(|rank| *rank < hi)?;
        self.tree.entry_at(rank)
    }

    /// Returns the key at position `index` within the view.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfRange`] unless `index < len()`.
    pub fn key_at(&self, index: usize) -> Result<String> {
        self.get_by_rank(index)
            .map(|(key, _)| key)
            .ok_or_else(|| Error::index_out_of_range(index, self.len()))
    }

    /// Returns the value at position `index` within the view.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfRange`] unless `index < len()`.
    pub fn value_at(&self, index: usize) -> Result<&'a V> {
        self.get_by_rank(index)
            .map(|(_, value)| value)
            .ok_or_else(|| Error::index_out_of_range(index, self.len()))
    }

    /// Returns the first entry in the view.
    #[must_use]
    pub fn first_key_value(&self) -> Option<(String, &'a V)> {
        self.get_by_rank(0)
    }

    /// Returns the last entry in the view.
    #[must_use]
    pub fn last_key_value(&self) -> Option<(String, &'a V)> {
        self.get_by_rank(self.len().checked_sub(1)?)
    }

    /// Returns the smallest key in the view.
    #[must_use]
    pub fn first_key(&self) -> Option<String> {
        self.first_key_value().map(|(key, _)| key)
    }

    /// Returns the largest key in the view.
    #[must_use]
    pub fn last_key(&self) -> Option<String> {
        self.last_key_value().map(|(key, _)| key)
    }

    /// Returns `true` if some entry in the view holds a value equal to `value`.
    #[must_use]
    pub fn contains_value(&self, value: &V) -> bool
    where
        V: PartialEq,
    {
        self.values().any(|v| v == value)
    }
}

impl<'a, V, N: KeyNormalizer> SubMap<'a, V, N> {
    /// Returns a reference to the value corresponding to the key, if the key is in range.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&'a V> {
        let folded = fold_key::<N>(key);
        if !self.bounds.contains(&folded) {
            return None;
        }
        self.tree.slot(&folded).map(|slot| &slot.value)
    }

    /// Returns `true` if the view contains a value for the specified key.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Returns the rank of `key` within the view, or `None` if it is absent or out of range.
    #[must_use]
    pub fn index_of(&self, key: &str) -> Option<usize> {
        let folded = fold_key::<N>(key);
        if !self.bounds.contains(&folded) {
            return None;
        }
        let (lo, _) = self.ranks();
        Some(self.tree.rank_of(&folded)? - lo)
    }

    /// Narrows the view to the keys strictly less than `to`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::KeyOutOfRange`] if `to` lies outside the view.
    pub fn head_map(&self, to: &str) -> Result<SubMap<'a, V, N>> {
        Ok(SubMap::new(self.tree, self.bounds.head::<N>(to)?))
    }

    /// Narrows the view to the keys greater than or equal to `from`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::KeyOutOfRange`] if `from` lies outside the view.
    pub fn tail_map(&self, from: &str) -> Result<SubMap<'a, V, N>> {
        Ok(SubMap::new(self.tree, self.bounds.tail::<N>(from)?))
    }

    /// Narrows the view to the keys in `[from, to)`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if `from > to`, or [`Error::KeyOutOfRange`] if
    /// either bound lies outside the view.
    pub fn sub_map(&self, from: &str, to: &str) -> Result<SubMap<'a, V, N>> {
        Ok(SubMap::new(self.tree, self.bounds.sub::<N>(from, to)?))
    }
}

impl<V, N> Clone for SubMap<'_, V, N> {
    fn clone(&self) -> Self {
        SubMap {
            tree: self.tree,
            bounds: self.bounds.clone(),
        }
    }
}

impl<V: fmt::Debug, N> fmt::Debug for SubMap<'_, V, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<V: PartialEq, N> PartialEq for SubMap<'_, V, N> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<'a, V, N> IntoIterator for &SubMap<'a, V, N> {
    type Item = (String, &'a V);
    type IntoIter = Iter<'a, V>;

    fn into_iter(self) -> Iter<'a, V> {
        self.iter()
    }
}

impl<'a, V, N> IntoIterator for SubMap<'a, V, N> {
    type Item = (String, &'a V);
    type IntoIter = Iter<'a, V>;

    fn into_iter(self) -> Iter<'a, V> {
        self.iter()
    }
}

impl<'a, V, N> SubMapMut<'a, V, N> {
    pub(crate) fn new(tree: &'a mut RawTstMap<V, N>, bounds: Bounds) -> Self {
        SubMapMut { tree, bounds }
    }

    /// Returns a read-only view of the same range.
    pub fn as_sub_map(&self) -> SubMap<'_, V, N> {
        SubMap::new(&*self.tree, self.bounds.clone())
    }

    /// Returns the number of entries in the view.
    #[must_use]
    pub fn len(&self) -> usize {
        self.as_sub_map().len()
    }

    /// Returns `true` if the view contains no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Gets an iterator over the entries of the view, sorted by key.
    pub fn iter(&self) -> Iter<'_, V> {
        self.as_sub_map().iter()
    }

    /// Gets an iterator over the keys of the view, in sorted order.
    pub fn keys(&self) -> Keys<'_, V> {
        self.as_sub_map().keys()
    }

    /// Gets an iterator over the values of the view, in order by key.
    pub fn values(&self) -> Values<'_, V> {
        self.as_sub_map().values()
    }

    /// Gets a mutable iterator over the entries of the view, sorted by key.
    ///
    /// # Examples
    ///
    /// ```
    /// use tst_tree::TstMap;
    ///
    /// let mut map = TstMap::from([("a", 1), ("b", 2), ("c", 3)]);
    /// for (_, value) in map.tail_map_mut("b").iter_mut() {
    ///     *value = 0;
    /// }
    /// assert_eq!(map.values().copied().collect::<Vec<_>>(), [1, 0, 0]);
    /// ```
    pub fn iter_mut(&mut self) -> IterMut<'_, V> {
        let len = self.len();
        IterMut::new(self.tree.traverse_mut(self.bounds.clone()), len)
    }

    /// Gets a mutable iterator over the values of the view, in order by key.
    pub fn values_mut(&mut self) -> ValuesMut<'_, V> {
        ValuesMut { inner: self.iter_mut() }
    }

    /// Returns a cursor over the entries of the view.
    pub fn cursor(&mut self) -> Cursor<'_, V, N> {
        Cursor::new(self.tree, self.bounds.clone())
    }

    /// Removes every entry in the view.
    pub fn clear(&mut self) {
        let mut cursor = self.cursor();
        while cursor.try_next().is_ok() {
            let removed = cursor.remove();
            debug_assert!(removed.is_ok(), "removal right after try_next cannot fail");
        }
    }

    /// Retains only the entries of the view specified by the predicate. Entries outside the
    /// view are untouched.
    pub fn retain<F>(&mut self, mut f: F)
    where
        F: FnMut(&str, &mut V) -> bool,
    {
        let mut cursor = self.cursor();
        while let Ok((key, value)) = cursor.try_next() {
            if !f(&key, value) {
                let removed = cursor.remove();
                debug_assert!(removed.is_ok(), "removal right after try_next cannot fail");
            }
        }
    }
}

impl<'a, V, N: KeyNormalizer> SubMapMut<'a, V, N> {
    /// Returns a reference to the value corresponding to the key, if the key is in range.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&V> {
        let folded = fold_key::<N>(key);
        if !self.bounds.contains(&folded) {
            return None;
        }
        self.tree.slot(&folded).map(|slot| &slot.value)
    }

    /// Returns a mutable reference to the value corresponding to the key, if the key is in
    /// range.
    pub fn get_mut(&mut self, key: &str) -> Option<&mut V> {
        let folded = fold_key::<N>(key);
        if !self.bounds.contains(&folded) {
            return None;
        }
        self.tree.slot_mut(&folded).map(|slot| &mut slot.value)
    }

    /// Returns `true` if the view contains a value for the specified key.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Inserts a key-value pair through the view.
    ///
    /// # Errors
    ///
    /// Returns [`Error::KeyOutOfRange`] if `key` lies outside the view; the map is left
    /// unchanged.
    pub fn insert(&mut self, key: &str, value: V) -> Result<Option<V>> {
        let folded = fold_key::<N>(key);
        if !self.bounds.contains(&folded) {
            return Err(Error::key_out_of_range(key));
        }
        Ok(self.tree.insert_folded(&folded, display_key::<N>(key), value).0)
    }

    /// Removes a key through the view, returning its value. Keys outside the view are never
    /// removed.
    pub fn remove(&mut self, key: &str) -> Option<V> {
        let folded = fold_key::<N>(key);
        if !self.bounds.contains(&folded) {
            return None;
        }
        self.tree.remove_slot(&folded).map(|slot| slot.value)
    }

    /// Removes every listed key that lies in the view. Returns `true` if anything was
    /// removed.
    pub fn remove_all<I>(&mut self, keys: I) -> bool
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let mut changed = false;
        for key in keys {
            changed |= self.remove(key.as_ref()).is_some();
        }
        changed
    }

    /// Removes every entry of the view whose key is not listed. Returns `true` if anything
    /// was removed.
    ///
    /// # Examples
    ///
    /// ```
    /// use tst_tree::TstMap;
    ///
    /// let mut map = TstMap::from([("a", 1), ("b", 2), ("c", 3), ("d", 4)]);
    /// assert!(map.sub_map_mut("b", "d")?.retain_all(["c", "zzz"]));
    /// assert_eq!(map.keys().collect::<Vec<_>>(), ["a", "c", "d"]);
    /// # Ok::<(), tst_tree::Error>(())
    /// ```
    pub fn retain_all<I>(&mut self, keys: I) -> bool
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let keep: TstSet<N> = keys.into_iter().collect();
        let before = self.len();
        self.retain(|key, _| keep.contains(key));
        self.len() != before
    }

    /// Narrows the view to the keys strictly less than `to`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::KeyOutOfRange`] if `to` lies outside the view.
    pub fn head_map_mut(&mut self, to: &str) -> Result<SubMapMut<'_, V, N>> {
        let bounds = self.bounds.head::<N>(to)?;
        Ok(SubMapMut::new(self.tree, bounds))
    }

    /// Narrows the view to the keys greater than or equal to `from`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::KeyOutOfRange`] if `from` lies outside the view.
    pub fn tail_map_mut(&mut self, from: &str) -> Result<SubMapMut<'_, V, N>> {
        let bounds = self.bounds.tail::<N>(from)?;
        Ok(SubMapMut::new(self.tree, bounds))
    }

    /// Narrows the view to the keys in `[from, to)`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if `from > to`, or [`Error::KeyOutOfRange`] if
    /// either bound lies outside the view.
    pub fn sub_map_mut(&mut self, from: &str, to: &str) -> Result<SubMapMut<'_, V, N>> {
        let bounds = self.bounds.sub::<N>(from, to)?;
        Ok(SubMapMut::new(self.tree, bounds))
    }
}

impl<V: fmt::Debug, N> fmt::Debug for SubMapMut<'_, V, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<'a, V, N> IntoIterator for &'a SubMapMut<'_, V, N> {
    type Item = (String, &'a V);
    type IntoIter = Iter<'a, V>;

    fn into_iter(self) -> Iter<'a, V> {
        self.iter()
    }
}

impl<'a, V, N> IntoIterator for &'a mut SubMapMut<'_, V, N> {
    type Item = (String, &'a mut V);
    type IntoIter = IterMut<'a, V>;

    fn into_iter(self) -> IterMut<'a, V> {
        self.iter_mut()
    }
}
