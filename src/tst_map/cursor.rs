use alloc::string::String;
use core::fmt;

use super::TstMap;
use crate::error::{Error, Result};
use crate::normalize::{Exact, KeyNormalizer, fold_key};
use crate::raw::{Bounds, RawTstMap};

/// A forward cursor over the entries of a `TstMap` (or a bounded view of one) that can
/// remove the entry it last returned.
///
/// The cursor tracks its position by rank, so removing through it never invalidates it.
/// Unlike an [`Iterator`], stepping past the end is reported as an error.
///
/// # Examples
///
/// ```
/// use tst_tree::{Error, TstMap};
///
/// let mut map = TstMap::from([("a", 1), ("b", 2), ("c", 3)]);
/// let mut cursor = map.cursor();
/// while cursor.has_next() {
///     let (_, value) = cursor.try_next()?;
///     if *value % 2 == 1 {
///         cursor.remove()?;
///     }
/// }
/// assert_eq!(cursor.try_next(), Err(Error::Exhausted));
/// assert_eq!(map.keys().collect::<Vec<_>>(), ["b"]);
/// # Ok::<(), Error>(())
/// ```
pub struct Cursor<'a, V, N = Exact> {
    tree: &'a mut RawTstMap<V, N>,
    bounds: Bounds,
    /// Rank of the entry `try_next` returns next.
    next: usize,
    /// Rank of the entry last returned, until it is removed.
    current: Option<usize>,
}

impl<'a, V, N> Cursor<'a, V, N> {
    pub(crate) fn new(tree: &'a mut RawTstMap<V, N>, bounds: Bounds) -> Self {
        let (next, _) = tree.rank_range(&bounds);
        Cursor {
            tree,
            bounds,
            next,
            current: None,
        }
    }

    /// Returns `true` if [`try_next`](Self::try_next) would return an entry.
    ///
    /// Never moves the cursor.
    #[must_use]
    pub fn has_next(&self) -> bool {
        let (_, end) = self.tree.rank_range(&self.bounds);
        self.next < end
    }

    /// Returns the key `try_next` would return, without moving the cursor.
    #[must_use]
    pub fn peek_key(&self) -> Option<String> {
        if !self.has_next() {
            return None;
        }
        self.tree.entry_at(self.next).map(|(key, _)| key)
    }

    /// Advances to the next entry and returns it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Exhausted`] when every entry in range has been returned.
    pub fn try_next(&mut self) -> Result<(String, &mut V)> {
        if !self.has_next() {
            tracing::debug!(rank = self.next, "cursor advanced past its last entry");
            return Err(Error::Exhausted);
        }
        let rank = self.next;
        let (path, slot) = self.tree.get_by_rank_mut(rank).ok_or(Error::Exhausted)?;
        self.next += 1;
        self.current = Some(rank);
        Ok((slot.key_string(&path), &mut slot.value))
    }

    /// Removes the entry most recently returned by [`try_next`](Self::try_next) from the
    /// map and returns it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IteratorMisuse`] if `try_next` has not been called yet, or if the
    /// current entry was already removed.
    pub fn remove(&mut self) -> Result<(String, V)> {
        let Some(rank) = self.current.take() else {
            tracing::debug!(rank = self.next, "cursor removal without a current entry");
            return Err(Error::IteratorMisuse);
        };
        let entry = self.tree.remove_at(rank).ok_or(Error::IteratorMisuse)?;
        self.next -= 1;
        Ok(entry)
    }
}

impl<V, N> fmt::Debug for Cursor<'_, V, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cursor").field("next", &self.next).field("current", &self.current).finish()
    }
}

impl<V, N> TstMap<V, N> {
    /// Returns a cursor positioned before the smallest key.
    pub fn cursor(&mut self) -> Cursor<'_, V, N> {
        Cursor::new(&mut self.raw, Bounds::full())
    }
}

impl<V, N: KeyNormalizer> TstMap<V, N> {
    /// Returns a cursor over the keys starting with `prefix`.
    ///
    /// # Examples
    ///
    /// ```
    /// use tst_tree::TstMap;
    ///
    /// let mut map = TstMap::from([("tea", 1), ("ten", 2), ("to", 3)]);
    /// let mut cursor = map.prefix_cursor("te");
    /// while cursor.try_next().is_ok() {
    ///     cursor.remove().unwrap();
    /// }
    /// assert_eq!(map.keys().collect::<Vec<_>>(), ["to"]);
    /// ```
    pub fn prefix_cursor(&mut self, prefix: &str) -> Cursor<'_, V, N> {
        Cursor::new(&mut self.raw, Bounds::prefix(fold_key::<N>(prefix)))
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use alloc::vec::Vec;
    use proptest::prelude::*;

    #[test]
    fn remove_before_next_is_misuse() {
        let mut map = TstMap::from([("a", 1)]);
        let mut cursor = map.cursor();
        assert_eq!(cursor.remove(), Err(Error::IteratorMisuse));
    }

    #[test]
    fn remove_twice_is_misuse() {
        let mut map = TstMap::from([("a", 1), ("b", 2)]);
        let mut cursor = map.cursor();
        cursor.try_next().unwrap();
        assert_eq!(cursor.remove(), Ok((String::from("a"), 1)));
        assert_eq!(cursor.remove(), Err(Error::IteratorMisuse));
        assert_eq!(cursor.peek_key().as_deref(), Some("b"));
    }

    #[test]
    fn next_past_end_is_exhausted() {
        let mut map: TstMap<i32> = TstMap::new();
        let mut cursor = map.cursor();
        assert!(!cursor.has_next());
        assert_eq!(cursor.peek_key(), None);
        assert_eq!(cursor.try_next(), Err(Error::Exhausted));
    }

    #[test]
    fn has_next_does_not_advance() {
        let mut map = TstMap::from([("a", 1)]);
        let mut cursor = map.cursor();
        assert!(cursor.has_next());
        assert!(cursor.has_next());
        assert_eq!(cursor.try_next(), Ok((String::from("a"), &mut 1)));
        assert!(!cursor.has_next());
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn removing_every_entry_empties_the_map(keys in prop::collection::btree_set("[a-c]{0,4}", 0..60)) {
            let mut map: TstMap<usize> = keys.iter().map(|k| (k.as_str(), k.len())).collect();
            let mut removed = Vec::new();
            let mut cursor = map.cursor();
            while cursor.has_next() {
                cursor.try_next().unwrap();
                removed.push(cursor.remove().unwrap().0);
            }
            prop_assert!(map.is_empty());
            map.raw.validate_invariants();
            prop_assert_eq!(removed, keys.into_iter().collect::<Vec<_>>());
        }
    }
}
