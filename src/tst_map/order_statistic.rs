use alloc::string::String;
use core::ops::{Index, IndexMut};

use super::TstMap;
use crate::Rank;
use crate::error::{Error, Result};
use crate::normalize::{KeyNormalizer, fold_key};

impl<V, N> TstMap<V, N> {
    /// Returns the key-value pair at position `rank` in sorted order.
    ///
    /// The rank is zero-based. Returns `None` if `rank` is out of bounds.
    ///
    /// # Complexity
    ///
    /// O(depth + key length)
    ///
    /// # Examples
    ///
    /// ```
    /// use tst_tree::TstMap;
    ///
    /// let mut map = TstMap::new();
    /// map.insert("a", 10);
    /// map.insert("c", 30);
    /// map.insert("b", 20);
    ///
    /// assert_eq!(map.get_by_rank(1), Some((String::from("b"), &20)));
    /// assert!(map.get_by_rank(3).is_none());
    /// ```
    #[must_use]
    pub fn get_by_rank(&self, rank: usize) -> Option<(String, &V)> {
        self.raw.entry_at(rank)
    }

    /// Returns the key and a mutable reference to the value at position `rank` in sorted
    /// order.
    ///
    /// # Examples
    ///
    /// ```
    /// use tst_tree::TstMap;
    ///
    /// let mut map = TstMap::from([("ten", 10), ("five", 5)]);
    ///
    /// if let Some((key, value)) = map.get_by_rank_mut(0) {
    ///     assert_eq!(key, "five");
    ///     *value = 55;
    /// }
    ///
    /// assert_eq!(map.get("five"), Some(&55));
    /// ```
    #[must_use]
    pub fn get_by_rank_mut(&mut self, rank: usize) -> Option<(String, &mut V)> {
        let (path, slot) = self.raw.get_by_rank_mut(rank)?;
        Some((slot.key_string(&path), &mut slot.value))
    }

    /// Returns the key at position `index` in sorted order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfRange`] unless `index < len()`.
    ///
    /// # Examples
    ///
    /// ```
    /// use tst_tree::{Error, TstMap};
    ///
    /// let map = TstMap::from([("sverige", 1), ("deutschland", 2), ("england", 3)]);
    /// assert_eq!(map.key_at(1).as_deref(), Ok("england"));
    /// assert_eq!(map.key_at(3), Err(Error::IndexOutOfRange { index: 3, len: 3 }));
    /// ```
    pub fn key_at(&self, index: usize) -> Result<String> {
        self.get_by_rank(index)
            .map(|(key, _)| key)
            .ok_or_else(|| Error::index_out_of_range(index, self.len()))
    }

    /// Returns the value at position `index` in sorted order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfRange`] unless `index < len()`.
    pub fn value_at(&self, index: usize) -> Result<&V> {
        self.raw
            .get_by_rank(index)
            .map(|(_, slot)| &slot.value)
            .ok_or_else(|| Error::index_out_of_range(index, self.len()))
    }
}

impl<V, N: KeyNormalizer> TstMap<V, N> {
    /// Returns the zero-based rank of `key` in sorted order, or `None` if the key is not
    /// present.
    ///
    /// For every valid rank `i`, `index_of(&key_at(i)?) == Some(i)`.
    ///
    /// # Examples
    ///
    /// ```
    /// use tst_tree::TstMap;
    ///
    /// let map = TstMap::from([("a", 1), ("b", 2)]);
    /// assert_eq!(map.index_of("b"), Some(1));
    /// assert_eq!(map.index_of("ab"), None);
    /// ```
    #[must_use]
    pub fn index_of(&self, key: &str) -> Option<usize> {
        self.raw.rank_of(&fold_key::<N>(key))
    }
}

/// Indexes into the map by rank.
///
/// # Panics
///
/// Panics if `rank` is out of bounds.
///
/// # Examples
///
/// ```
/// use tst_tree::{Rank, TstMap};
///
/// let map = TstMap::from([("a", 1), ("b", 2)]);
/// assert_eq!(map[Rank(0)], 1);
/// ```
impl<V, N> Index<Rank> for TstMap<V, N> {
    type Output = V;

    fn index(&self, rank: Rank) -> &Self::Output {
        self.get_by_rank(rank.0).map(|(_, v)| v).expect("index out of bounds")
    }
}

/// Mutably indexes into the map by rank.
///
/// # Panics
///
/// Panics if `rank` is out of bounds.
///
/// # Examples
///
/// ```
/// use tst_tree::{Rank, TstMap};
///
/// let mut map = TstMap::from([("a", 1), ("b", 2)]);
/// map[Rank(1)] = 5;
/// assert_eq!(map.get("b"), Some(&5));
/// ```
impl<V, N> IndexMut<Rank> for TstMap<V, N> {
    fn index_mut(&mut self, rank: Rank) -> &mut Self::Output {
        self.get_by_rank_mut(rank.0).map(|(_, v)| v).expect("index out of bounds")
    }
}
