use alloc::string::String;

use super::TstSet;
use crate::error::Result;
use crate::normalize::KeyNormalizer;

impl<N> TstSet<N> {
    /// Returns the member at position `rank` in sorted order.
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
    /// use tst_tree::TstSet;
    ///
    /// let set = TstSet::from(["10", "20", "30"]);
    /// assert_eq!(set.get_by_rank(1).as_deref(), Some("20"));
    /// assert!(set.get_by_rank(3).is_none());
    /// ```
    #[must_use]
    pub fn get_by_rank(&self, rank: usize) -> Option<String> {
        self.map.get_by_rank(rank).map(|(key, _)| key)
    }

    /// Returns the member at position `index` in sorted order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfRange`](crate::Error::IndexOutOfRange) unless
    /// `index < len()`.
    pub fn key_at(&self, index: usize) -> Result<String> {
        self.map.key_at(index)
    }
}

impl<N: KeyNormalizer> TstSet<N> {
    /// Returns the zero-based rank of `value` in sorted order, or `None` if the value is
    /// not present.
    ///
    /// # Examples
    ///
    /// ```
    /// use tst_tree::TstSet;
    ///
    /// let set = TstSet::from(["10", "20"]);
    ///
    /// assert_eq!(set.index_of("20"), Some(1));
    /// assert_eq!(set.index_of("15"), None);
    /// ```
    #[must_use]
    pub fn index_of(&self, value: &str) -> Option<usize> {
        self.map.index_of(value)
    }
}
