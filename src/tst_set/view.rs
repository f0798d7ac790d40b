use alloc::string::String;
use core::fmt;

use super::{Cursor, Iter, TstSet};
use crate::error::Result;
use crate::normalize::{Exact, KeyNormalizer};
use crate::tst_map::{SubMap, SubMapMut};

/// A read-only view of the members of a `TstSet` that lie in a half-open range.
///
/// # Examples
///
/// ```
/// use tst_tree::TstSet;
///
/// let set = TstSet::from(["ant", "bee", "cat", "dog"]);
/// let view = set.sub_set("b", "d")?;
/// assert_eq!(view.iter().collect::<Vec<_>>(), ["bee", "cat"]);
/// assert!(!view.contains("ant"));
/// # Ok::<(), tst_tree::Error>(())
/// ```
pub struct SubSet<'a, N = Exact> {
    inner: SubMap<'a, (), N>,
}

/// A mutable view of the members of a `TstSet` that lie in a half-open range.
pub struct SubSetMut<'a, N = Exact> {
    inner: SubMapMut<'a, (), N>,
}

impl<N: KeyNormalizer> TstSet<N> {
    /// Returns a view of the members strictly less than `to`.
    pub fn head_set(&self, to: &str) -> SubSet<'_, N> {
        SubSet::new(self.map.head_map(to))
    }

    /// Returns a view of the members greater than or equal to `from`.
    pub fn tail_set(&self, from: &str) -> SubSet<'_, N> {
        SubSet::new(self.map.tail_map(from))
    }

    /// Returns a view of the members in `[from, to)`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`](crate::Error::InvalidArgument) if `from > to`.
    pub fn sub_set(&self, from: &str, to: &str) -> Result<SubSet<'_, N>> {
        self.map.sub_map(from, to).map(SubSet::new)
    }

    /// Returns a mutable view of the members strictly less than `to`.
    pub fn head_set_mut(&mut self, to: &str) -> SubSetMut<'_, N> {
        SubSetMut::new(self.map.head_map_mut(to))
    }

    /// Returns a mutable view of the members greater than or equal to `from`.
    pub fn tail_set_mut(&mut self, from: &str) -> SubSetMut<'_, N> {
        SubSetMut::new(self.map.tail_map_mut(from))
    }

    /// Returns a mutable view of the members in `[from, to)`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`](crate::Error::InvalidArgument) if `from > to`.
    pub fn sub_set_mut(&mut self, from: &str, to: &str) -> Result<SubSetMut<'_, N>> {
        self.map.sub_map_mut(from, to).map(SubSetMut::new)
    }

    /// Returns a mutable view of the members starting with `prefix`.
    ///
    /// # Examples
    ///
    /// ```
    /// use tst_tree::TstSet;
    ///
    /// let mut set = TstSet::from(["car", "cart", "cat"]);
    /// set.prefix_match_mut("car").clear();
    /// assert_eq!(set.iter().collect::<Vec<_>>(), ["cat"]);
    /// ```
    pub fn prefix_match_mut(&mut self, prefix: &str) -> SubSetMut<'_, N> {
        SubSetMut::new(self.map.prefix_match_mut(prefix))
    }
}

impl<'a, N> SubSet<'a, N> {
    pub(crate) fn new(inner: SubMap<'a, (), N>) -> Self {
        SubSet { inner }
    }

    /// Returns the number of members in the view.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Returns `true` if the view contains no members.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Gets an iterator over the members of the view, in order.
    pub fn iter(&self) -> Iter<'a> {
        Iter::new(self.inner.iter())
    }

    /// Returns the smallest member of the view.
    #[must_use]
    pub fn first(&self) -> Option<String> {
        self.inner.first_key()
    }

    /// Returns the largest member of the view.
    #[must_use]
    pub fn last(&self) -> Option<String> {
        self.inner.last_key()
    }

    /// Returns the member at position `index` within the view.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfRange`](crate::Error::IndexOutOfRange) unless
    /// `index < len()`.
    pub fn key_at(&self, index: usize) -> Result<String> {
        self.inner.key_at(index)
    }
}

impl<'a, N: KeyNormalizer> SubSet<'a, N> {
    /// Returns `true` if `value` is in range and a member.
    #[must_use]
    pub fn contains(&self, value: &str) -> bool {
        self.inner.contains_key(value)
    }

    /// Returns the rank of `value` within the view.
    #[must_use]
    pub fn index_of(&self, value: &str) -> Option<usize> {
        self.inner.index_of(value)
    }

    /// Narrows the view to the members strictly less than `to`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::KeyOutOfRange`](crate::Error::KeyOutOfRange) if `to` lies outside
    /// the view.
    pub fn head_set(&self, to: &str) -> Result<SubSet<'a, N>> {
        self.inner.head_map(to).map(SubSet::new)
    }

    /// Narrows the view to the members greater than or equal to `from`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::KeyOutOfRange`](crate::Error::KeyOutOfRange) if `from` lies
    /// outside the view.
    pub fn tail_set(&self, from: &str) -> Result<SubSet<'a, N>> {
        self.inner.tail_map(from).map(SubSet::new)
    }

    /// Narrows the view to the members in `[from, to)`.
    ///
    /// # Errors
    ///
    /// Fails like [`SubMap::sub_map`].
    pub fn sub_set(&self, from: &str, to: &str) -> Result<SubSet<'a, N>> {
        self.inner.sub_map(from, to).map(SubSet::new)
    }
}

impl<N> Clone for SubSet<'_, N> {
    fn clone(&self) -> Self {
        SubSet {
            inner: self.inner.clone(),
        }
    }
}

impl<N> fmt::Debug for SubSet<'_, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<'a, N> IntoIterator for &SubSet<'a, N> {
    type Item = String;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Iter<'a> {
        self.iter()
    }
}

impl<'a, N> SubSetMut<'a, N> {
    pub(crate) fn new(inner: SubMapMut<'a, (), N>) -> Self {
        SubSetMut { inner }
    }

    /// Returns a read-only view of the same range.
    pub fn as_sub_set(&self) -> SubSet<'_, N> {
        SubSet::new(self.inner.as_sub_map())
    }

    /// Returns the number of members in the view.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Returns `true` if the view contains no members.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Gets an iterator over the members of the view, in order.
    pub fn iter(&self) -> Iter<'_> {
        Iter::new(self.inner.iter())
    }

    /// Returns a cursor over the members of the view.
    pub fn cursor(&mut self) -> Cursor<'_, N> {
        Cursor::new(self.inner.cursor())
    }

    /// Removes every member in the view.
    pub fn clear(&mut self) {
        self.inner.clear();
    }

    /// Retains only the members of the view specified by the predicate.
    pub fn retain<F>(&mut self, mut f: F)
    where
        F: FnMut(&str) -> bool,
    {
        self.inner.retain(|key, _| f(key));
    }
}

impl<'a, N: KeyNormalizer> SubSetMut<'a, N> {
    /// Returns `true` if `value` is in range and a member.
    #[must_use]
    pub fn contains(&self, value: &str) -> bool {
        self.inner.contains_key(value)
    }

    /// Adds a member through the view. Returns whether it was newly inserted.
    ///
    /// # Errors
    ///
    /// Returns [`Error::KeyOutOfRange`](crate::Error::KeyOutOfRange) if `value` lies
    /// outside the view.
    ///
    /// # Examples
    ///
    /// ```
    /// use tst_tree::TstSet;
    ///
    /// let mut set = TstSet::from(["m"]);
    /// let mut view = set.head_set_mut("n");
    /// assert_eq!(view.insert("a"), Ok(true));
    /// assert!(view.insert("z").is_err());
    /// ```
    pub fn insert(&mut self, value: &str) -> Result<bool> {
        Ok(self.inner.insert(value, ())?.is_none())
    }

    /// Removes a member through the view. Returns whether it was present and in range.
    pub fn remove(&mut self, value: &str) -> bool {
        self.inner.remove(value).is_some()
    }

    /// Removes every listed member that lies in the view.
    pub fn remove_all<I>(&mut self, values: I) -> bool
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        self.inner.remove_all(values)
    }

    /// Removes every member of the view that is not listed.
    pub fn retain_all<I>(&mut self, values: I) -> bool
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        self.inner.retain_all(values)
    }

    /// Narrows the view to the members strictly less than `to`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::KeyOutOfRange`](crate::Error::KeyOutOfRange) if `to` lies outside
    /// the view.
    pub fn head_set_mut(&mut self, to: &str) -> Result<SubSetMut<'_, N>> {
        self.inner.head_map_mut(to).map(SubSetMut::new)
    }

    /// Narrows the view to the members greater than or equal to `from`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::KeyOutOfRange`](crate::Error::KeyOutOfRange) if `from` lies
    /// outside the view.
    pub fn tail_set_mut(&mut self, from: &str) -> Result<SubSetMut<'_, N>> {
        self.inner.tail_map_mut(from).map(SubSetMut::new)
    }

    /// Narrows the view to the members in `[from, to)`.
    ///
    /// # Errors
    ///
    /// Fails like [`SubMapMut::sub_map_mut`].
    pub fn sub_set_mut(&mut self, from: &str, to: &str) -> Result<SubSetMut<'_, N>> {
        self.inner.sub_map_mut(from, to).map(SubSetMut::new)
    }
}

impl<N> fmt::Debug for SubSetMut<'_, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::Error;
    use alloc::vec;
    use alloc::vec::Vec;

    #[test]
    fn set_views_follow_the_map() {
        let mut set = TstSet::from(["ant", "bee", "cat", "dog", "eel"]);
        let view = set.tail_set("c");
        assert_eq!(view.len(), 3);
        assert_eq!(view.first().as_deref(), Some("cat"));
        assert_eq!(view.index_of("eel"), Some(2));
        assert!(matches!(view.head_set("a"), Err(Error::KeyOutOfRange { .. })));

        let mut view = set.sub_set_mut("b", "e").unwrap();
        assert!(matches!(view.insert("fox"), Err(Error::KeyOutOfRange { .. })));
        assert!(view.retain_all(["cat"]));
        assert_eq!(set.iter().collect::<Vec<_>>(), vec!["ant", "cat", "eel"]);
    }

    #[test]
    fn set_view_cursor_removes_in_range() {
        let mut set = TstSet::from(["a", "b", "c"]);
        let mut view = set.head_set_mut("c");
        let mut cursor = view.cursor();
        while cursor.try_next().is_ok() {
            cursor.remove().unwrap();
        }
        assert_eq!(set.iter().collect::<Vec<_>>(), vec!["c"]);
    }
}
