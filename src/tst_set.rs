use alloc::string::String;
use core::any::Any;
use core::cmp::Ordering;
use core::fmt;
use core::hash::{Hash, Hasher};
use core::iter::FusedIterator;
use core::ops::{BitAnd, BitOr, BitXor, Sub};

use crate::error::Result;
use crate::normalize::{CaseInsensitive, Exact, KeyNormalizer};
use crate::tst_map::{self, IntoKeys, TstMap};

mod order_statistic;
mod view;

pub use view::{SubSet, SubSetMut};

/// An ordered set of strings based on a ternary search tree.
///
/// See [`TstMap`]'s documentation for a discussion of the structure. The set shares all of
/// the map's key handling: keys are folded through `N` for ordering and lookup, and
/// reported back in the spelling they were most recently inserted with.
///
/// # Examples
///
/// ```
/// use tst_tree::TstSet;
///
/// let mut books = TstSet::new();
///
/// // Add some books.
/// books.insert("A Dance With Dragons");
/// books.insert("To Kill a Mockingbird");
/// books.insert("The Odyssey");
/// books.insert("The Great Gatsby");
///
/// // Check for a specific one.
/// if !books.contains("The Winds of Winter") {
///     println!("We have {} books, but The Winds of Winter ain't one.", books.len());
/// }
///
/// // Remove a book.
/// books.remove("The Odyssey");
///
/// // Everything starting with "The".
/// assert_eq!(books.prefix_iter("The").collect::<Vec<_>>(), ["The Great Gatsby"]);
/// ```
pub struct TstSet<N = Exact> {
    map: TstMap<(), N>,
}

/// A [`TstSet`] whose members compare case-insensitively.
pub type CaseInsensitiveSet = TstSet<CaseInsensitive>;

/// An iterator over the members of a `TstSet` or one of its views, in order.
///
/// # Examples
///
/// ```
/// use tst_tree::TstSet;
///
/// let set = TstSet::from(["b", "a"]);
/// let mut iter = set.iter();
/// assert_eq!(iter.next().as_deref(), Some("a"));
/// assert_eq!(iter.len(), 1);
/// ```
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Iter<'a> {
    inner: tst_map::Iter<'a, ()>,
}

/// An owning iterator over the members of a `TstSet` in ascending order.
pub struct IntoIter {
    inner: IntoKeys<()>,
}

/// A forward cursor over the members of a `TstSet` that can remove the member it last
/// returned.
///
/// # Examples
///
/// ```
/// use tst_tree::TstSet;
///
/// let mut set = TstSet::from(["x", "xy", "y"]);
/// let mut cursor = set.cursor();
/// while let Ok(member) = cursor.try_next() {
///     if member.starts_with('x') {
///         cursor.remove()?;
///     }
/// }
/// assert_eq!(set.iter().collect::<Vec<_>>(), ["y"]);
/// # Ok::<(), tst_tree::Error>(())
/// ```
pub struct Cursor<'a, N = Exact> {
    inner: tst_map::Cursor<'a, (), N>,
}

impl<'a> Iter<'a> {
    pub(crate) fn new(inner: tst_map::Iter<'a, ()>) -> Self {
        Iter { inner }
    }
}

impl<'a, N> Cursor<'a, N> {
    pub(crate) fn new(inner: tst_map::Cursor<'a, (), N>) -> Self {
        Cursor { inner }
    }

    /// Returns `true` if [`try_next`](Self::try_next) would return a member.
    #[must_use]
    pub fn has_next(&self) -> bool {
        self.inner.has_next()
    }

    /// Returns the member `try_next` would return, without moving the cursor.
    #[must_use]
    pub fn peek(&self) -> Option<String> {
        self.inner.peek_key()
    }

    /// Advances to the next member and returns it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Exhausted`](crate::Error::Exhausted) past the last member.
    pub fn try_next(&mut self) -> Result<String> {
        self.inner.try_next().map(|(key, _)| key)
    }

    /// Removes the member most recently returned by [`try_next`](Self::try_next).
    ///
    /// # Errors
    ///
    /// Returns [`Error::IteratorMisuse`](crate::Error::IteratorMisuse) before the first
    /// `try_next`, or when called twice in a row.
    pub fn remove(&mut self) -> Result<String> {
        self.inner.remove().map(|(key, _)| key)
    }
}

impl<N> fmt::Debug for Cursor<'_, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Cursor").field(&self.inner).finish()
    }
}

impl TstSet {
    /// Makes a new, empty `TstSet` with exact comparison.
    ///
    /// Does not allocate anything on its own.
    #[must_use]
    pub const fn new() -> TstSet {
        TstSet { map: TstMap::new() }
    }
}

impl<N> TstSet<N> {
    /// Makes a new, empty set using the normalizer `N`.
    #[must_use]
    pub const fn with_normalizer() -> TstSet<N> {
        TstSet {
            map: TstMap::with_normalizer(),
        }
    }

    /// Returns the number of members in the set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Returns `true` if the set contains no members.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Clears the set, removing all members.
    pub fn clear(&mut self) {
        self.map.clear();
    }

    /// Gets an iterator that visits the members in ascending order.
    ///
    /// # Examples
    ///
    /// ```
    /// use tst_tree::TstSet;
    ///
    /// let set = TstSet::from(["c", "a", "b"]);
    /// assert_eq!(set.iter().collect::<Vec<_>>(), ["a", "b", "c"]);
    /// ```
    pub fn iter(&self) -> Iter<'_> {
        Iter::new(self.map.iter())
    }

    /// Returns the smallest member.
    #[must_use]
    pub fn first(&self) -> Option<String> {
        self.map.first_key()
    }

    /// Returns the largest member.
    #[must_use]
    pub fn last(&self) -> Option<String> {
        self.map.last_key()
    }

    /// Removes and returns the smallest member.
    ///
    /// # Examples
    ///
    /// ```
    /// use tst_tree::TstSet;
    ///
    /// let mut set = TstSet::from(["b", "a"]);
    /// assert_eq!(set.pop_first().as_deref(), Some("a"));
    /// assert_eq!(set.len(), 1);
    /// ```
    pub fn pop_first(&mut self) -> Option<String> {
        self.map.pop_first().map(|(key, _)| key)
    }

    /// Removes and returns the largest member.
    pub fn pop_last(&mut self) -> Option<String> {
        self.map.pop_last().map(|(key, _)| key)
    }

    /// Returns a cursor positioned before the smallest member.
    pub fn cursor(&mut self) -> Cursor<'_, N> {
        Cursor::new(self.map.cursor())
    }
}

impl<N: KeyNormalizer> TstSet<N> {
    /// Adds a member to the set.
    ///
    /// Returns whether the member was newly inserted. Under a folding normalizer an
    /// existing member takes the new spelling either way.
    ///
    /// # Examples
    ///
    /// ```
    /// use tst_tree::TstSet;
    ///
    /// let mut set = TstSet::new();
    /// assert!(set.insert("a"));
    /// assert!(!set.insert("a"));
    /// ```
    pub fn insert(&mut self, value: &str) -> bool {
        self.map.insert(value, ()).is_none()
    }

    /// Returns `true` if the set contains `value`.
    #[must_use]
    pub fn contains(&self, value: &str) -> bool {
        self.map.contains_key(value)
    }

    /// Checks a dynamically typed value for membership.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IncomparableKey`](crate::Error::IncomparableKey) unless `value` is one
    /// of the string types accepted by [`TstMap::get_any`].
    pub fn contains_any(&self, value: &dyn Any) -> Result<bool> {
        self.map.contains_key_any(value)
    }

    /// Removes a member from the set. Returns whether it was present.
    pub fn remove(&mut self, value: &str) -> bool {
        self.map.remove(value).is_some()
    }

    /// Removes and returns the stored spelling of `value`, if present.
    ///
    /// # Examples
    ///
    /// ```
    /// use tst_tree::CaseInsensitiveSet;
    ///
    /// let mut set = CaseInsensitiveSet::default();
    /// set.insert("Rust");
    /// assert_eq!(set.take("RUST").as_deref(), Some("Rust"));
    /// assert!(set.is_empty());
    /// ```
    pub fn take(&mut self, value: &str) -> Option<String> {
        self.map.remove_entry(value).map(|(key, _)| key)
    }

    /// Returns the largest member strictly less than `value`.
    #[must_use]
    pub fn predecessor(&self, value: &str) -> Option<String> {
        self.map.predecessor(value)
    }

    /// Returns the smallest member strictly greater than `value`.
    #[must_use]
    pub fn successor(&self, value: &str) -> Option<String> {
        self.map.successor(value)
    }

    /// Retains only the members specified by the predicate.
    pub fn retain<F>(&mut self, mut f: F)
    where
        F: FnMut(&str) -> bool,
    {
        self.map.retain(|key, _| f(key));
    }

    /// Gets an iterator over the members starting with `prefix`, in order.
    pub fn prefix_iter(&self, prefix: &str) -> Iter<'_> {
        Iter::new(self.map.prefix_iter(prefix))
    }

    /// Gets an iterator over the members not starting with `prefix`, in order.
    pub fn prefix_iter_excluding(&self, prefix: &str) -> Iter<'_> {
        Iter::new(self.map.prefix_iter_excluding(prefix))
    }

    /// Returns a view of the members starting with `prefix`.
    pub fn prefix_match(&self, prefix: &str) -> SubSet<'_, N> {
        SubSet::new(self.map.prefix_match(prefix))
    }

    /// Returns the members within `max_distance` of `query`. See
    /// [`TstMap::match_almost`] for the matching rules.
    #[must_use]
    pub fn match_almost(&self, query: &str, max_distance: usize, length_tolerance: usize) -> TstSet<N> {
        self.map.match_almost(query, max_distance, length_tolerance)
    }

    /// Returns a cursor over the members starting with `prefix`.
    pub fn prefix_cursor(&mut self, prefix: &str) -> Cursor<'_, N> {
        Cursor::new(self.map.prefix_cursor(prefix))
    }

    /// Returns `true` if `self` has no members in common with `other`.
    ///
    /// # Examples
    ///
    /// ```
    /// use tst_tree::TstSet;
    ///
    /// let a = TstSet::from(["1", "2", "3"]);
    /// let mut b = TstSet::new();
    /// b.insert("4");
    ///
    /// assert!(a.is_disjoint(&b));
    /// b.insert("1");
    /// assert!(!a.is_disjoint(&b));
    /// ```
    #[must_use]
    pub fn is_disjoint(&self, other: &TstSet<N>) -> bool {
        if self.len() <= other.len() {
            self.iter().all(|v| !other.contains(&v))
        } else {
            other.iter().all(|v| !self.contains(&v))
        }
    }

    /// Returns `true` if `other` contains every member of `self`.
    #[must_use]
    pub fn is_subset(&self, other: &TstSet<N>) -> bool {
        self.len() <= other.len() && self.iter().all(|v| other.contains(&v))
    }

    /// Returns `true` if `self` contains every member of `other`.
    #[must_use]
    pub fn is_superset(&self, other: &TstSet<N>) -> bool {
        other.is_subset(self)
    }
}

impl<N> Hash for TstSet<N> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.map.hash(state);
    }
}

impl<N> PartialEq for TstSet<N> {
    fn eq(&self, other: &TstSet<N>) -> bool {
        self.map == other.map
    }
}

impl<N> Eq for TstSet<N> {}

impl<N> PartialOrd for TstSet<N> {
    fn partial_cmp(&self, other: &TstSet<N>) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<N> Ord for TstSet<N> {
    fn cmp(&self, other: &TstSet<N>) -> Ordering {
        self.map.cmp(&other.map)
    }
}

impl<N> Clone for TstSet<N> {
    fn clone(&self) -> Self {
        TstSet { map: self.map.clone() }
    }
}

impl<N> fmt::Debug for TstSet<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<N> Default for TstSet<N> {
    fn default() -> Self {
        TstSet::with_normalizer()
    }
}

impl<K: AsRef<str>, N: KeyNormalizer> FromIterator<K> for TstSet<N> {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        let mut set = TstSet::with_normalizer();
        set.extend(iter);
        set
    }
}

impl<K: AsRef<str>, N: KeyNormalizer> Extend<K> for TstSet<N> {
    fn extend<I: IntoIterator<Item = K>>(&mut self, iter: I) {
        for value in iter {
            self.insert(value.as_ref());
        }
    }
}

impl<K: AsRef<str>, const M: usize> From<[K; M]> for TstSet {
    /// Converts a `[K; M]` into a `TstSet`.
    fn from(arr: [K; M]) -> Self {
        arr.into_iter().collect()
    }
}

impl<N: KeyNormalizer> Sub<&TstSet<N>> for &TstSet<N> {
    type Output = TstSet<N>;

    /// Returns the members of `self` that are not in `rhs`.
    ///
    /// # Examples
    ///
    /// ```
    /// use tst_tree::TstSet;
    ///
    /// let a = TstSet::from(["1", "2", "3"]);
    /// let b = TstSet::from(["3", "4", "5"]);
    /// assert_eq!((&a - &b).iter().collect::<Vec<_>>(), ["1", "2"]);
    /// ```
    fn sub(self, rhs: &TstSet<N>) -> TstSet<N> {
        self.iter().filter(|v| !rhs.contains(v)).collect()
    }
}

impl<N: KeyNormalizer> BitXor<&TstSet<N>> for &TstSet<N> {
    type Output = TstSet<N>;

    /// Returns the members in exactly one of `self` and `rhs`.
    fn bitxor(self, rhs: &TstSet<N>) -> TstSet<N> {
        let mut result: TstSet<N> = self - rhs;
        result.extend(rhs.iter().filter(|v| !self.contains(v)));
        result
    }
}

impl<N: KeyNormalizer> BitAnd<&TstSet<N>> for &TstSet<N> {
    type Output = TstSet<N>;

    /// Returns the members of `self` that are also in `rhs`.
    fn bitand(self, rhs: &TstSet<N>) -> TstSet<N> {
        self.iter().filter(|v| rhs.contains(v)).collect()
    }
}

impl<N: KeyNormalizer> BitOr<&TstSet<N>> for &TstSet<N> {
    type Output = TstSet<N>;

    /// Returns the members in `self` or `rhs`. Spellings from `rhs` win.
    fn bitor(self, rhs: &TstSet<N>) -> TstSet<N> {
        let mut result = self.clone();
        result.extend(rhs.iter());
        result
    }
}

impl<N> IntoIterator for TstSet<N> {
    type Item = String;
    type IntoIter = IntoIter;

    /// Gets an owning iterator over the members in ascending order.
    fn into_iter(self) -> IntoIter {
        IntoIter {
            inner: self.map.into_keys(),
        }
    }
}

impl<'a, N> IntoIterator for &'a TstSet<N> {
    type Item = String;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Iter<'a> {
        self.iter()
    }
}

impl Iterator for Iter<'_> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        self.inner.next().map(|(key, _)| key)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for Iter<'_> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl FusedIterator for Iter<'_> {}

impl Clone for Iter<'_> {
    fn clone(&self) -> Self {
        Iter {
            inner: self.inner.clone(),
        }
    }
}

impl fmt::Debug for Iter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

impl Default for Iter<'_> {
    /// Creates an empty `tst_set::Iter`.
    fn default() -> Self {
        Iter {
            inner: tst_map::Iter::default(),
        }
    }
}

impl Iterator for IntoIter {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl DoubleEndedIterator for IntoIter {
    fn next_back(&mut self) -> Option<String> {
        self.inner.next_back()
    }
}

impl ExactSizeIterator for IntoIter {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl FusedIterator for IntoIter {}

impl fmt::Debug for IntoIter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("IntoIter").field(&self.inner).finish()
    }
}

impl Default for IntoIter {
    fn default() -> Self {
        IntoIter {
            inner: IntoKeys::default(),
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use alloc::vec;
    use alloc::vec::Vec;

    #[test]
    fn case_insensitive_membership() {
        let mut set = CaseInsensitiveSet::default();
        assert!(set.insert("Hello"));
        assert!(!set.insert("HELLO"));
        assert!(set.contains("hello"));
        assert_eq!(set.iter().collect::<Vec<_>>(), vec!["HELLO"]);
    }

    #[test]
    fn set_operators() {
        let a = TstSet::from(["a", "b", "c"]);
        let b = TstSet::from(["b", "c", "d"]);
        assert_eq!((&a & &b).iter().collect::<Vec<_>>(), vec!["b", "c"]);
        assert_eq!((&a | &b).len(), 4);
        assert_eq!((&a ^ &b).iter().collect::<Vec<_>>(), vec!["a", "d"]);
        assert!((&a & &b).is_subset(&a));
        assert!(a.is_superset(&(&a - &b)));
    }

    #[test]
    fn contains_any_rejects_non_strings() {
        let set = TstSet::from(["a"]);
        assert_eq!(set.contains_any(&'a'), Ok(true));
        assert_eq!(set.contains_any(&1.5_f64), Err(crate::Error::IncomparableKey));
    }
}
