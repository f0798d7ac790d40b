use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;
use core::any::Any;
use core::cmp::Ordering;
use core::fmt;
use core::hash::{Hash, Hasher};
use core::iter::FusedIterator;
use core::ops::Index;

use crate::error::Result;
use crate::normalize::{CaseInsensitive, Exact, Folded, KeyNormalizer, any_key, fold_key};
use crate::raw::{Bounds, RawTstMap, Traversal, TraversalMut};

mod cursor;
mod entry;
mod order_statistic;
mod search;
mod view;

pub use crate::Rank;
pub use cursor::Cursor;
pub use entry::{Entry, OccupiedEntry, VacantEntry};
pub use view::{SubMap, SubMapMut};

/// An ordered map from string keys to values, based on a [ternary search tree].
///
/// Each node of the tree holds one key character and three children: keys whose next
/// character sorts lower, keys that continue with this character, and keys whose next
/// character sorts higher. Lookups cost one node per key character plus the sibling hops
/// along the way, independent of how many keys share the prefix.
///
/// Besides the usual map operations, every node counts the keys in its subtree, which gives
/// logarithmic order-statistic queries ([`key_at`], [`index_of`], [`get_by_rank`]) and
/// bounded views ([`head_map`], [`tail_map`], [`sub_map`]). Prefix walks
/// ([`prefix_iter`], [`prefix_match`]) and approximate matching ([`match_almost`]) follow
/// directly from the tree shape.
///
/// Keys are folded through the normalizer `N` before they are compared or stored. The
/// default, [`Exact`], orders keys by code point. [`CaseInsensitiveMap`] folds case and
/// reports each key in the casing it was most recently inserted with.
///
/// # Examples
///
/// ```
/// use tst_tree::TstMap;
///
/// let mut food = TstMap::new();
/// food.insert("sverige", "smorgasbord");
/// food.insert("deutschland", "sauerkraut");
/// food.insert("england", "fishnchips");
/// food.insert("suomi", "salmiakki");
///
/// assert_eq!(food.get("suomi"), Some(&"salmiakki"));
/// assert_eq!(food.first_key().as_deref(), Some("deutschland"));
/// assert_eq!(food.key_at(1).as_deref(), Ok("england"));
///
/// let s: Vec<String> = food.prefix_iter("s").map(|(key, _)| key).collect();
/// assert_eq!(s, ["suomi", "sverige"]);
///
/// for (country, dish) in &food {
///     println!("{country}: {dish}");
/// }
/// ```
///
/// A `TstMap` with a known list of items can be initialized from an array:
///
/// ```
/// use tst_tree::TstMap;
///
/// let planets = TstMap::from([("Mercury", 0.4), ("Venus", 0.7), ("Earth", 1.0)]);
/// assert_eq!(planets.first_key().as_deref(), Some("Earth"));
/// ```
///
/// [ternary search tree]: https://en.wikipedia.org/wiki/Ternary_search_tree
/// [`key_at`]: TstMap::key_at
/// [`index_of`]: TstMap::index_of
/// [`get_by_rank`]: TstMap::get_by_rank
/// [`head_map`]: TstMap::head_map
/// [`tail_map`]: TstMap::tail_map
/// [`sub_map`]: TstMap::sub_map
/// [`prefix_iter`]: TstMap::prefix_iter
/// [`prefix_match`]: TstMap::prefix_match
/// [`match_almost`]: TstMap::match_almost
pub struct TstMap<V, N = Exact> {
    raw: RawTstMap<V, N>,
}

/// A [`TstMap`] whose keys compare case-insensitively.
///
/// # Examples
///
/// ```
/// use tst_tree::CaseInsensitiveMap;
///
/// let mut map = CaseInsensitiveMap::default();
/// map.insert("Opeth", 1);
/// assert_eq!(map.get("OPETH"), Some(&1));
/// assert_eq!(map.first_key().as_deref(), Some("Opeth"));
/// ```
pub type CaseInsensitiveMap<V> = TstMap<V, CaseInsensitive>;

/// An iterator over the entries of a `TstMap` or one of its views, in key order.
///
/// This `struct` is created by [`TstMap::iter`], [`TstMap::prefix_iter`],
/// [`TstMap::prefix_iter_excluding`] and the `iter` methods of the views.
///
/// # Examples
///
/// ```
/// use tst_tree::TstMap;
///
/// let map = TstMap::from([("b", 2), ("a", 1)]);
/// let mut iter = map.iter();
/// assert_eq!(iter.next(), Some((String::from("a"), &1)));
/// assert_eq!(iter.len(), 1);
/// ```
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Iter<'a, V> {
    walk: Traversal<'a, V>,
    remaining: usize,
}

/// A mutable iterator over the entries of a `TstMap` or one of its mutable views.
///
/// Writing through the yielded references updates the map in place.
///
/// # Examples
///
/// ```
/// use tst_tree::TstMap;
///
/// let mut map = TstMap::from([("a", 1), ("b", 2)]);
/// for (_, value) in map.iter_mut() {
///     *value *= 10;
/// }
/// assert_eq!(map.values().copied().collect::<Vec<_>>(), [10, 20]);
/// ```
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct IterMut<'a, V> {
    walk: TraversalMut<'a, V>,
    remaining: usize,
}

/// An owning iterator over the entries of a `TstMap`, sorted by key.
pub struct IntoIter<V> {
    inner: alloc::vec::IntoIter<(String, V)>,
}

/// An iterator over the keys of a `TstMap`.
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Keys<'a, V> {
    inner: Iter<'a, V>,
}

/// An iterator over the values of a `TstMap`, in key order.
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Values<'a, V> {
    inner: Iter<'a, V>,
}

/// A mutable iterator over the values of a `TstMap`, in key order.
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct ValuesMut<'a, V> {
    inner: IterMut<'a, V>,
}

/// An owning iterator over the keys of a `TstMap`.
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct IntoKeys<V> {
    inner: IntoIter<V>,
}

/// An owning iterator over the values of a `TstMap`.
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct IntoValues<V> {
    inner: IntoIter<V>,
}

impl<'a, V> Iter<'a, V> {
    pub(crate) fn new(walk: Traversal<'a, V>, remaining: usize) -> Self {
        Iter { walk, remaining }
    }
}

impl<'a, V> IterMut<'a, V> {
    pub(crate) fn new(walk: TraversalMut<'a, V>, remaining: usize) -> Self {
        IterMut { walk, remaining }
    }
}

impl<V> TstMap<V> {
    /// Makes a new, empty `TstMap` with exact key comparison.
    ///
    /// Does not allocate anything on its own.
    ///
    /// # Examples
    ///
    /// ```
    /// use tst_tree::TstMap;
    ///
    /// let mut map = TstMap::new();
    /// map.insert("a", 1);
    /// ```
    #[must_use]
    pub const fn new() -> TstMap<V> {
        TstMap { raw: RawTstMap::new() }
    }
}

impl<V, N> TstMap<V, N> {
    /// Makes a new, empty map using the normalizer `N`.
    ///
    /// # Examples
    ///
    /// ```
    /// use tst_tree::{CaseInsensitive, TstMap};
    ///
    /// let mut map: TstMap<i32, CaseInsensitive> = TstMap::with_normalizer();
    /// map.insert("Key", 1);
    /// assert!(map.contains_key("KEY"));
    /// ```
    #[must_use]
    pub const fn with_normalizer() -> TstMap<V, N> {
        TstMap { raw: RawTstMap::new() }
    }

    /// Returns the number of entries in the map.
    ///
    /// # Complexity
    ///
    /// O(1)
    ///
    /// # Examples
    ///
    /// ```
    /// use tst_tree::TstMap;
    ///
    /// let mut a = TstMap::new();
    /// assert_eq!(a.len(), 0);
    /// a.insert("a", 1);
    /// assert_eq!(a.len(), 1);
    /// ```
    #[must_use]
    pub fn len(&self) -> usize {
        self.raw.len()
    }

    /// Returns `true` if the map contains no entries.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Clears the map, removing all entries.
    ///
    /// # Complexity
    ///
    /// O(total key length)
    pub fn clear(&mut self) {
        self.raw.clear();
    }

    /// Gets an iterator over the entries of the map, sorted by key.
    ///
    /// Every call starts a fresh walk from the smallest key.
    ///
    /// # Examples
    ///
    /// ```
    /// use tst_tree::TstMap;
    ///
    /// let map = TstMap::from([("c", 3), ("a", 1), ("b", 2)]);
    /// let keys: Vec<String> = map.iter().map(|(key, _)| key).collect();
    /// assert_eq!(keys, ["a", "b", "c"]);
    /// ```
    pub fn iter(&self) -> Iter<'_, V> {
        Iter::new(self.raw.traverse(Bounds::full()), self.len())
    }

    /// Gets a mutable iterator over the entries of the map, sorted by key.
    pub fn iter_mut(&mut self) -> IterMut<'_, V> {
        let len = self.len();
        IterMut::new(self.raw.traverse_mut(Bounds::full()), len)
    }

    /// Gets an iterator over the keys of the map, in sorted order.
    ///
    /// # Examples
    ///
    /// ```
    /// use tst_tree::TstMap;
    ///
    /// let map = TstMap::from([("b", 2), ("a", 1)]);
    /// assert_eq!(map.keys().collect::<Vec<_>>(), ["a", "b"]);
    /// ```
    pub fn keys(&self) -> Keys<'_, V> {
        Keys { inner: self.iter() }
    }

    /// Gets an iterator over the values of the map, in order by key.
    pub fn values(&self) -> Values<'_, V> {
        Values { inner: self.iter() }
    }

    /// Gets a mutable iterator over the values of the map, in order by key.
    ///
    /// # Examples
    ///
    /// ```
    /// use tst_tree::TstMap;
    ///
    /// let mut map = TstMap::from([("a", String::from("hello")), ("b", String::from("goodbye"))]);
    /// for value in map.values_mut() {
    ///     value.push('!');
    /// }
    /// assert_eq!(map.values().cloned().collect::<Vec<_>>(), ["hello!", "goodbye!"]);
    /// ```
    pub fn values_mut(&mut self) -> ValuesMut<'_, V> {
        ValuesMut { inner: self.iter_mut() }
    }

    /// Creates a consuming iterator visiting all the keys, in sorted order.
    pub fn into_keys(self) -> IntoKeys<V> {
        IntoKeys { inner: self.into_iter() }
    }

    /// Creates a consuming iterator visiting all the values, in order by key.
    pub fn into_values(self) -> IntoValues<V> {
        IntoValues { inner: self.into_iter() }
    }

    /// Returns the smallest key in the map.
    #[must_use]
    pub fn first_key(&self) -> Option<String> {
        self.first_key_value().map(|(key, _)| key)
    }

    /// Returns the largest key in the map.
    ///
    /// # Examples
    ///
    /// ```
    /// use tst_tree::TstMap;
    ///
    /// let map = TstMap::from([("sverige", 1), ("deutschland", 2), ("suomi", 3)]);
    /// assert_eq!(map.last_key().as_deref(), Some("sverige"));
    /// ```
    #[must_use]
    pub fn last_key(&self) -> Option<String> {
        self.last_key_value().map(|(key, _)| key)
    }

    /// Returns the first key-value pair in the map.
    #[must_use]
    pub fn first_key_value(&self) -> Option<(String, &V)> {
        self.raw.entry_at(0)
    }

    /// Returns the last key-value pair in the map.
    #[must_use]
    pub fn last_key_value(&self) -> Option<(String, &V)> {
        self.raw.entry_at(self.len().checked_sub(1)?)
    }

    /// Removes and returns the first entry in the map.
    ///
    /// # Examples
    ///
    /// ```
    /// use tst_tree::TstMap;
    ///
    /// let mut map = TstMap::from([("a", 1), ("b", 2)]);
    /// assert_eq!(map.pop_first(), Some((String::from("a"), 1)));
    /// assert_eq!(map.pop_first(), Some((String::from("b"), 2)));
    /// assert_eq!(map.pop_first(), None);
    /// ```
    pub fn pop_first(&mut self) -> Option<(String, V)> {
        self.raw.remove_at(0)
    }

    /// Removes and returns the last entry in the map.
    pub fn pop_last(&mut self) -> Option<(String, V)> {
        let last = self.len().checked_sub(1)?;
        self.raw.remove_at(last)
    }

    /// Returns `true` if some entry holds a value equal to `value`.
    ///
    /// # Complexity
    ///
    /// O(n)
    #[must_use]
    pub fn contains_value(&self, value: &V) -> bool
    where
        V: PartialEq,
    {
        self.values().any(|v| v == value)
    }
}

impl<V, N: KeyNormalizer> TstMap<V, N> {
    /// Inserts a key-value pair into the map.
    ///
    /// If the map did not have this key present, `None` is returned. If it did, the value is
    /// updated and the old value is returned. Under a folding normalizer the key is also
    /// reported in its new spelling from then on.
    ///
    /// # Complexity
    ///
    /// O(key length + depth)
    ///
    /// # Examples
    ///
    /// ```
    /// use tst_tree::TstMap;
    ///
    /// let mut map = TstMap::new();
    /// assert_eq!(map.insert("a", 1), None);
    /// assert_eq!(map.insert("a", 2), Some(1));
    /// assert_eq!(map["a"], 2);
    /// ```
    pub fn insert(&mut self, key: &str, value: V) -> Option<V> {
        self.raw.insert(key, value)
    }

    /// Returns a reference to the value corresponding to the key.
    ///
    /// # Examples
    ///
    /// ```
    /// use tst_tree::TstMap;
    ///
    /// let mut map = TstMap::new();
    /// map.insert("a", 1);
    /// assert_eq!(map.get("a"), Some(&1));
    /// assert_eq!(map.get("b"), None);
    /// ```
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&V> {
        self.raw.get(key)
    }

    /// Returns a mutable reference to the value corresponding to the key.
    pub fn get_mut(&mut self, key: &str) -> Option<&mut V> {
        self.raw.get_mut(key)
    }

    /// Returns the stored key and the value corresponding to the supplied key.
    ///
    /// Under a folding normalizer the stored spelling may differ from `key`.
    ///
    /// # Examples
    ///
    /// ```
    /// use tst_tree::CaseInsensitiveMap;
    ///
    /// let mut map = CaseInsensitiveMap::default();
    /// map.insert("Paris", 1);
    /// assert_eq!(map.get_key_value("PARIS"), Some((String::from("Paris"), &1)));
    /// ```
    #[must_use]
    pub fn get_key_value(&self, key: &str) -> Option<(String, &V)> {
        let folded = fold_key::<N>(key);
        let slot = self.raw.slot(&folded)?;
        Some((slot.key_string(&folded), &slot.value))
    }

    /// Returns `true` if the map contains a value for the specified key.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Removes a key from the map, returning the value at the key if the key was previously
    /// in the map.
    ///
    /// Nodes left holding neither a value nor children are pruned.
    ///
    /// # Examples
    ///
    /// ```
    /// use tst_tree::TstMap;
    ///
    /// let mut map = TstMap::from([("a", 1)]);
    /// assert_eq!(map.remove("a"), Some(1));
    /// assert_eq!(map.remove("a"), None);
    /// assert!(map.is_empty());
    /// ```
    pub fn remove(&mut self, key: &str) -> Option<V> {
        self.remove_entry(key).map(|(_, value)| value)
    }

    /// Removes a key from the map, returning the stored key and the value if the key was
    /// previously in the map.
    pub fn remove_entry(&mut self, key: &str) -> Option<(String, V)> {
        self.raw.remove_entry(key)
    }

    /// Looks up a dynamically typed key.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IncomparableKey`](crate::Error::IncomparableKey) unless `key` is a
    /// `String`, `&'static str`, `Box<str>`, `Cow<'static, str>` or `char`.
    ///
    /// # Examples
    ///
    /// ```
    /// use tst_tree::{Error, TstMap};
    ///
    /// let map = TstMap::from([("a", 1)]);
    /// assert_eq!(map.get_any(&String::from("a")), Ok(Some(&1)));
    /// assert_eq!(map.get_any(&7_u8), Err(Error::IncomparableKey));
    /// ```
    pub fn get_any(&self, key: &dyn Any) -> Result<Option<&V>> {
        Ok(self.get(&any_key(key)?))
    }

    /// Checks a dynamically typed key for membership.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IncomparableKey`](crate::Error::IncomparableKey) when `key` is not
    /// one of the string types accepted by [`get_any`](Self::get_any).
    pub fn contains_key_any(&self, key: &dyn Any) -> Result<bool> {
        Ok(self.contains_key(&any_key(key)?))
    }

    /// Returns the largest key strictly less than `key`. `key` need not be present.
    ///
    /// # Examples
    ///
    /// ```
    /// use tst_tree::TstMap;
    ///
    /// let map = TstMap::from([("apple", 1), ("banana", 2), ("cherry", 3)]);
    /// assert_eq!(map.predecessor("banana").as_deref(), Some("apple"));
    /// assert_eq!(map.predecessor("blueberry").as_deref(), Some("banana"));
    /// assert_eq!(map.predecessor("apple"), None);
    /// ```
    #[must_use]
    pub fn predecessor(&self, key: &str) -> Option<String> {
        let rank = self.raw.rank_lower_bound(&fold_key::<N>(key)).checked_sub(1)?;
        self.raw.entry_at(rank).map(|(key, _)| key)
    }

    /// Returns the smallest key strictly greater than `key`. `key` need not be present.
    ///
    /// # Examples
    ///
    /// ```
    /// use tst_tree::TstMap;
    ///
    /// let map = TstMap::from([("apple", 1), ("banana", 2), ("cherry", 3)]);
    /// assert_eq!(map.successor("banana").as_deref(), Some("cherry"));
    /// assert_eq!(map.successor("b").as_deref(), Some("banana"));
    /// assert_eq!(map.successor("cherry"), None);
    /// ```
    #[must_use]
    pub fn successor(&self, key: &str) -> Option<String> {
        let folded = fold_key::<N>(key);
        let rank = self.raw.rank_lower_bound(&folded) + usize::from(self.raw.slot(&folded).is_some());
        self.raw.entry_at(rank).map(|(key, _)| key)
    }

    /// Retains only the entries specified by the predicate.
    ///
    /// In other words, remove all pairs `(k, v)` for which `f(&k, &mut v)` returns `false`.
    /// The entries are visited in ascending key order.
    ///
    /// # Examples
    ///
    /// ```
    /// use tst_tree::TstMap;
    ///
    /// let mut map: TstMap<i32> = (0..8).map(|x| (x.to_string(), x * 10)).collect();
    /// map.retain(|_, v| *v % 20 == 0);
    /// assert_eq!(map.keys().collect::<Vec<_>>(), ["0", "2", "4", "6"]);
    /// ```
    pub fn retain<F>(&mut self, mut f: F)
    where
        F: FnMut(&str, &mut V) -> bool,
    {
        let mut rejected: Vec<Folded> = Vec::new();
        let mut walk = self.raw.traverse_mut(Bounds::full());
        while let Some(slot) = walk.next_slot() {
            let key = slot.key_string(walk.path());
            if !f(&key, &mut slot.value) {
                rejected.push(walk.path().into());
            }
        }
        drop(walk);
        let removed = rejected.len();
        for folded in rejected {
            self.raw.remove_slot(&folded);
        }
        tracing::trace!(removed, "retain finished");
    }
}

impl<V: Clone, N> Clone for TstMap<V, N> {
    fn clone(&self) -> Self {
        TstMap { raw: self.raw.clone() }
    }
}

impl<V, N> TstMap<V, N> {
    /// Entries keyed by their folded form, in order. Two maps holding the same folded keys
    /// compare equal whatever spelling each one reports.
    fn folded_entries(&self) -> impl Iterator<Item = (Folded, &V)> {
        let mut walk = self.raw.traverse(Bounds::full());
        core::iter::from_fn(move || {
            let slot = walk.next_slot()?;
            Some((Folded::from(walk.path()), &slot.value))
        })
    }
}

impl<V: Hash, N> Hash for TstMap<V, N> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_usize(self.len());
        for entry in self.folded_entries() {
            entry.hash(state);
        }
    }
}

impl<V: PartialEq, N> PartialEq for TstMap<V, N> {
    fn eq(&self, other: &TstMap<V, N>) -> bool {
        self.len() == other.len() && self.folded_entries().eq(other.folded_entries())
    }
}

impl<V: Eq, N> Eq for TstMap<V, N> {}

impl<V: PartialOrd, N> PartialOrd for TstMap<V, N> {
    fn partial_cmp(&self, other: &TstMap<V, N>) -> Option<Ordering> {
        self.folded_entries().partial_cmp(other.folded_entries())
    }
}

impl<V: Ord, N> Ord for TstMap<V, N> {
    fn cmp(&self, other: &TstMap<V, N>) -> Ordering {
        self.folded_entries().cmp(other.folded_entries())
    }
}

impl<V: fmt::Debug, N> fmt::Debug for TstMap<V, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<V, N> Default for TstMap<V, N> {
    /// Creates an empty `TstMap`.
    fn default() -> TstMap<V, N> {
        TstMap::with_normalizer()
    }
}

impl<K: AsRef<str>, V, N: KeyNormalizer> FromIterator<(K, V)> for TstMap<V, N> {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> TstMap<V, N> {
        let mut map = TstMap::with_normalizer();
        map.extend(iter);
        map
    }
}

impl<K: AsRef<str>, V, N: KeyNormalizer> Extend<(K, V)> for TstMap<V, N> {
    #[inline]
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        for (key, value) in iter {
            self.insert(key.as_ref(), value);
        }
    }
}

impl<K: AsRef<str>, V, const M: usize> From<[(K, V); M]> for TstMap<V> {
    /// Converts a `[(K, V); M]` into a `TstMap`.
    ///
    /// If any entries in the array have equal keys, all but one of the corresponding values
    /// will be dropped.
    fn from(arr: [(K, V); M]) -> Self {
        arr.into_iter().collect()
    }
}

impl<V> From<BTreeMap<String, V>> for TstMap<V> {
    /// Builds a `TstMap` holding the same entries as an existing ordered map.
    ///
    /// Collect the map's entries instead to build a map with another normalizer.
    fn from(map: BTreeMap<String, V>) -> Self {
        map.into_iter().collect()
    }
}

impl<V, N: KeyNormalizer> Index<&str> for TstMap<V, N> {
    type Output = V;

    /// Returns a reference to the value corresponding to the supplied key.
    ///
    /// # Panics
    ///
    /// Panics if the key is not present in the `TstMap`.
    #[inline]
    fn index(&self, key: &str) -> &V {
        self.get(key).expect("no entry found for key")
    }
}

impl<'a, V, N> IntoIterator for &'a TstMap<V, N> {
    type Item = (String, &'a V);
    type IntoIter = Iter<'a, V>;

    fn into_iter(self) -> Iter<'a, V> {
        self.iter()
    }
}

impl<'a, V, N> IntoIterator for &'a mut TstMap<V, N> {
    type Item = (String, &'a mut V);
    type IntoIter = IterMut<'a, V>;

    fn into_iter(self) -> IterMut<'a, V> {
        self.iter_mut()
    }
}

impl<V, N> IntoIterator for TstMap<V, N> {
    type Item = (String, V);
    type IntoIter = IntoIter<V>;

    /// Gets an owning iterator over the entries of the map, sorted by key.
    ///
    /// # Examples
    ///
    /// ```
    /// use tst_tree::TstMap;
    ///
    /// let map = TstMap::from([("b", 2), ("a", 1)]);
    /// let entries: Vec<(String, i32)> = map.into_iter().collect();
    /// assert_eq!(entries, [(String::from("a"), 1), (String::from("b"), 2)]);
    /// ```
    fn into_iter(mut self) -> IntoIter<V> {
        IntoIter {
            inner: self.raw.drain_to_vec().into_iter(),
        }
    }
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = (String, &'a V);

    fn next(&mut self) -> Option<(String, &'a V)> {
        let slot = self.walk.next_slot()?;
        self.remaining = self.remaining.saturating_sub(1);
        Some((slot.key_string(self.walk.path()), &slot.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<V> ExactSizeIterator for Iter<'_, V> {
    fn len(&self) -> usize {
        self.remaining
    }
}

impl<V> FusedIterator for Iter<'_, V> {}

impl<V> Clone for Iter<'_, V> {
    fn clone(&self) -> Self {
        Iter {
            walk: self.walk.clone(),
            remaining: self.remaining,
        }
    }
}

impl<V: fmt::Debug> fmt::Debug for Iter<'_, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

impl<V> Default for Iter<'_, V> {
    /// Creates an empty `tst_map::Iter`.
    ///
    /// ```
    /// use tst_tree::tst_map;
    ///
    /// let iter: tst_map::Iter<'_, u8> = Default::default();
    /// assert_eq!(iter.len(), 0);
    /// ```
    fn default() -> Self {
        Iter::new(Traversal::empty(), 0)
    }
}

impl<'a, V> Iterator for IterMut<'a, V> {
    type Item = (String, &'a mut V);

    fn next(&mut self) -> Option<(String, &'a mut V)> {
        let slot = self.walk.next_slot()?;
        self.remaining = self.remaining.saturating_sub(1);
        Some((slot.key_string(self.walk.path()), &mut slot.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<V> ExactSizeIterator for IterMut<'_, V> {
    fn len(&self) -> usize {
        self.remaining
    }
}

impl<V> FusedIterator for IterMut<'_, V> {}

impl<V> fmt::Debug for IterMut<'_, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IterMut").field("remaining", &self.remaining).finish()
    }
}

impl<V> Iterator for IntoIter<V> {
    type Item = (String, V);

    fn next(&mut self) -> Option<(String, V)> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<V> DoubleEndedIterator for IntoIter<V> {
    fn next_back(&mut self) -> Option<(String, V)> {
        self.inner.next_back()
    }
}

impl<V> ExactSizeIterator for IntoIter<V> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<V> FusedIterator for IntoIter<V> {}

impl<V: fmt::Debug> fmt::Debug for IntoIter<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.inner.as_slice()).finish()
    }
}

impl<V> Default for IntoIter<V> {
    fn default() -> Self {
        IntoIter {
            inner: Vec::new().into_iter(),
        }
    }
}

impl<V> Iterator for Keys<'_, V> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        self.inner.next().map(|(key, _)| key)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<V> ExactSizeIterator for Keys<'_, V> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<V> FusedIterator for Keys<'_, V> {}

impl<V> Clone for Keys<'_, V> {
    fn clone(&self) -> Self {
        Keys {
            inner: self.inner.clone(),
        }
    }
}

impl<V> fmt::Debug for Keys<'_, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

impl<V> Default for Keys<'_, V> {
    fn default() -> Self {
        Keys {
            inner: Iter::default(),
        }
    }
}

impl<'a, V> Iterator for Values<'a, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<&'a V> {
        // Skips rebuilding the key.
        let slot = self.inner.walk.next_slot()?;
        self.inner.remaining = self.inner.remaining.saturating_sub(1);
        Some(&slot.value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<V> ExactSizeIterator for Values<'_, V> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<V> FusedIterator for Values<'_, V> {}

impl<V> Clone for Values<'_, V> {
    fn clone(&self) -> Self {
        Values {
            inner: self.inner.clone(),
        }
    }
}

impl<V: fmt::Debug> fmt::Debug for Values<'_, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

impl<V> Default for Values<'_, V> {
    fn default() -> Self {
        Values {
            inner: Iter::default(),
        }
    }
}

impl<'a, V> Iterator for ValuesMut<'a, V> {
    type Item = &'a mut V;

    fn next(&mut self) -> Option<&'a mut V> {
        let slot = self.inner.walk.next_slot()?;
        self.inner.remaining = self.inner.remaining.saturating_sub(1);
        Some(&mut slot.value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<V> ExactSizeIterator for ValuesMut<'_, V> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<V> FusedIterator for ValuesMut<'_, V> {}

impl<V> fmt::Debug for ValuesMut<'_, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValuesMut").field("remaining", &self.inner.remaining).finish()
    }
}

impl<V> Iterator for IntoKeys<V> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        self.inner.next().map(|(key, _)| key)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<V> DoubleEndedIterator for IntoKeys<V> {
    fn next_back(&mut self) -> Option<String> {
        self.inner.next_back().map(|(key, _)| key)
    }
}

impl<V> ExactSizeIterator for IntoKeys<V> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<V> FusedIterator for IntoKeys<V> {}

impl<V> fmt::Debug for IntoKeys<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.inner.inner.as_slice().iter().map(|(key, _)| key)).finish()
    }
}

impl<V> Default for IntoKeys<V> {
    fn default() -> Self {
        IntoKeys {
            inner: IntoIter::default(),
        }
    }
}

impl<V> Iterator for IntoValues<V> {
    type Item = V;

    fn next(&mut self) -> Option<V> {
        self.inner.next().map(|(_, value)| value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<V> DoubleEndedIterator for IntoValues<V> {
    fn next_back(&mut self) -> Option<V> {
        self.inner.next_back().map(|(_, value)| value)
    }
}

impl<V> ExactSizeIterator for IntoValues<V> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<V> FusedIterator for IntoValues<V> {}

impl<V: fmt::Debug> fmt::Debug for IntoValues<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.inner.inner.as_slice().iter().map(|(_, value)| value)).finish()
    }
}

impl<V> Default for IntoValues<V> {
    fn default() -> Self {
        IntoValues {
            inner: IntoIter::default(),
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use alloc::vec;
    use pretty_assertions::assert_eq;

    #[test]
    fn exact_size_tracks_progress() {
        let map = TstMap::from([("a", 1), ("ab", 2), ("b", 3)]);
        let mut iter = map.iter();
        assert_eq!(iter.len(), 3);
        iter.next();
        assert_eq!(iter.len(), 2);
        assert_eq!(iter.count(), 2);
    }

    #[test]
    fn values_skip_key_building_but_match_order() {
        let map = TstMap::from([("b", 2), ("", 0), ("a", 1)]);
        assert_eq!(map.values().copied().collect::<Vec<_>>(), vec![0, 1, 2]);
        assert_eq!(map.keys().collect::<Vec<_>>(), vec!["", "a", "b"]);
    }

    #[test]
    fn retain_removes_rejected_and_prunes() {
        let mut map: TstMap<usize> = ["car", "cart", "care", "dog"].iter().map(|k| (*k, k.len())).collect();
        map.retain(|key, _| key.starts_with("car") && key != "car");
        assert_eq!(map.keys().collect::<Vec<_>>(), vec!["care", "cart"]);
        map.raw.validate_invariants();
    }

    #[test]
    fn debug_formats_as_map() {
        let map = TstMap::from([("a", 1)]);
        assert_eq!(alloc::format!("{map:?}"), "{\"a\": 1}");
    }
}
