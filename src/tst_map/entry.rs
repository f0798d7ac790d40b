use alloc::string::String;
use core::fmt;
use core::mem;

use super::TstMap;
use crate::normalize::{Exact, Folded, KeyNormalizer, display_key, fold_key};
use crate::raw::RawTstMap;

impl<V, N: KeyNormalizer> TstMap<V, N> {
    /// Gets the given key's corresponding entry in the map for in-place manipulation.
    ///
    /// # Examples
    ///
    /// ```
    /// use tst_tree::TstMap;
    ///
    /// let mut count: TstMap<usize> = TstMap::new();
    ///
    /// // count the number of occurrences of letters in the vec
    /// for x in ["a", "b", "a", "c", "a", "b"] {
    ///     count.entry(x).and_modify(|curr| *curr += 1).or_insert(1);
    /// }
    ///
    /// assert_eq!(count["a"], 3);
    /// assert_eq!(count["b"], 2);
    /// assert_eq!(count["c"], 1);
    /// ```
    pub fn entry(&mut self, key: &str) -> Entry<'_, V, N> {
        let folded = fold_key::<N>(key);
        let key = String::from(key);
        if self.raw.slot(&folded).is_some() {
            Entry::Occupied(OccupiedEntry {
                key,
                folded,
                tree: &mut self.raw,
            })
        } else {
            Entry::Vacant(VacantEntry {
                key,
                folded,
                tree: &mut self.raw,
            })
        }
    }
}

/// A view into a single entry in a map, which may either be vacant or occupied.
///
/// This `enum` is constructed from the [`entry`] method on [`TstMap`].
///
/// # Examples
///
/// ```
/// use tst_tree::TstMap;
/// use tst_tree::tst_map::Entry;
///
/// let mut map = TstMap::new();
///
/// match map.entry("oz") {
///     Entry::Vacant(v) => {
///         v.insert(1);
///     }
///     Entry::Occupied(mut o) => {
///         *o.get_mut() += 1;
///     }
/// }
/// assert_eq!(map["oz"], 1);
/// ```
///
/// [`entry`]: TstMap::entry
pub enum Entry<'a, V, N = Exact> {
    /// A vacant entry.
    Vacant(VacantEntry<'a, V, N>),

    /// An occupied entry.
    Occupied(OccupiedEntry<'a, V, N>),
}

impl<V: fmt::Debug, N> fmt::Debug for Entry<'_, V, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Entry::Vacant(v) => f.debug_tuple("Entry").field(v).finish(),
            Entry::Occupied(o) => f.debug_tuple("Entry").field(o).finish(),
        }
    }
}

/// A view into a vacant entry in a `TstMap`.
/// It is part of the [`Entry`] enum.
pub struct VacantEntry<'a, V, N = Exact> {
    key: String,
    folded: Folded,
    tree: &'a mut RawTstMap<V, N>,
}

impl<V, N> fmt::Debug for VacantEntry<'_, V, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VacantEntry").field("key", &self.key).finish()
    }
}

/// A view into an occupied entry in a `TstMap`.
/// It is part of the [`Entry`] enum.
///
/// # Examples
///
/// ```
/// use tst_tree::TstMap;
/// use tst_tree::tst_map::Entry;
///
/// let mut map = TstMap::new();
/// map.insert("oz", 1);
///
/// if let Entry::Occupied(mut o) = map.entry("oz") {
///     *o.get_mut() += 1;
/// }
/// assert_eq!(map["oz"], 2);
/// ```
pub struct OccupiedEntry<'a, V, N = Exact> {
    key: String,
    folded: Folded,
    tree: &'a mut RawTstMap<V, N>,
}

impl<V: fmt::Debug, N> fmt::Debug for OccupiedEntry<'_, V, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OccupiedEntry").field("key", &self.key()).field("value", self.get()).finish()
    }
}

impl<'a, V, N: KeyNormalizer> Entry<'a, V, N> {
    /// Ensures a value is in the entry by inserting the default if empty, and returns
    /// a mutable reference to the value in the entry.
    ///
    /// # Examples
    ///
    /// ```
    /// use tst_tree::TstMap;
    ///
    /// let mut map: TstMap<usize> = TstMap::new();
    /// map.entry("poneyland").or_insert(12);
    ///
    /// assert_eq!(map["poneyland"], 12);
    /// ```
    pub fn or_insert(self, default: V) -> &'a mut V {
        match self {
            Entry::Occupied(o) => o.into_mut(),
            Entry::Vacant(v) => v.insert(default),
        }
    }

    /// Ensures a value is in the entry by inserting the result of the default function if
    /// empty, and returns a mutable reference to the value in the entry.
    pub fn or_insert_with<F: FnOnce() -> V>(self, default: F) -> &'a mut V {
        match self {
            Entry::Occupied(o) => o.into_mut(),
            Entry::Vacant(v) => v.insert(default()),
        }
    }

    /// Ensures a value is in the entry by inserting, if empty, the result of the default
    /// function, which is handed the key the entry was requested with.
    ///
    /// # Examples
    ///
    /// ```
    /// use tst_tree::TstMap;
    ///
    /// let mut map: TstMap<usize> = TstMap::new();
    ///
    /// map.entry("poneyland").or_insert_with_key(|key| key.chars().count());
    ///
    /// assert_eq!(map["poneyland"], 9);
    /// ```
    pub fn or_insert_with_key<F: FnOnce(&str) -> V>(self, default: F) -> &'a mut V {
        match self {
            Entry::Occupied(o) => o.into_mut(),
            Entry::Vacant(v) => {
                let value = default(&v.key);
                v.insert(value)
            }
        }
    }

    /// Returns this entry's key: the stored spelling if occupied, the requested one if
    /// vacant.
    ///
    /// # Examples
    ///
    /// ```
    /// use tst_tree::CaseInsensitiveMap;
    ///
    /// let mut map = CaseInsensitiveMap::default();
    /// map.insert("Poneyland", 1);
    /// assert_eq!(map.entry("PONEYLAND").key(), "Poneyland");
    /// assert_eq!(map.entry("Elsewhere").key(), "Elsewhere");
    /// ```
    #[allow(clippy::must_use_candidate)]
    pub fn key(&self) -> &str {
        match self {
            Entry::Occupied(o) => o.key(),
            Entry::Vacant(v) => v.key(),
        }
    }

    /// Provides in-place mutable access to an occupied entry before any potential inserts
    /// into the map.
    ///
    /// # Examples
    ///
    /// ```
    /// use tst_tree::TstMap;
    ///
    /// let mut map: TstMap<usize> = TstMap::new();
    ///
    /// map.entry("poneyland").and_modify(|e| *e += 1).or_insert(42);
    /// assert_eq!(map["poneyland"], 42);
    ///
    /// map.entry("poneyland").and_modify(|e| *e += 1).or_insert(42);
    /// assert_eq!(map["poneyland"], 43);
    /// ```
    #[allow(clippy::return_self_not_must_use)]
    pub fn and_modify<F>(mut self, f: F) -> Self
    where
        F: FnOnce(&mut V),
    {
        if let Entry::Occupied(ref mut o) = self {
            f(o.get_mut());
        }
        self
    }

    /// Sets the value of the entry, and returns an `OccupiedEntry`.
    pub fn insert_entry(self, value: V) -> OccupiedEntry<'a, V, N> {
        match self {
            Entry::Occupied(mut o) => {
                o.insert(value);
                o
            }
            Entry::Vacant(v) => v.insert_entry(value),
        }
    }
}

impl<'a, V: Default, N: KeyNormalizer> Entry<'a, V, N> {
    /// Ensures a value is in the entry by inserting the default value if empty, and returns
    /// a mutable reference to the value in the entry.
    #[allow(clippy::must_use_candidate)]
    pub fn or_default(self) -> &'a mut V {
        match self {
            Entry::Occupied(o) => o.into_mut(),
            Entry::Vacant(v) => v.insert(V::default()),
        }
    }
}

impl<'a, V, N: KeyNormalizer> VacantEntry<'a, V, N> {
    /// Gets the key that would be used when inserting a value through the `VacantEntry`.
    #[allow(clippy::must_use_candidate)]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Takes ownership of the key.
    #[allow(clippy::must_use_candidate)]
    pub fn into_key(self) -> String {
        self.key
    }

    /// Sets the value of the entry with the `VacantEntry`'s key, and returns a mutable
    /// reference to it.
    ///
    /// # Examples
    ///
    /// ```
    /// use tst_tree::TstMap;
    /// use tst_tree::tst_map::Entry;
    ///
    /// let mut map: TstMap<u32> = TstMap::new();
    ///
    /// if let Entry::Vacant(o) = map.entry("poneyland") {
    ///     o.insert(37);
    /// }
    /// assert_eq!(map["poneyland"], 37);
    /// ```
    pub fn insert(self, value: V) -> &'a mut V {
        let key = display_key::<N>(&self.key);
        self.tree.insert_folded(&self.folded, key, value).1
    }

    /// Sets the value of the entry with the `VacantEntry`'s key, and returns an
    /// `OccupiedEntry`.
    pub fn insert_entry(self, value: V) -> OccupiedEntry<'a, V, N> {
        self.tree.insert_folded(&self.folded, display_key::<N>(&self.key), value);
        OccupiedEntry {
            key: self.key,
            folded: self.folded,
            tree: self.tree,
        }
    }
}

impl<'a, V, N> OccupiedEntry<'a, V, N> {
    /// Gets the key as stored in the map.
    #[must_use]
    pub fn key(&self) -> &str {
        self.tree.slot(&self.folded).and_then(|slot| slot.key.as_deref()).unwrap_or(self.key.as_str())
    }

    /// Takes ownership of the key and value from the map.
    ///
    /// # Examples
    ///
    /// ```
    /// use tst_tree::TstMap;
    /// use tst_tree::tst_map::Entry;
    ///
    /// let mut map: TstMap<usize> = TstMap::new();
    /// map.entry("poneyland").or_insert(12);
    ///
    /// if let Entry::Occupied(o) = map.entry("poneyland") {
    ///     assert_eq!(o.remove_entry(), (String::from("poneyland"), 12));
    /// }
    /// assert!(map.is_empty());
    /// ```
    #[allow(clippy::must_use_candidate)]
    pub fn remove_entry(self) -> (String, V) {
        let slot = self.tree.remove_slot(&self.folded).expect("entry must exist");
        (slot.key_string(&self.folded), slot.value)
    }

    /// Gets a reference to the value in the entry.
    #[must_use]
    pub fn get(&self) -> &V {
        &self.tree.slot(&self.folded).expect("entry must exist").value
    }

    /// Gets a mutable reference to the value in the entry.
    ///
    /// If you need a reference to the `OccupiedEntry` that may outlive the destruction of
    /// the `Entry` value, see [`into_mut`](Self::into_mut).
    pub fn get_mut(&mut self) -> &mut V {
        &mut self.tree.slot_mut(&self.folded).expect("entry must exist").value
    }

    /// Converts the entry into a mutable reference to its value.
    #[must_use = "`self` will be dropped if the result is not used"]
    pub fn into_mut(self) -> &'a mut V {
        &mut self.tree.slot_mut(&self.folded).expect("entry must exist").value
    }

    /// Sets the value of the entry with the `OccupiedEntry`'s key, and returns the entry's
    /// old value.
    pub fn insert(&mut self, value: V) -> V {
        mem::replace(self.get_mut(), value)
    }

    /// Takes the value of the entry out of the map, and returns it.
    #[allow(clippy::must_use_candidate)]
    pub fn remove(self) -> V {
        self.remove_entry().1
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::CaseInsensitiveMap;

    #[test]
    fn vacant_insert_under_folding_keeps_spelling() {
        let mut map = CaseInsensitiveMap::default();
        map.entry("Mixed").or_insert(1);
        assert_eq!(map.first_key().as_deref(), Some("Mixed"));
        *map.entry("MIXED").or_insert(5) += 1;
        assert_eq!(map.get("mixed"), Some(&2));
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn occupied_remove_prunes_tree() {
        let mut map: TstMap<i32> = TstMap::from([("ab", 1), ("abc", 2)]);
        if let Entry::Occupied(o) = map.entry("abc") {
            assert_eq!(o.remove(), 2);
        }
        map.raw.validate_invariants();
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn empty_key_entry() {
        let mut map: TstMap<i32> = TstMap::new();
        *map.entry("").or_default() += 3;
        assert_eq!(map.get(""), Some(&3));
        assert!(matches!(map.entry(""), Entry::Occupied(_)));
    }
}
