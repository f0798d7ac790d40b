use super::{Iter, SubMap, TstMap};
use crate::TstSet;
use crate::normalize::{KeyNormalizer, fold_key};
use crate::raw::Bounds;

impl<V, N: KeyNormalizer> TstMap<V, N> {
    /// Gets an iterator over the entries whose keys start with `prefix`, in key order.
    ///
    /// The walk descends to the node ending `prefix` and then visits only the subtree below
    /// it. Every call returns a fresh iterator.
    ///
    /// # Examples
    ///
    /// ```
    /// use tst_tree::TstMap;
    ///
    /// let bands: TstMap<()> = ["Abigor", "Aborted", "Amon Amarth", "Amorphis", "Opeth"]
    ///     .into_iter()
    ///     .map(|band| (band, ()))
    ///     .collect();
    /// let ab: Vec<String> = bands.prefix_iter("Ab").map(|(key, _)| key).collect();
    /// assert_eq!(ab, ["Abigor", "Aborted"]);
    /// ```
    pub fn prefix_iter(&self, prefix: &str) -> Iter<'_, V> {
        let folded = fold_key::<N>(prefix);
        let (lo, hi) = self.raw.rank_range(&Bounds::prefix(folded.clone()));
        Iter::new(self.raw.traverse_prefix(folded), hi - lo)
    }

    /// Gets an iterator over the entries whose keys do **not** start with `prefix`, in key
    /// order. Together with [`prefix_iter`](Self::prefix_iter) it partitions the map.
    ///
    /// # Examples
    ///
    /// ```
    /// use tst_tree::TstMap;
    ///
    /// let map = TstMap::from([("tea", 1), ("ten", 2), ("to", 3), ("a", 4)]);
    /// let rest: Vec<String> = map.prefix_iter_excluding("te").map(|(key, _)| key).collect();
    /// assert_eq!(rest, ["a", "to"]);
    /// ```
    pub fn prefix_iter_excluding(&self, prefix: &str) -> Iter<'_, V> {
        let folded = fold_key::<N>(prefix);
        let (lo, hi) = self.raw.rank_range(&Bounds::prefix(folded.clone()));
        Iter::new(self.raw.traverse_excluding(folded), self.len() - (hi - lo))
    }

    /// Returns a view of the entries whose keys start with `prefix`.
    ///
    /// The view covers `[prefix, successor)`, where `successor` is the smallest key greater
    /// than every key extending `prefix`.
    ///
    /// # Examples
    ///
    /// ```
    /// use tst_tree::TstMap;
    ///
    /// let map = TstMap::from([("car", 1), ("cart", 2), ("cat", 3)]);
    /// let view = map.prefix_match("car");
    /// assert_eq!(view.len(), 2);
    /// assert_eq!(view.last_key().as_deref(), Some("cart"));
    /// ```
    pub fn prefix_match(&self, prefix: &str) -> SubMap<'_, V, N> {
        SubMap::new(&self.raw, Bounds::prefix(fold_key::<N>(prefix)))
    }

    /// Returns the keys reachable from `query` within `max_distance` mismatches.
    ///
    /// The search walks the tree once. Moving to a lower or higher sibling is free;
    /// descending past a node costs one unit of budget unless the node's character equals
    /// the query character at that depth. A key is reported when it is reached with budget
    /// to spare and its length differs from the query's by at most `length_tolerance`.
    /// Depths beyond `query.len() + length_tolerance` are never explored.
    ///
    /// This is not an edit distance: characters are compared position by position, so
    /// `"bat"` is one step from `"cat"` but `"at"` is not.
    ///
    /// # Examples
    ///
    /// ```
    /// use tst_tree::CaseInsensitiveMap;
    ///
    /// let mut map = CaseInsensitiveMap::default();
    /// map.insert("Bar", "Bar");
    /// map.insert("Baz", "BAZ");
    /// map.insert("Foo", "Foo");
    ///
    /// let close = map.match_almost("bam", 1, 0);
    /// assert_eq!(close.iter().collect::<Vec<_>>(), ["Bar", "Baz"]);
    /// assert!(map.match_almost("bar", 0, 0).contains("BAR"));
    /// ```
    #[must_use]
    pub fn match_almost(&self, query: &str, max_distance: usize, length_tolerance: usize) -> TstSet<N> {
        self.raw
            .match_almost(&fold_key::<N>(query), max_distance, length_tolerance)
            .into_iter()
            .collect()
    }
}
