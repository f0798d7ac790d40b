/// A zero-based rank into the sorted order of a map.
///
/// # Examples
///
/// ```
/// use tst_tree::{Rank, TstMap};
///
/// let mut map = TstMap::new();
/// map.insert("a", 10);
/// map.insert("b", 20);
///
/// assert_eq!(map[Rank(0)], 10);
/// ```
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Rank(pub usize);
