use core::cmp::Ordering;

use crate::error::{Error, Result};
use crate::normalize::{Folded, KeyNormalizer, fold_key};

/// A half-open key range `[from, to)` over folded keys. Either end may be open.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub(crate) struct Bounds {
    from: Option<Folded>,
    to: Option<Folded>,
}

impl Bounds {
    /// The unbounded range.
    pub(crate) const fn full() -> Self {
        Bounds { from: None, to: None }
    }

    /// All keys starting with `prefix`: `[prefix, successor(prefix))`.
    pub(crate) fn prefix(prefix: Folded) -> Self {
        let to = prefix_successor(&prefix);
        Bounds {
            from: Some(prefix),
            to,
        }
    }

    /// All keys strictly below `to`.
    pub(crate) fn below(to: Folded) -> Self {
        Bounds { from: None, to: Some(to) }
    }

    /// All keys at or above `from`.
    pub(crate) fn at_or_above(from: Folded) -> Self {
        Bounds {
            from: Some(from),
            to: None,
        }
    }

    pub(crate) fn start(&self) -> Option<&[char]> {
        self.from.as_deref()
    }

    pub(crate) fn end(&self) -> Option<&[char]> {
        self.to.as_deref()
    }

    #[inline]
    pub(crate) fn too_low(&self, key: &[char]) -> bool {
        self.from.as_deref().is_some_and(|from| key < from)
    }

    #[inline]
    pub(crate) fn too_high(&self, key: &[char]) -> bool {
        self.to.as_deref().is_some_and(|to| key >= to)
    }

    #[inline]
    pub(crate) fn contains(&self, key: &[char]) -> bool {
        !self.too_low(key) && !self.too_high(key)
    }

    /// Narrows to keys strictly below `to`. `to` may equal the current upper bound.
    pub(crate) fn head<N: KeyNormalizer>(&self, to: &str) -> Result<Self> {
        let folded = fold_key::<N>(to);
        if self.too_low(&folded) || self.to.as_deref().is_some_and(|upper| folded.as_slice() > upper) {
            return Err(Error::key_out_of_range(to));
        }
        Ok(Bounds {
            from: self.from.clone(),
            to: Some(folded),
        })
    }

    /// Narrows to keys at or above `from`, which must itself lie inside the range.
    pub(crate) fn tail<N: KeyNormalizer>(&self, from: &str) -> Result<Self> {
        let folded = fold_key::<N>(from);
        if !self.contains(&folded) {
            return Err(Error::key_out_of_range(from));
        }
        Ok(Bounds {
            from: Some(folded),
            to: self.to.clone(),
        })
    }

    /// Narrows to `[from, to)`.
    pub(crate) fn sub<N: KeyNormalizer>(&self, from: &str, to: &str) -> Result<Self> {
        if fold_key::<N>(from) > fold_key::<N>(to) {
            return Err(Error::InvalidArgument("range start is greater than range end"));
        }
        let tail = self.tail::<N>(from)?;
        let head = self.head::<N>(to)?;
        Ok(Bounds {
            from: tail.from,
            to: head.to,
        })
    }
}

/// Where every key sharing `prefix` sits relative to `bound`.
///
/// Returns `Less` when all such keys sort below `bound`, `Greater` when all sort at or above
/// it, and `Equal` when `bound` itself extends `prefix` so the answer depends on later
/// characters.
pub(crate) fn prefix_position(prefix: &[char], bound: &[char]) -> Ordering {
    if bound.len() <= prefix.len() {
        // Either the bound is a prefix of every key here, or it diverges before the end.
        return match prefix[..bound.len()].cmp(bound) {
            Ordering::Less => Ordering::Less,
            _ => Ordering::Greater,
        };
    }
    prefix.cmp(&bound[..prefix.len()])
}

/// The smallest folded key greater than every key starting with `prefix`, or `None` when no
/// such key exists (the prefix is empty or made only of `char::MAX`).
pub(crate) fn prefix_successor(prefix: &[char]) -> Option<Folded> {
    let mut successor: Folded = prefix.into();
    while let Some(last) = successor.pop() {
        if let Some(next) = next_char(last) {
            successor.push(next);
            return Some(successor);
        }
    }
    None
}

fn next_char(c: char) -> Option<char> {
    match c {
        char::MAX => None,
        '\u{D7FF}' => Some('\u{E000}'),
        _ => char::from_u32(u32::from(c) + 1),
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::normalize::{CaseInsensitive, Exact};

    fn chars(s: &str) -> Folded {
        s.chars().collect()
    }

    #[test]
    fn full_range_contains_everything() {
        let bounds = Bounds::full();
        assert!(bounds.start().is_none() && bounds.end().is_none());
        assert!(bounds.contains(&chars("")));
        assert!(bounds.contains(&chars("zzz")));
    }

    #[test]
    fn sub_range_is_half_open() {
        let bounds = Bounds::full().sub::<Exact>("b", "d").expect("valid range");
        assert!(!bounds.contains(&chars("a")));
        assert!(bounds.contains(&chars("b")));
        assert!(bounds.contains(&chars("cz")));
        assert!(!bounds.contains(&chars("d")));
        assert!(bounds.too_low(&chars("az")));
        assert!(bounds.too_high(&chars("da")));
    }

    #[test]
    fn inverted_range_is_rejected() {
        assert_eq!(
            Bounds::full().sub::<Exact>("d", "b"),
            Err(Error::InvalidArgument("range start is greater than range end"))
        );
    }

    #[test]
    fn narrowing_cannot_widen() {
        let bounds = Bounds::full().sub::<Exact>("b", "d").expect("valid range");
        assert!(bounds.head::<Exact>("c").is_ok());
        assert!(bounds.head::<Exact>("d").is_ok());
        assert!(matches!(bounds.head::<Exact>("e"), Err(Error::KeyOutOfRange { .. })));
        assert!(matches!(bounds.head::<Exact>("a"), Err(Error::KeyOutOfRange { .. })));
        assert!(bounds.tail::<Exact>("b").is_ok());
        assert!(matches!(bounds.tail::<Exact>("d"), Err(Error::KeyOutOfRange { .. })));
        assert!(matches!(bounds.sub::<Exact>("a", "c"), Err(Error::KeyOutOfRange { .. })));
    }

    #[test]
    fn bounds_are_folded() {
        let bounds = Bounds::full().sub::<CaseInsensitive>("B", "D").expect("valid range");
        assert!(bounds.contains(&chars("c")));
        assert_eq!(bounds.start(), Some(&['b'][..]));
        assert_eq!(bounds.end(), Some(&['d'][..]));
    }

    #[test]
    fn prefix_successor_increments_last_char() {
        assert_eq!(prefix_successor(&chars("ab")), Some(chars("ac")));
        assert_eq!(prefix_successor(&chars("a\u{D7FF}")), Some(chars("a\u{E000}")));
        assert_eq!(prefix_successor(&chars("a\u{10FFFF}")), Some(chars("b")));
        assert_eq!(prefix_successor(&chars("\u{10FFFF}")), None);
        assert_eq!(prefix_successor(&chars("")), None);
    }

    #[test]
    fn prefix_bounds_cover_extensions_only() {
        let bounds = Bounds::prefix(chars("ab"));
        assert!(bounds.contains(&chars("ab")));
        assert!(bounds.contains(&chars("abzz")));
        assert!(!bounds.contains(&chars("aa")));
        assert!(!bounds.contains(&chars("ac")));
    }

    #[test]
    fn prefix_position_classifies_subtrees() {
        assert_eq!(prefix_position(&chars("ab"), &chars("b")), Ordering::Less);
        assert_eq!(prefix_position(&chars("ab"), &chars("aa")), Ordering::Greater);
        assert_eq!(prefix_position(&chars("ab"), &chars("ab")), Ordering::Greater);
        assert_eq!(prefix_position(&chars("ab"), &chars("a")), Ordering::Greater);
        assert_eq!(prefix_position(&chars("ab"), &chars("abc")), Ordering::Equal);
        assert_eq!(prefix_position(&chars("ab"), &chars("ac")), Ordering::Less);
    }
}
