use alloc::borrow::Cow;
use alloc::boxed::Box;
use alloc::string::{String, ToString};
use core::any::Any;

use smallvec::SmallVec;

use crate::error::{Error, Result};

/// A key after normalization: one folded `char` per tree level.
pub(crate) type Folded = SmallVec<[char; 24]>;

/// Strategy applied to every key character before it is compared or stored.
///
/// A collection folds each character of a key through [`fold`](KeyNormalizer::fold) at
/// every boundary: insertion, lookup, range bounds, prefix walks and fuzzy matching. Two
/// keys that fold to the same sequence are the same key.
///
/// Implementations must be pure: folding the same character must always produce the same
/// result, otherwise the ordering invariants of the tree are violated.
///
/// # Examples
///
/// ```
/// use tst_tree::{KeyNormalizer, TstMap};
///
/// /// Treats `-` and `_` as the same separator.
/// struct Separators;
///
/// impl KeyNormalizer for Separators {
///     fn fold(c: char) -> char {
///         if c == '-' { '_' } else { c }
///     }
/// }
///
/// let mut map: TstMap<u32, Separators> = TstMap::with_normalizer();
/// map.insert("snake_case", 1);
/// assert_eq!(map.get("snake-case"), Some(&1));
/// // The most recently inserted spelling is the one reported back.
/// assert_eq!(map.first_key().as_deref(), Some("snake_case"));
/// ```
pub trait KeyNormalizer {
    /// `true` when [`fold`](KeyNormalizer::fold) returns its argument unchanged, so keys
    /// can be rebuilt from the tree path instead of being stored alongside their values.
    const IDENTITY: bool = false;

    /// Maps a key character to the character used for ordering and storage.
    fn fold(c: char) -> char;
}

/// Code-point ordering with no folding. This is the default normalizer.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub struct Exact;

impl KeyNormalizer for Exact {
    const IDENTITY: bool = true;

    #[inline]
    fn fold(c: char) -> char {
        c
    }
}

/// Case-insensitive ordering and lookup.
///
/// Characters are folded to lower case when the lower-case mapping is a single character;
/// characters whose lower-case form expands to several characters are kept as-is. Keys are
/// reported back in the casing they were most recently inserted with.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub struct CaseInsensitive;

impl KeyNormalizer for CaseInsensitive {
    #[inline]
    fn fold(c: char) -> char {
        if c.is_ascii() {
            return c.to_ascii_lowercase();
        }
        let mut lower = c.to_lowercase();
        match (lower.next(), lower.next()) {
            (Some(folded), None) => folded,
            _ => c,
        }
    }
}

pub(crate) fn fold_key<N: KeyNormalizer>(key: &str) -> Folded {
    key.chars().map(N::fold).collect()
}

/// The key a slot reports: the stored spelling, or the folded path for identity normalizers.
pub(crate) fn display_key<N: KeyNormalizer>(key: &str) -> Option<Box<str>> {
    (!N::IDENTITY).then(|| Box::from(key))
}

/// Views a dynamically typed key as a string, if its type is one of the string types.
pub(crate) fn any_key(key: &dyn Any) -> Result<Cow<'_, str>> {
    if let Some(s) = key.downcast_ref::<String>() {
        Ok(Cow::Borrowed(s.as_str()))
    } else if let Some(s) = key.downcast_ref::<&'static str>() {
        Ok(Cow::Borrowed(s))
    } else if let Some(s) = key.downcast_ref::<Box<str>>() {
        Ok(Cow::Borrowed(s))
    } else if let Some(s) = key.downcast_ref::<Cow<'static, str>>() {
        Ok(Cow::Borrowed(s.as_ref()))
    } else if let Some(c) = key.downcast_ref::<char>() {
        Ok(Cow::Owned(c.to_string()))
    } else {
        Err(Error::IncomparableKey)
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use core::cmp::Ordering;
    use proptest::prelude::*;

    fn compare<N: KeyNormalizer>(a: &str, b: &str) -> Ordering {
        a.chars().map(N::fold).cmp(b.chars().map(N::fold))
    }

    #[test]
    fn case_insensitive_folds_ascii_and_unicode() {
        assert_eq!(CaseInsensitive::fold('A'), 'a');
        assert_eq!(CaseInsensitive::fold('z'), 'z');
        assert_eq!(CaseInsensitive::fold('Ä'), 'ä');
        assert_eq!(CaseInsensitive::fold('Σ'), 'σ');
        // 'İ' lower-cases to two characters and is left alone.
        assert_eq!(CaseInsensitive::fold('İ'), 'İ');
    }

    #[test]
    fn any_key_accepts_string_types_only() {
        assert_eq!(any_key(&String::from("abc")).as_deref(), Ok("abc"));
        assert_eq!(any_key(&"abc").as_deref(), Ok("abc"));
        assert_eq!(any_key(&Box::<str>::from("abc")).as_deref(), Ok("abc"));
        assert_eq!(any_key(&'x').as_deref(), Ok("x"));
        assert_eq!(any_key(&42_u32).unwrap_err(), Error::IncomparableKey);
    }

    proptest! {
        #[test]
        fn exact_compare_matches_str_order(a in "\\PC{0,8}", b in "\\PC{0,8}") {
            prop_assert_eq!(compare::<Exact>(&a, &b), a.cmp(&b));
        }

        #[test]
        fn case_insensitive_compare_ignores_ascii_case(a in "[a-zA-Z]{0,8}") {
            let upper = a.to_ascii_uppercase();
            prop_assert_eq!(compare::<CaseInsensitive>(&a, &upper), Ordering::Equal);
        }
    }
}
