//! Ternary search tree collections keyed by strings.
//!
//! This crate provides [`TstMap`] and [`TstSet`], ordered collections whose keys are
//! character sequences. Besides the usual `BTreeMap`-style operations they support:
//!
//! - Prefix queries: [`prefix_iter`](TstMap::prefix_iter),
//!   [`prefix_iter_excluding`](TstMap::prefix_iter_excluding) and
//!   [`prefix_match`](TstMap::prefix_match)
//! - Fuzzy lookup with [`match_almost`](TstMap::match_almost)
//! - Order statistics: [`get_by_rank`](TstMap::get_by_rank), [`index_of`](TstMap::index_of)
//!   and indexing by [`Rank`]
//! - Bounded views ([`SubMap`](tst_map::SubMap), [`SubMapMut`](tst_map::SubMapMut)) that
//!   reject writes outside their range
//! - Pluggable key folding through [`KeyNormalizer`], with a ready-made
//!   [`CaseInsensitive`] normalizer
//!
//! # Example
//!
//! ```
//! use tst_tree::{Rank, TstMap};
//!
//! let mut capitals = TstMap::new();
//! capitals.insert("sverige", "Stockholm");
//! capitals.insert("deutschland", "Berlin");
//! capitals.insert("england", "London");
//!
//! assert_eq!(capitals.get("england"), Some(&"London"));
//! assert_eq!(capitals.key_at(0).as_deref(), Ok("deutschland"));
//! assert_eq!(capitals.index_of("sverige"), Some(2));
//! assert_eq!(capitals[Rank(1)], "London");
//!
//! let s: Vec<String> = capitals.prefix_iter("s").map(|(key, _)| key).collect();
//! assert_eq!(s, ["sverige"]);
//! ```
//!
//! # Implementation
//!
//! Every node of the tree holds one character and three children: keys whose character at
//! that depth is smaller, equal or larger. Each node also records how many keys its
//! subtree holds, which makes rank queries proportional to the depth of the tree rather
//! than the number of keys.

#![no_std]
// These forbid rules and lint groups are meant to be very restrictive.
#![forbid(unsafe_code)]
#![forbid(keyword_idents)]
#![forbid(non_ascii_idents)]
#![forbid(unreachable_pub)]
#![warn(clippy::all)]
#![warn(clippy::cargo)]
#![warn(clippy::pedantic)]
// Enable coverage attributes for nightly builds.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

extern crate alloc;

mod error;
mod normalize;
mod order_statistic;
mod raw;

pub mod tst_map;
pub mod tst_set;

pub use error::{Error, Result};
pub use normalize::{CaseInsensitive, Exact, KeyNormalizer};
pub use order_statistic::Rank;
pub use tst_map::{CaseInsensitiveMap, TstMap};
pub use tst_set::{CaseInsensitiveSet, TstSet};
