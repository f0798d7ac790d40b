mod bounds;
mod fuzzy;
mod node;
mod raw_tst_map;
mod traverse;

pub(crate) use bounds::Bounds;
pub(crate) use raw_tst_map::RawTstMap;
pub(crate) use traverse::{Traversal, TraversalMut};
