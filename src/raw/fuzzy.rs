use alloc::string::String;
use alloc::vec::Vec;

use super::node::{Link, Slot};
use crate::normalize::Folded;

/// Bounded approximate search over a subtree.
///
/// Lower and higher siblings are explored at the same query index and budget. Descending an
/// equal branch advances the index and costs one unit of budget unless the node's character
/// equals the query character at that index. A key is reported when its node is reached with
/// budget to spare and its length is within `tolerance` of the query length.
struct Search<'q> {
    query: &'q [char],
    tolerance: usize,
    /// Deepest index worth visiting: `query.len() + tolerance`.
    limit: usize,
    path: Folded,
    hits: Vec<String>,
}

impl Search<'_> {
    fn walk<V>(&mut self, link: &Link<V>, index: usize, budget: usize) {
        let Some(node) = link.as_deref() else {
            return;
        };
        if index >= self.limit {
            return;
        }

        self.walk(&node.lower, index, budget);

        let cost = usize::from(self.query.get(index) != Some(&node.split));
        if let Some(remaining) = budget.checked_sub(cost) {
            self.path.push(node.split);
            if let Some(slot) = &node.slot
                && self.query.len().abs_diff(index + 1) <= self.tolerance
            {
                self.hits.push(slot.key_string(&self.path));
            }
            self.walk(&node.equal, index + 1, remaining);
            self.path.pop();
        }

        self.walk(&node.higher, index, budget);
    }
}

/// Collects the reported keys of every slot within `max_distance` of the folded `query`.
pub(crate) fn match_almost<V>(
    root: &Link<V>,
    empty: Option<&Slot<V>>,
    query: &[char],
    max_distance: usize,
    tolerance: usize,
) -> Vec<String> {
    let mut search = Search {
        query,
        tolerance,
        limit: query.len().saturating_add(tolerance),
        path: Folded::new(),
        hits: Vec::new(),
    };
    if let Some(slot) = empty
        && query.len() <= tolerance
    {
        search.hits.push(slot.key_string(&[]));
    }
    search.walk(root, 0, max_distance);
    tracing::trace!(
        query_len = query.len(),
        max_distance,
        tolerance,
        hits = search.hits.len(),
        "approximate search finished"
    );
    search.hits
}
