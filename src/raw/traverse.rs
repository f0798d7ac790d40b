use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;
use core::cmp::Ordering;

use smallvec::SmallVec;

use super::bounds::{Bounds, prefix_position};
use super::node::{Link, Node, Slot};
use crate::normalize::Folded;

/// How far a frame's node has been visited.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Visit {
    /// Nothing visited yet; the lower subtree comes next.
    Fresh,
    /// Lower subtree done; the node itself and its equal subtree come next.
    LowerDone,
    /// Lower and equal subtrees done; the higher subtree comes next.
    EqualDone,
}

struct Frame<'a, V> {
    node: &'a Node<V>,
    visit: Visit,
}

impl<V> Clone for Frame<'_, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<V> Copy for Frame<'_, V> {}

type Stack<'a, V> = SmallVec<[Frame<'a, V>; 16]>;

/// A forward, in-order walk over a subtree.
///
/// The walk is a state machine over an explicit frame stack; `path` holds the folded
/// characters accumulated along equal-branch descents, so after [`next_slot`] returns it
/// spells the key of the returned slot. A walk is single-pass: build a new one to restart.
///
/// [`next_slot`]: Traversal::next_slot
pub(crate) struct Traversal<'a, V> {
    stack: Stack<'a, V>,
    path: Folded,
    /// Visited before the stack: the empty key, or the node that ends a matched prefix.
    head: Option<&'a Slot<V>>,
    bounds: Bounds,
    excluded: Option<Folded>,
}

impl<V> Clone for Traversal<'_, V> {
    fn clone(&self) -> Self {
        Traversal {
            stack: self.stack.clone(),
            path: self.path.clone(),
            head: self.head,
            bounds: self.bounds.clone(),
            excluded: self.excluded.clone(),
        }
    }
}

impl<'a, V> Traversal<'a, V> {
    /// A walk that yields nothing.
    pub(crate) fn empty() -> Self {
        Traversal {
            stack: Stack::new(),
            path: Folded::new(),
            head: None,
            bounds: Bounds::full(),
            excluded: None,
        }
    }

    /// Walks every key in `bounds`, starting with the empty key if present.
    pub(crate) fn new(root: &'a Link<V>, empty: Option<&'a Slot<V>>, bounds: Bounds) -> Self {
        let mut walk = Traversal::empty();
        walk.head = empty;
        walk.bounds = bounds;
        walk.push(root);
        walk
    }

    /// Walks the keys extending a matched prefix. `start` is the node consuming the last
    /// prefix character; `None` yields nothing.
    pub(crate) fn prefixed(start: Option<&'a Node<V>>, prefix: Folded) -> Self {
        let mut walk = Traversal::empty();
        if let Some(node) = start {
            walk.head = node.slot.as_ref();
            walk.path = prefix;
            walk.push(&node.equal);
        }
        walk
    }

    /// Walks every key that does not start with `prefix`.
    pub(crate) fn excluding(root: &'a Link<V>, empty: Option<&'a Slot<V>>, prefix: Folded) -> Self {
        let mut walk = Traversal::new(root, empty, Bounds::full());
        walk.excluded = Some(prefix);
        walk
    }

    /// The folded key of the slot most recently returned by [`next_slot`](Self::next_slot).
    pub(crate) fn path(&self) -> &[char] {
        &self.path
    }

    fn push(&mut self, link: &'a Link<V>) {
        if let Some(node) = link.as_deref() {
            self.stack.push(Frame {
                node,
                visit: Visit::Fresh,
            });
        }
    }

    fn finish(&mut self) {
        self.stack.clear();
        self.head = None;
    }

    fn is_excluded(&self, key: &[char]) -> bool {
        self.excluded.as_deref().is_some_and(|prefix| key.starts_with(prefix))
    }

    /// Checks a candidate key. Returns `None` once the walk has passed the upper bound.
    fn accept(&mut self) -> Option<bool> {
        if self.bounds.too_high(&self.path) {
            self.finish();
            return None;
        }
        Some(!self.bounds.too_low(&self.path) && !self.is_excluded(&self.path))
    }

    /// The character of the lower bound right after the current path, if the lower bound
    /// extends the path.
    fn start_char(&self) -> Option<char> {
        let start = self.bounds.start()?;
        (prefix_position(&self.path, start) == Ordering::Equal).then(|| start[self.path.len()])
    }

    /// Advances to the next value-bearing node in range.
    pub(crate) fn next_slot(&mut self) -> Option<&'a Slot<V>> {
        if let Some(slot) = self.head.take()
            && self.accept()?
        {
            return Some(slot);
        }

        loop {
            let top = self.stack.len().checked_sub(1)?;
            let Frame { node, visit } = self.stack[top];
            match visit {
                Visit::Fresh => {
                    // Every key below this frame starts with `path`.
                    if let Some(end) = self.bounds.end()
                        && prefix_position(&self.path, end) == Ordering::Greater
                    {
                        self.finish();
                        return None;
                    }
                    if self.bounds.start().is_some_and(|start| prefix_position(&self.path, start) == Ordering::Less)
                        || self.is_excluded(&self.path)
                    {
                        self.stack.pop();
                        continue;
                    }
                    self.stack[top].visit = Visit::LowerDone;
                    if self.start_char().is_none_or(|c| c < node.split) {
                        self.push(&node.lower);
                    }
                }
                Visit::LowerDone => {
                    self.stack[top].visit = Visit::EqualDone;
                    let skip = self.start_char().is_some_and(|c| c > node.split);
                    self.path.push(node.split);
                    if skip {
                        continue;
                    }
                    self.push(&node.equal);
                    if let Some(slot) = node.slot.as_ref()
                        && self.accept()?
                    {
                        return Some(slot);
                    }
                }
                Visit::EqualDone => {
                    self.path.pop();
                    self.stack.pop();
                    self.push(&node.higher);
                }
            }
        }
    }
}

enum WorkMut<'a, V> {
    Node(&'a mut Node<V>),
    Yield(&'a mut Slot<V>),
    Push(char),
    Pop,
}

/// A forward, in-order walk handing out mutable slots within `bounds`.
///
/// Each node is split into disjoint borrows of its fields as it is expanded, so the work
/// stack never holds two references to the same place.
pub(crate) struct TraversalMut<'a, V> {
    work: SmallVec<[WorkMut<'a, V>; 32]>,
    path: Folded,
    bounds: Bounds,
}

impl<'a, V> TraversalMut<'a, V> {
    pub(crate) fn new(root: &'a mut Link<V>, empty: Option<&'a mut Slot<V>>, bounds: Bounds) -> Self {
        let mut walk = TraversalMut {
            work: SmallVec::new(),
            path: Folded::new(),
            bounds,
        };
        if let Some(node) = root.as_deref_mut() {
            walk.work.push(WorkMut::Node(node));
        }
        if let Some(slot) = empty {
            walk.work.push(WorkMut::Yield(slot));
        }
        walk
    }

    pub(crate) fn path(&self) -> &[char] {
        &self.path
    }

    pub(crate) fn next_slot(&mut self) -> Option<&'a mut Slot<V>> {
        while let Some(item) = self.work.pop() {
            match item {
                WorkMut::Node(node) => {
                    if let Some(end) = self.bounds.end()
                        && prefix_position(&self.path, end) == Ordering::Greater
                    {
                        self.work.clear();
                        return None;
                    }
                    if self.bounds.start().is_some_and(|start| prefix_position(&self.path, start) == Ordering::Less) {
                        continue;
                    }
                    let Node {
                        split,
                        slot,
                        lower,
                        equal,
                        higher,
                        ..
                    } = node;
                    if let Some(higher) = higher.as_deref_mut() {
                        self.work.push(WorkMut::Node(higher));
                    }
                    self.work.push(WorkMut::Pop);
                    if let Some(equal) = equal.as_deref_mut() {
                        self.work.push(WorkMut::Node(equal));
                    }
                    if let Some(slot) = slot.as_mut() {
                        self.work.push(WorkMut::Yield(slot));
                    }
                    self.work.push(WorkMut::Push(*split));
                    if let Some(lower) = lower.as_deref_mut() {
                        self.work.push(WorkMut::Node(lower));
                    }
                }
                WorkMut::Yield(slot) => {
                    if self.bounds.too_high(&self.path) {
                        self.work.clear();
                        return None;
                    }
                    if !self.bounds.too_low(&self.path) {
                        return Some(slot);
                    }
                }
                WorkMut::Push(c) => self.path.push(c),
                WorkMut::Pop => {
                    self.path.pop();
                }
            }
        }
        None
    }
}

enum WorkOwned<V> {
    Node(Box<Node<V>>),
    Yield(Slot<V>),
    Push(char),
    Pop,
}

/// Dismantles a tree into its entries in ascending key order.
pub(crate) fn drain_sorted<V>(root: Link<V>, empty: Option<Slot<V>>, len: usize) -> Vec<(String, V)> {
    let mut entries = Vec::with_capacity(len);
    let mut path = Folded::new();
    let mut work: Vec<WorkOwned<V>> = Vec::new();
    if let Some(node) = root {
        work.push(WorkOwned::Node(node));
    }
    if let Some(slot) = empty {
        work.push(WorkOwned::Yield(slot));
    }

    while let Some(item) = work.pop() {
        match item {
            WorkOwned::Node(node) => {
                let Node {
                    split,
                    slot,
                    lower,
                    equal,
                    higher,
                    ..
                } = *node;
                if let Some(higher) = higher {
                    work.push(WorkOwned::Node(higher));
                }
                work.push(WorkOwned::Pop);
                if let Some(equal) = equal {
                    work.push(WorkOwned::Node(equal));
                }
                if let Some(slot) = slot {
                    work.push(WorkOwned::Yield(slot));
                }
                work.push(WorkOwned::Push(split));
                if let Some(lower) = lower {
                    work.push(WorkOwned::Node(lower));
                }
            }
            WorkOwned::Yield(slot) => {
                let key = slot.key_string(&path);
                entries.push((key, slot.value));
            }
            WorkOwned::Push(c) => path.push(c),
            WorkOwned::Pop => {
                path.pop();
            }
        }
    }
    entries
}
