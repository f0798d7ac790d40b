use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;

/// An owned child link. `None` is an empty subtree.
pub(crate) type Link<V> = Option<Box<Node<V>>>;

/// The three ways to leave a node.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Branch {
    /// Next key character sorts before the split character.
    Lower,
    /// Next key character equals the split character; the key index advances.
    Equal,
    /// Next key character sorts after the split character.
    Higher,
}

/// The value stored at the node terminating a key.
#[derive(Clone, Debug)]
pub(crate) struct Slot<V> {
    pub(crate) value: V,
    /// The key as most recently inserted. Only kept for folding normalizers, where the
    /// tree path no longer spells the caller's key.
    pub(crate) key: Option<Box<str>>,
}

impl<V> Slot<V> {
    pub(crate) fn new(value: V, key: Option<Box<str>>) -> Self {
        Slot { value, key }
    }

    /// The key to report for this slot, given the folded path that leads to it.
    pub(crate) fn key_string(&self, path: &[char]) -> String {
        match &self.key {
            Some(key) => String::from(&**key),
            None => path.iter().collect(),
        }
    }
}

/// A ternary search tree node.
#[derive(Debug)]
pub(crate) struct Node<V> {
    pub(crate) split: char,
    pub(crate) slot: Option<Slot<V>>,
    /// Number of value-bearing nodes in the subtree rooted here, this node included.
    pub(crate) size: usize,
    pub(crate) lower: Link<V>,
    pub(crate) equal: Link<V>,
    pub(crate) higher: Link<V>,
}

impl<V> Node<V> {
    pub(crate) const fn new(split: char) -> Self {
        Node {
            split,
            slot: None,
            size: 0,
            lower: None,
            equal: None,
            higher: None,
        }
    }

    /// `1` if this node terminates a key, `0` otherwise.
    #[inline]
    pub(crate) const fn own(&self) -> usize {
        if self.slot.is_some() { 1 } else { 0 }
    }

    #[inline]
    pub(crate) fn child(&self, branch: Branch) -> &Link<V> {
        match branch {
            Branch::Lower => &self.lower,
            Branch::Equal => &self.equal,
            Branch::Higher => &self.higher,
        }
    }

    #[inline]
    pub(crate) fn child_mut(&mut self, branch: Branch) -> &mut Link<V> {
        match branch {
            Branch::Lower => &mut self.lower,
            Branch::Equal => &mut self.equal,
            Branch::Higher => &mut self.higher,
        }
    }

    pub(crate) fn child_count(&self) -> usize {
        [&self.lower, &self.equal, &self.higher].iter().filter(|link| link.is_some()).count()
    }

    /// `true` when the node holds neither a value nor children.
    pub(crate) fn is_dangling(&self) -> bool {
        self.slot.is_none() && self.child_count() == 0
    }
}

/// The subtree size behind a link.
#[inline]
pub(crate) fn size_of<V>(link: &Link<V>) -> usize {
    link.as_ref().map_or(0, |node| node.size)
}

/// Deep-copies a subtree with an explicit work stack, building each node after its
/// children.
pub(crate) fn clone_link<V: Clone>(link: &Link<V>) -> Link<V> {
    enum Work<'a, V> {
        Visit(&'a Link<V>),
        Build(&'a Node<V>),
    }

    let mut work = vec![Work::Visit(link)];
    let mut built: Vec<Link<V>> = Vec::new();
    while let Some(item) = work.pop() {
        match item {
            Work::Visit(link) => match link.as_deref() {
                None => built.push(None),
                Some(node) => {
                    work.push(Work::Build(node));
                    work.push(Work::Visit(&node.higher));
                    work.push(Work::Visit(&node.equal));
                    work.push(Work::Visit(&node.lower));
                }
            },
            Work::Build(node) => {
                let higher = built.pop().flatten();
                let equal = built.pop().flatten();
                let lower = built.pop().flatten();
                built.push(Some(Box::new(Node {
                    split: node.split,
                    slot: node.slot.clone(),
                    size: node.size,
                    lower,
                    equal,
                    higher,
                })));
            }
        }
    }
    built.pop().flatten()
}

/// Frees a subtree node by node, detaching children first so no drop recurses.
pub(crate) fn dismantle<V>(link: Link<V>) {
    let mut work: Vec<Box<Node<V>>> = link.into_iter().collect();
    while let Some(mut node) = work.pop() {
        work.extend([node.lower.take(), node.equal.take(), node.higher.take()].into_iter().flatten());
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use static_assertions::assert_eq_size;

    // Child links rely on the null-pointer niche of `Box`.
    assert_eq_size!(Link<u64>, Box<Node<u64>>);

    #[test]
    fn fresh_node_is_dangling() {
        let node: Node<u8> = Node::new('a');
        assert!(node.is_dangling());
        assert_eq!(node.own(), 0);
        assert_eq!(node.child_count(), 0);
    }

    #[test]
    fn children_are_addressed_by_branch() {
        let mut node: Node<u8> = Node::new('m');
        *node.child_mut(Branch::Lower) = Some(Box::new(Node::new('a')));
        *node.child_mut(Branch::Higher) = Some(Box::new(Node::new('z')));

        assert_eq!(node.child(Branch::Lower).as_ref().map(|n| n.split), Some('a'));
        assert!(node.child(Branch::Equal).is_none());
        assert_eq!(node.child(Branch::Higher).as_ref().map(|n| n.split), Some('z'));
        assert_eq!(node.child_count(), 2);
        assert!(!node.is_dangling());
    }

    /// A single key of `len` characters, stored as a bare chain of equal links.
    fn chain(len: usize) -> Link<u8> {
        let mut link: Link<u8> = None;
        for i in 0..len {
            let mut node = Node::new('a');
            if i == 0 {
                node.slot = Some(Slot::new(7, None));
            }
            node.size = 1;
            node.equal = link;
            link = Some(Box::new(node));
        }
        link
    }

    #[test]
    fn long_chains_clone_and_free_without_recursion() {
        let original = chain(200_000);
        let copy = clone_link(&original);

        let mut depth = 0;
        let mut link = &copy;
        while let Some(node) = link.as_deref() {
            depth += 1;
            assert_eq!(node.size, 1);
            if node.equal.is_none() {
                assert_eq!(node.slot.as_ref().map(|slot| slot.value), Some(7));
            }
            link = &node.equal;
        }
        assert_eq!(depth, 200_000);

        dismantle(original);
        dismantle(copy);
    }

    #[test]
    fn clone_keeps_branch_shape() {
        let mut root: Node<u8> = Node::new('m');
        root.slot = Some(Slot::new(1, None));
        root.lower = Some(Box::new(Node::new('a')));
        root.higher = Some(Box::new(Node::new('z')));
        let copy = clone_link(&Some(Box::new(root)));

        let copy = copy.as_deref().expect("cloned root");
        assert_eq!(copy.split, 'm');
        assert_eq!(copy.slot.as_ref().map(|slot| slot.value), Some(1));
        assert_eq!(copy.lower.as_ref().map(|n| n.split), Some('a'));
        assert!(copy.equal.is_none());
        assert_eq!(copy.higher.as_ref().map(|n| n.split), Some('z'));
    }
}
