use core::{fmt, mem};

use crate::{AvlTree, Dir, Link, Value};

/// Index of a node in its tree's arena.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(u32);

impl NodeId {
    #[inline]
    pub(crate) fn new(index: usize) -> NodeId {
        NodeId(u32::try_from(index).expect("arena index exceeds u32::MAX"))
    }

    #[inline]
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

/// Arena slot: the stored value plus its structural links.
#[derive(Clone, Debug)]
pub struct Node {
    value: Value,
    parent: Link,
    children: [Link; 2],
    height: i32,
}

impl Node {
    /// Returns a detached leaf holding `value`.
    pub(crate) const fn leaf(value: Value, parent: Link) -> Node {
        Node {
            value,
            parent,
            children: [None; 2],
            height: 0,
        }
    }

    #[inline]
    pub(crate) fn value(&self) -> Value {
        self.value
    }

    #[inline]
    pub(crate) fn set_value(&mut self, value: Value) -> Value {
        mem::replace(&mut self.value, value)
    }

    #[inline]
    pub(crate) fn height(&self) -> i32 {
        self.height
    }

    #[inline]
    pub(crate) fn set_height(&mut self, height: i32) {
        self.height = height;
    }

    #[inline]
    pub(crate) fn parent(&self) -> Link {
        self.parent
    }

    #[inline]
    pub(crate) fn children(&self) -> [Link; 2] {
        self.children
    }

    #[inline]
    pub(crate) fn child(&self, dir: Dir) -> Link {
        self.children[dir as usize]
    }

    #[inline]
    pub(crate) fn left(&self) -> Link {
        self.child(Dir::Left)
    }

    #[inline]
    pub(crate) fn right(&self) -> Link {
        self.child(Dir::Right)
    }

    #[inline]
    pub(crate) fn set_parent(&mut self, parent: Link) -> Link {
        mem::replace(&mut self.parent, parent)
    }

    #[inline]
    pub(crate) fn set_child(&mut self, dir: Dir, child: Link) -> Link {
        mem::replace(&mut self.children[dir as usize], child)
    }
}

/// A read-only view of a node in an [`AvlTree`].
///
/// Views borrow the tree, so they cannot outlive a structural change.
#[derive(Copy, Clone)]
pub struct NodeRef<'tree> {
    tree: &'tree AvlTree,
    id: NodeId,
}

impl<'tree> NodeRef<'tree> {
    pub(crate) fn new(tree: &'tree AvlTree, id: NodeId) -> NodeRef<'tree> {
        NodeRef { tree, id }
    }

    #[inline]
    fn node(&self) -> &'tree Node {
        &self.tree[self.id]
    }

    #[inline]
    fn view(&self, link: Link) -> Option<NodeRef<'tree>> {
        link.map(|id| NodeRef::new(self.tree, id))
    }

    /// Returns the stored value.
    pub fn value(&self) -> Value {
        self.node().value()
    }

    /// Returns the height of the subtree rooted at this node. Leaves have height 0.
    pub fn height(&self) -> i32 {
        self.node().height()
    }

    /// Returns `height(right) - height(left)`.
    pub fn balance_factor(&self) -> i32 {
        self.tree.balance_factor(self.id)
    }

    pub fn parent(&self) -> Option<NodeRef<'tree>> {
        self.view(self.node().parent())
    }

    pub fn left(&self) -> Option<NodeRef<'tree>> {
        self.view(self.node().left())
    }

    pub fn right(&self) -> Option<NodeRef<'tree>> {
        self.view(self.node().right())
    }

    /// Returns the node holding the next larger value.
    pub fn successor(&self) -> Option<NodeRef<'tree>> {
        self.view(self.tree.neighbor(self.id, Dir::Right))
    }

    /// Returns the node holding the next smaller value.
    pub fn predecessor(&self) -> Option<NodeRef<'tree>> {
        self.view(self.tree.neighbor(self.id, Dir::Left))
    }
}

impl PartialEq for NodeRef<'_> {
    fn eq(&self, other: &Self) -> bool {
        core::ptr::eq(self.tree, other.tree) && self.id == other.id
    }
}

impl Eq for NodeRef<'_> {}

impl fmt::Debug for NodeRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeRef")
            .field("value", &self.value())
            .field("height", &self.height())
            .finish()
    }
}

impl fmt::Display for NodeRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.value(), f)
    }
}
