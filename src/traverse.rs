use core::fmt::Write;

use arbitrary::Arbitrary;

use crate::{AvlTree, Dir, Link, NodeRef, Value};

/// The order in which a [`Traversal`] visits nodes.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Arbitrary)]
pub enum Order {
    /// Node, then left subtree, then right subtree.
    Pre,
    /// Left subtree, then node, then right subtree. Yields values in ascending order.
    In,
    /// Left subtree, then right subtree, then node.
    Post,
}

enum CameFrom {
    Parent,
    LeftChild,
    RightChild,
}

/// An iterator over the nodes of an [`AvlTree`] in a given [`Order`].
///
/// The walk follows parent links instead of keeping a stack, so it uses constant space.
pub struct Traversal<'tree> {
    tree: &'tree AvlTree,
    order: Order,

    cur: Link,
    from: CameFrom,

    len: usize,
}

impl<'tree> Traversal<'tree> {
    pub(crate) fn new(tree: &'tree AvlTree, order: Order) -> Self {
        Traversal {
            tree,
            order,

            cur: tree.root,
            from: CameFrom::Parent,
            len: tree.len(),
        }
    }
}

impl<'tree> Iterator for Traversal<'tree> {
    type Item = NodeRef<'tree>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.len == 0 {
            return None;
        }

        // Every node passes through each of the three states exactly once; it is yielded in the
        // state matching the traversal order.
        loop {
            let cur = self.cur?;
            let node = &self.tree[cur];

            let visit = match self.from {
                CameFrom::Parent => {
                    // Upon entering a new subtree, descend into its left child first.
                    match node.left() {
                        Some(left) => self.cur = Some(left),
                        None => self.from = CameFrom::LeftChild,
                    }

                    self.order == Order::Pre
                }

                CameFrom::LeftChild => {
                    // The left subtree has been exhausted; move on to the right one.
                    match node.right() {
                        Some(right) => {
                            self.cur = Some(right);
                            self.from = CameFrom::Parent;
                        }
                        None => self.from = CameFrom::RightChild,
                    }

                    self.order == Order::In
                }

                CameFrom::RightChild => {
                    // Both subtrees are exhausted, so ascend one level.
                    match node.parent() {
                        Some(parent) => {
                            self.from = match self.tree.which_child(parent, cur) {
                                Dir::Left => CameFrom::LeftChild,
                                Dir::Right => CameFrom::RightChild,
                            };
                            self.cur = Some(parent);
                        }
                        None => self.cur = None,
                    }

                    self.order == Order::Post
                }
            };

            if visit {
                self.len -= 1;
                return Some(NodeRef::new(self.tree, cur));
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.len, Some(self.len))
    }
}

impl ExactSizeIterator for Traversal<'_> {}

impl AvlTree {
    /// Returns an iterator over the nodes of the tree in `order`.
    pub fn traverse(&self, order: Order) -> Traversal<'_> {
        Traversal::new(self, order)
    }

    /// Returns an iterator over the values of the tree in ascending order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = Value> + '_ {
        self.traverse(Order::In).map(|node| node.value())
    }

    /// Returns the values of the tree in `order`.
    pub fn values(&self, order: Order) -> Vec<Value> {
        self.traverse(order).map(|node| node.value()).collect()
    }

    /// Renders the values of the tree in `order` as `"v1, v2, ..., vn"`.
    pub fn render(&self, order: Order) -> String {
        render(self.traverse(order).map(|node| node.value()))
    }
}

/// Joins `values` with `", "`.
pub fn render<I>(values: I) -> String
where
    I: IntoIterator<Item = Value>,
{
    let mut out = String::new();

    for (i, value) in values.into_iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        // Writing to a `String` cannot fail.
        let _ = write!(out, "{value}");
    }

    out
}
