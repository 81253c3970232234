//! An arena-backed AVL tree over integer values.
//!
//! Nodes live in a `Vec` owned by the tree and refer to their parent and children by index, so
//! upward walks during rebalancing and successor search are O(1) per step without shared
//! ownership.

// Conventions used in comments:
// - The height of an empty subtree is -1 and the height of a leaf is 0.
// - The balance factor of a node `x` is `h(right(x)) - h(left(x))`.
// - A node is "left-heavy" ("right-heavy") when its balance factor is -2 (+2).
//
// The invariants of the tree, checked by `assert_invariants`, are:
// 1. All values in the left subtree of `x` are less than `x`, all values in its right subtree
//    are greater.
// 2. All balance factors are -1, 0 or 1 once a public operation returns.
// 3. Every child's parent link points back at the node holding it; the root has no parent.
// 4. Every cached height equals the height recomputed from the subtree shape.
//
// A single insertion or removal changes one subtree height by at most one, so a balance factor
// of ±2 is the worst that can be observed while walking back up to the root.

use core::{
    cmp::Ordering,
    ops::{Index, IndexMut, Not},
};

mod debug;
mod error;
mod node;
mod search;
pub mod shell;
mod traverse;

#[cfg(any(test, feature = "model"))]
pub mod model;

#[cfg(test)]
mod tests;

pub use error::LookupError;
pub use node::NodeRef;
pub use search::Search;
pub use traverse::{render, Order, Traversal};

use node::{Node, NodeId};

/// The type of value stored in the tree.
pub type Value = i64;

type Link = Option<NodeId>;

/// The outcome of [`AvlTree::insert`].
#[must_use]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Insertion {
    /// The value was added to the tree.
    Inserted,
    /// The value was already present; the tree is unchanged.
    Duplicate,
}

impl Insertion {
    pub fn is_inserted(self) -> bool {
        self == Insertion::Inserted
    }
}

/// A self-balancing binary search tree of unique values.
///
/// Two-children removal promotes the in-order successor: its value is copied into the removed
/// node and the successor's own node is spliced out instead.
#[derive(Clone, Debug, Default)]
pub struct AvlTree {
    root: Link,
    nodes: Vec<Node>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Dir {
    Left = 0,
    Right = 1,
}

impl Not for Dir {
    type Output = Dir;

    fn not(self) -> Self::Output {
        match self {
            Dir::Left => Dir::Right,
            Dir::Right => Dir::Left,
        }
    }
}

impl AvlTree {
    /// Returns a new empty tree.
    pub const fn new() -> AvlTree {
        AvlTree {
            root: None,
            nodes: Vec::new(),
        }
    }

    /// Returns `true` if the tree contains no values.
    pub fn is_empty(&self) -> bool {
        let empty = self.nodes.is_empty();
        debug_assert_eq!(empty, self.root.is_none());
        empty
    }

    /// Returns the number of values in the tree.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns the height of the tree, or -1 if it is empty.
    pub fn height(&self) -> i32 {
        self.link_height(self.root)
    }

    /// Returns the root node.
    pub fn root(&self) -> Option<NodeRef<'_>> {
        self.view(self.root)
    }

    /// Returns the node holding `value`.
    pub fn get(&self, value: Value) -> Option<NodeRef<'_>> {
        self.view(self.find(value))
    }

    /// Returns `true` if the tree holds `value`.
    pub fn contains(&self, value: Value) -> bool {
        self.find(value).is_some()
    }

    /// Returns the minimum value of the tree.
    pub fn first(&self) -> Option<Value> {
        self.root
            .map(|root| self[self.extreme_in_subtree(root, Dir::Left)].value())
    }

    /// Returns the maximum value of the tree.
    pub fn last(&self) -> Option<Value> {
        self.root
            .map(|root| self[self.extreme_in_subtree(root, Dir::Right)].value())
    }

    /// Removes every value from the tree.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.root = None;
    }

    #[doc(hidden)]
    pub fn assert_invariants(&self) {
        let Some(root) = self.root else {
            assert!(self.nodes.is_empty(), "an empty tree must own no nodes");
            return;
        };

        assert_eq!(self[root].parent(), None, "root must not have a parent");

        let (_, reachable) = self.assert_invariants_at(root, None, None);
        assert_eq!(reachable, self.nodes.len(), "every node must be reachable from the root");
    }

    // Checks the subtree rooted at `node`, whose values must lie strictly between `lower` and
    // `upper`. Returns the recomputed height and the number of nodes in the subtree.
    fn assert_invariants_at(
        &self,
        node: NodeId,
        lower: Option<Value>,
        upper: Option<Value>,
    ) -> (i32, usize) {
        let value = self[node].value();

        if let Some(lower) = lower {
            assert!(lower < value, "{value} is out of order: must exceed {lower}");
        }
        if let Some(upper) = upper {
            assert!(value < upper, "{value} is out of order: must be below {upper}");
        }

        let mut heights = [-1; 2];
        let mut count = 1;

        for dir in [Dir::Left, Dir::Right] {
            if let Some(child) = self[node].child(dir) {
                // Ensure child's parent link points to this node.
                assert_eq!(
                    self[child].parent(),
                    Some(node),
                    "parent link of {} out of sync",
                    self[child].value()
                );

                let (lower, upper) = match dir {
                    Dir::Left => (lower, Some(value)),
                    Dir::Right => (Some(value), upper),
                };

                let (height, size) = self.assert_invariants_at(child, lower, upper);
                heights[dir as usize] = height;
                count += size;
            }
        }

        let height = 1 + heights[0].max(heights[1]);
        assert_eq!(self[node].height(), height, "stale cached height at {value}");

        let balance = heights[Dir::Right as usize] - heights[Dir::Left as usize];
        assert!(
            (-1..=1).contains(&balance),
            "{value} has balance factor {balance}"
        );

        (height, count)
    }

    fn view(&self, link: Link) -> Option<NodeRef<'_>> {
        link.map(|id| NodeRef::new(self, id))
    }

    fn find(&self, value: Value) -> Link {
        let mut opt_cur = self.root;

        loop {
            let cur = opt_cur?;

            match value.cmp(&self[cur].value()) {
                Ordering::Less => opt_cur = self[cur].left(),
                Ordering::Equal => return Some(cur),
                Ordering::Greater => opt_cur = self[cur].right(),
            }
        }
    }

    /// Inserts `value` into the tree.
    ///
    /// Inserting a value that is already present leaves the tree unchanged. This operation
    /// completes in _O(log(n))_ time.
    pub fn insert(&mut self, value: Value) -> Insertion {
        let Some(root) = self.root else {
            // Tree is empty. Set `value` as the root and return.
            let id = self.alloc(Node::leaf(value, None));
            self.root = Some(id);
            tracing::debug!(value, "inserted root");
            return Insertion::Inserted;
        };

        let mut parent = root;

        // Descend the tree, looking for an empty slot.
        loop {
            let dir = match value.cmp(&self[parent].value()) {
                Ordering::Less => Dir::Left,
                Ordering::Equal => {
                    tracing::debug!(value, "duplicate insert ignored");
                    return Insertion::Duplicate;
                }
                Ordering::Greater => Dir::Right,
            };

            match self[parent].child(dir) {
                // Descend.
                Some(child) => parent = child,

                // Set `value` as child.
                None => {
                    let id = self.alloc(Node::leaf(value, Some(parent)));
                    self[parent].set_child(dir, Some(id));
                    break;
                }
            }
        }

        self.rebalance_upward(Some(parent));
        tracing::debug!(value, len = self.len(), "inserted");

        Insertion::Inserted
    }

    /// Removes `value` from the tree, returning it.
    ///
    /// This operation completes in _O(log(n))_ time.
    pub fn remove(&mut self, value: Value) -> Result<Value, LookupError> {
        if self.is_empty() {
            return Err(LookupError::EmptyTree);
        }

        let node = self.find(value).ok_or(LookupError::NotFound(value))?;

        // A node with two children keeps its place and takes its successor's value; the
        // successor, which has no left child, is spliced out in its stead.
        let spliced = match (self[node].left(), self[node].right()) {
            (Some(_), Some(_)) => {
                let successor = self
                    .neighbor(node, Dir::Right)
                    .expect("a node with a right child has a successor");
                let successor_value = self[successor].value();
                self[node].set_value(successor_value);
                successor
            }
            _ => node,
        };

        let parent = self[spliced].parent();
        let child = self[spliced].left().or(self[spliced].right());

        // Elevate the spliced node's only child (which may be None).
        self.replace_child_or_set_root(parent, spliced, child);
        self.maybe_set_parent(child, parent);

        self.rebalance_upward(parent);
        self.release(spliced);

        tracing::debug!(value, len = self.len(), "removed");

        Ok(value)
    }

    // Walks from `start` up to the root, refreshing cached heights and rotating every node whose
    // balance factor has reached ±2.
    fn rebalance_upward(&mut self, start: Link) {
        let mut opt_cur = start;

        while let Some(cur) = opt_cur {
            self.update_height(cur);

            // After a rotation the walk continues above the subtree's new root.
            let top = match self.balance_factor(cur) {
                -2 => self.rebalance_at(cur, Dir::Left),
                2 => self.rebalance_at(cur, Dir::Right),
                _ => cur,
            };

            opt_cur = self[top].parent();
        }
    }

    // Restores balance at `node`, which is doubly heavy on the `heavy` side. Returns the node
    // that now occupies `node`'s former position.
    fn rebalance_at(&mut self, node: NodeId, heavy: Dir) -> NodeId {
        let child = self[node]
            .child(heavy)
            .expect("a doubly heavy node has a child on its heavy side");

        let outer = self.link_height(self[child].child(heavy));
        let inner = self.link_height(self[child].child(!heavy));

        if outer >= inner {
            self.rotate_at(node, child);
            child
        } else {
            let grandchild = self[child]
                .child(!heavy)
                .expect("a taller inner subtree is not empty");

            self.rotate_at(child, grandchild);
            self.rotate_at(node, grandchild);
            grandchild
        }
    }

    // Performs a rotation, moving `up` up and its parent `down` down.
    //
    // Heights of `down` and then `up` are recomputed; ancestors are left to the caller.
    fn rotate_at(&mut self, down: NodeId, up: NodeId) {
        debug_assert_eq!(self[up].parent(), Some(down));

        // - `down` becomes the `dir` child of `up`.
        // - `across` goes from the `dir` child of `up` to the `!dir` child of `down`.
        let dir = if self[down].right() == Some(up) {
            Dir::Left
        } else {
            Dir::Right
        };

        let across = self[up].child(dir);
        self[down].set_child(!dir, across);
        self.maybe_set_parent(across, Some(down));

        self[up].set_child(dir, Some(down));
        let parent = self[down].set_parent(Some(up));
        self[up].set_parent(parent);

        self.replace_child_or_set_root(parent, down, Some(up));

        self.update_height(down);
        self.update_height(up);

        tracing::trace!(
            pivot = self[down].value(),
            promoted = self[up].value(),
            direction = ?dir,
            "rotated"
        );
    }

    fn maybe_set_parent(&mut self, opt_node: Link, parent: Link) {
        let Some(node) = opt_node else {
            return;
        };

        self[node].set_parent(parent);
    }

    #[inline]
    fn replace_child_or_set_root(&mut self, parent: Link, old_child: NodeId, new_child: Link) {
        match parent {
            Some(parent) => self.replace_child(parent, old_child, new_child),
            None => self.root = new_child,
        }
    }

    // Replaces the child link of `parent` pointing at `old_child` with `new_child`.
    //
    // `new_child`'s parent link is not updated.
    fn replace_child(&mut self, parent: NodeId, old_child: NodeId, new_child: Link) {
        let dir = self.which_child(parent, old_child);
        debug_assert_eq!(
            self[parent].child(dir),
            Some(old_child),
            "`old_child` must be a child of `parent`"
        );

        self[parent].set_child(dir, new_child);
    }

    // Returns the node following (`Dir::Right`) or preceding (`Dir::Left`) `node` in order.
    fn neighbor(&self, node: NodeId, dir: Dir) -> Link {
        if let Some(child) = self[node].child(dir) {
            return Some(self.extreme_in_subtree(child, !dir));
        }

        // Ascend until `cur` hangs on the opposite side of its parent.
        let mut cur = node;
        while let Some(parent) = self[cur].parent() {
            if self.which_child(parent, cur) == !dir {
                return Some(parent);
            }
            cur = parent;
        }

        None
    }

    // Returns the furthest node in direction `dir` of the subtree rooted at `root`.
    fn extreme_in_subtree(&self, root: NodeId, dir: Dir) -> NodeId {
        let mut cur = root;

        while let Some(child) = self[cur].child(dir) {
            cur = child;
        }

        cur
    }

    // Support methods ========================================================

    fn alloc(&mut self, node: Node) -> NodeId {
        let id = NodeId::new(self.nodes.len());
        self.nodes.push(node);
        id
    }

    // Frees the slot of the detached node `id`.
    //
    // The last node of the arena is moved into the freed slot and every link to it is redirected.
    fn release(&mut self, id: NodeId) {
        let last = NodeId::new(self.nodes.len() - 1);
        self.nodes.swap_remove(id.index());

        if id != last {
            let parent = self[id].parent();
            self.replace_child_or_set_root(parent, last, Some(id));

            for child in self[id].children().into_iter().flatten() {
                self[child].set_parent(Some(id));
            }
        }
    }

    /// Returns the cached height of the linked node, or -1 for an empty link.
    #[inline]
    fn link_height(&self, link: Link) -> i32 {
        link.map(|id| self[id].height()).unwrap_or(-1)
    }

    #[inline]
    fn update_height(&mut self, node: NodeId) {
        let left = self.link_height(self[node].left());
        let right = self.link_height(self[node].right());
        self[node].set_height(1 + left.max(right));
    }

    #[inline]
    fn balance_factor(&self, node: NodeId) -> i32 {
        self.link_height(self[node].right()) - self.link_height(self[node].left())
    }

    #[inline]
    fn which_child(&self, parent: NodeId, child: NodeId) -> Dir {
        if self[parent].left() == Some(child) {
            Dir::Left
        } else {
            Dir::Right
        }
    }
}

impl Index<NodeId> for AvlTree {
    type Output = Node;

    #[inline]
    fn index(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }
}

impl IndexMut<NodeId> for AvlTree {
    #[inline]
    fn index_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.index()]
    }
}
