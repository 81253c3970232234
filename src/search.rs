use core::cmp::Ordering;

use crate::{node::NodeId, AvlTree, Link, LookupError, NodeRef, Value};

/// The result of [`AvlTree::search`]: the node found, if any, and the nodes visited on the way.
#[derive(Clone, Debug)]
pub struct Search<'tree> {
    tree: &'tree AvlTree,
    value: Value,
    found: Link,
    path: Vec<NodeId>,
}

impl<'tree> Search<'tree> {
    /// Returns the value that was searched for.
    pub fn value(&self) -> Value {
        self.value
    }

    /// Returns the node holding the searched value.
    pub fn node(&self) -> Option<NodeRef<'tree>> {
        self.found.map(|id| NodeRef::new(self.tree, id))
    }

    pub fn is_found(&self) -> bool {
        self.found.is_some()
    }

    /// Returns the visited nodes, from the root down to the found node or the last node examined.
    pub fn path(&self) -> impl ExactSizeIterator<Item = NodeRef<'tree>> + '_ {
        self.path.iter().map(|&id| NodeRef::new(self.tree, id))
    }

    /// Returns the values of the visited nodes, in visiting order.
    pub fn path_values(&self) -> Vec<Value> {
        self.path().map(|node| node.value()).collect()
    }

    /// Converts the search into the found node, or why there is none.
    pub fn into_result(self) -> Result<NodeRef<'tree>, LookupError> {
        match self.found {
            Some(id) => Ok(NodeRef::new(self.tree, id)),
            None if self.path.is_empty() => Err(LookupError::EmptyTree),
            None => Err(LookupError::NotFound(self.value)),
        }
    }
}

impl AvlTree {
    /// Searches the tree for `value`, recording every node visited.
    ///
    /// The descent goes right while the current value is smaller than `value` and left while it
    /// is larger, so the path ends either at the node holding `value` or at the last node before
    /// an empty slot.
    pub fn search(&self, value: Value) -> Search<'_> {
        let mut path = Vec::new();
        let mut opt_cur = self.root;

        let found = loop {
            let Some(cur) = opt_cur else {
                break None;
            };

            path.push(cur);

            match self[cur].value().cmp(&value) {
                Ordering::Equal => break Some(cur),
                Ordering::Less => opt_cur = self[cur].right(),
                Ordering::Greater => opt_cur = self[cur].left(),
            }
        };

        Search {
            tree: self,
            value,
            found,
            path,
        }
    }
}
