//! Model-based checking: replays operations against both an [`AvlTree`] and a
//! [`BTreeSet`], asserting that every observable result agrees.

use std::collections::BTreeSet;

use arbitrary::Arbitrary;
use proptest::strategy::{Just, Strategy};

use crate::{AvlTree, Insertion, LookupError, Order, Value};

#[derive(Copy, Clone, Debug, Arbitrary)]
pub enum ItemValue {
    /// Picks a value currently in the tree (modulo its length), so removals and searches hit.
    Index(usize),
    Random(i16),
}

proptest::prop_compose! {
    fn index_strategy()(
        index in 0usize..1000,
    ) -> ItemValue {
        ItemValue::Index(index)
    }
}

proptest::prop_compose! {
    fn random_strategy()(
        random in -500i16..500,
    ) -> ItemValue {
        ItemValue::Random(random)
    }
}

fn value_strategy() -> impl Strategy<Value = ItemValue> {
    proptest::prop_oneof![index_strategy(), random_strategy()]
}

fn order_strategy() -> impl Strategy<Value = Order> {
    proptest::prop_oneof![Just(Order::Pre), Just(Order::In), Just(Order::Post)]
}

#[derive(Copy, Clone, Debug, Arbitrary)]
pub enum Op {
    Insert(ItemValue),
    Search(ItemValue),
    Remove(ItemValue),
    First,
    Last,
    Traverse(Order),
    Clear,
}

impl Op {
    fn finalize(self, sorted: &[Value]) -> FinalOp {
        fn get_value(v: &[Value], i: ItemValue) -> Value {
            match i {
                ItemValue::Index(idx) => {
                    if v.is_empty() {
                        idx as Value
                    } else {
                        v[idx % v.len()]
                    }
                }
                ItemValue::Random(v) => v.into(),
            }
        }

        match self {
            Op::Insert(item) => FinalOp::Insert(get_value(sorted, item)),
            Op::Search(item) => FinalOp::Search(get_value(sorted, item)),
            Op::Remove(item) => FinalOp::Remove(get_value(sorted, item)),
            Op::First => FinalOp::First,
            Op::Last => FinalOp::Last,
            Op::Traverse(order) => FinalOp::Traverse(order),
            Op::Clear => FinalOp::Clear,
        }
    }
}

#[derive(Copy, Clone, Debug)]
enum FinalOp {
    Insert(Value),
    Search(Value),
    Remove(Value),
    First,
    Last,
    Traverse(Order),
    Clear,
}

pub fn op_strategy() -> impl Strategy<Value = Op> {
    // Clearing is rare so that trees get a chance to grow.
    proptest::prop_oneof![
        4 => value_strategy().prop_map(Op::Insert),
        2 => value_strategy().prop_map(Op::Search),
        3 => value_strategy().prop_map(Op::Remove),
        1 => Just(Op::First),
        1 => Just(Op::Last),
        1 => order_strategy().prop_map(Op::Traverse),
        1 => Just(Op::Clear),
    ]
}

// Recursive reference traversal over the tree's node views.
fn expected_traversal(tree: &AvlTree, order: Order) -> Vec<Value> {
    fn walk(node: Option<crate::NodeRef<'_>>, order: Order, out: &mut Vec<Value>) {
        let Some(node) = node else {
            return;
        };

        if order == Order::Pre {
            out.push(node.value());
        }
        walk(node.left(), order, out);
        if order == Order::In {
            out.push(node.value());
        }
        walk(node.right(), order, out);
        if order == Order::Post {
            out.push(node.value());
        }
    }

    let mut out = Vec::with_capacity(tree.len());
    walk(tree.root(), order, &mut out);
    out
}

pub fn run_btree_equivalence(ops: Vec<Op>) {
    let mut sorted_values = Vec::with_capacity(ops.len());
    let mut btree = BTreeSet::new();
    let mut avl = AvlTree::new();

    fn insert_sorted(v: &mut Vec<Value>, value: Value) {
        if let Err(idx) = v.binary_search(&value) {
            v.insert(idx, value);
        }
    }

    fn remove_sorted(v: &mut Vec<Value>, value: Value) {
        if let Ok(idx) = v.binary_search(&value) {
            v.remove(idx);
        }
    }

    for (op_id, op) in ops.into_iter().enumerate() {
        let final_op = op.finalize(&sorted_values);

        match final_op {
            FinalOp::Insert(value) => {
                insert_sorted(&mut sorted_values, value);

                let from_btree = if btree.insert(value) {
                    Insertion::Inserted
                } else {
                    Insertion::Duplicate
                };
                let from_avl = avl.insert(value);

                assert_eq!(from_btree, from_avl, "FinalOp #{op_id}: {final_op:?}");
                assert!(avl.contains(value), "FinalOp #{op_id}: {final_op:?}");
            }

            FinalOp::Search(value) => {
                let from_btree = btree.get(&value).copied();
                let search = avl.search(value);
                let from_avl = search.node().map(|node| node.value());

                assert_eq!(from_btree, from_avl, "FinalOp #{op_id}: {final_op:?}");

                // The path is the root-to-result descent: it starts at the root and every step
                // moves towards the searched value.
                let path = search.path_values();
                assert_eq!(path.first().copied(), avl.root().map(|r| r.value()));
                for pair in path.windows(2) {
                    let (from, to) = (pair[0], pair[1]);
                    assert!(
                        (from < value && from < to) || (from > value && from > to),
                        "FinalOp #{op_id}: path {path:?} strays from {value}"
                    );
                }
                if from_avl.is_some() {
                    assert_eq!(path.last().copied(), Some(value));
                }
            }

            FinalOp::Remove(value) => {
                remove_sorted(&mut sorted_values, value);

                let from_btree = if btree.is_empty() {
                    Err(LookupError::EmptyTree)
                } else if btree.remove(&value) {
                    Ok(value)
                } else {
                    Err(LookupError::NotFound(value))
                };
                let from_avl = avl.remove(value);

                assert_eq!(from_btree, from_avl, "FinalOp #{op_id}: {final_op:?}");
                assert!(!avl.contains(value), "FinalOp #{op_id}: {final_op:?}");
            }

            FinalOp::First => {
                let from_btree = btree.first().copied();
                let from_avl = avl.first();

                assert_eq!(from_btree, from_avl, "FinalOp #{op_id}: {final_op:?}");
            }

            FinalOp::Last => {
                let from_btree = btree.last().copied();
                let from_avl = avl.last();

                assert_eq!(from_btree, from_avl, "FinalOp #{op_id}: {final_op:?}");
            }

            FinalOp::Traverse(order) => {
                let expected = expected_traversal(&avl, order);
                let from_avl = avl.values(order);

                assert_eq!(expected, from_avl, "FinalOp #{op_id}: {final_op:?}");

                // Successor and predecessor links agree with the sorted order.
                let mut forward = Vec::with_capacity(avl.len());
                let mut opt_cur = avl.first().and_then(|v| avl.get(v));
                while let Some(cur) = opt_cur {
                    forward.push(cur.value());
                    opt_cur = cur.successor();
                }
                assert!(btree.iter().copied().eq(forward), "FinalOp #{op_id}");

                let mut backward = Vec::with_capacity(avl.len());
                let mut opt_cur = avl.last().and_then(|v| avl.get(v));
                while let Some(cur) = opt_cur {
                    backward.push(cur.value());
                    opt_cur = cur.predecessor();
                }
                assert!(btree.iter().rev().copied().eq(backward), "FinalOp #{op_id}");
            }

            FinalOp::Clear => {
                sorted_values.clear();
                btree.clear();
                avl.clear();
            }
        }

        avl.assert_invariants();
        assert_eq!(btree.len(), avl.len());
        assert!(btree.iter().copied().eq(avl.iter()));
    }
}
