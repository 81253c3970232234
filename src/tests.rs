use std::ops::Range;

use proptest::prelude::*;

use crate::model;

use super::*;

fn tree_of(values: &[Value]) -> AvlTree {
    let mut tree = AvlTree::new();

    for &value in values {
        assert_eq!(tree.insert(value), Insertion::Inserted);
        tree.assert_invariants();
    }

    tree
}

fn root_value(tree: &AvlTree) -> Option<Value> {
    tree.root().map(|root| root.value())
}

fn insert_find_all(values: &[Value]) {
    let tree = tree_of(values);

    for &value in values {
        let node = tree.get(value).expect("item not found");
        assert_eq!(node.value(), value);
    }
}

#[test]
fn zero_elems_find() {
    insert_find_all(&[]);
}

#[test]
fn single_elem_find() {
    insert_find_all(&[0]);
}

#[test]
fn two_elems_find() {
    insert_find_all(&[0, 1]);
    insert_find_all(&[1, 0]);
}

#[test]
fn three_elems_find() {
    insert_find_all(&[0, 1, 2]);
    insert_find_all(&[0, 2, 1]);
    insert_find_all(&[1, 0, 2]);
    insert_find_all(&[1, 2, 0]);
    insert_find_all(&[2, 0, 1]);
    insert_find_all(&[2, 1, 0]);
}

#[test]
fn four_elems_find() {
    insert_find_all(&[0, 1, 2, 3]);
    insert_find_all(&[0, 1, 3, 2]);
    insert_find_all(&[0, 2, 1, 3]);
    insert_find_all(&[0, 2, 3, 1]);
    insert_find_all(&[0, 3, 1, 2]);
    insert_find_all(&[0, 3, 2, 1]);

    insert_find_all(&[1, 0, 2, 3]);
    insert_find_all(&[1, 0, 3, 2]);
    insert_find_all(&[1, 2, 0, 3]);
    insert_find_all(&[1, 2, 3, 0]);
    insert_find_all(&[1, 3, 0, 2]);
    insert_find_all(&[1, 3, 2, 0]);

    insert_find_all(&[2, 0, 1, 3]);
    insert_find_all(&[2, 0, 3, 1]);
    insert_find_all(&[2, 1, 0, 3]);
    insert_find_all(&[2, 1, 3, 0]);
    insert_find_all(&[2, 3, 0, 1]);
    insert_find_all(&[2, 3, 1, 0]);

    insert_find_all(&[3, 0, 1, 2]);
    insert_find_all(&[3, 0, 2, 1]);
    insert_find_all(&[3, 1, 0, 2]);
    insert_find_all(&[3, 1, 2, 0]);
    insert_find_all(&[3, 2, 0, 1]);
    insert_find_all(&[3, 2, 1, 0]);
}

fn insert_remove_all(values: &[Value]) {
    let mut tree = tree_of(values);

    for &value in values {
        assert_eq!(tree.remove(value), Ok(value));
        assert!(tree.search(value).node().is_none());
        tree.assert_invariants();
    }

    assert!(tree.is_empty());

    for &value in values {
        let _ = tree.insert(value);
        tree.assert_invariants();
    }

    for &value in values.iter().rev() {
        assert_eq!(tree.remove(value), Ok(value));
        tree.assert_invariants();
    }

    assert!(tree.is_empty());
}

#[test]
fn remove_one() {
    insert_remove_all(&[0]);
}

#[test]
fn remove_two() {
    insert_remove_all(&[0, 1]);
    insert_remove_all(&[1, 0]);
}

#[test]
fn remove_three() {
    insert_remove_all(&[0, 1, 2]);
    insert_remove_all(&[0, 2, 1]);
    insert_remove_all(&[1, 0, 2]);
    insert_remove_all(&[1, 2, 0]);
    insert_remove_all(&[2, 0, 1]);
    insert_remove_all(&[2, 1, 0]);
}

#[test]
fn remove_four() {
    insert_remove_all(&[0, 1, 2, 3]);
    insert_remove_all(&[0, 1, 3, 2]);
    insert_remove_all(&[0, 2, 1, 3]);
    insert_remove_all(&[0, 2, 3, 1]);
    insert_remove_all(&[0, 3, 1, 2]);
    insert_remove_all(&[0, 3, 2, 1]);

    insert_remove_all(&[1, 0, 2, 3]);
    insert_remove_all(&[1, 0, 3, 2]);
    insert_remove_all(&[1, 2, 0, 3]);
    insert_remove_all(&[1, 2, 3, 0]);
    insert_remove_all(&[1, 3, 0, 2]);
    insert_remove_all(&[1, 3, 2, 0]);

    insert_remove_all(&[2, 0, 1, 3]);
    insert_remove_all(&[2, 0, 3, 1]);
    insert_remove_all(&[2, 1, 0, 3]);
    insert_remove_all(&[2, 1, 3, 0]);
    insert_remove_all(&[2, 3, 0, 1]);
    insert_remove_all(&[2, 3, 1, 0]);

    insert_remove_all(&[3, 0, 1, 2]);
    insert_remove_all(&[3, 0, 2, 1]);
    insert_remove_all(&[3, 1, 0, 2]);
    insert_remove_all(&[3, 1, 2, 0]);
    insert_remove_all(&[3, 2, 0, 1]);
    insert_remove_all(&[3, 2, 1, 0]);
}

#[test]
fn single_left_rotation() {
    let tree = tree_of(&[10, 20, 30]);

    assert_eq!(root_value(&tree), Some(20));
    assert_eq!(tree.render(Order::In), "10, 20, 30");
    assert_eq!(tree.height(), 1);
}

#[test]
fn single_right_rotation() {
    let tree = tree_of(&[30, 20, 10]);

    assert_eq!(root_value(&tree), Some(20));
    assert_eq!(tree.render(Order::Pre), "20, 10, 30");
}

#[test]
fn double_rotations() {
    let left_right = tree_of(&[30, 10, 20]);
    assert_eq!(root_value(&left_right), Some(20));
    assert_eq!(left_right.values(Order::Pre), vec![20, 10, 30]);

    let right_left = tree_of(&[10, 30, 20]);
    assert_eq!(root_value(&right_left), Some(20));
    assert_eq!(right_left.values(Order::Pre), vec![20, 10, 30]);
}

#[test]
fn rotation_below_root_relinks_parent() {
    //     20              20
    //    /  \            /  \
    //   10   30   ->   10    40
    //          \            /  \
    //           40        30    50
    //             \
    //              50
    let tree = tree_of(&[20, 10, 30, 40, 50]);

    let forty = tree.get(40).unwrap();
    assert_eq!(forty.parent().map(|p| p.value()), Some(20));
    assert_eq!(forty.left().map(|n| n.value()), Some(30));
    assert_eq!(forty.right().map(|n| n.value()), Some(50));
    assert_eq!(tree.get(30).unwrap().parent(), Some(forty));
    assert_eq!(tree.values(Order::Pre), vec![20, 10, 40, 30, 50]);
}

#[test]
fn delete_with_two_children_promotes_successor() {
    let mut tree = tree_of(&[20, 10, 30, 5, 15]);

    assert_eq!(tree.remove(20), Ok(20));
    tree.assert_invariants();

    assert_eq!(tree.render(Order::In), "5, 10, 15, 30");
    // 30 took the root's place, then the left-heavy root was rotated right.
    assert_eq!(root_value(&tree), Some(10));
    assert_eq!(tree.values(Order::Pre), vec![10, 5, 30, 15]);
}

#[test]
fn delete_successor_deep_in_right_subtree() {
    let mut tree = tree_of(&[20, 10, 30, 5, 25, 40, 27]);

    assert_eq!(tree.remove(20), Ok(20));
    tree.assert_invariants();

    assert_eq!(root_value(&tree), Some(25));
    assert_eq!(tree.values(Order::In), vec![5, 10, 25, 27, 30, 40]);
}

#[test]
fn delete_rebalances_up_to_root() {
    // Removing 100 leaves the right side two levels short.
    let mut tree = tree_of(&[50, 25, 75, 10, 30, 60, 100, 5, 15, 27, 55, 1]);

    assert_eq!(tree.remove(100), Ok(100));
    tree.assert_invariants();

    assert_eq!(root_value(&tree), Some(25));
    assert_eq!(
        tree.values(Order::In),
        vec![1, 5, 10, 15, 25, 27, 30, 50, 55, 60, 75]
    );
}

#[test]
fn delete_from_empty_tree() {
    let mut tree = AvlTree::new();

    assert_eq!(tree.remove(1), Err(LookupError::EmptyTree));
    assert!(tree.is_empty());
}

#[test]
fn delete_missing_value() {
    let mut tree = tree_of(&[1, 2, 3]);

    assert_eq!(tree.remove(4), Err(LookupError::NotFound(4)));
    assert_eq!(tree.len(), 3);
    tree.assert_invariants();
}

#[test]
fn delete_last_node_empties_tree() {
    let mut tree = tree_of(&[7]);

    assert_eq!(tree.remove(7), Ok(7));
    assert!(tree.is_empty());
    assert_eq!(tree.root(), None);
    assert_eq!(tree.height(), -1);
}

#[test]
fn duplicate_insert_is_noop() {
    let mut tree = tree_of(&[3, 1, 4, 5, 9]);
    let before = tree.values(Order::Pre);

    assert_eq!(tree.insert(4), Insertion::Duplicate);
    assert!(!tree.insert(9).is_inserted());
    assert_eq!(tree.values(Order::Pre), before);
    assert_eq!(tree.len(), 5);
}

#[test]
fn search_round_trip() {
    let mut tree = tree_of(&[8, 4, 12, 2, 6]);

    assert!(tree.search(6).is_found());
    assert_eq!(tree.remove(6), Ok(6));
    assert!(!tree.search(6).is_found());
}

#[test]
fn first_last_and_neighbors() {
    let tree = tree_of(&[40, 20, 60, 10, 30, 50, 70]);

    assert_eq!(tree.first(), Some(10));
    assert_eq!(tree.last(), Some(70));

    let thirty = tree.get(30).unwrap();
    // 30 has no right child, so its successor is found by ascending.
    assert_eq!(thirty.successor().map(|n| n.value()), Some(40));
    assert_eq!(thirty.predecessor().map(|n| n.value()), Some(20));

    let seventy = tree.get(70).unwrap();
    assert_eq!(seventy.successor(), None);
    assert_eq!(tree.get(10).unwrap().predecessor(), None);
}

#[test]
fn ascending_inserts_stay_logarithmic() {
    let mut tree = AvlTree::new();

    for value in 0..1024 {
        let _ = tree.insert(value);
    }
    tree.assert_invariants();

    // An AVL tree with n nodes is at most ~1.44 log2(n) high.
    assert!(tree.height() <= 14, "height {}", tree.height());
    assert!(tree.iter().eq(0..1024_i64));
}

#[test]
fn clear() {
    let mut tree = tree_of(&[1, 2, 3, 4]);
    tree.clear();

    assert!(tree.is_empty());
    tree.assert_invariants();
    assert_eq!(tree.insert(2), Insertion::Inserted);
}

#[test]
fn balance_factors_in_range() {
    let mut tree = tree_of(&[13, 8, 21, 5, 11, 17, 34, 3, 6, 1]);
    let _ = tree.remove(34);
    let _ = tree.remove(21);

    for node in tree.traverse(Order::Pre) {
        assert!((-1..=1).contains(&node.balance_factor()), "{node:?}");
    }
}

#[cfg(miri)]
const FUZZ_RANGE: Range<usize> = 0..10;

#[cfg(not(miri))]
const FUZZ_RANGE: Range<usize> = 0..1000;

proptest::proptest! {
    #![proptest_config(ProptestConfig {
        max_shrink_iters: 65536,
        .. ProptestConfig::default()
    })]

    #[test]
    fn btree_equivalence(ops in proptest::collection::vec(model::op_strategy(), FUZZ_RANGE)) {
        model::run_btree_equivalence(ops);
    }
}
