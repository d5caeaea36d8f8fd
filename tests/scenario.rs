//! Runs the same workload through every tree variant and checks that
//! they agree with each other and with the expected orderings.

use forest::threaded::{DoubleThreaded, LeftThreaded, RightThreaded};
use forest::{avl, bst, red_black, tools, traversal, BinaryTree, TreeError};

const KEYS: [i32; 11] = [23, 4, 30, 11, 7, 34, 20, 24, 22, 15, 1];

fn in_order_keys<T: BinaryTree<Key = i32>>(tree: &T) -> Vec<i32> {
    traversal::in_order(tree).map(|(k, _)| *k).collect()
}

fn level_order_keys<T: BinaryTree<Key = i32>>(tree: &T) -> Vec<i32> {
    traversal::level_order(tree).map(|(k, _)| *k).collect()
}

#[test]
fn plain_bst_full_scenario() {
    let mut tree = bst::Tree::new();
    for key in KEYS {
        tree.insert(key, key.to_string()).unwrap();
    }

    assert_eq!(in_order_keys(&tree), [1, 4, 7, 11, 15, 20, 22, 23, 24, 30, 34]);
    assert_eq!(
        level_order_keys(&tree),
        [23, 4, 30, 1, 11, 24, 34, 7, 20, 15, 22]
    );
    let pre: Vec<i32> = traversal::pre_order(&tree).map(|(k, _)| *k).collect();
    assert_eq!(pre, [23, 4, 1, 11, 7, 20, 15, 22, 30, 24, 34]);
    let post: Vec<i32> = traversal::post_order(&tree).map(|(k, _)| *k).collect();
    assert_eq!(post, [1, 7, 15, 22, 20, 11, 4, 24, 34, 30, 23]);

    for key in [15, 22, 7, 20] {
        assert_eq!(tree.delete(&key), Ok(key.to_string()));
    }

    assert_eq!(tree.height(), 3);
    assert!(tree.is_balanced());
    assert_eq!(level_order_keys(&tree), [23, 4, 30, 1, 11, 24, 34]);
    assert_eq!(tree.min(), Ok((&1, &"1".to_string())));
    assert_eq!(tree.max(), Ok((&34, &"34".to_string())));
    assert_eq!(tree.search(&15), Err(TreeError::KeyNotFound));
}

#[test]
fn avl_full_scenario() {
    let mut tree = avl::Tree::new();
    for key in KEYS {
        tree.insert(key, key.to_string()).unwrap();
    }

    assert_eq!(in_order_keys(&tree), [1, 4, 7, 11, 15, 20, 22, 23, 24, 30, 34]);
    assert_eq!(tree.height(), 4);
    assert!(tree.is_balanced());

    for key in [15, 22, 7, 20] {
        assert_eq!(tree.delete(&key), Ok(key.to_string()));
        assert!(tree.is_balanced());
        assert!(tools::verify_bst_property(&tree));
    }
    assert_eq!(in_order_keys(&tree), [1, 4, 11, 23, 24, 30, 34]);
    assert_eq!(tree.height(), 3);
}

#[test]
fn red_black_full_scenario() {
    let mut tree = red_black::Tree::new();
    for key in KEYS {
        tree.insert(key, key.to_string()).unwrap();
    }

    assert_eq!(in_order_keys(&tree), [1, 4, 7, 11, 15, 20, 22, 23, 24, 30, 34]);
    // Height is bounded by twice the black-height.
    assert!(tree.height() <= 7, "height {}", tree.height());

    for key in [15, 22, 7, 20] {
        assert_eq!(tree.delete(&key), Ok(key.to_string()));
        assert!(tools::verify_bst_property(&tree));
    }
    assert_eq!(in_order_keys(&tree), [1, 4, 11, 23, 24, 30, 34]);
    assert_eq!(tree.min(), Ok((&1, &"1".to_string())));
    assert_eq!(tree.max(), Ok((&34, &"34".to_string())));
}

#[test]
fn threaded_variants_track_the_plain_bst() {
    let mut plain = bst::Tree::new();
    let mut right = RightThreaded::new();
    let mut left = LeftThreaded::new();
    let mut double = DoubleThreaded::new();
    for key in KEYS {
        plain.insert(key, key.to_string()).unwrap();
        right.insert(key, key.to_string()).unwrap();
        left.insert(key, key.to_string()).unwrap();
        double.insert(key, key.to_string()).unwrap();
    }

    let ascending: Vec<i32> = right.in_order().map(|(k, _)| *k).collect();
    assert_eq!(ascending, in_order_keys(&plain));
    let descending: Vec<i32> = left.out_order().map(|(k, _)| *k).collect();
    assert_eq!(
        descending,
        in_order_keys(&plain).into_iter().rev().collect::<Vec<_>>()
    );

    for key in [15, 22, 7, 20] {
        plain.delete(&key).unwrap();
        right.delete(&key).unwrap();
        left.delete(&key).unwrap();
        double.delete(&key).unwrap();

        let expected = level_order_keys(&plain);
        assert_eq!(level_order_keys(&right), expected, "after deleting {key}");
        assert_eq!(level_order_keys(&left), expected, "after deleting {key}");
        assert_eq!(level_order_keys(&double), expected, "after deleting {key}");
    }

    assert_eq!(right.height(), 3);
    assert!(double.is_balanced());
    assert_eq!(double.min(), Ok((&1, &"1".to_string())));
    assert_eq!(double.max(), Ok((&34, &"34".to_string())));
}

#[test]
fn every_variant_agrees_on_the_surviving_entries() {
    let expected: Vec<(i32, String)> = [1, 4, 11, 23, 24, 30, 34]
        .into_iter()
        .map(|k| (k, k.to_string()))
        .collect();

    fn run<T: BinaryTree<Key = i32, Value = String>>(
        mut tree: T,
        insert: fn(&mut T, i32, String) -> Result<(), TreeError>,
        delete: fn(&mut T, &i32) -> Result<String, TreeError>,
        expected: &[(i32, String)],
    ) {
        for key in KEYS {
            insert(&mut tree, key, key.to_string()).unwrap();
        }
        for key in [15, 22, 7, 20] {
            delete(&mut tree, &key).unwrap();
        }
        let entries: Vec<(i32, String)> = traversal::in_order(&tree)
            .map(|(k, v)| (*k, v.clone()))
            .collect();
        assert_eq!(entries, expected);
    }

    run(bst::Tree::new(), bst::Tree::insert, bst::Tree::delete, &expected);
    run(avl::Tree::new(), avl::Tree::insert, avl::Tree::delete, &expected);
    run(
        red_black::Tree::new(),
        red_black::Tree::insert,
        red_black::Tree::delete,
        &expected,
    );
    run(
        RightThreaded::new(),
        RightThreaded::insert,
        RightThreaded::delete,
        &expected,
    );
    run(
        LeftThreaded::new(),
        LeftThreaded::insert,
        LeftThreaded::delete,
        &expected,
    );
    run(
        DoubleThreaded::new(),
        DoubleThreaded::insert,
        DoubleThreaded::delete,
        &expected,
    );
}
