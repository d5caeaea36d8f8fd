use std::collections::BTreeMap;
use std::fmt::Debug;

use quickcheck::{Arbitrary, Gen};

use crate::TreeError;

/// An enum for the various kinds of "things" to do to
/// binary search trees in a quicktest.
#[derive(Copy, Clone, Debug)]
pub(crate) enum Op<K, V> {
    /// Insert the K, V into the data structure
    Insert(K, V),
    /// Remove the K from the data structure
    Remove(K),
}

impl<K, V> Arbitrary for Op<K, V>
where
    K: Arbitrary,
    V: Arbitrary,
{
    /// Tells quickcheck how to randomly choose an operation
    fn arbitrary(g: &mut Gen) -> Self {
        match g.choose(&[0, 1]).unwrap() {
            0 => Op::Insert(K::arbitrary(g), V::arbitrary(g)),
            1 => Op::Remove(K::arbitrary(g)),
            _ => unreachable!(),
        }
    }
}

/// Applies a set of operations to a tree and a `BTreeMap` oracle.
/// This way we can ensure that after a random smattering of inserts
/// and deletes we have the same set of keys in the map. Inserts of an
/// existing key must fail on both sides; deletes must agree on the
/// removed value.
pub(crate) fn do_ops<T, K, V>(
    ops: &[Op<K, V>],
    tree: &mut T,
    map: &mut BTreeMap<K, V>,
    insert: fn(&mut T, K, V) -> Result<(), TreeError>,
    delete: fn(&mut T, &K) -> Result<V, TreeError>,
) where
    K: Ord + Clone,
    V: Debug + PartialEq + Clone,
{
    for op in ops {
        match op {
            Op::Insert(k, v) => {
                let fresh = !map.contains_key(k);
                assert_eq!(insert(tree, k.clone(), v.clone()).is_ok(), fresh);
                map.entry(k.clone()).or_insert_with(|| v.clone());
            }
            Op::Remove(k) => {
                assert_eq!(delete(tree, k).ok(), map.remove(k));
            }
        }
    }
}
