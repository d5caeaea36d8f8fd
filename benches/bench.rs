use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use forest::{avl, bst, red_black};

#[derive(Clone)]
enum TreeEnum<K, V> {
    Bst(bst::Tree<K, V>),
    Avl(avl::Tree<K, V>),
    RedBlack(red_black::Tree<K, V>),
}

impl<K, V> TreeEnum<K, V> {
    fn search(&self, k: &K) -> Option<&V>
    where
        K: Ord,
    {
        match self {
            Self::Bst(t) => t.search(k).ok(),
            Self::Avl(t) => t.search(k).ok(),
            Self::RedBlack(t) => t.search(k).ok(),
        }
    }

    fn insert(&mut self, k: K, v: V)
    where
        K: Ord,
    {
        let _ = match self {
            Self::Bst(t) => t.insert(k, v),
            Self::Avl(t) => t.insert(k, v),
            Self::RedBlack(t) => t.insert(k, v),
        };
    }

    fn delete(&mut self, k: &K)
    where
        K: Ord,
    {
        let _ = match self {
            Self::Bst(t) => t.delete(k),
            Self::Avl(t) => t.delete(k),
            Self::RedBlack(t) => t.delete(k),
        };
    }
}

/// Helper to bench a function on a BST.
/// It creates a group for the given name and closure and runs tests for various sizes and
/// implementations of BSTs before finishing the group.
///
/// Keys are inserted in ascending order, which is the degenerate case for
/// the plain BST and so shows the balanced variants at their best.
fn bench_helper(c: &mut Criterion, name: &str, f: impl Fn(&mut TreeEnum<i32, i32>, i32)) {
    let mut group = c.benchmark_group(name);

    for num_levels in [3, 7, 11, 15] {
        let num_nodes = 2usize.pow(num_levels as u32) - 1;
        let largest_element_in_tree = num_nodes as i32 - 1;

        let bst_tree = {
            let mut tree = bst::Tree::new();
            for x in 0..num_nodes {
                tree.insert(x as i32, x as i32).unwrap();
            }
            tree
        };
        let avl_tree = {
            let mut tree = avl::Tree::new();
            for x in 0..num_nodes {
                tree.insert(x as i32, x as i32).unwrap();
            }
            tree
        };
        let red_black_tree = {
            let mut tree = red_black::Tree::new();
            for x in 0..num_nodes {
                tree.insert(x as i32, x as i32).unwrap();
            }
            tree
        };
        let tree_tests = [
            ("bst", TreeEnum::Bst(bst_tree)),
            ("avl", TreeEnum::Avl(avl_tree)),
            ("red-black", TreeEnum::RedBlack(red_black_tree)),
        ];
        for (name, tree) in tree_tests {
            let id = BenchmarkId::new(name, largest_element_in_tree);

            group.bench_function(id, |b| {
                b.iter_custom(|iters| {
                    let mut time = std::time::Duration::ZERO;
                    for _ in 0..iters {
                        let mut tree = black_box(tree.clone());
                        let instant = std::time::Instant::now();
                        f(&mut tree, black_box(largest_element_in_tree));
                        let elapsed = instant.elapsed();
                        time += elapsed;
                    }
                    time
                })
            });
        }
    }

    group.finish();
}

pub fn criterion_benchmark(c: &mut Criterion) {
    bench_helper(c, "search", |tree, i| {
        let _value = black_box(tree.search(&i));
    });
    bench_helper(c, "delete", |tree, i| {
        tree.delete(&i);
    });

    bench_helper(c, "insert", |tree, i| {
        tree.insert(i + 1, i + 1);
    });

    bench_helper(c, "search-miss", |tree, i| {
        let _value = black_box(tree.search(&(i + 1)));
    });
    bench_helper(c, "delete-miss", |tree, i| {
        tree.delete(&(i + 1));
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
