use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use pagetree::BTree;
use std::collections::BTreeSet;

const SIZE: u64 = 10_000;
const ORDERS: &[usize] = &[2, 6, 16, 64];

fn scrambled(n: u64) -> Vec<u64> {
    // Odd multiplier: a bijection on u64, so keys stay distinct.
    (0..n).map(|i| i.wrapping_mul(0x9E37_79B9_7F4A_7C15)).collect()
}

fn bench_insert(c: &mut Criterion) {
    let keys = scrambled(SIZE);
    let mut group = c.benchmark_group("BTree Insert");

    group.bench_function("std_btree_set_insert", |b| {
        b.iter(|| {
            let mut set = BTreeSet::new();
            for &k in &keys {
                set.insert(black_box(k));
            }
            set
        });
    });

    for &order in ORDERS {
        group.bench_with_input(BenchmarkId::new("pagetree_insert", order), &order, |b, &order| {
            b.iter(|| {
                let mut tree = BTree::new(order).unwrap();
                for &k in &keys {
                    tree.insert(black_box(k)).unwrap();
                }
                tree
            });
        });
    }

    group.finish();
}

fn bench_lookup(c: &mut Criterion) {
    let keys = scrambled(SIZE);
    let mut group = c.benchmark_group("BTree Lookup");

    group.bench_function("std_btree_set_lookup", |b| {
        let set: BTreeSet<u64> = keys.iter().copied().collect();
        b.iter(|| {
            for k in &keys {
                black_box(set.contains(k));
            }
        });
    });

    for &order in ORDERS {
        let mut tree = BTree::new(order).unwrap();
        for &k in &keys {
            tree.insert(k).unwrap();
        }
        group.bench_with_input(BenchmarkId::new("pagetree_lookup", order), &tree, |b, tree| {
            b.iter(|| {
                for k in &keys {
                    black_box(tree.search(k));
                }
            });
        });
    }

    group.finish();
}

fn bench_delete(c: &mut Criterion) {
    let keys = scrambled(SIZE);
    let mut group = c.benchmark_group("BTree Delete");

    for &order in ORDERS {
        group.bench_with_input(BenchmarkId::new("pagetree_delete_all", order), &order, |b, &order| {
            b.iter_batched(
                || {
                    let mut tree = BTree::new(order).unwrap();
                    for &k in &keys {
                        tree.insert(k).unwrap();
                    }
                    tree
                },
                |mut tree| {
                    for k in keys.iter().rev() {
                        black_box(tree.delete(k));
                    }
                    tree
                },
                criterion::BatchSize::LargeInput,
            );
        });
    }

    group.finish();
}

criterion_group!(benches, bench_insert, bench_lookup, bench_delete);
criterion_main!(benches);
