use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use keymap::{HashMap, Map, TreeMap};

const SIZES: [u64; 3] = [100, 1_000, 10_000];

fn filled<M: Map<u64, u64>>(n: u64) -> M {
    let mut map = M::new();
    for i in 0..n {
        map.add(i, i);
    }
    map
}

fn bench_backing<M: Map<u64, u64> + Clone>(c: &mut Criterion, name: &str) {
    let mut group = c.benchmark_group(name);

    for n in SIZES {
        group.throughput(Throughput::Elements(n));

        group.bench_with_input(BenchmarkId::new("add", n), &n, |b, &n| {
            b.iter(|| filled::<M>(black_box(n)));
        });

        let full: M = filled(n);

        group.bench_with_input(BenchmarkId::new("value", n), &n, |b, &n| {
            b.iter(|| {
                for i in 0..n {
                    black_box(full.value(&i));
                }
            });
        });

        group.bench_with_input(BenchmarkId::new("remove", n), &n, |b, &n| {
            b.iter(|| {
                let mut map = full.clone();
                for i in 0..n {
                    black_box(map.remove(&i));
                }
            });
        });

        group.bench_function(BenchmarkId::new("remove_any", n), |b| {
            b.iter(|| {
                let mut map = full.clone();
                while let Ok(pair) = map.try_remove_any() {
                    black_box(pair);
                }
            });
        });
    }

    group.finish();
}

pub fn hash_map(c: &mut Criterion) {
    bench_backing::<HashMap<u64, u64>>(c, "hash");
}

pub fn tree_map(c: &mut Criterion) {
    bench_backing::<TreeMap<u64, u64>>(c, "tree");
}

criterion_group!(benches, hash_map, tree_map);
criterion_main!(benches);
