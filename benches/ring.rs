//! Benchmarks for ring lookups and membership churn.

use {
    consistent_ring::Ring,
    criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion},
};

/// A ring with a single member, and one with ten.
fn rings() -> [(&'static str, Ring<&'static str>); 2] {
    let small = Ring::new();
    small.add("nothing", "");

    let large = Ring::new();
    for i in 0..10 {
        large.add(format!("start{i}"), "");
    }

    [("small", small), ("large", large)]
}

fn bench_lookups(c: &mut Criterion) {
    let rings = rings();

    let mut group = c.benchmark_group("lookup");
    for (name, ring) in &rings {
        group.bench_with_input(BenchmarkId::new("get", name), ring, |b, ring| {
            b.iter(|| ring.get(black_box("nothing")));
        });
        group.bench_with_input(BenchmarkId::new("get_two", name), ring, |b, ring| {
            b.iter(|| ring.get_two(black_box("nothing")));
        });
        group.bench_with_input(BenchmarkId::new("get_n", name), ring, |b, ring| {
            b.iter(|| ring.get_n(black_box("nothing"), 3));
        });
    }
    group.finish();
}

fn bench_churn(c: &mut Criterion) {
    let rings = rings();

    let mut group = c.benchmark_group("churn");
    for (name, ring) in &rings {
        // Same key every time: re-placing a member that comes and goes.
        group.bench_with_input(BenchmarkId::new("add_remove", name), ring, |b, ring| {
            b.iter(|| {
                ring.add("Foo", "value-Foo");
                ring.remove(black_box("Foo"));
            });
        });

        // A fresh key every time.
        group.bench_with_input(BenchmarkId::new("cycle", name), ring, |b, ring| {
            let mut i = 0u64;
            b.iter(|| {
                let key = format!("foo{i}");
                ring.add(key.as_str(), "");
                ring.remove(&key);
                i += 1;
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_lookups, bench_churn);
criterion_main!(benches);
