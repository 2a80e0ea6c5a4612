use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use memora_core::{
    hash_key, memoize_variadic, CacheBackend, CacheFactory, EqualityCacheFactory,
    EqualityOptions, HashCache, MemoizeOptions, Value,
};
use serde_json::json;

fn keys(count: usize) -> Vec<Vec<Value>> {
    (0..count)
        .map(|i| {
            vec![
                Value::from(i),
                Value::from(json!({"page": i, "filters": {"active": true, "tags": ["a", "b"]}})),
            ]
        })
        .collect()
}

fn bench_hash_key(c: &mut Criterion) {
    let key = keys(1).remove(0);
    c.bench_function("hash_key", |b| b.iter(|| hash_key(black_box(&key))));
}

fn bench_get_hit(c: &mut Criterion) {
    let mut group = c.benchmark_group("get_hit");

    for size in [10, 50, 100].iter() {
        let keys = keys(*size);

        group.bench_with_input(BenchmarkId::new("Hash", size), size, |b, _| {
            let mut cache = HashCache::new();
            for (i, key) in keys.iter().enumerate() {
                cache.set(key.clone(), i).unwrap();
            }
            b.iter(|| {
                for key in &keys {
                    black_box(cache.get(key).unwrap());
                }
            });
        });

        for (label, options) in [
            ("LRU_shallow", EqualityOptions::shallow()),
            ("LRU_deep", EqualityOptions::deep()),
        ] {
            let factory = EqualityCacheFactory::new(options.with_size(*size));
            group.bench_with_input(BenchmarkId::new(label, size), size, |b, _| {
                let mut cache: Box<dyn CacheBackend<usize>> = factory.create();
                for (i, key) in keys.iter().enumerate() {
                    cache.set(key.clone(), i).unwrap();
                }
                b.iter(|| {
                    for key in &keys {
                        black_box(cache.get(key).unwrap());
                    }
                });
            });
        }
    }

    group.finish();
}

fn bench_eviction(c: &mut Criterion) {
    let mut group = c.benchmark_group("eviction");
    let keys = keys(200);

    group.bench_function("LRU_deep_size_50", |b| {
        b.iter(|| {
            let factory = EqualityCacheFactory::new(EqualityOptions::deep().with_size(50));
            let mut cache: Box<dyn CacheBackend<usize>> = factory.create();
            for (i, key) in keys.iter().enumerate() {
                cache.set(key.clone(), i).unwrap();
            }
            black_box(cache.len())
        });
    });

    group.finish();
}

fn bench_memoized_call(c: &mut Criterion) {
    let mut group = c.benchmark_group("memoized_call");
    let args = keys(1).remove(0);

    for (label, options) in [
        ("hash", MemoizeOptions::new()),
        ("deep_single", MemoizeOptions::new().equality(EqualityOptions::deep())),
    ] {
        let func = memoize_variadic(|args: &[Value]| args.len(), options).unwrap();
        group.bench_function(label, |b| b.iter(|| func.call(black_box(&args)).unwrap()));
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_hash_key,
    bench_get_hit,
    bench_eviction,
    bench_memoized_call
);
criterion_main!(benches);
