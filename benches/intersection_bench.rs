use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use overlex::{intersect, IntersectionMode, TokenId, WordListStore};

const MODES: [IntersectionMode; 3] = [
    IntersectionMode::NestedLoops,
    IntersectionMode::QuicksortBinarySearch,
    IntersectionMode::HeapsortBinarySearch,
];

/// Deterministic pseudo-random token ids from a bounded universe, so a
/// realistic share of bucket elements matches the query.
fn scrambled(count: usize, seed: u64, universe: u32) -> Vec<TokenId> {
    let mut state = seed;
    (0..count)
        .map(|_| {
            state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            TokenId::new((state >> 33) as u32 % universe)
        })
        .collect()
}

fn build_store(bucket_count: usize, bucket_len: usize) -> WordListStore {
    let mut store = WordListStore::new(bucket_count, bucket_len);
    for bucket in 0..bucket_count {
        store.append_sequence(&scrambled(bucket_len, bucket as u64 + 1, 10_000));
    }
    store
}

fn bench_intersection_modes(c: &mut Criterion) {
    let mut group = c.benchmark_group("intersect");

    for bucket_len in [100, 1_000, 10_000] {
        let store = build_store(8, bucket_len);
        let query = scrambled(64, 4242, 10_000);

        for mode in MODES {
            group.bench_with_input(
                BenchmarkId::new(mode.to_string(), bucket_len),
                &bucket_len,
                |b, _| b.iter(|| intersect(black_box(&store), black_box(&query), mode)),
            );
        }
    }

    group.finish();
}

fn bench_query_length(c: &mut Criterion) {
    let mut group = c.benchmark_group("intersect_query_length");

    let store = build_store(8, 4_096);
    for query_len in [8, 64, 512] {
        let query = scrambled(query_len, 7, 10_000);

        for mode in MODES {
            group.bench_with_input(
                BenchmarkId::new(mode.to_string(), query_len),
                &query_len,
                |b, _| b.iter(|| intersect(black_box(&store), black_box(&query), mode)),
            );
        }
    }

    group.finish();
}

fn bench_store_append(c: &mut Criterion) {
    let mut group = c.benchmark_group("store_append");

    for bucket_len in [1_000, 10_000] {
        let data = scrambled(bucket_len, 11, u32::MAX);

        group.bench_with_input(
            BenchmarkId::new("append_sequence", bucket_len),
            &bucket_len,
            |b, _| {
                b.iter(|| {
                    let mut store = WordListStore::new(4, 16);
                    store.append_sequence(black_box(&data));
                    store
                })
            },
        );

        group.bench_with_input(BenchmarkId::new("put_value", bucket_len), &bucket_len, |b, _| {
            b.iter(|| {
                let mut store = WordListStore::new(4, 16);
                for value in &data {
                    store.put_value(black_box(*value));
                }
                store
            })
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_intersection_modes,
    bench_query_length,
    bench_store_append
);
criterion_main!(benches);
