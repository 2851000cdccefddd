use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use kway::{List, Strategy};

fn lists(k: usize, len: usize) -> Vec<List<u64>> {
    (0..k)
        .map(|i| (0..len as u64).map(|v| v * k as u64 + i as u64).collect())
        .collect()
}

fn merge(c: &mut Criterion) {
    let mut group = c.benchmark_group("List: merge_k");
    for k in [2, 16, 128] {
        let len = 65536 / k;
        for strategy in [Strategy::Heap, Strategy::Pairwise] {
            group.bench_with_input(BenchmarkId::new(strategy.to_string(), k), &k, |b, &k| {
                b.iter_batched(
                    || lists(k, len),
                    |lists| List::merge_k_with(strategy, lists),
                    BatchSize::LargeInput,
                );
            });
        }
    }
    group.finish();
}

fn merge_skewed(c: &mut Criterion) {
    c.bench_function("List: merge_k, one long list", |b| {
        b.iter_batched(
            || {
                let mut lists: Vec<List<u64>> = (0..64).map(|_| (0..4).collect()).collect();
                lists.push((0..65536).collect());
                lists
            },
            List::merge_k,
            BatchSize::LargeInput,
        );
    });
}

criterion_group!(merge_k, merge, merge_skewed);
criterion_main!(merge_k);
