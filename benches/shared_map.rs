use criterion::{criterion_group, criterion_main, Criterion};
use kway::{run_writers, SharedMap, WriterConfig};
use std::time::{Duration, Instant};

fn writers(c: &mut Criterion) {
    for writers in [1, 2, 8] {
        c.bench_function(&format!("SharedMap: {writers} writers"), |b| {
            b.iter_custom(|iters| {
                let config = WriterConfig {
                    writers,
                    keys_per_writer: 4096,
                };
                let mut duration = Duration::default();
                for _ in 0..iters {
                    let map = SharedMap::default();
                    let start = Instant::now();
                    assert!(run_writers(&map, &config).is_ok());
                    duration += start.elapsed();
                }
                duration
            })
        });
    }
}

fn writers_warmed_up(c: &mut Criterion) {
    c.bench_function("SharedMap: 2 writers, warmed up", |b| {
        b.iter_custom(|iters| {
            let config = WriterConfig::default();
            let mut duration = Duration::default();
            for _ in 0..iters {
                let map = SharedMap::with_capacity(config.keys_per_writer * 2);
                let start = Instant::now();
                assert!(run_writers(&map, &config).is_ok());
                duration += start.elapsed();
            }
            duration
        })
    });
}

criterion_group!(shared_map, writers, writers_warmed_up);
criterion_main!(shared_map);
