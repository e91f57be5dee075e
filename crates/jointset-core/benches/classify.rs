use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use jointset_core::{cluster_with, encode_all, ClassifierConfig, Measurement};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn synthetic_measurements(n: usize) -> Vec<Measurement> {
    let mut rng = StdRng::seed_from_u64(7);
    let sets = [(45.0, 30.0), (160.0, 75.0), (290.0, 55.0)];
    (0..n)
        .map(|i| {
            let (dd, dip) = sets[i % sets.len()];
            Measurement::new(
                dd + rng.gen_range(-8.0..8.0),
                (dip + rng.gen_range(-6.0..6.0f64)).clamp(0.0, 90.0),
            )
        })
        .collect()
}

fn bench_encode(c: &mut Criterion) {
    let ms = synthetic_measurements(10_000);
    c.bench_function("encode_all_10k", |b| b.iter(|| encode_all(black_box(&ms))));
}

fn bench_cluster(c: &mut Criterion) {
    let mut group = c.benchmark_group("cluster_with");
    for n in [100usize, 1_000, 10_000] {
        let ms = synthetic_measurements(n);
        let config = ClassifierConfig::new(3, Some(42));
        group.bench_with_input(BenchmarkId::from_parameter(n), &ms, |b, ms| {
            b.iter(|| cluster_with(black_box(ms), &config))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_encode, bench_cluster);
criterion_main!(benches);
