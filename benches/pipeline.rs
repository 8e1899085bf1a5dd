use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use encrypted_addition::{
    algebra,
    codec::PlaintextVector,
    pipeline, scheme, SchemeConfig, SchemeParameters,
};

fn bench_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("pipeline");
    group.sample_size(10);

    for degree in [2048usize, 4096] {
        let config = SchemeConfig {
            degree,
            ..SchemeConfig::default()
        };
        group.bench_function(BenchmarkId::new("run", degree), |b| {
            let mut rng = rand::rng();
            b.iter(|| pipeline::run_with(&config, 10, 20, &mut rng).unwrap());
        });

        let params = SchemeParameters::from_config(&config).unwrap();
        let mut rng = rand::rng();
        let keys = scheme::generate_keys(&params, &mut rng);
        let pt = PlaintextVector::fill(10, params.fill_length(), &params)
            .unwrap()
            .encode(&params)
            .unwrap();
        let ct1 = scheme::encrypt(&pt, &keys, &mut rng).unwrap();
        let ct2 = scheme::encrypt(&pt, &keys, &mut rng).unwrap();

        group.bench_function(BenchmarkId::new("keygen", degree), |b| {
            b.iter(|| scheme::generate_keys(&params, &mut rng));
        });
        group.bench_function(BenchmarkId::new("add", degree), |b| {
            b.iter(|| algebra::add(&ct1, &ct2).unwrap());
        });
    }

    group.finish();
}

criterion_group!(benches, bench_pipeline);
criterion_main!(benches);
