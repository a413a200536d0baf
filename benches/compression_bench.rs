use blockpress::batch::wrap_all;
use blockpress::{AlgorithmId, Envelope, Registry};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn sample(len: usize) -> Vec<u8> {
    b"cache page with some repetitive structure; "
        .iter()
        .copied()
        .cycle()
        .take(len)
        .collect()
}

fn bench_wrap(c: &mut Criterion) {
    let registry = Registry::builtin();
    let env = Envelope::new(&registry);
    let data = sample(64 * 1024);

    for id in registry.ids() {
        let name = format!("wrap_64k_{}", id.name().unwrap_or("custom"));
        c.bench_function(&name, |b| b.iter(|| env.wrap(id, black_box(&data)).unwrap()));
    }
}

fn bench_unwrap(c: &mut Criterion) {
    let registry = Registry::builtin();
    let env = Envelope::new(&registry);
    let data = sample(64 * 1024);

    for id in registry.ids() {
        let block = env.wrap(id, &data).unwrap();
        let name = format!("unwrap_64k_{}", id.name().unwrap_or("custom"));
        c.bench_function(&name, |b| b.iter(|| env.unwrap_owned(black_box(&block)).unwrap()));
    }
}

fn bench_batch(c: &mut Criterion) {
    let registry = Registry::builtin();
    let env = Envelope::new(&registry);
    let data = sample(4 * 1024 * 1024);
    let chunks: Vec<&[u8]> = data.chunks(64 * 1024).collect();

    c.bench_function("wrap_all_4mb_identity", |b| {
        b.iter(|| wrap_all(&env, AlgorithmId::NONE, black_box(&chunks)).unwrap())
    });
    #[cfg(feature = "lz4")]
    c.bench_function("wrap_all_4mb_lz4", |b| {
        b.iter(|| wrap_all(&env, AlgorithmId::LZ4, black_box(&chunks)).unwrap())
    });
}

criterion_group!(benches, bench_wrap, bench_unwrap, bench_batch);
criterion_main!(benches);
