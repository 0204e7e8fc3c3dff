use criterion::{black_box, criterion_group, criterion_main, Criterion};
use hello_server::core::{greeting::greeting_service::greet, identity::CallerIdentity};

fn greet_benchmark(c: &mut Criterion) {
    let identity = CallerIdentity::new("World");
    c.bench_function("greet", |b| b.iter(|| greet(black_box(&identity))));
}

criterion_group!(benches, greet_benchmark);
criterion_main!(benches);
