use criterion::{criterion_group, criterion_main, BatchSize, Criterion};

fn bench_quarters(c: &mut Criterion) {
    let mut game = chaos_runtime::Game::new(
        chaos_core::GameConfig::default(),
        chaos_core::SimConfig {
            rng_seed: 42,
            max_quarters: 120,
        },
    );
    let ids: Vec<_> = game.candidates().iter().map(|e| e.id).collect();
    for (i, id) in ids.into_iter().enumerate() {
        game.hire(id).expect("hire candidate");
        game.assign(id, chaos_core::Department::ALL[i % 6]).expect("assign hire");
    }
    assert!(!game.is_over(), "fixture must be an active run");
    c.bench_function("process_quarter", |b| {
        b.iter_batched(
            || game.clone(),
            |mut g| g.process_quarter().expect("quarter closes"),
            BatchSize::SmallInput,
        )
    });
}

criterion_group!(benches, bench_quarters);
criterion_main!(benches);
