use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use depth_engine::domain::orderbook::{MergeEngine, Price, PriceLevel, Side};
use depth_engine::OrderBookEngine;

fn full_engine(capacity: usize) -> MergeEngine {
    let mut engine = MergeEngine::new(capacity);
    let bids: Vec<_> = (0..capacity)
        .filter_map(|i| Price::new(38_000.0 - i as f64 * 0.5).map(|p| PriceLevel::new(p, 100.0)))
        .collect();
    let asks: Vec<_> = (0..capacity)
        .filter_map(|i| Price::new(38_000.5 + i as f64 * 0.5).map(|p| PriceLevel::new(p, 100.0)))
        .collect();
    engine.apply_snapshot(&bids, &asks);
    engine
}

fn level_update_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("Level updates on a full 25-level book");
    let master = full_engine(25);

    let cases = [
        ("update existing", 37_995.0, 42.0),
        ("evict worst", 38_000.25, 42.0),
        ("drop below worst", 37_000.0, 42.0),
        ("remove", 37_990.0, 0.0),
    ];

    for (name, raw_price, size) in cases {
        let price = match Price::new(raw_price) {
            Some(price) => price,
            None => continue,
        };
        group.bench_function(name, |b| {
            b.iter_batched(
                || master.clone(),
                |mut engine| engine.apply_level_update(Side::Bid, black_box(price), black_box(size)),
                BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

fn apply_raw_benchmark(c: &mut Criterion) {
    let mut engine = OrderBookEngine::default();
    let snapshot = format!(
        r#"{{"feed":"book_ui_1_snapshot","bids":[{}],"asks":[{}]}}"#,
        (0..25).map(|i| format!("[{},10]", 38_000.0 - i as f64 * 0.5)).collect::<Vec<_>>().join(","),
        (0..25).map(|i| format!("[{},10]", 38_000.5 + i as f64 * 0.5)).collect::<Vec<_>>().join(","),
    );
    engine.apply(&snapshot);

    let delta = r#"{"feed":"book_ui_1","product_id":"PI_XBTUSD","bids":[[37999.5,120],[37998,0]],"asks":[[38001,75]]}"#;

    c.bench_function("apply raw delta + refresh view", |b| {
        b.iter(|| {
            engine.apply(black_box(delta));
            black_box(engine.snapshot_view());
        });
    });
}

criterion_group!(benches, level_update_benchmark, apply_raw_benchmark);
criterion_main!(benches);
