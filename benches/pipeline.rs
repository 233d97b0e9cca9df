//! Benchmarks for the single-point and interval prediction paths.

use chrono::Duration;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use std::sync::Arc;
use zone_demand::core::parse_timestamp;
use zone_demand::features::extract;
use zone_demand::forecast::{DemandPredictor, PointPredictor};
use zone_demand::models::{LstmRegressor, Node, Tree, TreeEnsemble, RESIDUAL_FEATURES};
use zone_demand::sequence::SequenceProvider;
use zone_demand::transform::{ColumnScale, FittedScaler};

fn weights(hidden: usize) -> String {
    let m = |rows: usize, cols: usize| -> Vec<Vec<f64>> {
        (0..rows)
            .map(|i| (0..cols).map(|j| ((i + 2 * j) % 7) as f64 / 7.0 - 0.5).collect())
            .collect()
    };
    serde_json::json!({
        "lstm.weight_ih_l0": m(4 * hidden, 1),
        "lstm.weight_hh_l0": m(4 * hidden, hidden),
        "lstm.bias_ih_l0": vec![0.0; 4 * hidden],
        "lstm.bias_hh_l0": vec![0.0; 4 * hidden],
        "fc1.weight": m(64, hidden + 9),
        "fc1.bias": vec![0.0; 64],
        "fc2.weight": m(32, 64),
        "fc2.bias": vec![0.0; 32],
        "fc3.weight": m(1, 32),
        "fc3.bias": [0.0]
    })
    .to_string()
}

fn forest(n_trees: usize) -> TreeEnsemble {
    let trees = (0..n_trees)
        .map(|i| {
            Tree::new(vec![
                Node::Split {
                    feature: i % RESIDUAL_FEATURES,
                    threshold: 0.5,
                    left: 1,
                    right: 2,
                    default_left: true,
                },
                Node::Leaf { leaf: -0.001 },
                Node::Leaf { leaf: 0.001 },
            ])
            .unwrap()
        })
        .collect();
    TreeEnsemble::new(0.0, RESIDUAL_FEATURES, trees).unwrap()
}

fn make_predictor(hidden: usize) -> DemandPredictor {
    let scaler = FittedScaler::new(vec![ColumnScale::new(50.0, 40.0).unwrap(); 264]).unwrap();
    DemandPredictor::new(
        Arc::new(LstmRegressor::from_json_str(&weights(hidden)).unwrap()),
        Arc::new(forest(200)),
        scaler,
        SequenceProvider::synthetic_only(Some(42)).unwrap(),
    )
}

fn bench_point_prediction(c: &mut Criterion) {
    let mut group = c.benchmark_group("predict_at");
    let target = parse_timestamp("2024-01-01 12:00:00").unwrap();

    for hidden in [16, 50, 128].iter() {
        let predictor = make_predictor(*hidden);
        group.bench_with_input(BenchmarkId::new("lstm_hidden", hidden), hidden, |b, _| {
            b.iter(|| predictor.predict_at(black_box(132), black_box(&target)))
        });
    }

    group.finish();
}

fn bench_intervals(c: &mut Criterion) {
    let predictor = make_predictor(50);
    c.bench_function("predict_with_intervals", |b| {
        b.iter(|| predictor.predict_with_intervals(black_box(132), black_box("2024-01-01 12:00:00")))
    });
}

fn bench_features(c: &mut Criterion) {
    let base = parse_timestamp("2024-01-01 00:00:00").unwrap();
    c.bench_function("extract_temporal", |b| {
        b.iter(|| {
            for h in 0..24 {
                black_box(extract(&(base + Duration::hours(h))));
            }
        })
    });
}

criterion_group!(benches, bench_point_prediction, bench_intervals, bench_features);
criterion_main!(benches);
