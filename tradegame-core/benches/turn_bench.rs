//! Criterion benchmarks for the game hot paths.
//!
//! Benchmarks:
//! 1. A full 16-turn game through `submit_turn`
//! 2. Buy-and-hold benchmark over the scored range

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use tradegame_core::domain::{Bar, BarSeries, Position};
use tradegame_core::engine::{submit_turn, GameRules};
use tradegame_core::buy_hold_pnl;

fn make_series(n: usize) -> BarSeries {
    let bars = (0..n)
        .map(|i| {
            let close = 100.0 + (i as f64 * 0.1).sin() * 10.0;
            Bar::new(format!("Week {}", i + 1), close - 0.3, close + 1.5, close - 1.5, close)
        })
        .collect();
    BarSeries::new(bars, n).unwrap()
}

fn bench_full_game(c: &mut Criterion) {
    let series = make_series(32);
    let rules = GameRules::default();

    c.bench_function("full_game_16_turns", |b| {
        b.iter(|| {
            let mut total = 0.0;
            for turn in rules.first_scored_turn()..rules.total_turns {
                let result =
                    submit_turn(black_box(&series), &rules, Position::Long, turn).unwrap();
                total += result.pnl;
            }
            total
        })
    });
}

fn bench_buy_hold(c: &mut Criterion) {
    let series = make_series(32);
    let rules = GameRules::default();

    c.bench_function("buy_hold_pnl", |b| {
        b.iter(|| buy_hold_pnl(black_box(&series), &rules).unwrap())
    });
}

criterion_group!(benches, bench_full_game, bench_buy_hold);
criterion_main!(benches);
