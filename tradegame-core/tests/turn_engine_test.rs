//! Turn engine scenarios over full 32-bar games.
//!
//! Covers the windowing rule (no lookahead, capped at 16 bars), the two
//! termination paths, and the scoring of known price moves.

use tradegame_core::domain::{Bar, BarSeries, Position};
use tradegame_core::engine::{initial_window, submit_turn, GameRules};
use tradegame_core::{buy_hold_pnl, compute_pnl, GameError};

/// Deterministic 32-bar walk with distinct closes per index.
fn make_series(n: usize) -> BarSeries {
    let bars = (0..n)
        .map(|i| {
            let close = 100.0 + (i as f64 * 0.7).sin() * 10.0;
            let open = close - 0.4;
            Bar::new(
                format!("Week {}", i + 1),
                open,
                open.max(close) + 1.0,
                open.min(close) - 1.0,
                close,
            )
        })
        .collect();
    BarSeries::new(bars, 32).unwrap()
}

#[test]
fn window_lengths_over_a_full_game() {
    let series = make_series(32);
    let rules = GameRules::default();

    for turn in 1..32usize {
        let result = submit_turn(&series, &rules, Position::Long, turn).unwrap();
        let next_index = turn + 1;
        match result.next_window {
            Some(window) => {
                assert!(window.len() <= 16);
                if next_index >= 16 {
                    assert_eq!(window.len(), 16, "turn {turn}");
                } else {
                    assert_eq!(window.len(), next_index, "turn {turn}");
                }
                // The last visible bar is the one just scored.
                assert_eq!(window.last().unwrap(), series.get(turn).unwrap());
            }
            None => assert_eq!(turn, 31),
        }
    }
}

#[test]
fn game_finishes_exactly_at_the_end() {
    let series = make_series(32);
    let rules = GameRules::default();

    let finished: Vec<usize> = (1..32usize)
        .filter(|&t| submit_turn(&series, &rules, Position::Neutral, t).unwrap().finished)
        .collect();
    assert_eq!(finished, vec![30, 31]);
}

#[test]
fn last_turn_returns_no_window() {
    let series = make_series(32);
    let result = submit_turn(&series, &GameRules::default(), Position::Long, 31).unwrap();
    assert!(result.finished);
    assert!(result.next_window.is_none());
}

#[test]
fn turn_zero_is_out_of_range() {
    let series = make_series(32);
    let err = submit_turn(&series, &GameRules::default(), Position::Long, 0).unwrap_err();
    assert!(matches!(err, GameError::OutOfRange { index: 0, len: 32 }));
}

#[test]
fn known_move_scores_both_directions() {
    let mut bars: Vec<Bar> = make_series(32).bars().to_vec();
    for (i, close) in [(14usize, 100.0), (15, 110.0), (16, 99.0)] {
        bars[i] = Bar::new(format!("Week {}", i + 1), close, close, close, close);
    }
    let series = BarSeries::new(bars, 32).unwrap();
    let rules = GameRules::default();

    // Turn 16 is scored against the move from bar 15 to bar 16.
    let long = submit_turn(&series, &rules, Position::Long, 16).unwrap();
    let short = submit_turn(&series, &rules, Position::Short, 16).unwrap();
    assert_eq!(long.pnl, -10.0);
    assert_eq!(short.pnl, 10.0);

    // Turn 15 is scored against 14 → 15.
    let long = submit_turn(&series, &rules, Position::Long, 15).unwrap();
    assert_eq!(long.pnl, 10.0);
}

#[test]
fn initial_window_then_first_scored_turn_shifts_by_one() {
    let series = make_series(32);
    let rules = GameRules::default();

    let initial = initial_window(&series, &rules);
    let after = submit_turn(&series, &rules, Position::Neutral, 16)
        .unwrap()
        .next_window
        .unwrap();

    assert_eq!(&after[..15], &initial[1..]);
    assert_eq!(after[15], *series.get(16).unwrap());
}

#[test]
fn submit_turn_is_idempotent() {
    let series = make_series(32);
    let rules = GameRules::default();
    let a = submit_turn(&series, &rules, Position::Short, 22).unwrap();
    let b = submit_turn(&series, &rules, Position::Short, 22).unwrap();
    assert_eq!(a, b);
}

#[test]
fn buy_hold_equals_sum_of_long_turns() {
    let closes = [
        100.0, 101.0, 99.0, 98.0, 102.0, 104.0, 103.0, 105.0, 107.0, 106.0, 108.0, 110.0,
        109.0, 111.0, 112.0, 115.0, 113.0, 116.0, 118.0, 117.0, 120.0, 119.0, 121.0, 124.0,
        122.0, 125.0, 127.0, 126.0, 128.0, 130.0, 129.0, 131.0,
    ];
    let bars: Vec<Bar> = closes
        .iter()
        .enumerate()
        .map(|(i, &c)| Bar::new(format!("Week {}", i + 1), c, c, c, c))
        .collect();
    let series = BarSeries::new(bars.clone(), 32).unwrap();

    let expected: f64 = (16..32)
        .map(|i| (closes[i] - closes[i - 1]) / closes[i - 1] * 100.0)
        .sum();
    let by_formula: f64 = (16..32)
        .map(|i| compute_pnl(Position::Long, &bars[i - 1], &bars[i], i - 1).unwrap())
        .sum();

    let pnl = buy_hold_pnl(&series, &GameRules::default()).unwrap();
    assert!((pnl - expected).abs() < 1e-9);
    assert!((pnl - by_formula).abs() < 1e-12);
}

#[test]
fn custom_rules_change_window_and_termination() {
    let series = make_series(32);
    let rules = GameRules::new(12, 4).unwrap();

    assert_eq!(initial_window(&series, &rules).len(), 4);

    let mid = submit_turn(&series, &rules, Position::Long, 6).unwrap();
    assert_eq!(mid.next_window.unwrap().len(), 4);
    assert!(!mid.finished);

    let end = submit_turn(&series, &rules, Position::Long, 10).unwrap();
    assert!(end.finished);
}
