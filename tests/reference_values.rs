//! Reproduces spec.md §8's published reference-value check: under the
//! `Stay` jail policy, steady-state landing percentages for squares
//! 0..39 must match the listed US-edition values within ±0.20
//! percentage points, Go-To-Jail (30) must be exactly zero, and Jail
//! (10) must be well above the board average (the published value,
//! 5.89%, is a bit over 2.3x the 2.5% flat average across 40 squares).

use monopoly_core::JailPolicy;
use monopoly_core::markov;

const REFERENCE_PERCENT: [f64; 40] = [
    3.09, 2.15, 1.83, 2.18, 2.35, 2.90, 2.28, 0.86, 2.43, 2.43, 5.89, 2.71, 2.64, 2.36, 2.52, 2.87,
    2.78, 2.68, 2.97, 3.11, 2.89, 2.75, 1.07, 2.74, 3.18, 3.05, 2.68, 2.63, 2.79, 2.60, 0.00, 2.69,
    2.63, 2.48, 2.56, 2.36, 0.93, 2.24, 2.14, 2.65,
];

const TOLERANCE_PP: f64 = 0.20;

#[test]
fn stay_policy_matches_published_reference_values() {
    let table = markov::solve(JailPolicy::Stay).expect("converges");
    let probabilities = table.board_probabilities();

    for (sq, (&expected_pct, &probability)) in REFERENCE_PERCENT.iter().zip(&probabilities).enumerate() {
        let actual_pct = probability * 100.0;
        let delta = (actual_pct - expected_pct).abs();
        assert!(
            delta <= TOLERANCE_PP,
            "square {sq}: expected {expected_pct:.2}%, got {actual_pct:.2}% (delta {delta:.2}pp)"
        );
    }
}

#[test]
fn go_to_jail_square_is_exactly_zero() {
    let table = markov::solve(JailPolicy::Stay).expect("converges");
    assert!(table.square_probability(markov::GO_TO_JAIL_INDEX) < 1e-9);
}

#[test]
fn jail_is_at_least_double_the_board_average_under_stay() {
    let table = markov::solve(JailPolicy::Stay).expect("converges");
    let probabilities = table.board_probabilities();
    let average: f64 = probabilities.iter().sum::<f64>() / probabilities.len() as f64;
    assert!(table.square_probability(markov::JAIL_INDEX) >= 2.0 * average);
}

#[test]
fn jail_mass_is_strictly_lower_under_leave_than_stay() {
    let stay = markov::solve(JailPolicy::Stay).expect("converges");
    let leave = markov::solve(JailPolicy::Leave).expect("converges");
    assert!(leave.square_probability(markov::JAIL_INDEX) < stay.square_probability(markov::JAIL_INDEX));
}
