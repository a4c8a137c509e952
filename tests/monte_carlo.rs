//! Cross-checks the Markov engine's steady state against a direct
//! random-walk simulation, per spec.md §8's Monte-Carlo reconciliation
//! and DESIGN.md's corresponding ADR. This is a slow, `#[ignore]`d test:
//! run explicitly with `cargo test --test monte_carlo -- --ignored`.
//!
//! The simulation deliberately does not call into `monopoly_core::markov`
//! at all (no shared `resolve_square`/`accumulate_turn` code) so that a
//! bug in the analytic model's own redirect or doubles handling would
//! not also be baked into the check.

use rand::Rng;
use rand::rngs::StdRng;
use rand::SeedableRng;

use monopoly_core::board::{self, BOARD_SIZE};
use monopoly_core::board::cards::{self, CardEffect, Deck, Nearest};
use monopoly_core::markov::{self, JailPolicy, GO_TO_JAIL_INDEX, JAIL_INDEX};

const TURNS: u64 = 2_000_000;
const TOLERANCE_PP: f64 = 0.15;

struct Walker {
    pos: u8,
    jail_turns: u8, // 0 = not in jail
}

fn roll(rng: &mut impl Rng) -> (u8, bool) {
    let a = rng.gen_range(1..=6u8);
    let b = rng.gen_range(1..=6u8);
    (a + b, a == b)
}

fn draw(deck: Deck, rng: &mut impl Rng) -> CardEffect {
    let d = cards::deck(deck);
    d.cards[rng.gen_range(0..d.cards.len())]
}

fn nearest(from: u8, kind: Nearest) -> u8 {
    let positions: &[u8] = match kind {
        Nearest::Railroad => &board::RAILROAD_POSITIONS,
        Nearest::Utility => &board::UTILITY_POSITIONS,
    };
    *positions.iter().find(|&&p| p > from).unwrap_or(&positions[0])
}

/// Resolves landing at `pos`, following card/Go-To-Jail redirects. A
/// `GetOutOfJailFree` or a non-movement money card leaves the walker on
/// the Chance/Chest square itself.
fn resolve(mut pos: u8, rng: &mut impl Rng) -> (u8, bool) {
    loop {
        if pos == GO_TO_JAIL_INDEX {
            return (JAIL_INDEX, true);
        }
        let deck = match board::square(pos).kind {
            monopoly_core::board::SquareKind::Chance => Deck::Chance,
            monopoly_core::board::SquareKind::CommunityChest => Deck::CommunityChest,
            _ => return (pos, false),
        };
        match draw(deck, rng) {
            CardEffect::AdvanceTo(dest) => pos = dest,
            CardEffect::AdvanceToNearest(kind) => pos = nearest(pos, kind),
            CardEffect::GoBack3 => pos = (pos + BOARD_SIZE - 3) % BOARD_SIZE,
            CardEffect::GoToJail => return (JAIL_INDEX, true),
            _ => return (pos, false),
        }
    }
}

/// Simulates one turn for a walker obeying `policy`, returning the
/// final resting square.
fn turn(walker: &mut Walker, policy: JailPolicy, rng: &mut impl Rng) -> u8 {
    if walker.jail_turns > 0 {
        let (sum, double) = roll(rng);
        let leaves = match policy {
            JailPolicy::Leave => true,
            JailPolicy::Stay => double || walker.jail_turns >= 3,
        };
        if !leaves {
            walker.jail_turns += 1;
            return JAIL_INDEX;
        }
        walker.jail_turns = 0;
        let (fp, jailed) = resolve((walker.pos + sum) % BOARD_SIZE, rng);
        walker.pos = fp;
        if jailed {
            walker.jail_turns = 1;
        }
        return walker.pos;
    }

    let mut streak = 0u8;
    loop {
        let (sum, double) = roll(rng);
        if double && streak == 2 {
            walker.pos = JAIL_INDEX;
            walker.jail_turns = 1;
            return JAIL_INDEX;
        }
        let (fp, jailed) = resolve((walker.pos + sum) % BOARD_SIZE, rng);
        walker.pos = fp;
        if jailed {
            walker.jail_turns = 1;
            return walker.pos;
        }
        if !double {
            return walker.pos;
        }
        streak += 1;
    }
}

fn simulate(policy: JailPolicy) -> Vec<f64> {
    let mut rng = StdRng::seed_from_u64(0x4d4f_4e4f_504f_4c59);
    let mut walker = Walker { pos: 0, jail_turns: 0 };
    let mut counts = [0u64; BOARD_SIZE as usize];

    for _ in 0..TURNS {
        let landed = turn(&mut walker, policy, &mut rng);
        counts[landed as usize] += 1;
    }

    counts.iter().map(|&c| c as f64 / TURNS as f64).collect()
}

#[test]
#[ignore]
fn stay_policy_matches_simulation() {
    let table = markov::solve(JailPolicy::Stay).expect("converges");
    let analytic = table.board_probabilities();
    let simulated = simulate(JailPolicy::Stay);

    for (sq, (&a, &s)) in analytic.iter().zip(&simulated).enumerate() {
        let delta = (a - s).abs() * 100.0;
        assert!(
            delta <= TOLERANCE_PP,
            "square {sq}: analytic {:.3}% vs simulated {:.3}% (delta {delta:.3}pp)",
            a * 100.0,
            s * 100.0
        );
    }
}

#[test]
#[ignore]
fn leave_policy_matches_simulation() {
    let table = markov::solve(JailPolicy::Leave).expect("converges");
    let analytic = table.board_probabilities();
    let simulated = simulate(JailPolicy::Leave);

    for (sq, (&a, &s)) in analytic.iter().zip(&simulated).enumerate() {
        let delta = (a - s).abs() * 100.0;
        assert!(
            delta <= TOLERANCE_PP,
            "square {sq}: analytic {:.3}% vs simulated {:.3}% (delta {delta:.3}pp)",
            a * 100.0,
            s * 100.0
        );
    }
}
