//! Mortgage-to-raise-N and its inverse, spec.md §4.4
//! "Mortgage-to-raise-N".

use crate::board;
use crate::config::EngineConfig;
use crate::decision;
use crate::snapshot::GameSnapshot;
use crate::valuator::{self, Valuator};

/// Picks unmortgaged, unimproved owned squares to mortgage — sorted by
/// efficiency (`payout / max(diffVal, epsilon)` descending) — until
/// their combined payout reaches `amount`. Returns an empty vector
/// (never an error) if nothing eligible exists, per spec.md §7: the
/// host must treat that as a bankruptcy condition, not a core failure.
pub fn mortgage_to_raise(
    valuator: &Valuator,
    snapshot: &GameSnapshot,
    player: usize,
    amount: i64,
    config: &EngineConfig,
) -> Vec<u8> {
    const EPSILON: f64 = 1e-6;
    let opponents = decision::opponent_count(snapshot, player);

    let mut candidates: Vec<(u8, i64, f64)> = snapshot
        .squares
        .iter()
        .enumerate()
        .filter(|(_, s)| s.owner == Some(player) && !s.mortgaged && s.houses == 0)
        .filter_map(|(idx, _)| {
            let sq = idx as u8;
            let mortgage_value = board::square(sq).mortgage_value()?;
            let diff = valuator::diff_value(valuator, snapshot, sq, player, config, opponents).total;
            Some((sq, mortgage_value as i64, diff))
        })
        .collect();

    candidates.sort_by(|a, b| {
        let eff_a = a.1 as f64 / a.2.max(EPSILON);
        let eff_b = b.1 as f64 / b.2.max(EPSILON);
        eff_b.partial_cmp(&eff_a).unwrap()
    });

    let mut raised = 0;
    let mut chosen = Vec::new();
    for (sq, payout, _) in candidates {
        if raised >= amount {
            break;
        }
        chosen.push(sq);
        raised += payout;
    }
    chosen
}

/// The inverse: while cash clears the reserve, unmortgages squares in
/// descending `diffVal` order at `floor(price * 0.55)` per square.
pub fn unmortgage_idle(
    valuator: &Valuator,
    snapshot: &GameSnapshot,
    player: usize,
    config: &EngineConfig,
) -> Vec<u8> {
    let phase = decision::game_phase(snapshot);
    let reserve = decision::min_reserve(phase, config);
    let opponents = decision::opponent_count(snapshot, player);

    let mut candidates: Vec<(u8, i64, f64)> = snapshot
        .squares
        .iter()
        .enumerate()
        .filter(|(_, s)| s.owner == Some(player) && s.mortgaged)
        .filter_map(|(idx, _)| {
            let sq = idx as u8;
            let price = board::square(sq).price()?;
            let cost = (price as f64 * 0.55).floor() as i64;
            let diff = valuator::diff_value(valuator, snapshot, sq, player, config, opponents).total;
            Some((sq, cost, diff))
        })
        .collect();

    candidates.sort_by(|a, b| b.2.partial_cmp(&a.2).unwrap());

    let mut cash = snapshot.players[player].cash;
    let mut chosen = Vec::new();
    for (sq, cost, _) in candidates {
        if cash - cost < reserve {
            continue;
        }
        chosen.push(sq);
        cash -= cost;
    }
    chosen
}
