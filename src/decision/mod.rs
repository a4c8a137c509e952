//! The strategic decision layer: the six procedures of spec.md §4.4
//! (buy, bid, build, trade, mortgage/unmortgage, jail) plus the
//! support functions of §4.5 (game phase, reserve, position/net worth)
//! that they all share.
//!
//! Every procedure here is a pure function of a `GameSnapshot`, a
//! `Valuator`, and an `EngineConfig` — matching `catanatron-rs`'s
//! `BasePlayer::decide` shape (`crate::players::base`), but against
//! closed-form EPT tables instead of a tree search over actions.

pub mod auction;
pub mod build;
pub mod buy;
pub mod jail;
pub mod mortgage;
pub mod trade;

use crate::config::EngineConfig;
use crate::snapshot::GameSnapshot;

/// Coarse game-phase estimate, per spec.md §4.5: drives the minimum
/// cash reserve and the jail-policy heuristic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    Early,
    Mid,
    Late,
}

/// `early` if fewer than 10 properties are sold and no monopoly exists
/// yet; `late` if at least 20 are sold and some monopoly exists;
/// otherwise `mid`.
pub fn game_phase(snapshot: &GameSnapshot) -> GamePhase {
    let sold = snapshot.total_properties_sold();
    let has_monopoly = snapshot.any_monopoly_exists();

    if sold < 10 && !has_monopoly {
        GamePhase::Early
    } else if sold >= 20 && has_monopoly {
        GamePhase::Late
    } else {
        GamePhase::Mid
    }
}

/// Minimum cash reserve for the current phase, per `config`'s
/// per-phase defaults (`$200`/`$150`/`$100`).
pub fn min_reserve(phase: GamePhase, config: &EngineConfig) -> i64 {
    match phase {
        GamePhase::Early => config.min_reserve_early,
        GamePhase::Mid => config.min_reserve_mid,
        GamePhase::Late => config.min_reserve_late,
    }
}

/// Number of opponents still in the game (not bankrupt, not `player`).
pub fn opponent_count(snapshot: &GameSnapshot, player: usize) -> u32 {
    snapshot
        .players
        .iter()
        .enumerate()
        .filter(|&(idx, p)| idx != player && !p.bankrupt)
        .count() as u32
}

/// Net-worth ranking of every player, highest first, for the optional
/// leader-aware trade policy and general position estimation.
pub fn net_worth_ranking(snapshot: &GameSnapshot) -> Vec<(usize, f64)> {
    let mut ranking: Vec<(usize, f64)> = (0..snapshot.players.len())
        .map(|p| (p, snapshot.net_worth(p)))
        .collect();
    ranking.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    ranking
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board;
    use crate::snapshot::{PlayerSnapshot, SquareState};

    fn snapshot_with_sold(n_sold: usize) -> GameSnapshot {
        let mut squares = vec![SquareState::UNOWNED; board::BOARD_SIZE as usize];
        let mut sold = 0;
        for square in squares.iter_mut() {
            if sold >= n_sold {
                break;
            }
            *square = SquareState { owner: Some(0), houses: 0, mortgaged: false };
            sold += 1;
        }
        GameSnapshot {
            turn: 1,
            players: vec![PlayerSnapshot {
                cash: 1500,
                position: 0,
                jail_turns: 0,
                jailed: false,
                bankrupt: false,
                owned_squares: vec![],
            }],
            squares,
        }
    }

    #[test]
    fn phase_is_early_before_ten_sales() {
        assert_eq!(game_phase(&snapshot_with_sold(3)), GamePhase::Early);
    }

    #[test]
    fn phase_is_mid_between_thresholds() {
        assert_eq!(game_phase(&snapshot_with_sold(15)), GamePhase::Mid);
    }

    #[test]
    fn reserve_decreases_across_phases() {
        let config = EngineConfig::default();
        assert!(min_reserve(GamePhase::Early, &config) > min_reserve(GamePhase::Mid, &config));
        assert!(min_reserve(GamePhase::Mid, &config) > min_reserve(GamePhase::Late, &config));
    }
}
