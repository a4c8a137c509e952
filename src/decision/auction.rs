//! Auction bidding, spec.md §4.4 "Auction bid".

use crate::board;
use crate::config::EngineConfig;
use crate::decision::{self, min_reserve};
use crate::snapshot::GameSnapshot;
use crate::valuator::Valuator;

/// A bidder's response to the current leading bid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BidDecision {
    Exit,
    Bid(i64),
}

/// Minimum raise increment, per spec.md's "max(10, round(0.20*(W-b)))".
fn raise_increment(willingness: f64, current_bid: i64) -> i64 {
    let proportional = (0.20 * (willingness - current_bid as f64)).round() as i64;
    proportional.max(10)
}

/// Computes the next bid (or exit) for `player` on `sq`, currently at
/// `current_bid`, given `price` (the listed purchase price).
pub fn bid(
    valuator: &Valuator,
    snapshot: &GameSnapshot,
    sq: u8,
    price: i64,
    current_bid: i64,
    player: usize,
    config: &EngineConfig,
) -> BidDecision {
    let phase = decision::game_phase(snapshot);
    let reserve = min_reserve(phase, config);
    let max_affordable = snapshot.players[player].cash - reserve;

    if current_bid as f64 >= max_affordable as f64 {
        return BidDecision::Exit;
    }

    let mut willingness = price as f64;
    if completes_our_monopoly(snapshot, sq, player) {
        willingness *= config.monopoly_completion_bonus;
    }
    if blocks_opponent(snapshot, sq, player) {
        willingness *= config.blocking_bid_bonus;
    }
    willingness = willingness.min(config.auction_max_overpay * price as f64);
    willingness = willingness.min(max_affordable as f64);

    if current_bid as f64 >= willingness {
        return BidDecision::Exit;
    }

    let next = current_bid + raise_increment(willingness, current_bid);
    let clamped = (next as f64).min(willingness).min(max_affordable as f64);
    BidDecision::Bid(clamped.round() as i64)
}

fn completes_our_monopoly(snapshot: &GameSnapshot, sq: u8, player: usize) -> bool {
    let Some(group) = board::square(sq).color_group() else { return false };
    board::PROPS_BY_GROUP
        .get(&group)
        .map(|squares| {
            squares
                .iter()
                .filter(|&&member| member != sq)
                .all(|&member| snapshot.square(member).owner == Some(player))
        })
        .unwrap_or(false)
}

fn blocks_opponent(snapshot: &GameSnapshot, sq: u8, player: usize) -> bool {
    let Some(group) = board::square(sq).color_group() else { return false };
    let Some(squares) = board::PROPS_BY_GROUP.get(&group) else { return false };
    let others: Vec<u8> = squares.iter().filter(|&&m| m != sq).copied().collect();
    if others.is_empty() {
        return false;
    }
    match snapshot.square(others[0]).owner {
        Some(owner) if owner != player => {
            others.iter().all(|&m| snapshot.square(m).owner == Some(owner))
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::ColorGroup;
    use crate::markov::{self, JailPolicy};
    use crate::snapshot::{PlayerSnapshot, SquareState};
    use crate::valuator;

    fn valuator() -> Valuator {
        valuator::build(&markov::solve(JailPolicy::Stay).expect("converges"))
    }

    fn snapshot(cash: i64) -> GameSnapshot {
        GameSnapshot {
            turn: 30,
            players: vec![
                PlayerSnapshot {
                    cash,
                    position: 0,
                    jail_turns: 0,
                    jailed: false,
                    bankrupt: false,
                    owned_squares: vec![],
                },
                PlayerSnapshot {
                    cash: 1500,
                    position: 0,
                    jail_turns: 0,
                    jailed: false,
                    bankrupt: false,
                    owned_squares: vec![],
                },
            ],
            squares: vec![SquareState::UNOWNED; board::BOARD_SIZE as usize],
        }
    }

    #[test]
    fn reserve_respecting_exit() {
        let v = valuator();
        let config = EngineConfig::default();
        let mut snap = snapshot(250);
        // Sell twelve non-street squares to force the mid-game phase
        // (10+ sold, still no monopoly) so the reserve is $150, not the
        // early-phase $200 — matching the spec's stated "phase mid" setup.
        for &sq in &[0u8, 2, 4, 5, 7, 10, 12, 15, 17, 20, 22, 25] {
            snap.squares[sq as usize].owner = Some(1);
        }
        // Boardwalk: price $400, cash $250, mid phase reserve $150 => max
        // $100. The auction has already climbed past our ceiling, so we
        // exit on rule 1 (`b >= M`) without ever computing willingness.
        let decision = bid(&v, &snap, 39, 400, 100, 0, &config);
        assert_eq!(decision, BidDecision::Exit);
    }

    #[test]
    fn blocking_bid_raises_willingness() {
        let v = valuator();
        let config = EngineConfig::default();
        let mut snap = snapshot(1500);
        let group = board::PROPS_BY_GROUP.get(&ColorGroup::Red).unwrap().clone();
        snap.squares[group[0] as usize].owner = Some(1);
        snap.squares[group[1] as usize].owner = Some(1);

        // Price for Indiana/Kentucky is $220; bidding stays in well past price.
        let decision = bid(&v, &snap, group[2], 220, 250, 0, &config);
        assert!(matches!(decision, BidDecision::Bid(_)));
    }

    #[test]
    fn bid_never_exceeds_cash_minus_reserve() {
        let v = valuator();
        let config = EngineConfig::default();
        let snap = snapshot(500);
        if let BidDecision::Bid(amount) = bid(&v, &snap, 6, 100, 50, 0, &config) {
            let reserve = min_reserve(decision::game_phase(&snap), &config);
            assert!(amount <= snap.players[0].cash - reserve);
        }
    }
}
