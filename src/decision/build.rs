//! House building (and its mirror, selling houses for debt), spec.md
//! §4.4 "House building". Honors even-building: a monopoly's house
//! counts may never differ by more than one across its member squares.

use crate::board::{self, ColorGroup};
use crate::config::EngineConfig;
use crate::snapshot::GameSnapshot;
use crate::valuator::{DevelopmentLevel, Valuator};

/// One legal next-house step: building on `sq` would take it from
/// `from_houses` to `from_houses + 1`.
#[derive(Debug, Clone, Copy)]
struct Candidate {
    sq: u8,
    from_houses: u8,
    cost: i64,
    marginal_roi: f64,
}

/// Every step the `build` procedure applies, in the order they were
/// bought, as `(square, new_house_count)`.
pub type BuildStep = (u8, u8);

/// Greedily builds houses for `player` within `cash - reserve`,
/// honoring even-building and (when enabled) promoting any step that
/// reaches the third house above equal- or lower-ROI steps elsewhere.
pub fn build(
    valuator: &Valuator,
    snapshot: &GameSnapshot,
    player: usize,
    available_cash: i64,
    opponent_count: u32,
    config: &EngineConfig,
) -> Vec<BuildStep> {
    let mut houses: std::collections::HashMap<u8, u8> = snapshot
        .squares
        .iter()
        .enumerate()
        .filter(|(_, s)| s.owner == Some(player))
        .map(|(idx, s)| (idx as u8, s.houses))
        .collect();

    let mut funds = available_cash;
    let mut steps = Vec::new();

    loop {
        let mut candidates = legal_candidates(valuator, snapshot, player, &houses);
        sort_candidates(&mut candidates, config, opponent_count, valuator, Direction::Build);

        let Some(pick) = candidates.into_iter().find(|c| c.cost <= funds) else {
            break;
        };

        funds -= pick.cost;
        let new_count = pick.from_houses + 1;
        houses.insert(pick.sq, new_count);
        steps.push((pick.sq, new_count));
    }

    steps
}

/// The reverse procedure: sells houses (for debt) in descending order
/// of the same marginal-ROI ranking, i.e. the least valuable house
/// step goes first.
pub fn sell_houses(
    valuator: &Valuator,
    snapshot: &GameSnapshot,
    player: usize,
    opponent_count: u32,
    config: &EngineConfig,
) -> Vec<BuildStep> {
    let mut houses: std::collections::HashMap<u8, u8> = snapshot
        .squares
        .iter()
        .enumerate()
        .filter(|(_, s)| s.owner == Some(player))
        .map(|(idx, s)| (idx as u8, s.houses))
        .collect();

    let mut steps = Vec::new();
    loop {
        let mut candidates = sellable_candidates(valuator, snapshot, player, &houses);
        sort_candidates(&mut candidates, config, opponent_count, valuator, Direction::Sell);

        let Some(pick) = candidates.last().copied() else { break };
        let new_count = pick.from_houses - 1;
        houses.insert(pick.sq, new_count);
        steps.push((pick.sq, new_count));
    }
    steps
}

/// Squares where a next house may legally be placed: owned, part of a
/// held monopoly, not yet at a hotel, and at the group's current
/// minimum house count (even-building).
fn legal_candidates(
    valuator: &Valuator,
    snapshot: &GameSnapshot,
    player: usize,
    houses: &std::collections::HashMap<u8, u8>,
) -> Vec<Candidate> {
    let mut out = Vec::new();
    for &group in &ColorGroup::ALL {
        if !snapshot.is_monopoly(group, player) {
            continue;
        }
        let Some(members) = board::PROPS_BY_GROUP.get(&group) else { continue };
        let min_houses = members.iter().map(|&sq| houses[&sq]).min().unwrap_or(0);

        for &sq in members {
            let current = houses[&sq];
            if current != min_houses || current >= 5 {
                continue;
            }
            let Some(street) = valuator.street(sq) else { continue };
            out.push(Candidate {
                sq,
                from_houses: current,
                cost: street.house_cost as i64,
                marginal_roi: 0.0, // filled in by sort_candidates
            });
        }
    }
    out
}

/// Squares where a house could legally be *sold*: owned, part of a
/// held monopoly, at least one house, and at the group's current
/// maximum house count (selling must preserve even-building too).
fn sellable_candidates(
    valuator: &Valuator,
    snapshot: &GameSnapshot,
    player: usize,
    houses: &std::collections::HashMap<u8, u8>,
) -> Vec<Candidate> {
    let mut out = Vec::new();
    for &group in &ColorGroup::ALL {
        if !snapshot.is_monopoly(group, player) {
            continue;
        }
        let Some(members) = board::PROPS_BY_GROUP.get(&group) else { continue };
        let max_houses = members.iter().map(|&sq| houses[&sq]).max().unwrap_or(0);

        for &sq in members {
            let current = houses[&sq];
            if current != max_houses || current == 0 {
                continue;
            }
            let Some(street) = valuator.street(sq) else { continue };
            out.push(Candidate {
                sq,
                from_houses: current,
                cost: street.house_cost as i64,
                marginal_roi: 0.0,
            });
        }
    }
    out
}

/// Which way a candidate's `from_houses` count is about to move: `Build`
/// steps from `from_houses` to `from_houses + 1`; `Sell` steps remove
/// the house at `from_houses - 1` to `from_houses`, i.e. the house
/// actually being sold, never `from_houses` itself (which, at a hotel,
/// would be the invalid 6th level).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Build,
    Sell,
}

/// Sorts by marginal ROI descending, ranking each candidate by the ROI
/// of the house step `direction` actually touches; when
/// `third_house_priority` is enabled and `direction` is `Build`, every
/// step whose target is the 3rd house is stably promoted above steps
/// that aren't.
fn sort_candidates(
    candidates: &mut [Candidate],
    config: &EngineConfig,
    opponent_count: u32,
    valuator: &Valuator,
    direction: Direction,
) {
    for c in candidates.iter_mut() {
        let street = valuator.street(c.sq).expect("candidate always a street");
        let (before, after) = match direction {
            Direction::Build => {
                (DevelopmentLevel::for_houses(c.from_houses), DevelopmentLevel::for_houses(c.from_houses + 1))
            }
            Direction::Sell => {
                (DevelopmentLevel::for_houses(c.from_houses - 1), DevelopmentLevel::for_houses(c.from_houses))
            }
        };
        c.marginal_roi = street.marginal_roi(before, after, opponent_count);
    }

    candidates.sort_by(|a, b| b.marginal_roi.partial_cmp(&a.marginal_roi).unwrap());

    if direction == Direction::Build && config.third_house_priority {
        candidates.sort_by_key(|c| std::cmp::Reverse(c.from_houses + 1 == 3));
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

    fn monopoly_snapshot(group: ColorGroup, player: usize, n_players: usize) -> GameSnapshot {
        let mut squares = vec![SquareState::UNOWNED; board::BOARD_SIZE as usize];
        for &sq in board::PROPS_BY_GROUP.get(&group).unwrap() {
            squares[sq as usize] = SquareState { owner: Some(player), houses: 0, mortgaged: false };
        }
        GameSnapshot {
            turn: 40,
            players: (0..n_players)
                .map(|_| PlayerSnapshot {
                    cash: 1500,
                    position: 0,
                    jail_turns: 0,
                    jailed: false,
                    bankrupt: false,
                    owned_squares: vec![],
                })
                .collect(),
            squares,
        }
    }

    #[test]
    fn even_building_reaches_one_house_each_before_any_second() {
        let v = valuator();
        let snap = monopoly_snapshot(ColorGroup::LightBlue, 0, 2);
        let config = EngineConfig::default();
        let steps = build(&v, &snap, 0, 1000, 1, &config);

        let group = board::PROPS_BY_GROUP.get(&ColorGroup::LightBlue).unwrap();
        let first_three: Vec<u8> = steps.iter().take(3).map(|(sq, _)| *sq).collect();
        for &sq in group {
            assert!(first_three.contains(&sq), "square {sq} should reach 1 house before any 2nd");
        }
        for (_, count) in steps.iter().take(3) {
            assert_eq!(*count, 1);
        }
    }

    #[test]
    fn build_never_violates_even_building_at_any_step() {
        let v = valuator();
        let snap = monopoly_snapshot(ColorGroup::Orange, 0, 2);
        let config = EngineConfig::default();
        let steps = build(&v, &snap, 0, 5000, 1, &config);

        let group = board::PROPS_BY_GROUP.get(&ColorGroup::Orange).unwrap().clone();
        let mut houses: std::collections::HashMap<u8, u8> =
            group.iter().map(|&sq| (sq, 0u8)).collect();
        for (sq, new_count) in steps {
            houses.insert(sq, new_count);
            let values: Vec<u8> = group.iter().map(|s| houses[s]).collect();
            let min = *values.iter().min().unwrap();
            let max = *values.iter().max().unwrap();
            assert!(max - min <= 1, "even-building violated: {values:?}");
        }
    }

    #[test]
    fn sell_houses_is_reverse_order_of_build() {
        let v = valuator();
        let mut snap = monopoly_snapshot(ColorGroup::Brown, 0, 2);
        for &sq in board::PROPS_BY_GROUP.get(&ColorGroup::Brown).unwrap() {
            snap.squares[sq as usize].houses = 3;
        }
        let config = EngineConfig::default();
        let steps = sell_houses(&v, &snap, 0, 1, &config);
        assert!(!steps.is_empty());
        for (_, new_count) in &steps {
            assert!(*new_count <= 2);
        }
    }

    #[test]
    fn sell_houses_on_a_hotel_bearing_monopoly_does_not_panic() {
        let v = valuator();
        let mut snap = monopoly_snapshot(ColorGroup::Brown, 0, 2);
        for &sq in board::PROPS_BY_GROUP.get(&ColorGroup::Brown).unwrap() {
            snap.squares[sq as usize].houses = 5;
        }
        let config = EngineConfig::default();
        let steps = sell_houses(&v, &snap, 0, 1, &config);
        assert!(!steps.is_empty());
        for (_, new_count) in &steps {
            assert!(*new_count <= 4);
        }
    }
}
