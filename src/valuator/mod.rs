//! Property EPT tables and the differential-value function the
//! decision layer ranks every acquisition, bid, and trade leg by.

use std::collections::HashMap;

use crate::board::{self, ColorGroup, RAILROAD_POSITIONS, RAILROAD_RENTS, UTILITY_MULTIPLIERS, UTILITY_POSITIONS};
use crate::config::EngineConfig;
use crate::dice;
use crate::markov::MarkovTable;
use crate::snapshot::GameSnapshot;

/// A street's development level. Variant order matches house count
/// except for the leading `NoMonopoly`/`Monopoly0` split: both have
/// zero houses, but rent only doubles once the owner holds every
/// square in the color group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DevelopmentLevel {
    NoMonopoly,
    Monopoly0,
    OneHouse,
    TwoHouses,
    ThreeHouses,
    FourHouses,
    Hotel,
}

impl DevelopmentLevel {
    pub const ALL: [DevelopmentLevel; 7] = [
        DevelopmentLevel::NoMonopoly,
        DevelopmentLevel::Monopoly0,
        DevelopmentLevel::OneHouse,
        DevelopmentLevel::TwoHouses,
        DevelopmentLevel::ThreeHouses,
        DevelopmentLevel::FourHouses,
        DevelopmentLevel::Hotel,
    ];

    /// Maps an owned monopoly's house count (0..=5, 5 meaning hotel)
    /// to its development level.
    pub fn for_houses(houses: u8) -> DevelopmentLevel {
        match houses {
            0 => DevelopmentLevel::Monopoly0,
            1 => DevelopmentLevel::OneHouse,
            2 => DevelopmentLevel::TwoHouses,
            3 => DevelopmentLevel::ThreeHouses,
            4 => DevelopmentLevel::FourHouses,
            5 => DevelopmentLevel::Hotel,
            _ => panic!("house count {houses} outside 0..=5"),
        }
    }
}

/// Per-square, per-level expected rent income (from one opponent
/// landing there per turn) for a street.
#[derive(Debug, Clone, Copy)]
pub struct StreetEpt {
    pub square: u8,
    pub group: ColorGroup,
    pub house_cost: u32,
    ept: [f64; 7],
}

impl StreetEpt {
    pub fn ept_at(&self, level: DevelopmentLevel) -> f64 {
        self.ept[level as usize]
    }

    /// Additional EPT per opponent-turn from the next house step,
    /// divided by its cost, scaled to the actual opponent count.
    pub fn marginal_roi(
        &self,
        before: DevelopmentLevel,
        after: DevelopmentLevel,
        opponent_count: u32,
    ) -> f64 {
        (self.ept_at(after) - self.ept_at(before)) * opponent_count as f64 / self.house_cost as f64
    }
}

/// Per-square EPT keyed by number of railroads the owner holds (index
/// 0 unused; valid range 1..=4).
#[derive(Debug, Clone, Copy)]
pub struct RailroadEpt {
    pub square: u8,
    ept_by_count: [f64; 5],
}

impl RailroadEpt {
    pub fn ept_at(&self, count: usize) -> f64 {
        self.ept_by_count[count]
    }
}

/// Per-square EPT keyed by number of utilities the owner holds (index
/// 0 unused; valid range 1..=2).
#[derive(Debug, Clone, Copy)]
pub struct UtilityEpt {
    pub square: u8,
    ept_by_count: [f64; 3],
}

impl UtilityEpt {
    pub fn ept_at(&self, count: usize) -> f64 {
        self.ept_by_count[count]
    }
}

/// The full set of EPT tables for one jail policy, built once from a
/// solved `MarkovTable` and reused for every decision call.
#[derive(Debug, Clone)]
pub struct Valuator {
    streets: HashMap<u8, StreetEpt>,
    railroads: HashMap<u8, RailroadEpt>,
    utilities: HashMap<u8, UtilityEpt>,
}

impl Valuator {
    pub fn street(&self, sq: u8) -> Option<&StreetEpt> {
        self.streets.get(&sq)
    }

    pub fn railroad(&self, sq: u8) -> Option<&RailroadEpt> {
        self.railroads.get(&sq)
    }

    pub fn utility(&self, sq: u8) -> Option<&UtilityEpt> {
        self.utilities.get(&sq)
    }
}

/// Builds every square's EPT table from `markov`'s steady-state
/// distribution.
pub fn build(markov: &MarkovTable) -> Valuator {
    let mut streets = HashMap::new();
    let mut railroads = HashMap::new();
    let mut utilities = HashMap::new();

    for square in board::SQUARES.iter() {
        let pi = markov.square_probability(square.index);
        match &square.kind {
            board::SquareKind::Street { group, rents, house_cost, .. } => {
                let mut ept = [0.0; 7];
                ept[DevelopmentLevel::NoMonopoly as usize] = pi * rents[0] as f64;
                ept[DevelopmentLevel::Monopoly0 as usize] = pi * rents[0] as f64 * 2.0;
                for (level, rent) in DevelopmentLevel::ALL[2..].iter().zip(&rents[1..]) {
                    ept[*level as usize] = pi * *rent as f64;
                }
                streets.insert(
                    square.index,
                    StreetEpt { square: square.index, group: *group, house_cost: *house_cost, ept },
                );
            }
            board::SquareKind::Railroad { .. } => {
                let mut ept_by_count = [0.0; 5];
                for count in 1..=4usize {
                    ept_by_count[count] = pi * RAILROAD_RENTS[count] as f64;
                }
                railroads.insert(square.index, RailroadEpt { square: square.index, ept_by_count });
            }
            board::SquareKind::Utility { .. } => {
                let mut ept_by_count = [0.0; 3];
                for count in 1..=2usize {
                    ept_by_count[count] = pi * dice::expected_roll() * UTILITY_MULTIPLIERS[count] as f64;
                }
                utilities.insert(square.index, UtilityEpt { square: square.index, ept_by_count });
            }
            _ => {}
        }
    }

    Valuator { streets, railroads, utilities }
}

/// EPT gained by owning plus EPT denied to opponents, in dollars per
/// opponent-turn, already multiplied by `opponent_count`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DiffValue {
    pub own_ept: f64,
    pub denial_ept: f64,
    pub total: f64,
}

/// The differential value of `player` acquiring `sq` (assumed
/// currently unowned), per spec §4.3: own-EPT (with the
/// monopoly-completion multiplier looking ahead to the 3-house level)
/// plus denial-EPT (half the group's 3-house EPT when a single
/// opponent already holds the rest of the group).
pub fn diff_value(
    valuator: &Valuator,
    snapshot: &GameSnapshot,
    sq: u8,
    player: usize,
    config: &EngineConfig,
    opponent_count: u32,
) -> DiffValue {
    let (own_ept, denial_ept) = if let Some(street) = valuator.street(sq) {
        let completes = completes_monopoly(snapshot, sq, player);
        let own = if completes {
            street.ept_at(DevelopmentLevel::ThreeHouses) * config.monopoly_completion_bonus
        } else {
            street.ept_at(DevelopmentLevel::NoMonopoly)
        };
        let denial = if blocks_opponent_monopoly(snapshot, sq, player) {
            config.denial_factor * street.ept_at(DevelopmentLevel::ThreeHouses)
        } else {
            0.0
        };
        (own, denial)
    } else if let Some(rail) = valuator.railroad(sq) {
        let new_count = snapshot.owned_count(&RAILROAD_POSITIONS, player) + 1;
        (rail.ept_at(new_count), 0.0)
    } else if let Some(util) = valuator.utility(sq) {
        let new_count = snapshot.owned_count(&UTILITY_POSITIONS, player) + 1;
        (util.ept_at(new_count), 0.0)
    } else {
        (0.0, 0.0)
    };

    let total = (own_ept + denial_ept) * opponent_count as f64;
    DiffValue { own_ept, denial_ept, total }
}

/// Whether buying `sq` would complete `player`'s color group (every
/// other member of the group already owned by `player`).
fn completes_monopoly(snapshot: &GameSnapshot, sq: u8, player: usize) -> bool {
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

/// Whether exactly one opponent already owns every other square in
/// `sq`'s group, meaning our acquisition denies them the monopoly.
fn blocks_opponent_monopoly(snapshot: &GameSnapshot, sq: u8, player: usize) -> bool {
    let Some(group) = board::square(sq).color_group() else { return false };
    let Some(squares) = board::PROPS_BY_GROUP.get(&group) else { return false };
    let others: Vec<u8> = squares.iter().filter(|&&member| member != sq).copied().collect();
    if others.is_empty() {
        return false;
    }
    let first_owner = snapshot.square(others[0]).owner;
    match first_owner {
        Some(owner) if owner != player => {
            others.iter().all(|&member| snapshot.square(member).owner == Some(owner))
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markov::{self, JailPolicy};
    use crate::snapshot::{PlayerSnapshot, SquareState};

    fn valuator() -> Valuator {
        build(&markov::solve(JailPolicy::Stay).expect("converges"))
    }

    fn empty_snapshot(n: usize) -> GameSnapshot {
        GameSnapshot {
            turn: 1,
            players: (0..n)
                .map(|_| PlayerSnapshot {
                    cash: 1500,
                    position: 0,
                    jail_turns: 0,
                    jailed: false,
                    bankrupt: false,
                    owned_squares: vec![],
                })
                .collect(),
            squares: vec![SquareState::UNOWNED; board::BOARD_SIZE as usize],
        }
    }

    #[test]
    fn street_ept_increases_monotonically_with_development() {
        let v = valuator();
        let street = v.street(1).expect("Mediterranean is a street");
        let levels = DevelopmentLevel::ALL;
        for pair in levels.windows(2) {
            assert!(street.ept_at(pair[0]) <= street.ept_at(pair[1]) + 1e-12);
        }
    }

    #[test]
    fn diff_value_nonnegative_for_ownable_square() {
        let v = valuator();
        let snap = empty_snapshot(3);
        let config = EngineConfig::default();
        for sq in 0..board::BOARD_SIZE {
            if board::square(sq).is_ownable() {
                let dv = diff_value(&v, &snap, sq, 0, &config, 2);
                assert!(dv.total >= 0.0, "square {sq} gave negative diff value");
            }
        }
    }

    #[test]
    fn diff_value_zero_for_non_property_square() {
        let v = valuator();
        let snap = empty_snapshot(3);
        let config = EngineConfig::default();
        let dv = diff_value(&v, &snap, 0, 0, &config, 2); // Go
        assert_eq!(dv.total, 0.0);
    }

    #[test]
    fn monopoly_completion_boosts_own_ept() {
        let v = valuator();
        let config = EngineConfig::default();
        let group = board::PROPS_BY_GROUP.get(&ColorGroup::Orange).unwrap().clone();

        let mut partial = empty_snapshot(2);
        partial.squares[group[0] as usize].owner = Some(0);
        let partial_dv = diff_value(&v, &partial, group[1], 0, &config, 1);

        let mut about_to_complete = empty_snapshot(2);
        about_to_complete.squares[group[0] as usize].owner = Some(0);
        about_to_complete.squares[group[1] as usize].owner = Some(0);
        let completing_dv = diff_value(&v, &about_to_complete, group[2], 0, &config, 1);

        assert!(completing_dv.own_ept > partial_dv.own_ept);
    }

    #[test]
    fn denial_ept_kicks_in_when_opponent_is_one_square_short() {
        let v = valuator();
        let config = EngineConfig::default();
        let group = board::PROPS_BY_GROUP.get(&ColorGroup::Red).unwrap().clone();

        let mut snap = empty_snapshot(2);
        snap.squares[group[0] as usize].owner = Some(1);
        snap.squares[group[1] as usize].owner = Some(1);

        let dv = diff_value(&v, &snap, group[2], 0, &config, 1);
        assert!(dv.denial_ept > 0.0);
    }

    #[test]
    fn monotonicity_in_opponent_count() {
        let v = valuator();
        let snap = empty_snapshot(4);
        let config = EngineConfig::default();
        let low = diff_value(&v, &snap, 1, 0, &config, 1);
        let high = diff_value(&v, &snap, 1, 0, &config, 3);
        assert!(high.total >= low.total);
    }
}
