//! The typed, read-only projection of an in-progress game that the
//! decision layer consumes. A `GameSnapshot` is a value: the engine
//! never mutates it, and the host's game engine is the only place
//! that ever observes the mutable game state this is built from.

use serde::{Deserialize, Serialize};

use crate::board::{self, ColorGroup};
use crate::error::{EngineError, Result};

/// A single player's observable state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerSnapshot {
    pub cash: i64,
    pub position: u8,
    /// Turns already served this jail stay (0, 1, or 2); irrelevant
    /// when the player isn't currently jailed.
    pub jail_turns: u8,
    pub jailed: bool,
    pub bankrupt: bool,
    pub owned_squares: Vec<u8>,
}

/// One board square's mutable state.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SquareState {
    pub owner: Option<usize>,
    /// 0..=5, where 5 means a hotel.
    pub houses: u8,
    pub mortgaged: bool,
}

impl SquareState {
    pub const UNOWNED: SquareState = SquareState { owner: None, houses: 0, mortgaged: false };

    pub fn has_hotel(&self) -> bool {
        self.houses == 5
    }
}

/// A complete, immutable view of one point in the game for the
/// decision layer to reason over.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub turn: u64,
    pub players: Vec<PlayerSnapshot>,
    /// Length must be exactly 40, indexed by board square.
    pub squares: Vec<SquareState>,
}

impl GameSnapshot {
    /// Checks every invariant from the data model section: square
    /// count, owner bounds, mortgaged-implies-no-houses, houses only
    /// on a square whose owner holds the full color group, and
    /// even-building within each monopolized group.
    pub fn validate(&self) -> Result<()> {
        if self.squares.len() != board::BOARD_SIZE as usize {
            return Err(EngineError::InvalidSnapshot(format!(
                "expected {} squares, found {}",
                board::BOARD_SIZE,
                self.squares.len()
            )));
        }

        for (idx, state) in self.squares.iter().enumerate() {
            let sq = board::square(idx as u8);

            if let Some(owner) = state.owner {
                if owner >= self.players.len() {
                    return Err(EngineError::InvalidSnapshot(format!(
                        "square {idx} owner index {owner} out of range"
                    )));
                }
                if !sq.is_ownable() {
                    return Err(EngineError::InvalidSnapshot(format!(
                        "square {idx} ({}) is not ownable but has an owner",
                        sq.name
                    )));
                }
            } else if state.houses > 0 || state.mortgaged {
                return Err(EngineError::InvalidSnapshot(format!(
                    "square {idx} has houses or is mortgaged but is unowned"
                )));
            }

            if state.houses > 5 {
                return Err(EngineError::InvalidSnapshot(format!(
                    "square {idx} has house count {} outside 0..=5",
                    state.houses
                )));
            }
            if state.houses > 0 && state.mortgaged {
                return Err(EngineError::InvalidSnapshot(format!(
                    "square {idx} is mortgaged but carries houses"
                )));
            }
            if state.houses > 0 && !sq.is_street() {
                return Err(EngineError::InvalidSnapshot(format!(
                    "square {idx} carries houses but is not a street"
                )));
            }
            if state.houses > 0 {
                match state.owner {
                    Some(owner) if self.is_monopoly(sq.color_group().expect("street"), owner) => {}
                    _ => {
                        return Err(EngineError::InvalidSnapshot(format!(
                            "square {idx} carries houses without its owner holding the full group"
                        )));
                    }
                }
            }
        }

        for group in ColorGroup::ALL {
            for (owner, _) in self.players.iter().enumerate() {
                if !self.is_monopoly(group, owner) {
                    continue;
                }
                let counts = self.group_house_counts(group, owner);
                if let (Some(&min), Some(&max)) = (counts.iter().min(), counts.iter().max()) {
                    if max - min > 1 {
                        return Err(EngineError::InvalidSnapshot(format!(
                            "group {group:?} owned by player {owner} violates even-building: {counts:?}"
                        )));
                    }
                }
            }
        }

        Ok(())
    }

    pub fn square(&self, sq: u8) -> &SquareState {
        &self.squares[sq as usize]
    }

    /// Whether `player` owns every square in `group`.
    pub fn is_monopoly(&self, group: ColorGroup, player: usize) -> bool {
        board::PROPS_BY_GROUP
            .get(&group)
            .map(|squares| squares.iter().all(|&sq| self.square(sq).owner == Some(player)))
            .unwrap_or(false)
    }

    /// House counts of a group's squares, in board order. Meaningless
    /// unless `player` holds the full group.
    pub fn group_house_counts(&self, group: ColorGroup, player: usize) -> Vec<u8> {
        board::PROPS_BY_GROUP
            .get(&group)
            .into_iter()
            .flatten()
            .filter(|&&sq| self.square(sq).owner == Some(player))
            .map(|&sq| self.square(sq).houses)
            .collect()
    }

    /// How many of a player's railroads/utilities are owned, for the
    /// ownership-count EPT tables.
    pub fn owned_count(&self, positions: &[u8], player: usize) -> usize {
        positions.iter().filter(|&&sq| self.square(sq).owner == Some(player)).count()
    }

    /// Number of squares any player owns that carry at least one
    /// house (used by the game-phase estimator and jail policy).
    pub fn developed_property_count(&self, player: usize) -> usize {
        self.squares
            .iter()
            .filter(|s| s.owner == Some(player) && s.houses > 0)
            .count()
    }

    pub fn total_properties_sold(&self) -> usize {
        self.squares.iter().filter(|s| s.owner.is_some()).count()
    }

    pub fn any_monopoly_exists(&self) -> bool {
        ColorGroup::ALL
            .iter()
            .any(|&g| (0..self.players.len()).any(|p| self.is_monopoly(g, p)))
    }

    /// Net worth: cash, plus unmortgaged property at full price, plus
    /// mortgaged property and houses at half value.
    pub fn net_worth(&self, player: usize) -> f64 {
        let mut worth = self.players[player].cash as f64;
        for (idx, state) in self.squares.iter().enumerate() {
            if state.owner != Some(player) {
                continue;
            }
            let sq = board::square(idx as u8);
            let price = sq.price().unwrap_or(0) as f64;
            if state.mortgaged {
                worth += 0.5 * price;
            } else {
                worth += price;
            }
            if let Some(house_cost) = sq.house_cost() {
                worth += 0.5 * house_cost as f64 * state.houses as f64;
            }
        }
        worth
    }
}
