//! The 40-square US-edition board: immutable for the lifetime of the
//! process. Squares, color groups, and card decks are read-only
//! constant data that the rest of the core consumes; nothing in this
//! module mutates after construction.

pub mod cards;

use std::collections::HashMap;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

pub use cards::{CardDeck, CardEffect, Deck};

/// Number of squares on the board. Position indices run `0..BOARD_SIZE`.
pub const BOARD_SIZE: u8 = 40;

/// A street's color group. Railroads and utilities form their own
/// single-element "ownership-count" groups rather than a color group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColorGroup {
    Brown,
    LightBlue,
    Pink,
    Orange,
    Red,
    Yellow,
    Green,
    DarkBlue,
}

impl ColorGroup {
    pub const ALL: [ColorGroup; 8] = [
        ColorGroup::Brown,
        ColorGroup::LightBlue,
        ColorGroup::Pink,
        ColorGroup::Orange,
        ColorGroup::Red,
        ColorGroup::Yellow,
        ColorGroup::Green,
        ColorGroup::DarkBlue,
    ];
}

/// The full rent schedule for a street: `[base, 1h, 2h, 3h, 4h, hotel]`.
pub type RentSchedule = [u32; 6];

/// What kind of square a board position is.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum SquareKind {
    Go,
    Street {
        group: ColorGroup,
        price: u32,
        house_cost: u32,
        rents: RentSchedule,
        mortgage: u32,
    },
    Railroad {
        price: u32,
        mortgage: u32,
    },
    Utility {
        price: u32,
        mortgage: u32,
    },
    Tax {
        amount: u32,
    },
    Chance,
    CommunityChest,
    Jail,
    FreeParking,
    GoToJail,
}

/// One of the 40 immutable board squares.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Square {
    pub index: u8,
    pub name: &'static str,
    pub kind: SquareKind,
}

impl Square {
    pub fn is_street(&self) -> bool {
        matches!(self.kind, SquareKind::Street { .. })
    }

    pub fn is_ownable(&self) -> bool {
        matches!(
            self.kind,
            SquareKind::Street { .. } | SquareKind::Railroad { .. } | SquareKind::Utility { .. }
        )
    }

    pub fn color_group(&self) -> Option<ColorGroup> {
        match self.kind {
            SquareKind::Street { group, .. } => Some(group),
            _ => None,
        }
    }

    pub fn price(&self) -> Option<u32> {
        match self.kind {
            SquareKind::Street { price, .. } => Some(price),
            SquareKind::Railroad { price, .. } => Some(price),
            SquareKind::Utility { price, .. } => Some(price),
            _ => None,
        }
    }

    pub fn mortgage_value(&self) -> Option<u32> {
        match self.kind {
            SquareKind::Street { mortgage, .. } => Some(mortgage),
            SquareKind::Railroad { mortgage, .. } => Some(mortgage),
            SquareKind::Utility { mortgage, .. } => Some(mortgage),
            _ => None,
        }
    }

    pub fn house_cost(&self) -> Option<u32> {
        match self.kind {
            SquareKind::Street { house_cost, .. } => Some(house_cost),
            _ => None,
        }
    }
}

/// Shared railroad rent schedule, keyed by number of railroads the
/// owner holds (index 0 unused — `RAILROAD_RENTS[count]`).
pub const RAILROAD_RENTS: [u32; 5] = [0, 25, 50, 100, 200];

/// Utility rent multiplier on a dice roll, keyed by number owned.
pub const UTILITY_MULTIPLIERS: [u32; 3] = [0, 4, 10];

fn street(
    index: u8,
    name: &'static str,
    group: ColorGroup,
    price: u32,
    rents: RentSchedule,
    house_cost: u32,
) -> Square {
    Square {
        index,
        name,
        kind: SquareKind::Street {
            group,
            price,
            house_cost,
            rents,
            mortgage: price / 2,
        },
    }
}

fn railroad(index: u8, name: &'static str) -> Square {
    Square {
        index,
        name,
        kind: SquareKind::Railroad {
            price: 200,
            mortgage: 100,
        },
    }
}

fn utility(index: u8, name: &'static str, price: u32) -> Square {
    Square {
        index,
        name,
        kind: SquareKind::Utility {
            price,
            mortgage: price / 2,
        },
    }
}

/// The standard US-edition board, built once and shared for the
/// process lifetime. Prices, rents, and house costs are the official
/// Hasbro rent-card values.
pub static SQUARES: Lazy<[Square; BOARD_SIZE as usize]> = Lazy::new(|| {
    use ColorGroup::*;
    [
        Square { index: 0, name: "Go", kind: SquareKind::Go },
        street(1, "Mediterranean Avenue", Brown, 60, [2, 10, 30, 90, 160, 250], 50),
        Square { index: 2, name: "Community Chest", kind: SquareKind::CommunityChest },
        street(3, "Baltic Avenue", Brown, 60, [4, 20, 60, 180, 320, 450], 50),
        Square { index: 4, name: "Income Tax", kind: SquareKind::Tax { amount: 200 } },
        railroad(5, "Reading Railroad"),
        street(6, "Oriental Avenue", LightBlue, 100, [6, 30, 90, 270, 400, 550], 50),
        Square { index: 7, name: "Chance", kind: SquareKind::Chance },
        street(8, "Vermont Avenue", LightBlue, 100, [6, 30, 90, 270, 400, 550], 50),
        street(9, "Connecticut Avenue", LightBlue, 120, [8, 40, 100, 300, 450, 600], 50),
        Square { index: 10, name: "Jail", kind: SquareKind::Jail },
        street(11, "St. Charles Place", Pink, 140, [10, 50, 150, 450, 625, 750], 100),
        utility(12, "Electric Company", 150),
        street(13, "States Avenue", Pink, 140, [10, 50, 150, 450, 625, 750], 100),
        street(14, "Virginia Avenue", Pink, 160, [12, 60, 180, 500, 700, 900], 100),
        railroad(15, "Pennsylvania Railroad"),
        street(16, "St. James Place", Orange, 180, [14, 70, 200, 550, 750, 950], 100),
        Square { index: 17, name: "Community Chest", kind: SquareKind::CommunityChest },
        street(18, "Tennessee Avenue", Orange, 180, [14, 70, 200, 550, 750, 950], 100),
        street(19, "New York Avenue", Orange, 200, [16, 80, 220, 600, 800, 1000], 100),
        Square { index: 20, name: "Free Parking", kind: SquareKind::FreeParking },
        street(21, "Kentucky Avenue", Red, 220, [18, 90, 250, 700, 875, 1050], 150),
        Square { index: 22, name: "Chance", kind: SquareKind::Chance },
        street(23, "Indiana Avenue", Red, 220, [18, 90, 250, 700, 875, 1050], 150),
        street(24, "Illinois Avenue", Red, 240, [20, 100, 300, 750, 925, 1100], 150),
        railroad(25, "B&O Railroad"),
        street(26, "Atlantic Avenue", Yellow, 260, [22, 110, 330, 800, 975, 1150], 150),
        street(27, "Ventnor Avenue", Yellow, 260, [22, 110, 330, 800, 975, 1150], 150),
        utility(28, "Water Works", 150),
        street(29, "Marvin Gardens", Yellow, 280, [24, 120, 360, 850, 1025, 1200], 150),
        Square { index: 30, name: "Go To Jail", kind: SquareKind::GoToJail },
        street(31, "Pacific Avenue", Green, 300, [26, 130, 390, 900, 1100, 1275], 200),
        street(32, "North Carolina Avenue", Green, 300, [26, 130, 390, 900, 1100, 1275], 200),
        Square { index: 33, name: "Community Chest", kind: SquareKind::CommunityChest },
        street(34, "Pennsylvania Avenue", Green, 320, [28, 150, 450, 1000, 1200, 1400], 200),
        railroad(35, "Short Line"),
        Square { index: 36, name: "Chance", kind: SquareKind::Chance },
        street(37, "Park Place", DarkBlue, 350, [35, 175, 500, 1100, 1300, 1500], 200),
        Square { index: 38, name: "Luxury Tax", kind: SquareKind::Tax { amount: 100 } },
        street(39, "Boardwalk", DarkBlue, 400, [50, 200, 600, 1400, 1700, 2000], 200),
    ]
});

/// Positions of every street, grouped by color. Built once from
/// `SQUARES` rather than hand-transcribed a second time.
pub static PROPS_BY_GROUP: Lazy<HashMap<ColorGroup, Vec<u8>>> = Lazy::new(|| {
    let mut map: HashMap<ColorGroup, Vec<u8>> = HashMap::new();
    for square in SQUARES.iter() {
        if let Some(group) = square.color_group() {
            map.entry(group).or_default().push(square.index);
        }
    }
    map
});

/// Positions of the four railroads.
pub static RAILROAD_POSITIONS: Lazy<Vec<u8>> = Lazy::new(|| {
    SQUARES
        .iter()
        .filter(|s| matches!(s.kind, SquareKind::Railroad { .. }))
        .map(|s| s.index)
        .collect()
});

/// Positions of the two utilities.
pub static UTILITY_POSITIONS: Lazy<Vec<u8>> = Lazy::new(|| {
    SQUARES
        .iter()
        .filter(|s| matches!(s.kind, SquareKind::Utility { .. }))
        .map(|s| s.index)
        .collect()
});

/// Positions of the three Chance squares.
pub static CHANCE_POSITIONS: Lazy<Vec<u8>> = Lazy::new(|| {
    SQUARES
        .iter()
        .filter(|s| matches!(s.kind, SquareKind::Chance))
        .map(|s| s.index)
        .collect()
});

/// Positions of the three Community Chest squares.
pub static CHEST_POSITIONS: Lazy<Vec<u8>> = Lazy::new(|| {
    SQUARES
        .iter()
        .filter(|s| matches!(s.kind, SquareKind::CommunityChest))
        .map(|s| s.index)
        .collect()
});

pub fn square(index: u8) -> &'static Square {
    &SQUARES[index as usize]
}

/// Number of squares a color group has in total (used to tell whether
/// a player owns a complete monopoly).
pub fn group_size(group: ColorGroup) -> usize {
    PROPS_BY_GROUP.get(&group).map_or(0, |v| v.len())
}
