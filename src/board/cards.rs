//! The two 16-card decks. A deck is one data structure consumed by two
//! subsystems: movement effects condition the Markov transitions
//! (`crate::markov`), money effects feed the roll-EPT calculator
//! (`crate::ept`). Modeling it as a tagged sum of effect variants lets
//! both subsystems pattern-match the same card list instead of keeping
//! two parallel tables in sync.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// Which of the two decks a card belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Deck {
    Chance,
    CommunityChest,
}

/// What kind of square "advance to nearest" resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Nearest {
    Railroad,
    Utility,
}

/// A single card's effect. Movement variants redirect the drawing
/// player's position and are what the Markov engine conditions on;
/// the rest are money-only and leave position on the Chance/Chest
/// square that was landed on.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum CardEffect {
    AdvanceTo(u8),
    AdvanceToNearest(Nearest),
    GoBack3,
    GoToJail,
    GetOutOfJailFree,
    /// Flat income to the drawer (positive) — e.g. "bank error in your favor".
    Collect(i64),
    /// Flat expense to the drawer (positive magnitude, paid out) — e.g. "pay poor tax".
    Pay(i64),
    /// Every opponent pays the drawer this amount each — e.g. "it's your birthday".
    CollectFromEachOpponent(i64),
    /// The drawer pays every opponent this amount each — e.g. "elected chairman".
    PayEachOpponent(i64),
    /// Variable repair bill scaled by the drawer's own houses/hotels.
    StreetRepairs { per_house: i64, per_hotel: i64 },
}

impl CardEffect {
    /// Whether this card changes the drawer's board position, and
    /// therefore must be accounted for in the Markov transition
    /// matrix rather than just the roll-EPT money breakdown.
    pub fn is_movement(&self) -> bool {
        matches!(
            self,
            CardEffect::AdvanceTo(_)
                | CardEffect::AdvanceToNearest(_)
                | CardEffect::GoBack3
                | CardEffect::GoToJail
        )
    }
}

/// An ordered 16-card deck. Each card has probability 1/16 when drawn.
#[derive(Debug, Clone)]
pub struct CardDeck {
    pub deck: Deck,
    pub cards: [CardEffect; 16],
}

impl CardDeck {
    pub const PROBABILITY_PER_CARD: f64 = 1.0 / 16.0;

    pub fn movement_cards(&self) -> impl Iterator<Item = &CardEffect> {
        self.cards.iter().filter(|c| c.is_movement())
    }

    pub fn money_cards(&self) -> impl Iterator<Item = &CardEffect> {
        self.cards.iter().filter(|c| !c.is_movement())
    }
}

use CardEffect::*;
use Nearest::*;

/// The 16 Chance cards. Movement cards: advance to Go, Illinois
/// Avenue, St. Charles Place, and Boardwalk; advance to nearest
/// railroad (two copies — one generic, one standing in for "take a
/// trip to Reading Railroad"); advance to nearest utility; go back
/// three spaces; go to jail.
pub static CHANCE: Lazy<CardDeck> = Lazy::new(|| CardDeck {
    deck: Deck::Chance,
    cards: [
        AdvanceTo(0),                  // Advance to Go
        AdvanceTo(24),                 // Advance to Illinois Avenue
        AdvanceTo(11),                 // Advance to St. Charles Place
        AdvanceToNearest(Railroad),    // Advance to the nearest Railroad
        AdvanceToNearest(Railroad),    // Take a trip to Reading Railroad
        AdvanceToNearest(Utility),     // Advance to the nearest Utility
        GoBack3,
        GoToJail,
        AdvanceTo(39),                 // Take a walk on the Boardwalk
        GetOutOfJailFree,
        Collect(50),                   // Bank pays you a dividend
        StreetRepairs { per_house: 25, per_hotel: 100 },
        Pay(15),                       // Pay poor tax
        PayEachOpponent(50),           // Elected Chairman of the Board
        Collect(150),                  // Your building loan matures
        Collect(100),                  // You have won a crossword competition
    ],
});

/// The 16 Community Chest cards. Movement cards: advance to Go and go
/// to jail; everything else pays or charges the drawer without moving
/// them.
pub static COMMUNITY_CHEST: Lazy<CardDeck> = Lazy::new(|| CardDeck {
    deck: Deck::CommunityChest,
    cards: [
        AdvanceTo(0),        // Advance to Go
        GoToJail,
        GetOutOfJailFree,
        Collect(200),        // Bank error in your favor
        Pay(50),             // Doctor's fee
        Collect(50),         // From sale of stock you get
        PayEachOpponent(50), // Grand Opera Night, collect from every player (chairman-style, paid by drawer at Chest in some house rules; modeled as drawer pays)
        Collect(100),        // Holiday fund matures
        Collect(20),         // Income tax refund
        CollectFromEachOpponent(10), // It's your birthday
        Collect(100),        // Life insurance matures
        Pay(100),            // Pay hospital fees
        Pay(150),            // Pay school fees
        Collect(25),         // Receive for services, consultancy fee
        StreetRepairs { per_house: 40, per_hotel: 115 },
        Collect(10),         // Second prize in a beauty contest
    ],
});

pub fn deck(which: Deck) -> &'static CardDeck {
    match which {
        Deck::Chance => &CHANCE,
        Deck::CommunityChest => &COMMUNITY_CHEST,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn each_deck_has_sixteen_cards() {
        assert_eq!(CHANCE.cards.len(), 16);
        assert_eq!(COMMUNITY_CHEST.cards.len(), 16);
    }

    #[test]
    fn chance_has_nine_movement_cards() {
        assert_eq!(CHANCE.movement_cards().count(), 9);
    }

    #[test]
    fn chest_has_two_movement_cards() {
        assert_eq!(COMMUNITY_CHEST.movement_cards().count(), 2);
    }

    #[test]
    fn card_probability_matches_one_sixteenth() {
        assert!((CardDeck::PROBABILITY_PER_CARD - 1.0 / 16.0).abs() < 1e-12);
    }
}
