//! Per-turn cash flow from board mechanics that doesn't depend on
//! property ownership: passing Go, the two tax squares, and the money
//! (non-movement) cards in each deck.

use crate::board::{self, cards, cards::CardEffect, cards::Deck};
use crate::config::EngineConfig;
use crate::dice;
use crate::markov::MarkovTable;

const INCOME_TAX_SQUARE: u8 = 4;
const LUXURY_TAX_SQUARE: u8 = 38;

/// Household parameters the calculator scales card and tax effects by.
#[derive(Debug, Clone, Copy, Default)]
pub struct RollEptParams {
    pub net_worth: f64,
    pub owned_houses: u32,
    pub owned_hotels: u32,
    pub opponent_count: u32,
}

/// Expected per-turn cash flow, broken down by source for
/// observability; `total` is the sum of the four terms (tax and net
/// expense terms are negative).
#[derive(Debug, Clone, Copy)]
pub struct RollEpt {
    pub pass_go: f64,
    pub chance: f64,
    pub chest: f64,
    pub tax: f64,
    pub total: f64,
}

/// Computes the roll-EPT breakdown under steady-state landing
/// probabilities `markov`, for a player described by `params`.
pub fn compute(markov: &MarkovTable, params: &RollEptParams, config: &EngineConfig) -> RollEpt {
    let pass_go = pass_go_ept(markov);
    let tax = tax_ept(markov, params, config);
    let chance = deck_money_ept(Deck::Chance, markov, params);
    let chest = deck_money_ept(Deck::CommunityChest, markov, params);
    RollEpt {
        pass_go,
        chance,
        chest,
        tax,
        total: pass_go + tax + chance + chest,
    }
}

/// `$200 * Σ_s π(s) · P(passing or landing on Go from s)`, plus the
/// two decks' explicit "Advance to Go" cards.
fn pass_go_ept(markov: &MarkovTable) -> f64 {
    let mut probability = 0.0;
    for s in 0..board::BOARD_SIZE {
        let pi = markov.square_probability(s);
        if pi == 0.0 {
            continue;
        }
        let threshold = board::BOARD_SIZE - s;
        let pass: f64 = (threshold..=12).map(dice::probability_of_distance).sum();
        probability += pi * pass;
    }

    let chance_advance_to_go: f64 = board::CHANCE_POSITIONS
        .iter()
        .map(|&sq| markov.square_probability(sq))
        .sum::<f64>()
        * cards::CardDeck::PROBABILITY_PER_CARD;
    let chest_advance_to_go: f64 = board::CHEST_POSITIONS
        .iter()
        .map(|&sq| markov.square_probability(sq))
        .sum::<f64>()
        * cards::CardDeck::PROBABILITY_PER_CARD;

    (probability + chance_advance_to_go + chest_advance_to_go) * 200.0
}

/// Income tax on square 4 (10%-of-net-worth capped at $200, or a flat
/// $200 under `config.flat_income_tax`) plus luxury tax on square 38
/// (read from the board's own constant rather than hardcoded again).
fn tax_ept(markov: &MarkovTable, params: &RollEptParams, config: &EngineConfig) -> f64 {
    let income_amount = if config.flat_income_tax {
        tax_amount(INCOME_TAX_SQUARE) as f64
    } else {
        (params.net_worth * 0.10).floor().min(200.0).max(0.0)
    };
    let luxury_amount = tax_amount(LUXURY_TAX_SQUARE) as f64;

    let income_cost = markov.square_probability(INCOME_TAX_SQUARE) * income_amount;
    let luxury_cost = markov.square_probability(LUXURY_TAX_SQUARE) * luxury_amount;
    -(income_cost + luxury_cost)
}

fn tax_amount(sq: u8) -> u32 {
    match board::square(sq).kind {
        board::SquareKind::Tax { amount } => amount,
        _ => 0,
    }
}

/// Expected per-turn money flow from one deck's non-movement cards,
/// weighted by 1/16 per card and by the deck's total landing mass.
fn deck_money_ept(deck: Deck, markov: &MarkovTable, params: &RollEptParams) -> f64 {
    let positions: &[u8] = match deck {
        Deck::Chance => &board::CHANCE_POSITIONS,
        Deck::CommunityChest => &board::CHEST_POSITIONS,
    };
    let landing_mass: f64 = positions.iter().map(|&sq| markov.square_probability(sq)).sum();

    let opponents_minus_one = params.opponent_count.saturating_sub(1) as f64;
    let per_card_total: f64 = cards::deck(deck)
        .money_cards()
        .map(|card| match card {
            CardEffect::Collect(amount) => *amount as f64,
            CardEffect::Pay(amount) => -(*amount as f64),
            CardEffect::CollectFromEachOpponent(amount) => *amount as f64 * opponents_minus_one,
            CardEffect::PayEachOpponent(amount) => -(*amount as f64) * opponents_minus_one,
            CardEffect::StreetRepairs { per_house, per_hotel } => {
                -(*per_house as f64 * params.owned_houses as f64
                    + *per_hotel as f64 * params.owned_hotels as f64)
            }
            CardEffect::GetOutOfJailFree => 0.0,
            _ => 0.0,
        })
        .sum::<f64>()
        * cards::CardDeck::PROBABILITY_PER_CARD;

    landing_mass * per_card_total
}
