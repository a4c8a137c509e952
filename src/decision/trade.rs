//! Trade evaluation, spec.md §4.4 "Trade evaluation".

use crate::config::EngineConfig;
use crate::decision;
use crate::snapshot::GameSnapshot;
use crate::valuator::{self, Valuator};

/// A get-out-of-jail-free card's per-card EPT value in a trade, per
/// spec.md's "small per-card value" default.
const JAIL_CARD_VALUE: f64 = 0.1;

/// One proposed trade, from the evaluating player's point of view:
/// squares they would receive and give up, the cash they'd pay (or
/// receive, if negative), and jail cards changing hands.
#[derive(Debug, Clone)]
pub struct TradeOffer {
    pub receiving_squares: Vec<u8>,
    pub giving_squares: Vec<u8>,
    /// Cash the evaluating player pays the counterparty; negative means
    /// the counterparty pays them.
    pub cash_delta: i64,
    pub receiving_jail_cards: u32,
    pub giving_jail_cards: u32,
    pub counterparty: usize,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TradeDecision {
    Accept,
    Reject,
}

/// Optional position-aware policy knobs layered on top of the base EPT
/// comparison, per spec.md §4.4's "richer variant".
#[derive(Debug, Clone, Copy)]
pub struct TradePolicy {
    /// Multiplier applied against net value when the counterparty is
    /// the net-worth leader (values below 1.0 make us more cautious).
    pub leader_penalty: f64,
    /// Multiplier applied when accepting would make us a dominant
    /// leader (>= `dominance_margin` times second place).
    pub dominance_multiplier: f64,
    pub dominance_margin: f64,
    /// Multiplier applied when the counterparty is behind us (we can
    /// afford to be generous without changing the standings).
    pub underdog_bonus: f64,
}

impl Default for TradePolicy {
    fn default() -> Self {
        Self {
            leader_penalty: 1.0,
            dominance_multiplier: 1.0,
            dominance_margin: 1.5,
            underdog_bonus: 1.0,
        }
    }
}

/// Net EPT delta from `player`'s perspective: `diffVal` summed over
/// squares received minus squares given up, plus cash at
/// `config.cash_to_ept_rate` dollars per EPT unit, plus jail-card
/// value.
pub fn net_trade_value(
    valuator: &Valuator,
    snapshot: &GameSnapshot,
    offer: &TradeOffer,
    player: usize,
    config: &EngineConfig,
) -> f64 {
    let opponents = decision::opponent_count(snapshot, player);

    let received: f64 = offer
        .receiving_squares
        .iter()
        .map(|&sq| valuator::diff_value(valuator, snapshot, sq, player, config, opponents).total)
        .sum();
    let given: f64 = offer
        .giving_squares
        .iter()
        .map(|&sq| valuator::diff_value(valuator, snapshot, sq, player, config, opponents).total)
        .sum();

    let cash_value = -(offer.cash_delta as f64) / config.cash_to_ept_rate;
    let jail_card_value =
        (offer.receiving_jail_cards as f64 - offer.giving_jail_cards as f64) * JAIL_CARD_VALUE;

    received - given + cash_value + jail_card_value
}

/// Evaluates `offer` for `player`, applying the base EPT comparison
/// against `config.trade_advantage_threshold`.
pub fn evaluate_trade(
    valuator: &Valuator,
    snapshot: &GameSnapshot,
    offer: &TradeOffer,
    player: usize,
    config: &EngineConfig,
) -> TradeDecision {
    evaluate_trade_with_policy(valuator, snapshot, offer, player, config, &TradePolicy::default())
}

/// The position-aware variant: applies the leader/dominance/underdog
/// multipliers on top of the base net value before comparing against
/// the acceptance threshold.
pub fn evaluate_trade_with_policy(
    valuator: &Valuator,
    snapshot: &GameSnapshot,
    offer: &TradeOffer,
    player: usize,
    config: &EngineConfig,
    policy: &TradePolicy,
) -> TradeDecision {
    let mut net = net_trade_value(valuator, snapshot, offer, player, config);

    let ranking = decision::net_worth_ranking(snapshot);
    let leader = ranking.first().map(|&(p, _)| p);
    let is_counterparty_leader = leader == Some(offer.counterparty) && leader != Some(player);
    if is_counterparty_leader {
        net *= policy.leader_penalty;
    }

    let counterparty_worth =
        ranking.iter().find(|&&(p, _)| p == offer.counterparty).map(|&(_, w)| w).unwrap_or(0.0);
    let our_worth = snapshot.net_worth(player);
    if counterparty_worth < our_worth {
        net *= policy.underdog_bonus;
    }

    if would_create_dominant_leader(snapshot, offer, player, net, policy) {
        net *= policy.dominance_multiplier;
    }

    if net >= config.trade_advantage_threshold {
        TradeDecision::Accept
    } else {
        TradeDecision::Reject
    }
}

/// Whether accepting this trade would put `player` at least
/// `dominance_margin` times ahead of the second-place net worth,
/// approximating post-trade net worth as current worth plus the net
/// EPT value converted back to dollars.
fn would_create_dominant_leader(
    snapshot: &GameSnapshot,
    offer: &TradeOffer,
    player: usize,
    net: f64,
    policy: &TradePolicy,
) -> bool {
    let _ = offer;
    let ranking = decision::net_worth_ranking(snapshot);
    let our_worth = snapshot.net_worth(player) + net.max(0.0) * 200.0;
    let second_best = ranking
        .iter()
        .filter(|&&(p, _)| p != player)
        .map(|&(_, w)| w)
        .fold(0.0_f64, f64::max);
    second_best > 0.0 && our_worth >= policy.dominance_margin * second_best
}
