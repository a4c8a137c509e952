//! The public `Engine`: constructs both jail-policy Markov/EPT tables
//! up front (publish-on-complete, per spec.md §5) and exposes the six
//! decision calls of spec.md §6 as inherent methods.

use tracing::instrument;

use crate::config::EngineConfig;
use crate::decision::auction::BidDecision;
use crate::decision::build::BuildStep;
use crate::decision::trade::{TradeDecision, TradeOffer};
use crate::decision::{self, auction, build, buy, jail, mortgage, trade};
use crate::error::Result;
use crate::ept::{self, RollEpt, RollEptParams};
use crate::markov::{self, JailPolicy, MarkovTable};
use crate::snapshot::GameSnapshot;
use crate::valuator::{self, DiffValue, Valuator};

/// One jail policy's solved tables: kept together since every
/// downstream computation for a policy needs both.
struct PolicyTables {
    markov: MarkovTable,
    valuator: Valuator,
}

/// The decision engine. Immutable after construction: both jail
/// policies' tables are solved eagerly in `new`, so a constructed
/// `Engine` is safe to share (e.g. behind an `Arc`) across threads for
/// concurrent read-only decision calls, with no internal locking.
pub struct Engine {
    config: EngineConfig,
    leave: PolicyTables,
    stay: PolicyTables,
}

impl Engine {
    /// Validates `config`, then solves the Markov chain and builds the
    /// EPT tables for both jail policies. Fails fast: a bad config
    /// never reaches the Markov solve, and a non-convergent chain never
    /// produces a half-built engine.
    #[instrument(skip(config))]
    pub fn new(config: EngineConfig) -> Result<Engine> {
        config.validate()?;

        let leave = solve_policy(JailPolicy::Leave)?;
        let stay = solve_policy(JailPolicy::Stay)?;

        tracing::info!("engine initialized, both jail-policy tables built");
        Ok(Engine { config, leave, stay })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    fn tables(&self, policy: JailPolicy) -> &PolicyTables {
        match policy {
            JailPolicy::Leave => &self.leave,
            JailPolicy::Stay => &self.stay,
        }
    }

    /// The steady-state table for `policy`, for callers that want raw
    /// landing probabilities (e.g. the reference-value tests or the
    /// CLI harness).
    pub fn markov_table(&self, policy: JailPolicy) -> &MarkovTable {
        &self.tables(policy).markov
    }

    /// The EPT/valuator table for `policy`.
    pub fn valuator(&self, policy: JailPolicy) -> &Valuator {
        &self.tables(policy).valuator
    }

    /// Roll-EPT breakdown for a player described by `params`, under
    /// `policy`.
    pub fn roll_ept(&self, policy: JailPolicy, params: &RollEptParams) -> RollEpt {
        ept::compute(self.markov_table(policy), params, &self.config)
    }

    /// Differential value (own + denial EPT) of `player` acquiring `sq`.
    pub fn diff_value(
        &self,
        snapshot: &GameSnapshot,
        sq: u8,
        player: usize,
        policy: JailPolicy,
    ) -> Result<DiffValue> {
        snapshot.validate()?;
        let opponents = decision::opponent_count(snapshot, player);
        Ok(valuator::diff_value(self.valuator(policy), snapshot, sq, player, &self.config, opponents))
    }

    /// Target jail policy derived from the snapshot (used to select
    /// which cached table the other decision calls should consult).
    pub fn determine_jail_policy(&self, snapshot: &GameSnapshot, player: usize) -> Result<JailPolicy> {
        snapshot.validate()?;
        Ok(jail::determine_jail_policy(snapshot, player, &self.config))
    }

    /// `shouldBuy(snap, sq) -> bool`.
    #[instrument(skip(self, snapshot))]
    pub fn should_buy(&self, snapshot: &GameSnapshot, sq: u8, price: i64, player: usize) -> Result<bool> {
        snapshot.validate()?;
        let policy = jail::determine_jail_policy(snapshot, player, &self.config);
        Ok(buy::should_buy(self.valuator(policy), snapshot, sq, price, player, &self.config))
    }

    /// `bid(snap, sq, currentBid) -> {Exit|Bid(amount)}`.
    #[instrument(skip(self, snapshot))]
    pub fn bid(
        &self,
        snapshot: &GameSnapshot,
        sq: u8,
        price: i64,
        current_bid: i64,
        player: usize,
    ) -> Result<BidDecision> {
        snapshot.validate()?;
        let policy = jail::determine_jail_policy(snapshot, player, &self.config);
        Ok(auction::bid(self.valuator(policy), snapshot, sq, price, current_bid, player, &self.config))
    }

    /// `build(snap) -> sequence of (sq, +1) steps`.
    #[instrument(skip(self, snapshot))]
    pub fn build(&self, snapshot: &GameSnapshot, player: usize) -> Result<Vec<BuildStep>> {
        snapshot.validate()?;
        let policy = jail::determine_jail_policy(snapshot, player, &self.config);
        let phase = decision::game_phase(snapshot);
        let reserve = decision::min_reserve(phase, &self.config);
        let available = snapshot.players[player].cash - reserve;
        let opponents = decision::opponent_count(snapshot, player);
        Ok(build::build(self.valuator(policy), snapshot, player, available.max(0), opponents, &self.config))
    }

    /// The mirror of `build`: sells houses in reverse marginal-ROI order.
    pub fn sell_houses(&self, snapshot: &GameSnapshot, player: usize) -> Result<Vec<BuildStep>> {
        snapshot.validate()?;
        let policy = jail::determine_jail_policy(snapshot, player, &self.config);
        let opponents = decision::opponent_count(snapshot, player);
        Ok(build::sell_houses(self.valuator(policy), snapshot, player, opponents, &self.config))
    }

    /// `mortgageToRaise(snap, amount) -> ordered sequence of sq`.
    pub fn mortgage_to_raise(&self, snapshot: &GameSnapshot, player: usize, amount: i64) -> Result<Vec<u8>> {
        snapshot.validate()?;
        let policy = jail::determine_jail_policy(snapshot, player, &self.config);
        Ok(mortgage::mortgage_to_raise(self.valuator(policy), snapshot, player, amount, &self.config))
    }

    /// `unmortgageIdle(snap) -> ordered sequence of sq`.
    pub fn unmortgage_idle(&self, snapshot: &GameSnapshot, player: usize) -> Result<Vec<u8>> {
        snapshot.validate()?;
        let policy = jail::determine_jail_policy(snapshot, player, &self.config);
        Ok(mortgage::unmortgage_idle(self.valuator(policy), snapshot, player, &self.config))
    }

    /// `evaluateTrade(snap, offer) -> {Accept|Reject}`.
    #[instrument(skip(self, snapshot, offer))]
    pub fn evaluate_trade(
        &self,
        snapshot: &GameSnapshot,
        offer: &TradeOffer,
        player: usize,
    ) -> Result<TradeDecision> {
        snapshot.validate()?;
        let policy = jail::determine_jail_policy(snapshot, player, &self.config);
        Ok(trade::evaluate_trade(self.valuator(policy), snapshot, offer, player, &self.config))
    }

    /// `shouldPostBail(snap, turnsInJail) -> bool`.
    pub fn should_post_bail(&self, snapshot: &GameSnapshot, player: usize, turns_in_jail: u8) -> Result<bool> {
        snapshot.validate()?;
        Ok(jail::should_post_bail(snapshot, player, turns_in_jail, &self.config))
    }
}

fn solve_policy(policy: JailPolicy) -> Result<PolicyTables> {
    let markov = markov::solve(policy)?;
    let valuator = valuator::build(&markov);
    Ok(PolicyTables { markov, valuator })
}
