//! Tuning parameters consumed by the decision layer.
//!
//! Mirrors the configuration table in the specification: every
//! threshold and multiplier the decision procedures use is a field
//! here rather than a hardcoded constant, so recalibrating a policy
//! never requires touching decision-procedure code.

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Minimum cash reserve kept in the early game phase.
    pub min_reserve_early: i64,
    /// Minimum cash reserve kept in the mid game phase.
    pub min_reserve_mid: i64,
    /// Minimum cash reserve kept in the late game phase.
    pub min_reserve_late: i64,
    /// Minimum net EPT delta required to accept a trade.
    pub trade_advantage_threshold: f64,
    /// Multiplier applied to EPT when an acquisition completes a color group.
    pub monopoly_completion_bonus: f64,
    /// Cap on an auction bid as a multiple of the listed price.
    pub auction_max_overpay: f64,
    /// Opponent developed-property count above which jail policy prefers `Stay`.
    pub jail_stay_threshold: u32,
    /// Promote the step that reaches a 3rd house above other equal-ROI steps.
    pub third_house_priority: bool,
    /// Denial EPT as a fraction of a group's 3-house EPT.
    pub denial_factor: f64,
    /// Auction willingness multiplier when an opponent is one square from a monopoly.
    pub blocking_bid_bonus: f64,
    /// Dollars treated as equivalent to one EPT unit when pricing trades.
    pub cash_to_ept_rate: f64,
    /// Use the flat $200 income-tax house rule instead of 10%-or-$200.
    pub flat_income_tax: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            min_reserve_early: 200,
            min_reserve_mid: 150,
            min_reserve_late: 100,
            trade_advantage_threshold: 0.05,
            monopoly_completion_bonus: 1.5,
            auction_max_overpay: 1.30,
            jail_stay_threshold: 4,
            third_house_priority: true,
            denial_factor: 0.50,
            blocking_bid_bonus: 1.20,
            cash_to_ept_rate: 200.0,
            flat_income_tax: false,
        }
    }
}

impl EngineConfig {
    /// Reject configurations whose values could not have come from a
    /// sane tuning pass (negative reserves, zero-or-negative rates,
    /// multipliers below 1.0 where the semantics require inflation).
    pub fn validate(&self) -> Result<()> {
        if self.min_reserve_early < 0 || self.min_reserve_mid < 0 || self.min_reserve_late < 0 {
            return Err(EngineError::InvalidConfig(
                "minimum reserves must be non-negative".into(),
            ));
        }
        if self.trade_advantage_threshold.is_nan() {
            return Err(EngineError::InvalidConfig(
                "tradeAdvantageThreshold must not be NaN".into(),
            ));
        }
        if self.monopoly_completion_bonus < 1.0 {
            return Err(EngineError::InvalidConfig(
                "monopolyCompletionBonus must be >= 1.0".into(),
            ));
        }
        if self.auction_max_overpay < 1.0 {
            return Err(EngineError::InvalidConfig(
                "auctionMaxOverpay must be >= 1.0".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.denial_factor) {
            return Err(EngineError::InvalidConfig(
                "denialFactor must be in [0.0, 1.0]".into(),
            ));
        }
        if self.blocking_bid_bonus < 1.0 {
            return Err(EngineError::InvalidConfig(
                "blockingBidBonus must be >= 1.0".into(),
            ));
        }
        if self.cash_to_ept_rate <= 0.0 {
            return Err(EngineError::InvalidConfig(
                "cashToEptRate must be positive".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_validates() {
        assert!(EngineConfig::default().validate().is_ok());
    }

    #[test]
    fn negative_reserve_rejected() {
        let mut cfg = EngineConfig::default();
        cfg.min_reserve_mid = -1;
        assert!(matches!(cfg.validate(), Err(EngineError::InvalidConfig(_))));
    }

    #[test]
    fn denial_factor_out_of_range_rejected() {
        let mut cfg = EngineConfig::default();
        cfg.denial_factor = 1.5;
        assert!(cfg.validate().is_err());
    }
}
