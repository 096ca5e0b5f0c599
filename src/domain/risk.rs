//! Volatility-scaled position sizing and stop/target placement.
//!
//! size   = (balance × risk_per_trade) / (ATR × risk_multiplier)
//! stop   = entry ∓ ATR
//! target = entry ± ATR × reward_ratio
//!
//! No sizing happens without a usable ATR: an undefined or non-positive ATR
//! yields all-zero parameters.

use super::signal::{ConsensusDecision, Trend};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RiskConfig {
    pub risk_per_trade: f64,
    pub risk_multiplier: f64,
    pub reward_ratio: f64,
}

impl Default for RiskConfig {
    fn default() -> Self {
        RiskConfig {
            risk_per_trade: 0.02,
            risk_multiplier: 2.0,
            reward_ratio: 2.0,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RiskParameters {
    pub position_size: f64,
    pub stop_loss: f64,
    pub take_profit: f64,
}

impl RiskParameters {
    pub fn zero() -> Self {
        RiskParameters::default()
    }
}

fn usable_atr(atr: Option<f64>) -> Option<f64> {
    atr.filter(|a| a.is_finite() && *a > 0.0)
}

pub fn position_size(balance: f64, atr: Option<f64>, config: &RiskConfig) -> f64 {
    let Some(atr) = usable_atr(atr) else {
        return 0.0;
    };
    let denominator = atr * config.risk_multiplier;
    if denominator <= 0.0 {
        return 0.0;
    }
    ((balance * config.risk_per_trade) / denominator).max(0.0)
}

/// `(stop_loss, take_profit)` around `entry`.
///
/// NEUTRAL uses the UPTREND placement, treating "no trend" like a long.
pub fn stop_and_target(entry: f64, atr: f64, trend: Trend, reward_ratio: f64) -> (f64, f64) {
    match trend {
        Trend::Downtrend => (entry + atr, entry - atr * reward_ratio),
        Trend::Uptrend | Trend::Neutral => (entry - atr, entry + atr * reward_ratio),
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RiskManager {
    pub config: RiskConfig,
}

impl RiskManager {
    pub fn new(config: RiskConfig) -> Self {
        RiskManager { config }
    }

    /// Risk parameters for a decision; zero unless a signal fired and ATR is usable.
    pub fn assess(
        &self,
        decision: &ConsensusDecision,
        price: f64,
        atr: Option<f64>,
        balance: f64,
    ) -> RiskParameters {
        if !decision.has_signal() {
            return RiskParameters::zero();
        }
        let Some(atr) = usable_atr(atr) else {
            return RiskParameters::zero();
        };

        let (stop_loss, take_profit) =
            stop_and_target(price, atr, decision.trend, self.config.reward_ratio);
        RiskParameters {
            position_size: position_size(balance, Some(atr), &self.config),
            stop_loss,
            take_profit,
        }
    }
}
