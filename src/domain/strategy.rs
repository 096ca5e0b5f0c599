//! Strategy evaluation: one tick over a trailing window.
//!
//! A strategy is anything implementing [`Strategy`]. [`MomentumStrategy`]
//! chains the indicator library, the signal voter and the risk manager. It
//! never touches the ledger; entry and exit execution belong to the caller.

use tracing::debug;

use super::indicator::atr::atr;
use super::indicator::awesome::{self, awesome_pair};
use super::indicator::ema::ema;
use super::indicator::stochastic::{self, stochastic};
use super::ohlcv::PriceWindow;
use super::risk::{RiskConfig, RiskManager, RiskParameters};
use super::signal::{
    ConsensusDecision, Votes, consensus, momentum_vote, oscillator_vote, trend_vote,
};

#[derive(Debug, Clone, PartialEq)]
pub struct StrategyConfig {
    pub ema_fast: usize,
    pub ema_mid: usize,
    pub ema_slow: usize,
    pub stoch_k: usize,
    pub stoch_d: usize,
    pub overbought: f64,
    pub oversold: f64,
    pub ao_fast: usize,
    pub ao_slow: usize,
    pub atr_period: usize,
    pub min_history: usize,
    pub risk: RiskConfig,
}

impl Default for StrategyConfig {
    fn default() -> Self {
        StrategyConfig {
            ema_fast: 13,
            ema_mid: 20,
            ema_slow: 50,
            stoch_k: stochastic::DEFAULT_K_PERIOD,
            stoch_d: stochastic::DEFAULT_D_PERIOD,
            overbought: 80.0,
            oversold: 20.0,
            ao_fast: awesome::DEFAULT_FAST,
            ao_slow: awesome::DEFAULT_SLOW,
            atr_period: 14,
            min_history: 50,
            risk: RiskConfig::default(),
        }
    }
}

/// Raw indicator values at the latest bar; `None` means undefined.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct IndicatorReadings {
    pub ema_fast: Option<f64>,
    pub ema_mid: Option<f64>,
    pub ema_slow: Option<f64>,
    pub stoch_k: Option<f64>,
    pub stoch_d: Option<f64>,
    pub ao_current: Option<f64>,
    pub ao_previous: Option<f64>,
    pub atr: Option<f64>,
}

impl IndicatorReadings {
    pub fn undefined() -> Self {
        IndicatorReadings::default()
    }

    pub fn is_undefined(&self) -> bool {
        *self == IndicatorReadings::undefined()
    }

    /// `[ema_fast, ema_mid, ema_slow, stoch_k, stoch_d, ao_current]`, undefined as 0.
    pub fn feature_vector(&self) -> [f64; 6] {
        [
            self.ema_fast.unwrap_or(0.0),
            self.ema_mid.unwrap_or(0.0),
            self.ema_slow.unwrap_or(0.0),
            self.stoch_k.unwrap_or(0.0),
            self.stoch_d.unwrap_or(0.0),
            self.ao_current.unwrap_or(0.0),
        ]
    }
}

/// Read-only outcome of one evaluation tick.
#[derive(Debug, Clone, PartialEq)]
pub struct TickResult {
    pub decision: ConsensusDecision,
    pub risk: RiskParameters,
    pub readings: IndicatorReadings,
    /// Close of the latest bar, if any.
    pub price: Option<f64>,
}

impl TickResult {
    pub fn no_signal(price: Option<f64>) -> Self {
        TickResult {
            decision: ConsensusDecision::no_consensus(),
            risk: RiskParameters::zero(),
            readings: IndicatorReadings::undefined(),
            price,
        }
    }

    pub fn buy_signal(&self) -> bool {
        self.decision.buy
    }

    pub fn sell_signal(&self) -> bool {
        self.decision.sell
    }

    pub fn has_signal(&self) -> bool {
        self.decision.has_signal()
    }
}

pub trait Strategy {
    fn evaluate(&self, window: &PriceWindow<'_>, balance: f64) -> TickResult;
}

impl<S: Strategy + ?Sized> Strategy for &S {
    fn evaluate(&self, window: &PriceWindow<'_>, balance: f64) -> TickResult {
        (**self).evaluate(window, balance)
    }
}

impl<S: Strategy + ?Sized> Strategy for Box<S> {
    fn evaluate(&self, window: &PriceWindow<'_>, balance: f64) -> TickResult {
        (**self).evaluate(window, balance)
    }
}

/// EMA 13/20/50 + Stochastic + Awesome Oscillator consensus strategy.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MomentumStrategy {
    pub config: StrategyConfig,
}

impl MomentumStrategy {
    pub fn new(config: StrategyConfig) -> Self {
        MomentumStrategy { config }
    }

    pub fn risk_manager(&self) -> RiskManager {
        RiskManager::new(self.config.risk)
    }

    pub fn readings(&self, window: &PriceWindow<'_>) -> IndicatorReadings {
        let c = &self.config;
        let stoch = stochastic(window.highs, window.lows, window.closes, c.stoch_k, c.stoch_d);
        let (ao_current, ao_previous) = awesome_pair(window.highs, window.lows, c.ao_fast, c.ao_slow);
        IndicatorReadings {
            ema_fast: ema(window.closes, c.ema_fast),
            ema_mid: ema(window.closes, c.ema_mid),
            ema_slow: ema(window.closes, c.ema_slow),
            stoch_k: stoch.map(|s| s.k),
            stoch_d: stoch.map(|s| s.d),
            ao_current,
            ao_previous,
            atr: atr(window.highs, window.lows, window.closes, c.atr_period),
        }
    }
}

impl Strategy for MomentumStrategy {
    fn evaluate(&self, window: &PriceWindow<'_>, balance: f64) -> TickResult {
        let price = window.last_close();
        let Some(close) = price.filter(|_| window.len() >= self.config.min_history) else {
            debug!(bars = window.len(), "insufficient history, no consensus");
            return TickResult::no_signal(price);
        };

        let readings = self.readings(window);
        let (trend_outcome, trend) =
            trend_vote(close, readings.ema_fast, readings.ema_mid, readings.ema_slow);
        let votes = Votes {
            trend: trend_outcome,
            oscillator: oscillator_vote(
                readings.stoch_k,
                readings.stoch_d,
                self.config.overbought,
                self.config.oversold,
            ),
            momentum: momentum_vote(readings.ao_current, readings.ao_previous),
        };
        let decision = consensus(&votes, trend);
        let risk = self
            .risk_manager()
            .assess(&decision, close, readings.atr, balance);

        debug!(
            close,
            %trend,
            buy = decision.buy,
            sell = decision.sell,
            buy_votes = decision.buy_votes,
            sell_votes = decision.sell_votes,
            "evaluated tick"
        );

        TickResult {
            decision,
            risk,
            readings,
            price,
        }
    }
}
