//! Classifier-augmented strategy composition.
//!
//! [`AugmentedStrategy`] wraps any base [`Strategy`] together with a
//! [`Classifier`] and exposes the same `evaluate` interface. The classifier
//! sees the base tick's indicator feature vector and may add a BUY or SELL
//! on top of the technical consensus.

use std::fmt;

use tracing::warn;

use super::error::TraderError;
use super::ohlcv::PriceWindow;
use super::risk::RiskManager;
use super::strategy::{Strategy, TickResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassifierSignal {
    Buy,
    Sell,
    Hold,
}

impl fmt::Display for ClassifierSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClassifierSignal::Buy => write!(f, "BUY"),
            ClassifierSignal::Sell => write!(f, "SELL"),
            ClassifierSignal::Hold => write!(f, "HOLD"),
        }
    }
}

pub trait Classifier {
    fn predict(&self, features: &[f64]) -> Result<ClassifierSignal, TraderError>;
}

/// Linear scorer: `score = w·x + b`, BUY above `threshold`, SELL below `-threshold`.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearClassifier {
    pub weights: Vec<f64>,
    pub bias: f64,
    pub threshold: f64,
}

impl LinearClassifier {
    pub fn new(weights: Vec<f64>, bias: f64, threshold: f64) -> Self {
        LinearClassifier {
            weights,
            bias,
            threshold,
        }
    }

    pub fn score(&self, features: &[f64]) -> Result<f64, TraderError> {
        if features.len() != self.weights.len() {
            return Err(TraderError::Classifier {
                reason: format!(
                    "expected {} features, got {}",
                    self.weights.len(),
                    features.len()
                ),
            });
        }
        let score = self
            .weights
            .iter()
            .zip(features)
            .map(|(w, x)| w * x)
            .sum::<f64>()
            + self.bias;
        if !score.is_finite() {
            return Err(TraderError::Classifier {
                reason: "non-finite score".into(),
            });
        }
        Ok(score)
    }
}

impl Classifier for LinearClassifier {
    fn predict(&self, features: &[f64]) -> Result<ClassifierSignal, TraderError> {
        let score = self.score(features)?;
        let signal = if score > self.threshold {
            ClassifierSignal::Buy
        } else if score < -self.threshold {
            ClassifierSignal::Sell
        } else {
            ClassifierSignal::Hold
        };
        Ok(signal)
    }
}

pub struct AugmentedStrategy<S, C> {
    pub base: S,
    pub classifier: C,
    pub risk: RiskManager,
}

impl<S: Strategy, C: Classifier> AugmentedStrategy<S, C> {
    pub fn new(base: S, classifier: C, risk: RiskManager) -> Self {
        AugmentedStrategy {
            base,
            classifier,
            risk,
        }
    }

    fn blend(&self, mut tick: TickResult, signal: ClassifierSignal, balance: f64) -> TickResult {
        let buy = tick.decision.buy || signal == ClassifierSignal::Buy;
        let sell = tick.decision.sell || signal == ClassifierSignal::Sell;
        let (buy, sell) = if buy && sell { (false, false) } else { (buy, sell) };

        let changed = buy != tick.decision.buy || sell != tick.decision.sell;
        tick.decision.buy = buy;
        tick.decision.sell = sell;
        tick.decision.reasons.push(format!("AI: {signal}"));

        if changed {
            tick.risk = match tick.price {
                Some(price) => self
                    .risk
                    .assess(&tick.decision, price, tick.readings.atr, balance),
                None => tick.risk,
            };
        }
        tick
    }
}

impl<S: Strategy, C: Classifier> Strategy for AugmentedStrategy<S, C> {
    fn evaluate(&self, window: &PriceWindow<'_>, balance: f64) -> TickResult {
        let tick = self.base.evaluate(window, balance);
        if tick.readings.is_undefined() {
            return tick;
        }

        let signal = match self.classifier.predict(&tick.readings.feature_vector()) {
            Ok(signal) => signal,
            Err(e) => {
                warn!(error = %e, "classifier prediction failed, holding");
                ClassifierSignal::Hold
            }
        };
        self.blend(tick, signal, balance)
    }
}
