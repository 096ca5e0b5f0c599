//! Directional votes and the quorum rule.
//!
//! Three independent sources vote per tick: EMA trend alignment, the
//! Stochastic oscillator and the Awesome Oscillator zero cross. A side
//! fires when at least [`QUORUM`] of the three votes agree on it.

use std::fmt;

/// Votes needed on one side for a signal.
pub const QUORUM: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Vote {
    Buy,
    Sell,
    Abstain,
}

impl fmt::Display for Vote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Vote::Buy => write!(f, "BUY"),
            Vote::Sell => write!(f, "SELL"),
            Vote::Abstain => write!(f, "NONE"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct VoteOutcome {
    pub vote: Vote,
    pub reason: String,
}

impl VoteOutcome {
    fn new(vote: Vote, reason: impl Into<String>) -> Self {
        VoteOutcome {
            vote,
            reason: reason.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trend {
    Uptrend,
    Downtrend,
    Neutral,
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Trend::Uptrend => write!(f, "UPTREND"),
            Trend::Downtrend => write!(f, "DOWNTREND"),
            Trend::Neutral => write!(f, "NEUTRAL"),
        }
    }
}

/// EMA alignment vote plus the trend label derived from EMA ordering.
///
/// fast > mid > slow with close above fast votes BUY; the fully reversed
/// ordering with close below fast votes SELL.
pub fn trend_vote(
    close: f64,
    fast: Option<f64>,
    mid: Option<f64>,
    slow: Option<f64>,
) -> (VoteOutcome, Trend) {
    let (Some(fast), Some(mid), Some(slow)) = (fast, mid, slow) else {
        return (
            VoteOutcome::new(Vote::Abstain, "EMA: no data"),
            Trend::Neutral,
        );
    };

    let trend = if fast > mid && mid > slow {
        Trend::Uptrend
    } else if fast < mid && mid < slow {
        Trend::Downtrend
    } else {
        Trend::Neutral
    };

    let outcome = match trend {
        Trend::Uptrend if close > fast => {
            VoteOutcome::new(Vote::Buy, "EMA: bullish alignment, close above fast EMA")
        }
        Trend::Downtrend if close < fast => {
            VoteOutcome::new(Vote::Sell, "EMA: bearish alignment, close below fast EMA")
        }
        _ => VoteOutcome::new(Vote::Abstain, "EMA: no alignment"),
    };
    (outcome, trend)
}

/// Stochastic vote: extremes first, then the %K/%D crossover state.
pub fn oscillator_vote(
    k: Option<f64>,
    d: Option<f64>,
    overbought: f64,
    oversold: f64,
) -> VoteOutcome {
    let (Some(k), Some(d)) = (k, d) else {
        return VoteOutcome::new(Vote::Abstain, "Stochastic: no data");
    };

    if k < oversold && d < oversold {
        VoteOutcome::new(Vote::Buy, "Stochastic: oversold")
    } else if k > overbought && d > overbought {
        VoteOutcome::new(Vote::Sell, "Stochastic: overbought")
    } else if k > d {
        VoteOutcome::new(Vote::Buy, "Stochastic: bullish crossover state")
    } else if k < d {
        VoteOutcome::new(Vote::Sell, "Stochastic: bearish crossover state")
    } else {
        VoteOutcome::new(Vote::Abstain, "Stochastic: %K equals %D")
    }
}

/// Awesome Oscillator zero-cross vote.
pub fn momentum_vote(current: Option<f64>, previous: Option<f64>) -> VoteOutcome {
    let (Some(current), Some(previous)) = (current, previous) else {
        return VoteOutcome::new(Vote::Abstain, "AO: no data");
    };

    if previous <= 0.0 && current > 0.0 {
        VoteOutcome::new(Vote::Buy, "AO: crossed above zero")
    } else if previous >= 0.0 && current < 0.0 {
        VoteOutcome::new(Vote::Sell, "AO: crossed below zero")
    } else {
        VoteOutcome::new(Vote::Abstain, "AO: no zero cross")
    }
}

/// The three votes cast on one tick.
#[derive(Debug, Clone, PartialEq)]
pub struct Votes {
    pub trend: VoteOutcome,
    pub oscillator: VoteOutcome,
    pub momentum: VoteOutcome,
}

impl Votes {
    pub fn iter(&self) -> impl Iterator<Item = &VoteOutcome> {
        [&self.trend, &self.oscillator, &self.momentum].into_iter()
    }

    pub fn count(&self, vote: Vote) -> usize {
        self.iter().filter(|v| v.vote == vote).count()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConsensusDecision {
    pub buy: bool,
    pub sell: bool,
    pub trend: Trend,
    /// Reasons of the non-abstaining votes, in trend/oscillator/momentum order.
    pub reasons: Vec<String>,
    pub buy_votes: usize,
    pub sell_votes: usize,
}

impl ConsensusDecision {
    /// Decision returned while history is too short to vote.
    pub fn no_consensus() -> Self {
        ConsensusDecision {
            buy: false,
            sell: false,
            trend: Trend::Neutral,
            reasons: Vec::new(),
            buy_votes: 0,
            sell_votes: 0,
        }
    }

    pub fn has_signal(&self) -> bool {
        self.buy || self.sell
    }
}

/// Apply the quorum rule to one tick's votes.
pub fn consensus(votes: &Votes, trend: Trend) -> ConsensusDecision {
    let buy_votes = votes.count(Vote::Buy);
    let sell_votes = votes.count(Vote::Sell);
    let buy = buy_votes >= QUORUM;
    let sell = sell_votes >= QUORUM;
    debug_assert!(!(buy && sell), "buy and sell signals are mutually exclusive");

    let reasons = votes
        .iter()
        .filter(|v| v.vote != Vote::Abstain)
        .map(|v| v.reason.clone())
        .collect();

    ConsensusDecision {
        buy,
        sell,
        trend,
        reasons,
        buy_votes,
        sell_votes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(vote: Vote) -> VoteOutcome {
        VoteOutcome::new(vote, vote.to_string())
    }

    #[test]
    fn trend_vote_bullish_alignment() {
        let (v, trend) = trend_vote(105.0, Some(104.0), Some(103.0), Some(100.0));
        assert_eq!(v.vote, Vote::Buy);
        assert_eq!(trend, Trend::Uptrend);
    }

    #[test]
    fn trend_vote_needs_close_above_fast() {
        let (v, trend) = trend_vote(103.5, Some(104.0), Some(103.0), Some(100.0));
        assert_eq!(v.vote, Vote::Abstain);
        assert_eq!(trend, Trend::Uptrend);
    }

    #[test]
    fn trend_vote_bearish_alignment() {
        let (v, trend) = trend_vote(95.0, Some(96.0), Some(97.0), Some(100.0));
        assert_eq!(v.vote, Vote::Sell);
        assert_eq!(trend, Trend::Downtrend);
    }

    #[test]
    fn trend_vote_equal_emas_are_neutral() {
        let (v, trend) = trend_vote(100.0, Some(100.0), Some(100.0), Some(100.0));
        assert_eq!(v.vote, Vote::Abstain);
        assert_eq!(trend, Trend::Neutral);
    }

    #[test]
    fn trend_vote_missing_data() {
        let (v, trend) = trend_vote(100.0, Some(100.0), None, Some(100.0));
        assert_eq!(v.vote, Vote::Abstain);
        assert_eq!(v.reason, "EMA: no data");
        assert_eq!(trend, Trend::Neutral);
    }

    #[test]
    fn oscillator_oversold_beats_crossover() {
        let v = oscillator_vote(Some(10.0), Some(15.0), 80.0, 20.0);
        assert_eq!(v.vote, Vote::Buy);
        assert_eq!(v.reason, "Stochastic: oversold");
    }

    #[test]
    fn oscillator_overbought_beats_crossover() {
        let v = oscillator_vote(Some(95.0), Some(90.0), 80.0, 20.0);
        assert_eq!(v.vote, Vote::Sell);
        assert_eq!(v.reason, "Stochastic: overbought");
    }

    #[test]
    fn oscillator_crossover_states() {
        assert_eq!(oscillator_vote(Some(60.0), Some(50.0), 80.0, 20.0).vote, Vote::Buy);
        assert_eq!(oscillator_vote(Some(40.0), Some(50.0), 80.0, 20.0).vote, Vote::Sell);
        assert_eq!(
            oscillator_vote(Some(50.0), Some(50.0), 80.0, 20.0).vote,
            Vote::Abstain
        );
    }

    #[test]
    fn oscillator_one_extreme_falls_through_to_crossover() {
        // %K oversold but %D not: crossover rule applies.
        let v = oscillator_vote(Some(15.0), Some(25.0), 80.0, 20.0);
        assert_eq!(v.vote, Vote::Sell);
    }

    #[test]
    fn oscillator_no_data() {
        let v = oscillator_vote(None, Some(50.0), 80.0, 20.0);
        assert_eq!(v.vote, Vote::Abstain);
        assert_eq!(v.reason, "Stochastic: no data");
    }

    #[test]
    fn momentum_zero_cross() {
        assert_eq!(momentum_vote(Some(0.5), Some(-0.5)).vote, Vote::Buy);
        assert_eq!(momentum_vote(Some(0.5), Some(0.0)).vote, Vote::Buy);
        assert_eq!(momentum_vote(Some(-0.5), Some(0.5)).vote, Vote::Sell);
        assert_eq!(momentum_vote(Some(-0.5), Some(0.0)).vote, Vote::Sell);
        assert_eq!(momentum_vote(Some(0.5), Some(0.2)).vote, Vote::Abstain);
        assert_eq!(momentum_vote(Some(0.0), Some(0.0)).vote, Vote::Abstain);
        assert_eq!(momentum_vote(None, Some(-1.0)).vote, Vote::Abstain);
        assert_eq!(momentum_vote(Some(1.0), None).vote, Vote::Abstain);
    }

    #[test]
    fn quorum_two_buys() {
        let votes = Votes {
            trend: outcome(Vote::Buy),
            oscillator: outcome(Vote::Sell),
            momentum: outcome(Vote::Buy),
        };
        let d = consensus(&votes, Trend::Uptrend);
        assert!(d.buy);
        assert!(!d.sell);
        assert_eq!(d.buy_votes, 2);
        assert_eq!(d.sell_votes, 1);
        assert_eq!(d.reasons, vec!["BUY", "SELL", "BUY"]);
    }

    #[test]
    fn quorum_single_vote_is_not_enough() {
        let votes = Votes {
            trend: outcome(Vote::Abstain),
            oscillator: outcome(Vote::Sell),
            momentum: outcome(Vote::Buy),
        };
        let d = consensus(&votes, Trend::Neutral);
        assert!(!d.has_signal());
        assert_eq!(d.reasons, vec!["SELL", "BUY"]);
    }

    #[test]
    fn quorum_two_sells() {
        let votes = Votes {
            trend: outcome(Vote::Abstain),
            oscillator: outcome(Vote::Sell),
            momentum: outcome(Vote::Sell),
        };
        let d = consensus(&votes, Trend::Neutral);
        assert!(d.sell);
        assert!(!d.buy);
    }

    #[test]
    fn no_consensus_is_empty() {
        let d = ConsensusDecision::no_consensus();
        assert!(!d.has_signal());
        assert_eq!(d.trend, Trend::Neutral);
        assert!(d.reasons.is_empty());
    }
}
