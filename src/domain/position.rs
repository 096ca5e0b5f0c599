//! Open position and exit trigger checks.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Long,
    Short,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Long => write!(f, "LONG"),
            Side::Short => write!(f, "SHORT"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Position {
    pub side: Side,
    pub entry_price: f64,
    pub size: f64,
    pub stop_loss: f64,
    pub take_profit: f64,
}

impl Position {
    /// Notional value at entry, debited from the balance on entry.
    pub fn entry_notional(&self) -> f64 {
        self.size * self.entry_price
    }

    /// Notional value at `price`, credited to the balance on exit.
    pub fn notional_at(&self, price: f64) -> f64 {
        self.size * price
    }

    /// `(price − entry) × size` for either side.
    pub fn unrealized_pnl(&self, price: f64) -> f64 {
        (price - self.entry_price) * self.size
    }

    /// Stop direction is taken from where the stop sits relative to entry,
    /// not from the side: a stop below entry triggers on the way down.
    pub fn should_stop_loss(&self, price: f64) -> bool {
        if self.stop_loss < self.entry_price {
            price <= self.stop_loss
        } else {
            price >= self.stop_loss
        }
    }

    /// Target direction is likewise taken relative to entry.
    pub fn should_take_profit(&self, price: f64) -> bool {
        if self.take_profit > self.entry_price {
            price >= self.take_profit
        } else {
            price <= self.take_profit
        }
    }
}
