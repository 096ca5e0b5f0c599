//! Account balance and single-position lifecycle.
//!
//! Two states: FLAT (no position) and IN_POSITION (exactly one). Entries
//! debit `size × entry_price` from the balance and exits credit
//! `size × exit_price` back, whatever the side. Realized P&L is
//! `(exit_price − entry_price) × size`, so a profitable short reports a
//! negative P&L. Cash and position value are not tracked separately.

use std::fmt;

use tracing::info;

use super::error::TraderError;
use super::position::{Position, Side};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitReason {
    StopLoss,
    TakeProfit,
}

impl fmt::Display for ExitReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExitReason::StopLoss => write!(f, "STOP_LOSS"),
            ExitReason::TakeProfit => write!(f, "TAKE_PROFIT"),
        }
    }
}

/// Settlement produced when an exit trigger fires.
#[derive(Debug, Clone, PartialEq)]
pub struct ExitEvent {
    pub reason: ExitReason,
    pub side: Side,
    pub entry_price: f64,
    pub exit_price: f64,
    pub size: f64,
    pub pnl: f64,
    /// Balance after settlement.
    pub balance: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AccountState {
    pub balance: f64,
    pub position: Option<Position>,
}

/// Sole owner and mutator of an [`AccountState`].
#[derive(Debug, Clone, PartialEq)]
pub struct PositionLedger {
    state: AccountState,
}

impl PositionLedger {
    pub fn new(initial_balance: f64) -> Self {
        PositionLedger {
            state: AccountState {
                balance: initial_balance,
                position: None,
            },
        }
    }

    pub fn state(&self) -> &AccountState {
        &self.state
    }

    pub fn into_state(self) -> AccountState {
        self.state
    }

    pub fn balance(&self) -> f64 {
        self.state.balance
    }

    pub fn position(&self) -> Option<&Position> {
        self.state.position.as_ref()
    }

    pub fn in_position(&self) -> bool {
        self.state.position.is_some()
    }

    /// Open a position. Only valid while FLAT.
    pub fn enter(
        &mut self,
        side: Side,
        price: f64,
        size: f64,
        stop_loss: f64,
        take_profit: f64,
    ) -> Result<(), TraderError> {
        if self.in_position() {
            return Err(TraderError::InvalidState {
                operation: "enter",
                state: "in position",
            });
        }

        let position = Position {
            side,
            entry_price: price,
            size,
            stop_loss,
            take_profit,
        };
        self.state.balance -= position.entry_notional();
        info!(
            %side,
            price,
            size,
            stop_loss,
            take_profit,
            balance = self.state.balance,
            "entered position"
        );
        self.state.position = Some(position);
        Ok(())
    }

    /// Settle the open position if `price` reached its stop or target.
    ///
    /// The stop is checked before the target. Returns `None` when neither
    /// level was reached. Calling this while FLAT is a no-op returning
    /// `None` rather than an error, so a repeated check after an exit
    /// reports no event.
    pub fn check_exit(&mut self, price: f64) -> Option<ExitEvent> {
        let position = self.state.position.as_ref()?;

        let reason = if position.should_stop_loss(price) {
            ExitReason::StopLoss
        } else if position.should_take_profit(price) {
            ExitReason::TakeProfit
        } else {
            return None;
        };

        let position = self.state.position.take()?;
        let pnl = position.unrealized_pnl(price);
        self.state.balance += position.notional_at(price);

        info!(
            %reason,
            side = %position.side,
            exit_price = price,
            pnl,
            balance = self.state.balance,
            "exited position"
        );

        Some(ExitEvent {
            reason,
            side: position.side,
            entry_price: position.entry_price,
            exit_price: price,
            size: position.size,
            pnl,
            balance: self.state.balance,
        })
    }
}
