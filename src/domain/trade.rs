//! Closed-position ledger record.

use chrono::{DateTime, FixedOffset};
use std::fmt;

use super::signal::Direction;

/// How a position came to be closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitMethod {
    StopLoss,
    Reversal,
    ProfitTarget,
    SignalExit,
    EndOfSession,
    Manual,
}

impl fmt::Display for ExitMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ExitMethod::StopLoss => "stop loss",
            ExitMethod::Reversal => "reversal",
            ExitMethod::ProfitTarget => "profit target",
            ExitMethod::SignalExit => "signal exit",
            ExitMethod::EndOfSession => "end of session",
            ExitMethod::Manual => "manual",
        };
        write!(f, "{name}")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Trade {
    pub direction: Direction,
    pub simulated: bool,
    pub size: u32,
    /// Dollars per point of price movement.
    pub point_value: f64,
    pub entry_time: DateTime<FixedOffset>,
    pub exit_time: DateTime<FixedOffset>,
    pub ideal_entry_price: f64,
    pub actual_entry_price: f64,
    pub ideal_exit_price: f64,
    pub actual_exit_price: f64,
    pub entry_order_id: Option<String>,
    pub exit_order_id: Option<String>,
    /// Round-trip commission in dollars.
    pub commission: f64,
    pub exit_method: ExitMethod,
}

impl Trade {
    /// Points per contract between the ideal prices.
    pub fn ideal_profit(&self) -> f64 {
        self.direction.sign() * (self.ideal_exit_price - self.ideal_entry_price)
    }

    /// Points across the whole size between the fill prices.
    pub fn actual_profit(&self) -> f64 {
        self.direction.sign()
            * (self.actual_exit_price - self.actual_entry_price)
            * f64::from(self.size)
    }

    /// Net dollars after commission.
    pub fn actual_profit_dollar(&self) -> f64 {
        self.actual_profit() * self.point_value - self.commission
    }

    /// Fill cost relative to the ideal prices, in points per contract.
    pub fn slippage(&self) -> f64 {
        let actual_per_contract =
            self.direction.sign() * (self.actual_exit_price - self.actual_entry_price);
        self.ideal_profit() - actual_per_contract
    }

    pub fn is_winner(&self) -> bool {
        self.actual_profit_dollar() > 0.0
    }
}
