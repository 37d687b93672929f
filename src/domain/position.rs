//! Open position and its protective stop.

use chrono::{DateTime, FixedOffset};
use std::fmt;

use super::signal::Direction;

/// Why the stop sits at its current price.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopLossKind {
    SupportResistance,
    TwoGreenBars,
    CurrentBar,
}

impl fmt::Display for StopLossKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StopLossKind::SupportResistance => write!(f, "support/resistance"),
            StopLossKind::TwoGreenBars => write!(f, "two green bars"),
            StopLossKind::CurrentBar => write!(f, "current bar"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StopLoss {
    pub price: f64,
    pub kind: StopLossKind,
    /// Broker order carrying the stop; only set by live engines.
    pub order_id: Option<String>,
}

impl StopLoss {
    pub fn new(price: f64, kind: StopLossKind) -> Self {
        StopLoss {
            price,
            kind,
            order_id: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Position {
    pub direction: Direction,
    pub size: u32,
    pub entry_time: DateTime<FixedOffset>,
    /// Signal-implied entry.
    pub ideal_entry_price: f64,
    /// Fill price; equals the ideal entry in simulation.
    pub actual_entry_price: f64,
    pub stop: Option<StopLoss>,
    pub entry_order_id: Option<String>,
    /// Commission for one side of the round trip.
    pub commission: f64,
}

impl Position {
    pub fn new(
        direction: Direction,
        size: u32,
        entry_time: DateTime<FixedOffset>,
        entry_price: f64,
        commission: f64,
    ) -> Self {
        Position {
            direction,
            size,
            entry_time,
            ideal_entry_price: entry_price,
            actual_entry_price: entry_price,
            stop: None,
            entry_order_id: None,
            commission,
        }
    }

    pub fn with_stop(mut self, stop: StopLoss) -> Self {
        self.stop = Some(stop);
        self
    }

    pub fn is_long(&self) -> bool {
        self.direction == Direction::Long
    }

    pub fn is_short(&self) -> bool {
        self.direction == Direction::Short
    }

    /// Points locked in by the stop; negative while the stop is still on the losing side.
    pub fn secured_profit(&self) -> Option<f64> {
        self.stop
            .as_ref()
            .map(|stop| self.direction.sign() * (stop.price - self.actual_entry_price))
    }

    /// Points gained per contract if the position were closed at `price`.
    pub fn unrealized_profit(&self, price: f64) -> f64 {
        self.direction.sign() * (price - self.actual_entry_price)
    }

    pub fn is_stop_hit(&self, price: f64) -> bool {
        match &self.stop {
            None => false,
            Some(stop) => match self.direction {
                Direction::Long => price <= stop.price,
                Direction::Short => price >= stop.price,
            },
        }
    }
}
