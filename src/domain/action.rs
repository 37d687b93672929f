//! Trade actions emitted by strategy logic, one batch per evaluated bar.
//!
//! Every variant is a transition request for a session engine. The audit text
//! produced by [`TradeAction::describe`] is for logging only.

use chrono::{DateTime, FixedOffset};
use std::fmt;

use super::position::{Position, StopLoss};
use super::trade::ExitMethod;

/// What prompted an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryType {
    NewSignal,
    Continuation,
    Reversal,
    ReEntry,
}

impl fmt::Display for EntryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryType::NewSignal => write!(f, "new signal"),
            EntryType::Continuation => write!(f, "continuation"),
            EntryType::Reversal => write!(f, "reversal"),
            EntryType::ReEntry => write!(f, "re-entry"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TradeAction {
    NoAction {
        entry_type: Option<EntryType>,
        reason: String,
    },
    OpenPosition {
        position: Position,
        entry_type: EntryType,
    },
    ReversePosition {
        old_position: Position,
        new_position: Position,
        entry_type: EntryType,
    },
    UpdateStop {
        new_stop: StopLoss,
    },
    /// Close confirmed by the strategy (e.g. a stop traded through).
    VerifyPositionClosed {
        closed_position: Position,
        closing_price: f64,
        closing_time: DateTime<FixedOffset>,
        reason: ExitMethod,
    },
    /// Close regardless of broker state.
    ForceClosePosition {
        closed_position: Position,
        closing_price: f64,
        closing_time: DateTime<FixedOffset>,
        reason: ExitMethod,
    },
}

impl TradeAction {
    pub fn name(&self) -> &'static str {
        match self {
            TradeAction::NoAction { .. } => "no action",
            TradeAction::OpenPosition { .. } => "open position",
            TradeAction::ReversePosition { .. } => "reverse position",
            TradeAction::UpdateStop { .. } => "update stop",
            TradeAction::VerifyPositionClosed { .. } => "verify position closed",
            TradeAction::ForceClosePosition { .. } => "force close position",
        }
    }

    /// True for variants that append a trade to the ledger.
    pub fn closes_position(&self) -> bool {
        matches!(
            self,
            TradeAction::ReversePosition { .. }
                | TradeAction::VerifyPositionClosed { .. }
                | TradeAction::ForceClosePosition { .. }
        )
    }

    /// Human-readable audit line for the bar at `bar_time`.
    pub fn describe(&self, bar_time: &DateTime<FixedOffset>) -> String {
        let time = bar_time.format("%Y-%m-%d %H:%M");
        match self {
            TradeAction::NoAction { entry_type, reason } => match entry_type {
                Some(entry) => format!("{time} NO ACTION [{entry}]: {reason}"),
                None => format!("{time} NO ACTION: {reason}"),
            },
            TradeAction::OpenPosition {
                position,
                entry_type,
            } => format!(
                "{time} OPEN {} x{} @ {:.2} stop {} [{entry_type}]",
                position.direction,
                position.size,
                position.ideal_entry_price,
                describe_stop(position.stop.as_ref()),
            ),
            TradeAction::ReversePosition {
                old_position,
                new_position,
                entry_type,
            } => format!(
                "{time} REVERSE {} -> {} x{} @ {:.2} stop {} [{entry_type}]",
                old_position.direction,
                new_position.direction,
                new_position.size,
                new_position.ideal_entry_price,
                describe_stop(new_position.stop.as_ref()),
            ),
            TradeAction::UpdateStop { new_stop } => {
                format!("{time} UPDATE STOP -> {}", describe_stop(Some(new_stop)))
            }
            TradeAction::VerifyPositionClosed {
                closed_position,
                closing_price,
                reason,
                ..
            } => format!(
                "{time} VERIFY CLOSED {} x{} @ {:.2} ({reason})",
                closed_position.direction, closed_position.size, closing_price,
            ),
            TradeAction::ForceClosePosition {
                closed_position,
                closing_price,
                reason,
                ..
            } => format!(
                "{time} FORCE CLOSE {} x{} @ {:.2} ({reason})",
                closed_position.direction, closed_position.size, closing_price,
            ),
        }
    }
}

fn describe_stop(stop: Option<&StopLoss>) -> String {
    match stop {
        Some(stop) => format!("{:.2} ({})", stop.price, stop.kind),
        None => "none".to_string(),
    }
}
