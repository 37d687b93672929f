//! Session ledger: closed trades plus at most one open position.

use super::position::{Position, StopLoss};
use super::trade::Trade;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    trades: Vec<Trade>,
    current: Option<Position>,
}

impl Session {
    pub fn new() -> Self {
        Session::default()
    }

    pub fn trades(&self) -> &[Trade] {
        &self.trades
    }

    pub fn current_position(&self) -> Option<&Position> {
        self.current.as_ref()
    }

    pub fn is_flat(&self) -> bool {
        self.current.is_none()
    }

    /// Install `position` as the open position, returning whatever it replaced.
    pub fn open(&mut self, position: Position) -> Option<Position> {
        self.current.replace(position)
    }

    /// Clear the open position slot.
    pub fn take_position(&mut self) -> Option<Position> {
        self.current.take()
    }

    /// Replace the stop of the open position. Returns `false` when flat.
    pub fn replace_stop(&mut self, stop: StopLoss) -> bool {
        match self.current.as_mut() {
            Some(position) => {
                position.stop = Some(stop);
                true
            }
            None => false,
        }
    }

    pub fn record_trade(&mut self, trade: Trade) {
        self.trades.push(trade);
    }

    pub fn trade_count(&self) -> usize {
        self.trades.len()
    }

    /// Net dollars across the ledger.
    pub fn realized_profit_dollar(&self) -> f64 {
        self.trades.iter().map(Trade::actual_profit_dollar).sum()
    }
}
