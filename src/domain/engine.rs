//! Simulated session engine.
//!
//! Applies each bar's actions to a [`Session`] with fills at the ideal prices.
//! It never reports failure: a transition whose precondition does not hold is
//! logged and resolved from the action payload. Entries are trimmed to the
//! configured size cap and skipped once the daily loss limit is hit.

use chrono::{DateTime, FixedOffset};
use tracing::warn;

use super::action::TradeAction;
use super::error::TraderError;
use super::position::Position;
use super::session::Session;
use super::session_config::SessionConfig;
use super::trade::{ExitMethod, Trade};
use crate::ports::session_port::SessionManager;

#[derive(Debug, Clone)]
pub struct SimulatedSession {
    config: SessionConfig,
    session: Session,
}

impl SimulatedSession {
    pub fn new(config: SessionConfig) -> Self {
        SimulatedSession {
            config,
            session: Session::new(),
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn into_session(self) -> Session {
        self.session
    }

    fn open(&mut self, position: &Position) {
        let realized = self.session.realized_profit_dollar();
        if self.config.daily_loss_exceeded(realized) {
            warn!(
                realized,
                limit = self.config.max_daily_loss,
                "daily loss limit reached; entry skipped"
            );
            return;
        }
        if !self.session.is_flat() {
            warn!("opening a position while one is already open; replacing it");
        }
        let mut position = position.clone();
        if position.size > self.config.max_position_size {
            warn!(
                requested = position.size,
                max = self.config.max_position_size,
                "position size above limit; trimmed"
            );
            position.size = self.config.max_position_size;
        }
        position.actual_entry_price = position.ideal_entry_price;
        self.session.open(position);
    }

    fn close(
        &mut self,
        closed: &Position,
        exit_price: f64,
        exit_time: DateTime<FixedOffset>,
        exit_method: ExitMethod,
    ) {
        if self.session.take_position().is_none() {
            warn!(%exit_method, "closing a position while flat; recording from action payload");
        }
        let trade = simulated_trade(
            closed,
            exit_price,
            exit_time,
            exit_method,
            self.config.point_value,
        );
        self.session.record_trade(trade);
    }
}

/// Ledger entry for a position closed at `exit_price`.
///
/// Entry and exit fills equal the ideal prices, and commission covers both legs.
pub fn simulated_trade(
    closed: &Position,
    exit_price: f64,
    exit_time: DateTime<FixedOffset>,
    exit_method: ExitMethod,
    point_value: f64,
) -> Trade {
    Trade {
        direction: closed.direction,
        simulated: true,
        size: closed.size,
        point_value,
        entry_time: closed.entry_time,
        exit_time,
        ideal_entry_price: closed.ideal_entry_price,
        actual_entry_price: closed.ideal_entry_price,
        ideal_exit_price: exit_price,
        actual_exit_price: exit_price,
        entry_order_id: closed.entry_order_id.clone(),
        exit_order_id: None,
        commission: closed.commission * 2.0,
        exit_method,
    }
}

impl SessionManager for SimulatedSession {
    fn session(&self) -> &Session {
        &self.session
    }

    fn apply_action(
        &mut self,
        _bar_time: &DateTime<FixedOffset>,
        action: &TradeAction,
    ) -> Result<(), TraderError> {
        match action {
            TradeAction::NoAction { .. } => {}
            TradeAction::OpenPosition { position, .. } => self.open(position),
            TradeAction::ReversePosition {
                old_position,
                new_position,
                ..
            } => {
                self.close(
                    old_position,
                    new_position.ideal_entry_price,
                    new_position.entry_time,
                    ExitMethod::Reversal,
                );
                self.open(new_position);
            }
            TradeAction::UpdateStop { new_stop } => {
                if !self.session.replace_stop(new_stop.clone()) {
                    warn!(stop = new_stop.price, "stop update while flat ignored");
                }
            }
            TradeAction::VerifyPositionClosed {
                closed_position,
                closing_price,
                closing_time,
                reason,
            }
            | TradeAction::ForceClosePosition {
                closed_position,
                closing_price,
                closing_time,
                reason,
            } => self.close(closed_position, *closing_price, *closing_time, *reason),
        }
        Ok(())
    }
}
