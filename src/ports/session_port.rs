//! Session manager contract shared by the simulated and live engines.

use chrono::{DateTime, FixedOffset};
use tracing::{error, info, warn};

use crate::domain::action::TradeAction;
use crate::domain::error::TraderError;
use crate::domain::session::Session;
use crate::domain::session_config::CloseVerificationPolicy;

/// Outcome of one bar's action batch.
#[derive(Debug)]
pub struct BatchReport {
    pub bar_time: DateTime<FixedOffset>,
    pub applied: usize,
    /// Informational failures that did not stop the batch.
    pub failures: Vec<TraderError>,
}

impl BatchReport {
    pub fn new(bar_time: DateTime<FixedOffset>) -> Self {
        BatchReport {
            bar_time,
            applied: 0,
            failures: Vec::new(),
        }
    }

    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

pub trait SessionManager {
    fn session(&self) -> &Session;

    /// Apply a single transition against the session.
    fn apply_action(
        &mut self,
        bar_time: &DateTime<FixedOffset>,
        action: &TradeAction,
    ) -> Result<(), TraderError>;

    /// Apply `actions` strictly in order.
    ///
    /// A fatal error aborts the remaining actions and is returned; informational
    /// errors are collected into the report and processing continues.
    fn process_actions(
        &mut self,
        bar_time: &DateTime<FixedOffset>,
        actions: &[TradeAction],
    ) -> Result<BatchReport, TraderError> {
        let mut report = BatchReport::new(*bar_time);
        for action in actions {
            info!("{}", action.describe(bar_time));
            match self.apply_action(bar_time, action) {
                Ok(()) => report.applied += 1,
                Err(e) if e.is_fatal() => {
                    error!(action = action.name(), "aborting bar: {e}");
                    return Err(e);
                }
                Err(e) => {
                    warn!(action = action.name(), "continuing after: {e}");
                    report.failures.push(e);
                }
            }
        }
        Ok(report)
    }
}

/// Confirm a close according to `policy`, returning the number of checks made.
///
/// `check` is called with the 1-based attempt number and reports whether the
/// broker is flat. Informational check errors count as a failed attempt.
pub fn verify_close<F>(policy: CloseVerificationPolicy, mut check: F) -> Result<u32, TraderError>
where
    F: FnMut(u32) -> Result<bool, TraderError>,
{
    let max_attempts = match policy {
        CloseVerificationPolicy::ImmediateFlatten => return Ok(0),
        CloseVerificationPolicy::RetryUntilVerified { max_attempts } => max_attempts.max(1),
    };

    let mut last_reason = String::from("broker still reports an open position");
    for attempt in 1..=max_attempts {
        match check(attempt) {
            Ok(true) => return Ok(attempt),
            Ok(false) => {}
            Err(e) if e.is_fatal() => return Err(e),
            Err(e) => last_reason = e.to_string(),
        }
    }

    Err(TraderError::PositionNotClosed {
        attempts: max_attempts,
        reason: last_reason,
    })
}
