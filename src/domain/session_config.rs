//! Session configuration and trading-window helpers.
//!
//! Built once at startup and handed to the engine by value.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime};
use std::path::PathBuf;

use super::market_time::{EASTERN, at_eastern};
use super::position::Position;
use super::report_parser::ReportLayout;
use super::signal::Direction;

/// How a live engine confirms a close before recording it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseVerificationPolicy {
    /// Poll the broker until it reports flat, up to `max_attempts` times.
    RetryUntilVerified { max_attempts: u32 },
    /// Send a flatten order and record the close without polling.
    ImmediateFlatten,
}

impl CloseVerificationPolicy {
    /// Parse `retry` or `flatten`.
    pub fn parse(value: &str, max_attempts: u32) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "retry" => Some(CloseVerificationPolicy::RetryUntilVerified { max_attempts }),
            "flatten" => Some(CloseVerificationPolicy::ImmediateFlatten),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TradingHours {
    pub start: NaiveTime,
    pub last_entry: NaiveTime,
    pub end: NaiveTime,
}

const fn wall_clock_const(hour: u32, minute: u32) -> NaiveTime {
    match NaiveTime::from_hms_opt(hour, minute, 0) {
        Some(time) => time,
        None => panic!("default trading hour out of range"),
    }
}

pub const DEFAULT_TRADING_START: NaiveTime = wall_clock_const(9, 30);
pub const DEFAULT_LAST_ENTRY: NaiveTime = wall_clock_const(15, 45);
pub const DEFAULT_TRADING_END: NaiveTime = wall_clock_const(16, 0);

impl Default for TradingHours {
    fn default() -> Self {
        TradingHours {
            start: DEFAULT_TRADING_START,
            last_entry: DEFAULT_LAST_ENTRY,
            end: DEFAULT_TRADING_END,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    pub ticker: String,
    pub point_value: f64,
    /// Per-side commission stamped on positions built by [`SessionConfig::new_position`].
    pub commission: f64,
    /// Contract cap for new positions; the engine trims larger entries.
    pub max_position_size: u32,
    /// Dollar loss that ends trading for the day; zero disables the limit.
    pub max_daily_loss: f64,
    pub hours: TradingHours,
    pub report_dir: PathBuf,
    pub layout: ReportLayout,
    pub verify_close_policy: CloseVerificationPolicy,
    pub force_close_policy: CloseVerificationPolicy,
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            ticker: "NQ".to_string(),
            point_value: 20.0,
            commission: 0.0,
            max_position_size: 1,
            max_daily_loss: 0.0,
            hours: TradingHours::default(),
            report_dir: PathBuf::from("reports"),
            layout: ReportLayout::default(),
            verify_close_policy: CloseVerificationPolicy::RetryUntilVerified { max_attempts: 3 },
            force_close_policy: CloseVerificationPolicy::ImmediateFlatten,
        }
    }
}

impl SessionConfig {
    fn wall_clock(time: &DateTime<FixedOffset>) -> NaiveTime {
        time.with_timezone(&EASTERN).time()
    }

    /// Inside `[start, end]` in Eastern wall-clock time.
    pub fn is_trading_time(&self, time: &DateTime<FixedOffset>) -> bool {
        let t = Self::wall_clock(time);
        t >= self.hours.start && t <= self.hours.end
    }

    /// Inside `[start, last_entry]`.
    pub fn is_entry_allowed(&self, time: &DateTime<FixedOffset>) -> bool {
        let t = Self::wall_clock(time);
        t >= self.hours.start && t <= self.hours.last_entry
    }

    /// Inclusive chart window covering `date`'s trading hours.
    pub fn session_window(
        &self,
        date: NaiveDate,
    ) -> (DateTime<FixedOffset>, DateTime<FixedOffset>) {
        (
            at_eastern(date, self.hours.start),
            at_eastern(date, self.hours.end),
        )
    }

    /// Position sized within `max_position_size` and carrying the configured commission.
    pub fn new_position(
        &self,
        direction: Direction,
        size: u32,
        entry_time: DateTime<FixedOffset>,
        entry_price: f64,
    ) -> Position {
        let size = size.clamp(1, self.max_position_size.max(1));
        Position::new(direction, size, entry_time, entry_price, self.commission)
    }

    pub fn daily_loss_exceeded(&self, realized_dollar: f64) -> bool {
        self.max_daily_loss > 0.0 && realized_dollar <= -self.max_daily_loss
    }

    pub fn policy_for(&self, forced: bool) -> CloseVerificationPolicy {
        if forced {
            self.force_close_policy
        } else {
            self.verify_close_policy
        }
    }
}
