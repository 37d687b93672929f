//! Indicator signals (color, stop and direction) parsed from a signal report.

use chrono::{DateTime, FixedOffset};
use std::fmt;

use super::market_time::MinuteKey;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Long,
    Short,
}

impl Direction {
    /// +1 for long, -1 for short.
    pub fn sign(&self) -> f64 {
        match self {
            Direction::Long => 1.0,
            Direction::Short => -1.0,
        }
    }

    pub fn opposite(&self) -> Direction {
        match self {
            Direction::Long => Direction::Short,
            Direction::Short => Direction::Long,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Long => write!(f, "LONG"),
            Direction::Short => write!(f, "SHORT"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignalColor {
    Green,
    Blue,
    Red,
}

impl fmt::Display for SignalColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SignalColor::Green => write!(f, "green"),
            SignalColor::Blue => write!(f, "blue"),
            SignalColor::Red => write!(f, "red"),
        }
    }
}

/// Bar interval of the indicator that produced a signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SignalInterval {
    OneMinute,
    TwoMinute,
    ThreeMinute,
}

impl SignalInterval {
    pub const ALL: [SignalInterval; 3] = [
        SignalInterval::OneMinute,
        SignalInterval::TwoMinute,
        SignalInterval::ThreeMinute,
    ];

    pub fn minutes(&self) -> u32 {
        match self {
            SignalInterval::OneMinute => 1,
            SignalInterval::TwoMinute => 2,
            SignalInterval::ThreeMinute => 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Signal {
    pub time: DateTime<FixedOffset>,
    pub color: SignalColor,
    pub stop: Option<f64>,
    pub direction: Option<Direction>,
    pub interval: SignalInterval,
}

impl Signal {
    pub fn minute_key(&self) -> MinuteKey {
        MinuteKey::from_time(&self.time)
    }
}

/// Decode the color confirmation pair. Only an exclusive flag selects blue or red.
pub fn decode_color(on1: bool, on2: bool) -> SignalColor {
    match (on1, on2) {
        (true, false) => SignalColor::Blue,
        (false, true) => SignalColor::Red,
        _ => SignalColor::Green,
    }
}

/// Decode the stop confirmation pair into `(stop, direction)`.
///
/// Independent of [`decode_color`]: both-set and both-clear yield no stop at all.
pub fn decode_stop(
    on3: bool,
    on4: bool,
    buy_stop: f64,
    sell_stop: f64,
) -> Option<(f64, Direction)> {
    match (on3, on4) {
        (true, false) => Some((buy_stop, Direction::Long)),
        (false, true) => Some((sell_stop, Direction::Short)),
        _ => None,
    }
}
