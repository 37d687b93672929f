//! One-minute OHLCV candle parsed from a price report.

use chrono::{DateTime, FixedOffset};

use super::market_time::MinuteKey;

#[derive(Debug, Clone, PartialEq)]
pub struct Candle {
    pub time: DateTime<FixedOffset>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: i64,
}

impl Candle {
    pub fn minute_key(&self) -> MinuteKey {
        MinuteKey::from_time(&self.time)
    }

    /// high - low
    pub fn range(&self) -> f64 {
        self.high - self.low
    }

    /// |close - open|
    pub fn body(&self) -> f64 {
        (self.close - self.open).abs()
    }

    pub fn is_bullish(&self) -> bool {
        self.close > self.open
    }

    pub fn is_bearish(&self) -> bool {
        self.close < self.open
    }
}
