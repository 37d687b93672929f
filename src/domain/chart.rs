//! Per-minute chart assembled from candles and indicator signals.

use chrono::{DateTime, FixedOffset};
use std::collections::HashMap;
use tracing::{debug, warn};

use crate::domain::candle::Candle;
use crate::domain::error::TraderError;
use crate::domain::market_time::MinuteKey;
use crate::domain::signal::{Signal, SignalInterval};
use crate::ports::data_port::DataPort;

/// One minute of price plus every signal that fired in that minute.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceBar {
    pub id: MinuteKey,
    pub candle: Candle,
    pub signals: Vec<Signal>,
}

impl PriceBar {
    pub fn signals_for(&self, interval: SignalInterval) -> impl Iterator<Item = &Signal> {
        self.signals.iter().filter(move |s| s.interval == interval)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Chart {
    pub ticker: String,
    pub keys: Vec<MinuteKey>,
    pub bars: HashMap<MinuteKey, PriceBar>,
}

impl Chart {
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn get(&self, key: MinuteKey) -> Option<&PriceBar> {
        self.bars.get(&key)
    }

    /// Bars in key order.
    pub fn iter(&self) -> impl Iterator<Item = &PriceBar> {
        self.keys.iter().filter_map(|k| self.bars.get(k))
    }

    pub fn first_bar(&self) -> Option<&PriceBar> {
        self.keys.first().and_then(|k| self.bars.get(k))
    }

    pub fn last_bar(&self) -> Option<&PriceBar> {
        self.keys.last().and_then(|k| self.bars.get(k))
    }

    /// The bar immediately preceding `key` in sequence order.
    pub fn previous_bar(&self, key: MinuteKey) -> Option<&PriceBar> {
        let index = self.keys.iter().position(|k| *k == key)?;
        let prev = index.checked_sub(1)?;
        self.bars.get(&self.keys[prev])
    }
}

fn in_window(
    time: &DateTime<FixedOffset>,
    start: Option<DateTime<FixedOffset>>,
    cutoff: Option<DateTime<FixedOffset>>,
) -> bool {
    start.is_none_or(|s| *time >= s) && cutoff.is_none_or(|c| *time <= c)
}

/// Merge candles and signal streams into a chart.
///
/// `start` and `cutoff` are inclusive. Key order follows candle order; a minute
/// that only has signals is dropped, and a repeated candle minute keeps the first.
pub fn build_chart(
    ticker: &str,
    candles: &[Candle],
    signal_sets: &[Vec<Signal>],
    start: Option<DateTime<FixedOffset>>,
    cutoff: Option<DateTime<FixedOffset>>,
) -> Chart {
    let mut signals_by_minute: HashMap<MinuteKey, Vec<Signal>> = HashMap::new();
    for signal in signal_sets.iter().flatten() {
        if in_window(&signal.time, start, cutoff) {
            signals_by_minute
                .entry(signal.minute_key())
                .or_default()
                .push(signal.clone());
        }
    }

    let mut keys = Vec::new();
    let mut bars = HashMap::new();
    for candle in candles {
        if !in_window(&candle.time, start, cutoff) {
            continue;
        }
        let id = candle.minute_key();
        if bars.contains_key(&id) {
            debug!(%id, "dropping duplicate candle");
            continue;
        }
        let signals = signals_by_minute.remove(&id).unwrap_or_default();
        keys.push(id);
        bars.insert(
            id,
            PriceBar {
                id,
                candle: candle.clone(),
                signals,
            },
        );
    }

    if !signals_by_minute.is_empty() {
        debug!(
            ticker,
            dropped = signals_by_minute.len(),
            "signal minutes without a candle"
        );
    }

    Chart {
        ticker: ticker.to_string(),
        keys,
        bars,
    }
}

/// Fetch every interval's report for `ticker` and build the chart.
///
/// The one-minute report is required and supplies the candles. Higher-interval
/// reports contribute signals only and are skipped when unavailable.
pub fn load_chart(
    data_port: &dyn DataPort,
    ticker: &str,
    start: Option<DateTime<FixedOffset>>,
    cutoff: Option<DateTime<FixedOffset>>,
) -> Result<Chart, TraderError> {
    let base = data_port.fetch_report(ticker, SignalInterval::OneMinute)?;
    let mut signal_sets = vec![base.signals];

    for interval in &SignalInterval::ALL[1..] {
        match data_port.fetch_report(ticker, *interval) {
            Ok(report) => signal_sets.push(report.signals),
            Err(e) => warn!(ticker, minutes = interval.minutes(), "skipping signals: {e}"),
        }
    }

    Ok(build_chart(ticker, &base.candles, &signal_sets, start, cutoff))
}
