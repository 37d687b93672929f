//! Price/indicator report parser.
//!
//! A report holds two tabular sections. The price section starts after an exact
//! header line and ends at a divider line; the signal section starts after its own
//! header and runs to end of input. Rows are tab separated once padding spaces are
//! stripped. Rows that cannot be decoded are skipped, never fatal.

use chrono::{DateTime, FixedOffset};
use tracing::debug;

use crate::domain::candle::Candle;
use crate::domain::market_time::eastern_datetime;
use crate::domain::signal::{Signal, SignalInterval, decode_color, decode_stop};

pub const DEFAULT_PRICE_HEADER: &str = "Date\tTime\tOpen\tHigh\tLow\tClose\tVol\tOI";
pub const DEFAULT_PRICE_DIVIDER: &str = "----------";
pub const DEFAULT_SIGNAL_HEADER: &str =
    "Date\tTime\tBarUp\tBarDn\tBuyStop\tSellStop\tOn1\tOn2\tOn3\tOn4";

pub const MIN_PRICE_FIELDS: usize = 7;
pub const MIN_SIGNAL_FIELDS: usize = 10;

/// Marker lines that delimit the report sections.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportLayout {
    pub price_header: String,
    pub price_divider: String,
    pub signal_header: String,
}

impl Default for ReportLayout {
    fn default() -> Self {
        ReportLayout {
            price_header: DEFAULT_PRICE_HEADER.to_string(),
            price_divider: DEFAULT_PRICE_DIVIDER.to_string(),
            signal_header: DEFAULT_SIGNAL_HEADER.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedReport {
    pub candles: Vec<Candle>,
    pub signals: Vec<Signal>,
}

/// Parse both sections of a report.
pub fn parse_report(text: &str, layout: &ReportLayout, interval: SignalInterval) -> ParsedReport {
    ParsedReport {
        candles: parse_candles(text, layout),
        signals: parse_signals(text, layout, interval),
    }
}

pub fn parse_candles(text: &str, layout: &ReportLayout) -> Vec<Candle> {
    section_rows(text, &layout.price_header, Some(&layout.price_divider))
        .filter_map(|row| {
            let candle = parse_price_row(row);
            if candle.is_none() {
                debug!(row, "skipping undecodable price row");
            }
            candle
        })
        .collect()
}

pub fn parse_signals(text: &str, layout: &ReportLayout, interval: SignalInterval) -> Vec<Signal> {
    section_rows(text, &layout.signal_header, None)
        .filter_map(|row| {
            let signal = parse_signal_row(row, interval);
            if signal.is_none() {
                debug!(row, "skipping undecodable signal row");
            }
            signal
        })
        .collect()
}

/// Non-empty rows between `header` and `divider` (or end of input).
fn section_rows<'a>(
    text: &'a str,
    header: &'a str,
    divider: Option<&'a str>,
) -> impl Iterator<Item = &'a str> + 'a {
    text.lines()
        .map(|line| line.trim_end_matches('\r'))
        .skip_while(move |line| *line != header)
        .skip(1)
        .take_while(move |line| divider.is_none_or(|d| *line != d))
        .filter(|line| !line.trim().is_empty())
}

fn split_fields(row: &str) -> Vec<String> {
    row.replace(' ', "").split('\t').map(str::to_string).collect()
}

/// Decode `[date, time, open, high, low, close, volume, ..]`.
///
/// Unparsable numbers become zero; a short row or bad timestamp yields `None`.
pub fn parse_price_row(row: &str) -> Option<Candle> {
    let fields = split_fields(row);
    if fields.len() < MIN_PRICE_FIELDS {
        return None;
    }

    let time = parse_timestamp(&fields[0], &fields[1])?;
    Some(Candle {
        time,
        open: parse_f64(&fields[2]),
        high: parse_f64(&fields[3]),
        low: parse_f64(&fields[4]),
        close: parse_f64(&fields[5]),
        volume: fields[6].parse().unwrap_or(0),
    })
}

/// Decode `[date, time, barUp, barDn, buyStop, sellStop, on1, on2, on3, on4, ..]`.
pub fn parse_signal_row(row: &str, interval: SignalInterval) -> Option<Signal> {
    let fields = split_fields(row);
    if fields.len() < MIN_SIGNAL_FIELDS {
        return None;
    }
    if fields[0].is_empty() || fields[1].is_empty() {
        return None;
    }

    let time = parse_timestamp(&fields[0], &fields[1])?;
    let buy_stop = parse_f64(&fields[4]);
    let sell_stop = parse_f64(&fields[5]);
    let on1 = parse_flag(&fields[6]);
    let on2 = parse_flag(&fields[7]);
    let on3 = parse_flag(&fields[8]);
    let on4 = parse_flag(&fields[9]);

    let color = decode_color(on1, on2);
    let (stop, direction) = match decode_stop(on3, on4, buy_stop, sell_stop) {
        Some((price, direction)) => (Some(price), Some(direction)),
        None => (None, None),
    };

    Some(Signal {
        time,
        color,
        stop,
        direction,
        interval,
    })
}

/// `YYYYMMDD` plus `HHMMSS` (left zero-padded to six digits); seconds are ignored.
pub fn parse_timestamp(date: &str, time: &str) -> Option<DateTime<FixedOffset>> {
    let year: i32 = date.get(0..4)?.parse().ok()?;
    let month: u32 = date.get(4..6)?.parse().ok()?;
    let day: u32 = date.get(6..8)?.parse().ok()?;

    let padded = format!("{:0>6}", time);
    let hour: u32 = padded.get(0..2)?.parse().ok()?;
    let minute: u32 = padded.get(2..4)?.parse().ok()?;

    eastern_datetime(year, month, day, hour, minute)
}

fn parse_f64(field: &str) -> f64 {
    field.parse().unwrap_or(0.0)
}

fn parse_flag(field: &str) -> bool {
    field == "1" || field.eq_ignore_ascii_case("true")
}
