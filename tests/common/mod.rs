#![allow(dead_code)]

use chrono::{DateTime, FixedOffset};
use signaltrader::domain::error::TraderError;
use signaltrader::domain::market_time::eastern_datetime;
use signaltrader::domain::position::{Position, StopLoss, StopLossKind};
use signaltrader::domain::report_parser::{
    DEFAULT_PRICE_DIVIDER, DEFAULT_PRICE_HEADER, DEFAULT_SIGNAL_HEADER, ParsedReport,
};
use signaltrader::domain::signal::{Direction, SignalInterval};
use signaltrader::ports::data_port::DataPort;
use std::collections::HashMap;

pub struct MockDataPort {
    pub reports: HashMap<(String, SignalInterval), ParsedReport>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            reports: HashMap::new(),
        }
    }

    pub fn with_report(
        mut self,
        ticker: &str,
        interval: SignalInterval,
        report: ParsedReport,
    ) -> Self {
        self.reports.insert((ticker.to_string(), interval), report);
        self
    }
}

impl DataPort for MockDataPort {
    fn fetch_report(
        &self,
        ticker: &str,
        interval: SignalInterval,
    ) -> Result<ParsedReport, TraderError> {
        self.reports
            .get(&(ticker.to_string(), interval))
            .cloned()
            .ok_or_else(|| TraderError::ReportRead {
                path: format!("{}_{}m.txt", ticker, interval.minutes()),
                reason: "not found".into(),
            })
    }

    fn list_tickers(&self) -> Result<Vec<String>, TraderError> {
        let mut tickers: Vec<String> = self
            .reports
            .keys()
            .filter(|(_, interval)| *interval == SignalInterval::OneMinute)
            .map(|(ticker, _)| ticker.clone())
            .collect();
        tickers.sort();
        Ok(tickers)
    }
}

pub fn at(hour: u32, minute: u32) -> DateTime<FixedOffset> {
    eastern_datetime(2020, 2, 3, hour, minute).unwrap()
}

/// Assemble a report from raw price and signal rows using the default markers.
pub fn report_text(price_rows: &[&str], signal_rows: &[&str]) -> String {
    let mut text = String::from("NQ 03-20 exported report\n\n");
    text.push_str(DEFAULT_PRICE_HEADER);
    text.push('\n');
    for row in price_rows {
        text.push_str(row);
        text.push('\n');
    }
    text.push_str(DEFAULT_PRICE_DIVIDER);
    text.push_str("\n\n");
    text.push_str(DEFAULT_SIGNAL_HEADER);
    text.push('\n');
    for row in signal_rows {
        text.push_str(row);
        text.push('\n');
    }
    text
}

pub fn make_position(
    direction: Direction,
    time: DateTime<FixedOffset>,
    price: f64,
    stop: f64,
) -> Position {
    Position::new(direction, 1, time, price, 2.25)
        .with_stop(StopLoss::new(stop, StopLossKind::SupportResistance))
}
