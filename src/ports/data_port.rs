//! Report access port trait.

use crate::domain::error::TraderError;
use crate::domain::report_parser::ParsedReport;
use crate::domain::signal::SignalInterval;

pub trait DataPort {
    /// Parsed report for `ticker` exported at `interval`.
    fn fetch_report(
        &self,
        ticker: &str,
        interval: SignalInterval,
    ) -> Result<ParsedReport, TraderError>;

    fn list_tickers(&self) -> Result<Vec<String>, TraderError>;
}
