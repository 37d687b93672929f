//! Exported report directory adapter.
//!
//! Reports are stored one per ticker and interval as `{TICKER}_{N}m.txt`.

use crate::domain::error::TraderError;
use crate::domain::report_parser::{ParsedReport, ReportLayout, parse_report};
use crate::domain::signal::SignalInterval;
use crate::ports::data_port::DataPort;
use std::fs;
use std::path::PathBuf;
use tracing::debug;

const BASE_SUFFIX: &str = "_1m.txt";

pub struct FileReportAdapter {
    base_path: PathBuf,
    layout: ReportLayout,
}

impl FileReportAdapter {
    pub fn new(base_path: PathBuf, layout: ReportLayout) -> Self {
        Self { base_path, layout }
    }

    pub fn report_path(&self, ticker: &str, interval: SignalInterval) -> PathBuf {
        self.base_path
            .join(format!("{}_{}m.txt", ticker, interval.minutes()))
    }
}

impl DataPort for FileReportAdapter {
    fn fetch_report(
        &self,
        ticker: &str,
        interval: SignalInterval,
    ) -> Result<ParsedReport, TraderError> {
        let path = self.report_path(ticker, interval);
        let bytes = fs::read(&path).map_err(|e| TraderError::ReportRead {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        // Exports are not always UTF-8; a bad byte only spoils its own row.
        let content = String::from_utf8_lossy(&bytes);

        let report = parse_report(&content, &self.layout, interval);
        debug!(
            path = %path.display(),
            candles = report.candles.len(),
            signals = report.signals.len(),
            "parsed report"
        );
        Ok(report)
    }

    fn list_tickers(&self) -> Result<Vec<String>, TraderError> {
        let entries = fs::read_dir(&self.base_path).map_err(|e| TraderError::ReportRead {
            path: self.base_path.display().to_string(),
            reason: e.to_string(),
        })?;

        let mut tickers = Vec::new();
        for entry in entries {
            let entry = entry?;
            let name = entry.file_name();
            let name_str = name.to_string_lossy();

            if let Some(ticker) = name_str.strip_suffix(BASE_SUFFIX) {
                if !ticker.is_empty() {
                    tickers.push(ticker.to_string());
                }
            }
        }

        tickers.sort();
        Ok(tickers)
    }
}
