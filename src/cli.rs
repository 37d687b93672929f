//! CLI definition and dispatch.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::info;

use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::file_report_adapter::FileReportAdapter;
use crate::domain::chart::{Chart, PriceBar, load_chart};
use crate::domain::config_validation::{read_close_policy, read_hours, validate_session_config};
use crate::domain::error::TraderError;
use crate::domain::report_parser::ReportLayout;
use crate::domain::session_config::SessionConfig;
use crate::domain::signal::{Signal, SignalInterval};
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;

#[derive(Parser, Debug)]
#[command(name = "signaltrader", about = "Report-driven trading session engine")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Build and print the per-minute chart for a ticker
    Chart {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        ticker: Option<String>,
        /// Restrict to this day's trading hours (YYYY-MM-DD)
        #[arg(long)]
        date: Option<String>,
    },
    /// Validate a session configuration
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// List tickers with exported reports
    Info {
        #[arg(short, long)]
        config: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    let result = match cli.command {
        Command::Chart {
            config,
            ticker,
            date,
        } => run_chart(&config, ticker.as_deref(), date.as_deref()),
        Command::Validate { config } => run_validate(&config),
        Command::Info { config } => run_info(&config),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

/// Load, validate and build the session configuration at `path`.
pub fn load_session_config(path: &PathBuf) -> Result<SessionConfig, TraderError> {
    info!("Loading config from {}", path.display());
    let adapter = FileConfigAdapter::from_file(path)?;
    validate_session_config(&adapter)?;
    build_session_config(&adapter)
}

fn layout_override(adapter: &dyn ConfigPort, key: &str) -> Option<String> {
    adapter
        .get_string("data", key)
        .filter(|s| !s.trim().is_empty())
        .map(|s| s.replace("\\t", "\t"))
}

pub fn build_session_config(adapter: &dyn ConfigPort) -> Result<SessionConfig, TraderError> {
    let report_dir = adapter
        .get_string("data", "report_dir")
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| TraderError::ConfigMissing {
            section: "data".into(),
            key: "report_dir".into(),
        })?;

    let max_position_size = u32::try_from(adapter.get_int("session", "max_position_size", 1))
        .map_err(|_| TraderError::ConfigInvalid {
            section: "session".into(),
            key: "max_position_size".into(),
            reason: "max_position_size must be at least 1".into(),
        })?;

    let defaults = ReportLayout::default();
    let layout = ReportLayout {
        price_header: layout_override(adapter, "price_header").unwrap_or(defaults.price_header),
        price_divider: layout_override(adapter, "price_divider").unwrap_or(defaults.price_divider),
        signal_header: layout_override(adapter, "signal_header").unwrap_or(defaults.signal_header),
    };

    Ok(SessionConfig {
        ticker: adapter
            .get_string("session", "ticker")
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| "NQ".to_string()),
        point_value: adapter.get_double("session", "point_value", 20.0),
        commission: adapter.get_double("session", "commission", 0.0),
        max_position_size,
        max_daily_loss: adapter.get_double("session", "max_daily_loss", 0.0),
        hours: read_hours(adapter)?,
        report_dir: PathBuf::from(report_dir.trim()),
        layout,
        verify_close_policy: read_close_policy(adapter, "verify_close_policy", "retry")?,
        force_close_policy: read_close_policy(adapter, "force_close_policy", "flatten")?,
    })
}

pub fn parse_date_arg(value: &str) -> Result<NaiveDate, TraderError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| TraderError::ConfigInvalid {
        section: "cli".into(),
        key: "date".into(),
        reason: format!("invalid date '{value}', expected YYYY-MM-DD"),
    })
}

fn format_signal(signal: &Signal) -> String {
    let mut text = format!("{}m {}", signal.interval.minutes(), signal.color);
    if let (Some(direction), Some(stop)) = (signal.direction, signal.stop) {
        text.push_str(&format!(" {direction} stop {stop:.2}"));
    }
    text
}

/// One printable chart line.
pub fn format_bar(bar: &PriceBar) -> String {
    let c = &bar.candle;
    let mut line = format!(
        "{}  O {:.2}  H {:.2}  L {:.2}  C {:.2}  V {}",
        bar.id, c.open, c.high, c.low, c.close, c.volume
    );
    if !bar.signals.is_empty() {
        let signals: Vec<String> = bar.signals.iter().map(format_signal).collect();
        line.push_str("  | ");
        line.push_str(&signals.join(", "));
    }
    line
}

/// Chart for `ticker_override` (or the configured ticker), limited to `date`'s hours.
///
/// The ticker is used exactly as given so it matches the report file name.
pub fn load_session_chart(
    config: &SessionConfig,
    ticker_override: Option<&str>,
    date: Option<&str>,
) -> Result<Chart, TraderError> {
    let ticker = ticker_override.unwrap_or(config.ticker.as_str());

    let (start, cutoff) = match date {
        Some(d) => {
            let (start, cutoff) = config.session_window(parse_date_arg(d)?);
            (Some(start), Some(cutoff))
        }
        None => (None, None),
    };

    let data_port = FileReportAdapter::new(config.report_dir.clone(), config.layout.clone());
    load_chart(&data_port, ticker, start, cutoff)
}

fn run_chart(
    config_path: &PathBuf,
    ticker_override: Option<&str>,
    date: Option<&str>,
) -> Result<(), TraderError> {
    let config = load_session_config(config_path)?;
    let chart = load_session_chart(&config, ticker_override, date)?;
    info!(ticker = %chart.ticker, bars = chart.len(), "chart built");

    for bar in chart.iter() {
        println!("{}", format_bar(bar));
    }
    Ok(())
}

fn run_validate(config_path: &PathBuf) -> Result<(), TraderError> {
    let config = load_session_config(config_path)?;
    println!(
        "Config OK: {} (point value {}, hours {}-{})",
        config.ticker,
        config.point_value,
        config.hours.start.format("%H:%M"),
        config.hours.end.format("%H:%M"),
    );
    Ok(())
}

fn run_info(config_path: &PathBuf) -> Result<(), TraderError> {
    let config = load_session_config(config_path)?;
    let data_port = FileReportAdapter::new(config.report_dir.clone(), config.layout.clone());

    let tickers = data_port.list_tickers()?;
    if tickers.is_empty() {
        println!("No reports found in {}", config.report_dir.display());
        return Ok(());
    }

    for ticker in &tickers {
        let report = data_port.fetch_report(ticker, SignalInterval::OneMinute)?;
        match (report.candles.first(), report.candles.last()) {
            (Some(first), Some(last)) => println!(
                "{}: {} candles, {} signals, {} to {}",
                ticker,
                report.candles.len(),
                report.signals.len(),
                first.time.format("%Y-%m-%d %H:%M"),
                last.time.format("%Y-%m-%d %H:%M"),
            ),
            _ => println!("{}: no candles", ticker),
        }
    }
    Ok(())
}
