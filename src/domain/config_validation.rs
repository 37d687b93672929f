//! Configuration validation.
//!
//! Validates every session field before any report is loaded.

use chrono::NaiveTime;

use crate::domain::error::TraderError;
use crate::domain::session_config::{CloseVerificationPolicy, TradingHours};
use crate::ports::config_port::ConfigPort;

pub fn validate_session_config(config: &dyn ConfigPort) -> Result<(), TraderError> {
    validate_hours(config)?;
    validate_point_value(config)?;
    validate_commission(config)?;
    validate_position_size(config)?;
    validate_daily_loss(config)?;
    validate_report_dir(config)?;
    validate_close_policies(config)?;
    Ok(())
}

fn invalid(section: &str, key: &str, reason: &str) -> TraderError {
    TraderError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: reason.to_string(),
    }
}

/// Read `[hours] key`, falling back to `default` when absent.
pub fn read_time(
    config: &dyn ConfigPort,
    key: &str,
    default: NaiveTime,
) -> Result<NaiveTime, TraderError> {
    match config.get_time("hours", key) {
        None => Ok(default),
        Some(Ok(time)) => Ok(time),
        Some(Err(raw)) => Err(invalid(
            "hours",
            key,
            &format!("invalid time '{raw}', expected HH:MM"),
        )),
    }
}

pub fn read_hours(config: &dyn ConfigPort) -> Result<TradingHours, TraderError> {
    let defaults = TradingHours::default();
    Ok(TradingHours {
        start: read_time(config, "trading_start", defaults.start)?,
        last_entry: read_time(config, "last_entry", defaults.last_entry)?,
        end: read_time(config, "trading_end", defaults.end)?,
    })
}

fn validate_hours(config: &dyn ConfigPort) -> Result<(), TraderError> {
    let hours = read_hours(config)?;
    if hours.start >= hours.last_entry {
        return Err(invalid(
            "hours",
            "trading_start",
            "trading_start must be before last_entry",
        ));
    }
    if hours.last_entry > hours.end {
        return Err(invalid(
            "hours",
            "last_entry",
            "last_entry must not be after trading_end",
        ));
    }
    Ok(())
}

fn validate_point_value(config: &dyn ConfigPort) -> Result<(), TraderError> {
    let value = config.get_double("session", "point_value", 20.0);
    if value <= 0.0 {
        return Err(invalid(
            "session",
            "point_value",
            "point_value must be positive",
        ));
    }
    Ok(())
}

fn validate_commission(config: &dyn ConfigPort) -> Result<(), TraderError> {
    let value = config.get_double("session", "commission", 0.0);
    if value < 0.0 {
        return Err(invalid(
            "session",
            "commission",
            "commission must be non-negative",
        ));
    }
    Ok(())
}

fn validate_position_size(config: &dyn ConfigPort) -> Result<(), TraderError> {
    let value = config.get_int("session", "max_position_size", 1);
    if value < 1 || value > i64::from(u32::MAX) {
        return Err(invalid(
            "session",
            "max_position_size",
            "max_position_size must be at least 1",
        ));
    }
    Ok(())
}

fn validate_daily_loss(config: &dyn ConfigPort) -> Result<(), TraderError> {
    let value = config.get_double("session", "max_daily_loss", 0.0);
    if value < 0.0 {
        return Err(invalid(
            "session",
            "max_daily_loss",
            "max_daily_loss must be non-negative",
        ));
    }
    Ok(())
}

fn validate_report_dir(config: &dyn ConfigPort) -> Result<(), TraderError> {
    match config.get_string("data", "report_dir") {
        Some(s) if !s.trim().is_empty() => Ok(()),
        _ => Err(TraderError::ConfigMissing {
            section: "data".to_string(),
            key: "report_dir".to_string(),
        }),
    }
}

/// Read one of the `[live]` close policies.
pub fn read_close_policy(
    config: &dyn ConfigPort,
    key: &str,
    default: &str,
) -> Result<CloseVerificationPolicy, TraderError> {
    let attempts = config.get_int("live", "verify_close_attempts", 3);
    if attempts < 1 || attempts > i64::from(u32::MAX) {
        return Err(invalid(
            "live",
            "verify_close_attempts",
            "verify_close_attempts must be at least 1",
        ));
    }
    let raw = config
        .get_string("live", key)
        .unwrap_or_else(|| default.to_string());
    CloseVerificationPolicy::parse(&raw, attempts as u32).ok_or_else(|| {
        invalid(
            "live",
            key,
            &format!("unknown policy '{raw}', expected retry or flatten"),
        )
    })
}

fn validate_close_policies(config: &dyn ConfigPort) -> Result<(), TraderError> {
    read_close_policy(config, "verify_close_policy", "retry")?;
    read_close_policy(config, "force_close_policy", "flatten")?;
    Ok(())
}
