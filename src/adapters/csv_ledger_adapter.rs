//! CSV trade ledger adapter.

use crate::domain::error::TraderError;
use crate::domain::trade::Trade;
use crate::ports::ledger_port::LedgerPort;
use std::path::Path;

pub const LEDGER_HEADER: [&str; 17] = [
    "direction",
    "simulated",
    "size",
    "point_value",
    "entry_time",
    "exit_time",
    "ideal_entry",
    "actual_entry",
    "ideal_exit",
    "actual_exit",
    "entry_order",
    "exit_order",
    "commission",
    "exit_method",
    "ideal_profit",
    "actual_profit",
    "profit_dollar",
];

pub struct CsvLedgerAdapter;

impl CsvLedgerAdapter {
    fn to_csv_error(path: &Path, err: impl std::fmt::Display) -> TraderError {
        TraderError::Io(std::io::Error::other(format!(
            "failed to write ledger {}: {}",
            path.display(),
            err
        )))
    }

    fn record(trade: &Trade) -> Vec<String> {
        vec![
            trade.direction.to_string(),
            trade.simulated.to_string(),
            trade.size.to_string(),
            format!("{}", trade.point_value),
            trade.entry_time.format("%Y-%m-%d %H:%M").to_string(),
            trade.exit_time.format("%Y-%m-%d %H:%M").to_string(),
            format!("{:.2}", trade.ideal_entry_price),
            format!("{:.2}", trade.actual_entry_price),
            format!("{:.2}", trade.ideal_exit_price),
            format!("{:.2}", trade.actual_exit_price),
            trade.entry_order_id.clone().unwrap_or_default(),
            trade.exit_order_id.clone().unwrap_or_default(),
            format!("{:.2}", trade.commission),
            trade.exit_method.to_string(),
            format!("{:.2}", trade.ideal_profit()),
            format!("{:.2}", trade.actual_profit()),
            format!("{:.2}", trade.actual_profit_dollar()),
        ]
    }
}

impl LedgerPort for CsvLedgerAdapter {
    fn write_trades(&self, trades: &[Trade], output_path: &Path) -> Result<(), TraderError> {
        let mut writer =
            csv::Writer::from_path(output_path).map_err(|e| Self::to_csv_error(output_path, e))?;

        writer
            .write_record(LEDGER_HEADER)
            .map_err(|e| Self::to_csv_error(output_path, e))?;
        for trade in trades {
            writer
                .write_record(Self::record(trade))
                .map_err(|e| Self::to_csv_error(output_path, e))?;
        }
        writer.flush()?;
        Ok(())
    }
}
