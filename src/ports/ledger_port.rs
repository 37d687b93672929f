//! Trade ledger export port trait.

use std::path::Path;

use crate::domain::error::TraderError;
use crate::domain::trade::Trade;

pub trait LedgerPort {
    fn write_trades(&self, trades: &[Trade], output_path: &Path) -> Result<(), TraderError>;
}
