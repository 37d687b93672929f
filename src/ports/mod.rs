//! Port traits implemented by adapters and engines.

pub mod config_port;
pub mod data_port;
pub mod ledger_port;
pub mod session_port;
