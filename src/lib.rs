//! signaltrader: report-driven trading session engine.
//!
//! Parses exported price/indicator reports into per-minute charts and replays
//! strategy actions against a single-position session ledger.
//!
//! Hexagonal architecture: domain logic in [`domain`], port traits in [`ports`],
//! concrete implementations in [`adapters`].

pub mod adapters;
pub mod cli;
pub mod domain;
pub mod ports;
