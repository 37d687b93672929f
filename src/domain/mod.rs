//! Core domain types and logic.

pub mod action;
pub mod candle;
pub mod chart;
pub mod config_validation;
pub mod engine;
pub mod error;
pub mod market_time;
pub mod metrics;
pub mod position;
pub mod report_parser;
pub mod session;
pub mod session_config;
pub mod signal;
pub mod trade;
