//! Core domain types and the analytics engine.

pub mod date_key;
pub mod series;
pub mod raw;
pub mod moving_average;
pub mod time_index;
pub mod markers;
pub mod drawdown;
pub mod distribution;
pub mod trade_stats;
pub mod bundle;
pub mod config_validation;
pub mod error;
