//! Loose-typed boundary values and their one-time conversion into the
//! engine's typed records.
//!
//! The backtest service returns numbers as JSON numbers, numeric strings or
//! occasionally nulls. [`RawValue`] captures that shape; the `ingest_*`
//! functions convert it exactly once so the engine only ever sees `f64`
//! (NaN for unparseable) and `Option`s.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::date_key::DateKey;
use super::error::TradelensError;
use super::series::{EquityPoint, PricePoint, TradeAction, TradeEvent};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Number(f64),
    Text(String),
    Bool(bool),
    #[default]
    Null,
}

impl RawValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            RawValue::Number(n) => Some(*n),
            RawValue::Text(s) => s.trim().parse::<f64>().ok(),
            RawValue::Bool(_) | RawValue::Null => None,
        }
    }

    /// Unparseable values become NaN so the engine can exclude them.
    pub fn number_or_nan(&self) -> f64 {
        self.as_number().unwrap_or(f64::NAN)
    }

    /// Only for label text: unparseable values display as 0.
    pub fn display_number(&self) -> f64 {
        display_number(self.as_number())
    }

    pub fn as_text(&self) -> Option<String> {
        match self {
            RawValue::Null => None,
            RawValue::Text(s) if s.trim().is_empty() => None,
            other => Some(other.to_string()),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, RawValue::Null)
    }
}

impl fmt::Display for RawValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawValue::Number(n) => write!(f, "{}", n),
            RawValue::Text(s) => f.write_str(s),
            RawValue::Bool(b) => write!(f, "{}", b),
            RawValue::Null => f.write_str("null"),
        }
    }
}

impl From<&str> for RawValue {
    fn from(s: &str) -> Self {
        RawValue::Text(s.to_string())
    }
}

impl From<f64> for RawValue {
    fn from(n: f64) -> Self {
        RawValue::Number(n)
    }
}

/// Maps a missing or non-finite number to 0 for display.
pub fn display_number(value: Option<f64>) -> f64 {
    value.filter(|v| v.is_finite()).unwrap_or(0.0)
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawPriceRecord {
    #[serde(default)]
    pub date: RawValue,
    #[serde(default)]
    pub open: RawValue,
    #[serde(default)]
    pub high: RawValue,
    #[serde(default)]
    pub low: RawValue,
    #[serde(default)]
    pub close: RawValue,
    #[serde(default)]
    pub volume: RawValue,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawEquityRecord {
    #[serde(default)]
    pub date: RawValue,
    #[serde(default)]
    pub equity: RawValue,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawTradeRecord {
    #[serde(default)]
    pub date: RawValue,
    #[serde(default)]
    pub action: RawValue,
    #[serde(default)]
    pub price: RawValue,
    #[serde(default)]
    pub shares: RawValue,
    #[serde(default)]
    pub profit: RawValue,
    #[serde(default)]
    pub profit_percent: RawValue,
    #[serde(default)]
    pub holding_days: RawValue,
    #[serde(default)]
    pub trigger_reason: RawValue,
    #[serde(default)]
    pub before_cash: RawValue,
    #[serde(default)]
    pub after_cash: RawValue,
}

fn ingest_date(raw: &RawValue, source_name: &str, row: usize) -> Result<DateKey, TradelensError> {
    if raw.is_null() {
        return Err(TradelensError::DataFormat {
            source_name: source_name.to_string(),
            reason: format!("record {row}: missing date"),
        });
    }
    Ok(DateKey::normalize_display(raw))
}

pub fn ingest_prices(
    records: &[RawPriceRecord],
    source_name: &str,
) -> Result<Vec<PricePoint>, TradelensError> {
    records
        .iter()
        .enumerate()
        .map(|(row, r)| {
            Ok(PricePoint {
                date: ingest_date(&r.date, source_name, row)?,
                open: r.open.number_or_nan(),
                high: r.high.number_or_nan(),
                low: r.low.number_or_nan(),
                close: r.close.number_or_nan(),
                volume: r.volume.number_or_nan(),
            })
        })
        .collect()
}

pub fn ingest_equity(
    records: &[RawEquityRecord],
    source_name: &str,
) -> Result<Vec<EquityPoint>, TradelensError> {
    records
        .iter()
        .enumerate()
        .map(|(row, r)| {
            Ok(EquityPoint {
                date: ingest_date(&r.date, source_name, row)?,
                equity: r.equity.number_or_nan(),
            })
        })
        .collect()
}

pub fn ingest_trades(
    records: &[RawTradeRecord],
    source_name: &str,
) -> Result<Vec<TradeEvent>, TradelensError> {
    records
        .iter()
        .enumerate()
        .map(|(row, r)| {
            let date = ingest_date(&r.date, source_name, row)?;
            let action = r
                .action
                .as_text()
                .as_deref()
                .and_then(TradeAction::parse)
                .ok_or_else(|| TradelensError::DataFormat {
                    source_name: source_name.to_string(),
                    reason: format!("record {row}: unknown action {}", r.action),
                })?;

            let shares = r
                .shares
                .as_number()
                .filter(|s| s.is_finite())
                .map(|s| s.trunc() as i64)
                .unwrap_or(0);

            Ok(TradeEvent {
                date,
                action,
                price: r.price.number_or_nan(),
                shares,
                pnl: r.profit.as_number(),
                pnl_pct: r.profit_percent.as_number(),
                holding_days: r
                    .holding_days
                    .as_number()
                    .filter(|d| d.is_finite())
                    .map(|d| d.trunc() as i64),
                reason: r.trigger_reason.as_text(),
                before_cash: r.before_cash.as_number(),
                after_cash: r.after_cash.as_number(),
            })
        })
        .collect()
}
