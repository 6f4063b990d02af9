//! Price, equity and trade records after ingestion.
//!
//! Numeric fields that could not be parsed at the boundary are carried as
//! NaN; the engine excludes them rather than treating them as zero.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::date_key::DateKey;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PricePoint {
    pub date: DateKey,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EquityPoint {
    pub date: DateKey,
    pub equity: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TradeAction {
    Buy,
    Sell,
}

impl TradeAction {
    /// Case-insensitive `BUY` / `SELL`.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "BUY" => Some(TradeAction::Buy),
            "SELL" => Some(TradeAction::Sell),
            _ => None,
        }
    }
}

impl fmt::Display for TradeAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TradeAction::Buy => write!(f, "BUY"),
            TradeAction::Sell => write!(f, "SELL"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TradeEvent {
    pub date: DateKey,
    pub action: TradeAction,
    pub price: f64,
    pub shares: i64,
    pub pnl: Option<f64>,
    pub pnl_pct: Option<f64>,
    pub holding_days: Option<i64>,
    pub reason: Option<String>,
    pub before_cash: Option<f64>,
    pub after_cash: Option<f64>,
}

impl TradeEvent {
    pub fn new(date: DateKey, action: TradeAction, price: f64, shares: i64) -> Self {
        TradeEvent {
            date,
            action,
            price,
            shares,
            pnl: None,
            pnl_pct: None,
            holding_days: None,
            reason: None,
            before_cash: None,
            after_cash: None,
        }
    }

    pub fn is_buy(&self) -> bool {
        self.action == TradeAction::Buy
    }

    pub fn is_sell(&self) -> bool {
        self.action == TradeAction::Sell
    }
}

/// A record that can be placed on a time axis.
pub trait Dated {
    fn date_str(&self) -> &str;
}

/// The vertical value a chart label is anchored to.
pub trait ChartAnchor: Dated {
    fn anchor(&self) -> f64;
}

impl Dated for PricePoint {
    fn date_str(&self) -> &str {
        self.date.as_str()
    }
}

impl ChartAnchor for PricePoint {
    fn anchor(&self) -> f64 {
        self.high
    }
}

impl Dated for EquityPoint {
    fn date_str(&self) -> &str {
        self.date.as_str()
    }
}

impl ChartAnchor for EquityPoint {
    fn anchor(&self) -> f64 {
        self.equity
    }
}

impl Dated for TradeEvent {
    fn date_str(&self) -> &str {
        self.date.as_str()
    }
}

pub fn closes(prices: &[PricePoint]) -> Vec<f64> {
    prices.iter().map(|p| p.close).collect()
}
