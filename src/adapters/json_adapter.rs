//! JSON payload adapter for the backtest service response.
//!
//! Expected shape (every array optional):
//! `{ "prices": [...], "equity": [...], "trades": [...] }`

use crate::domain::error::TradelensError;
use crate::domain::raw::{
    ingest_equity, ingest_prices, ingest_trades, RawEquityRecord, RawPriceRecord, RawTradeRecord,
};
use crate::domain::series::{EquityPoint, PricePoint, TradeEvent};
use crate::ports::data_port::DataPort;
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Default, Deserialize)]
struct BacktestPayload {
    #[serde(default)]
    prices: Vec<RawPriceRecord>,
    #[serde(default, alias = "equity_curve")]
    equity: Vec<RawEquityRecord>,
    #[serde(default)]
    trades: Vec<RawTradeRecord>,
}

pub struct JsonAdapter {
    source_name: String,
    payload: BacktestPayload,
}

impl JsonAdapter {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, TradelensError> {
        let source_name = path.as_ref().display().to_string();
        let content = fs::read_to_string(path.as_ref()).map_err(|e| TradelensError::DataRead {
            source_name: source_name.clone(),
            reason: e.to_string(),
        })?;
        Self::parse(&content, source_name)
    }

    pub fn from_string(content: &str) -> Result<Self, TradelensError> {
        Self::parse(content, "<inline>".to_string())
    }

    fn parse(content: &str, source_name: String) -> Result<Self, TradelensError> {
        let payload: BacktestPayload =
            serde_json::from_str(content).map_err(|e| TradelensError::DataFormat {
                source_name: source_name.clone(),
                reason: format!("JSON parse error: {}", e),
            })?;
        tracing::debug!(
            source = %source_name,
            prices = payload.prices.len(),
            equity = payload.equity.len(),
            trades = payload.trades.len(),
            "loaded backtest payload"
        );
        Ok(Self {
            source_name,
            payload,
        })
    }
}

impl DataPort for JsonAdapter {
    fn fetch_prices(&self) -> Result<Vec<PricePoint>, TradelensError> {
        ingest_prices(&self.payload.prices, &self.source_name)
    }

    fn fetch_equity(&self) -> Result<Vec<EquityPoint>, TradelensError> {
        ingest_equity(&self.payload.equity, &self.source_name)
    }

    fn fetch_trades(&self) -> Result<Vec<TradeEvent>, TradelensError> {
        ingest_trades(&self.payload.trades, &self.source_name)
    }
}
