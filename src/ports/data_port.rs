//! Data access port: one backtest run's series and trade list.

use crate::domain::bundle::AnalyticsInput;
use crate::domain::error::TradelensError;
use crate::domain::series::{EquityPoint, PricePoint, TradeEvent};

pub trait DataPort {
    fn fetch_prices(&self) -> Result<Vec<PricePoint>, TradelensError>;

    fn fetch_equity(&self) -> Result<Vec<EquityPoint>, TradelensError>;

    fn fetch_trades(&self) -> Result<Vec<TradeEvent>, TradelensError>;

    /// Default implementation: fetches the three parts independently.
    fn fetch_run(&self) -> Result<AnalyticsInput, TradelensError> {
        Ok(AnalyticsInput {
            prices: self.fetch_prices()?,
            equity: self.fetch_equity()?,
            trades: self.fetch_trades()?,
        })
    }
}
