#![allow(dead_code)]

use chrono::NaiveDate;
use tradelens::domain::date_key::DateKey;
pub use tradelens::domain::series::{EquityPoint, PricePoint, TradeAction, TradeEvent};

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn key(s: &str) -> DateKey {
    DateKey::normalize(s)
}

pub fn make_bar(date: &str, close: f64) -> PricePoint {
    PricePoint {
        date: key(date),
        open: close - 1.0,
        high: close + 1.0,
        low: close - 2.0,
        close,
        volume: 1000.0,
    }
}

pub fn make_equity(date: &str, equity: f64) -> EquityPoint {
    EquityPoint {
        date: key(date),
        equity,
    }
}

pub fn make_trade(date: &str, action: TradeAction, price: f64, pnl: Option<f64>) -> TradeEvent {
    TradeEvent {
        pnl,
        ..TradeEvent::new(key(date), action, price, 100)
    }
}

/// 30 daily closes from 2024-01-01: 100, 102, ..., 128 (day 15), then down
/// by 3 a day to 83.
pub fn rising_then_falling_closes() -> Vec<f64> {
    (0..30)
        .map(|i| {
            if i < 15 {
                100.0 + 2.0 * i as f64
            } else {
                128.0 - 3.0 * (i - 14) as f64
            }
        })
        .collect()
}

pub fn day(i: usize) -> String {
    (date(2024, 1, 1) + chrono::Duration::days(i as i64))
        .format("%Y-%m-%d")
        .to_string()
}

pub fn generate_bars(closes: &[f64]) -> Vec<PricePoint> {
    closes
        .iter()
        .enumerate()
        .map(|(i, &c)| make_bar(&day(i), c))
        .collect()
}

/// Equity that moves 100 per point of close above 100.
pub fn equity_from_closes(closes: &[f64]) -> Vec<EquityPoint> {
    closes
        .iter()
        .enumerate()
        .map(|(i, &c)| make_equity(&day(i), 10_000.0 + (c - 100.0) * 100.0))
        .collect()
}
