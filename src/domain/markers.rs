//! Buy/sell chart markers aligned to series positions.
//!
//! Every trade ends up in exactly one of `buy`, `sell` or `unmatched`.
//! A trade is unmatched when its date key is absent from the index or its
//! price is not a positive number; it is reported, never dropped.
//!
//! Label placement: the first label on a position sits at
//! `anchor + scale * base_offset`, each further label on the same position
//! is pushed out by another `scale * step`. `scale` is `|anchor|`, or the
//! trade price when the anchor is zero, so it is always positive and
//! same-day buy/sell pairs never overlap.

use serde::Serialize;
use std::collections::HashMap;

use super::date_key::DateKey;
use super::raw::display_number;
use super::series::{ChartAnchor, TradeAction, TradeEvent};
use super::time_index::TimeSeriesIndex;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerColor {
    Buy,
    Gain,
    Loss,
}

impl MarkerColor {
    pub fn hex(&self) -> &'static str {
        match self {
            MarkerColor::Buy => "#1e88e5",
            MarkerColor::Gain => "#26a69a",
            MarkerColor::Loss => "#ef5350",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    /// Position of the originating trade in the input list.
    pub trade_index: usize,
    /// Position in the series the marker is drawn on.
    pub index: usize,
    pub date: DateKey,
    pub value: f64,
    pub color: MarkerColor,
    pub label: String,
    pub label_y: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UnmatchReason {
    DateNotFound,
    InvalidPrice,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnmatchedTrade {
    pub trade_index: usize,
    pub trade: TradeEvent,
    pub reason: UnmatchReason,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MarkerSet {
    pub buy: Vec<Marker>,
    pub sell: Vec<Marker>,
    pub unmatched: Vec<UnmatchedTrade>,
}

impl MarkerSet {
    pub fn total(&self) -> usize {
        self.buy.len() + self.sell.len() + self.unmatched.len()
    }

    pub fn is_fully_aligned(&self) -> bool {
        self.unmatched.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelLayout {
    pub base_offset: f64,
    pub step: f64,
}

impl Default for LabelLayout {
    fn default() -> Self {
        LabelLayout {
            base_offset: 0.10,
            step: 0.10,
        }
    }
}

impl LabelLayout {
    /// `slot` is how many labels already occupy this position; `scale`
    /// must be positive.
    pub fn label_y(&self, anchor: f64, scale: f64, slot: usize) -> f64 {
        let offset = self.base_offset + self.step * slot as f64;
        anchor + scale * offset
    }
}

pub fn sell_color(pnl: Option<f64>) -> MarkerColor {
    if display_number(pnl) >= 0.0 {
        MarkerColor::Gain
    } else {
        MarkerColor::Loss
    }
}

pub fn format_label(trade: &TradeEvent) -> String {
    match trade.action {
        TradeAction::Buy => format!("B {:.2}", trade.price),
        TradeAction::Sell => format!("S {:.2} ({:+.2})", trade.price, display_number(trade.pnl)),
    }
}

pub fn build_markers<T: ChartAnchor>(
    trades: &[TradeEvent],
    index: &TimeSeriesIndex,
    series: &[T],
) -> MarkerSet {
    build_markers_with_layout(trades, index, series, &LabelLayout::default())
}

pub fn build_markers_with_layout<T: ChartAnchor>(
    trades: &[TradeEvent],
    index: &TimeSeriesIndex,
    series: &[T],
    layout: &LabelLayout,
) -> MarkerSet {
    let mut set = MarkerSet::default();
    let mut slots: HashMap<usize, usize> = HashMap::new();

    for (trade_index, trade) in trades.iter().enumerate() {
        let key = DateKey::normalize(trade.date.as_str());
        let position = match index.get(&key) {
            Some(p) => p,
            None => {
                set.unmatched.push(UnmatchedTrade {
                    trade_index,
                    trade: trade.clone(),
                    reason: UnmatchReason::DateNotFound,
                });
                continue;
            }
        };
        if !(trade.price.is_finite() && trade.price > 0.0) {
            set.unmatched.push(UnmatchedTrade {
                trade_index,
                trade: trade.clone(),
                reason: UnmatchReason::InvalidPrice,
            });
            continue;
        }

        let anchor = series
            .get(position)
            .map(|p| p.anchor())
            .filter(|a| a.is_finite())
            .unwrap_or(trade.price);
        let scale = if anchor != 0.0 { anchor.abs() } else { trade.price };
        let slot = slots.entry(position).or_insert(0);
        let label_y = layout.label_y(anchor, scale, *slot);
        *slot += 1;

        let color = match trade.action {
            TradeAction::Buy => MarkerColor::Buy,
            TradeAction::Sell => sell_color(trade.pnl),
        };
        let marker = Marker {
            trade_index,
            index: position,
            date: key,
            value: trade.price,
            color,
            label: format_label(trade),
            label_y,
        };
        match trade.action {
            TradeAction::Buy => set.buy.push(marker),
            TradeAction::Sell => set.sell.push(marker),
        }
    }

    if !set.unmatched.is_empty() {
        let dates: Vec<&str> = set.unmatched.iter().map(|u| u.trade.date.as_str()).collect();
        tracing::warn!(
            count = set.unmatched.len(),
            dates = ?dates,
            "trade events could not be aligned to the series"
        );
    }

    set
}
