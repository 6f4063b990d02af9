//! Render-ready bundle: one analytics call over one backtest run.
//!
//! Composes the engine in data-dependency order (index before markers,
//! series before moving averages). Every field is plain data; a chart
//! renderer only reads it.

use serde::Serialize;

use super::distribution::{position_size_distribution, Bucket};
use super::drawdown::{drawdown_curve, max_drawdown, DrawdownInterval};
use super::markers::{build_markers_with_layout, LabelLayout, MarkerSet};
use super::moving_average::{moving_averages, MovingAverageSeries};
use super::series::{closes, EquityPoint, PricePoint, TradeEvent};
use super::time_index::TimeSeriesIndex;
use super::trade_stats::TradeStats;

pub const DEFAULT_MA_WINDOWS: [usize; 3] = [5, 10, 20];
pub const DEFAULT_BIN_WIDTH: f64 = 10.0;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnalyticsInput {
    pub prices: Vec<PricePoint>,
    pub equity: Vec<EquityPoint>,
    pub trades: Vec<TradeEvent>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnalyticsConfig {
    pub ma_windows: Vec<usize>,
    pub bin_width: f64,
    pub label_layout: LabelLayout,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        AnalyticsConfig {
            ma_windows: DEFAULT_MA_WINDOWS.to_vec(),
            bin_width: DEFAULT_BIN_WIDTH,
            label_layout: LabelLayout::default(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DataQuality {
    pub price_duplicate_dates: usize,
    pub equity_duplicate_dates: usize,
    pub unmatched_price_trades: usize,
    pub unmatched_equity_trades: usize,
}

impl DataQuality {
    pub fn is_clean(&self) -> bool {
        *self == DataQuality::default()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartBundle {
    pub prices: Vec<PricePoint>,
    pub equity: Vec<EquityPoint>,
    pub moving_averages: Vec<MovingAverageSeries>,
    pub price_markers: MarkerSet,
    pub equity_markers: MarkerSet,
    pub drawdown: Option<DrawdownInterval>,
    pub drawdown_curve: Vec<Option<f64>>,
    pub position_sizes: Vec<Bucket>,
    pub stats: TradeStats,
    pub quality: DataQuality,
}

pub fn build_bundle(input: &AnalyticsInput, config: &AnalyticsConfig) -> ChartBundle {
    let price_index = TimeSeriesIndex::build(&input.prices);
    let equity_index = TimeSeriesIndex::build(&input.equity);

    let price_markers = build_markers_with_layout(
        &input.trades,
        &price_index,
        &input.prices,
        &config.label_layout,
    );
    let equity_markers = build_markers_with_layout(
        &input.trades,
        &equity_index,
        &input.equity,
        &config.label_layout,
    );

    let quality = DataQuality {
        price_duplicate_dates: price_index.duplicate_count(),
        equity_duplicate_dates: equity_index.duplicate_count(),
        unmatched_price_trades: price_markers.unmatched.len(),
        unmatched_equity_trades: equity_markers.unmatched.len(),
    };

    ChartBundle {
        prices: input.prices.clone(),
        equity: input.equity.clone(),
        moving_averages: moving_averages(&config.ma_windows, &closes(&input.prices)),
        price_markers,
        equity_markers,
        drawdown: max_drawdown(&input.equity),
        drawdown_curve: drawdown_curve(&input.equity),
        position_sizes: position_size_distribution(&input.trades, config.bin_width),
        stats: TradeStats::compute(&input.trades),
        quality,
    }
}
