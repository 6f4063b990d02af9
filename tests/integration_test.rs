//! Integration tests for the analytics pipeline.
//!
//! Tests cover:
//! - End-to-end bundle over a 30-day rise-then-fall series
//! - Heterogeneous date encodings across prices, equity and trades
//! - Duplicate dates and unmatched trades surfacing in data quality
//! - JSON payload → bundle through the data port

mod common;

use approx::assert_relative_eq;
use common::*;
use tradelens::adapters::json_adapter::JsonAdapter;
use tradelens::domain::bundle::{build_bundle, AnalyticsConfig, AnalyticsInput};
use tradelens::domain::markers::{MarkerColor, UnmatchReason};
use tradelens::ports::data_port::DataPort;

fn scenario_input() -> AnalyticsInput {
    let closes = rising_then_falling_closes();
    AnalyticsInput {
        prices: generate_bars(&closes),
        equity: equity_from_closes(&closes),
        trades: vec![
            make_trade("2024-01-03T09:30:00", TradeAction::Buy, 104.0, None),
            make_trade("2024-01-10 15:59:00", TradeAction::Sell, 118.0, Some(1400.0)),
            make_trade("2024-01-16", TradeAction::Buy, 125.0, None),
            make_trade("2024-01-25T16:00:00Z", TradeAction::Sell, 98.0, Some(-2700.0)),
        ],
    }
}

mod end_to_end {
    use super::*;

    #[test]
    fn moving_average_warmup_lengths() {
        let config = AnalyticsConfig {
            ma_windows: vec![5, 10],
            ..AnalyticsConfig::default()
        };
        let bundle = build_bundle(&scenario_input(), &config);

        assert_eq!(bundle.moving_averages.len(), 2);
        let ma5 = &bundle.moving_averages[0];
        let ma10 = &bundle.moving_averages[1];
        assert_eq!(ma5.values.len(), 30);
        assert_eq!(ma10.values.len(), 30);
        assert_eq!(ma5.warmup_len(), 4);
        assert_eq!(ma10.warmup_len(), 9);
        assert!(ma5.values[4..].iter().all(Option::is_some));
        // closes 100..108 step 2 → mean 104
        assert_relative_eq!(ma5.values[4].unwrap(), 104.0);
    }

    #[test]
    fn markers_fully_aligned() {
        let bundle = build_bundle(&scenario_input(), &AnalyticsConfig::default());
        let markers = &bundle.price_markers;

        assert_eq!(markers.buy.len(), 2);
        assert_eq!(markers.sell.len(), 2);
        assert!(markers.unmatched.is_empty());
        assert_eq!(markers.buy[0].index, 2);
        assert_eq!(markers.sell[0].index, 9);
        assert_eq!(markers.buy[1].index, 15);
        assert_eq!(markers.sell[1].index, 24);
        assert_eq!(markers.sell[0].color, MarkerColor::Gain);
        assert_eq!(markers.sell[1].color, MarkerColor::Loss);

        assert_eq!(bundle.equity_markers.total(), 4);
        assert!(bundle.equity_markers.unmatched.is_empty());
        assert!(bundle.quality.is_clean());
    }

    #[test]
    fn drawdown_spans_the_decline() {
        let bundle = build_bundle(&scenario_input(), &AnalyticsConfig::default());
        let dd = bundle.drawdown.expect("declining curve has a drawdown");

        assert_eq!(dd.start_index, 14);
        assert_eq!(dd.end_index, 29);
        assert_relative_eq!(dd.peak_value, 12_800.0);
        assert_relative_eq!(dd.trough_value, 8_300.0);
        assert_relative_eq!(dd.magnitude_pct, 4_500.0 / 12_800.0 * 100.0, epsilon = 1e-9);
        assert_eq!(dd.start_date.as_str(), "2024-01-15");
        assert_eq!(dd.duration_days, Some(15));

        assert_eq!(bundle.drawdown_curve.len(), 30);
        assert_relative_eq!(bundle.drawdown_curve[14].unwrap(), 0.0);
    }

    #[test]
    fn stats_reflect_round_trips() {
        let bundle = build_bundle(&scenario_input(), &AnalyticsConfig::default());

        assert_eq!(bundle.stats.buys, 2);
        assert_eq!(bundle.stats.sells, 2);
        assert_eq!(bundle.stats.trades_won, 1);
        assert_eq!(bundle.stats.trades_lost, 1);
        assert_relative_eq!(bundle.stats.total_pnl, -1300.0);
    }
}

mod data_quality {
    use super::*;

    #[test]
    fn unmatched_trades_are_reported_not_dropped() {
        let mut input = scenario_input();
        input
            .trades
            .push(make_trade("2024-03-01", TradeAction::Buy, 90.0, None));
        input
            .trades
            .push(make_trade("2024-01-05", TradeAction::Buy, 0.0, None));

        let bundle = build_bundle(&input, &AnalyticsConfig::default());
        let markers = &bundle.price_markers;

        assert_eq!(markers.total(), input.trades.len());
        assert_eq!(markers.unmatched.len(), 2);
        assert_eq!(markers.unmatched[0].reason, UnmatchReason::DateNotFound);
        assert_eq!(markers.unmatched[1].reason, UnmatchReason::InvalidPrice);
        assert_eq!(bundle.quality.unmatched_price_trades, 2);
    }

    #[test]
    fn duplicate_price_dates_keep_first() {
        let mut input = scenario_input();
        input.prices.insert(3, make_bar("2024-01-03 16:00:00", 999.0));

        let bundle = build_bundle(&input, &AnalyticsConfig::default());

        assert_eq!(bundle.quality.price_duplicate_dates, 1);
        assert_eq!(bundle.price_markers.buy[0].index, 2);
    }

    #[test]
    fn bad_closes_do_not_zero_the_average() {
        let mut input = scenario_input();
        input.prices[6].close = f64::NAN;

        let config = AnalyticsConfig {
            ma_windows: vec![3],
            ..AnalyticsConfig::default()
        };
        let bundle = build_bundle(&input, &config);
        let ma3 = &bundle.moving_averages[0];

        // window [110, NaN, 114] → mean of the two valid closes
        assert_relative_eq!(ma3.values[7].unwrap(), 112.0);
    }
}

mod json_pipeline {
    use super::*;

    #[test]
    fn service_payload_to_bundle() {
        let payload = serde_json::json!({
            "prices": [
                {"date": "2024-01-01T00:00:00", "open": 10, "high": 11, "low": 9, "close": "10", "volume": 100},
                {"date": "2024-01-02 00:00:00", "open": 10, "high": 12, "low": 9, "close": 11, "volume": 100},
                {"date": "2024-01-03", "open": 11, "high": 13, "low": 10, "close": "bad", "volume": 100},
                {"date": "2024-01-04", "open": 12, "high": 14, "low": 11, "close": 13, "volume": 100}
            ],
            "equity": [
                {"date": "2024-01-01", "equity": 1000},
                {"date": "2024-01-02", "equity": 1100},
                {"date": "2024-01-03", "equity": "990"},
                {"date": "2024-01-04", "equity": 1050}
            ],
            "trades": [
                {"date": "2024-01-02T10:00:00", "action": "BUY", "price": "11", "shares": 50,
                 "before_cash": 1000, "after_cash": 450},
                {"date": "2024-01-02 15:00:00", "action": "SELL", "price": 11.5, "shares": 50,
                 "profit": 25, "profit_percent": 4.5, "holding_days": 0, "trigger_reason": "scalp"}
            ]
        });
        let adapter = JsonAdapter::from_string(&payload.to_string()).unwrap();
        let input = adapter.fetch_run().unwrap();

        let config = AnalyticsConfig {
            ma_windows: vec![2],
            ..AnalyticsConfig::default()
        };
        let bundle = build_bundle(&input, &config);

        let ma2 = &bundle.moving_averages[0].values;
        assert_eq!(ma2[0], None);
        assert_eq!(ma2[1], Some(10.5));
        assert_eq!(ma2[2], Some(11.0));
        assert_eq!(ma2[3], Some(13.0));

        let markers = &bundle.price_markers;
        assert_eq!(markers.buy.len(), 1);
        assert_eq!(markers.sell.len(), 1);
        assert!(markers.sell[0].label_y > markers.buy[0].label_y);

        let dd = bundle.drawdown.unwrap();
        assert_eq!((dd.start_index, dd.end_index), (1, 2));
        assert_relative_eq!(dd.magnitude_pct, 10.0, epsilon = 1e-9);

        assert_eq!(bundle.position_sizes.len(), 1);
        assert_eq!(bundle.position_sizes[0].label, "50-60%");
    }
}
