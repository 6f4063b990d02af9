//! Fixed-width percentage histograms.

use serde::Serialize;
use std::collections::BTreeMap;

use super::series::TradeEvent;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bucket {
    pub label: String,
    pub count: usize,
}

/// Bin indices beyond this are clamped into open-ended edge bins; past 2^53
/// an f64 quotient no longer tells neighbouring bins apart.
const SLOT_LIMIT: i64 = 1 << 53;

/// Bins keyed by `floor(value / bin_width)`, emitted in ascending order,
/// empty bins omitted. Non-finite values are not binned. A bin width that
/// is not a positive finite number yields no buckets.
pub fn bucketize(values: &[f64], bin_width: f64) -> Vec<Bucket> {
    if !(bin_width.is_finite() && bin_width > 0.0) {
        return Vec::new();
    }

    let limit = SLOT_LIMIT as f64;
    let mut bins: BTreeMap<i64, usize> = BTreeMap::new();
    for &value in values.iter().filter(|v| v.is_finite()) {
        let slot = (value / bin_width).floor().clamp(-limit, limit) as i64;
        *bins.entry(slot).or_insert(0) += 1;
    }

    bins.into_iter()
        .map(|(slot, count)| Bucket {
            label: bucket_label(slot, bin_width),
            count,
        })
        .collect()
}

fn bucket_label(slot: i64, bin_width: f64) -> String {
    let lower = slot as f64 * bin_width;
    let upper = (slot + 1) as f64 * bin_width;
    match slot {
        SLOT_LIMIT => format!(">={}%", format_bound(lower)),
        s if s == -SLOT_LIMIT => format!("<{}%", format_bound(upper)),
        _ => format!("{}-{}%", format_bound(lower), format_bound(upper)),
    }
}

/// At most six decimals, trailing zeros trimmed: `0.30000000000000004` -> `0.3`.
fn format_bound(value: f64) -> String {
    let text = format!("{:.6}", value);
    let text = text.trim_end_matches('0').trim_end_matches('.');
    match text {
        "-0" | "" => "0".to_string(),
        other => other.to_string(),
    }
}

/// Buy notional as a percentage of the cash available before the trade.
pub fn position_size_pct(trade: &TradeEvent) -> Option<f64> {
    if !trade.is_buy() || trade.shares <= 0 {
        return None;
    }
    let cash = trade.before_cash.filter(|c| c.is_finite() && *c > 0.0)?;
    let pct = trade.price * trade.shares as f64 / cash * 100.0;
    pct.is_finite().then_some(pct)
}

pub fn position_size_distribution(trades: &[TradeEvent], bin_width: f64) -> Vec<Bucket> {
    let sizes: Vec<f64> = trades.iter().filter_map(position_size_pct).collect();
    bucketize(&sizes, bin_width)
}
