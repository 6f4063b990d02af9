//! Simple moving average over closing prices.
//!
//! Each window is summed afresh over its *valid* closes only (finite and
//! > 0). Invalid closes are skipped, not zero-filled, so one bad tick shrinks
//! the divisor instead of dragging the average down, and nothing it did
//! survives once it leaves the window. Warmup: the first `window - 1`
//! outputs are `None`.

use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MovingAverageSeries {
    pub window: usize,
    pub values: Vec<Option<f64>>,
}

impl MovingAverageSeries {
    pub fn label(&self) -> String {
        format!("MA{}", self.window)
    }

    /// Number of leading `None` entries.
    pub fn warmup_len(&self) -> usize {
        self.values.iter().take_while(|v| v.is_none()).count()
    }
}

impl fmt::Display for MovingAverageSeries {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MA{}", self.window)
    }
}

fn is_valid_close(close: f64) -> bool {
    close.is_finite() && close > 0.0
}

fn round2(v: f64) -> f64 {
    let scaled = v * 100.0;
    if scaled.is_finite() {
        scaled.round() / 100.0
    } else {
        v
    }
}

/// Output has the same length as `closes`; `None` is "no value", never 0.
pub fn moving_average(window: usize, closes: &[f64]) -> Vec<Option<f64>> {
    if window == 0 {
        return vec![None; closes.len()];
    }

    (0..closes.len())
        .map(|i| {
            if i + 1 < window {
                return None;
            }
            let slice = &closes[i + 1 - window..=i];
            let (sum, count) = slice
                .iter()
                .filter(|&&c| is_valid_close(c))
                .fold((0.0_f64, 0usize), |(s, n), &c| (s + c, n + 1));
            if count == 0 {
                return None;
            }
            // mean of two f64::MAX overflows the sum, not the average
            let mean = if sum.is_finite() {
                sum / count as f64
            } else {
                slice
                    .iter()
                    .filter(|&&c| is_valid_close(c))
                    .fold(0.0_f64, |acc, &c| acc + c / count as f64)
            };
            Some(round2(mean))
        })
        .collect()
}

pub fn moving_average_series(window: usize, closes: &[f64]) -> MovingAverageSeries {
    MovingAverageSeries {
        window,
        values: moving_average(window, closes),
    }
}

pub fn moving_averages(windows: &[usize], closes: &[f64]) -> Vec<MovingAverageSeries> {
    windows
        .iter()
        .map(|&w| moving_average_series(w, closes))
        .collect()
}
