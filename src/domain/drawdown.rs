//! Maximum drawdown interval of an equity curve.
//!
//! Single forward pass tracking the running peak. Each decline is measured
//! against the most recent running maximum, which is always the relevant
//! peak for the largest single peak-to-trough drop.

use serde::Serialize;

use super::date_key::DateKey;
use super::series::EquityPoint;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DrawdownInterval {
    pub start_index: usize,
    pub end_index: usize,
    pub peak_value: f64,
    pub trough_value: f64,
    pub magnitude_pct: f64,
    pub start_date: DateKey,
    pub end_date: DateKey,
    /// Calendar days from peak to trough; `None` if either key is not a real date.
    pub duration_days: Option<i64>,
}

/// `None` for fewer than two points or a curve that never declines.
/// Non-finite points are skipped and a peak must be positive to anchor a
/// drawdown.
pub fn max_drawdown(equity: &[EquityPoint]) -> Option<DrawdownInterval> {
    if equity.len() < 2 {
        return None;
    }

    let mut running_peak = f64::NAN;
    let mut peak_index = 0usize;
    let mut best: Option<(usize, usize, f64, f64, f64)> = None;

    for (i, point) in equity.iter().enumerate() {
        let value = point.equity;
        if !value.is_finite() {
            continue;
        }
        if running_peak.is_nan() || value > running_peak {
            running_peak = value;
            peak_index = i;
            continue;
        }
        if running_peak <= 0.0 {
            continue;
        }

        let dd_pct = (running_peak - value) / running_peak * 100.0;
        let improves = match best {
            Some((_, _, _, _, best_pct)) => dd_pct > best_pct,
            None => dd_pct > 0.0,
        };
        if improves {
            best = Some((peak_index, i, running_peak, value, dd_pct));
        }
    }

    best.map(|(start, end, peak, trough, pct)| {
        let start_date = equity[start].date.clone();
        let end_date = equity[end].date.clone();
        let duration_days = match (start_date.as_naive_date(), end_date.as_naive_date()) {
            (Some(s), Some(e)) => Some((e - s).num_days()),
            _ => None,
        };
        DrawdownInterval {
            start_index: start,
            end_index: end,
            peak_value: peak,
            trough_value: trough,
            magnitude_pct: pct,
            start_date,
            end_date,
            duration_days,
        }
    })
}

/// Per-index percentage below the running peak (0 at a new high).
/// `None` for non-finite points and for points before any positive peak.
pub fn drawdown_curve(equity: &[EquityPoint]) -> Vec<Option<f64>> {
    let mut running_peak = f64::NAN;

    equity
        .iter()
        .map(|point| {
            let value = point.equity;
            if !value.is_finite() {
                return None;
            }
            if running_peak.is_nan() || value > running_peak {
                running_peak = value;
            }
            if running_peak > 0.0 {
                Some((running_peak - value) / running_peak * 100.0)
            } else {
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;

    fn make_equity_curve(values: &[f64]) -> Vec<EquityPoint> {
        values
            .iter()
            .enumerate()
            .map(|(i, &v)| EquityPoint {
                date: DateKey::from(
                    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + chrono::Duration::days(i as i64),
                ),
                equity: v,
            })
            .collect()
    }

    #[test]
    fn drawdown_peak_to_trough() {
        let curve = make_equity_curve(&[100.0, 120.0, 90.0, 80.0, 130.0]);
        let dd = max_drawdown(&curve).unwrap();

        assert_eq!(dd.start_index, 1);
        assert_eq!(dd.end_index, 3);
        assert_relative_eq!(dd.peak_value, 120.0);
        assert_relative_eq!(dd.trough_value, 80.0);
        assert_relative_eq!(dd.magnitude_pct, 100.0 / 3.0, epsilon = 1e-9);
        assert_eq!(dd.start_date.as_str(), "2024-01-02");
        assert_eq!(dd.end_date.as_str(), "2024-01-04");
        assert_eq!(dd.duration_days, Some(2));
    }

    #[test]
    fn later_deeper_drawdown_wins() {
        let curve = make_equity_curve(&[100.0, 90.0, 150.0, 100.0, 160.0]);
        let dd = max_drawdown(&curve).unwrap();

        assert_eq!(dd.start_index, 2);
        assert_eq!(dd.end_index, 3);
        assert_relative_eq!(dd.magnitude_pct, 50.0 / 150.0 * 100.0, epsilon = 1e-9);
    }

    #[test]
    fn fewer_than_two_points_is_none() {
        assert!(max_drawdown(&[]).is_none());
        assert!(max_drawdown(&make_equity_curve(&[100.0])).is_none());
    }

    #[test]
    fn monotonic_rise_is_none() {
        assert!(max_drawdown(&make_equity_curve(&[100.0, 101.0, 105.0])).is_none());
    }

    #[test]
    fn flat_curve_is_none() {
        assert!(max_drawdown(&make_equity_curve(&[100.0, 100.0, 100.0])).is_none());
    }

    #[test]
    fn nan_points_are_skipped() {
        let curve = make_equity_curve(&[f64::NAN, 100.0, f64::NAN, 75.0, 90.0]);
        let dd = max_drawdown(&curve).unwrap();

        assert_eq!(dd.start_index, 1);
        assert_eq!(dd.end_index, 3);
        assert_relative_eq!(dd.magnitude_pct, 25.0, epsilon = 1e-9);
    }

    #[test]
    fn non_positive_peak_never_anchors() {
        let curve = make_equity_curve(&[0.0, -10.0, -20.0]);
        assert!(max_drawdown(&curve).is_none());
    }

    #[test]
    fn duration_none_for_non_calendar_keys() {
        let curve = vec![
            EquityPoint {
                date: DateKey::normalize("day-one"),
                equity: 100.0,
            },
            EquityPoint {
                date: DateKey::normalize("day-two"),
                equity: 50.0,
            },
        ];
        let dd = max_drawdown(&curve).unwrap();
        assert_eq!(dd.duration_days, None);
    }

    #[test]
    fn curve_tracks_underwater_percentage() {
        let curve = make_equity_curve(&[100.0, 120.0, 90.0, f64::NAN, 130.0]);
        let dd = drawdown_curve(&curve);

        assert_eq!(dd.len(), 5);
        assert_relative_eq!(dd[0].unwrap(), 0.0);
        assert_relative_eq!(dd[1].unwrap(), 0.0);
        assert_relative_eq!(dd[2].unwrap(), 25.0, epsilon = 1e-9);
        assert_eq!(dd[3], None);
        assert_relative_eq!(dd[4].unwrap(), 0.0);
    }
}
