//! Summary statistics over a trade list.
//!
//! Win/loss figures come from sell events (the ones that realize P&L).
//! Sells without a P&L value are counted as closed but excluded from the
//! win/loss split.

use serde::Serialize;

use super::series::TradeEvent;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TradeStats {
    pub buys: usize,
    pub sells: usize,
    pub trades_won: usize,
    pub trades_lost: usize,
    pub trades_breakeven: usize,
    pub win_rate: f64,
    pub total_pnl: f64,
    pub profit_factor: f64,
    pub avg_win: f64,
    pub avg_loss: f64,
    pub largest_win: f64,
    pub largest_loss: f64,
    pub avg_holding_days: f64,
}

impl TradeStats {
    pub fn compute(trades: &[TradeEvent]) -> Self {
        let mut stats = TradeStats::default();
        let mut total_wins = 0.0_f64;
        let mut total_losses = 0.0_f64;
        let mut holding_total = 0i64;
        let mut holding_count = 0usize;

        for trade in trades {
            if trade.is_buy() {
                stats.buys += 1;
                continue;
            }
            stats.sells += 1;

            if let Some(days) = trade.holding_days {
                holding_total += days;
                holding_count += 1;
            }

            let pnl = match trade.pnl.filter(|p| p.is_finite()) {
                Some(p) => p,
                None => continue,
            };
            stats.total_pnl += pnl;
            if pnl > 0.0 {
                stats.trades_won += 1;
                total_wins += pnl;
                stats.largest_win = stats.largest_win.max(pnl);
            } else if pnl < 0.0 {
                stats.trades_lost += 1;
                total_losses += pnl.abs();
                stats.largest_loss = stats.largest_loss.max(pnl.abs());
            } else {
                stats.trades_breakeven += 1;
            }
        }

        let decided = stats.trades_won + stats.trades_lost + stats.trades_breakeven;
        if decided > 0 {
            stats.win_rate = stats.trades_won as f64 / decided as f64;
        }

        stats.profit_factor = if total_losses > 0.0 {
            total_wins / total_losses
        } else if total_wins > 0.0 {
            f64::INFINITY
        } else {
            0.0
        };

        if stats.trades_won > 0 {
            stats.avg_win = total_wins / stats.trades_won as f64;
        }
        if stats.trades_lost > 0 {
            stats.avg_loss = total_losses / stats.trades_lost as f64;
        }
        if holding_count > 0 {
            stats.avg_holding_days = holding_total as f64 / holding_count as f64;
        }

        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::date_key::DateKey;
    use crate::domain::series::TradeAction;

    fn sell(pnl: Option<f64>, days: Option<i64>) -> TradeEvent {
        TradeEvent {
            pnl,
            holding_days: days,
            ..TradeEvent::new(DateKey::normalize("2024-01-05"), TradeAction::Sell, 10.0, 100)
        }
    }

    fn buy() -> TradeEvent {
        TradeEvent::new(DateKey::normalize("2024-01-01"), TradeAction::Buy, 10.0, 100)
    }

    #[test]
    fn stats_empty() {
        let stats = TradeStats::compute(&[]);
        assert_eq!(stats, TradeStats::default());
    }

    #[test]
    fn stats_wins_losses_breakeven() {
        let trades = vec![
            buy(),
            sell(Some(100.0), Some(5)),
            buy(),
            sell(Some(-50.0), Some(3)),
            buy(),
            sell(Some(200.0), Some(10)),
            sell(Some(0.0), None),
        ];
        let stats = TradeStats::compute(&trades);

        assert_eq!(stats.buys, 3);
        assert_eq!(stats.sells, 4);
        assert_eq!(stats.trades_won, 2);
        assert_eq!(stats.trades_lost, 1);
        assert_eq!(stats.trades_breakeven, 1);
        assert!((stats.win_rate - 0.5).abs() < f64::EPSILON);
        assert!((stats.total_pnl - 250.0).abs() < 1e-9);
        assert!((stats.profit_factor - 6.0).abs() < 1e-9);
        assert!((stats.avg_win - 150.0).abs() < 1e-9);
        assert!((stats.avg_loss - 50.0).abs() < 1e-9);
        assert!((stats.largest_win - 200.0).abs() < 1e-9);
        assert!((stats.largest_loss - 50.0).abs() < 1e-9);
        assert!((stats.avg_holding_days - 6.0).abs() < 1e-9);
    }

    #[test]
    fn stats_missing_pnl_not_counted_as_win_or_loss() {
        let stats = TradeStats::compute(&[sell(None, Some(2)), sell(Some(f64::NAN), None)]);
        assert_eq!(stats.sells, 2);
        assert_eq!(stats.trades_won + stats.trades_lost + stats.trades_breakeven, 0);
        assert!((stats.win_rate - 0.0).abs() < f64::EPSILON);
        assert!((stats.avg_holding_days - 2.0).abs() < 1e-9);
    }

    #[test]
    fn stats_only_wins_has_infinite_profit_factor() {
        let stats = TradeStats::compute(&[sell(Some(10.0), None)]);
        assert!(stats.profit_factor.is_infinite());
    }
}
