//! Ledger statistics over closed trades.

use super::trade::Trade;

#[derive(Debug, Clone, PartialEq)]
pub struct LedgerSummary {
    pub total_trades: usize,
    pub trades_won: usize,
    pub trades_lost: usize,
    pub trades_breakeven: usize,
    pub win_rate: f64,
    /// Dollars before commission.
    pub gross_profit: f64,
    pub total_commission: f64,
    /// Dollars after commission.
    pub net_profit: f64,
    pub profit_factor: f64,
    pub largest_win: f64,
    pub largest_loss: f64,
    pub avg_trade_minutes: f64,
    /// Points given up between ideal and actual fills.
    pub total_slippage: f64,
}

impl LedgerSummary {
    pub fn compute(trades: &[Trade]) -> Self {
        let mut trades_won = 0usize;
        let mut trades_lost = 0usize;
        let mut trades_breakeven = 0usize;
        let mut total_wins = 0.0_f64;
        let mut total_losses = 0.0_f64;
        let mut largest_win = 0.0_f64;
        let mut largest_loss = 0.0_f64;
        let mut gross_profit = 0.0_f64;
        let mut total_commission = 0.0_f64;
        let mut total_minutes = 0i64;
        let mut total_slippage = 0.0_f64;

        for trade in trades {
            let pnl = trade.actual_profit_dollar();
            if pnl > 0.0 {
                trades_won += 1;
                total_wins += pnl;
                largest_win = largest_win.max(pnl);
            } else if pnl < 0.0 {
                trades_lost += 1;
                total_losses += pnl.abs();
                largest_loss = largest_loss.max(pnl.abs());
            } else {
                trades_breakeven += 1;
            }

            gross_profit += trade.actual_profit() * trade.point_value;
            total_commission += trade.commission;
            total_minutes += (trade.exit_time - trade.entry_time).num_minutes();
            total_slippage += trade.slippage() * f64::from(trade.size);
        }

        let total_trades = trades.len();
        let win_rate = if total_trades > 0 {
            trades_won as f64 / total_trades as f64
        } else {
            0.0
        };

        let profit_factor = if total_losses > 0.0 {
            total_wins / total_losses
        } else if total_wins > 0.0 {
            f64::INFINITY
        } else {
            0.0
        };

        let avg_trade_minutes = if total_trades > 0 {
            total_minutes as f64 / total_trades as f64
        } else {
            0.0
        };

        LedgerSummary {
            total_trades,
            trades_won,
            trades_lost,
            trades_breakeven,
            win_rate,
            gross_profit,
            total_commission,
            net_profit: gross_profit - total_commission,
            profit_factor,
            largest_win,
            largest_loss,
            avg_trade_minutes,
            total_slippage,
        }
    }
}
