use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, Table};
use core_types::{RunResult, TradeFill, TradeSide};
use optimizer::Optimization;
use serde::Serialize;

/// The JSON shape printed by `optimize --json`.
#[derive(Debug, Serialize)]
pub struct OptimizeReport<'a> {
    pub job_id: String,
    pub best_threshold: i64,
    pub best_result: Option<&'a RunResult>,
}

impl<'a> From<&'a Optimization> for OptimizeReport<'a> {
    fn from(optimization: &'a Optimization) -> Self {
        Self {
            job_id: optimization.job_id.to_string(),
            best_threshold: optimization.best_threshold,
            best_result: optimization.best_result.as_ref(),
        }
    }
}

pub fn summary_table(result: &RunResult) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(vec!["Metric", "Value"]);

    let rows = [
        ("Threshold", format!("{}", result.threshold)),
        (
            "Period",
            format!(
                "{} -> {}",
                result.start_time.format("%Y-%m-%d %H:%M"),
                result.end_time.format("%Y-%m-%d %H:%M")
            ),
        ),
        (
            "Price",
            format!("{:.2} -> {:.2}", result.start_price, result.end_price),
        ),
        ("Strategy return", format!("{:.2}%", result.strategy_return_pct)),
        ("Buy & hold return", format!("{:.2}%", result.baseline_return_pct)),
        ("Excess return", format!("{:+.2} pts", result.excess_return_pct())),
        ("Trades", result.num_trades.to_string()),
        (
            "Winning trades",
            format!("{} ({:.1}%)", result.winning_trades, result.win_rate_pct),
        ),
        ("Volatile balance", format!("{:.8}", result.final_volatile_balance)),
        ("Stable balance", format!("{:.2}", result.final_stable_balance)),
        ("Final value", format!("{:.2}", result.final_value)),
    ];

    for (metric, value) in rows {
        table.add_row(vec![Cell::new(metric), Cell::new(value)]);
    }
    table
}

pub fn trades_table(trades: &[TradeFill]) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(vec![
        "Time", "Side", "Price", "Given", "Received", "Platform fee", "Flat fee", "Win",
    ]);

    for trade in trades {
        let (given, received) = match trade.side {
            TradeSide::Buy => (
                format!("{:.2}", trade.amount_in),
                format!("{:.8}", trade.amount_out),
            ),
            TradeSide::Sell => (
                format!("{:.8}", trade.amount_in),
                format!("{:.2}", trade.amount_out),
            ),
        };
        table.add_row(vec![
            Cell::new(trade.timestamp.format("%Y-%m-%d %H:%M")),
            Cell::new(format!("{:?}", trade.side)),
            Cell::new(format!("{:.2}", trade.price)),
            Cell::new(given),
            Cell::new(received),
            Cell::new(format!("{:.4}", trade.platform_fee)),
            Cell::new(format!("{:.8}", trade.flat_fee)),
            Cell::new(if trade.is_win { "yes" } else { "no" }),
        ]);
    }
    table
}

pub fn sweep_table(optimization: &Optimization) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(vec![
        "", "Threshold", "Return", "Excess", "Trades", "Win rate",
    ]);

    for point in &optimization.sweep {
        let marker = if point.threshold == optimization.best_threshold {
            "*"
        } else {
            ""
        };
        let result = &point.result;
        table.add_row(vec![
            Cell::new(marker),
            Cell::new(point.threshold),
            Cell::new(format!("{:.2}%", result.strategy_return_pct)),
            Cell::new(format!("{:+.2}", result.excess_return_pct())),
            Cell::new(result.num_trades),
            Cell::new(format!("{:.1}%", result.win_rate_pct)),
        ]);
    }
    table
}
