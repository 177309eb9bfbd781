use crate::enums::TradeSide;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The receipt for one executed rebalancing conversion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeFill {
    pub timestamp: DateTime<Utc>,
    pub side: TradeSide,
    pub price: f64,
    /// Amount given up: stable units for a buy, volatile units for a sell.
    pub amount_in: f64,
    /// Net amount received after all fees: volatile units for a buy, stable units for a sell.
    pub amount_out: f64,
    /// Proportional platform fee, in stable units on both sides.
    pub platform_fee: f64,
    /// Flat transaction fee, always in volatile units.
    pub flat_fee: f64,
    pub is_win: bool,
}

/// The outcome of a single simulation run.
///
/// Produced once per run and owned by the caller. All percentages are in
/// percent (`12.5` means 12.5%), unrounded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunResult {
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub start_price: f64,
    pub end_price: f64,

    /// Return of holding the initial volatile allocation without trading.
    pub baseline_return_pct: f64,
    pub strategy_return_pct: f64,

    pub num_trades: usize,
    pub winning_trades: usize,
    /// `0.0` when no trades were executed.
    pub win_rate_pct: f64,

    pub threshold: f64,

    pub final_volatile_balance: f64,
    pub final_stable_balance: f64,
    /// Total ending value in stable-asset units.
    pub final_value: f64,

    pub trades: Vec<TradeFill>,
}

impl RunResult {
    /// Difference between the strategy and buy-and-hold returns, in percentage points.
    pub fn excess_return_pct(&self) -> f64 {
        self.strategy_return_pct - self.baseline_return_pct
    }
}
