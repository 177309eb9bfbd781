use crate::error::BacktestError;
use crate::portfolio::PortfolioState;
use configuration::SimulationParams;
use core_types::{RunResult, Sample, SampleSeries};

pub mod error;
pub mod portfolio;

/// Threshold used when the caller has no preference.
pub const DEFAULT_THRESHOLD: f64 = 50.0;

/// Replays a sample series under the sentiment threshold rule.
///
/// The backtester holds only its parameters. Every run builds its own
/// `PortfolioState`, so one instance can be shared across threads and
/// reused for any number of thresholds.
#[derive(Debug, Clone, Default)]
pub struct Backtester {
    params: SimulationParams,
}

impl Backtester {
    /// Rejects parameters that would turn the return calculations into NaN,
    /// such as zero capital or a non-finite fee.
    pub fn new(params: SimulationParams) -> Result<Self, BacktestError> {
        params
            .validate()
            .map_err(|e| BacktestError::Config(e.to_string()))?;
        Ok(Self { params })
    }

    pub fn params(&self) -> &SimulationParams {
        &self.params
    }

    /// Validates and orders `samples`, then runs the simulation.
    pub fn run(&self, samples: &[Sample], threshold: f64) -> Result<RunResult, BacktestError> {
        let series = SampleSeries::new(samples)?;
        Ok(self.run_series(&series, threshold))
    }

    /// Runs the simulation over an already validated series.
    ///
    /// At sentiment >= `threshold` the stable balance is moved into the
    /// volatile asset; below it, the volatile balance above the reserve is
    /// moved into the stable asset. At most one conversion happens per sample,
    /// and the first sample only sets the opening allocation.
    pub fn run_series(&self, series: &SampleSeries, threshold: f64) -> RunResult {
        let opening = series.first();
        let closing = series.last();
        let initial_capital = self.params.initial_capital;
        let initial_volatile = initial_capital / opening.price;

        let mut portfolio = PortfolioState::new(initial_capital, opening.price);
        let mut trades = Vec::new();

        for sample in series.iter().skip(1) {
            let fill = if sample.sentiment >= threshold {
                portfolio.buy_all(sample, &self.params)
            } else if sample.sentiment < threshold {
                portfolio.sell_excess(sample, &self.params)
            } else {
                // NaN sentiment or threshold: neither side applies.
                None
            };

            if let Some(fill) = fill {
                tracing::debug!(
                    side = ?fill.side,
                    price = fill.price,
                    sentiment = sample.sentiment,
                    threshold,
                    win = fill.is_win,
                    "rebalanced"
                );
                trades.push(fill);
            }
        }

        let final_value = portfolio.value_at(closing.price);
        let strategy_return_pct = percent_change(initial_capital, final_value);
        let baseline_return_pct = percent_change(initial_capital, initial_volatile * closing.price);

        let num_trades = trades.len();
        let winning_trades = trades.iter().filter(|t| t.is_win).count();
        let win_rate_pct = if num_trades > 0 {
            winning_trades as f64 / num_trades as f64 * 100.0
        } else {
            0.0
        };

        tracing::debug!(
            threshold,
            num_trades,
            winning_trades,
            strategy_return_pct,
            baseline_return_pct,
            "simulation finished"
        );

        RunResult {
            start_time: opening.timestamp,
            end_time: closing.timestamp,
            start_price: opening.price,
            end_price: closing.price,
            baseline_return_pct,
            strategy_return_pct,
            num_trades,
            winning_trades,
            win_rate_pct,
            threshold,
            final_volatile_balance: portfolio.volatile_balance,
            final_stable_balance: portfolio.stable_balance,
            final_value,
            trades,
        }
    }
}

/// Simulates `samples` at `threshold` with the default fee, reserve and capital settings.
pub fn simulate(samples: &[Sample], threshold: f64) -> Result<RunResult, BacktestError> {
    Backtester::default().run(samples, threshold)
}

fn percent_change(from: f64, to: f64) -> f64 {
    (to - from) / from * 100.0
}
