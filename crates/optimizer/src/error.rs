use backtester::error::BacktestError;
use core_types::CoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum OptimizerError {
    #[error("Sample data rejected: {0}")]
    Core(#[from] CoreError),

    #[error("Backtester setup failed: {0}")]
    Backtest(#[from] BacktestError),

    #[error("Parameter generation failed: {0}")]
    ParameterGeneration(String),

    #[error("Failed to build the worker thread pool: {0}")]
    ThreadPool(String),
}
