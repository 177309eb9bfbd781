use core_types::CoreError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum BacktestError {
    #[error("Sample data rejected: {0}")]
    Core(#[from] CoreError),

    #[error("Invalid simulation parameters: {0}")]
    Config(String),
}
