use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Sample {index} has a non-positive or non-finite price: {price}")]
    NonPositivePrice { index: usize, price: f64 },
}
