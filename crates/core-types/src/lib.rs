pub mod enums;
pub mod error;
pub mod result;
pub mod sample;

// Re-export the core types to provide a clean public API.
pub use enums::TradeSide;
pub use error::CoreError;
pub use result::{RunResult, TradeFill};
pub use sample::{Sample, SampleSeries};
