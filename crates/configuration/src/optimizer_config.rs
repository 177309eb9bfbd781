use crate::error::ConfigError;
use serde::Deserialize;

/// Defines a threshold sweep. Deserialized from the `[optimizer]` table.
///
/// The default closed range 20..=80 keeps the search away from the
/// degenerate always-in / always-out strategies near 0 and 100.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct OptimizerParams {
    /// First candidate threshold (inclusive).
    pub start: i64,
    /// Last candidate threshold (inclusive).
    pub end: i64,
    pub step: i64,
    /// Returned when no candidate produces a comparable return.
    pub default_threshold: i64,
    /// Run candidates on a rayon pool instead of the calling thread.
    pub parallel: bool,
    /// Size of the rayon pool. `None` uses one thread per logical CPU.
    pub max_threads: Option<usize>,
}

impl Default for OptimizerParams {
    fn default() -> Self {
        Self {
            start: 20,
            end: 80,
            step: 1,
            default_threshold: 50,
            parallel: true,
            max_threads: None,
        }
    }
}

impl OptimizerParams {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.step <= 0 {
            return Err(ConfigError::ValidationError(format!(
                "optimizer.step must be positive, got {}",
                self.step
            )));
        }
        if self.start > self.end {
            return Err(ConfigError::ValidationError(format!(
                "optimizer.start ({}) must not exceed optimizer.end ({})",
                self.start, self.end
            )));
        }
        if self.max_threads == Some(0) {
            return Err(ConfigError::ValidationError(
                "optimizer.max_threads must be at least 1 when set".to_string(),
            ));
        }
        Ok(())
    }
}
