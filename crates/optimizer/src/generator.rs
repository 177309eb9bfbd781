use crate::error::OptimizerError;
use configuration::OptimizerParams;

/// Expands the configured range into the ascending list of integer thresholds to test.
///
/// Both ends are inclusive when `end` lands on a step.
pub fn candidate_thresholds(params: &OptimizerParams) -> Result<Vec<i64>, OptimizerError> {
    if params.step <= 0 {
        return Err(OptimizerError::ParameterGeneration(format!(
            "Step for 'threshold' must be positive, got {}.",
            params.step
        )));
    }
    if params.start > params.end {
        return Err(OptimizerError::ParameterGeneration(format!(
            "Threshold range start {} is after end {}.",
            params.start, params.end
        )));
    }

    Ok((params.start..=params.end)
        .step_by(params.step as usize)
        .collect())
}
