use crate::error::OptimizerError;
use crate::generator::candidate_thresholds;
use backtester::Backtester;
use configuration::{OptimizerParams, SimulationParams};
use core_types::{RunResult, Sample, SampleSeries};
use rayon::prelude::*;
use uuid::Uuid;

pub mod error;
pub mod generator;

/// One candidate threshold and the run it produced.
#[derive(Debug, Clone, PartialEq)]
pub struct SweepPoint {
    pub threshold: i64,
    pub result: RunResult,
}

/// The outcome of a full threshold sweep.
#[derive(Debug, Clone)]
pub struct Optimization {
    pub job_id: Uuid,
    pub best_threshold: i64,
    /// `None` only if no candidate beat the default incumbent's return of -inf.
    pub best_result: Option<RunResult>,
    /// Every candidate, in ascending threshold order.
    pub sweep: Vec<SweepPoint>,
}

/// Brute-force search for the sentiment threshold with the highest strategy return.
///
/// The return surface is not assumed smooth or monotonic, so every candidate
/// in the configured range is simulated.
#[derive(Debug, Clone)]
pub struct Optimizer {
    job_id: Uuid,
    backtester: Backtester,
    params: OptimizerParams,
}

impl Default for Optimizer {
    fn default() -> Self {
        Self {
            job_id: Uuid::new_v4(),
            backtester: Backtester::default(),
            params: OptimizerParams::default(),
        }
    }
}

impl Optimizer {
    /// Fails when `simulation` holds values the backtester cannot run with.
    /// Range problems in `params` surface from `optimize`.
    pub fn new(
        simulation: SimulationParams,
        params: OptimizerParams,
    ) -> Result<Self, OptimizerError> {
        Ok(Self {
            job_id: Uuid::new_v4(),
            backtester: Backtester::new(simulation)?,
            params,
        })
    }

    pub fn job_id(&self) -> Uuid {
        self.job_id
    }

    /// Simulates every candidate threshold and picks the best one.
    ///
    /// Ties go to the lowest threshold: the incumbent is only replaced on a
    /// strict improvement while scanning in ascending order. The parallel path
    /// collects results in candidate order before reducing, so it picks the
    /// same winner as the sequential one.
    pub fn optimize(&self, samples: &[Sample]) -> Result<Optimization, OptimizerError> {
        let candidates = candidate_thresholds(&self.params)?;
        let series = SampleSeries::new(samples)?;

        let sweep = if self.params.parallel {
            let threads = self.params.max_threads.unwrap_or_else(num_cpus::get);
            tracing::info!(
                job_id = %self.job_id,
                candidates = candidates.len(),
                samples = series.len(),
                threads,
                "starting threshold sweep"
            );
            self.sweep_parallel(&series, &candidates, threads)?
        } else {
            tracing::info!(
                job_id = %self.job_id,
                candidates = candidates.len(),
                samples = series.len(),
                "starting threshold sweep on the calling thread"
            );
            candidates
                .iter()
                .map(|&threshold| self.evaluate(&series, threshold))
                .collect()
        };

        let (best_threshold, best_result) = select_best(&sweep, self.params.default_threshold);

        match best_result {
            Some(result) => tracing::info!(
                job_id = %self.job_id,
                best_threshold,
                strategy_return_pct = result.strategy_return_pct,
                baseline_return_pct = result.baseline_return_pct,
                "threshold sweep complete"
            ),
            None => tracing::warn!(
                job_id = %self.job_id,
                best_threshold,
                "no candidate produced a comparable return; keeping the default threshold"
            ),
        }

        Ok(Optimization {
            job_id: self.job_id,
            best_threshold,
            best_result: best_result.cloned(),
            sweep,
        })
    }

    fn sweep_parallel(
        &self,
        series: &SampleSeries,
        candidates: &[i64],
        threads: usize,
    ) -> Result<Vec<SweepPoint>, OptimizerError> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build()
            .map_err(|e| OptimizerError::ThreadPool(e.to_string()))?;

        Ok(pool.install(|| {
            candidates
                .par_iter()
                .map(|&threshold| self.evaluate(series, threshold))
                .collect()
        }))
    }

    fn evaluate(&self, series: &SampleSeries, threshold: i64) -> SweepPoint {
        SweepPoint {
            threshold,
            result: self.backtester.run_series(series, threshold as f64),
        }
    }
}

/// Returns the threshold with the highest sentiment-strategy return using default settings.
pub fn find_optimal_threshold(samples: &[Sample]) -> Result<i64, OptimizerError> {
    Ok(Optimizer::default().optimize(samples)?.best_threshold)
}

fn select_best(sweep: &[SweepPoint], default_threshold: i64) -> (i64, Option<&RunResult>) {
    let mut best_threshold = default_threshold;
    let mut best_return = f64::NEG_INFINITY;
    let mut best_result = None;

    for point in sweep {
        if point.result.strategy_return_pct > best_return {
            best_threshold = point.threshold;
            best_return = point.result.strategy_return_pct;
            best_result = Some(&point.result);
        }
    }

    (best_threshold, best_result)
}
