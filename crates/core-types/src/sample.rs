use crate::error::CoreError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single observation of the volatile asset's price and the sentiment indicator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub timestamp: DateTime<Utc>,
    /// Price of the volatile asset, in stable-asset units.
    pub price: f64,
    /// Sentiment score. Conventionally 0-100, never range-checked.
    pub sentiment: f64,
}

impl Sample {
    pub fn new(timestamp: DateTime<Utc>, price: f64, sentiment: f64) -> Self {
        Self {
            timestamp,
            price,
            sentiment,
        }
    }
}

/// A validated, timestamp-ordered copy of a sample set.
///
/// Construction rejects empty input and unusable prices, then stable-sorts
/// the samples into a new buffer. The caller's slice is left untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleSeries {
    samples: Vec<Sample>,
}

impl SampleSeries {
    pub fn new(samples: &[Sample]) -> Result<Self, CoreError> {
        if samples.is_empty() {
            return Err(CoreError::InvalidInput(
                "sample sequence must contain at least one sample".to_string(),
            ));
        }

        // Indices refer to the caller's order so errors point at the offending input.
        if let Some((index, sample)) = samples
            .iter()
            .enumerate()
            .find(|(_, s)| !(s.price.is_finite() && s.price > 0.0))
        {
            return Err(CoreError::NonPositivePrice {
                index,
                price: sample.price,
            });
        }

        let mut ordered = samples.to_vec();
        // `sort_by_key` is stable, so equal timestamps keep their input order.
        ordered.sort_by_key(|s| s.timestamp);

        Ok(Self { samples: ordered })
    }

    pub fn first(&self) -> &Sample {
        &self.samples[0]
    }

    pub fn last(&self) -> &Sample {
        &self.samples[self.samples.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Always false; kept for API symmetry with slices.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn as_slice(&self) -> &[Sample] {
        &self.samples
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Sample> {
        self.samples.iter()
    }
}

impl<'a> IntoIterator for &'a SampleSeries {
    type Item = &'a Sample;
    type IntoIter = std::slice::Iter<'a, Sample>;

    fn into_iter(self) -> Self::IntoIter {
        self.samples.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(secs: i64, price: f64, sentiment: f64) -> Sample {
        Sample::new(Utc.timestamp_opt(secs, 0).unwrap(), price, sentiment)
    }

    #[test]
    fn rejects_empty_input() {
        let err = SampleSeries::new(&[]).unwrap_err();
        assert!(matches!(err, CoreError::InvalidInput(_)));
    }

    #[test]
    fn rejects_zero_negative_and_nan_prices() {
        for bad in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let samples = [at(0, 100.0, 50.0), at(60, bad, 50.0)];
            let err = SampleSeries::new(&samples).unwrap_err();
            match err {
                CoreError::NonPositivePrice { index, .. } => assert_eq!(index, 1),
                other => panic!("unexpected error: {other:?}"),
            }
        }
    }

    #[test]
    fn sorts_into_a_new_buffer_without_touching_input() {
        let samples = vec![at(120, 3.0, 30.0), at(0, 1.0, 10.0), at(60, 2.0, 20.0)];
        let series = SampleSeries::new(&samples).unwrap();

        let prices: Vec<f64> = series.iter().map(|s| s.price).collect();
        assert_eq!(prices, vec![1.0, 2.0, 3.0]);
        assert_eq!(samples[0].price, 3.0);
        assert_eq!(series.first().price, 1.0);
        assert_eq!(series.last().price, 3.0);
    }

    #[test]
    fn equal_timestamps_keep_input_order() {
        let samples = vec![at(60, 2.0, 20.0), at(0, 1.0, 10.0), at(60, 5.0, 50.0)];
        let series = SampleSeries::new(&samples).unwrap();

        let prices: Vec<f64> = series.iter().map(|s| s.price).collect();
        assert_eq!(prices, vec![1.0, 2.0, 5.0]);
    }

    #[test]
    fn sentiment_is_not_range_checked() {
        let samples = [at(0, 1.0, -40.0), at(60, 1.0, 250.0)];
        assert_eq!(SampleSeries::new(&samples).unwrap().len(), 2);
    }

    #[test]
    fn deserializes_from_json_shape() {
        let json = r#"{"timestamp":"2024-01-01T00:00:00Z","price":42000.5,"sentiment":71}"#;
        let sample: Sample = serde_json::from_str(json).unwrap();
        assert_eq!(sample.price, 42000.5);
        assert_eq!(sample.sentiment, 71.0);
        assert_eq!(sample.timestamp, Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
    }
}
