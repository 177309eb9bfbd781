use crate::error::ApiError;
use chrono::{DateTime, TimeZone, Utc};
use core_types::Sample;
use serde::Deserialize;

/// The accepted payload shapes: a bare array, or an object wrapping it in `data`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum SamplePayload {
    List(Vec<SampleResponse>),
    Wrapped { data: Vec<SampleResponse> },
}

impl SamplePayload {
    pub fn into_samples(self) -> Result<Vec<Sample>, ApiError> {
        let rows = match self {
            SamplePayload::List(rows) => rows,
            SamplePayload::Wrapped { data } => data,
        };

        rows.into_iter()
            .enumerate()
            .map(|(index, row)| row.into_sample(index))
            .collect()
    }
}

/// A single sample as served over the wire. Unknown fields are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct SampleResponse {
    pub timestamp: WireTimestamp,
    pub price: WireNumber,
    pub sentiment: WireNumber,
}

impl SampleResponse {
    fn into_sample(self, index: usize) -> Result<Sample, ApiError> {
        Ok(Sample::new(
            self.timestamp.to_datetime(index)?,
            self.price.to_f64(index, "price")?,
            self.sentiment.to_f64(index, "sentiment")?,
        ))
    }
}

/// Sentiment feeds commonly serve numbers as strings, e.g. `"value": "25"`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum WireNumber {
    Number(f64),
    Text(String),
}

impl WireNumber {
    fn to_f64(&self, index: usize, field: &str) -> Result<f64, ApiError> {
        match self {
            WireNumber::Number(value) => Ok(*value),
            WireNumber::Text(text) => text.trim().parse().map_err(|_| ApiError::InvalidData {
                index,
                reason: format!("{field} '{text}' is not a number"),
            }),
        }
    }
}

/// Unix seconds (as a number or a string) or an RFC 3339 string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum WireTimestamp {
    Unix(i64),
    Text(String),
}

impl WireTimestamp {
    fn to_datetime(&self, index: usize) -> Result<DateTime<Utc>, ApiError> {
        let invalid = |reason: String| ApiError::InvalidData { index, reason };

        match self {
            WireTimestamp::Unix(secs) => unix_seconds(*secs)
                .ok_or_else(|| invalid(format!("timestamp {secs} is out of range"))),
            WireTimestamp::Text(text) => {
                let text = text.trim();
                if let Ok(secs) = text.parse::<i64>() {
                    return unix_seconds(secs)
                        .ok_or_else(|| invalid(format!("timestamp {secs} is out of range")));
                }
                DateTime::parse_from_rfc3339(text)
                    .map(|dt| dt.with_timezone(&Utc))
                    .map_err(|e| invalid(format!("timestamp '{text}': {e}")))
            }
        }
    }
}

fn unix_seconds(secs: i64) -> Option<DateTime<Utc>> {
    Utc.timestamp_opt(secs, 0).single()
}

/// Parses a JSON sample payload into samples, in the order they were served.
pub fn parse_samples(body: &str) -> Result<Vec<Sample>, ApiError> {
    let payload: SamplePayload =
        serde_json::from_str(body).map_err(|e| ApiError::Deserialization(e.to_string()))?;
    payload.into_samples()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_array_with_rfc3339_timestamps() {
        let body = r#"[
            {"timestamp": "2024-03-01T00:00:00Z", "price": 61000.5, "sentiment": 72},
            {"timestamp": "2024-03-02T00:00:00+02:00", "price": 62000, "sentiment": 80.5}
        ]"#;
        let samples = parse_samples(body).unwrap();

        assert_eq!(samples.len(), 2);
        assert_eq!(samples[0].price, 61000.5);
        assert_eq!(samples[0].sentiment, 72.0);
        assert_eq!(
            samples[1].timestamp,
            Utc.with_ymd_and_hms(2024, 3, 1, 22, 0, 0).unwrap()
        );
    }

    #[test]
    fn parses_wrapped_payload_with_string_numbers_and_unix_times() {
        let body = r#"{"name": "index", "data": [
            {"timestamp": "1709251200", "price": "61000.5", "sentiment": "72", "classification": "Greed"},
            {"timestamp": 1709337600, "price": " 62000 ", "sentiment": 15}
        ]}"#;
        let samples = parse_samples(body).unwrap();

        assert_eq!(samples.len(), 2);
        assert_eq!(samples[0].timestamp, Utc.timestamp_opt(1_709_251_200, 0).unwrap());
        assert_eq!(samples[0].price, 61000.5);
        assert_eq!(samples[1].price, 62000.0);
        assert_eq!(samples[1].sentiment, 15.0);
    }

    #[test]
    fn rejects_malformed_numbers_with_their_index() {
        let body = r#"[
            {"timestamp": 0, "price": 1, "sentiment": 1},
            {"timestamp": 60, "price": "abc", "sentiment": 1}
        ]"#;
        match parse_samples(body).unwrap_err() {
            ApiError::InvalidData { index, reason } => {
                assert_eq!(index, 1);
                assert!(reason.contains("price"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn rejects_bad_timestamps_and_non_json() {
        let bad_time = r#"[{"timestamp": "yesterday", "price": 1, "sentiment": 1}]"#;
        assert!(matches!(
            parse_samples(bad_time),
            Err(ApiError::InvalidData { index: 0, .. })
        ));
        assert!(matches!(
            parse_samples("<html>oops</html>"),
            Err(ApiError::Deserialization(_))
        ));
    }
}
