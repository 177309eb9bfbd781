use crate::error::ApiError;
use async_trait::async_trait;
use configuration::DataSource;
use core_types::Sample;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use std::path::PathBuf;
use std::time::Duration;

pub mod error;
pub mod responses;

// --- Public API ---
pub use responses::parse_samples;

/// The abstract interface for anything that can supply historical samples.
///
/// Samples are returned in whatever order the source serves them; ordering
/// is the simulation engine's job.
#[async_trait]
pub trait SampleSource: Send + Sync {
    async fn fetch_samples(&self) -> Result<Vec<Sample>, ApiError>;

    /// A short human-readable description, used in logs.
    fn describe(&self) -> String;
}

/// Fetches a JSON sample payload with a single GET request.
#[derive(Clone)]
pub struct HttpSampleSource {
    client: reqwest::Client,
    url: String,
}

impl HttpSampleSource {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

#[async_trait]
impl SampleSource for HttpSampleSource {
    async fn fetch_samples(&self) -> Result<Vec<Sample>, ApiError> {
        tracing::debug!(url = %self.url, "requesting samples");

        let response = self.client.get(&self.url).send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
                body: text,
            });
        }

        let samples = parse_samples(&text)?;
        tracing::debug!(url = %self.url, count = samples.len(), "samples received");
        Ok(samples)
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}

/// Reads a JSON sample payload from disk.
#[derive(Debug, Clone)]
pub struct FileSampleSource {
    path: PathBuf,
}

impl FileSampleSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl SampleSource for FileSampleSource {
    async fn fetch_samples(&self) -> Result<Vec<Sample>, ApiError> {
        let text = tokio::fs::read_to_string(&self.path).await?;
        parse_samples(&text)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Builds the configured source. A URL wins over a file when both are set.
pub fn source_from_config(config: &DataSource) -> Result<Box<dyn SampleSource>, ApiError> {
    match (&config.url, &config.file) {
        (Some(url), _) => Ok(Box::new(HttpSampleSource::new(
            url.clone(),
            Duration::from_secs(config.timeout_secs),
        )?)),
        (None, Some(path)) => Ok(Box::new(FileSampleSource::new(path.clone()))),
        (None, None) => Err(ApiError::NotConfigured),
    }
}
