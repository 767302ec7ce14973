//! OCR client configuration.

use std::time::Duration;

use url::Url;

use crate::error::{Error, Result};

/// Configuration for the transcription service client.
#[derive(Debug, Clone)]
pub struct OcrConfig {
    /// Base URL of the transcription API.
    pub base_url: Url,
    /// API key sent as a bearer credential.
    pub api_key: String,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Connect timeout.
    pub connect_timeout: Duration,
    /// Interval between readiness checks.
    pub poll_interval: Duration,
    /// Hard bound on the readiness wait.
    pub poll_timeout: Duration,
}

impl OcrConfig {
    /// Creates a configuration with default timeouts.
    pub fn new(base_url: impl AsRef<str>, api_key: impl Into<String>) -> Result<Self> {
        let base_url = Url::parse(base_url.as_ref())
            .map_err(|e| Error::invalid_config(format!("invalid base url: {e}")))?;

        Ok(Self {
            base_url,
            api_key: api_key.into(),
            timeout: Duration::from_secs(120),
            connect_timeout: Duration::from_secs(10),
            poll_interval: Duration::from_secs(2),
            poll_timeout: Duration::from_secs(30),
        })
    }

    /// Sets the readiness poll interval.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Sets the readiness poll bound.
    pub fn with_poll_timeout(mut self, timeout: Duration) -> Self {
        self.poll_timeout = timeout;
        self
    }

    /// Joins a path onto the base URL.
    pub(crate) fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .map_err(|e| Error::invalid_config(format!("invalid endpoint {path}: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_base_url() {
        let config = OcrConfig::new("https://ocr.example.com/", "key").unwrap();
        assert_eq!(
            config.endpoint("v1/files").unwrap().as_str(),
            "https://ocr.example.com/v1/files"
        );
    }

    #[test]
    fn rejects_invalid_base_url() {
        assert!(OcrConfig::new("not a url", "key").is_err());
    }
}
