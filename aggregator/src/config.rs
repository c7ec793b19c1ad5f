use serde::Deserialize;
use std::collections::HashSet;
use std::time::Duration;
use thiserror::Error;
use url::Url;

#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Port cannot be 0")]
    InvalidPort,

    #[error("At least one source must be configured")]
    NoSources,

    #[error("Duplicate source name: {0}")]
    DuplicateSource(String),

    #[error("Empty source name")]
    EmptySourceName,

    #[error("max_attempts must be at least 1")]
    InvalidMaxAttempts,

    #[error("attempt_timeout_ms cannot be 0")]
    InvalidAttemptTimeout,
}

/// Aggregator configuration
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Config {
    /// Listener for incoming `/getData` requests
    #[serde(default)]
    pub listener: Listener,
    /// Fixed list of upstream sources queried on every request
    pub sources: Vec<SourceConfig>,
    /// Retry policy applied to each source independently
    #[serde(default)]
    pub retry: RetryPolicy,
}

impl Config {
    /// Validates the aggregator configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.listener.validate()?;
        self.retry.validate()?;

        if self.sources.is_empty() {
            return Err(ValidationError::NoSources);
        }

        let mut source_names = HashSet::new();
        for source in &self.sources {
            if source.name.is_empty() {
                return Err(ValidationError::EmptySourceName);
            }

            if !source_names.insert(&source.name) {
                return Err(ValidationError::DuplicateSource(source.name.clone()));
            }
        }

        Ok(())
    }
}

/// Network listener configuration
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Listener {
    /// Host address to bind to (e.g., "0.0.0.0" or "127.0.0.1")
    pub host: String,
    /// Port number to listen on
    pub port: u16,
}

impl Default for Listener {
    fn default() -> Self {
        Listener {
            host: "0.0.0.0".into(),
            port: 8000,
        }
    }
}

impl Listener {
    /// Validates the listener configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.port == 0 {
            return Err(ValidationError::InvalidPort);
        }
        Ok(())
    }
}

/// Upstream source configuration
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct SourceConfig {
    /// Unique identifier for this source, used in logs and metrics
    pub name: String,
    /// Address the source is fetched from with a plain GET
    ///
    /// Invalid URLs are rejected during config deserialization.
    pub url: Url,
}

/// Per-source retry policy.
///
/// Every kind of failure (transport, timeout, non-2xx status, malformed body)
/// consumes one attempt. Before attempt `n` (n >= 2) the fetcher waits
/// `initial_backoff * 2^(n-2)`.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    /// Timeout covering a single attempt, including the response body
    pub attempt_timeout_ms: u64,
    pub initial_backoff_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy {
            max_attempts: 3,
            attempt_timeout_ms: 2000,
            initial_backoff_ms: 2000,
        }
    }
}

impl RetryPolicy {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.max_attempts == 0 {
            return Err(ValidationError::InvalidMaxAttempts);
        }
        if self.attempt_timeout_ms == 0 {
            return Err(ValidationError::InvalidAttemptTimeout);
        }
        Ok(())
    }

    pub fn attempt_timeout(&self) -> Duration {
        Duration::from_millis(self.attempt_timeout_ms)
    }

    /// Delay to wait before `attempt` (1-based). The first attempt never waits.
    pub fn backoff_before(&self, attempt: u32) -> Duration {
        if attempt <= 1 {
            return Duration::ZERO;
        }
        let factor = 2u32.saturating_pow(attempt - 2);
        Duration::from_millis(self.initial_backoff_ms).saturating_mul(factor)
    }
}
