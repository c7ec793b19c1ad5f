//! Retrieval of one upstream source with bounded retry and exponential backoff.

use crate::config::RetryPolicy;
use crate::errors::FetchError;
use crate::metrics_defs::{FETCH_ATTEMPTS, FETCH_FAILURES, SOURCES_EXHAUSTED};
use crate::protocol::{Record, UpstreamPayload};
use async_trait::async_trait;
use shared::counter;
use tokio::time::sleep;
use url::Url;

/// Outcome of fetching one source. Exactly one is produced per source per request.
#[derive(Debug)]
pub struct SourceResult {
    /// The source name this result came from
    pub source: String,
    /// Records on success, the most recent error once attempts are exhausted
    pub result: Result<Vec<Record>, FetchError>,
}

impl SourceResult {
    pub fn fetched(source: impl Into<String>, records: Vec<Record>) -> Self {
        Self {
            source: source.into(),
            result: Ok(records),
        }
    }

    pub fn failed(source: impl Into<String>, error: FetchError) -> Self {
        Self {
            source: source.into(),
            result: Err(error),
        }
    }
}

/// Retrieves the records of a single source.
///
/// Implementations never fail outright: every failure is encoded in the
/// returned `SourceResult`.
#[async_trait]
pub trait Fetch: Send + Sync {
    async fn fetch(&self, source: &str, url: &Url) -> SourceResult;
}

/// Per-invocation retry state.
enum FetchState {
    /// About to issue the given 1-based attempt
    Attempting(u32),
    Success(Vec<Record>),
    ExhaustedFailure(FetchError),
}

/// Fetches sources over HTTP according to a `RetryPolicy`.
#[derive(Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
    policy: RetryPolicy,
}

impl HttpFetcher {
    pub fn new(policy: RetryPolicy) -> Self {
        Self {
            client: reqwest::Client::new(),
            policy,
        }
    }

    /// One GET against `url`. Any non-2xx status or malformed body is an error.
    async fn attempt(&self, source: &str, url: &Url) -> Result<Vec<Record>, FetchError> {
        counter!(FETCH_ATTEMPTS).increment(1);

        let response = self
            .client
            .get(url.clone())
            .timeout(self.policy.attempt_timeout())
            .send()
            .await
            .map_err(|e| transport_error(source, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::UpstreamStatus(source.to_string(), status));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| transport_error(source, e))?;

        UpstreamPayload::from_bytes(&body)
            .map(|payload| payload.data)
            .map_err(|e| FetchError::Decode(source.to_string(), e.to_string()))
    }
}

#[async_trait]
impl Fetch for HttpFetcher {
    async fn fetch(&self, source: &str, url: &Url) -> SourceResult {
        let mut state = FetchState::Attempting(1);

        loop {
            state = match state {
                FetchState::Attempting(attempt) => {
                    let backoff = self.policy.backoff_before(attempt);
                    if !backoff.is_zero() {
                        sleep(backoff).await;
                    }

                    match self.attempt(source, url).await {
                        Ok(records) => FetchState::Success(records),
                        Err(error) => {
                            counter!(FETCH_FAILURES, "kind" => error.kind()).increment(1);
                            tracing::warn!(
                                source = %source,
                                attempt,
                                max_attempts = self.policy.max_attempts,
                                error = %error,
                                "Fetch attempt failed"
                            );

                            if attempt >= self.policy.max_attempts {
                                FetchState::ExhaustedFailure(error)
                            } else {
                                FetchState::Attempting(attempt + 1)
                            }
                        }
                    }
                }
                FetchState::Success(records) => {
                    tracing::debug!(source = %source, records = records.len(), "Fetched source");
                    return SourceResult::fetched(source, records);
                }
                FetchState::ExhaustedFailure(error) => {
                    counter!(SOURCES_EXHAUSTED).increment(1);
                    tracing::error!(source = %source, error = %error, "Source retries exhausted");
                    return SourceResult::failed(source, error);
                }
            };
        }
    }
}

fn transport_error(source: &str, error: reqwest::Error) -> FetchError {
    if error.is_timeout() {
        FetchError::Timeout(source.to_string())
    } else {
        FetchError::Transport(source.to_string(), error.to_string())
    }
}
