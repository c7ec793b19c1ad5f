use crate::errors::FetchError;
use crate::fetcher::{Fetch, SourceResult};
use crate::protocol::{Record, UpstreamPayload};
use async_trait::async_trait;
use http::StatusCode;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::service::service_fn;
use hyper::{Request, Response};
use hyper_util::rt::{TokioExecutor, TokioIo};
use std::collections::HashMap;
use std::convert::Infallible;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::net::TcpListener;
use url::Url;

/// Canned answer of a mock upstream.
#[derive(Clone, Debug)]
pub struct MockResponse {
    pub status: StatusCode,
    pub body: String,
    pub delay: Duration,
}

impl MockResponse {
    pub fn records(records: &[Record]) -> Self {
        let payload = UpstreamPayload {
            data: records.to_vec(),
        };
        Self::body(serde_json::to_string(&payload).unwrap())
    }

    pub fn body(body: impl Into<String>) -> Self {
        Self {
            status: StatusCode::OK,
            body: body.into(),
            delay: Duration::ZERO,
        }
    }

    pub fn status(status: StatusCode) -> Self {
        Self {
            status,
            body: String::new(),
            delay: Duration::ZERO,
        }
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

/// A local HTTP server standing in for one upstream source.
///
/// The responder receives the 1-based number of the request being served.
pub struct MockUpstream {
    pub url: Url,
    hits: Arc<AtomicUsize>,
}

impl MockUpstream {
    pub async fn start<F>(respond: F) -> Self
    where
        F: Fn(usize) -> MockResponse + Send + Sync + 'static,
    {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let hits = Arc::new(AtomicUsize::new(0));
        let respond = Arc::new(respond);

        let server_hits = hits.clone();
        tokio::spawn(async move {
            loop {
                let (stream, _) = listener.accept().await.unwrap();
                let io = TokioIo::new(stream);
                let respond = respond.clone();
                let hits = server_hits.clone();

                tokio::spawn(async move {
                    let service = service_fn(move |_req: Request<hyper::body::Incoming>| {
                        let hit = hits.fetch_add(1, Ordering::SeqCst) + 1;
                        let mock = respond(hit);
                        async move {
                            tokio::time::sleep(mock.delay).await;
                            let mut response = Response::new(Full::new(Bytes::from(mock.body)));
                            *response.status_mut() = mock.status;
                            Ok::<_, Infallible>(response)
                        }
                    });

                    let _ = hyper_util::server::conn::auto::Builder::new(TokioExecutor::new())
                        .serve_connection(io, service)
                        .await;
                });
            }
        });

        Self {
            url: Url::parse(&format!("http://127.0.0.1:{port}/data.json")).unwrap(),
            hits,
        }
    }

    /// Always answers with the same response.
    pub async fn fixed(response: MockResponse) -> Self {
        Self::start(move |_| response.clone()).await
    }

    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}

/// An address nothing listens on.
pub async fn unreachable_url() -> Url {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    Url::parse(&format!("http://127.0.0.1:{port}/data.json")).unwrap()
}

pub fn record(url: &str, views: u64, relevance_score: f64) -> Record {
    Record {
        url: url.to_string(),
        views,
        relevance_score,
    }
}

/// How a `StubFetcher` answers for one source.
#[derive(Clone, Debug)]
pub enum StubOutcome {
    Records(Vec<Record>),
    Fail,
    Panic,
}

/// In-memory `Fetch` implementation keyed by source name.
///
/// Sources without an entry fail. `delay` lets tests shuffle completion order.
#[derive(Default)]
pub struct StubFetcher {
    outcomes: HashMap<String, (StubOutcome, Duration)>,
    calls: AtomicUsize,
}

impl StubFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(self, source: &str, outcome: StubOutcome) -> Self {
        self.with_delayed(source, outcome, Duration::ZERO)
    }

    pub fn with_delayed(mut self, source: &str, outcome: StubOutcome, delay: Duration) -> Self {
        self.outcomes.insert(source.to_string(), (outcome, delay));
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Fetch for StubFetcher {
    async fn fetch(&self, source: &str, _url: &Url) -> SourceResult {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let (outcome, delay) = self
            .outcomes
            .get(source)
            .cloned()
            .unwrap_or((StubOutcome::Fail, Duration::ZERO));
        tokio::time::sleep(delay).await;

        match outcome {
            StubOutcome::Records(records) => SourceResult::fetched(source, records),
            StubOutcome::Fail => SourceResult::failed(
                source,
                FetchError::UpstreamStatus(source.to_string(), StatusCode::INTERNAL_SERVER_ERROR),
            ),
            StubOutcome::Panic => panic!("stub fetch for {source} panicked"),
        }
    }
}

/// Sources named `names`, all pointing at an unused local address.
pub fn stub_sources(names: &[&str]) -> crate::sources::Sources {
    crate::sources::Sources::new(
        names
            .iter()
            .map(|name| crate::config::SourceConfig {
                name: name.to_string(),
                url: Url::parse(&format!("http://127.0.0.1:1/{name}.json")).unwrap(),
            })
            .collect(),
    )
}
