pub mod config;
pub mod errors;
pub mod fanout;
pub mod fetcher;
pub mod handler;
pub mod merger;
pub mod metrics_defs;
pub mod params;
pub mod protocol;
pub mod ranker;
pub mod sources;

#[cfg(test)]
mod testutils;

use crate::errors::AggregatorError;
use crate::fanout::Coordinator;
use crate::fetcher::HttpFetcher;
use crate::handler::GetDataHandler;
use crate::metrics_defs::REQUEST_DURATION;
use crate::sources::Sources;
use http_body_util::combinators::BoxBody;
use hyper::body::Bytes;
use hyper::body::Incoming;
use hyper::service::Service;
use hyper::{Request, Response};
use shared::histogram;
use shared::http::{into_boxed, run_http_service};
use std::pin::Pin;
use std::sync::Arc;
use std::time::Instant;

pub async fn run(config: config::Config) -> Result<(), AggregatorError> {
    config.validate()?;

    let service = AggregatorService::from_config(&config);
    tracing::info!(
        sources = service.handler.sources().len(),
        "Starting aggregator"
    );

    run_http_service(&config.listener.host, config.listener.port, service).await
}

pub struct AggregatorService {
    handler: GetDataHandler,
}

impl AggregatorService {
    pub fn new(handler: GetDataHandler) -> Self {
        Self { handler }
    }

    pub fn from_config(config: &config::Config) -> Self {
        let fetcher = HttpFetcher::new(config.retry.clone());
        let sources = Sources::new(config.sources.clone());
        let coordinator = Coordinator::new(Arc::new(fetcher), sources);
        Self::new(GetDataHandler::new(coordinator))
    }
}

impl Service<Request<Incoming>> for AggregatorService {
    type Response = Response<BoxBody<Bytes, Self::Error>>;
    type Error = AggregatorError;
    type Future =
        Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send + 'static>>;

    fn call(&self, req: Request<Incoming>) -> Self::Future {
        let handler = self.handler.clone();

        Box::pin(async move {
            let started = Instant::now();
            let response = handler.handle(req.method(), req.uri()).await;

            let status = response.status();
            histogram!(REQUEST_DURATION, "status" => status.as_u16().to_string())
                .record(started.elapsed().as_secs_f64());
            tracing::debug!(
                method = %req.method(),
                path = %req.uri().path(),
                status = status.as_u16(),
                "Handled request"
            );

            Ok(into_boxed(response))
        })
    }
}
