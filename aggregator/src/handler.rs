//! The `/getData` endpoint: validate, fan out, merge, rank, respond.

use crate::errors::AggregatorError;
use crate::fanout::Coordinator;
use crate::merger::MergedRecords;
use crate::metrics_defs::AGGREGATE_TOTAL_FAILURE;
use crate::params::DataParams;
use crate::ranker::rank;
use crate::sources::Sources;
use http::{Method, StatusCode, Uri};
use hyper::Response;
use hyper::body::Bytes;
use shared::counter;
use shared::http::{make_error_response, make_json_response, make_text_response};

pub const DATA_PATH: &str = "/getData";
pub const HEALTH_PATH: &str = "/health";

/// Serves `/getData` against a fixed set of sources.
///
/// Holds no per-request state; every call builds its own merge state.
#[derive(Clone)]
pub struct GetDataHandler {
    coordinator: Coordinator,
}

impl GetDataHandler {
    pub fn new(coordinator: Coordinator) -> Self {
        Self { coordinator }
    }

    pub fn sources(&self) -> &Sources {
        self.coordinator.sources()
    }

    /// Dispatches on path. Only `/getData` ever contacts upstreams.
    pub async fn handle(&self, method: &Method, uri: &Uri) -> Response<Bytes> {
        match uri.path() {
            DATA_PATH => match self.get_data(method, uri).await {
                Ok(response) => response,
                Err(e) => {
                    tracing::error!(error = %e, "Failed to build response");
                    make_error_response(StatusCode::INTERNAL_SERVER_ERROR)
                }
            },
            HEALTH_PATH => make_text_response(StatusCode::OK, "ok"),
            path => {
                tracing::debug!(method = %method, path = %path, "No route matched");
                make_text_response(StatusCode::NOT_FOUND, "No route matched")
            }
        }
    }

    async fn get_data(
        &self,
        method: &Method,
        uri: &Uri,
    ) -> Result<Response<Bytes>, AggregatorError> {
        let params = match DataParams::from_request(method, uri) {
            Ok(params) => params,
            Err(e) => {
                tracing::info!(error = %e, "Rejected request");
                return Ok(make_text_response(e.status(), e.to_string()));
            }
        };

        let mut merged = MergedRecords::new();
        self.coordinator.fan_out_with(|result| merged.add(result)).await;
        let aggregate = merged.finish();

        if aggregate.is_total_failure() {
            counter!(AGGREGATE_TOTAL_FAILURE).increment(1);
            tracing::error!(
                failed_sources = ?aggregate.failed_sources,
                "All sources failed and no records survived"
            );
            return Ok(make_error_response(StatusCode::INTERNAL_SERVER_ERROR));
        }

        if aggregate.any_source_failed() {
            tracing::warn!(
                failed_sources = ?aggregate.failed_sources,
                records = aggregate.records.len(),
                "Serving partial results"
            );
        }

        let ranked = rank(aggregate.records, params.sort_key, params.limit);
        tracing::debug!(
            sort_key = %params.sort_key,
            limit = params.limit,
            count = ranked.count,
            "Ranked records"
        );

        Ok(make_json_response(StatusCode::OK, &ranked)?)
    }
}
