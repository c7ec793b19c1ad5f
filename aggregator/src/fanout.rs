//! Concurrent fan-out of one fetch per configured source.

use crate::errors::FetchError;
use crate::fetcher::{Fetch, SourceResult};
use crate::sources::Sources;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::task::JoinSet;

/// Launches one fetch per source and waits for all of them.
///
/// There is no request-level deadline and no cancellation: every fetch runs
/// until it succeeds or exhausts its own retry policy.
#[derive(Clone)]
pub struct Coordinator {
    fetcher: Arc<dyn Fetch>,
    sources: Sources,
}

impl Coordinator {
    pub fn new(fetcher: Arc<dyn Fetch>, sources: Sources) -> Self {
        Self { fetcher, sources }
    }

    pub fn sources(&self) -> &Sources {
        &self.sources
    }

    /// Runs all fetches in parallel and hands each `SourceResult` to `deliver`
    /// in completion order.
    ///
    /// `deliver` is called exactly once per configured source, including
    /// sources whose worker panicked.
    pub async fn fan_out_with<F>(&self, mut deliver: F)
    where
        F: FnMut(SourceResult),
    {
        let mut join_set = JoinSet::new();
        let mut task_sources = HashMap::with_capacity(self.sources.len());

        for (name, url) in self.sources.iter() {
            let fetcher = self.fetcher.clone();
            let source = name.clone();
            let url = url.clone();

            let abort_handle = join_set.spawn(async move { fetcher.fetch(&source, &url).await });
            task_sources.insert(abort_handle.id(), name.clone());
        }

        while let Some(join_result) = join_set.join_next_with_id().await {
            match join_result {
                Ok((task_id, result)) => {
                    task_sources.remove(&task_id);
                    deliver(result);
                }
                Err(e) => {
                    tracing::error!("Fetch task failed: {e}");
                    if let Some(source) = task_sources.remove(&e.id()) {
                        let error = FetchError::WorkerFailed(source.clone(), e.to_string());
                        deliver(SourceResult::failed(source, error));
                    }
                }
            }
        }

        debug_assert!(task_sources.is_empty());
    }

    /// Collects every `SourceResult` in completion order.
    pub async fn fan_out(&self) -> Vec<SourceResult> {
        let mut results = Vec::with_capacity(self.sources.len());
        self.fan_out_with(|result| results.push(result)).await;
        results
    }
}
