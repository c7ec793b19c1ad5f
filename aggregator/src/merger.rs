//! Merging of per-source results into one record set.
//!
//! Partial failure is tolerated: records from successful sources are kept
//! regardless of how many other sources failed. Only "some source failed and
//! nothing survived" is a total failure.

use crate::fetcher::SourceResult;
use crate::protocol::Record;

/// Accumulates `SourceResult`s as they are delivered by the fan-out.
#[derive(Debug, Default)]
pub struct MergedRecords {
    records: Vec<Record>,
    failed_sources: Vec<String>,
    sources_seen: usize,
}

impl MergedRecords {
    pub fn new() -> Self {
        Self::default()
    }

    /// Absorbs one source outcome. Records are appended in delivery order.
    pub fn add(&mut self, result: SourceResult) {
        self.sources_seen += 1;

        match result.result {
            Ok(records) => self.records.extend(records),
            Err(error) => {
                tracing::debug!(source = %result.source, error = %error, "Source failed");
                self.failed_sources.push(result.source);
            }
        }
    }

    pub fn finish(self) -> AggregateResult {
        AggregateResult {
            records: self.records,
            failed_sources: self.failed_sources,
            sources_seen: self.sources_seen,
        }
    }
}

/// Merged view across all sources of one request, not yet sorted.
#[derive(Debug)]
pub struct AggregateResult {
    pub records: Vec<Record>,
    /// Names of sources that ended with an error
    pub failed_sources: Vec<String>,
    pub sources_seen: usize,
}

impl AggregateResult {
    pub fn any_source_failed(&self) -> bool {
        !self.failed_sources.is_empty()
    }

    /// Some source failed and no records survived.
    pub fn is_total_failure(&self) -> bool {
        self.any_source_failed() && self.records.is_empty()
    }
}

/// Merges a complete set of results.
pub fn aggregate(results: impl IntoIterator<Item = SourceResult>) -> AggregateResult {
    let mut merged = MergedRecords::new();
    for result in results {
        merged.add(result);
    }
    merged.finish()
}
