//! Ordering and truncation of the merged record set.

use crate::protocol::{Record, RankedResponse};
use std::cmp::Ordering;
use std::fmt;

/// Field the response is sorted by, ascending.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortKey {
    Views,
    RelevanceScore,
}

impl SortKey {
    /// Parses the query-string spelling of a sort key.
    pub fn from_param(value: &str) -> Option<Self> {
        match value {
            "views" => Some(SortKey::Views),
            "relevanceScore" => Some(SortKey::RelevanceScore),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Views => "views",
            SortKey::RelevanceScore => "relevanceScore",
        }
    }

    /// Total order on the chosen field. There is no secondary key.
    pub fn compare(&self, a: &Record, b: &Record) -> Ordering {
        match self {
            SortKey::Views => a.views.cmp(&b.views),
            SortKey::RelevanceScore => a.relevance_score.total_cmp(&b.relevance_score),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sorts `records` ascending by `sort_key` and keeps at most `limit` of them.
///
/// The sort is stable, so records with equal keys keep their merge order.
/// `limit` is validated before it gets here and is at least 1.
pub fn rank(mut records: Vec<Record>, sort_key: SortKey, limit: usize) -> RankedResponse {
    records.sort_by(|a, b| sort_key.compare(a, b));
    records.truncate(limit);
    RankedResponse::new(records)
}
