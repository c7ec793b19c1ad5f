//! Wire types shared by the upstream sources and the `/getData` endpoint.
//!
//! Upstreams answer with
//!
//! ```json
//! {
//!   "data": [
//!     {"url": "www.wikipedia.com/abc1", "views": 11000, "relevanceScore": 0.1}
//!   ]
//! }
//! ```
//!
//! and `/getData` answers with the same record shape plus a `count`.

use hyper::body::Bytes;
use serde::{Deserialize, Serialize};

/// One rankable item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub url: String,
    pub views: u64,
    #[serde(rename = "relevanceScore")]
    pub relevance_score: f64,
}

/// Success body returned by an upstream source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamPayload {
    pub data: Vec<Record>,
}

impl UpstreamPayload {
    pub fn from_bytes(bytes: &Bytes) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }
}

/// Sorted and truncated records handed back to the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedResponse {
    pub data: Vec<Record>,
    /// Always equal to `data.len()`
    pub count: usize,
}

impl RankedResponse {
    pub fn new(data: Vec<Record>) -> Self {
        let count = data.len();
        Self { data, count }
    }
}
