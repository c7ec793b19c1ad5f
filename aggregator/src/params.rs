//! Validation of `/getData` request parameters.
//!
//! Runs before any upstream is contacted; a rejected request never fans out.

use crate::ranker::SortKey;
use http::{Method, StatusCode, Uri};
use thiserror::Error;

pub const MIN_LIMIT: i64 = 1;
pub const MAX_LIMIT: i64 = 200;

/// Rejected request, surfaced verbatim to the caller
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ParamError {
    #[error("method not allowed")]
    MethodNotAllowed,

    #[error("url parameter 'sortKey' is missing")]
    MissingSortKey,

    #[error("url parameter value for 'sortKey' is invalid")]
    InvalidSortKey,

    #[error("url parameter 'limit' is missing")]
    MissingLimit,

    #[error("Error while reading limit value: {0}")]
    UnparsableLimit(String),

    #[error("url parameter value for 'limit' is invalid")]
    LimitOutOfRange,
}

impl ParamError {
    pub fn status(&self) -> StatusCode {
        match self {
            ParamError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

/// Validated `(sortKey, limit)` pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DataParams {
    pub sort_key: SortKey,
    pub limit: usize,
}

impl DataParams {
    /// Checks method, then `sortKey`, then `limit`. When a parameter is
    /// repeated the first occurrence wins.
    pub fn from_request(method: &Method, uri: &Uri) -> Result<Self, ParamError> {
        if method != Method::GET {
            return Err(ParamError::MethodNotAllowed);
        }

        let query = uri.query().unwrap_or("");

        let sort_key = first_param(query, "sortKey")
            .filter(|value| !value.is_empty())
            .ok_or(ParamError::MissingSortKey)?;
        let sort_key = SortKey::from_param(&sort_key).ok_or(ParamError::InvalidSortKey)?;

        let limit = first_param(query, "limit")
            .filter(|value| !value.is_empty())
            .ok_or(ParamError::MissingLimit)?;
        let limit: i64 = limit
            .parse()
            .map_err(|e: std::num::ParseIntError| ParamError::UnparsableLimit(e.to_string()))?;
        if !(MIN_LIMIT..=MAX_LIMIT).contains(&limit) {
            return Err(ParamError::LimitOutOfRange);
        }

        Ok(DataParams {
            sort_key,
            limit: limit as usize,
        })
    }
}

fn first_param(query: &str, name: &str) -> Option<String> {
    url::form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.into_owned())
}
