//! Time cursor extractors
//!
//! `since` accepts an RFC 3339 timestamp or whole seconds since the Unix epoch.

use axum::{
    async_trait,
    extract::{FromRequestParts, Query},
    http::request::Parts,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::response::ApiError;

/// Raw `?since=` parameter
#[derive(Debug, Default, Deserialize)]
pub struct TimeCursorParams {
    #[serde(default)]
    pub since: Option<String>,
}

/// Parsed `?since=` parameter for event streams
#[derive(Debug, Clone, Copy, Default)]
pub struct TimeCursor {
    pub since: Option<DateTime<Utc>>,
}

fn parse_since(raw: &str) -> Result<DateTime<Utc>, ApiError> {
    if let Ok(secs) = raw.parse::<i64>() {
        return DateTime::from_timestamp(secs, 0)
            .ok_or_else(|| ApiError::invalid_query("'since' is out of range"));
    }
    DateTime::parse_from_rfc3339(raw)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|_| ApiError::invalid_query("Invalid 'since' format"))
}

impl TryFrom<TimeCursorParams> for TimeCursor {
    type Error = ApiError;

    fn try_from(params: TimeCursorParams) -> Result<Self, Self::Error> {
        let since = params.since.as_deref().map(parse_since).transpose()?;
        Ok(TimeCursor { since })
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for TimeCursor
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(params) = Query::<TimeCursorParams>::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::invalid_query(e.to_string()))?;

        TimeCursor::try_from(params)
    }
}

/// `?since=&limit=` for message history
#[derive(Debug, Clone, Copy, Default)]
pub struct HistoryParams {
    pub since: Option<DateTime<Utc>>,
    pub limit: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct RawHistoryParams {
    #[serde(default)]
    since: Option<String>,
    #[serde(default)]
    limit: Option<i64>,
}

#[async_trait]
impl<S> FromRequestParts<S> for HistoryParams
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(raw) = Query::<RawHistoryParams>::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::invalid_query(e.to_string()))?;

        let TimeCursor { since } = TimeCursor::try_from(TimeCursorParams { since: raw.since })?;
        Ok(HistoryParams {
            since,
            limit: raw.limit,
        })
    }
}
