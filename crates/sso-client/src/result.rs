//! API response envelope
//!
//! The identity API wraps payloads in an optional `data` field with
//! optional `total` and `pagination{cursor}` companions; errors carry a
//! JSON `message` plus the HTTP status. This module normalizes all of
//! that into one envelope. HTTP error statuses produce an unsuccessful
//! envelope rather than a transport error, so callers can inspect the
//! status, message, and rate-limit headers uniformly.

use crate::error::RequestResult;
use crate::pagination::Paginator;
use reqwest::header::HeaderMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Message returned by [`ApiResponse::error`] when the API gave no usable
/// body.
pub const API_UNAVAILABLE: &str = "SSO API Unavailable";

/// Pagination cursor returned by list endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    /// Opaque cursor into the result set
    pub cursor: String,
}

/// Rate limit information from the response headers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RateLimit {
    /// `X-RateLimit-Limit`
    pub limit: u32,
    /// `X-RateLimit-Remaining`
    pub remaining: u32,
    /// `Retry-After`, in seconds
    pub retry_after: u32,
}

impl RateLimit {
    fn from_headers(headers: &HeaderMap) -> Self {
        let parse = |name: &str| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse().ok())
                .unwrap_or(0)
        };

        Self {
            limit: parse("X-RateLimit-Limit"),
            remaining: parse("X-RateLimit-Remaining"),
            retry_after: parse("Retry-After"),
        }
    }
}

/// Normalized identity API response.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    /// Whether the HTTP status was a success
    pub success: bool,

    /// HTTP status code
    pub status: u16,

    /// Response payload: the `data` field when present, otherwise the
    /// whole body
    pub data: Value,

    /// Total amount of result data, when reported
    pub total: Option<u64>,

    /// Pagination cursor, when reported
    pub pagination: Option<Pagination>,

    /// API error message, when reported
    pub message: Option<String>,

    /// Rate limit headers
    pub rate_limit: RateLimit,
}

impl ApiResponse {
    pub(crate) async fn from_response(response: reqwest::Response) -> RequestResult<Self> {
        let status = response.status().as_u16();
        let success = response.status().is_success();
        let rate_limit = RateLimit::from_headers(response.headers());
        // Bodies that are not valid JSON are treated as absent.
        let body = response
            .text()
            .await
            .ok()
            .and_then(|text| serde_json::from_str(&text).ok())
            .unwrap_or(Value::Null);

        Ok(Self::from_parts(status, success, rate_limit, body))
    }

    pub(crate) fn from_parts(status: u16, success: bool, rate_limit: RateLimit, body: Value) -> Self {
        let (data, total, pagination, message) = match &body {
            Value::Object(map) => (
                map.get("data").cloned().unwrap_or_else(|| body.clone()),
                map.get("total").and_then(Value::as_u64),
                map.get("pagination")
                    .and_then(|p| serde_json::from_value(p.clone()).ok()),
                map.get("message")
                    .and_then(Value::as_str)
                    .map(String::from),
            ),
            _ => (body.clone(), None, None, None),
        };

        Self {
            success,
            status,
            data,
            total,
            pagination,
            message,
            rate_limit,
        }
    }

    /// Whether the query succeeded.
    pub fn success(&self) -> bool {
        self.success
    }

    /// The response payload.
    pub fn data(&self) -> &Value {
        &self.data
    }

    /// The last HTTP or API error message.
    pub fn error(&self) -> String {
        self.message
            .clone()
            .unwrap_or_else(|| API_UNAVAILABLE.to_string())
    }

    /// First record of a list payload (for single-record queries).
    pub fn first_record(&self) -> Option<&Value> {
        self.data.as_array().and_then(|records| records.first())
    }

    /// Count of records in the payload.
    pub fn count(&self) -> usize {
        match &self.data {
            Value::Array(records) => records.len(),
            Value::Null => 0,
            _ => 1,
        }
    }

    /// Rate limit information from the response headers.
    pub fn rate_limit(&self) -> RateLimit {
        self.rate_limit
    }

    /// A paginator positioned on this response's cursor.
    pub fn paginator(&self) -> Paginator {
        Paginator::from_response(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_wrapped_data_payload() {
        let response = ApiResponse::from_parts(
            200,
            true,
            RateLimit::default(),
            json!({
                "data": [{"id": 1}, {"id": 2}],
                "total": 2,
                "pagination": {"cursor": "abc"},
            }),
        );

        assert!(response.success());
        assert_eq!(response.count(), 2);
        assert_eq!(response.total, Some(2));
        assert_eq!(response.pagination.as_ref().unwrap().cursor, "abc");
        assert_eq!(response.first_record().unwrap()["id"], 1);
    }

    #[test]
    fn test_bare_payload_is_data() {
        let response = ApiResponse::from_parts(
            200,
            true,
            RateLimit::default(),
            json!({"id": 42, "email": "user@example.com"}),
        );

        assert_eq!(response.data()["id"], 42);
        assert_eq!(response.count(), 1);
        assert!(response.first_record().is_none());
    }

    #[test]
    fn test_error_message() {
        let response = ApiResponse::from_parts(
            422,
            false,
            RateLimit::default(),
            json!({"message": "The email field is required."}),
        );

        assert!(!response.success());
        assert_eq!(response.error(), "The email field is required.");
    }

    #[test]
    fn test_error_without_body() {
        let response = ApiResponse::from_parts(500, false, RateLimit::default(), Value::Null);
        assert_eq!(response.error(), API_UNAVAILABLE);
        assert_eq!(response.count(), 0);
    }
}
