//! Page fetcher
//!
//! Translates (stream, partition, page token) into one GET request and
//! returns the parsed body. The API multiplexes every method over a
//! single path; the `method` query parameter selects the operation, and
//! failures can arrive as a JSON error payload inside a 200 response.

use crate::error::{Error, Result};
use crate::http::{HttpClient, RequestConfig};
use crate::pagination::PageToken;
use crate::streams::StreamDefinition;
use serde_json::Value;
use tracing::debug;

/// The single API path every method is served from
pub const API_PATH: &str = "/2.0";

/// Fetches one page of raw records at a time
#[derive(Debug)]
pub struct PageFetcher<'a> {
    client: &'a HttpClient,
}

impl<'a> PageFetcher<'a> {
    /// Create a fetcher over a configured client
    pub fn new(client: &'a HttpClient) -> Self {
        Self { client }
    }

    /// Fetch one page for a stream.
    ///
    /// `partition` fills the stream's partition parameter; the token
    /// contributes page, window, or enumerated-value parameters. A `None`
    /// token requests the first (or only) page.
    pub async fn fetch_page(
        &self,
        stream: &StreamDefinition,
        partition: Option<&str>,
        token: Option<&PageToken>,
    ) -> Result<Value> {
        let request = build_request(stream, partition, token);
        debug!(stream = stream.name, partition, "Fetching page");

        let body = self.client.get_json(API_PATH, request).await?;
        check_api_error(&body)?;
        Ok(body)
    }
}

/// Assemble the query parameters for one page request
fn build_request(
    stream: &StreamDefinition,
    partition: Option<&str>,
    token: Option<&PageToken>,
) -> RequestConfig {
    let mut request = RequestConfig::new()
        .query("method", stream.method)
        .query("format", "json");

    for (key, value) in stream.fixed_params {
        request = request.query(*key, *value);
    }

    if let (Some(param), Some(value)) = (stream.partition_param, partition) {
        request = request.query(param, value);
    }

    match token {
        Some(PageToken::Index(page)) => {
            request = request.query("page", page.to_string());
        }
        Some(PageToken::Value(value)) => {
            if let Some(param) = stream.partition_param {
                request = request.query(param, value.clone());
            }
        }
        Some(PageToken::Window(window)) => {
            request = request
                .query("from", window.window_start.timestamp().to_string())
                .query("to", window.window_end.timestamp().to_string())
                .query("page", window.page.to_string());
        }
        None => {}
    }

    request
}

/// Reject bodies carrying the API's in-band error payload
fn check_api_error(body: &Value) -> Result<()> {
    let Some(code) = body.get("error").and_then(Value::as_i64) else {
        return Ok(());
    };
    let message = body
        .get("message")
        .and_then(Value::as_str)
        .unwrap_or("unknown API error")
        .to_string();
    Err(Error::Api { code, message })
}

#[cfg(test)]
mod fetcher_tests {
    use super::*;
    use crate::pagination::WindowToken;
    use crate::streams::{scrobbles, users};
    use serde_json::json;

    #[test]
    fn test_enumerated_token_fills_partition_param() {
        let request = build_request(
            &users::definition(),
            None,
            Some(&PageToken::Value("alice".to_string())),
        );

        assert_eq!(request.query.get("method").map(String::as_str), Some("user.getinfo"));
        assert_eq!(request.query.get("format").map(String::as_str), Some("json"));
        assert_eq!(request.query.get("user").map(String::as_str), Some("alice"));
        assert!(!request.query.contains_key("page"));
    }

    #[test]
    fn test_window_token_adds_bounds_and_page() {
        let window = WindowToken {
            window_start: "2020-01-01T00:00:00Z".parse().unwrap(),
            window_end: "2020-01-31T00:00:00Z".parse().unwrap(),
            page: 3,
        };
        let request = build_request(
            &scrobbles::definition(),
            Some("alice"),
            Some(&PageToken::Window(window)),
        );

        assert_eq!(request.query.get("method").map(String::as_str), Some("user.getRecentTracks"));
        assert_eq!(request.query.get("user").map(String::as_str), Some("alice"));
        assert_eq!(request.query.get("from").map(String::as_str), Some("1577836800"));
        assert_eq!(request.query.get("to").map(String::as_str), Some("1580428800"));
        assert_eq!(request.query.get("page").map(String::as_str), Some("3"));
        // Fixed stream parameters are always present
        assert_eq!(request.query.get("extended").map(String::as_str), Some("1"));
        assert_eq!(request.query.get("limit").map(String::as_str), Some("200"));
    }

    #[test]
    fn test_api_error_payload_rejected() {
        let body = json!({"error": 6, "message": "User not found"});
        let err = check_api_error(&body).unwrap_err();
        assert!(matches!(err, Error::Api { code: 6, ref message } if message == "User not found"));
    }

    #[test]
    fn test_clean_body_passes() {
        assert!(check_api_error(&json!({"user": {"name": "alice"}})).is_ok());
    }
}
