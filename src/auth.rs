//! API key credential handling
//!
//! The audioscrobbler API authenticates read-only calls with a single
//! `api_key` query parameter attached to every request.

use reqwest::RequestBuilder;

/// Query parameter name carrying the API key
const API_KEY_PARAM: &str = "api_key";

/// Credential applied to every outgoing request
#[derive(Clone)]
pub struct ApiKeyAuth {
    api_key: String,
}

impl ApiKeyAuth {
    /// Create a new credential from a raw key
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
        }
    }

    /// Apply the credential to a request builder
    pub fn apply(&self, req: RequestBuilder) -> RequestBuilder {
        req.query(&[(API_KEY_PARAM, self.api_key.as_str())])
    }
}

impl std::fmt::Debug for ApiKeyAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never log the key itself
        f.debug_struct("ApiKeyAuth").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_adds_query_param() {
        let auth = ApiKeyAuth::new("secret123");
        let client = reqwest::Client::new();
        let req = auth
            .apply(client.get("http://example.com/2.0"))
            .build()
            .unwrap();
        assert_eq!(req.url().query(), Some("api_key=secret123"));
    }

    #[test]
    fn test_debug_hides_key() {
        let auth = ApiKeyAuth::new("secret123");
        let debug = format!("{auth:?}");
        assert!(!debug.contains("secret123"));
    }
}
