//! Requests and responses as plain data.
//!
//! A request is described as data before it touches the network: the
//! transport turns an [`ApiRequest`] into a real HTTP round-trip, and the
//! same value rides along in the completion so callers can see exactly what
//! was sent.

use reqwest::Method;

use super::ClientConfig;

/// A fully described HTTP request against the API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    /// Serialized JSON body for writes, `None` for reads.
    pub body: Option<String>,
}

/// What little of the HTTP response survives into a completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
}

/// Stamps every outgoing request with the session's base URL and
/// authentication headers.
#[derive(Debug, Clone)]
pub struct RequestBuilder {
    base_url: String,
    access_token: String,
    user_agent: String,
}

impl RequestBuilder {
    pub fn new(config: &ClientConfig) -> Self {
        RequestBuilder {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            access_token: config.access_token.clone(),
            user_agent: config.user_agent.clone(),
        }
    }

    /// Resolves `path` against the base URL and attaches the standard
    /// headers. The result is a GET with no body; the client layers method,
    /// body, and `Content-Type` on top for writes.
    ///
    /// `path` is concatenated as-is beyond slash normalization; malformed
    /// selectors are the server's concern.
    pub fn build(&self, path: &str) -> ApiRequest {
        ApiRequest {
            method: Method::GET,
            url: format!("{}/{}", self.base_url, path.trim_start_matches('/')),
            headers: vec![
                (
                    "Authorization".to_string(),
                    format!("Bearer {}", self.access_token),
                ),
                ("Accept".to_string(), "application/json".to_string()),
                ("User-Agent".to_string(), self.user_agent.clone()),
            ],
            body: None,
        }
    }
}
