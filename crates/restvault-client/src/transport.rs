//! HTTP transport seam.
//!
//! [`VaultClient`](crate::VaultClient) builds [`ApiRequest`] values and hands
//! them to a [`Transport`]. Production uses [`HttpTransport`] over reqwest;
//! tests substitute recording implementations to observe exactly what would
//! go on the wire without a live vault.

use async_trait::async_trait;
use restvault_core::prelude::*;

/// HTTP methods the vault API uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Patch,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Patch => "PATCH",
        }
    }
}

/// A fully described request, independent of the HTTP library.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub url: String,
    pub query: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl ApiRequest {
    pub fn get(url: impl Into<String>) -> Self {
        Self::new(Method::Get, url)
    }

    pub fn post(url: impl Into<String>) -> Self {
        Self::new(Method::Post, url)
    }

    pub fn patch(url: impl Into<String>) -> Self {
        Self::new(Method::Patch, url)
    }

    fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            query: vec![],
            headers: vec![],
            body: None,
        }
    }

    /// Add a query parameter
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Add a header
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((key.into(), value.into()));
        self
    }

    /// Set the request body
    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Look up a header value by name (test support)
    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// A raw response: status plus body text. Status interpretation lives in the
/// client's dispatch wrapper, not here.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Parse the body as JSON
    pub fn json(&self) -> Result<serde_json::Value> {
        serde_json::from_str(&self.body).map_err(|e| {
            Error::server(self.status, format!("Invalid JSON in response body: {e}"))
        })
    }
}

/// The single seam between the client and the network.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Execute one request to completion or to the configured timeout.
    async fn execute(&self, request: &ApiRequest) -> Result<ApiResponse>;
}

/// Production transport over a reqwest client built once per configuration.
pub struct HttpTransport {
    inner: reqwest::Client,
}

impl HttpTransport {
    /// Build a transport honoring the configured timeout and TLS policy.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let inner = reqwest::Client::builder()
            .timeout(config.timeout)
            .danger_accept_invalid_certs(!config.verify_ssl)
            .build()
            .map_err(|e| Error::transport(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self { inner })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn execute(&self, request: &ApiRequest) -> Result<ApiResponse> {
        let method = match request.method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Patch => reqwest::Method::PATCH,
        };

        let mut req = self.inner.request(method, &request.url);
        if !request.query.is_empty() {
            req = req.query(&request.query);
        }
        for (key, value) in &request.headers {
            req = req.header(key.as_str(), value.as_str());
        }
        if let Some(body) = &request.body {
            req = req.body(body.clone());
        }

        let response = req.send().await.map_err(|e| {
            if e.is_timeout() {
                Error::transport(format!("Request timed out: {e}"))
            } else if e.is_connect() {
                Error::transport(format!("Connection failed: {e}"))
            } else {
                Error::transport(format!("Request failed: {e}"))
            }
        })?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| Error::transport(format!("Failed to read response body: {e}")))?;

        Ok(ApiResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_builder() {
        let req = ApiRequest::post("https://127.0.0.1:27124/search/simple/")
            .query("query", "XYZ")
            .header("Content-Type", "text/markdown")
            .body("hello");

        assert_eq!(req.method.as_str(), "POST");
        assert_eq!(req.query.len(), 1);
        assert_eq!(req.header_value("content-type"), Some("text/markdown"));
        assert_eq!(req.body.as_deref(), Some("hello"));
    }

    #[test]
    fn test_response_json_error_carries_status() {
        let resp = ApiResponse::new(200, "not json");
        let err = resp.json().unwrap_err();
        assert_eq!(err.kind(), "server");
    }
}
