//! HTTP transport shared by the service clients.
//!
//! Every endpoint of the delivery API answers with a `{ "data": ... }`
//! envelope. [`ApiClient`] resolves endpoints against the configured base URL,
//! attaches the bearer token when one is configured, and hands back the
//! unwrapped payload.

use std::time::Duration;

use log::debug;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::config::ApiConfig;

/// Errors returned by API calls. They are passed through to callers as-is.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Server responded with {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("Failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Invalid URL '{0}': {1}")]
    InvalidUrl(String, String),
}

impl ApiError {
    /// HTTP status for errors produced by a non-success response
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            ApiError::Transport(e) => e.status(),
            _ => None,
        }
    }
}

/// Response envelope used by every endpoint
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub data: T,
}

/// Thin JSON client bound to a base URL
#[derive(Clone, Debug)]
pub struct ApiClient {
    http: Client,
    base_url: Url,
    token: Option<String>,
}

impl ApiClient {
    /// Create a client with the default timeout and no token
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        Self::with_options(base_url, None, ApiConfig::default().timeout())
    }

    pub fn with_options(base_url: &str, token: Option<String>, timeout: Duration) -> Result<Self, ApiError> {
        let base_url = parse_base_url(base_url)?;
        let http = Client::builder().timeout(timeout).build()?;

        Ok(Self { http, base_url, token })
    }

    /// Create a client from the `[api]` config section, reading the token from
    /// the configured environment variable
    pub fn from_config(config: &ApiConfig) -> Result<Self, ApiError> {
        Self::with_options(&config.base_url, config.api_token(), config.timeout())
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolve a path relative to the base URL
    pub fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| ApiError::InvalidUrl(path.to_string(), e.to_string()))
    }

    /// Resolve a path and append caller-supplied segments to it.
    ///
    /// Each segment is percent-encoded, so ids containing `/`, `?` or `..`
    /// stay a single path segment.
    pub fn endpoint_with(&self, path: &str, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.endpoint(path)?;
        match url.path_segments_mut() {
            Ok(mut path_segments) => {
                path_segments.pop_if_empty().extend(segments);
            }
            Err(()) => return Err(ApiError::InvalidUrl(path.to_string(), "cannot be a base".to_string())),
        }
        Ok(url)
    }

    /// GET a resource and unwrap its envelope
    pub async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<T, ApiError> {
        self.fetch(self.request(Method::GET, url)).await
    }

    /// GET a resource with query parameters and unwrap its envelope
    pub async fn get_with_query<Q, T>(&self, url: Url, query: &Q) -> Result<T, ApiError>
    where
        Q: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.fetch(self.request(Method::GET, url).query(query)).await
    }

    /// POST a JSON body and unwrap the envelope of the response
    pub async fn post<B, T>(&self, url: Url, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.fetch(self.request(Method::POST, url).json(body)).await
    }

    /// PUT a JSON body and unwrap the envelope of the response
    pub async fn put<B, T>(&self, url: Url, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.fetch(self.request(Method::PUT, url).json(body)).await
    }

    /// POST a JSON body, only checking the response status
    pub async fn post_unit<B>(&self, url: Url, body: &B) -> Result<(), ApiError>
    where
        B: Serialize + ?Sized,
    {
        self.execute(self.request(Method::POST, url).json(body)).await?;
        Ok(())
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        debug!("{} {}", method, url);

        let mut builder = self.http.request(method, url);
        if let Some(token) = &self.token {
            builder = builder.bearer_auth(token);
        }
        builder
    }

    async fn execute(&self, builder: RequestBuilder) -> Result<Response, ApiError> {
        let response = builder.send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            debug!("Request failed with {}: {}", status, body);
            return Err(ApiError::Status { status, body });
        }

        Ok(response)
    }

    async fn fetch<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, ApiError> {
        let response = self.execute(builder).await?;
        let bytes = response.bytes().await?;
        let envelope: Envelope<T> = serde_json::from_slice(&bytes)?;
        Ok(envelope.data)
    }
}

/// Parse a base URL, making sure relative joins append to its path
pub fn parse_base_url(base_url: &str) -> Result<Url, ApiError> {
    let mut normalized = base_url.trim().to_string();
    if !normalized.ends_with('/') {
        normalized.push('/');
    }

    Url::parse(&normalized).map_err(|e| ApiError::InvalidUrl(base_url.to_string(), e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_keeps_base_path() {
        let client = ApiClient::new("https://api.example.com/v1").unwrap();
        assert_eq!(client.base_url().as_str(), "https://api.example.com/v1/");

        let url = client.endpoint("delivery-personnel/42/delete").unwrap();
        assert_eq!(url.as_str(), "https://api.example.com/v1/delivery-personnel/42/delete");

        let url = client.endpoint("/orders/reports/delivery").unwrap();
        assert_eq!(url.as_str(), "https://api.example.com/v1/orders/reports/delivery");
    }

    #[test]
    fn test_endpoint_with_encodes_segments() {
        let client = ApiClient::new("https://api.example.com/v1").unwrap();

        let url = client.endpoint_with("delivery-personnel", &["p3", "delete"]).unwrap();
        assert_eq!(url.as_str(), "https://api.example.com/v1/delivery-personnel/p3/delete");

        let url = client.endpoint_with("delivery-personnel", &["x/..", "delete"]).unwrap();
        assert_eq!(url.as_str(), "https://api.example.com/v1/delivery-personnel/x%2F../delete");

        let url = client.endpoint_with("delivery-personnel", &["a?b#c"]).unwrap();
        assert_eq!(url.path(), "/v1/delivery-personnel/a%3Fb%23c");
        assert_eq!(url.query(), None);
    }

    #[test]
    fn test_invalid_base_url() {
        let err = ApiClient::new("not a url").unwrap_err();
        assert!(matches!(err, ApiError::InvalidUrl(..)));
        assert_eq!(err.status(), None);
    }

    #[test]
    fn test_envelope_decoding() {
        let envelope: Envelope<Vec<u32>> = serde_json::from_str(r#"{"data":[1,2,3],"message":"ok"}"#).unwrap();
        assert_eq!(envelope.data, vec![1, 2, 3]);

        let missing: Result<Envelope<Vec<u32>>, _> = serde_json::from_str(r#"{"items":[]}"#);
        assert!(missing.is_err());
    }
}
