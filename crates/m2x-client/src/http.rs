//! reqwest-backed [`Transport`].
//!
//! Sends every body as JSON, injects the API key header, and maps non-2xx
//! statuses to [`ClientError::ApiError`] with the raw body preserved.

use crate::config::ClientConfig;
use m2x_core::{ClientError, Method, Params, RequestOptions, Response, Transport};
use reqwest::Client;
use serde_json::Value;
use url::Url;

/// Header carrying the M2X API key.
pub const API_KEY_HEADER: &str = "X-M2X-KEY";

/// HTTP transport for the M2X API.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    config: ClientConfig,
}

impl HttpTransport {
    /// Create a new HTTP transport.
    ///
    /// # Errors
    ///
    /// Returns error if the base URL is invalid or the HTTP client cannot be
    /// created.
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let base = Url::parse(&config.base_url)
            .map_err(|e| ClientError::Init(format!("invalid base URL {}: {e}", config.base_url)))?;
        if base.cannot_be_a_base() {
            return Err(ClientError::Init(format!(
                "base URL {} cannot carry a path",
                config.base_url
            )));
        }
        if base.query().is_some() || base.fragment().is_some() {
            return Err(ClientError::Init(format!(
                "base URL {} must not have a query or fragment",
                config.base_url
            )));
        }

        let mut builder = Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone());

        if config.base_url.starts_with("https://") {
            builder = builder.use_rustls_tls();
        }

        let client = builder
            .build()
            .map_err(|e| ClientError::Init(e.to_string()))?;

        tracing::debug!(base_url = %config.base_url, authenticated = config.api_key.is_some(), "M2X transport ready");

        Ok(Self { client, config })
    }

    /// Configuration this transport was built with.
    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }
}

impl Transport for HttpTransport {
    async fn request(
        &self,
        method: Method,
        path: &str,
        options: RequestOptions,
    ) -> Result<Response, ClientError> {
        let url = self.url(path);

        tracing::debug!(%method, url, "HTTP request");

        let mut request = self.client.request(to_reqwest(method), &url);

        if !options.query.is_empty() {
            request = request.query(&query_pairs(&options.query));
        }

        if let Some(key) = &self.config.api_key {
            request = request.header(API_KEY_HEADER, key.as_str());
        }

        // Explicit headers go first so `json()` keeps a forced content type
        for (name, value) in &options.headers {
            request = request.header(name.as_str(), value.as_str());
        }

        if let Some(body) = &options.body {
            request = request.json(body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| ClientError::Request(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ClientError::Request(e.to_string()))?;

        if !status.is_success() {
            tracing::debug!(%method, url, status = status.as_u16(), "HTTP error status");
            return Err(ClientError::ApiError {
                status: status.as_u16(),
                message: text,
            });
        }

        let body = if text.trim().is_empty() {
            None
        } else {
            Some(serde_json::from_str(&text).map_err(|e| ClientError::Parse(e.to_string()))?)
        };

        Ok(Response {
            status: status.as_u16(),
            body,
        })
    }
}

fn to_reqwest(method: Method) -> reqwest::Method {
    match method {
        Method::Get => reqwest::Method::GET,
        Method::Post => reqwest::Method::POST,
        Method::Put => reqwest::Method::PUT,
        Method::Delete => reqwest::Method::DELETE,
    }
}

/// Flatten parameters into query pairs.
///
/// Strings are sent as-is, other scalars in their JSON text form, nulls are
/// skipped, and nested arrays or objects are sent as JSON text.
fn query_pairs(params: &Params) -> Vec<(String, String)> {
    params
        .iter()
        .filter_map(|(key, value)| {
            let text = match value {
                Value::Null => return None,
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            Some((key.clone(), text))
        })
        .collect()
}
