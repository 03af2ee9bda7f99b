//! Transport contract consumed by the resource clients.
//!
//! A [`Transport`] issues one HTTP request per call and resolves to exactly
//! one outcome: a [`Response`] or a [`ClientError`]. Authentication,
//! serialization, status mapping, timeouts and cancellation all belong to
//! the transport implementation.

use crate::error::ClientError;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::fmt;
use std::future::Future;

/// Header value forced on structured (nested) request payloads.
pub const CONTENT_TYPE_JSON: &str = "application/json";

/// Flat key/value parameter set used for query strings and request bodies.
pub type Params = Map<String, Value>;

/// HTTP method of an API operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    /// GET
    Get,
    /// POST
    Post,
    /// PUT
    Put,
    /// DELETE
    Delete,
}

impl Method {
    /// Upper-case method name as sent on the wire.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-request options handed to the transport.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestOptions {
    /// Query-string parameters
    pub query: Params,
    /// Request body, serialized as a JSON object
    pub body: Option<Params>,
    /// Extra headers, applied after the transport's own headers
    pub headers: Vec<(String, String)>,
}

impl RequestOptions {
    /// Options carrying only a query string.
    #[must_use]
    pub fn with_query(query: Params) -> Self {
        Self {
            query,
            ..Self::default()
        }
    }

    /// Options carrying only a body.
    #[must_use]
    pub fn with_body(body: Params) -> Self {
        Self {
            body: Some(body),
            ..Self::default()
        }
    }

    /// Look up a header value by case-insensitive name.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Successful API response.
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    /// HTTP status code (always 2xx)
    pub status: u16,
    /// Parsed JSON body, `None` when the server sent no content
    pub body: Option<Value>,
}

impl Response {
    /// Returns `true` if the response carried no body (e.g. 204 No Content).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.body.is_none()
    }

    /// Deserialize the body into a typed value.
    ///
    /// Returns `Ok(None)` for empty responses.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Parse`] if the body does not match `T`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<Option<T>, ClientError> {
        self.body
            .as_ref()
            .map(|body| T::deserialize(body).map_err(|e| ClientError::Parse(e.to_string())))
            .transpose()
    }
}

/// Generic HTTP transport.
///
/// Implementations only need [`Transport::request`]; the verb helpers
/// delegate to it.
pub trait Transport: Send + Sync {
    /// Issue a single request.
    fn request(
        &self,
        method: Method,
        path: &str,
        options: RequestOptions,
    ) -> impl Future<Output = Result<Response, ClientError>> + Send;

    /// Issue a GET request.
    fn get(
        &self,
        path: &str,
        options: RequestOptions,
    ) -> impl Future<Output = Result<Response, ClientError>> + Send {
        self.request(Method::Get, path, options)
    }

    /// Issue a POST request.
    fn post(
        &self,
        path: &str,
        options: RequestOptions,
    ) -> impl Future<Output = Result<Response, ClientError>> + Send {
        self.request(Method::Post, path, options)
    }

    /// Issue a PUT request.
    fn put(
        &self,
        path: &str,
        options: RequestOptions,
    ) -> impl Future<Output = Result<Response, ClientError>> + Send {
        self.request(Method::Put, path, options)
    }

    /// Issue a DELETE request.
    fn delete(
        &self,
        path: &str,
        options: RequestOptions,
    ) -> impl Future<Output = Result<Response, ClientError>> + Send {
        self.request(Method::Delete, path, options)
    }
}
