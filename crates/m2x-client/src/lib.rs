//! # M2X Client
//!
//! Async client for the M2X device-management HTTP API.
//!
//! Every method maps one-to-one onto a REST endpoint and resolves to a single
//! `Result`: the parsed [`Response`] or a [`ClientError`] carrying the HTTP
//! status and body. Nothing is cached between calls.
//!
//! ```no_run
//! use m2x_client::{Client, ClientConfig, StreamValue};
//!
//! # async fn run() -> Result<(), m2x_client::ClientError> {
//! let client = Client::new(ClientConfig::from_env()?)?;
//! let devices = client.devices();
//!
//! devices
//!     .post_values("abc123", "temperature", &[StreamValue::now(21.5)])
//!     .await?;
//! let latest = devices.stream_values("abc123", "temperature", None).await?;
//! # let _ = latest;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod devices;
pub mod http;
pub mod keys;

#[cfg(test)]
mod testing;

pub use config::ClientConfig;
pub use devices::Devices;
pub use http::HttpTransport;
pub use keys::Keys;
pub use m2x_core::{ClientError, Method, Params, RequestOptions, Response, StreamValue, Transport};

use std::sync::Arc;

/// Entry point handing out resource clients that share one transport.
#[derive(Debug)]
pub struct Client<T: Transport = HttpTransport> {
    transport: Arc<T>,
}

impl<T: Transport> Clone for Client<T> {
    fn clone(&self) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
        }
    }
}

impl Client<HttpTransport> {
    /// Create a client backed by [`HttpTransport`].
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be created.
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        Ok(Self::with_transport(HttpTransport::new(config)?))
    }
}

impl<T: Transport> Client<T> {
    /// Create a client over any transport.
    #[must_use]
    pub fn with_transport(transport: T) -> Self {
        Self {
            transport: Arc::new(transport),
        }
    }

    /// Device resource client.
    #[must_use]
    pub fn devices(&self) -> Devices<T> {
        Devices::new(Arc::clone(&self.transport), self.keys())
    }

    /// API key client.
    #[must_use]
    pub fn keys(&self) -> Keys<T> {
        Keys::new(Arc::clone(&self.transport))
    }

    /// Underlying transport.
    #[must_use]
    pub fn transport(&self) -> &T {
        &self.transport
    }
}
