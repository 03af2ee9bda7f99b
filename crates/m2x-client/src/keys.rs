//! API key management.
//!
//! Keys can be master keys, device keys (scoped by a `device` parameter) or
//! stream keys (scoped by `device` plus `stream`).

use m2x_core::endpoint::keys;
use m2x_core::{ClientError, Params, Response, Transport};
use std::sync::Arc;

/// Client for the `/keys` resource.
#[derive(Debug)]
pub struct Keys<T> {
    transport: Arc<T>,
}

impl<T> Clone for Keys<T> {
    fn clone(&self) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
        }
    }
}

impl<T: Transport> Keys<T> {
    /// Create a key client over a shared transport.
    #[must_use]
    pub fn new(transport: Arc<T>) -> Self {
        Self { transport }
    }

    /// List keys, optionally filtered (e.g. by `device`).
    ///
    /// # Errors
    ///
    /// Forwards transport errors unchanged.
    pub async fn list(&self, params: Option<Params>) -> Result<Response, ClientError> {
        keys::LIST
            .call(&*self.transport, &[], params.unwrap_or_default())
            .await
    }

    /// Create a key.
    ///
    /// # Errors
    ///
    /// Forwards transport errors unchanged.
    pub async fn create(&self, params: Params) -> Result<Response, ClientError> {
        keys::CREATE.call(&*self.transport, &[], params).await
    }

    /// View key details.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidArgument`] for an empty key, otherwise
    /// forwards transport errors unchanged.
    pub async fn view(&self, key: &str) -> Result<Response, ClientError> {
        keys::VIEW.call(&*self.transport, &[key], Params::new()).await
    }

    /// Update key properties.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidArgument`] for an empty key, otherwise
    /// forwards transport errors unchanged.
    pub async fn update(&self, key: &str, params: Params) -> Result<Response, ClientError> {
        keys::UPDATE.call(&*self.transport, &[key], params).await
    }

    /// Regenerate the key token; the old token stops working.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidArgument`] for an empty key, otherwise
    /// forwards transport errors unchanged.
    pub async fn regenerate(&self, key: &str) -> Result<Response, ClientError> {
        keys::REGENERATE
            .call(&*self.transport, &[key], Params::new())
            .await
    }

    /// Delete a key.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidArgument`] for an empty key, otherwise
    /// forwards transport errors unchanged.
    pub async fn delete(&self, key: &str) -> Result<Response, ClientError> {
        keys::DELETE.call(&*self.transport, &[key], Params::new()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::RecordingTransport;
    use m2x_core::Method;
    use serde_json::json;

    fn setup() -> (Arc<RecordingTransport>, Keys<RecordingTransport>) {
        let transport = Arc::new(RecordingTransport::new());
        (Arc::clone(&transport), Keys::new(transport))
    }

    #[tokio::test]
    async fn create_posts_body() {
        let (transport, keys) = setup();
        let mut params = Params::new();
        params.insert("name".into(), json!("reader"));
        params.insert("permissions".into(), json!(["GET"]));

        keys.create(params.clone()).await.unwrap();

        let req = transport.only();
        assert_eq!(req.method, Method::Post);
        assert_eq!(req.path, "/keys");
        assert_eq!(req.options.body, Some(params));
        assert!(req.options.query.is_empty());
    }

    #[tokio::test]
    async fn list_without_filters() {
        let (transport, keys) = setup();
        keys.list(None).await.unwrap();

        let req = transport.only();
        assert_eq!(req.method, Method::Get);
        assert_eq!(req.path, "/keys");
        assert!(req.options.query.is_empty());
    }

    #[tokio::test]
    async fn key_scoped_paths() {
        let (transport, keys) = setup();
        keys.view("k1").await.unwrap();
        keys.update("k1", Params::new()).await.unwrap();
        keys.regenerate("k1").await.unwrap();
        keys.delete("k1").await.unwrap();

        let seen: Vec<_> = transport
            .requests()
            .into_iter()
            .map(|r| (r.method, r.path))
            .collect();
        assert_eq!(
            seen,
            vec![
                (Method::Get, "/keys/k1".to_string()),
                (Method::Put, "/keys/k1".to_string()),
                (Method::Post, "/keys/k1/regenerate".to_string()),
                (Method::Delete, "/keys/k1".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn empty_or_dot_key_sends_nothing() {
        let (transport, keys) = setup();
        let err = keys.delete("").await.unwrap_err();
        assert!(matches!(err, ClientError::InvalidArgument(_)));
        let err = keys.delete("..").await.unwrap_err();
        assert!(matches!(err, ClientError::InvalidArgument(_)));
        assert!(transport.requests().is_empty());
    }
}
