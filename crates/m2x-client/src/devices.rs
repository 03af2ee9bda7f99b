//! Device resource client.
//!
//! Wraps the `/devices` resource: device CRUD, location, data streams,
//! triggers and the request log, plus device-scoped API keys. Each method
//! issues exactly one request (or none, when an identifier is empty or a
//! dot segment).

use crate::keys::Keys;
use m2x_core::endpoint::devices;
use m2x_core::{ClientError, Params, Response, StreamValue, Transport};
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Client for the `/devices` resource.
#[derive(Debug)]
pub struct Devices<T> {
    transport: Arc<T>,
    keys: Keys<T>,
}

impl<T> Clone for Devices<T> {
    fn clone(&self) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
            keys: self.keys.clone(),
        }
    }
}

impl<T: Transport> Devices<T> {
    /// Create a device client; `keys` handles device-scoped key operations.
    #[must_use]
    pub fn new(transport: Arc<T>, keys: Keys<T>) -> Self {
        Self { transport, keys }
    }

    /// List or search the catalog of public devices.
    ///
    /// Works without an API key.
    ///
    /// # Errors
    ///
    /// Forwards transport errors unchanged.
    pub async fn catalog(&self, params: Option<Params>) -> Result<Response, ClientError> {
        devices::CATALOG
            .call(&*self.transport, &[], params.unwrap_or_default())
            .await
    }

    /// Search devices accessible by the API key. Empty params list all devices.
    ///
    /// # Errors
    ///
    /// Forwards transport errors unchanged.
    pub async fn search(&self, params: Params) -> Result<Response, ClientError> {
        devices::SEARCH.call(&*self.transport, &[], params).await
    }

    /// List all devices accessible by the API key.
    ///
    /// # Errors
    ///
    /// Forwards transport errors unchanged.
    pub async fn list(&self) -> Result<Response, ClientError> {
        self.search(Params::new()).await
    }

    /// List device groups of the authenticated user.
    ///
    /// # Errors
    ///
    /// Forwards transport errors unchanged.
    pub async fn groups(&self) -> Result<Response, ClientError> {
        devices::GROUPS
            .call(&*self.transport, &[], Params::new())
            .await
    }

    /// Create a device.
    ///
    /// # Errors
    ///
    /// Forwards transport errors unchanged.
    pub async fn create(&self, params: Params) -> Result<Response, ClientError> {
        devices::CREATE.call(&*self.transport, &[], params).await
    }

    /// Update device details (name, visibility, metadata, tags).
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidArgument`] for an empty ID, otherwise
    /// forwards transport errors unchanged.
    pub async fn update(&self, id: &str, params: Params) -> Result<Response, ClientError> {
        devices::UPDATE.call(&*self.transport, &[id], params).await
    }

    /// View device details.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidArgument`] for an empty ID, otherwise
    /// forwards transport errors unchanged.
    pub async fn view(&self, id: &str) -> Result<Response, ClientError> {
        devices::VIEW
            .call(&*self.transport, &[id], Params::new())
            .await
    }

    /// Read the current device location.
    ///
    /// A device without a location yields an empty [`Response`]
    /// (204 No Content), not an error.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidArgument`] for an empty ID, otherwise
    /// forwards transport errors unchanged.
    pub async fn location(&self, id: &str) -> Result<Response, ClientError> {
        devices::LOCATION
            .call(&*self.transport, &[id], Params::new())
            .await
    }

    /// Update the current device location.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidArgument`] for an empty ID, otherwise
    /// forwards transport errors unchanged.
    pub async fn update_location(&self, id: &str, params: Params) -> Result<Response, ClientError> {
        devices::UPDATE_LOCATION
            .call(&*self.transport, &[id], params)
            .await
    }

    /// List the device's data streams.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidArgument`] for an empty ID, otherwise
    /// forwards transport errors unchanged.
    pub async fn streams(&self, id: &str) -> Result<Response, ClientError> {
        devices::STREAMS
            .call(&*self.transport, &[id], Params::new())
            .await
    }

    /// Create or update a data stream.
    ///
    /// The stream is created if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidArgument`] for an empty ID or name,
    /// otherwise forwards transport errors unchanged.
    pub async fn update_stream(
        &self,
        id: &str,
        name: &str,
        params: Params,
    ) -> Result<Response, ClientError> {
        devices::UPDATE_STREAM
            .call(&*self.transport, &[id, name], params)
            .await
    }

    /// Set the current value of a stream.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidArgument`] for an empty ID or name,
    /// otherwise forwards transport errors unchanged.
    pub async fn set_stream_value(
        &self,
        id: &str,
        name: &str,
        params: Params,
    ) -> Result<Response, ClientError> {
        devices::SET_STREAM_VALUE
            .call(&*self.transport, &[id, name], params)
            .await
    }

    /// View stream details.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidArgument`] for an empty ID or name,
    /// otherwise forwards transport errors unchanged.
    pub async fn stream(&self, id: &str, name: &str) -> Result<Response, ClientError> {
        devices::STREAM
            .call(&*self.transport, &[id, name], Params::new())
            .await
    }

    /// List stream values, most recent first.
    ///
    /// `None` and an empty filter set issue the same request.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidArgument`] for an empty ID or name,
    /// otherwise forwards transport errors unchanged.
    pub async fn stream_values(
        &self,
        id: &str,
        name: &str,
        params: Option<Params>,
    ) -> Result<Response, ClientError> {
        devices::STREAM_VALUES
            .call(&*self.transport, &[id, name], params.unwrap_or_default())
            .await
    }

    /// Sample stream values (`type`, `interval`, ...).
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidArgument`] for an empty ID or name,
    /// otherwise forwards transport errors unchanged.
    pub async fn sample_stream_values(
        &self,
        id: &str,
        name: &str,
        params: Params,
    ) -> Result<Response, ClientError> {
        devices::SAMPLE_STREAM_VALUES
            .call(&*self.transport, &[id, name], params)
            .await
    }

    /// Stream statistics over an optional time range.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidArgument`] for an empty ID or name,
    /// otherwise forwards transport errors unchanged.
    pub async fn stream_stats(
        &self,
        id: &str,
        name: &str,
        params: Option<Params>,
    ) -> Result<Response, ClientError> {
        devices::STREAM_STATS
            .call(&*self.transport, &[id, name], params.unwrap_or_default())
            .await
    }

    /// Post timestamped values to an existing stream.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidArgument`] for an empty ID or name,
    /// otherwise forwards transport errors unchanged.
    pub async fn post_values(
        &self,
        id: &str,
        name: &str,
        values: &[StreamValue],
    ) -> Result<Response, ClientError> {
        devices::POST_VALUES
            .call(&*self.transport, &[id, name], values_body(values)?)
            .await
    }

    /// Delete stream values between `from` and `end`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidArgument`] for an empty ID or name,
    /// otherwise forwards transport errors unchanged.
    pub async fn delete_stream_values(
        &self,
        id: &str,
        name: &str,
        params: Params,
    ) -> Result<Response, ClientError> {
        devices::DELETE_STREAM_VALUES
            .call(&*self.transport, &[id, name], params)
            .await
    }

    /// Delete a stream and all its values.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidArgument`] for an empty ID or name,
    /// otherwise forwards transport errors unchanged.
    pub async fn delete_stream(&self, id: &str, name: &str) -> Result<Response, ClientError> {
        devices::DELETE_STREAM
            .call(&*self.transport, &[id, name], Params::new())
            .await
    }

    /// Post values to several streams of a device in one request.
    ///
    /// Keys are stream names; every stream must already exist.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidArgument`] for an empty ID, otherwise
    /// forwards transport errors unchanged.
    pub async fn post_multiple(
        &self,
        id: &str,
        values: &BTreeMap<String, Vec<StreamValue>>,
    ) -> Result<Response, ClientError> {
        devices::POST_MULTIPLE
            .call(&*self.transport, &[id], values_body(values)?)
            .await
    }

    /// List the device's triggers.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidArgument`] for an empty ID, otherwise
    /// forwards transport errors unchanged.
    pub async fn triggers(&self, id: &str) -> Result<Response, ClientError> {
        devices::TRIGGERS
            .call(&*self.transport, &[id], Params::new())
            .await
    }

    /// Create a trigger.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidArgument`] for an empty ID, otherwise
    /// forwards transport errors unchanged.
    pub async fn create_trigger(&self, id: &str, params: Params) -> Result<Response, ClientError> {
        devices::CREATE_TRIGGER
            .call(&*self.transport, &[id], params)
            .await
    }

    /// View trigger details.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidArgument`] for an empty ID, otherwise
    /// forwards transport errors unchanged.
    pub async fn trigger(&self, id: &str, trigger_id: &str) -> Result<Response, ClientError> {
        devices::TRIGGER
            .call(&*self.transport, &[id, trigger_id], Params::new())
            .await
    }

    /// Update a trigger.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidArgument`] for an empty ID, otherwise
    /// forwards transport errors unchanged.
    pub async fn update_trigger(
        &self,
        id: &str,
        trigger_id: &str,
        params: Params,
    ) -> Result<Response, ClientError> {
        devices::UPDATE_TRIGGER
            .call(&*self.transport, &[id, trigger_id], params)
            .await
    }

    /// Fire a trigger with a synthetic value to exercise notification
    /// handling.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidArgument`] for an empty ID, otherwise
    /// forwards transport errors unchanged.
    pub async fn test_trigger(&self, id: &str, trigger_id: &str) -> Result<Response, ClientError> {
        devices::TEST_TRIGGER
            .call(&*self.transport, &[id, trigger_id], Params::new())
            .await
    }

    /// Delete a trigger.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidArgument`] for an empty ID, otherwise
    /// forwards transport errors unchanged.
    pub async fn delete_trigger(&self, id: &str, trigger_id: &str) -> Result<Response, ClientError> {
        devices::DELETE_TRIGGER
            .call(&*self.transport, &[id, trigger_id], Params::new())
            .await
    }

    /// Request log of the device.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidArgument`] for an empty ID, otherwise
    /// forwards transport errors unchanged.
    pub async fn log(&self, id: &str) -> Result<Response, ClientError> {
        devices::LOG
            .call(&*self.transport, &[id], Params::new())
            .await
    }

    /// Delete a device.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidArgument`] for an empty ID, otherwise
    /// forwards transport errors unchanged.
    pub async fn delete_device(&self, id: &str) -> Result<Response, ClientError> {
        devices::DELETE
            .call(&*self.transport, &[id], Params::new())
            .await
    }

    /// List API keys bound to the device.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidArgument`] for an empty ID, otherwise
    /// forwards transport errors unchanged.
    pub async fn keys(&self, id: &str) -> Result<Response, ClientError> {
        require_id(id)?;
        let mut params = Params::new();
        params.insert("device".to_string(), json!(id));
        self.keys.list(Some(params)).await
    }

    /// Create an API key bound to the device.
    ///
    /// Passing a `stream` parameter restricts the key to that stream.
    /// The device ID always replaces a `device` field in `params`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidArgument`] for an empty ID, otherwise
    /// forwards transport errors unchanged.
    pub async fn create_key(&self, id: &str, params: Params) -> Result<Response, ClientError> {
        self.keys.create(scope_to_device(params, id)?).await
    }

    /// Update an API key bound to the device.
    ///
    /// The device ID always replaces a `device` field in `params`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidArgument`] for an empty ID or key,
    /// otherwise forwards transport errors unchanged.
    pub async fn update_key(
        &self,
        id: &str,
        key: &str,
        params: Params,
    ) -> Result<Response, ClientError> {
        self.keys.update(key, scope_to_device(params, id)?).await
    }
}

fn require_id(id: &str) -> Result<(), ClientError> {
    if id.is_empty() {
        return Err(ClientError::InvalidArgument(
            "device ID must not be empty".to_string(),
        ));
    }
    Ok(())
}

/// Merge the device ID into key parameters. The device ID wins.
fn scope_to_device(mut params: Params, id: &str) -> Result<Params, ClientError> {
    require_id(id)?;
    let device = json!(id);
    if let Some(previous) = params.insert("device".to_string(), device.clone()) {
        if previous != device {
            tracing::warn!(%previous, device = id, "Overriding device field in key parameters");
        }
    }
    Ok(params)
}

/// Wrap serialized values as `{"values": ...}`.
fn values_body<V: serde::Serialize + ?Sized>(values: &V) -> Result<Params, ClientError> {
    let values: Value = serde_json::to_value(values)
        .map_err(|e| ClientError::InvalidArgument(format!("unserializable values: {e}")))?;
    let mut body = Params::new();
    body.insert("values".to_string(), values);
    Ok(body)
}
