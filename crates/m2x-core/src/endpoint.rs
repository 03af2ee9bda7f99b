//! Endpoint table for the M2X API.
//!
//! Each [`Endpoint`] fixes the HTTP method, the path template, where caller
//! parameters go, and whether the request forces a JSON content type.
//! Resource clients never build requests by hand; they look up an entry
//! here and call [`Endpoint::call`].

use crate::error::ClientError;
use crate::template::expand;
use crate::transport::{Method, Params, RequestOptions, Response, Transport, CONTENT_TYPE_JSON};

/// Where caller-supplied parameters are placed in the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// The operation takes no parameters
    None,
    /// Parameters go in the query string (reads)
    Query,
    /// Parameters go in the request body (writes)
    Body,
}

/// A single API operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Endpoint {
    /// Operation name, used for logging and lookup
    pub name: &'static str,
    /// HTTP method
    pub method: Method,
    /// Path template with positional placeholders
    pub template: &'static str,
    /// Parameter placement
    pub placement: Placement,
    /// Force `Content-Type: application/json`
    pub json: bool,
}

impl Endpoint {
    const fn new(name: &'static str, method: Method, template: &'static str, placement: Placement) -> Self {
        Self {
            name,
            method,
            template,
            placement,
            json: false,
        }
    }

    const fn json(mut self) -> Self {
        self.json = true;
        self
    }

    /// Resolve the path for the given identifiers.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidArgument`] if an identifier is missing
    /// or empty.
    pub fn path(&self, args: &[&str]) -> Result<String, ClientError> {
        expand(self.template, args)
    }

    /// Place parameters according to this endpoint's rules.
    ///
    /// Parameters passed to an endpoint with [`Placement::None`] are dropped.
    #[must_use]
    pub fn options(&self, params: Params) -> RequestOptions {
        let mut options = match self.placement {
            Placement::None => RequestOptions::default(),
            Placement::Query => RequestOptions::with_query(params),
            Placement::Body => RequestOptions::with_body(params),
        };
        if self.json {
            options
                .headers
                .push(("Content-Type".to_string(), CONTENT_TYPE_JSON.to_string()));
        }
        options
    }

    /// Build the full request: resolved path plus placed parameters.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidArgument`] if an identifier is missing
    /// or empty.
    pub fn prepare(&self, args: &[&str], params: Params) -> Result<(String, RequestOptions), ClientError> {
        Ok((self.path(args)?, self.options(params)))
    }

    /// Issue this operation through a transport.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidArgument`] before any request is sent if
    /// an identifier is missing, otherwise forwards the transport's outcome
    /// unchanged.
    pub async fn call<T: Transport>(
        &self,
        transport: &T,
        args: &[&str],
        params: Params,
    ) -> Result<Response, ClientError> {
        let (path, options) = self.prepare(args, params)?;
        tracing::debug!(operation = self.name, method = %self.method, path, "M2X request");
        transport.request(self.method, &path, options).await
    }
}

/// Device resource endpoints.
pub mod devices {
    use super::{Endpoint, Method, Placement};

    /// List/search the public device catalog
    pub const CATALOG: Endpoint = Endpoint::new("catalog", Method::Get, "/devices/catalog", Placement::Query);
    /// List/search devices
    pub const SEARCH: Endpoint = Endpoint::new("search", Method::Get, "/devices", Placement::Query);
    /// List device groups
    pub const GROUPS: Endpoint = Endpoint::new("groups", Method::Get, "/devices/groups", Placement::None);
    /// Create a device
    pub const CREATE: Endpoint = Endpoint::new("create", Method::Post, "/devices", Placement::Body);
    /// Update device details
    pub const UPDATE: Endpoint = Endpoint::new("update", Method::Put, "/devices/{0}", Placement::Body).json();
    /// View device details
    pub const VIEW: Endpoint = Endpoint::new("view", Method::Get, "/devices/{0}", Placement::None);
    /// Read device location
    pub const LOCATION: Endpoint = Endpoint::new("location", Method::Get, "/devices/{0}/location", Placement::None);
    /// Update device location
    pub const UPDATE_LOCATION: Endpoint =
        Endpoint::new("updateLocation", Method::Put, "/devices/{0}/location", Placement::Body);
    /// List data streams
    pub const STREAMS: Endpoint = Endpoint::new("streams", Method::Get, "/devices/{0}/streams", Placement::None);
    /// Create or update a data stream
    pub const UPDATE_STREAM: Endpoint =
        Endpoint::new("updateStream", Method::Put, "/devices/{0}/streams/{1}", Placement::Body);
    /// Set the current stream value
    pub const SET_STREAM_VALUE: Endpoint =
        Endpoint::new("setStreamValue", Method::Put, "/devices/{0}/streams/{1}/value", Placement::Body);
    /// View a data stream
    pub const STREAM: Endpoint = Endpoint::new("stream", Method::Get, "/devices/{0}/streams/{1}", Placement::None);
    /// List stream values, most recent first
    pub const STREAM_VALUES: Endpoint =
        Endpoint::new("streamValues", Method::Get, "/devices/{0}/streams/{1}/values", Placement::Query);
    /// Sample stream values
    pub const SAMPLE_STREAM_VALUES: Endpoint =
        Endpoint::new("sampleStreamValues", Method::Get, "/devices/{0}/streams/{1}/sampling", Placement::Query);
    /// Stream statistics
    pub const STREAM_STATS: Endpoint =
        Endpoint::new("streamStats", Method::Get, "/devices/{0}/streams/{1}/stats", Placement::Query);
    /// Post timestamped values to a stream
    pub const POST_VALUES: Endpoint =
        Endpoint::new("postValues", Method::Post, "/devices/{0}/streams/{1}/values", Placement::Body);
    /// Delete stream values in a date range
    pub const DELETE_STREAM_VALUES: Endpoint =
        Endpoint::new("deleteStreamValues", Method::Delete, "/devices/{0}/streams/{1}/values", Placement::Body);
    /// Delete a stream and its values
    pub const DELETE_STREAM: Endpoint =
        Endpoint::new("deleteStream", Method::Delete, "/devices/{0}/streams/{1}", Placement::None);
    /// Post values to several streams at once
    pub const POST_MULTIPLE: Endpoint =
        Endpoint::new("postMultiple", Method::Post, "/devices/{0}/updates", Placement::Body).json();
    /// List triggers
    pub const TRIGGERS: Endpoint = Endpoint::new("triggers", Method::Get, "/devices/{0}/triggers", Placement::None);
    /// Create a trigger
    pub const CREATE_TRIGGER: Endpoint =
        Endpoint::new("createTrigger", Method::Post, "/devices/{0}/triggers", Placement::Body);
    /// View a trigger
    pub const TRIGGER: Endpoint = Endpoint::new("trigger", Method::Get, "/devices/{0}/triggers/{1}", Placement::None);
    /// Update a trigger
    pub const UPDATE_TRIGGER: Endpoint =
        Endpoint::new("updateTrigger", Method::Put, "/devices/{0}/triggers/{1}", Placement::Body);
    /// Fire a trigger with a synthetic value
    pub const TEST_TRIGGER: Endpoint =
        Endpoint::new("testTrigger", Method::Post, "/devices/{0}/triggers/{1}", Placement::None);
    /// Delete a trigger
    pub const DELETE_TRIGGER: Endpoint =
        Endpoint::new("deleteTrigger", Method::Delete, "/devices/{0}/triggers/{1}", Placement::None);
    /// Device request log
    pub const LOG: Endpoint = Endpoint::new("log", Method::Get, "/devices/{0}/log", Placement::None);
    /// Delete a device
    pub const DELETE: Endpoint = Endpoint::new("deleteDevice", Method::Delete, "/devices/{0}", Placement::None);

    /// Every device endpoint, in catalog order.
    pub const ALL: &[Endpoint] = &[
        CATALOG,
        SEARCH,
        GROUPS,
        CREATE,
        UPDATE,
        VIEW,
        LOCATION,
        UPDATE_LOCATION,
        STREAMS,
        UPDATE_STREAM,
        SET_STREAM_VALUE,
        STREAM,
        STREAM_VALUES,
        SAMPLE_STREAM_VALUES,
        STREAM_STATS,
        POST_VALUES,
        DELETE_STREAM_VALUES,
        DELETE_STREAM,
        POST_MULTIPLE,
        TRIGGERS,
        CREATE_TRIGGER,
        TRIGGER,
        UPDATE_TRIGGER,
        TEST_TRIGGER,
        DELETE_TRIGGER,
        LOG,
        DELETE,
    ];
}

/// API key endpoints.
pub mod keys {
    use super::{Endpoint, Method, Placement};

    /// List keys
    pub const LIST: Endpoint = Endpoint::new("listKeys", Method::Get, "/keys", Placement::Query);
    /// Create a key
    pub const CREATE: Endpoint = Endpoint::new("createKey", Method::Post, "/keys", Placement::Body);
    /// View a key
    pub const VIEW: Endpoint = Endpoint::new("viewKey", Method::Get, "/keys/{0}", Placement::None);
    /// Update a key
    pub const UPDATE: Endpoint = Endpoint::new("updateKey", Method::Put, "/keys/{0}", Placement::Body);
    /// Regenerate a key's token
    pub const REGENERATE: Endpoint =
        Endpoint::new("regenerateKey", Method::Post, "/keys/{0}/regenerate", Placement::None);
    /// Delete a key
    pub const DELETE: Endpoint = Endpoint::new("deleteKey", Method::Delete, "/keys/{0}", Placement::None);

    /// Every key endpoint.
    pub const ALL: &[Endpoint] = &[LIST, CREATE, VIEW, UPDATE, REGENERATE, DELETE];
}

/// Look up an endpoint by operation name across all resources.
#[must_use]
pub fn find(name: &str) -> Option<Endpoint> {
    devices::ALL
        .iter()
        .chain(keys::ALL)
        .find(|e| e.name == name)
        .copied()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn params() -> Params {
        let mut p = Params::new();
        p.insert("name".to_string(), json!("thermostat"));
        p
    }

    #[test]
    fn reads_use_query() {
        for endpoint in devices::ALL.iter().filter(|e| e.method == Method::Get) {
            let options = endpoint.options(params());
            assert!(options.body.is_none(), "{} must not carry a body", endpoint.name);
            if endpoint.placement == Placement::Query {
                assert_eq!(options.query, params(), "{}", endpoint.name);
            }
        }
    }

    #[test]
    fn writes_use_body() {
        for endpoint in devices::ALL
            .iter()
            .filter(|e| e.placement == Placement::Body)
        {
            assert_ne!(endpoint.method, Method::Get, "{}", endpoint.name);
            let options = endpoint.options(params());
            assert!(options.query.is_empty(), "{}", endpoint.name);
            assert_eq!(options.body, Some(params()), "{}", endpoint.name);
        }
    }

    #[test]
    fn only_update_and_post_multiple_force_json() {
        let forced: Vec<_> = devices::ALL
            .iter()
            .filter(|e| e.options(Params::new()).header("content-type").is_some())
            .map(|e| e.name)
            .collect();
        assert_eq!(forced, vec!["update", "postMultiple"]);
    }

    #[test]
    fn no_placement_drops_params() {
        let options = devices::VIEW.options(params());
        assert_eq!(options, RequestOptions::default());
    }

    #[test]
    fn prepare_resolves_path() {
        let (path, options) = devices::STREAM_VALUES
            .prepare(&["dev-1", "temperature"], Params::new())
            .unwrap();
        assert_eq!(path, "/devices/dev-1/streams/temperature/values");
        assert!(options.query.is_empty());
    }

    #[test]
    fn prepare_rejects_missing_id() {
        assert!(matches!(
            devices::TRIGGER.prepare(&["dev-1"], Params::new()),
            Err(ClientError::InvalidArgument(_))
        ));
    }

    #[test]
    fn names_are_unique() {
        let mut names: Vec<_> = devices::ALL.iter().chain(keys::ALL).map(|e| e.name).collect();
        let total = names.len();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), total);
    }

    #[test]
    fn find_by_name() {
        assert_eq!(find("postMultiple"), Some(devices::POST_MULTIPLE));
        assert_eq!(find("regenerateKey"), Some(keys::REGENERATE));
        assert_eq!(find("nope"), None);
    }
}
