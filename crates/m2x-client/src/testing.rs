//! In-memory transport that records requests and replays canned outcomes.

use m2x_core::{ClientError, Method, RequestOptions, Response, Transport};
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::Mutex;

/// A request as seen by the transport.
#[derive(Debug, Clone, PartialEq)]
pub struct Recorded {
    pub method: Method,
    pub path: String,
    pub options: RequestOptions,
}

#[derive(Default)]
pub struct RecordingTransport {
    requests: Mutex<Vec<Recorded>>,
    replies: Mutex<VecDeque<Result<Response, ClientError>>>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the outcome of the next request; unqueued requests get `200 {}`.
    pub fn reply(&self, outcome: Result<Response, ClientError>) {
        self.replies.lock().unwrap().push_back(outcome);
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().unwrap().clone()
    }

    /// The single request issued so far.
    pub fn only(&self) -> Recorded {
        let requests = self.requests();
        assert_eq!(requests.len(), 1, "expected exactly one request");
        requests.into_iter().next().unwrap()
    }
}

impl Transport for RecordingTransport {
    async fn request(
        &self,
        method: Method,
        path: &str,
        options: RequestOptions,
    ) -> Result<Response, ClientError> {
        self.requests.lock().unwrap().push(Recorded {
            method,
            path: path.to_string(),
            options,
        });
        let next = self.replies.lock().unwrap().pop_front();
        next.unwrap_or(Ok(Response {
            status: 200,
            body: Some(Value::Object(serde_json::Map::new())),
        }))
    }
}
