//! Timestamped stream values.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single data point posted to or read from a stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamValue {
    /// Point in time of the reading; the server uses its own clock when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
    /// Numeric or alphanumeric reading
    pub value: Value,
}

impl StreamValue {
    /// Value stamped with the given time.
    #[must_use]
    pub fn at(timestamp: DateTime<Utc>, value: impl Into<Value>) -> Self {
        Self {
            timestamp: Some(timestamp),
            value: value.into(),
        }
    }

    /// Value stamped by the server on receipt.
    #[must_use]
    pub fn now(value: impl Into<Value>) -> Self {
        Self {
            timestamp: None,
            value: value.into(),
        }
    }
}
