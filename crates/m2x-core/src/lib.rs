//! # M2X Core
//!
//! Endpoint-mapping convention for the M2X device-management API.
//!
//! This crate provides:
//! - The [`Transport`] contract every HTTP backend implements
//! - URL templating with percent-encoded path segments
//! - The endpoint table mapping each logical operation to a method, a path
//!   template, a parameter placement and an optional content-type override
//! - Timestamped stream value model
//!
//! ## Parameter placement
//!
//! - Reads put caller parameters in the query string
//! - Writes put caller parameters in the JSON body
//! - Device update and multi-stream posts force `Content-Type: application/json`

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod endpoint;
pub mod error;
pub mod template;
pub mod transport;
pub mod values;

pub use endpoint::{Endpoint, Placement};
pub use error::ClientError;
pub use template::{encode_path_segment, expand};
pub use transport::{Method, Params, RequestOptions, Response, Transport, CONTENT_TYPE_JSON};
pub use values::StreamValue;
