//! URL templating for API paths.
//!
//! Path templates use positional placeholders (`{0}`, `{1}`, ...) that are
//! replaced with caller-supplied identifiers. Every substituted value is
//! percent-encoded as a single path segment, so an identifier can never
//! introduce extra segments, a query string or a fragment. The dot segments
//! `.` and `..` are rejected outright: URL normalization would resolve them
//! against the surrounding path whether escaped or not.
//!
//! Unreserved characters (`A-Z a-z 0-9 - . _ ~`) and most sub-delimiters
//! pass through unchanged, so ordinary device IDs and stream names appear
//! verbatim in the resulting path.

use crate::error::ClientError;
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};

/// Characters that must be percent-encoded inside a single path segment.
const PATH_SEGMENT_ESCAPE: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'<')
    .add(b'>')
    .add(b'`')
    .add(b'?')
    .add(b'{')
    .add(b'}')
    .add(b'/')
    .add(b'\\');

/// Percent-encode a value for use as one path segment.
///
/// # Examples
///
/// ```
/// use m2x_core::encode_path_segment;
///
/// assert_eq!(encode_path_segment("temperature"), "temperature");
/// assert_eq!(encode_path_segment("room 1/a"), "room%201%2Fa");
/// ```
#[must_use]
pub fn encode_path_segment(value: &str) -> String {
    utf8_percent_encode(value, PATH_SEGMENT_ESCAPE).to_string()
}

/// Expand a path template with positional arguments.
///
/// # Errors
///
/// Returns [`ClientError::InvalidArgument`] if an argument is empty or a
/// dot segment (`.` or `..`), if a
/// placeholder refers to a missing argument, or if the template itself is
/// malformed. No path is produced in that case.
///
/// # Examples
///
/// ```
/// use m2x_core::expand;
///
/// let path = expand("/devices/{0}/streams/{1}/values", &["abc123", "humidity"]).unwrap();
/// assert_eq!(path, "/devices/abc123/streams/humidity/values");
///
/// assert!(expand("/devices/{0}", &[""]).is_err());
/// ```
pub fn expand(template: &str, args: &[&str]) -> Result<String, ClientError> {
    let mut out = String::with_capacity(template.len() + args.iter().map(|a| a.len()).sum::<usize>());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let close = after.find('}').ok_or_else(|| {
            ClientError::InvalidArgument(format!("unterminated placeholder in {template}"))
        })?;

        let index: usize = after[..close].parse().map_err(|_| {
            ClientError::InvalidArgument(format!(
                "bad placeholder {{{}}} in {template}",
                &after[..close]
            ))
        })?;

        let value = args.get(index).ok_or_else(|| {
            ClientError::InvalidArgument(format!("missing argument {index} for {template}"))
        })?;
        if value.is_empty() {
            return Err(ClientError::InvalidArgument(format!(
                "argument {index} for {template} must not be empty"
            )));
        }
        if *value == "." || *value == ".." {
            return Err(ClientError::InvalidArgument(format!(
                "argument {index} for {template} must not be a dot segment"
            )));
        }

        out.push_str(&encode_path_segment(value));
        rest = &after[close + 1..];
    }

    out.push_str(rest);
    Ok(out)
}
