//! Turns inbound HTTP requests into [`Event`]s
//!
//! Two encodings are understood:
//! - structured, `application/cloudevents+json`, where the body is the whole event
//! - binary, `application/json`, where the body is the payload and the other
//!   attributes travel in `Ce-*` headers

use crate::{event::DATA, Error, Event, Result};
use axum::http::{header, HeaderMap};
use serde_json::{Map, Value};

/// Content type of structured-mode events
pub const STRUCTURED_CONTENT_TYPE: &str = "application/cloudevents+json";

/// Content type of binary-mode events
pub const BINARY_CONTENT_TYPE: &str = "application/json";

/// Prefix of headers carrying event attributes, in canonical lowercase form
pub const ATTRIBUTE_HEADER_PREFIX: &str = "ce-";

/// Builds an [`Event`] out of request headers and body
pub fn normalize(headers: &HeaderMap, body: &[u8]) -> Result<Event> {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .map(|value| String::from_utf8_lossy(value.as_bytes()).into_owned())
        .unwrap_or_default();

    if content_type.contains(STRUCTURED_CONTENT_TYPE) {
        let attributes: Map<String, Value> = serde_json::from_slice(body)?;

        Ok(Event::from(attributes))
    } else if content_type.contains(BINARY_CONTENT_TYPE) {
        let mut event = Event::new();

        for (name, value) in headers {
            if let Some(attribute) = name.as_str().strip_prefix(ATTRIBUTE_HEADER_PREFIX) {
                event.set(
                    attribute.to_lowercase(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                );
            }
        }

        let data: Map<String, Value> = serde_json::from_slice(body)?;
        event.set(DATA, data);

        Ok(event)
    } else {
        Err(Error::UnsupportedMediaType(content_type))
    }
}
