//! Events as they travel through the forwarder

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Attribute holding the event payload
pub const DATA: &str = "data";

const JSON: &str = "application/json";

/// Event as received, independent of the encoding it arrived in
///
/// Attribute names map to their values; the payload lives under [`DATA`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Event {
    attributes: Map<String, Value>,
}

impl Event {
    /// Creates an empty [`Event`]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets an attribute, replacing any previous value
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        let _ = self.attributes.insert(name.into(), value.into());
    }

    /// Looks an attribute up by name
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.attributes.get(name)
    }

    /// Event id, empty when missing
    pub fn id(&self) -> &str {
        self.text("id")
    }

    /// Event source, empty when missing
    pub fn source(&self) -> &str {
        self.text("source")
    }

    fn text(&self, name: &str) -> &str {
        self.get(name).and_then(Value::as_str).unwrap_or_default()
    }
}

impl From<Map<String, Value>> for Event {
    fn from(attributes: Map<String, Value>) -> Self {
        Self { attributes }
    }
}

impl std::fmt::Display for Event {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", Value::Object(self.attributes.clone()))
    }
}

/// Event wrapped for structured-mode CloudEvents delivery
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CloudEvent {
    /// CloudEvents specification version
    pub specversion: String,

    /// Event identifier, unique per source
    pub id: String,

    /// Context in which the event happened
    pub source: String,

    /// Kind of event
    #[serde(rename = "type")]
    pub kind: String,

    /// Media type of [`CloudEvent::data`]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub datacontenttype: Option<String>,

    /// Schema [`CloudEvent::data`] adheres to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dataschema: Option<String>,

    /// Subject of the event within the source
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,

    /// When the event happened
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,

    /// Event payload
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,

    /// Extension attributes
    #[serde(flatten)]
    pub extensions: Map<String, Value>,
}

impl CloudEvent {
    /// Specification versions that can be delivered
    pub const SPEC_VERSIONS: [&'static str; 2] = ["1.0", "0.3"];
}

impl TryFrom<Event> for CloudEvent {
    type Error = Error;

    fn try_from(event: Event) -> Result<Self> {
        let mut cloud_event: CloudEvent = serde_json::from_value(Value::Object(event.attributes))
            .map_err(|error| Error::InvalidEvent(error.to_string()))?;

        if !Self::SPEC_VERSIONS.contains(&cloud_event.specversion.as_str()) {
            return Err(Error::InvalidEvent(format!(
                "unsupported specversion {:?}",
                cloud_event.specversion
            )));
        }

        for (name, value) in [
            ("id", &cloud_event.id),
            ("source", &cloud_event.source),
            ("type", &cloud_event.kind),
        ] {
            if value.is_empty() {
                return Err(Error::InvalidEvent(format!("{} must not be empty", name)));
            }
        }

        if cloud_event.data.is_some() && cloud_event.datacontenttype.is_none() {
            cloud_event.datacontenttype = Some(JSON.to_owned());
        }

        Ok(cloud_event)
    }
}
