//! The envelope payload and the event that carries it.
//!
//! [`Envelope`] is the only structure that crosses the wire between the
//! source and sink services. Its `data` field is opaque: neither service
//! inspects it, and the sink only stringifies it for display.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::de::{self, IgnoredAny, MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::{EventType, SourceUri};

// ---------------------------------------------------------------------------
// Envelope
// ---------------------------------------------------------------------------

/// A datagram passed from the source service to the sink service.
///
/// JSON form: `{"origin": "curl/7.1", "data": "aGVsbG8="}`. `data` is encoded
/// as standard padded base64, so arbitrary binary payloads survive the trip.
///
/// Decoding is lenient in the same places the producer's JSON library is:
/// keys match case-insensitively (`"Origin"`, `"DATA"`), unknown keys are
/// ignored, missing fields decode as empty, `"origin": null` leaves the
/// origin unchanged and `"data": null` clears the payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Envelope {
    /// Identifies the original producer, e.g. the caller's user agent.
    pub origin: String,

    /// The blob of information being forwarded, copied verbatim.
    #[serde(serialize_with = "base64_bytes::serialize")]
    pub data: Vec<u8>,
}

impl Envelope {
    /// Creates an [`Envelope`] from an origin label and raw payload bytes.
    pub fn new(origin: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        Self {
            origin: origin.into(),
            data: data.into(),
        }
    }

    /// Decodes the first JSON value in `bytes` as an envelope.
    ///
    /// Anything after that value is not read, so trailing data never causes
    /// a failure. Empty or whitespace-only input is an error.
    pub fn decode_first(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::Deserializer::from_slice(bytes)
            .into_iter::<Self>()
            .next()
            .unwrap_or_else(|| Err(de::Error::custom("EOF while parsing an envelope")))
    }

    /// Formats the envelope as a human-readable notification line.
    ///
    /// The payload is decoded as UTF-8; invalid sequences become U+FFFD.
    pub fn display_text(&self) -> String {
        format!(
            "Important message from '{}': {}",
            self.origin,
            String::from_utf8_lossy(&self.data)
        )
    }
}

impl<'de> Deserialize<'de> for Envelope {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(EnvelopeVisitor)
    }
}

struct EnvelopeVisitor;

impl<'de> Visitor<'de> for EnvelopeVisitor {
    type Value = Envelope;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an envelope object")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Envelope, A::Error> {
        let mut envelope = Envelope::default();
        while let Some(key) = map.next_key::<String>()? {
            if key.eq_ignore_ascii_case("origin") {
                if let Some(origin) = map.next_value::<Option<String>>()? {
                    envelope.origin = origin;
                }
            } else if key.eq_ignore_ascii_case("data") {
                envelope.data = map.next_value::<Base64Bytes>()?.0;
            } else {
                map.next_value::<IgnoredAny>()?;
            }
        }
        Ok(envelope)
    }
}

#[derive(Deserialize)]
struct Base64Bytes(#[serde(deserialize_with = "base64_bytes::deserialize")] Vec<u8>);

/// Serde adapter encoding `Vec<u8>` as a standard base64 string.
///
/// `null` decodes as an empty payload.
mod base64_bytes {
    use base64::{engine::general_purpose::STANDARD, Engine};
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(data: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(data))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        match Option::<String>::deserialize(deserializer)? {
            Some(encoded) => STANDARD
                .decode(encoded.as_bytes())
                .map_err(|e| de::Error::custom(format!("data is not valid base64: {e}"))),
            None => Ok(Vec::new()),
        }
    }
}

// ---------------------------------------------------------------------------
// Event
// ---------------------------------------------------------------------------

/// An [`Envelope`] together with the metadata an eventing transport needs to
/// route it.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    /// Unique identifier of this occurrence.
    pub id: String,
    /// What kind of occurrence this is.
    pub event_type: EventType,
    /// Who produced it.
    pub source: SourceUri,
    /// When it was produced.
    pub time: DateTime<Utc>,
    /// The payload.
    pub data: Envelope,
}

impl Event {
    /// Creates an event with a fresh UUIDv4 id stamped with the current time.
    pub fn new(event_type: EventType, source: SourceUri, data: Envelope) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            event_type,
            source,
            time: Utc::now(),
            data,
        }
    }
}
