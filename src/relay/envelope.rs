//! Request and response bodies exchanged with callers and the upstream.

use axum::http::StatusCode;
use serde_json::{json, map::Entry, Map, Value};

use crate::relay::error::RelayError;

pub const METHOD_NOT_ALLOWED: &str = "Method not allowed";
pub const UPSTREAM_UNREACHABLE: &str = "Failed to reach onboarding service";

/// Body sent by the caller. Never validated.
#[derive(Debug, Clone, PartialEq)]
pub enum InboundBody {
    /// No payload at all.
    Empty,
    /// Any JSON value. Non-JSON text arrives here as a string.
    Json(Value),
}

const FORM_URLENCODED: &str = "application/x-www-form-urlencoded";

impl InboundBody {
    /// Decode the caller's body. Urlencoded forms become a JSON object
    /// (repeated keys collect into an array); everything else is parsed
    /// as JSON, falling back to a JSON string.
    pub fn from_bytes(content_type: Option<&str>, bytes: &[u8]) -> Self {
        if bytes.is_empty() {
            return InboundBody::Empty;
        }
        if content_type.is_some_and(is_form_urlencoded) {
            if let Ok(pairs) = serde_urlencoded::from_bytes::<Vec<(String, String)>>(bytes) {
                return InboundBody::Json(Value::Object(form_to_object(pairs)));
            }
        }
        match serde_json::from_slice(bytes) {
            Ok(value) => InboundBody::Json(value),
            Err(_) => InboundBody::Json(Value::String(String::from_utf8_lossy(bytes).into_owned())),
        }
    }

    /// Serialized payload for the upstream call.
    pub fn to_payload(&self) -> Result<Vec<u8>, RelayError> {
        match self {
            InboundBody::Empty => Ok(Vec::new()),
            InboundBody::Json(value) => serde_json::to_vec(value).map_err(RelayError::Encode),
        }
    }
}

fn is_form_urlencoded(content_type: &str) -> bool {
    content_type
        .split(';')
        .next()
        .is_some_and(|media| media.trim().eq_ignore_ascii_case(FORM_URLENCODED))
}

fn form_to_object(pairs: Vec<(String, String)>) -> Map<String, Value> {
    let mut object = Map::new();
    for (key, value) in pairs {
        match object.entry(key) {
            Entry::Vacant(slot) => {
                slot.insert(Value::String(value));
            }
            Entry::Occupied(mut slot) => match slot.get_mut() {
                Value::Array(values) => values.push(Value::String(value)),
                existing => {
                    let first = existing.take();
                    *existing = Value::Array(vec![first, Value::String(value)]);
                }
            },
        }
    }
    object
}

/// What the upstream answered, after the opportunistic parse.
#[derive(Debug, Clone, PartialEq)]
pub struct UpstreamReply {
    pub status: StatusCode,
    pub body: Value,
}

impl UpstreamReply {
    pub fn from_text(status: StatusCode, text: &str) -> Self {
        Self {
            status,
            body: parse_upstream_body(text),
        }
    }
}

/// JSON if it parses, `{ "raw": text }` otherwise.
pub fn parse_upstream_body(text: &str) -> Value {
    serde_json::from_str(text).unwrap_or_else(|_| json!({ "raw": text }))
}

/// Status and JSON body returned to the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct RelayResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl RelayResponse {
    pub fn method_not_allowed() -> Self {
        Self {
            status: StatusCode::METHOD_NOT_ALLOWED,
            body: json!({ "error": METHOD_NOT_ALLOWED }),
        }
    }

    pub fn transport_failure(err: &RelayError) -> Self {
        Self {
            status: StatusCode::BAD_GATEWAY,
            body: json!({
                "error": UPSTREAM_UNREACHABLE,
                "detail": err.detail(),
                "code": err.code(),
            }),
        }
    }
}

impl From<UpstreamReply> for RelayResponse {
    fn from(reply: UpstreamReply) -> Self {
        Self {
            status: reply.status,
            body: reply.body,
        }
    }
}
