//! Versioned framing for stored values
//!
//! Values are written as `{"version": N, "data": <payload>}`. Payloads
//! written before versioning existed are bare JSON and decode as version 0;
//! they are upgraded the next time the value is written.

use crate::error::{FxError, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Version written by this build
pub const SCHEMA_VERSION: u32 = 1;

#[derive(Serialize)]
struct EnvelopeRef<'a, T> {
    version: u32,
    data: &'a T,
}

#[derive(Deserialize)]
struct Envelope {
    version: u32,
    data: Value,
}

/// Serialize `payload` at the current schema version
pub fn encode<T: Serialize>(payload: &T) -> Result<String> {
    Ok(serde_json::to_string(&EnvelopeRef {
        version: SCHEMA_VERSION,
        data: payload,
    })?)
}

/// Decode a stored value for `key`
///
/// Returns the payload and the version it was stored at. Malformed text,
/// a payload of the wrong shape, and versions newer than [`SCHEMA_VERSION`]
/// are errors.
pub fn decode<T: DeserializeOwned>(key: &str, raw: &str) -> Result<(T, u32)> {
    let value: Value = serde_json::from_str(raw).map_err(|e| corrupt(key, e))?;

    let (data, version) = match split_envelope(&value) {
        Some(envelope) => (envelope.data, envelope.version),
        None => (value, 0),
    };

    if version > SCHEMA_VERSION {
        return Err(FxError::UnsupportedVersion {
            key: key.to_string(),
            found: version,
            supported: SCHEMA_VERSION,
        });
    }

    let payload = serde_json::from_value(data).map_err(|e| corrupt(key, e))?;
    Ok((payload, version))
}

/// An object with exactly `version` and `data` is an envelope; anything else is legacy
fn split_envelope(value: &Value) -> Option<Envelope> {
    let object = value.as_object()?;
    if object.len() != 2 || !object.contains_key("version") || !object.contains_key("data") {
        return None;
    }
    serde_json::from_value(value.clone()).ok()
}

fn corrupt(key: &str, reason: impl std::fmt::Display) -> FxError {
    FxError::CorruptData {
        key: key.to_string(),
        reason: reason.to_string(),
    }
}
