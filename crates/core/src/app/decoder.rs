//! Turns raw channel payloads into validated domain events.
//!
//! The backend publishes loosely typed JSON. Identity fields must be present
//! and usable; numeric fields are normalized rather than rejected so that a
//! single odd value does not cost the whole update.

use serde_json::{Map, Value};
use thiserror::Error;
use tracing::warn;

use crate::domain::{Event, JobKey, JobOutcome, Platform, ProgressEvent, TaskId, TaskSnapshot};
use crate::ports::ChannelMessage;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum DecodeError {
    #[error("payload is not a JSON object")]
    NotAnObject,

    #[error("missing or empty field: {field}")]
    MissingField { field: &'static str },

    #[error("field {field} must be a string")]
    NotAString { field: &'static str },

    #[error("unknown platform: {value}")]
    UnknownPlatform { value: String },
}

/// Decode any message received on the progress channel
pub fn decode_message(message: &ChannelMessage) -> Result<Event, DecodeError> {
    match message {
        ChannelMessage::Progress(payload) => decode_progress(payload).map(Event::Progress),
        ChannelMessage::Finished(payload) => decode_outcome(payload).map(Event::Finished),
    }
}

/// Decode a progress payload into a job key and task snapshot
pub fn decode_progress(payload: &Value) -> Result<ProgressEvent, DecodeError> {
    let object = payload.as_object().ok_or(DecodeError::NotAnObject)?;
    let key = decode_key(object)?;
    let task_id = TaskId::parse(required_str(object, "task_id")?);

    // Older backends call this field `progress`
    let percentage = object
        .get("percentage")
        .or_else(|| object.get("progress"))
        .map(coerce_percentage)
        .unwrap_or(0);

    let snapshot = TaskSnapshot {
        task_id,
        percentage,
        step: optional_count(object, "step"),
        total_steps: optional_count(object, "total_steps"),
    };

    Ok(ProgressEvent { key, snapshot })
}

/// Decode a terminal signal; a non-empty `error` string marks failure
pub fn decode_outcome(payload: &Value) -> Result<JobOutcome, DecodeError> {
    let object = payload.as_object().ok_or(DecodeError::NotAnObject)?;
    let key = decode_key(object)?;
    let error = object
        .get("error")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|msg| !msg.is_empty())
        .map(ToOwned::to_owned);

    Ok(JobOutcome { key, error })
}

fn decode_key(object: &Map<String, Value>) -> Result<JobKey, DecodeError> {
    let platform_raw = required_str(object, "platform")?;
    let platform = platform_raw
        .parse::<Platform>()
        .map_err(|_| DecodeError::UnknownPlatform {
            value: platform_raw.to_string(),
        })?;
    let user = required_str(object, "user")?;
    let repo = required_str(object, "repo")?;

    Ok(JobKey::new(platform, user, repo))
}

fn required_str<'a>(
    object: &'a Map<String, Value>,
    field: &'static str,
) -> Result<&'a str, DecodeError> {
    match object.get(field) {
        None | Some(Value::Null) => Err(DecodeError::MissingField { field }),
        Some(Value::String(s)) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                Err(DecodeError::MissingField { field })
            } else {
                Ok(trimmed)
            }
        }
        Some(_) => Err(DecodeError::NotAString { field }),
    }
}

fn coerce_percentage(value: &Value) -> u8 {
    let raw = match value {
        Value::Number(n) => n
            .as_i64()
            .map(|i| i as f64)
            .or_else(|| n.as_f64())
            .unwrap_or(0.0),
        Value::String(s) => s.trim().parse::<f64>().unwrap_or(0.0),
        _ => 0.0,
    };

    if raw.is_nan() {
        return 0;
    }
    raw.round().clamp(0.0, 100.0) as u8
}

/// Absent, null and unusable values all mean "unknown"; zero is kept.
fn optional_count(object: &Map<String, Value>, field: &'static str) -> Option<u32> {
    let value = object.get(field)?;
    if value.is_null() {
        return None;
    }
    match value.as_u64() {
        Some(n) => u32::try_from(n).ok(),
        None => {
            warn!("Ignoring unusable {} value in progress event: {}", field, value);
            None
        }
    }
}
