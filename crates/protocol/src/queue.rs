//! Pending command queue payload
//!
//! `RE.getCommandQueue()` drains the script-side queue and returns it as a
//! JSON array of strings. Some runtimes hand the value back already decoded,
//! so both forms are accepted.

use serde_json::Value;

use crate::Command;

/// Queue payload could not be decoded
#[derive(Debug, thiserror::Error)]
pub enum QueueError {
    #[error("malformed command queue: {0}")]
    Json(#[from] serde_json::Error),
    #[error("command queue is not an array of strings")]
    NotStringArray,
}

/// Decode a queue payload string into commands, preserving array order
pub fn decode_queue(raw: &str) -> Result<Vec<Command>, QueueError> {
    let entries: Vec<String> = serde_json::from_str(raw)?;
    Ok(entries.iter().map(|s| Command::from(s.as_str())).collect())
}

/// Decode a queue payload as returned by a script evaluation
///
/// A JSON string is parsed as the serialised queue; an array is taken as
/// already decoded. Null (an empty evaluation) is an empty queue.
pub fn decode_queue_value(value: &Value) -> Result<Vec<Command>, QueueError> {
    match value {
        Value::Null => Ok(Vec::new()),
        Value::String(raw) => decode_queue(raw),
        Value::Array(items) => items
            .iter()
            .map(|item| {
                item.as_str()
                    .map(Command::from)
                    .ok_or(QueueError::NotStringArray)
            })
            .collect(),
        _ => Err(QueueError::NotStringArray),
    }
}

/// Encode commands the way the script serialises its queue
pub fn encode_queue<'a>(commands: impl IntoIterator<Item = &'a Command>) -> String {
    let entries: Vec<String> = commands.into_iter().map(ToString::to_string).collect();
    Value::from(entries).to_string()
}
