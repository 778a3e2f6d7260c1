//! Error normalization for the REST backend.
//!
//! The backend reports failures in several shapes: a bare string, an object
//! with `message`, an object with an `errors` array, or something else
//! entirely. Every shape collapses into one message, checked in this order:
//!
//! 1. transport failure (no response; a body that breaks off after the
//!    status line is a server failure instead)
//! 2. string body
//! 3. object with a non-empty string `message`
//! 4. object with an `errors` array (entry messages joined with `", "`)
//! 5. any other body, as JSON text
//! 6. no body: a generic status-code message
//!
//! UI text depends on this order; keep it.

use reqwest::StatusCode;
use serde_json::Value;

use crate::domain::ports::ApiError;

/// Error body as received, classified by shape.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum FailureBody {
    /// No body, whitespace, or JSON `null`.
    Empty,
    /// A JSON string or non-JSON text.
    Text(String),
    /// Any other JSON value.
    Json(Value),
}

impl FailureBody {
    pub(crate) fn from_bytes(body: &[u8]) -> Self {
        let text = String::from_utf8_lossy(body);
        if text.trim().is_empty() {
            return Self::Empty;
        }
        match serde_json::from_slice::<Value>(body) {
            Ok(Value::Null) => Self::Empty,
            Ok(Value::String(message)) => Self::Text(message),
            Ok(value) => Self::Json(value),
            Err(_) => Self::Text(text.into_owned()),
        }
    }

    fn is_structured(&self) -> bool {
        matches!(self, Self::Json(Value::Object(_)))
    }
}

/// Normalize a failure that produced no HTTP response.
pub(crate) fn transport_error(error: &reqwest::Error) -> ApiError {
    ApiError::network(format!("Error: {error}"))
}

/// Normalize a response whose status arrived but whose body could not be
/// read.
pub(crate) fn body_read_error(status: StatusCode, error: &reqwest::Error) -> ApiError {
    ApiError::server(
        status.as_u16(),
        format!("Error: failed to read response body: {error}"),
    )
}

/// Normalize a non-success HTTP response.
pub(crate) fn status_error(status: StatusCode, body: &FailureBody) -> ApiError {
    let message = body_message(body).unwrap_or_else(|| generic_message(status));
    if status.is_client_error() && body.is_structured() {
        ApiError::validation(status.as_u16(), message)
    } else {
        ApiError::server(status.as_u16(), message)
    }
}

fn body_message(body: &FailureBody) -> Option<String> {
    match body {
        FailureBody::Empty => None,
        FailureBody::Text(text) => non_blank(text),
        FailureBody::Json(Value::Object(fields)) => fields
            .get("message")
            .and_then(Value::as_str)
            .and_then(non_blank)
            .or_else(|| {
                fields
                    .get("errors")
                    .and_then(Value::as_array)
                    .and_then(|entries| joined_entries(entries))
            })
            .or_else(|| Some(Value::Object(fields.clone()).to_string())),
        FailureBody::Json(other) => Some(other.to_string()),
    }
}

fn joined_entries(entries: &[Value]) -> Option<String> {
    let joined = entries
        .iter()
        .map(entry_message)
        .collect::<Vec<_>>()
        .join(", ");
    non_blank(&joined)
}

fn entry_message(entry: &Value) -> String {
    match entry {
        Value::String(message) => message.clone(),
        Value::Object(fields) => ["message", "msg"]
            .into_iter()
            .find_map(|key| fields.get(key).and_then(Value::as_str))
            .map_or_else(|| entry.to_string(), str::to_owned),
        other => other.to_string(),
    }
}

fn generic_message(status: StatusCode) -> String {
    format!(
        "Error Status code {}, Error body is: {}",
        status.as_u16(),
        status.canonical_reason().unwrap_or("no response body")
    )
}

fn non_blank(text: &str) -> Option<String> {
    if text.trim().is_empty() {
        None
    } else {
        Some(text.to_owned())
    }
}
