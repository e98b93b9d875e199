//! Response processing: status check, JSON parse, envelope unwrap, mapping.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::ApiError;
use crate::http::HttpResponse;

/// Turn a raw response into `T`, stopping at the first failing stage.
pub fn process<T: DeserializeOwned>(response: &HttpResponse) -> Result<T, ApiError> {
    check_status(response)?;
    let value = parse_body(&response.body)?;
    let payload = unwrap_envelope(value);
    serde_json::from_value(payload).map_err(|e| ApiError::ValidationError(e.to_string()))
}

fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    Err(ApiError::HttpError {
        status: response.status,
        body: response.text(),
    })
}

/// JSON must be UTF-8, so invalid bytes fail here rather than being replaced.
fn parse_body(body: &[u8]) -> Result<Value, ApiError> {
    serde_json::from_slice(body).map_err(|e| ApiError::ParseError(e.to_string()))
}

/// Payload under a non-null top-level `data`, or the whole document.
fn unwrap_envelope(value: Value) -> Value {
    match value {
        Value::Object(mut map) => match map.remove("data") {
            Some(data) if !data.is_null() => data,
            Some(_) | None => Value::Object(map),
        },
        other => other,
    }
}
