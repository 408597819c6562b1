use axum::http::{header, HeaderMap};
use serde_json::{Map, Value};

use crate::error::ApiError;

/// True for `application/json` and `application/*+json`, ignoring parameters.
pub fn is_json_content_type(headers: &HeaderMap) -> bool {
    let Some(value) = headers.get(header::CONTENT_TYPE).and_then(|v| v.to_str().ok()) else {
        return false;
    };

    let mime = value.split(';').next().unwrap_or("").trim().to_ascii_lowercase();
    mime == "application/json" || (mime.starts_with("application/") && mime.ends_with("+json"))
}

/// Read a JSON request body as an object.
///
/// A non-JSON content type is a 415. A body that does not parse, or that is
/// not an object, is read as an empty object so validation reports every
/// missing field.
pub fn json_object_body(headers: &HeaderMap, body: &[u8]) -> Result<Map<String, Value>, ApiError> {
    if !is_json_content_type(headers) {
        return Err(ApiError::unsupported_media_type(
            "Content-Type must be application/json",
        ));
    }

    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) | Err(_) => Ok(Map::new()),
    }
}

/// Parse an `{id}` path segment. Anything that is not an integer cannot name a row.
pub fn parse_student_id(raw: &str) -> Result<i64, ApiError> {
    raw.parse::<i64>().map_err(|_| ApiError::student_not_found())
}
