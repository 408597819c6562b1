// handlers/public/auth/login.rs - POST /auth/login handler

use axum::{
    body::Bytes,
    extract::State,
    http::HeaderMap,
    response::Json,
};
use serde_json::{json, Value};
use tracing::{info, warn};

use crate::app::AppState;
use crate::error::ApiError;
use crate::handlers::utils::json_object_body;

/// POST /auth/login - exchange the configured credentials for a bearer token.
///
/// Input: `{"username": "...", "password": "..."}`.
/// Output: `{"token": "...", "token_type": "Bearer", "expires_in": 3600}`.
/// Missing or wrong credentials are a 401.
pub async fn login_post(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<Value>, ApiError> {
    let creds = json_object_body(&headers, &body)?;
    let username = creds.get("username").and_then(Value::as_str).unwrap_or("");
    let password = creds.get("password").and_then(Value::as_str).unwrap_or("");

    let issued = state.auth.login(username, password).map_err(|e| {
        warn!("Login rejected for user '{}'", username);
        e
    })?;

    info!("Issued token for user '{}' valid until {}", username, issued.expires_at);

    Ok(Json(json!({
        "token": issued.token,
        "token_type": "Bearer",
        "expires_in": state.auth.ttl().num_seconds(),
    })))
}
