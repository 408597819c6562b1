// handlers/public/mod.rs - Public handlers (no authentication required)
//
// Token acquisition, liveness, the endpoint index and every read-only
// students route.
use axum::{
    http::{Method, StatusCode, Uri},
    response::{IntoResponse, Json},
};
use serde_json::{json, Value};

use crate::error::ApiError;

pub mod auth;
pub mod students;

/// GET / - service name, version and endpoint index
pub async fn root() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "name": "Students API",
        "version": version,
        "endpoints": {
            "health": "GET /health (public)",
            "login": "POST /auth/login (public - token acquisition)",
            "list": "GET /students?format=json|xml (public)",
            "show": "GET /students/:id?format=json|xml (public)",
            "search": "GET /students/search?name=&course=&year_level=&format= (public)",
            "create": "POST /students (bearer token)",
            "update": "PUT /students/:id (bearer token)",
            "delete": "DELETE /students/:id (bearer token)",
        }
    }))
}

/// GET /health - liveness only, never touches the store
pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({ "status": "OK" })))
}

pub async fn not_found(uri: Uri) -> ApiError {
    ApiError::not_found(format!("No route for {}", uri.path()))
}

pub async fn method_not_allowed(method: Method, uri: Uri) -> ApiError {
    ApiError::method_not_allowed(format!("{} not allowed on {}", method, uri.path()))
}
