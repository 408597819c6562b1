// handlers/protected/students.rs - students routes that write

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::Json,
};
use serde_json::{json, Value};
use tracing::info;

use crate::app::AppState;
use crate::error::ApiError;
use crate::handlers::utils::{json_object_body, parse_student_id};
use crate::middleware::AuthUser;
use crate::validation::parse_student;

/// POST /students - insert a validated record, answer 201 with its new id
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    headers: HeaderMap,
    body: Bytes,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let payload = json_object_body(&headers, &body)?;
    let student = parse_student(&payload).map_err(ApiError::validation)?;

    let id = state
        .store
        .insert(&student)
        .await
        .map_err(|e| state.store_error(e))?;

    info!("Student {} created by {}", id, user.subject);

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Student added", "id": id })),
    ))
}

/// PUT /students/:id - replace every field of an existing record
pub async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<Value>, ApiError> {
    let payload = json_object_body(&headers, &body)?;
    let student = parse_student(&payload).map_err(ApiError::validation)?;
    let id = parse_student_id(&id)?;

    let affected = state
        .store
        .update(id, &student)
        .await
        .map_err(|e| state.store_error(e))?;

    if affected == 0 {
        return Err(ApiError::student_not_found());
    }

    info!("Student {} updated by {}", id, user.subject);
    Ok(Json(json!({ "message": "Student updated" })))
}

/// DELETE /students/:id
pub async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let id = parse_student_id(&id)?;

    let affected = state
        .store
        .delete(id)
        .await
        .map_err(|e| state.store_error(e))?;

    if affected == 0 {
        return Err(ApiError::student_not_found());
    }

    info!("Student {} deleted by {}", id, user.subject);
    Ok(Json(json!({ "message": "Student deleted" })))
}
