// handlers/public/students.rs - read-only students routes

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Response,
};
use serde::Deserialize;

use crate::api::format::format_response;
use crate::app::AppState;
use crate::database::{SearchParams, StudentFilter};
use crate::error::ApiError;
use crate::handlers::utils::parse_student_id;

#[derive(Debug, Default, Deserialize)]
pub struct FormatQuery {
    /// `json` (default) or `xml`, case-insensitive.
    pub format: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    pub name: Option<String>,
    pub course: Option<String>,
    pub year_level: Option<String>,
    pub format: Option<String>,
}

impl SearchQuery {
    fn params(&self) -> SearchParams {
        SearchParams {
            name: self.name.clone(),
            course: self.course.clone(),
            year_level: self.year_level.clone(),
        }
    }
}

/// GET /students - every record, ordered by id
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<FormatQuery>,
) -> Result<Response, ApiError> {
    let format = state.negotiate(query.format.as_deref())?;

    let students = state.store.list().await.map_err(|e| state.store_error(e))?;

    format_response(StatusCode::OK, &students, format)
}

/// GET /students/:id - one record or 404
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<FormatQuery>,
) -> Result<Response, ApiError> {
    let format = state.negotiate(query.format.as_deref())?;
    let id = parse_student_id(&id)?;

    let student = state
        .store
        .get(id)
        .await
        .map_err(|e| state.store_error(e))?
        .ok_or_else(ApiError::student_not_found)?;

    format_response(StatusCode::OK, &student, format)
}

/// GET /students/search - AND of the supplied filters; no match is an empty list
pub async fn search(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Response, ApiError> {
    let format = state.negotiate(query.format.as_deref())?;
    let filter = StudentFilter::from_params(&query.params());

    let students = state
        .store
        .search(&filter)
        .await
        .map_err(|e| state.store_error(e))?;

    tracing::debug!("Search {:?} matched {} students", filter, students.len());

    format_response(StatusCode::OK, &students, format)
}
