use serde_json::{Map, Value};

use crate::database::models::NewStudent;

pub const NAME_REQUIRED: &str = "name is required and must be a non-empty string";
pub const COURSE_REQUIRED: &str = "course is required and must be a non-empty string";
pub const YEAR_LEVEL_RANGE: &str = "year_level must be an integer between 1 and 5";

pub const MIN_YEAR_LEVEL: i64 = 1;
pub const MAX_YEAR_LEVEL: i64 = 5;

/// Check a candidate student payload. Returns one message per violated rule,
/// in field order; an empty vector means the payload may be written.
pub fn validate_student(candidate: &Map<String, Value>) -> Vec<String> {
    let mut errors = Vec::new();

    if non_blank_str(candidate, "name").is_none() {
        errors.push(NAME_REQUIRED.to_string());
    }
    if non_blank_str(candidate, "course").is_none() {
        errors.push(COURSE_REQUIRED.to_string());
    }
    if year_level(candidate).is_none() {
        errors.push(YEAR_LEVEL_RANGE.to_string());
    }

    errors
}

/// Validate and convert in one step. Values are kept exactly as submitted.
pub fn parse_student(candidate: &Map<String, Value>) -> Result<NewStudent, Vec<String>> {
    match (
        non_blank_str(candidate, "name"),
        non_blank_str(candidate, "course"),
        year_level(candidate),
    ) {
        (Some(name), Some(course), Some(year_level)) => Ok(NewStudent {
            name: name.to_string(),
            course: course.to_string(),
            year_level,
        }),
        _ => Err(validate_student(candidate)),
    }
}

fn non_blank_str<'a>(candidate: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    candidate
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
}

// Floats and booleans are not integers here, even when they hold a whole value.
fn year_level(candidate: &Map<String, Value>) -> Option<i32> {
    candidate
        .get("year_level")
        .and_then(Value::as_i64)
        .filter(|level| (MIN_YEAR_LEVEL..=MAX_YEAR_LEVEL).contains(level))
        .map(|level| level as i32)
}
