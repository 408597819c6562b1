use serde::Deserialize;
use sqlx::postgres::{PgArguments, PgRow};
use sqlx::FromRow;

use crate::database::models::Student;

pub const STUDENT_TABLE: &str = "students";
pub const STUDENT_COLUMNS: &str = "id, name, course, year_level";

/// Bound value for a positional `$n` placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SqlParam {
    Text(String),
    Int(i32),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqlResult {
    pub query: String,
    pub params: Vec<SqlParam>,
}

/// Raw search parameters as they arrive on the query string.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchParams {
    pub name: Option<String>,
    pub course: Option<String>,
    pub year_level: Option<String>,
}

/// Normalised search filter. `None` fields impose no constraint.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StudentFilter {
    /// Substring of the name.
    pub name: Option<String>,
    /// Exact course.
    pub course: Option<String>,
    /// Exact year level.
    pub year_level: Option<i32>,
}

impl StudentFilter {
    /// Empty strings count as absent and a `year_level` that is not an integer is ignored.
    pub fn from_params(params: &SearchParams) -> Self {
        Self {
            name: non_empty(params.name.as_deref()),
            course: non_empty(params.course.as_deref()),
            year_level: params
                .year_level
                .as_deref()
                .and_then(|v| v.trim().parse::<i32>().ok()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.course.is_none() && self.year_level.is_none()
    }

    pub fn matches(&self, student: &Student) -> bool {
        self.name.as_ref().map_or(true, |n| student.name.contains(n.as_str()))
            && self.course.as_ref().map_or(true, |c| &student.course == c)
            && self.year_level.map_or(true, |y| student.year_level == y)
    }

    /// Build the parameterised SELECT for this filter.
    pub fn to_sql(&self) -> SqlResult {
        let mut clauses = Vec::new();
        let mut params = Vec::new();

        if let Some(name) = &self.name {
            params.push(SqlParam::Text(format!("%{}%", escape_like(name))));
            clauses.push(format!("name LIKE ${} ESCAPE '\\'", params.len()));
        }
        if let Some(course) = &self.course {
            params.push(SqlParam::Text(course.clone()));
            clauses.push(format!("course = ${}", params.len()));
        }
        if let Some(year_level) = self.year_level {
            params.push(SqlParam::Int(year_level));
            clauses.push(format!("year_level = ${}", params.len()));
        }

        let where_clause = if clauses.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", clauses.join(" AND "))
        };

        SqlResult {
            query: format!(
                "SELECT {} FROM {}{} ORDER BY id",
                STUDENT_COLUMNS, STUDENT_TABLE, where_clause
            ),
            params,
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value.filter(|v| !v.is_empty()).map(str::to_string)
}

/// Escape LIKE metacharacters so user input only ever matches literally.
pub fn escape_like(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

pub fn bind_param_query_as<'q, O>(
    q: sqlx::query::QueryAs<'q, sqlx::Postgres, O, PgArguments>,
    p: &'q SqlParam,
) -> sqlx::query::QueryAs<'q, sqlx::Postgres, O, PgArguments>
where
    O: for<'r> FromRow<'r, PgRow>,
{
    match p {
        SqlParam::Text(s) => q.bind(s.as_str()),
        SqlParam::Int(i) => q.bind(*i),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(name: Option<&str>, course: Option<&str>, year_level: Option<&str>) -> SearchParams {
        SearchParams {
            name: name.map(str::to_string),
            course: course.map(str::to_string),
            year_level: year_level.map(str::to_string),
        }
    }

    #[test]
    fn no_filters_selects_everything() {
        let filter = StudentFilter::from_params(&SearchParams::default());
        assert!(filter.is_empty());
        let sql = filter.to_sql();
        assert_eq!(sql.query, "SELECT id, name, course, year_level FROM students ORDER BY id");
        assert!(sql.params.is_empty());
    }

    #[test]
    fn filters_are_anded_in_order() {
        let filter = StudentFilter::from_params(&params(Some("an"), Some("BSIT"), Some("2")));
        let sql = filter.to_sql();
        assert_eq!(
            sql.query,
            "SELECT id, name, course, year_level FROM students WHERE name LIKE $1 ESCAPE '\\' AND course = $2 AND year_level = $3 ORDER BY id"
        );
        assert_eq!(
            sql.params,
            vec![
                SqlParam::Text("%an%".to_string()),
                SqlParam::Text("BSIT".to_string()),
                SqlParam::Int(2)
            ]
        );
    }

    #[test]
    fn placeholders_are_numbered_by_supplied_filters() {
        let filter = StudentFilter::from_params(&params(None, None, Some("4")));
        let sql = filter.to_sql();
        assert!(sql.query.contains("WHERE year_level = $1"));
        assert_eq!(sql.params, vec![SqlParam::Int(4)]);
    }

    #[test]
    fn empty_and_malformed_values_are_ignored() {
        let filter = StudentFilter::from_params(&params(Some(""), Some(""), Some("second")));
        assert!(filter.is_empty());
    }

    #[test]
    fn like_metacharacters_are_escaped() {
        assert_eq!(escape_like("100%_a\\b"), "100\\%\\_a\\\\b");
        let sql = StudentFilter::from_params(&params(Some("50%"), None, None)).to_sql();
        assert_eq!(sql.params, vec![SqlParam::Text("%50\\%%".to_string())]);
    }

    #[test]
    fn matches_mirrors_sql_semantics() {
        let student = Student {
            id: 1,
            name: "Juan dela Cruz".to_string(),
            course: "BSIT".to_string(),
            year_level: 2,
        };
        assert!(StudentFilter::default().matches(&student));
        assert!(StudentFilter::from_params(&params(Some("dela"), None, None)).matches(&student));
        assert!(!StudentFilter::from_params(&params(Some("DELA"), None, None)).matches(&student));
        assert!(!StudentFilter::from_params(&params(None, Some("BSI"), None)).matches(&student));
        assert!(StudentFilter::from_params(&params(None, Some("BSIT"), Some("2"))).matches(&student));
        assert!(!StudentFilter::from_params(&params(None, None, Some("3"))).matches(&student));
    }
}
