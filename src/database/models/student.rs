use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A persisted row of the `students` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Student {
    pub id: i64,
    pub name: String,
    pub course: String,
    pub year_level: i32,
}

/// Field values for an insert or a full update. Only built from a payload that
/// passed validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewStudent {
    pub name: String,
    pub course: String,
    pub year_level: i32,
}

impl NewStudent {
    pub fn into_student(self, id: i64) -> Student {
        Student {
            id,
            name: self.name,
            course: self.course,
            year_level: self.year_level,
        }
    }
}
