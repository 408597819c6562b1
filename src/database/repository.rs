use async_trait::async_trait;
use sqlx::PgPool;

use crate::database::manager::DatabaseError;
use crate::database::models::{NewStudent, Student};
use crate::database::query_builder::{bind_param_query_as, StudentFilter, STUDENT_COLUMNS, STUDENT_TABLE};

/// Persistence seam for the `students` table.
///
/// `update` and `delete` report the number of affected rows so callers can
/// tell a missing id apart from a successful write.
#[async_trait]
pub trait StudentStore: Send + Sync {
    async fn list(&self) -> Result<Vec<Student>, DatabaseError>;

    async fn get(&self, id: i64) -> Result<Option<Student>, DatabaseError>;

    async fn search(&self, filter: &StudentFilter) -> Result<Vec<Student>, DatabaseError>;

    /// Returns the id assigned by the store.
    async fn insert(&self, student: &NewStudent) -> Result<i64, DatabaseError>;

    async fn update(&self, id: i64, student: &NewStudent) -> Result<u64, DatabaseError>;

    async fn delete(&self, id: i64) -> Result<u64, DatabaseError>;
}

/// `StudentStore` backed by PostgreSQL. Each call borrows one pooled
/// connection for a single statement.
#[derive(Clone)]
pub struct PgStudentStore {
    pool: PgPool,
}

impl PgStudentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl StudentStore for PgStudentStore {
    async fn list(&self) -> Result<Vec<Student>, DatabaseError> {
        self.search(&StudentFilter::default()).await
    }

    async fn get(&self, id: i64) -> Result<Option<Student>, DatabaseError> {
        let sql = format!("SELECT {} FROM {} WHERE id = $1", STUDENT_COLUMNS, STUDENT_TABLE);
        let row = sqlx::query_as::<_, Student>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn search(&self, filter: &StudentFilter) -> Result<Vec<Student>, DatabaseError> {
        let sql_result = filter.to_sql();
        let mut q = sqlx::query_as::<_, Student>(&sql_result.query);
        for p in sql_result.params.iter() {
            q = bind_param_query_as(q, p);
        }
        let rows = q.fetch_all(&self.pool).await?;
        Ok(rows)
    }

    async fn insert(&self, student: &NewStudent) -> Result<i64, DatabaseError> {
        let sql = format!(
            "INSERT INTO {} (name, course, year_level) VALUES ($1, $2, $3) RETURNING id",
            STUDENT_TABLE
        );
        let id = sqlx::query_scalar::<_, i64>(&sql)
            .bind(&student.name)
            .bind(&student.course)
            .bind(student.year_level)
            .fetch_one(&self.pool)
            .await?;
        Ok(id)
    }

    async fn update(&self, id: i64, student: &NewStudent) -> Result<u64, DatabaseError> {
        let sql = format!(
            "UPDATE {} SET name = $1, course = $2, year_level = $3 WHERE id = $4",
            STUDENT_TABLE
        );
        let result = sqlx::query(&sql)
            .bind(&student.name)
            .bind(&student.course)
            .bind(student.year_level)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    async fn delete(&self, id: i64) -> Result<u64, DatabaseError> {
        let sql = format!("DELETE FROM {} WHERE id = $1", STUDENT_TABLE);
        let result = sqlx::query(&sql).bind(id).execute(&self.pool).await?;
        Ok(result.rows_affected())
    }
}
