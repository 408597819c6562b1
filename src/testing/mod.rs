//! Test support: an in-process `StudentStore` and a ready-made configuration,
//! so the full router can be exercised without PostgreSQL.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::app::{router, AppState};
use crate::config::AppConfig;
use crate::database::models::{NewStudent, Student};
use crate::database::{DatabaseError, StudentFilter, StudentStore};

pub const TEST_SECRET: &str = "test_secret_key_for_testing_only";
pub const TEST_USERNAME: &str = "admin";
pub const TEST_PASSWORD: &str = "admin123";

/// Development profile with test credentials and request logging off.
pub fn test_config() -> AppConfig {
    let mut config = AppConfig::development();
    config.api.enable_request_logging = false;
    config.security.jwt_secret = TEST_SECRET.to_string();
    config.security.admin_username = TEST_USERNAME.to_string();
    config.security.admin_password = TEST_PASSWORD.to_string();
    config
}

/// Router over a fresh `MemoryStudentStore`; the store handle is returned for
/// seeding and fault injection.
pub fn test_app(config: AppConfig) -> (axum::Router, Arc<MemoryStudentStore>) {
    let store = Arc::new(MemoryStudentStore::new());
    let state = AppState::new(store.clone(), config);
    (router(state), store)
}

#[derive(Default)]
struct Table {
    rows: BTreeMap<i64, Student>,
    next_id: i64,
}

/// `StudentStore` held in memory with the same id and filter semantics as the
/// PostgreSQL store.
#[derive(Default)]
pub struct MemoryStudentStore {
    table: RwLock<Table>,
    failing: AtomicBool,
}

impl MemoryStudentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// While set, every operation fails with a query error.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub async fn seed(&self, name: &str, course: &str, year_level: i32) -> i64 {
        let student = NewStudent {
            name: name.to_string(),
            course: course.to_string(),
            year_level,
        };
        let mut table = self.table.write().await;
        Self::insert_row(&mut table, student)
    }

    pub async fn len(&self) -> usize {
        self.table.read().await.rows.len()
    }

    fn check(&self) -> Result<(), DatabaseError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(DatabaseError::QueryError("connection refused".to_string()));
        }
        Ok(())
    }

    fn insert_row(table: &mut Table, student: NewStudent) -> i64 {
        table.next_id += 1;
        let id = table.next_id;
        table.rows.insert(id, student.into_student(id));
        id
    }
}

#[async_trait]
impl StudentStore for MemoryStudentStore {
    async fn list(&self) -> Result<Vec<Student>, DatabaseError> {
        self.check()?;
        Ok(self.table.read().await.rows.values().cloned().collect())
    }

    async fn get(&self, id: i64) -> Result<Option<Student>, DatabaseError> {
        self.check()?;
        Ok(self.table.read().await.rows.get(&id).cloned())
    }

    async fn search(&self, filter: &StudentFilter) -> Result<Vec<Student>, DatabaseError> {
        self.check()?;
        Ok(self
            .table
            .read()
            .await
            .rows
            .values()
            .filter(|s| filter.matches(s))
            .cloned()
            .collect())
    }

    async fn insert(&self, student: &NewStudent) -> Result<i64, DatabaseError> {
        self.check()?;
        let mut table = self.table.write().await;
        Ok(Self::insert_row(&mut table, student.clone()))
    }

    async fn update(&self, id: i64, student: &NewStudent) -> Result<u64, DatabaseError> {
        self.check()?;
        let mut table = self.table.write().await;
        match table.rows.get_mut(&id) {
            Some(row) => {
                *row = student.clone().into_student(id);
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn delete(&self, id: i64) -> Result<u64, DatabaseError> {
        self.check()?;
        let mut table = self.table.write().await;
        Ok(table.rows.remove(&id).map_or(0, |_| 1))
    }
}
