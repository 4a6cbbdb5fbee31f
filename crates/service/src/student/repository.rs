use async_trait::async_trait;

use models::student;

use super::domain::StudentInput;
use crate::errors::ServiceError;

/// Repository abstraction over durable student storage.
///
/// The backing store owns the unique-email constraint under concurrency;
/// `exists_by_email` is only the friendly pre-check layered on top of it.
#[async_trait]
pub trait StudentRepository: Send + Sync {
    async fn list_all(&self) -> Result<Vec<student::Model>, ServiceError>;
    async fn find_by_id(&self, id: i32) -> Result<Option<student::Model>, ServiceError>;
    async fn create(&self, fields: &StudentInput) -> Result<student::Model, ServiceError>;
    async fn update(&self, id: i32, fields: &StudentInput) -> Result<student::Model, ServiceError>;
    async fn delete(&self, id: i32) -> Result<bool, ServiceError>;
    async fn exists_by_email(&self, email: &str, excluding: Option<i32>) -> Result<bool, ServiceError>;
}

/// Simple in-memory mock repository for tests and doc examples
pub mod mock {
    use super::*;
    use std::collections::BTreeMap;
    use std::sync::Mutex;

    /// Map-backed store mirroring the relational behavior, including the
    /// unique-email constraint and monotonically assigned ids.
    #[derive(Default)]
    pub struct MockStudentRepository {
        inner: Mutex<Inner>,
    }

    #[derive(Default)]
    struct Inner {
        rows: BTreeMap<i32, student::Model>,
        next_id: i32,
    }

    #[async_trait]
    impl StudentRepository for MockStudentRepository {
        async fn list_all(&self) -> Result<Vec<student::Model>, ServiceError> {
            let inner = self.inner.lock().unwrap();
            Ok(inner.rows.values().cloned().collect())
        }

        async fn find_by_id(&self, id: i32) -> Result<Option<student::Model>, ServiceError> {
            let inner = self.inner.lock().unwrap();
            Ok(inner.rows.get(&id).cloned())
        }

        async fn create(&self, fields: &StudentInput) -> Result<student::Model, ServiceError> {
            let mut inner = self.inner.lock().unwrap();
            if inner.rows.values().any(|m| m.email == fields.email) {
                return Err(ServiceError::Db("unique constraint violated on student.email".into()));
            }
            inner.next_id += 1;
            let model = student::Model {
                id: inner.next_id,
                name: fields.name.clone(),
                email: fields.email.clone(),
                phone: fields.phone.clone(),
                language: fields.language.clone(),
            };
            inner.rows.insert(model.id, model.clone());
            Ok(model)
        }

        async fn update(&self, id: i32, fields: &StudentInput) -> Result<student::Model, ServiceError> {
            let mut inner = self.inner.lock().unwrap();
            if inner.rows.values().any(|m| m.id != id && m.email == fields.email) {
                return Err(ServiceError::Db("unique constraint violated on student.email".into()));
            }
            let row = inner
                .rows
                .get_mut(&id)
                .ok_or_else(|| ServiceError::not_found("student"))?;
            row.name = fields.name.clone();
            row.email = fields.email.clone();
            row.phone = fields.phone.clone();
            row.language = fields.language.clone();
            Ok(row.clone())
        }

        async fn delete(&self, id: i32) -> Result<bool, ServiceError> {
            let mut inner = self.inner.lock().unwrap();
            Ok(inner.rows.remove(&id).is_some())
        }

        async fn exists_by_email(&self, email: &str, excluding: Option<i32>) -> Result<bool, ServiceError> {
            let inner = self.inner.lock().unwrap();
            Ok(inner
                .rows
                .values()
                .any(|m| m.email == email && Some(m.id) != excluding))
        }
    }
}
