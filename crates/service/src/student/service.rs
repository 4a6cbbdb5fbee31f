use std::sync::Arc;

use tracing::{info, instrument};

use models::student;

use super::domain::{StudentInput, StudentPatch};
use super::repository::StudentRepository;
use super::validate::{self, Presence, EMAIL_TAKEN};
use crate::errors::{ServiceError, ValidationErrors};

/// Student business service independent of the web framework.
pub struct StudentService<R: StudentRepository> {
    repo: Arc<R>,
}

impl<R: StudentRepository> StudentService<R> {
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// Fetch every stored student in store iteration order.
    pub async fn list(&self) -> Result<Vec<student::Model>, ServiceError> {
        self.repo.list_all().await
    }

    /// Fetch one student or report it absent.
    pub async fn get(&self, id: i32) -> Result<student::Model, ServiceError> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("student"))
    }

    /// Create a student from a complete field set.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    /// use service::student::{domain::StudentPatch, repository::mock::MockStudentRepository, StudentService};
    /// let svc = StudentService::new(Arc::new(MockStudentRepository::default()));
    /// let input = StudentPatch {
    ///     name: Some("Ana".into()),
    ///     email: Some("ana@example.com".into()),
    ///     phone: Some("1234567890".into()),
    ///     language: Some("English".into()),
    /// };
    /// let created = tokio_test::block_on(svc.create(input)).unwrap();
    /// assert_eq!(created.id, 1);
    /// ```
    #[instrument(skip(self, input))]
    pub async fn create(&self, input: StudentPatch) -> Result<student::Model, ServiceError> {
        let mut errors = validate::collect(&input, Presence::Required);
        self.check_email_unique(&input, None, &mut errors).await?;
        match input.into_complete() {
            Some(fields) if errors.is_empty() => {
                let created = self.repo.create(&fields).await?;
                info!(id = created.id, email = %created.email, "student_created");
                Ok(created)
            }
            _ => Err(ServiceError::Validation(errors)),
        }
    }

    /// Overwrite all four fields of an existing student. The uniqueness
    /// check excludes the record under update so a no-op rewrite of an
    /// already-stored email is accepted.
    #[instrument(skip(self, input))]
    pub async fn update(&self, id: i32, input: StudentPatch) -> Result<student::Model, ServiceError> {
        let existing = self.get(id).await?;
        let mut errors = validate::collect(&input, Presence::Required);
        self.check_email_unique(&input, Some(existing.id), &mut errors).await?;
        match input.into_complete() {
            Some(fields) if errors.is_empty() => {
                let updated = self.repo.update(id, &fields).await?;
                info!(id = updated.id, "student_updated");
                Ok(updated)
            }
            _ => Err(ServiceError::Validation(errors)),
        }
    }

    /// Overwrite only the fields present in the patch; absent fields keep
    /// their stored values.
    #[instrument(skip(self, input))]
    pub async fn update_partial(&self, id: i32, input: StudentPatch) -> Result<student::Model, ServiceError> {
        let existing = self.get(id).await?;
        if input.is_empty() {
            return Err(ServiceError::EmptyUpdate);
        }
        let mut errors = validate::collect(&input, Presence::Optional);
        self.check_email_unique(&input, Some(existing.id), &mut errors).await?;
        errors.into_result()?;
        let merged = StudentInput {
            name: input.name.unwrap_or(existing.name),
            email: input.email.unwrap_or(existing.email),
            phone: input.phone.unwrap_or(existing.phone),
            language: input.language.unwrap_or(existing.language),
        };
        let updated = self.repo.update(id, &merged).await?;
        info!(id = updated.id, "student_patched");
        Ok(updated)
    }

    /// Delete a student, returning its last stored field values for the
    /// confirmation payload.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: i32) -> Result<student::Model, ServiceError> {
        let existing = self.get(id).await?;
        if !self.repo.delete(id).await? {
            return Err(ServiceError::Db(format!("delete affected no rows for student {}", id)));
        }
        info!(id = existing.id, "student_deleted");
        Ok(existing)
    }

    /// Repository-backed uniqueness pre-check; only consulted when the email
    /// is present and already passed its format rules.
    async fn check_email_unique(
        &self,
        input: &StudentPatch,
        excluding: Option<i32>,
        errors: &mut ValidationErrors,
    ) -> Result<(), ServiceError> {
        if errors.has("email") {
            return Ok(());
        }
        if let Some(email) = input.email.as_deref() {
            if self.repo.exists_by_email(email, excluding).await? {
                errors.add("email", EMAIL_TAKEN);
            }
        }
        Ok(())
    }
}
