use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};

use models::student;

use crate::errors::ServiceError;
use crate::student::domain::StudentInput;
use crate::student::repository::StudentRepository;

/// SeaORM-backed repository implementation.
pub struct SeaOrmStudentRepository {
    pub db: DatabaseConnection,
}

#[async_trait::async_trait]
impl StudentRepository for SeaOrmStudentRepository {
    async fn list_all(&self) -> Result<Vec<student::Model>, ServiceError> {
        student::Entity::find()
            .all(&self.db)
            .await
            .map_err(|e| ServiceError::Db(e.to_string()))
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<student::Model>, ServiceError> {
        student::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| ServiceError::Db(e.to_string()))
    }

    async fn create(&self, fields: &StudentInput) -> Result<student::Model, ServiceError> {
        let am = student::ActiveModel {
            name: Set(fields.name.clone()),
            email: Set(fields.email.clone()),
            phone: Set(fields.phone.clone()),
            language: Set(fields.language.clone()),
            ..Default::default()
        };
        am.insert(&self.db).await.map_err(|e| ServiceError::Db(e.to_string()))
    }

    async fn update(&self, id: i32, fields: &StudentInput) -> Result<student::Model, ServiceError> {
        let mut am: student::ActiveModel = student::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| ServiceError::Db(e.to_string()))?
            .ok_or_else(|| ServiceError::not_found("student"))?
            .into();
        am.name = Set(fields.name.clone());
        am.email = Set(fields.email.clone());
        am.phone = Set(fields.phone.clone());
        am.language = Set(fields.language.clone());
        am.update(&self.db).await.map_err(|e| ServiceError::Db(e.to_string()))
    }

    async fn delete(&self, id: i32) -> Result<bool, ServiceError> {
        let res = student::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| ServiceError::Db(e.to_string()))?;
        Ok(res.rows_affected > 0)
    }

    async fn exists_by_email(&self, email: &str, excluding: Option<i32>) -> Result<bool, ServiceError> {
        let mut query = student::Entity::find().filter(student::Column::Email.eq(email));
        if let Some(id) = excluding {
            query = query.filter(student::Column::Id.ne(id));
        }
        let found = query
            .one(&self.db)
            .await
            .map_err(|e| ServiceError::Db(e.to_string()))?;
        Ok(found.is_some())
    }
}
