//! Create `student` table.
//!
//! The unique key on `email` is the storage-level uniqueness constraint;
//! the service-layer pre-check only exists to return a friendly 400.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Student::Table)
                    .if_not_exists()
                    .col(pk_auto(Student::Id))
                    .col(string_len(Student::Name, 255).not_null())
                    .col(string_len(Student::Email, 255).unique_key().not_null())
                    .col(string_len(Student::Phone, 10).not_null())
                    .col(string_len(Student::Language, 64).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Student::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Student { Table, Id, Name, Email, Phone, Language }
