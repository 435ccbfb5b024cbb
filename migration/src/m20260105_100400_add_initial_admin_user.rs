use chrono::Utc;
use password_auth::generate_hash;
use sea_orm::{DbBackend, Statement, Value};
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

const ADMIN_EMAIL: &str = "admin@learning.local";

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let now = Utc::now();

        // Raw SQL keeps this migration independent of later entity changes.
        manager
            .get_connection()
            .execute(Statement::from_sql_and_values(
                DbBackend::Postgres,
                r#"
                INSERT INTO learning_platform.users (
                    email, first_name, last_name, display_name, password, role, created_at, updated_at
                ) VALUES ($1, $2, $3, $4, $5, 'admin', $6, $7)
                ON CONFLICT (email) DO NOTHING
                "#,
                vec![
                    Value::String(Some(Box::new(ADMIN_EMAIL.to_owned()))),
                    Value::String(Some(Box::new("Admin".to_owned()))),
                    Value::String(Some(Box::new("Admin".to_owned()))),
                    Value::String(Some(Box::new("Admin".to_owned()))),
                    Value::String(Some(Box::new(generate_hash("password")))),
                    Value::ChronoDateTimeUtc(Some(Box::new(now))),
                    Value::ChronoDateTimeUtc(Some(Box::new(now))),
                ],
            ))
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute(Statement::from_sql_and_values(
                DbBackend::Postgres,
                "DELETE FROM learning_platform.users WHERE email = $1",
                vec![Value::String(Some(Box::new(ADMIN_EMAIL.to_owned())))],
            ))
            .await?;

        Ok(())
    }
}
