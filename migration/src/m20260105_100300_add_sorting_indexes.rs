use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

/// (index name, table, columns)
const INDEXES: [(&str, &str, &[&str]); 7] = [
    ("courses_creator_id", "courses", &["creator_id"]),
    ("courses_updated_at", "courses", &["updated_at"]),
    ("course_modules_course_position", "course_modules", &["course_id", "position"]),
    ("lessons_module_position", "lessons", &["module_id", "position"]),
    ("approval_requests_course_id", "approval_requests", &["course_id"]),
    ("approval_requests_approver_status", "approval_requests", &["approver_id", "status"]),
    ("dynamics_title", "dynamics", &["title"]),
];

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for (name, table, columns) in INDEXES {
            let mut index = Index::create();
            index
                .name(name)
                .table((Alias::new("learning_platform"), Alias::new(table)));
            for column in columns {
                index.col(Alias::new(*column));
            }
            manager.create_index(index.to_owned()).await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for (name, table, _) in INDEXES.iter().rev() {
            manager
                .drop_index(
                    Index::drop()
                        .name(*name)
                        .table((Alias::new("learning_platform"), Alias::new(*table)))
                        .to_owned(),
                )
                .await?;
        }

        Ok(())
    }
}
