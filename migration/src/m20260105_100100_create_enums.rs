use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

const ENUMS: [(&str, &[&str]); 7] = [
    ("role", &["admin", "manager", "instructor", "collaborator"]),
    (
        "course_status",
        &[
            "rascunho",
            "em_andamento",
            "em_aprovacao",
            "aprovado",
            "revisao_solicitada",
        ],
    ),
    ("lesson_status", &["fazer", "fazendo", "finalizando"]),
    (
        "activity_type",
        &[
            "video",
            "leitura",
            "exercicio",
            "dinamica",
            "apresentacao",
            "discussao",
            "avaliacao",
        ],
    ),
    ("approval_status", &["pendente", "aprovado", "rejeitado"]),
    ("approval_type", &["course", "module", "lesson"]),
    (
        "dynamic_category",
        &[
            "icebreaker",
            "energizer",
            "team_building",
            "reflection",
            "closing",
            "other",
        ],
    ),
];

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        for (name, variants) in ENUMS {
            let labels = variants
                .iter()
                .map(|variant| format!("'{variant}'"))
                .collect::<Vec<_>>()
                .join(", ");
            db.execute_unprepared(&format!(
                "CREATE TYPE learning_platform.{name} AS ENUM ({labels});"
            ))
            .await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        for (name, _) in ENUMS.iter().rev() {
            db.execute_unprepared(&format!(
                "DROP TYPE IF EXISTS learning_platform.{name};"
            ))
            .await?;
        }

        Ok(())
    }
}
