use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

// Tables in dependency order; `down` drops them in reverse.
const TABLES: [(&str, &str); 8] = [
    (
        "departments",
        "CREATE TABLE learning_platform.departments (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            name VARCHAR NOT NULL UNIQUE,
            description TEXT,
            created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
            updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
        )",
    ),
    (
        "users",
        "CREATE TABLE learning_platform.users (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            email VARCHAR NOT NULL UNIQUE,
            first_name VARCHAR NOT NULL,
            last_name VARCHAR NOT NULL,
            display_name VARCHAR,
            password VARCHAR NOT NULL,
            role learning_platform.role NOT NULL DEFAULT 'collaborator',
            department_id UUID REFERENCES learning_platform.departments(id)
                ON DELETE SET NULL ON UPDATE CASCADE,
            created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
            updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
        )",
    ),
    (
        "courses",
        "CREATE TABLE learning_platform.courses (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            name VARCHAR NOT NULL,
            description TEXT,
            objectives TEXT,
            target_audience TEXT,
            estimated_duration INTEGER NOT NULL DEFAULT 0 CHECK (estimated_duration >= 0),
            status learning_platform.course_status NOT NULL DEFAULT 'rascunho',
            tags TEXT[] NOT NULL DEFAULT '{}',
            creator_id UUID NOT NULL REFERENCES learning_platform.users(id)
                ON DELETE RESTRICT ON UPDATE CASCADE,
            department_id UUID REFERENCES learning_platform.departments(id)
                ON DELETE SET NULL ON UPDATE CASCADE,
            created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
            updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
        )",
    ),
    (
        "course_collaborators",
        "CREATE TABLE learning_platform.course_collaborators (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            course_id UUID NOT NULL REFERENCES learning_platform.courses(id)
                ON DELETE CASCADE ON UPDATE CASCADE,
            user_id UUID NOT NULL REFERENCES learning_platform.users(id)
                ON DELETE CASCADE ON UPDATE CASCADE,
            created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
            updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
            CONSTRAINT course_collaborators_course_user_unique UNIQUE (course_id, user_id)
        )",
    ),
    (
        "course_modules",
        "CREATE TABLE learning_platform.course_modules (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            course_id UUID NOT NULL REFERENCES learning_platform.courses(id)
                ON DELETE CASCADE ON UPDATE CASCADE,
            title VARCHAR NOT NULL,
            description TEXT,
            position INTEGER NOT NULL DEFAULT 0,
            created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
            updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
        )",
    ),
    (
        "lessons",
        "CREATE TABLE learning_platform.lessons (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            module_id UUID NOT NULL REFERENCES learning_platform.course_modules(id)
                ON DELETE CASCADE ON UPDATE CASCADE,
            title VARCHAR NOT NULL,
            description TEXT,
            duration INTEGER NOT NULL DEFAULT 0 CHECK (duration >= 0),
            activity_type learning_platform.activity_type NOT NULL,
            status learning_platform.lesson_status NOT NULL DEFAULT 'fazer',
            notes TEXT,
            position INTEGER NOT NULL DEFAULT 0,
            created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
            updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
        )",
    ),
    (
        "approval_requests",
        "CREATE TABLE learning_platform.approval_requests (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            course_id UUID NOT NULL REFERENCES learning_platform.courses(id)
                ON DELETE CASCADE ON UPDATE CASCADE,
            requester_id UUID NOT NULL REFERENCES learning_platform.users(id)
                ON DELETE RESTRICT ON UPDATE CASCADE,
            approver_id UUID NOT NULL REFERENCES learning_platform.users(id)
                ON DELETE RESTRICT ON UPDATE CASCADE,
            request_type learning_platform.approval_type NOT NULL DEFAULT 'course',
            target_item_id UUID,
            status learning_platform.approval_status NOT NULL DEFAULT 'pendente',
            comments TEXT,
            reviewed_at TIMESTAMPTZ,
            created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
            updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
        )",
    ),
    (
        "dynamics",
        "CREATE TABLE learning_platform.dynamics (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            title VARCHAR NOT NULL,
            description TEXT NOT NULL,
            objective TEXT,
            category learning_platform.dynamic_category NOT NULL DEFAULT 'other',
            min_participants INTEGER,
            max_participants INTEGER,
            duration INTEGER NOT NULL DEFAULT 0 CHECK (duration >= 0),
            materials TEXT,
            instructions TEXT,
            tags TEXT[] NOT NULL DEFAULT '{}',
            created_by UUID NOT NULL REFERENCES learning_platform.users(id)
                ON DELETE RESTRICT ON UPDATE CASCADE,
            created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
            updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
            CONSTRAINT dynamics_participant_range CHECK (
                min_participants IS NULL
                OR max_participants IS NULL
                OR min_participants <= max_participants
            )
        )",
    ),
];

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        for (_, create_table_sql) in TABLES {
            db.execute_unprepared(create_table_sql).await?;
        }
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        for (table, _) in TABLES.iter().rev() {
            db.execute_unprepared(&format!(
                "DROP TABLE IF EXISTS learning_platform.{table}"
            ))
            .await?;
        }
        Ok(())
    }
}
