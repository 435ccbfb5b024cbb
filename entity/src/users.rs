use crate::Id;
use axum_login::AuthUser;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub use crate::roles::Role;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize, ToSchema)]
#[schema(as = domain::users::Model)] // OpenAPI schema
#[sea_orm(schema_name = "learning_platform", table_name = "users")]
pub struct Model {
    #[serde(skip_deserializing)]
    #[sea_orm(primary_key)]
    pub id: Id,
    #[sea_orm(unique, indexed)]
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub display_name: Option<String>,
    #[serde(skip_serializing)]
    pub password: String,
    #[serde(default)]
    pub role: Role,
    #[schema(value_type = Option<Uuid>)]
    pub department_id: Option<Id>,
    #[serde(skip_deserializing)]
    #[schema(value_type = String, format = DateTime)] // Applies to OpenAPI schema
    pub created_at: DateTimeWithTimeZone,
    #[serde(skip_deserializing)]
    #[schema(value_type = String, format = DateTime)] // Applies to OpenAPI schema
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::departments::Entity",
        from = "Column::DepartmentId",
        to = "super::departments::Column::Id",
        on_update = "Cascade",
        on_delete = "SetNull"
    )]
    Departments,
    #[sea_orm(has_many = "super::courses::Entity")]
    Courses,
    #[sea_orm(has_many = "super::course_collaborators::Entity")]
    CourseCollaborators,
}

impl Related<super::departments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Departments.def()
    }
}

impl Related<super::courses::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Courses.def()
    }
}

impl Related<super::course_collaborators::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CourseCollaborators.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Name to show in listings: the display name when set, otherwise
    /// "first last".
    pub fn full_name(&self) -> String {
        match &self.display_name {
            Some(display_name) if !display_name.trim().is_empty() => display_name.clone(),
            _ => format!("{} {}", self.first_name, self.last_name),
        }
    }
}

impl AuthUser for Model {
    type Id = Id;

    fn id(&self) -> Self::Id {
        self.id
    }

    // Changing the password invalidates every existing session.
    fn session_auth_hash(&self) -> &[u8] {
        self.password.as_bytes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(display_name: Option<&str>) -> Model {
        let now = chrono::Utc::now();
        Model {
            id: Id::new_v4(),
            email: "ana@example.com".to_owned(),
            first_name: "Ana".to_owned(),
            last_name: "Souza".to_owned(),
            display_name: display_name.map(str::to_owned),
            password: "hash".to_owned(),
            role: Role::Instructor,
            department_id: None,
            created_at: now.into(),
            updated_at: now.into(),
        }
    }

    #[test]
    fn full_name_prefers_display_name() {
        assert_eq!(user(Some("Aninha")).full_name(), "Aninha");
        assert_eq!(user(Some("  ")).full_name(), "Ana Souza");
        assert_eq!(user(None).full_name(), "Ana Souza");
    }

    #[test]
    fn password_is_never_serialized() {
        let json = serde_json::to_value(user(None)).unwrap();
        assert!(json.get("password").is_none());
        assert_eq!(json["role"], "instructor");
    }
}
