use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Platform-wide role of a user. Admins manage users and departments and may
/// review any approval request; managers may be assigned as approvers.
#[derive(
    Debug,
    Clone,
    Copy,
    Eq,
    PartialEq,
    EnumIter,
    Deserialize,
    Default,
    Serialize,
    DeriveActiveEnum,
    ToSchema,
)]
#[serde(rename_all = "lowercase")]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "role")]
pub enum Role {
    #[sea_orm(string_value = "admin")]
    Admin,
    #[sea_orm(string_value = "manager")]
    Manager,
    #[sea_orm(string_value = "instructor")]
    Instructor,
    #[sea_orm(string_value = "collaborator")]
    #[default]
    Collaborator,
}

impl Role {
    /// Roles allowed to sign off on an approval request.
    pub fn can_approve(&self) -> bool {
        matches!(self, Role::Admin | Role::Manager)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, fmt: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Admin => write!(fmt, "admin"),
            Role::Manager => write!(fmt, "manager"),
            Role::Instructor => write!(fmt, "instructor"),
            Role::Collaborator => write!(fmt, "collaborator"),
        }
    }
}

impl From<&str> for Role {
    fn from(value: &str) -> Self {
        match value.to_lowercase().as_str() {
            "admin" => Role::Admin,
            "manager" => Role::Manager,
            "instructor" => Role::Instructor,
            _ => Role::Collaborator,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_admins_and_managers_can_approve() {
        assert!(Role::Admin.can_approve());
        assert!(Role::Manager.can_approve());
        assert!(!Role::Instructor.can_approve());
        assert!(!Role::Collaborator.can_approve());
    }

    #[test]
    fn unknown_role_string_falls_back_to_collaborator() {
        assert_eq!(Role::from("ADMIN"), Role::Admin);
        assert_eq!(Role::from("owner"), Role::Collaborator);
    }
}
