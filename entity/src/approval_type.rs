use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// What an approval request asks sign-off for. `Module` and `Lesson`
/// requests point at the item through `target_item_id`.
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
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "approval_type")]
pub enum ApprovalType {
    #[sea_orm(string_value = "course")]
    #[default]
    Course,
    #[sea_orm(string_value = "module")]
    Module,
    #[sea_orm(string_value = "lesson")]
    Lesson,
}

impl ApprovalType {
    pub fn requires_target(&self) -> bool {
        !matches!(self, ApprovalType::Course)
    }
}

impl std::fmt::Display for ApprovalType {
    fn fmt(&self, fmt: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApprovalType::Course => write!(fmt, "course"),
            ApprovalType::Module => write!(fmt, "module"),
            ApprovalType::Lesson => write!(fmt, "lesson"),
        }
    }
}
