use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Decision state of an approval request.
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
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "approval_status")]
pub enum ApprovalStatus {
    #[serde(rename = "pendente")]
    #[sea_orm(string_value = "pendente")]
    #[default]
    Pending,
    #[serde(rename = "aprovado")]
    #[sea_orm(string_value = "aprovado")]
    Approved,
    #[serde(rename = "rejeitado")]
    #[sea_orm(string_value = "rejeitado")]
    Rejected,
}

impl std::fmt::Display for ApprovalStatus {
    fn fmt(&self, fmt: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApprovalStatus::Pending => write!(fmt, "pendente"),
            ApprovalStatus::Approved => write!(fmt, "aprovado"),
            ApprovalStatus::Rejected => write!(fmt, "rejeitado"),
        }
    }
}

impl From<&str> for ApprovalStatus {
    fn from(value: &str) -> Self {
        match value {
            "aprovado" => ApprovalStatus::Approved,
            "rejeitado" => ApprovalStatus::Rejected,
            _ => ApprovalStatus::Pending,
        }
    }
}
