use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Lifecycle status of a course.
///
/// The wire representation keeps the labels the client application displays
/// (`"Rascunho"`, `"Em aprovação"`, ...), while the database enum stores ASCII
/// identifiers.
#[derive(
    Debug,
    Clone,
    Copy,
    Eq,
    PartialEq,
    Hash,
    EnumIter,
    Deserialize,
    Default,
    Serialize,
    DeriveActiveEnum,
    ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "course_status")]
pub enum CourseStatus {
    #[serde(rename = "Rascunho")]
    #[sea_orm(string_value = "rascunho")]
    #[default]
    Draft,
    #[serde(rename = "Em andamento")]
    #[sea_orm(string_value = "em_andamento")]
    InProgress,
    #[serde(rename = "Em aprovação")]
    #[sea_orm(string_value = "em_aprovacao")]
    InApproval,
    #[serde(rename = "Aprovado")]
    #[sea_orm(string_value = "aprovado")]
    Approved,
    #[serde(rename = "Revisão solicitada")]
    #[sea_orm(string_value = "revisao_solicitada")]
    RevisionRequested,
}

impl CourseStatus {
    /// The conventional status graph. Manual status changes are not bound by
    /// it, but every change driven by the approval workflow is.
    pub fn can_transition_to(&self, next: CourseStatus) -> bool {
        use CourseStatus::*;
        match self {
            Draft => matches!(next, InProgress | InApproval),
            InProgress => matches!(next, Draft | InApproval),
            InApproval => matches!(next, Approved | RevisionRequested | InProgress),
            RevisionRequested => matches!(next, InProgress | InApproval),
            Approved => matches!(next, InProgress),
        }
    }

    /// Whether a course in this status may be submitted for approval.
    pub fn accepts_submission(&self) -> bool {
        matches!(
            self,
            CourseStatus::Draft | CourseStatus::InProgress | CourseStatus::RevisionRequested
        )
    }

    /// Label shown to users.
    pub fn label(&self) -> &'static str {
        match self {
            CourseStatus::Draft => "Rascunho",
            CourseStatus::InProgress => "Em andamento",
            CourseStatus::InApproval => "Em aprovação",
            CourseStatus::Approved => "Aprovado",
            CourseStatus::RevisionRequested => "Revisão solicitada",
        }
    }
}

impl std::fmt::Display for CourseStatus {
    fn fmt(&self, fmt: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(fmt, "{}", self.label())
    }
}

/// Parses either the display label or the stored identifier. Unknown values
/// fall back to `Draft`.
impl From<&str> for CourseStatus {
    fn from(value: &str) -> Self {
        match value {
            "Em andamento" | "em_andamento" => CourseStatus::InProgress,
            "Em aprovação" | "em_aprovacao" => CourseStatus::InApproval,
            "Aprovado" | "aprovado" => CourseStatus::Approved,
            "Revisão solicitada" | "revisao_solicitada" => CourseStatus::RevisionRequested,
            _ => CourseStatus::Draft,
        }
    }
}
