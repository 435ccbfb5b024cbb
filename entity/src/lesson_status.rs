use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Production status of a lesson while the course is being built.
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
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "lesson_status")]
pub enum LessonStatus {
    #[serde(rename = "Fazer")]
    #[sea_orm(string_value = "fazer")]
    #[default]
    Todo,
    #[serde(rename = "Fazendo")]
    #[sea_orm(string_value = "fazendo")]
    Doing,
    #[serde(rename = "Finalizando")]
    #[sea_orm(string_value = "finalizando")]
    Finishing,
}

impl std::fmt::Display for LessonStatus {
    fn fmt(&self, fmt: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LessonStatus::Todo => write!(fmt, "Fazer"),
            LessonStatus::Doing => write!(fmt, "Fazendo"),
            LessonStatus::Finishing => write!(fmt, "Finalizando"),
        }
    }
}

impl From<&str> for LessonStatus {
    fn from(value: &str) -> Self {
        match value {
            "Fazendo" | "fazendo" => LessonStatus::Doing,
            "Finalizando" | "finalizando" => LessonStatus::Finishing,
            _ => LessonStatus::Todo,
        }
    }
}
