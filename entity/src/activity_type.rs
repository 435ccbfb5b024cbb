use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Kind of activity a lesson is delivered as.
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
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "activity_type")]
pub enum ActivityType {
    #[sea_orm(string_value = "video")]
    Video,
    #[sea_orm(string_value = "leitura")]
    Leitura,
    #[sea_orm(string_value = "exercicio")]
    Exercicio,
    #[sea_orm(string_value = "dinamica")]
    Dinamica,
    #[sea_orm(string_value = "apresentacao")]
    #[default]
    Apresentacao,
    #[sea_orm(string_value = "discussao")]
    Discussao,
    #[sea_orm(string_value = "avaliacao")]
    Avaliacao,
}

impl std::fmt::Display for ActivityType {
    fn fmt(&self, fmt: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ActivityType::Video => write!(fmt, "video"),
            ActivityType::Leitura => write!(fmt, "leitura"),
            ActivityType::Exercicio => write!(fmt, "exercicio"),
            ActivityType::Dinamica => write!(fmt, "dinamica"),
            ActivityType::Apresentacao => write!(fmt, "apresentacao"),
            ActivityType::Discussao => write!(fmt, "discussao"),
            ActivityType::Avaliacao => write!(fmt, "avaliacao"),
        }
    }
}
