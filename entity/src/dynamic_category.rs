use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

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
#[serde(rename_all = "snake_case")]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "dynamic_category")]
pub enum DynamicCategory {
    #[sea_orm(string_value = "icebreaker")]
    Icebreaker,
    #[sea_orm(string_value = "energizer")]
    Energizer,
    #[sea_orm(string_value = "team_building")]
    TeamBuilding,
    #[sea_orm(string_value = "reflection")]
    Reflection,
    #[sea_orm(string_value = "closing")]
    Closing,
    #[sea_orm(string_value = "other")]
    #[default]
    Other,
}

impl std::fmt::Display for DynamicCategory {
    fn fmt(&self, fmt: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DynamicCategory::Icebreaker => write!(fmt, "icebreaker"),
            DynamicCategory::Energizer => write!(fmt, "energizer"),
            DynamicCategory::TeamBuilding => write!(fmt, "team_building"),
            DynamicCategory::Reflection => write!(fmt, "reflection"),
            DynamicCategory::Closing => write!(fmt, "closing"),
            DynamicCategory::Other => write!(fmt, "other"),
        }
    }
}
