use crate::{dynamic_category::DynamicCategory, Id};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A reusable facilitation exercise, independent of any course.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize, ToSchema)]
#[schema(as = domain::dynamics::Model)] // OpenAPI schema
#[sea_orm(schema_name = "learning_platform", table_name = "dynamics")]
pub struct Model {
    #[serde(skip_deserializing)]
    #[sea_orm(primary_key)]
    pub id: Id,
    pub title: String,
    pub description: String,
    pub objective: Option<String>,
    #[serde(default)]
    pub category: DynamicCategory,
    pub min_participants: Option<i32>,
    pub max_participants: Option<i32>,
    /// Duration in minutes.
    #[serde(default)]
    pub duration: i32,
    pub materials: Option<String>,
    pub instructions: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(skip_deserializing)]
    pub created_by: Id,
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
        belongs_to = "super::users::Entity",
        from = "Column::CreatedBy",
        to = "super::users::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Users,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Whether the dynamic can be run with a group of `group_size` people.
    /// Missing bounds are treated as open.
    pub fn fits_group_of(&self, group_size: i32) -> bool {
        self.min_participants.map_or(true, |min| group_size >= min)
            && self.max_participants.map_or(true, |max| group_size <= max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dynamic(min: Option<i32>, max: Option<i32>) -> Model {
        let now = chrono::Utc::now();
        Model {
            id: Id::new_v4(),
            title: "Teia".to_owned(),
            description: "Pass the yarn ball".to_owned(),
            objective: None,
            category: DynamicCategory::Icebreaker,
            min_participants: min,
            max_participants: max,
            duration: 15,
            materials: Some("Yarn ball".to_owned()),
            instructions: None,
            tags: vec!["integração".to_owned()],
            created_by: Id::new_v4(),
            created_at: now.into(),
            updated_at: now.into(),
        }
    }

    #[test]
    fn fits_group_within_bounds() {
        let d = dynamic(Some(4), Some(20));
        assert!(d.fits_group_of(4));
        assert!(d.fits_group_of(20));
        assert!(!d.fits_group_of(3));
        assert!(!d.fits_group_of(21));
    }

    #[test]
    fn missing_bounds_are_open() {
        assert!(dynamic(None, None).fits_group_of(1));
        assert!(dynamic(Some(5), None).fits_group_of(500));
        assert!(dynamic(None, Some(8)).fits_group_of(1));
    }

    #[test]
    fn server_managed_fields_are_not_deserialized() {
        let json = r#"{
            "id": "a98c3295-0933-44cb-89db-7db0f7250fb1",
            "title": "Teia",
            "description": "Pass the yarn ball",
            "objective": null,
            "category": "team_building",
            "min_participants": null,
            "max_participants": null,
            "materials": null,
            "instructions": null
        }"#;
        let parsed: Model = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.id, Id::nil());
        assert_eq!(parsed.category, DynamicCategory::TeamBuilding);
        assert_eq!(parsed.duration, 0);
        assert!(parsed.tags.is_empty());
    }
}
