use crate::{activity_type::ActivityType, lesson_status::LessonStatus, Id};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize, ToSchema)]
#[schema(as = domain::lessons::Model)] // OpenAPI schema
#[sea_orm(schema_name = "learning_platform", table_name = "lessons")]
pub struct Model {
    #[serde(skip_deserializing)]
    #[sea_orm(primary_key)]
    pub id: Id,
    #[serde(skip_deserializing)]
    pub module_id: Id,
    pub title: String,
    pub description: Option<String>,
    /// Duration in minutes.
    #[serde(default)]
    pub duration: i32,
    #[serde(default)]
    pub activity_type: ActivityType,
    #[serde(default)]
    pub status: LessonStatus,
    pub notes: Option<String>,
    /// Zero-based index of the lesson within its module.
    #[serde(skip_deserializing)]
    pub position: i32,
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
        belongs_to = "super::course_modules::Entity",
        from = "Column::ModuleId",
        to = "super::course_modules::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    CourseModules,
}

impl Related<super::course_modules::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CourseModules.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Sum of the durations of `lessons` in minutes. Negative durations count as
/// zero and the sum saturates instead of overflowing.
pub fn total_duration<'a>(lessons: impl IntoIterator<Item = &'a Model>) -> i32 {
    lessons
        .into_iter()
        .map(|lesson| lesson.duration.max(0))
        .fold(0i32, |total, duration| total.saturating_add(duration))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lesson(duration: i32) -> Model {
        let now = chrono::Utc::now();
        Model {
            id: Id::new_v4(),
            module_id: Id::new_v4(),
            title: "Lesson".to_owned(),
            description: None,
            duration,
            activity_type: ActivityType::Video,
            status: LessonStatus::Todo,
            notes: None,
            position: 0,
            created_at: now.into(),
            updated_at: now.into(),
        }
    }

    #[test]
    fn total_duration_sums_lessons() {
        let lessons = vec![lesson(30), lesson(45), lesson(15)];
        assert_eq!(total_duration(&lessons), 90);
    }

    #[test]
    fn total_duration_of_nothing_is_zero() {
        assert_eq!(total_duration(&Vec::<Model>::new()), 0);
    }

    #[test]
    fn total_duration_ignores_negative_and_saturates() {
        assert_eq!(total_duration(&[lesson(-10), lesson(20)]), 20);
        assert_eq!(total_duration(&[lesson(i32::MAX), lesson(10)]), i32::MAX);
    }
}
