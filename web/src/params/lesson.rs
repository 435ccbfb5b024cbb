use sea_orm::Value;
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

use domain::{
    activity_type::ActivityType, lesson_status::LessonStatus, Id, IntoUpdateMap, UpdateMap,
};

#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct UpdateParams {
    pub title: Option<String>,
    pub description: Option<String>,
    /// Minutes.
    pub duration: Option<i32>,
    pub activity_type: Option<ActivityType>,
    pub status: Option<LessonStatus>,
    pub notes: Option<String>,
}

impl IntoUpdateMap for UpdateParams {
    fn into_update_map(self) -> UpdateMap {
        let mut update_map = UpdateMap::new();
        for (column, text) in [
            ("title", self.title),
            ("description", self.description),
            ("notes", self.notes),
        ] {
            if let Some(text) = text {
                update_map.insert(column.to_string(), Some(Value::String(Some(Box::new(text)))));
            }
        }
        if let Some(duration) = self.duration {
            update_map.insert("duration".to_string(), Some(Value::Int(Some(duration))));
        }
        if let Some(activity_type) = self.activity_type {
            update_map.insert("activity_type".to_string(), Some(Into::<Value>::into(activity_type)));
        }
        if let Some(status) = self.status {
            update_map.insert("status".to_string(), Some(Into::<Value>::into(status)));
        }
        update_map
    }
}

#[derive(Debug, Deserialize, IntoParams)]
pub(crate) struct StatusParams {
    pub(crate) value: LessonStatus,
}

/// The module a lesson should move to.
#[derive(Debug, Deserialize, ToSchema)]
pub(crate) struct MoveParams {
    #[schema(value_type = Uuid)]
    pub(crate) module_id: Id,
}
