use sea_orm::Value;
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

use domain::course::CourseQuery;
use domain::{course_status::CourseStatus, Id, IntoUpdateMap, UpdateMap};

/// Filters for the list of courses visible to the caller.
#[derive(Debug, Default, Deserialize, IntoParams)]
pub(crate) struct IndexParams {
    pub(crate) status: Option<CourseStatus>,
    #[param(value_type = Option<Uuid>)]
    pub(crate) department_id: Option<Id>,
    pub(crate) tag: Option<String>,
    /// Case-insensitive part of the course name.
    pub(crate) search: Option<String>,
}

impl From<IndexParams> for CourseQuery {
    fn from(params: IndexParams) -> Self {
        CourseQuery {
            status: params.status,
            department_id: params.department_id,
            tag: params.tag,
            search: params.search,
        }
    }
}

#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct UpdateParams {
    pub name: Option<String>,
    pub description: Option<String>,
    pub objectives: Option<String>,
    pub target_audience: Option<String>,
    pub tags: Option<Vec<String>>,
    #[schema(value_type = Option<Uuid>)]
    #[param(value_type = Option<Uuid>)]
    pub department_id: Option<Id>,
}

impl IntoUpdateMap for UpdateParams {
    fn into_update_map(self) -> UpdateMap {
        let mut update_map = UpdateMap::new();
        for (column, text) in [
            ("name", self.name),
            ("description", self.description),
            ("objectives", self.objectives),
            ("target_audience", self.target_audience),
        ] {
            if let Some(text) = text {
                update_map.insert(column.to_string(), Some(Value::String(Some(Box::new(text)))));
            }
        }
        if let Some(tags) = self.tags {
            update_map.insert("tags".to_string(), Some(Value::from(tags)));
        }
        if let Some(department_id) = self.department_id {
            update_map.insert(
                "department_id".to_string(),
                Some(Value::Uuid(Some(Box::new(department_id)))),
            );
        }
        update_map
    }
}

#[derive(Debug, Deserialize, IntoParams)]
pub(crate) struct StatusParams {
    pub(crate) value: CourseStatus,
}

/// The full set of collaborators a course should end up with.
#[derive(Debug, Deserialize, ToSchema)]
pub(crate) struct CollaboratorsParams {
    #[schema(value_type = Vec<Uuid>)]
    pub(crate) user_ids: Vec<Id>,
}
