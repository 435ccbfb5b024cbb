use crate::{approval_status::ApprovalStatus, approval_type::ApprovalType, Id};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize, ToSchema)]
#[schema(as = domain::approval_requests::Model)] // OpenAPI schema
#[sea_orm(schema_name = "learning_platform", table_name = "approval_requests")]
pub struct Model {
    #[serde(skip_deserializing)]
    #[sea_orm(primary_key)]
    pub id: Id,
    #[schema(value_type = Uuid)]
    pub course_id: Id,
    #[serde(skip_deserializing)]
    pub requester_id: Id,
    #[schema(value_type = Uuid)]
    pub approver_id: Id,
    #[serde(default)]
    pub request_type: ApprovalType,
    #[schema(value_type = Option<Uuid>)]
    pub target_item_id: Option<Id>,
    #[serde(skip_deserializing)]
    pub status: ApprovalStatus,
    pub comments: Option<String>,
    #[serde(skip_deserializing)]
    #[schema(value_type = Option<String>, format = DateTime)] // Applies to OpenAPI schema
    pub reviewed_at: Option<DateTimeWithTimeZone>,
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
        belongs_to = "super::courses::Entity",
        from = "Column::CourseId",
        to = "super::courses::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Courses,
}

impl Related<super::courses::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Courses.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
