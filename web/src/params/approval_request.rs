use sea_orm::{Order, Value};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

use super::sort::SortOrder;
use super::WithSortDefaults;
use domain::{
    approval_requests, approval_status::ApprovalStatus, Id, IntoQueryFilterMap, QueryFilterMap,
    QuerySort,
};

#[derive(Debug, Deserialize, ToSchema)]
#[schema(example = "created_at")]
pub(crate) enum ApprovalRequestSortField {
    #[serde(rename = "created_at")]
    CreatedAt,
    #[serde(rename = "updated_at")]
    UpdatedAt,
    #[serde(rename = "reviewed_at")]
    ReviewedAt,
}

#[derive(Debug, Deserialize, IntoParams)]
pub(crate) struct IndexParams {
    #[param(value_type = Option<Uuid>)]
    pub(crate) course_id: Option<Id>,
    pub(crate) status: Option<ApprovalStatus>,
    #[param(value_type = Option<Uuid>)]
    pub(crate) approver_id: Option<Id>,
    #[param(value_type = Option<Uuid>)]
    pub(crate) requester_id: Option<Id>,
    pub(crate) sort_by: Option<ApprovalRequestSortField>,
    pub(crate) sort_order: Option<SortOrder>,
}

impl IntoQueryFilterMap for IndexParams {
    fn into_query_filter_map(self) -> QueryFilterMap {
        let mut query_filter_map = QueryFilterMap::new();
        for (column, id) in [
            ("course_id", self.course_id),
            ("approver_id", self.approver_id),
            ("requester_id", self.requester_id),
        ] {
            if let Some(id) = id {
                query_filter_map.insert(column.to_string(), Some(Value::Uuid(Some(Box::new(id)))));
            }
        }
        if let Some(status) = self.status {
            query_filter_map.insert("status".to_string(), Some(Into::<Value>::into(status)));
        }
        query_filter_map
    }
}

impl QuerySort<approval_requests::Column> for IndexParams {
    fn get_sort_column(&self) -> Option<approval_requests::Column> {
        self.sort_by.as_ref().map(|field| match field {
            ApprovalRequestSortField::CreatedAt => approval_requests::Column::CreatedAt,
            ApprovalRequestSortField::UpdatedAt => approval_requests::Column::UpdatedAt,
            ApprovalRequestSortField::ReviewedAt => approval_requests::Column::ReviewedAt,
        })
    }

    fn get_sort_order(&self) -> Option<Order> {
        self.sort_order.as_ref().map(Order::from)
    }
}

impl WithSortDefaults for IndexParams {
    type SortField = ApprovalRequestSortField;
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub(crate) struct ApproveParams {
    pub(crate) comments: Option<String>,
}

/// A rejection must say what has to change.
#[derive(Debug, Deserialize, ToSchema)]
pub(crate) struct RejectParams {
    pub(crate) comments: String,
}
