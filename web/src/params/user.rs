use sea_orm::{Order, Value};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

use super::sort::SortOrder;
use super::WithSortDefaults;
use domain::{roles::Role, users, Id, IntoQueryFilterMap, IntoUpdateMap, QueryFilterMap, QuerySort, UpdateMap};

/// Profile fields a user may change on their own account.
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct UpdateParams {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub display_name: Option<String>,
}

impl IntoUpdateMap for UpdateParams {
    fn into_update_map(self) -> UpdateMap {
        let mut update_map = UpdateMap::new();
        if let Some(first_name) = self.first_name {
            update_map.insert(
                "first_name".to_string(),
                Some(Value::String(Some(Box::new(first_name)))),
            );
        }
        if let Some(last_name) = self.last_name {
            update_map.insert(
                "last_name".to_string(),
                Some(Value::String(Some(Box::new(last_name)))),
            );
        }
        if let Some(display_name) = self.display_name {
            update_map.insert(
                "display_name".to_string(),
                Some(Value::String(Some(Box::new(display_name)))),
            );
        }
        update_map
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdatePasswordParams {
    pub current_password: String,
    pub new_password: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ResetPasswordParams {
    pub password: String,
}

/// What an administrator may change about another user.
#[derive(Debug, Deserialize, ToSchema)]
pub struct RoleDepartmentParams {
    pub role: Role,
    #[schema(value_type = Option<Uuid>)]
    pub department_id: Option<Id>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[schema(example = "last_name")]
pub(crate) enum UserSortField {
    #[serde(rename = "last_name")]
    LastName,
    #[serde(rename = "email")]
    Email,
    #[serde(rename = "created_at")]
    CreatedAt,
}

#[derive(Debug, Deserialize, IntoParams)]
pub(crate) struct IndexParams {
    pub(crate) role: Option<Role>,
    #[param(value_type = Option<Uuid>)]
    pub(crate) department_id: Option<Id>,
    pub(crate) sort_by: Option<UserSortField>,
    pub(crate) sort_order: Option<SortOrder>,
}

impl IntoQueryFilterMap for IndexParams {
    fn into_query_filter_map(self) -> QueryFilterMap {
        let mut query_filter_map = QueryFilterMap::new();
        if let Some(role) = self.role {
            query_filter_map.insert("role".to_string(), Some(Into::<Value>::into(role)));
        }
        if let Some(department_id) = self.department_id {
            query_filter_map.insert(
                "department_id".to_string(),
                Some(Value::Uuid(Some(Box::new(department_id)))),
            );
        }
        query_filter_map
    }
}

impl QuerySort<users::Column> for IndexParams {
    fn get_sort_column(&self) -> Option<users::Column> {
        self.sort_by.as_ref().map(|field| match field {
            UserSortField::LastName => users::Column::LastName,
            UserSortField::Email => users::Column::Email,
            UserSortField::CreatedAt => users::Column::CreatedAt,
        })
    }

    fn get_sort_order(&self) -> Option<Order> {
        self.sort_order.as_ref().map(Order::from)
    }
}

impl WithSortDefaults for IndexParams {
    type SortField = UserSortField;

    const DEFAULT_ORDER: SortOrder = SortOrder::Asc;
}
