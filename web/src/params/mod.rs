//! Typed inputs of the HTTP endpoints: query strings, JSON bodies and path
//! segments. Filter and update parameters translate themselves into the
//! `QueryFilterMap`/`UpdateMap` shapes the domain layer consumes.

pub(crate) mod approval_request;
pub(crate) mod course;
pub(crate) mod course_module;
pub(crate) mod dynamic;
pub(crate) mod lesson;
pub(crate) mod sort;
pub(crate) mod user;

use domain::Id;
use serde::Deserialize;
use utoipa::ToSchema;

use sort::SortOrder;

/// The `{id}` segment of a path, whatever other segments follow it.
#[derive(Debug, Deserialize)]
pub(crate) struct IdPath {
    pub(crate) id: Id,
}

/// The complete new order of the children of a course or module.
#[derive(Debug, Deserialize, ToSchema)]
pub(crate) struct ReorderParams {
    #[schema(value_type = Vec<Uuid>)]
    pub(crate) ordered_ids: Vec<Id>,
}

/// Index parameters that fall back to a default sort when the client sends none.
pub(crate) trait WithSortDefaults {
    type SortField;

    const DEFAULT_ORDER: SortOrder = SortOrder::Desc;

    fn apply_sort_defaults(
        sort_by: &mut Option<Self::SortField>,
        sort_order: &mut Option<SortOrder>,
        default_field: Self::SortField,
    ) {
        if sort_by.is_none() {
            *sort_by = Some(default_field);
        }
        if sort_order.is_none() {
            *sort_order = Some(Self::DEFAULT_ORDER);
        }
    }
}
