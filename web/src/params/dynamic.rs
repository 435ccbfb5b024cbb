use serde::Deserialize;
use utoipa::IntoParams;

use domain::dynamic::DynamicQuery;
use domain::dynamic_category::DynamicCategory;

/// Search filters for the dynamics bank. All of them are optional.
#[derive(Debug, Default, Deserialize, IntoParams)]
pub(crate) struct IndexParams {
    pub(crate) category: Option<DynamicCategory>,
    pub(crate) tag: Option<String>,
    /// Matched against title and description.
    pub(crate) text: Option<String>,
    /// Longest acceptable duration in minutes.
    pub(crate) max_duration: Option<i32>,
    /// Number of participants the dynamic must accommodate.
    pub(crate) group_size: Option<i32>,
}

impl From<IndexParams> for DynamicQuery {
    fn from(params: IndexParams) -> Self {
        DynamicQuery {
            category: params.category,
            tag: params.tag,
            text: params.text,
            max_duration: params.max_duration,
            group_size: params.group_size,
        }
    }
}
