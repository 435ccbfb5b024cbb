//! Generic, column-driven query helpers shared by every entity.
use crate::error::Error;
use sea_orm::{
    sea_query::LikeExpr, ColumnTrait, ConnectionTrait, EntityTrait, Order, QueryFilter,
    QueryOrder, Value,
};
use std::collections::HashMap;

/// `QueryFilterMap` is a data structure that serves as a bridge for translating filter parameters
/// between different layers of the application. It is essentially a wrapper around a `HashMap`
/// where the keys are column names (as `String`) and the values are optional `Value` types
/// from `sea_orm`.
///
/// # Example
///
/// ```
/// use sea_orm::Value;
/// use entity_api::QueryFilterMap;
///
/// let mut query_filter_map = QueryFilterMap::new();
/// query_filter_map.insert("course_id".to_string(), Some(Value::String(Some(Box::new("a_course_id".to_string())))));
/// let filter_value = query_filter_map.get("course_id");
/// assert!(filter_value.is_some());
/// ```
pub struct QueryFilterMap {
    map: HashMap<String, Option<Value>>,
}

impl QueryFilterMap {
    pub fn new() -> Self {
        Self {
            map: HashMap::new(),
        }
    }

    pub fn get(&self, key: &str) -> Option<Value> {
        // HashMap.get returns an Option and so we need to "flatten" this to a single Option
        self.map
            .get(key)
            .and_then(|inner_option| inner_option.clone())
    }

    pub fn insert(&mut self, key: String, value: Option<Value>) {
        self.map.insert(key, value);
    }
}

impl Default for QueryFilterMap {
    fn default() -> Self {
        Self::new()
    }
}

/// `IntoQueryFilterMap` converts a parameter struct into a `QueryFilterMap`, defining which
/// fields map to which columns.
///
/// # Example
///
/// ```
/// use entity_api::{IntoQueryFilterMap, QueryFilterMap};
///
/// #[derive(Debug)]
/// struct MyParams {
///     course_id: String,
/// }
///
/// impl IntoQueryFilterMap for MyParams {
///     fn into_query_filter_map(self) -> QueryFilterMap {
///         let mut query_filter_map = QueryFilterMap::new();
///         query_filter_map.insert(
///             "course_id".to_string(),
///             Some(sea_orm::Value::String(Some(Box::new(self.course_id)))),
///         );
///         query_filter_map
///     }
/// }
/// ```
pub trait IntoQueryFilterMap {
    fn into_query_filter_map(self) -> QueryFilterMap;
}

/// Optional ordering supplied alongside a filter. Both the column and the
/// order must be present for sorting to be applied.
pub trait QuerySort<C> {
    fn get_sort_column(&self) -> Option<C>;
    fn get_sort_order(&self) -> Option<Order>;
}

/// Wraps filter parameters that carry no sorting information.
pub struct FilterOnly<P>(pub P);

impl<P: IntoQueryFilterMap> IntoQueryFilterMap for FilterOnly<P> {
    fn into_query_filter_map(self) -> QueryFilterMap {
        self.0.into_query_filter_map()
    }
}

impl<P, C> QuerySort<C> for FilterOnly<P> {
    fn get_sort_column(&self) -> Option<C> {
        None
    }

    fn get_sort_order(&self) -> Option<Order> {
        None
    }
}

/// Find all records of an entity by the given filter parameters, optionally sorted.
pub async fn find_by<E, C, P>(db: &impl ConnectionTrait, params: P) -> Result<Vec<E::Model>, Error>
where
    E: EntityTrait<Column = C>,
    C: ColumnTrait,
    P: IntoQueryFilterMap + QuerySort<C>,
{
    let sort_column = params.get_sort_column();
    let sort_order = params.get_sort_order();
    let query_filter_map = params.into_query_filter_map();

    let mut query = E::find();

    // We iterate through the entity's defined columns so that we only attempt
    // to filter by columns that exist.
    for column in C::iter() {
        if let Some(value) = query_filter_map.get(&column.to_string()) {
            query = query.filter(column.eq(value));
        }
    }

    if let (Some(column), Some(order)) = (sort_column, sort_order) {
        query = query.order_by(column, order);
    }

    Ok(query.all(db).await?)
}

/// Case-insensitive "contains" pattern for user supplied search text. `%`,
/// `_` and `\` are matched literally.
pub fn contains_pattern(text: &str) -> LikeExpr {
    LikeExpr::new(format!("%{}%", escape_like(text))).escape('\\')
}

fn escape_like(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.trim().to_lowercase().chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[cfg(test)]
mod pattern_tests {
    use super::escape_like;

    #[test]
    fn wildcards_are_escaped() {
        assert_eq!(escape_like(" 100%_Off "), r"100\%\_off");
        assert_eq!(escape_like(r"a\b"), r"a\\b");
        assert_eq!(escape_like("Liderança"), "liderança");
    }
}
