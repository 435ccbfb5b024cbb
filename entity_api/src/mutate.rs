use crate::error::Error;
use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait,
    IntoActiveModel, Value,
};
use std::collections::HashMap;

/// Column names callers may never write through a partial update, whatever the
/// parameter struct puts in the map.
const PROTECTED_COLUMNS: &[&str] = &["id", "created_at"];

/// Updates an existing record using a map of column names to values.
///
/// Only the columns present in `update_map` are modified; `updated_at` is
/// bumped whenever the entity has that column. Keys that do not name a column
/// of the entity are ignored.
pub async fn update<A, C>(
    db: &impl ConnectionTrait,
    mut active_model: A,
    update_map: UpdateMap,
) -> Result<<A::Entity as EntityTrait>::Model, Error>
where
    A: ActiveModelTrait + ActiveModelBehavior + Send,
    C: ColumnTrait,
    A::Entity: EntityTrait<Column = C>,
    <A::Entity as EntityTrait>::Model: IntoActiveModel<A>,
{
    let now: sea_orm::prelude::DateTimeWithTimeZone = chrono::Utc::now().into();

    for column in C::iter() {
        let name = column.to_string();
        if PROTECTED_COLUMNS.contains(&name.as_str()) {
            continue;
        }
        if name == "updated_at" {
            active_model.set(column, now.into());
            continue;
        }
        if let Some(value) = update_map.get(&name) {
            active_model.set(column, value.clone());
        }
    }
    Ok(active_model.update(db).await?)
}

/// A map structure that holds column names and their corresponding values for updates.
///
/// A key mapped to `None` is treated the same as an absent key; use an explicit
/// null `Value` (e.g. `Value::Uuid(None)`) to clear a nullable column.
#[derive(Default)]
pub struct UpdateMap {
    map: HashMap<String, Option<Value>>,
}

impl UpdateMap {
    /// Creates a new empty UpdateMap.
    pub fn new() -> Self {
        Self::default()
    }

    /// Retrieves a value from the map by its key.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.map.get(key).and_then(|opt| opt.as_ref())
    }

    /// Removes a key-value pair from the map.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.map.remove(key).and_then(|opt| opt)
    }

    /// Inserts a key-value pair into the map, overwriting any previous value.
    pub fn insert(&mut self, key: String, value: Option<Value>) {
        self.map.insert(key, value);
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.map.values().all(Option::is_none)
    }
}

/// A trait that allows types to be converted into an UpdateMap.
pub trait IntoUpdateMap {
    /// Converts the implementing type into an UpdateMap.
    fn into_update_map(self) -> UpdateMap;
}
