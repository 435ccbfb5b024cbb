use crate::error::Error;
use crate::{dynamics, tags, Id};
use entity_api::dynamic;
use log::*;
use sea_orm::DatabaseConnection;

pub use entity_api::dynamic::{find_by_id, DynamicQuery};

pub async fn create(
    db: &DatabaseConnection,
    dynamic_model: dynamics::Model,
    created_by: Id,
) -> Result<dynamics::Model, Error> {
    validate(&dynamic_model)?;
    let created = dynamic::create(db, normalize_tags(dynamic_model), created_by).await?;
    info!("Dynamic {} added to the bank by {created_by}", created.id);
    Ok(created)
}

pub async fn update(
    db: &DatabaseConnection,
    id: Id,
    dynamic_model: dynamics::Model,
) -> Result<dynamics::Model, Error> {
    validate(&dynamic_model)?;
    Ok(dynamic::update(db, id, normalize_tags(dynamic_model)).await?)
}

pub async fn delete(db: &DatabaseConnection, id: Id) -> Result<(), Error> {
    Ok(dynamic::delete_by_id(db, id).await?)
}

pub async fn search(
    db: &DatabaseConnection,
    dynamic_query: DynamicQuery,
) -> Result<Vec<dynamics::Model>, Error> {
    if dynamic_query.group_size.is_some_and(|size| size < 1)
        || dynamic_query.max_duration.is_some_and(|minutes| minutes < 0)
    {
        return Err(Error::invalid());
    }
    Ok(dynamic::search(db, dynamic_query).await?)
}

fn validate(dynamic_model: &dynamics::Model) -> Result<(), Error> {
    let participants_ok = match (dynamic_model.min_participants, dynamic_model.max_participants) {
        (Some(min), Some(max)) => 0 < min && min <= max,
        (Some(min), None) => min > 0,
        (None, Some(max)) => max > 0,
        (None, None) => true,
    };

    if dynamic_model.title.trim().is_empty() || dynamic_model.duration < 0 || !participants_ok {
        warn!("Rejected dynamic \"{}\"", dynamic_model.title);
        return Err(Error::invalid());
    }
    Ok(())
}

fn normalize_tags(dynamic_model: dynamics::Model) -> dynamics::Model {
    dynamics::Model {
        tags: tags::normalize(&dynamic_model.tags),
        ..dynamic_model
    }
}
