use super::error::Error;
use chrono::Utc;
use entity::departments::{ActiveModel, Column, Entity, Model};
use entity::Id;
use log::*;
use sea_orm::{entity::prelude::*, ActiveValue::Set, ActiveValue::Unchanged, QueryOrder};

pub async fn create(db: &impl ConnectionTrait, department_model: Model) -> Result<Model, Error> {
    debug!("New Department Model to be inserted: {department_model:?}");

    let now = Utc::now();
    let active_model = ActiveModel {
        name: Set(department_model.name.trim().to_owned()),
        description: Set(department_model.description),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
        ..Default::default()
    };

    Ok(active_model.insert(db).await?)
}

pub async fn update(db: &impl ConnectionTrait, id: Id, model: Model) -> Result<Model, Error> {
    let department = find_by_id(db, id).await?;
    debug!("Existing Department Model to be updated: {department:?}");

    let active_model = ActiveModel {
        id: Unchanged(department.id),
        name: Set(model.name.trim().to_owned()),
        description: Set(model.description),
        created_at: Unchanged(department.created_at),
        updated_at: Set(Utc::now().into()),
    };

    Ok(active_model.update(db).await?)
}

/// Users and courses referencing the department keep existing; the foreign
/// keys clear their `department_id`.
pub async fn delete_by_id(db: &impl ConnectionTrait, id: Id) -> Result<(), Error> {
    let department = find_by_id(db, id).await?;
    department.delete(db).await?;
    Ok(())
}

pub async fn find_all(db: &impl ConnectionTrait) -> Result<Vec<Model>, Error> {
    Ok(Entity::find().order_by_asc(Column::Name).all(db).await?)
}

pub async fn find_by_id(db: &impl ConnectionTrait, id: Id) -> Result<Model, Error> {
    Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(Error::not_found)
}
