use crate::error::Error;
use crate::{departments, Id};
use entity_api::department;
use log::*;
use sea_orm::DatabaseConnection;

pub use entity_api::department::{find_all, find_by_id};

pub async fn create(
    db: &DatabaseConnection,
    department_model: departments::Model,
) -> Result<departments::Model, Error> {
    if department_model.name.trim().is_empty() {
        return Err(Error::invalid());
    }
    Ok(department::create(db, department_model).await?)
}

pub async fn update(
    db: &DatabaseConnection,
    id: Id,
    department_model: departments::Model,
) -> Result<departments::Model, Error> {
    if department_model.name.trim().is_empty() {
        return Err(Error::invalid());
    }
    Ok(department::update(db, id, department_model).await?)
}

/// Users and courses of the department are kept and left without one.
pub async fn delete(db: &DatabaseConnection, id: Id) -> Result<(), Error> {
    department::delete_by_id(db, id).await?;
    info!("Department {id} deleted");
    Ok(())
}
