use crate::course::{is_blank, start_if_draft};
use crate::error::Error;
use crate::{course_modules, ordering, Id};
use entity_api::{course, course_module, mutate};
use log::*;
use sea_orm::{DatabaseConnection, TransactionTrait};

pub use entity_api::course_module::{find_by_course_id, find_by_id};

/// Appends a module to a course. A `Rascunho` course moves to `Em andamento`.
pub async fn create(
    db: &DatabaseConnection,
    course_id: Id,
    module_model: course_modules::Model,
) -> Result<course_modules::Model, Error> {
    if module_model.title.trim().is_empty() {
        return Err(Error::invalid());
    }

    let txn = db.begin().await?;
    let parent = course::lock_by_id(&txn, course_id).await?;
    let module = course_module::create(&txn, course_id, module_model).await?;
    start_if_draft(&txn, &parent).await?;
    txn.commit().await?;

    Ok(module)
}

pub async fn update(
    db: &DatabaseConnection,
    id: Id,
    params: impl mutate::IntoUpdateMap,
) -> Result<course_modules::Model, Error> {
    let update_map = params.into_update_map();
    if is_blank(update_map.get("title")) {
        return Err(Error::invalid());
    }
    Ok(course_module::update(db, id, update_map).await?)
}

/// Deletes a module with its lessons, compacts the remaining positions and
/// refreshes the course duration, all in one transaction.
pub async fn delete(db: &DatabaseConnection, id: Id) -> Result<(), Error> {
    let txn = db.begin().await?;
    let module = course_module::find_by_id(&txn, id).await?;
    course::lock_by_id(&txn, module.course_id).await?;
    course_module::delete(&txn, id).await?;
    course::refresh_estimated_duration(&txn, module.course_id).await?;
    txn.commit().await?;

    info!("Module {id} deleted from course {}", module.course_id);
    Ok(())
}

/// Rewrites module positions to follow `ordered_ids`, which must name every
/// module of the course exactly once. Returns the modules in their new order.
pub async fn reorder(
    db: &DatabaseConnection,
    course_id: Id,
    ordered_ids: Vec<Id>,
) -> Result<Vec<course_modules::Model>, Error> {
    let txn = db.begin().await?;
    course::lock_by_id(&txn, course_id).await?;
    let current: Vec<Id> = course_module::find_by_course_id(&txn, course_id)
        .await?
        .iter()
        .map(|module| module.id)
        .collect();

    let positions = ordering::plan(&current, &ordered_ids)?;
    debug!("Reordering {} modules of course {course_id}", positions.len());
    course_module::set_positions(&txn, &positions).await?;

    let reordered = course_module::find_by_course_id(&txn, course_id).await?;
    txn.commit().await?;
    Ok(reordered)
}
