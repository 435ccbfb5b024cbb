use super::error::Error;
use crate::{mutate, mutate::UpdateMap};
use chrono::Utc;
use entity::lesson_status::LessonStatus;
use entity::lessons::{ActiveModel, Column, Entity, Model};
use entity::Id;
use log::*;
use sea_orm::{entity::prelude::*, ActiveValue::Set, PaginatorTrait, QueryOrder};

/// Inserts a lesson at the end of the module's lesson list.
pub async fn create(
    db: &impl ConnectionTrait,
    module_id: Id,
    lesson_model: Model,
) -> Result<Model, Error> {
    debug!("New Lesson Model to be inserted into module {module_id}: {lesson_model:?}");

    let position = count_by_module_id(db, module_id).await?;
    let now = Utc::now();
    let active_model = ActiveModel {
        module_id: Set(module_id),
        title: Set(lesson_model.title),
        description: Set(lesson_model.description),
        duration: Set(lesson_model.duration),
        activity_type: Set(lesson_model.activity_type),
        status: Set(lesson_model.status),
        notes: Set(lesson_model.notes),
        position: Set(position),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
        ..Default::default()
    };

    Ok(active_model.insert(db).await?)
}

pub async fn update(
    db: &impl ConnectionTrait,
    id: Id,
    mut update_map: UpdateMap,
) -> Result<Model, Error> {
    let lesson = find_by_id(db, id).await?;
    update_map.remove("module_id");
    update_map.remove("position");
    mutate::update::<ActiveModel, Column>(db, lesson.into(), update_map).await
}

pub async fn update_status(
    db: &impl ConnectionTrait,
    id: Id,
    status: LessonStatus,
) -> Result<Model, Error> {
    let lesson = find_by_id(db, id).await?;
    debug!("Lesson {id} status: {} -> {status}", lesson.status);

    let mut active_model: ActiveModel = lesson.into();
    active_model.status = Set(status);
    active_model.updated_at = Set(Utc::now().into());
    Ok(active_model.update(db).await?)
}

/// Deletes a lesson and closes the gap in its module's positions. Returns the
/// deleted lesson.
pub async fn delete(db: &impl ConnectionTrait, id: Id) -> Result<Model, Error> {
    let lesson = find_by_id(db, id).await?;
    debug!("Deleting Lesson {id} of module {}", lesson.module_id);

    Entity::delete_by_id(id).exec(db).await?;
    compact_positions(db, lesson.module_id).await?;
    Ok(lesson)
}

/// Moves a lesson to the end of `target_module_id` and compacts the module it
/// came from.
pub async fn move_to_module(
    db: &impl ConnectionTrait,
    lesson: Model,
    target_module_id: Id,
) -> Result<Model, Error> {
    let source_module_id = lesson.module_id;
    debug!(
        "Moving Lesson {} from module {source_module_id} to {target_module_id}",
        lesson.id
    );

    let position = count_by_module_id(db, target_module_id).await?;
    let mut active_model: ActiveModel = lesson.into();
    active_model.module_id = Set(target_module_id);
    active_model.position = Set(position);
    active_model.updated_at = Set(Utc::now().into());
    let moved = active_model.update(db).await?;

    compact_positions(db, source_module_id).await?;
    Ok(moved)
}

pub async fn find_by_id(db: &impl ConnectionTrait, id: Id) -> Result<Model, Error> {
    Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(Error::not_found)
}

/// Lessons of a module in display order.
pub async fn find_by_module_id(
    db: &impl ConnectionTrait,
    module_id: Id,
) -> Result<Vec<Model>, Error> {
    Ok(Entity::find()
        .filter(Column::ModuleId.eq(module_id))
        .order_by_asc(Column::Position)
        .order_by_asc(Column::CreatedAt)
        .all(db)
        .await?)
}

/// Lessons of several modules at once, ordered by module then position.
pub async fn find_by_module_ids(
    db: &impl ConnectionTrait,
    module_ids: Vec<Id>,
) -> Result<Vec<Model>, Error> {
    if module_ids.is_empty() {
        return Ok(Vec::new());
    }
    Ok(Entity::find()
        .filter(Column::ModuleId.is_in(module_ids))
        .order_by_asc(Column::ModuleId)
        .order_by_asc(Column::Position)
        .all(db)
        .await?)
}

pub async fn count_by_module_id(db: &impl ConnectionTrait, module_id: Id) -> Result<i32, Error> {
    let count = Entity::find()
        .filter(Column::ModuleId.eq(module_id))
        .count(db)
        .await?;
    Ok(i32::try_from(count).unwrap_or(i32::MAX))
}

/// Writes each `(lesson_id, position)` pair.
pub async fn set_positions(db: &impl ConnectionTrait, positions: &[(Id, i32)]) -> Result<(), Error> {
    let now: DateTimeWithTimeZone = Utc::now().into();
    for (id, position) in positions {
        Entity::update_many()
            .col_expr(Column::Position, Expr::value(*position))
            .col_expr(Column::UpdatedAt, Expr::value(now))
            .filter(Column::Id.eq(*id))
            .exec(db)
            .await?;
    }
    Ok(())
}

/// Rewrites the positions of a module's lessons to `0..n`, keeping their
/// relative order.
pub async fn compact_positions(db: &impl ConnectionTrait, module_id: Id) -> Result<(), Error> {
    let lessons = find_by_module_id(db, module_id).await?;
    let changes: Vec<(Id, i32)> = lessons
        .iter()
        .zip(0..)
        .filter(|(lesson, index)| lesson.position != *index)
        .map(|(lesson, index)| (lesson.id, index))
        .collect();
    set_positions(db, &changes).await
}
