use super::error::Error;
use crate::{mutate, mutate::UpdateMap};
use chrono::Utc;
use entity::course_modules::{ActiveModel, Column, Entity, Model};
use entity::{lessons, Id};
use log::*;
use sea_orm::{entity::prelude::*, ActiveValue::Set, PaginatorTrait, QueryOrder};

/// Inserts a module at the end of the course's module list.
pub async fn create(
    db: &impl ConnectionTrait,
    course_id: Id,
    module_model: Model,
) -> Result<Model, Error> {
    debug!("New Module Model to be inserted into course {course_id}: {module_model:?}");

    let position = count_by_course_id(db, course_id).await?;
    let now = Utc::now();
    let active_model = ActiveModel {
        course_id: Set(course_id),
        title: Set(module_model.title),
        description: Set(module_model.description),
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
    let module = find_by_id(db, id).await?;
    update_map.remove("course_id");
    update_map.remove("position");
    mutate::update::<ActiveModel, Column>(db, module.into(), update_map).await
}

/// Deletes a module and its lessons, then closes the gap in the course's
/// positions. Returns the deleted module.
pub async fn delete(db: &impl ConnectionTrait, id: Id) -> Result<Model, Error> {
    let module = find_by_id(db, id).await?;
    debug!("Deleting Module {id} of course {}", module.course_id);

    lessons::Entity::delete_many()
        .filter(lessons::Column::ModuleId.eq(id))
        .exec(db)
        .await?;
    Entity::delete_by_id(id).exec(db).await?;

    compact_positions(db, module.course_id).await?;
    Ok(module)
}

pub async fn find_by_id(db: &impl ConnectionTrait, id: Id) -> Result<Model, Error> {
    Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(Error::not_found)
}

/// Modules of a course in display order.
pub async fn find_by_course_id(
    db: &impl ConnectionTrait,
    course_id: Id,
) -> Result<Vec<Model>, Error> {
    Ok(Entity::find()
        .filter(Column::CourseId.eq(course_id))
        .order_by_asc(Column::Position)
        .order_by_asc(Column::CreatedAt)
        .all(db)
        .await?)
}

pub async fn count_by_course_id(db: &impl ConnectionTrait, course_id: Id) -> Result<i32, Error> {
    let count = Entity::find()
        .filter(Column::CourseId.eq(course_id))
        .count(db)
        .await?;
    Ok(i32::try_from(count).unwrap_or(i32::MAX))
}

/// Writes each `(module_id, position)` pair.
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

/// Rewrites the positions of a course's modules to `0..n`, keeping their
/// relative order.
pub async fn compact_positions(db: &impl ConnectionTrait, course_id: Id) -> Result<(), Error> {
    let modules = find_by_course_id(db, course_id).await?;
    let changes: Vec<(Id, i32)> = modules
        .iter()
        .zip(0..)
        .filter(|(module, index)| module.position != *index)
        .map(|(module, index)| (module.id, index))
        .collect();
    set_positions(db, &changes).await
}

#[cfg(test)]
#[cfg(feature = "mock")]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult, Value};
    use std::collections::BTreeMap;

    fn module_model(course_id: Id, position: i32) -> Model {
        let now = Utc::now();
        Model {
            id: Id::new_v4(),
            course_id,
            title: format!("Módulo {position}"),
            description: None,
            position,
            created_at: now.into(),
            updated_at: now.into(),
        }
    }

    fn exec(rows_affected: u64) -> MockExecResult {
        MockExecResult {
            last_insert_id: 0,
            rows_affected,
        }
    }

    #[tokio::test]
    async fn create_appends_after_existing_modules() -> Result<(), Error> {
        let course_id = Id::new_v4();
        let created = module_model(course_id, 2);

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[BTreeMap::from([("num_items", Value::BigInt(Some(2)))])]])
            .append_query_results([[created.clone()]])
            .into_connection();

        let module = create(&db, course_id, created.clone()).await?;
        assert_eq!(module.position, 2);

        let log = format!("{:?}", db.into_transaction_log());
        assert!(log.contains("COUNT(*)"));
        assert!(log.contains("Int(Some(2))"));

        Ok(())
    }

    #[tokio::test]
    async fn compact_positions_only_rewrites_out_of_place_modules() -> Result<(), Error> {
        let course_id = Id::new_v4();
        let modules = vec![
            module_model(course_id, 0),
            module_model(course_id, 2),
            module_model(course_id, 3),
        ];

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([modules])
            .append_exec_results([exec(1), exec(1)])
            .into_connection();

        compact_positions(&db, course_id).await?;

        // One select plus two updates; the first module is already in place.
        assert_eq!(db.into_transaction_log().len(), 3);

        Ok(())
    }

    #[tokio::test]
    async fn delete_removes_lessons_and_compacts_siblings() -> Result<(), Error> {
        let course_id = Id::new_v4();
        let doomed = module_model(course_id, 0);
        let sibling = module_model(course_id, 1);

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[doomed.clone()]])
            .append_exec_results([exec(3), exec(1)])
            .append_query_results([[sibling.clone()]])
            .append_exec_results([exec(1)])
            .into_connection();

        let deleted = delete(&db, doomed.id).await?;
        assert_eq!(deleted.id, doomed.id);

        let log = format!("{:?}", db.into_transaction_log());
        assert!(log.contains(r#"DELETE FROM \"learning_platform\".\"lessons\""#));
        assert!(log.contains(r#"UPDATE \"learning_platform\".\"course_modules\" SET \"position\" = $1"#));

        Ok(())
    }
}
