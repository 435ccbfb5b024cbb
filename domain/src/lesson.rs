use crate::course::{is_blank, start_if_draft};
use crate::error::Error;
use crate::{lesson_status::LessonStatus, lessons, ordering, Id};
use entity_api::{course, course_module, lesson, mutate};
use log::*;
use sea_orm::{DatabaseConnection, TransactionTrait, Value};

pub use entity_api::lesson::{find_by_id, find_by_module_id};

/// Appends a lesson to a module and refreshes the course duration. A
/// `Rascunho` course moves to `Em andamento`.
pub async fn create(
    db: &DatabaseConnection,
    module_id: Id,
    lesson_model: lessons::Model,
) -> Result<lessons::Model, Error> {
    if lesson_model.title.trim().is_empty() || lesson_model.duration < 0 {
        warn!("Rejected lesson for module {module_id}: blank title or negative duration");
        return Err(Error::invalid());
    }

    let txn = db.begin().await?;
    let module = course_module::find_by_id(&txn, module_id).await?;
    let parent = course::lock_by_id(&txn, module.course_id).await?;
    let created = lesson::create(&txn, module_id, lesson_model).await?;
    course::refresh_estimated_duration(&txn, module.course_id).await?;
    start_if_draft(&txn, &parent).await?;
    txn.commit().await?;

    Ok(created)
}

/// Partial update of a lesson. The course duration is refreshed when the
/// lesson's duration changes.
pub async fn update(
    db: &DatabaseConnection,
    id: Id,
    params: impl mutate::IntoUpdateMap,
) -> Result<lessons::Model, Error> {
    let update_map = params.into_update_map();
    if is_blank(update_map.get("title")) {
        return Err(Error::invalid());
    }
    let duration_changed = match update_map.get("duration") {
        Some(Value::Int(Some(duration))) if *duration < 0 => return Err(Error::invalid()),
        Some(_) => true,
        None => false,
    };

    let txn = db.begin().await?;
    let updated = lesson::update(&txn, id, update_map).await?;
    if duration_changed {
        let module = course_module::find_by_id(&txn, updated.module_id).await?;
        course::refresh_estimated_duration(&txn, module.course_id).await?;
    }
    txn.commit().await?;

    Ok(updated)
}

pub async fn update_status(
    db: &DatabaseConnection,
    id: Id,
    status: LessonStatus,
) -> Result<lessons::Model, Error> {
    Ok(lesson::update_status(db, id, status).await?)
}

/// Deletes a lesson, compacts its siblings and refreshes the course duration.
pub async fn delete(db: &DatabaseConnection, id: Id) -> Result<(), Error> {
    let txn = db.begin().await?;
    let existing = lesson::find_by_id(&txn, id).await?;
    let module = course_module::find_by_id(&txn, existing.module_id).await?;
    course::lock_by_id(&txn, module.course_id).await?;
    lesson::delete(&txn, id).await?;
    course::refresh_estimated_duration(&txn, module.course_id).await?;
    txn.commit().await?;

    info!("Lesson {id} deleted from module {}", module.id);
    Ok(())
}

/// Rewrites lesson positions to follow `ordered_ids`, which must name every
/// lesson of the module exactly once. Returns the lessons in their new order.
pub async fn reorder(
    db: &DatabaseConnection,
    module_id: Id,
    ordered_ids: Vec<Id>,
) -> Result<Vec<lessons::Model>, Error> {
    let txn = db.begin().await?;
    let module = course_module::find_by_id(&txn, module_id).await?;
    course::lock_by_id(&txn, module.course_id).await?;
    let current: Vec<Id> = lesson::find_by_module_id(&txn, module_id)
        .await?
        .iter()
        .map(|lesson| lesson.id)
        .collect();

    let positions = ordering::plan(&current, &ordered_ids)?;
    debug!("Reordering {} lessons of module {module_id}", positions.len());
    lesson::set_positions(&txn, &positions).await?;

    let reordered = lesson::find_by_module_id(&txn, module_id).await?;
    txn.commit().await?;
    Ok(reordered)
}

/// Moves a lesson to the end of another module of the same course.
pub async fn move_to_module(
    db: &DatabaseConnection,
    lesson_id: Id,
    target_module_id: Id,
) -> Result<lessons::Model, Error> {
    let txn = db.begin().await?;
    let existing = lesson::find_by_id(&txn, lesson_id).await?;
    if existing.module_id == target_module_id {
        return Ok(existing);
    }

    let source = course_module::find_by_id(&txn, existing.module_id).await?;
    let target = course_module::find_by_id(&txn, target_module_id)
        .await
        .map_err(|err| match err.error_kind {
            entity_api::error::EntityApiErrorKind::RecordNotFound => Error::invalid(),
            _ => err.into(),
        })?;
    if source.course_id != target.course_id {
        warn!(
            "Rejected moving lesson {lesson_id} across courses ({} -> {})",
            source.course_id, target.course_id
        );
        return Err(Error::invalid());
    }

    course::lock_by_id(&txn, target.course_id).await?;
    let moved = lesson::move_to_module(&txn, existing, target_module_id).await?;
    course::refresh_estimated_duration(&txn, target.course_id).await?;
    txn.commit().await?;

    Ok(moved)
}

#[cfg(test)]
// We need to gate seaORM's mock feature behind conditional compilation because
// the feature removes the Clone trait implementation from seaORM's DatabaseConnection.
// see https://github.com/SeaQL/sea-orm/issues/830
#[cfg(feature = "mock")]
mod tests {
    use super::*;
    use crate::{
        activity_type::ActivityType, course_modules, course_status::CourseStatus, courses,
        error::EntityErrorKind,
    };
    use sea_orm::MockDatabase;
    use sea_orm::{DatabaseBackend, MockExecResult};
    use std::collections::BTreeMap;

    fn lesson_model(module_id: Id, duration: i32) -> lessons::Model {
        let now = chrono::Utc::now();
        lessons::Model {
            id: Id::new_v4(),
            module_id,
            title: "Role-play".to_owned(),
            description: None,
            duration,
            activity_type: ActivityType::Exercicio,
            status: LessonStatus::Todo,
            notes: None,
            position: 0,
            created_at: now.into(),
            updated_at: now.into(),
        }
    }

    fn module_model(course_id: Id) -> course_modules::Model {
        let now = chrono::Utc::now();
        course_modules::Model {
            id: Id::new_v4(),
            course_id,
            title: "Prática".to_owned(),
            description: None,
            position: 0,
            created_at: now.into(),
            updated_at: now.into(),
        }
    }

    fn course_model(id: Id) -> courses::Model {
        let now = chrono::Utc::now();
        courses::Model {
            id,
            name: "Vendas".to_owned(),
            description: None,
            objectives: None,
            target_audience: None,
            estimated_duration: 75,
            status: CourseStatus::InProgress,
            tags: vec![],
            creator_id: Id::new_v4(),
            department_id: None,
            created_at: now.into(),
            updated_at: now.into(),
        }
    }

    #[tokio::test]
    async fn create_rejects_negative_durations() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

        let result = create(&db, Id::new_v4(), lesson_model(Id::new_v4(), -5)).await;

        assert_eq!(
            result.unwrap_err().entity_error_kind(),
            Some(&EntityErrorKind::Invalid)
        );
        assert!(db.into_transaction_log().is_empty());
    }

    #[tokio::test]
    async fn move_to_module_rejects_modules_of_other_courses() -> Result<(), Error> {
        let source = module_model(Id::new_v4());
        let foreign = module_model(Id::new_v4());
        let lesson = lesson_model(source.id, 30);

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[lesson.clone()]])
            .append_query_results([[source.clone()]])
            .append_query_results([[foreign.clone()]])
            .into_connection();

        let result = move_to_module(&db, lesson.id, foreign.id).await;
        assert_eq!(
            result.unwrap_err().entity_error_kind(),
            Some(&EntityErrorKind::Invalid)
        );

        Ok(())
    }

    #[tokio::test]
    async fn move_to_the_same_module_is_a_no_op() -> Result<(), Error> {
        let module = module_model(Id::new_v4());
        let lesson = lesson_model(module.id, 30);

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[lesson.clone()]])
            .into_connection();

        let result = move_to_module(&db, lesson.id, module.id).await?;
        assert_eq!(result, lesson);

        let log = format!("{:?}", db.into_transaction_log());
        assert!(!log.contains("UPDATE"));

        Ok(())
    }

    #[tokio::test]
    async fn reorder_rejects_a_partial_permutation() -> Result<(), Error> {
        let module = module_model(Id::new_v4());
        let lessons = vec![lesson_model(module.id, 30), lesson_model(module.id, 15)];

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[module.clone()]])
            .append_query_results([[course_model(module.course_id)]])
            .append_query_results([lessons.clone()])
            .into_connection();

        let result = reorder(&db, module.id, vec![lessons[0].id, lessons[0].id]).await;
        assert_eq!(
            result.unwrap_err().entity_error_kind(),
            Some(&EntityErrorKind::Invalid)
        );

        let log = format!("{:?}", db.into_transaction_log());
        assert!(log.contains("FOR UPDATE"));
        assert!(!log.contains(r#"UPDATE \"learning_platform\""#));
        assert!(log.contains("ROLLBACK"));

        Ok(())
    }

    #[tokio::test]
    async fn delete_compacts_the_siblings_and_refreshes_the_duration() -> Result<(), Error> {
        let module = module_model(Id::new_v4());
        let removed = lesson_model(module.id, 30);
        let sibling = lessons::Model {
            position: 1,
            ..lesson_model(module.id, 45)
        };
        let exec = || MockExecResult {
            last_insert_id: 0,
            rows_affected: 1,
        };

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[removed.clone()]])
            .append_query_results([[module.clone()]])
            .append_query_results([[course_model(module.course_id)]])
            .append_query_results([[removed.clone()]])
            .append_query_results([[sibling.clone()]])
            .append_query_results([[BTreeMap::from([("id", sea_orm::Value::from(module.id))])]])
            .append_query_results([[sibling.clone()]])
            .append_exec_results([exec(), exec(), exec()])
            .into_connection();

        delete(&db, removed.id).await?;

        let log = format!("{:?}", db.into_transaction_log());
        assert!(log.contains("FOR UPDATE"));
        assert!(log.contains(r#"DELETE FROM \"learning_platform\".\"lessons\""#));
        assert!(log.contains(r#"UPDATE \"learning_platform\".\"lessons\" SET \"position\""#));
        assert!(log.contains(r#"SET \"estimated_duration\""#));
        assert!(log.contains("COMMIT"));

        Ok(())
    }
}
