//! Maintains the set of users allowed to edit a course besides its creator.

use super::error::Error;
use chrono::Utc;
use entity::course_collaborators::{ActiveModel, Column, Entity, Model};
use entity::Id;
use log::*;
use sea_orm::{entity::prelude::*, ActiveValue::Set, QueryOrder, QuerySelect};
use std::collections::HashSet;

/// Replaces the collaborator set of a course with `user_ids`.
///
/// The creator is never stored as a collaborator and duplicate ids collapse to
/// one row. Callers wanting atomicity should pass a transaction.
pub async fn set_collaborators(
    db: &impl ConnectionTrait,
    course_id: Id,
    creator_id: Id,
    user_ids: &[Id],
) -> Result<Vec<Model>, Error> {
    debug!("Replacing collaborators of course {course_id} with {user_ids:?}");

    Entity::delete_many()
        .filter(Column::CourseId.eq(course_id))
        .exec(db)
        .await?;

    let mut collaborators = Vec::new();
    for user_id in normalize(creator_id, user_ids) {
        collaborators.push(insert(db, course_id, user_id).await?);
    }

    Ok(collaborators)
}

/// Adds a single collaborator. Adding an existing collaborator (or the
/// creator) is a no-op that returns `None`.
pub async fn add(
    db: &impl ConnectionTrait,
    course_id: Id,
    creator_id: Id,
    user_id: Id,
) -> Result<Option<Model>, Error> {
    if user_id == creator_id {
        debug!("User {user_id} is the creator of course {course_id}; not adding as collaborator");
        return Ok(None);
    }

    let existing = Entity::find()
        .filter(Column::CourseId.eq(course_id))
        .filter(Column::UserId.eq(user_id))
        .one(db)
        .await?;
    if existing.is_some() {
        return Ok(None);
    }

    Ok(Some(insert(db, course_id, user_id).await?))
}

/// Removes a collaborator. Fails with `RecordNotFound` when the user was not
/// a collaborator of the course.
pub async fn remove(db: &impl ConnectionTrait, course_id: Id, user_id: Id) -> Result<(), Error> {
    debug!("Removing collaborator {user_id} from course {course_id}");

    let result = Entity::delete_many()
        .filter(Column::CourseId.eq(course_id))
        .filter(Column::UserId.eq(user_id))
        .exec(db)
        .await?;

    if result.rows_affected == 0 {
        return Err(Error::not_found());
    }
    Ok(())
}

pub async fn find_user_ids_by_course_id(
    db: &impl ConnectionTrait,
    course_id: Id,
) -> Result<Vec<Id>, Error> {
    Ok(Entity::find()
        .select_only()
        .column(Column::UserId)
        .filter(Column::CourseId.eq(course_id))
        .order_by_asc(Column::CreatedAt)
        .into_tuple::<Id>()
        .all(db)
        .await?)
}

pub async fn find_course_ids_by_user_id(
    db: &impl ConnectionTrait,
    user_id: Id,
) -> Result<Vec<Id>, Error> {
    Ok(Entity::find()
        .select_only()
        .column(Column::CourseId)
        .filter(Column::UserId.eq(user_id))
        .into_tuple::<Id>()
        .all(db)
        .await?)
}

pub async fn delete_by_course_id(db: &impl ConnectionTrait, course_id: Id) -> Result<u64, Error> {
    let result = Entity::delete_many()
        .filter(Column::CourseId.eq(course_id))
        .exec(db)
        .await?;
    Ok(result.rows_affected)
}

async fn insert(db: &impl ConnectionTrait, course_id: Id, user_id: Id) -> Result<Model, Error> {
    let now = Utc::now();
    let active_model = ActiveModel {
        course_id: Set(course_id),
        user_id: Set(user_id),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
        ..Default::default()
    };
    Ok(active_model.insert(db).await?)
}

/// Ids to store for a course: input order, creator removed, duplicates removed.
pub fn normalize(creator_id: Id, user_ids: &[Id]) -> Vec<Id> {
    let mut seen = HashSet::new();
    user_ids
        .iter()
        .copied()
        .filter(|id| *id != creator_id && seen.insert(*id))
        .collect()
}


#[cfg(test)]
#[cfg(feature = "mock")]
mod mock_tests {
    use super::*;
    use crate::error::EntityApiErrorKind;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn collaborator(course_id: Id, user_id: Id) -> Model {
        let now = Utc::now();
        Model {
            id: Id::new_v4(),
            course_id,
            user_id,
            created_at: now.into(),
            updated_at: now.into(),
        }
    }

    #[tokio::test]
    async fn set_collaborators_replaces_the_whole_set() -> Result<(), Error> {
        let course_id = Id::new_v4();
        let creator_id = Id::new_v4();
        let user_a = Id::new_v4();
        let user_b = Id::new_v4();

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 3,
            }])
            .append_query_results([[collaborator(course_id, user_a)]])
            .append_query_results([[collaborator(course_id, user_b)]])
            .into_connection();

        let result =
            set_collaborators(&db, course_id, creator_id, &[user_a, creator_id, user_b, user_a])
                .await?;

        assert_eq!(
            result.iter().map(|c| c.user_id).collect::<Vec<_>>(),
            vec![user_a, user_b]
        );

        // One delete plus two inserts.
        assert_eq!(db.into_transaction_log().len(), 3);

        Ok(())
    }

    #[tokio::test]
    async fn add_skips_existing_collaborators() -> Result<(), Error> {
        let course_id = Id::new_v4();
        let user_id = Id::new_v4();

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[collaborator(course_id, user_id)]])
            .into_connection();

        let added = add(&db, course_id, Id::new_v4(), user_id).await?;
        assert!(added.is_none());

        Ok(())
    }

    #[tokio::test]
    async fn remove_reports_missing_collaborator() -> Result<(), Error> {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            }])
            .into_connection();

        let result = remove(&db, Id::new_v4(), Id::new_v4()).await;
        assert_eq!(
            result.unwrap_err().error_kind,
            EntityApiErrorKind::RecordNotFound
        );

        Ok(())
    }
}
