use super::error::Error;
use crate::{course_collaborator, mutate, mutate::UpdateMap, query::contains_pattern};
use chrono::Utc;
use entity::course_status::CourseStatus;
use entity::courses::{ActiveModel, Column, Entity, Model};
use entity::{approval_requests, course_collaborators, course_modules, lessons, users, Id};
use log::*;
use sea_orm::{
    entity::prelude::*,
    sea_query::{Func, Query},
    ActiveValue::Set,
    Condition, QueryOrder, QuerySelect,
};

/// Filters accepted when listing courses.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct CourseQuery {
    pub status: Option<CourseStatus>,
    pub department_id: Option<Id>,
    pub tag: Option<String>,
    /// Case-insensitive substring of the course name.
    pub search: Option<String>,
}

/// Columns never written by a partial update; they are derived or owned by
/// dedicated operations.
const READ_ONLY_COLUMNS: &[&str] = &["estimated_duration", "status", "creator_id"];

pub async fn create(
    db: &impl ConnectionTrait,
    course_model: Model,
    creator_id: Id,
) -> Result<Model, Error> {
    debug!("New Course Model to be inserted: {course_model:?}");

    let now = Utc::now();
    let active_model = ActiveModel {
        name: Set(course_model.name),
        description: Set(course_model.description),
        objectives: Set(course_model.objectives),
        target_audience: Set(course_model.target_audience),
        estimated_duration: Set(0),
        status: Set(CourseStatus::Draft),
        tags: Set(course_model.tags),
        creator_id: Set(creator_id),
        department_id: Set(course_model.department_id),
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
    let course = find_by_id(db, id).await?;
    for column in READ_ONLY_COLUMNS {
        update_map.remove(column);
    }
    debug!("Updating Course {id}");
    mutate::update::<ActiveModel, Column>(db, course.into(), update_map).await
}

pub async fn update_status(
    db: &impl ConnectionTrait,
    id: Id,
    status: CourseStatus,
) -> Result<Model, Error> {
    let course = find_by_id(db, id).await?;
    debug!("Course {id} status: {} -> {status}", course.status);

    let mut active_model: ActiveModel = course.into();
    active_model.status = Set(status);
    active_model.updated_at = Set(Utc::now().into());
    Ok(active_model.update(db).await?)
}

/// Recomputes `estimated_duration` from every lesson of every module of the
/// course, stores it and returns it.
pub async fn refresh_estimated_duration(
    db: &impl ConnectionTrait,
    course_id: Id,
) -> Result<i32, Error> {
    let module_ids = module_ids(db, course_id).await?;
    let course_lessons = if module_ids.is_empty() {
        Vec::new()
    } else {
        lessons::Entity::find()
            .filter(lessons::Column::ModuleId.is_in(module_ids))
            .all(db)
            .await?
    };
    let total = lessons::total_duration(&course_lessons);
    debug!("Course {course_id} estimated duration is now {total}min");

    let now: DateTimeWithTimeZone = Utc::now().into();
    let result = Entity::update_many()
        .col_expr(Column::EstimatedDuration, Expr::value(total))
        .col_expr(Column::UpdatedAt, Expr::value(now))
        .filter(Column::Id.eq(course_id))
        .exec(db)
        .await?;

    if result.rows_affected == 0 {
        error!("Course {course_id} not found while refreshing its duration");
        return Err(Error::not_found());
    }
    Ok(total)
}

/// Deletes the course together with its lessons, modules, collaborators and
/// approval requests. Callers wanting atomicity should pass a transaction.
pub async fn delete_cascade(db: &impl ConnectionTrait, course_id: Id) -> Result<(), Error> {
    let course = find_by_id(db, course_id).await?;
    debug!("Deleting Course {course_id} and everything it owns");

    let module_ids = module_ids(db, course_id).await?;
    if !module_ids.is_empty() {
        lessons::Entity::delete_many()
            .filter(lessons::Column::ModuleId.is_in(module_ids))
            .exec(db)
            .await?;
    }
    course_modules::Entity::delete_many()
        .filter(course_modules::Column::CourseId.eq(course_id))
        .exec(db)
        .await?;
    course_collaborator::delete_by_course_id(db, course_id).await?;
    approval_requests::Entity::delete_many()
        .filter(approval_requests::Column::CourseId.eq(course_id))
        .exec(db)
        .await?;

    course.delete(db).await?;
    Ok(())
}

pub async fn find_by_id(db: &impl ConnectionTrait, id: Id) -> Result<Model, Error> {
    Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(Error::not_found)
}

/// Reads the course with `SELECT ... FOR UPDATE`. Operations that append to
/// or renumber the course's modules and lessons take this lock first so that
/// concurrent writers cannot hand out the same position.
pub async fn lock_by_id(db: &impl ConnectionTrait, id: Id) -> Result<Model, Error> {
    Entity::find_by_id(id)
        .lock_exclusive()
        .one(db)
        .await?
        .ok_or_else(Error::not_found)
}

/// Courses `user` may see, most recently updated first.
///
/// Admins see every course. Everybody else sees the courses they created, the
/// ones they collaborate on and the ones of their own department.
pub async fn find_visible_to(
    db: &impl ConnectionTrait,
    user: &users::Model,
    course_query: CourseQuery,
) -> Result<Vec<Model>, Error> {
    debug!("Finding courses visible to {} with {course_query:?}", user.id);

    let mut query = Entity::find();

    if !user.is_admin() {
        let mut visibility = Condition::any()
            .add(Column::CreatorId.eq(user.id))
            .add(
                Column::Id.in_subquery(
                    Query::select()
                        .column(course_collaborators::Column::CourseId)
                        .from(course_collaborators::Entity)
                        .and_where(course_collaborators::Column::UserId.eq(user.id))
                        .to_owned(),
                ),
            );
        if let Some(department_id) = user.department_id {
            visibility = visibility.add(Column::DepartmentId.eq(department_id));
        }
        query = query.filter(visibility);
    }

    Ok(apply_filters(query, course_query)
        .order_by_desc(Column::UpdatedAt)
        .all(db)
        .await?)
}

fn apply_filters(mut query: Select<Entity>, course_query: CourseQuery) -> Select<Entity> {
    if let Some(status) = course_query.status {
        query = query.filter(Column::Status.eq(status));
    }
    if let Some(department_id) = course_query.department_id {
        query = query.filter(Column::DepartmentId.eq(department_id));
    }
    if let Some(tag) = course_query.tag.filter(|tag| !tag.trim().is_empty()) {
        query = query.filter(Expr::cust_with_values(
            r#"$1 = ANY("courses"."tags")"#,
            [tag.trim().to_lowercase()],
        ));
    }
    if let Some(search) = course_query.search.filter(|s| !s.trim().is_empty()) {
        query = query.filter(
            Expr::expr(Func::lower(Expr::col((Entity, Column::Name))))
                .like(contains_pattern(&search)),
        );
    }
    query
}

async fn module_ids(db: &impl ConnectionTrait, course_id: Id) -> Result<Vec<Id>, Error> {
    Ok(course_modules::Entity::find()
        .select_only()
        .column(course_modules::Column::Id)
        .filter(course_modules::Column::CourseId.eq(course_id))
        .into_tuple::<Id>()
        .all(db)
        .await?)
}

#[cfg(test)]
#[cfg(feature = "mock")]
mod tests {
    use super::*;
    use crate::error::EntityApiErrorKind;
    use entity::{activity_type::ActivityType, lesson_status::LessonStatus, roles::Role};
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult, Value};
    use std::collections::BTreeMap;

    fn course_model(status: CourseStatus) -> Model {
        let now = Utc::now();
        Model {
            id: Id::new_v4(),
            name: "Liderança".to_owned(),
            description: None,
            objectives: None,
            target_audience: None,
            estimated_duration: 0,
            status,
            tags: vec!["gestão".to_owned()],
            creator_id: Id::new_v4(),
            department_id: None,
            created_at: now.into(),
            updated_at: now.into(),
        }
    }

    fn lesson_model(module_id: Id, duration: i32) -> lessons::Model {
        let now = Utc::now();
        lessons::Model {
            id: Id::new_v4(),
            module_id,
            title: "Aula".to_owned(),
            description: None,
            duration,
            activity_type: ActivityType::Video,
            status: LessonStatus::Todo,
            notes: None,
            position: 0,
            created_at: now.into(),
            updated_at: now.into(),
        }
    }

    fn user_model(role: Role, department_id: Option<Id>) -> users::Model {
        let now = Utc::now();
        users::Model {
            id: Id::new_v4(),
            email: "bia@example.com".to_owned(),
            first_name: "Bia".to_owned(),
            last_name: "Lima".to_owned(),
            display_name: None,
            password: "hash".to_owned(),
            role,
            department_id,
            created_at: now.into(),
            updated_at: now.into(),
        }
    }

    fn id_row(id: Id) -> BTreeMap<&'static str, Value> {
        BTreeMap::from([("id", Value::from(id))])
    }

    #[tokio::test]
    async fn create_always_starts_as_draft_with_zero_duration() -> Result<(), Error> {
        let requested = Model {
            estimated_duration: 999,
            ..course_model(CourseStatus::Approved)
        };
        let stored = course_model(CourseStatus::Draft);

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[stored.clone()]])
            .into_connection();

        let course = create(&db, requested, stored.creator_id).await?;
        assert_eq!(course.status, CourseStatus::Draft);

        let log = format!("{:?}", db.into_transaction_log());
        assert!(log.contains("rascunho"));

        Ok(())
    }

    #[tokio::test]
    async fn refresh_estimated_duration_sums_all_lessons() -> Result<(), Error> {
        let course_id = Id::new_v4();
        let module_a = Id::new_v4();
        let module_b = Id::new_v4();

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[id_row(module_a), id_row(module_b)]])
            .append_query_results([vec![
                lesson_model(module_a, 30),
                lesson_model(module_a, 45),
                lesson_model(module_b, 15),
            ]])
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }])
            .into_connection();

        assert_eq!(refresh_estimated_duration(&db, course_id).await?, 90);

        Ok(())
    }

    #[tokio::test]
    async fn refresh_estimated_duration_of_missing_course_fails() -> Result<(), Error> {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<BTreeMap<&str, Value>>::new()])
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            }])
            .into_connection();

        let result = refresh_estimated_duration(&db, Id::new_v4()).await;
        assert_eq!(
            result.unwrap_err().error_kind,
            EntityApiErrorKind::RecordNotFound
        );

        Ok(())
    }

    #[tokio::test]
    async fn delete_cascade_removes_children_before_the_course() -> Result<(), Error> {
        let course = course_model(CourseStatus::InProgress);
        let deleted = || MockExecResult {
            last_insert_id: 0,
            rows_affected: 1,
        };

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[course.clone()]])
            .append_query_results([[id_row(Id::new_v4())]])
            .append_exec_results([deleted(), deleted(), deleted(), deleted(), deleted()])
            .into_connection();

        delete_cascade(&db, course.id).await?;

        let log = format!("{:?}", db.into_transaction_log());
        let lessons_at = log.find(r#"DELETE FROM \"learning_platform\".\"lessons\""#);
        let course_at = log.find(r#"DELETE FROM \"learning_platform\".\"courses\""#);
        assert!(lessons_at.is_some());
        assert!(lessons_at < course_at);
        assert!(log.contains(r#"DELETE FROM \"learning_platform\".\"approval_requests\""#));
        assert!(log.contains(r#"DELETE FROM \"learning_platform\".\"course_collaborators\""#));

        Ok(())
    }

    #[tokio::test]
    async fn lock_by_id_selects_for_update() -> Result<(), Error> {
        let course = course_model(CourseStatus::InProgress);

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[course.clone()]])
            .into_connection();

        assert_eq!(lock_by_id(&db, course.id).await?, course);

        let log = format!("{:?}", db.into_transaction_log());
        assert!(log.contains("FOR UPDATE"));

        Ok(())
    }

    #[tokio::test]
    async fn find_visible_to_admin_is_unrestricted() -> Result<(), Error> {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<Model>::new()])
            .into_connection();

        find_visible_to(&db, &user_model(Role::Admin, None), CourseQuery::default()).await?;

        let log = format!("{:?}", db.into_transaction_log());
        assert!(!log.contains("WHERE"));
        assert!(log.contains(r#"ORDER BY \"courses\".\"updated_at\" DESC"#));

        Ok(())
    }

    #[tokio::test]
    async fn find_visible_to_combines_creator_collaborator_and_department() -> Result<(), Error> {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<Model>::new()])
            .into_connection();

        let user = user_model(Role::Instructor, Some(Id::new_v4()));
        find_visible_to(
            &db,
            &user,
            CourseQuery {
                tag: Some("gestão".to_owned()),
                search: Some("LIDER".to_owned()),
                ..Default::default()
            },
        )
        .await?;

        let log = format!("{:?}", db.into_transaction_log());
        assert!(log.contains(r#"\"courses\".\"creator_id\" = $1"#));
        assert!(log.contains("course_collaborators"));
        assert!(log.contains(r#"\"courses\".\"department_id\" = $3"#));
        assert!(log.contains("ANY"));
        assert!(log.contains("%lider%"));
        assert!(log.contains("ESCAPE"));

        Ok(())
    }

    #[tokio::test]
    async fn search_matches_wildcards_literally() -> Result<(), Error> {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<Model>::new()])
            .into_connection();

        find_visible_to(
            &db,
            &user_model(Role::Admin, None),
            CourseQuery {
                search: Some("100%_".to_owned()),
                ..Default::default()
            },
        )
        .await?;

        let log = format!("{:?}", db.into_transaction_log());
        assert!(log.contains(r"%100\\%\\_%"));
        assert!(log.contains("ESCAPE"));

        Ok(())
    }
}
