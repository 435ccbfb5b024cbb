use crate::error::Error;
use crate::{
    course_modules, course_status::CourseStatus, courses, duration, lessons, tags, users, Id,
};
use entity_api::{course, course_collaborator, course_module, lesson, mutate, user};
use log::*;
use sea_orm::{ConnectionTrait, DatabaseConnection, TransactionTrait, Value};
use serde::Serialize;
use std::collections::HashMap;
use utoipa::ToSchema;

pub use entity_api::course::{find_by_id, CourseQuery};

/// A module and its lessons, lessons in display order.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ModuleWithLessons {
    pub module: course_modules::Model,
    pub lessons: Vec<lessons::Model>,
}

/// Everything needed to render a course: the course, who collaborates on it
/// and its modules and lessons in display order.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct CourseDetail {
    pub course: courses::Model,
    #[schema(value_type = Vec<Uuid>)]
    pub collaborator_ids: Vec<Id>,
    pub modules: Vec<ModuleWithLessons>,
    /// `estimated_duration` rendered for display, e.g. `"2h 30min"`.
    pub formatted_duration: String,
}

/// Creates a `Rascunho` course owned by `creator_id` along with its initial
/// collaborators, in one transaction.
pub async fn create(
    db: &DatabaseConnection,
    course_model: courses::Model,
    creator_id: Id,
    collaborator_ids: Option<Vec<Id>>,
) -> Result<courses::Model, Error> {
    if course_model.name.trim().is_empty() {
        warn!("Rejected course without a name");
        return Err(Error::invalid());
    }

    let course_model = courses::Model {
        tags: tags::normalize(&course_model.tags),
        ..course_model
    };

    let txn = db.begin().await?;
    if let Some(collaborator_ids) = &collaborator_ids {
        ensure_users_exist(&txn, collaborator_ids).await?;
    }
    let created = course::create(&txn, course_model, creator_id).await?;
    if let Some(collaborator_ids) = collaborator_ids {
        course_collaborator::set_collaborators(&txn, created.id, creator_id, &collaborator_ids)
            .await?;
    }
    txn.commit().await?;

    info!("Course {} created by {creator_id}", created.id);
    Ok(created)
}

/// Partial update of the descriptive fields of a course.
pub async fn update(
    db: &DatabaseConnection,
    id: Id,
    params: impl mutate::IntoUpdateMap,
) -> Result<courses::Model, Error> {
    let mut update_map = params.into_update_map();
    if is_blank(update_map.get("name")) {
        return Err(Error::invalid());
    }
    if let Some(tag_values) = update_map.remove("tags") {
        update_map.insert("tags".to_string(), Some(tags::normalize_value(tag_values)));
    }
    Ok(course::update(db, id, update_map).await?)
}

/// Sets the status of a course by hand.
///
/// Any status is accepted. Transitions outside the conventional graph are
/// logged, not rejected; only the approval workflow enforces the graph.
pub async fn update_status(
    db: &DatabaseConnection,
    id: Id,
    status: CourseStatus,
) -> Result<courses::Model, Error> {
    let existing = course::find_by_id(db, id).await?;
    if existing.status != status && !existing.status.can_transition_to(status) {
        warn!(
            "Course {id} moved off the conventional path: {} -> {status}",
            existing.status
        );
    }
    Ok(course::update_status(db, id, status).await?)
}

pub async fn delete(db: &DatabaseConnection, id: Id) -> Result<(), Error> {
    let txn = db.begin().await?;
    course::delete_cascade(&txn, id).await?;
    txn.commit().await?;
    info!("Course {id} deleted");
    Ok(())
}

pub async fn find_detail(db: &impl ConnectionTrait, id: Id) -> Result<CourseDetail, Error> {
    let course = course::find_by_id(db, id).await?;
    let collaborator_ids = course_collaborator::find_user_ids_by_course_id(db, id).await?;
    let modules = course_module::find_by_course_id(db, id).await?;
    let module_ids = modules.iter().map(|module| module.id).collect();
    let course_lessons = lesson::find_by_module_ids(db, module_ids).await?;

    Ok(CourseDetail {
        formatted_duration: duration::format(course.estimated_duration),
        course,
        collaborator_ids,
        modules: group_lessons(modules, course_lessons),
    })
}

pub async fn find_visible_to(
    db: &DatabaseConnection,
    user: &users::Model,
    course_query: CourseQuery,
) -> Result<Vec<courses::Model>, Error> {
    Ok(course::find_visible_to(db, user, course_query).await?)
}

/// Replaces the collaborator set. The creator and duplicate ids are dropped;
/// an id naming no user rejects the whole set.
pub async fn set_collaborators(
    db: &DatabaseConnection,
    course_id: Id,
    user_ids: Vec<Id>,
) -> Result<Vec<Id>, Error> {
    let txn = db.begin().await?;
    let existing = course::find_by_id(&txn, course_id).await?;
    ensure_users_exist(&txn, &user_ids).await?;
    let collaborators =
        course_collaborator::set_collaborators(&txn, course_id, existing.creator_id, &user_ids)
            .await?;
    txn.commit().await?;

    Ok(collaborators.into_iter().map(|c| c.user_id).collect())
}

pub async fn add_collaborator(
    db: &DatabaseConnection,
    course_id: Id,
    user_id: Id,
) -> Result<Vec<Id>, Error> {
    let existing = course::find_by_id(db, course_id).await?;
    user::find_by_id(db, user_id).await?;
    course_collaborator::add(db, course_id, existing.creator_id, user_id).await?;
    Ok(course_collaborator::find_user_ids_by_course_id(db, course_id).await?)
}

pub async fn remove_collaborator(
    db: &DatabaseConnection,
    course_id: Id,
    user_id: Id,
) -> Result<(), Error> {
    course::find_by_id(db, course_id).await?;
    Ok(course_collaborator::remove(db, course_id, user_id).await?)
}

/// The collaborators of a course as users.
pub async fn collaborators(
    db: &DatabaseConnection,
    course_id: Id,
) -> Result<Vec<users::Model>, Error> {
    course::find_by_id(db, course_id).await?;
    let user_ids = course_collaborator::find_user_ids_by_course_id(db, course_id).await?;
    Ok(user::find_by_ids(db, user_ids).await?)
}

/// Deep-copies a course with its modules and lessons into a new `Rascunho`
/// course owned by `user_id`. Lesson progress starts over and collaborators
/// are not copied.
pub async fn duplicate(
    db: &DatabaseConnection,
    course_id: Id,
    user_id: Id,
) -> Result<courses::Model, Error> {
    let source = find_detail(db, course_id).await?;
    debug!(
        "Duplicating course {course_id} ({} modules) for {user_id}",
        source.modules.len()
    );

    let txn = db.begin().await?;
    let copy = course::create(
        &txn,
        courses::Model {
            name: format!("{} (cópia)", source.course.name),
            ..source.course
        },
        user_id,
    )
    .await?;

    for ModuleWithLessons {
        module,
        lessons: module_lessons,
    } in source.modules
    {
        let module_copy = course_module::create(&txn, copy.id, module).await?;
        for lesson_model in module_lessons {
            lesson::create(
                &txn,
                module_copy.id,
                lessons::Model {
                    status: Default::default(),
                    ..lesson_model
                },
            )
            .await?;
        }
    }
    let estimated_duration = course::refresh_estimated_duration(&txn, copy.id).await?;
    txn.commit().await?;

    info!("Course {course_id} duplicated into {}", copy.id);
    Ok(courses::Model {
        estimated_duration,
        ..copy
    })
}

async fn ensure_users_exist(db: &impl ConnectionTrait, user_ids: &[Id]) -> Result<(), Error> {
    let mut unique = user_ids.to_vec();
    unique.sort();
    unique.dedup();

    let found = user::find_by_ids(db, unique.clone()).await?;
    if found.len() != unique.len() {
        warn!(
            "Rejected collaborators: {} of {} users exist",
            found.len(),
            unique.len()
        );
        return Err(Error::invalid());
    }
    Ok(())
}

/// Moves a `Rascunho` course to `Em andamento` once content is added to it.
pub(crate) async fn start_if_draft(
    db: &impl ConnectionTrait,
    course_model: &courses::Model,
) -> Result<(), Error> {
    if course_model.status == CourseStatus::Draft {
        info!(
            "Course {} received content and leaves {}",
            course_model.id,
            CourseStatus::Draft
        );
        course::update_status(db, course_model.id, CourseStatus::InProgress).await?;
    }
    Ok(())
}

/// Attaches each lesson to its module; both lists come out in position order.
fn group_lessons(
    mut modules: Vec<course_modules::Model>,
    course_lessons: Vec<lessons::Model>,
) -> Vec<ModuleWithLessons> {
    modules.sort_by_key(|module| module.position);

    let mut by_module: HashMap<Id, Vec<lessons::Model>> = HashMap::new();
    for lesson_model in course_lessons {
        by_module
            .entry(lesson_model.module_id)
            .or_default()
            .push(lesson_model);
    }

    modules
        .into_iter()
        .map(|module| {
            let mut lessons = by_module.remove(&module.id).unwrap_or_default();
            lessons.sort_by_key(|lesson| lesson.position);
            ModuleWithLessons { module, lessons }
        })
        .collect()
}

pub(crate) fn is_blank(value: Option<&Value>) -> bool {
    matches!(value, Some(Value::String(Some(s))) if s.trim().is_empty())
}


#[cfg(test)]
// We need to gate seaORM's mock feature behind conditional compilation because
// the feature removes the Clone trait implementation from seaORM's DatabaseConnection.
// see https://github.com/SeaQL/sea-orm/issues/830
#[cfg(feature = "mock")]
mod mock_tests {
    use super::*;
    use crate::error::EntityErrorKind;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
    use std::collections::BTreeMap;

    fn course_model(status: CourseStatus) -> courses::Model {
        let now = chrono::Utc::now();
        courses::Model {
            id: Id::new_v4(),
            name: "Negociação".to_owned(),
            description: None,
            objectives: None,
            target_audience: None,
            estimated_duration: 90,
            status,
            tags: vec![],
            creator_id: Id::new_v4(),
            department_id: None,
            created_at: now.into(),
            updated_at: now.into(),
        }
    }

    #[tokio::test]
    async fn create_rejects_blank_names_without_touching_the_database() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

        let result = create(
            &db,
            courses::Model {
                name: "   ".to_owned(),
                ..course_model(CourseStatus::Draft)
            },
            Id::new_v4(),
            None,
        )
        .await;

        assert_eq!(
            result.unwrap_err().entity_error_kind(),
            Some(&EntityErrorKind::Invalid)
        );
        assert!(db.into_transaction_log().is_empty());
    }

    #[tokio::test]
    async fn update_status_accepts_off_convention_transitions() -> Result<(), Error> {
        let approved = course_model(CourseStatus::Approved);
        let drafted = courses::Model {
            status: CourseStatus::Draft,
            ..approved.clone()
        };

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[approved.clone()]])
            .append_query_results([[approved.clone()]])
            .append_query_results([[drafted.clone()]])
            .into_connection();

        let result = update_status(&db, approved.id, CourseStatus::Draft).await?;
        assert_eq!(result.status, CourseStatus::Draft);

        Ok(())
    }

    #[tokio::test]
    async fn find_detail_formats_the_duration() -> Result<(), Error> {
        let course = course_model(CourseStatus::InProgress);

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[course.clone()]])
            .append_query_results([Vec::<BTreeMap<&str, Value>>::new()])
            .append_query_results([Vec::<course_modules::Model>::new()])
            .into_connection();

        let detail = find_detail(&db, course.id).await?;
        assert_eq!(detail.formatted_duration, "1h 30min");
        assert!(detail.modules.is_empty());
        assert!(detail.collaborator_ids.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn delete_runs_the_cascade_in_a_transaction() -> Result<(), Error> {
        let course = course_model(CourseStatus::Draft);
        let exec = || MockExecResult {
            last_insert_id: 0,
            rows_affected: 1,
        };

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[course.clone()]])
            .append_query_results([Vec::<BTreeMap<&str, Value>>::new()])
            .append_exec_results([exec(), exec(), exec(), exec()])
            .into_connection();

        delete(&db, course.id).await?;

        let log = db.into_transaction_log();
        // Everything ran inside a single BEGIN ... COMMIT.
        assert_eq!(log.len(), 1);

        Ok(())
    }

    fn user_model() -> users::Model {
        let now = chrono::Utc::now();
        users::Model {
            id: Id::new_v4(),
            email: "rui@example.com".to_owned(),
            first_name: "Rui".to_owned(),
            last_name: "Matos".to_owned(),
            display_name: None,
            password: "hash".to_owned(),
            role: crate::roles::Role::Instructor,
            department_id: None,
            created_at: now.into(),
            updated_at: now.into(),
        }
    }

    fn count_row(count: i64) -> BTreeMap<&'static str, Value> {
        BTreeMap::from([("num_items", Value::BigInt(Some(count)))])
    }

    #[tokio::test]
    async fn set_collaborators_rejects_unknown_users() -> Result<(), Error> {
        let course = course_model(CourseStatus::InProgress);
        let known = user_model();

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[course.clone()]])
            .append_query_results([[known.clone()]])
            .into_connection();

        let result = set_collaborators(&db, course.id, vec![known.id, Id::new_v4()]).await;
        assert_eq!(
            result.unwrap_err().entity_error_kind(),
            Some(&EntityErrorKind::Invalid)
        );

        let log = format!("{:?}", db.into_transaction_log());
        assert!(!log.contains("course_collaborators"));
        assert!(log.contains("ROLLBACK"));

        Ok(())
    }

    #[tokio::test]
    async fn set_collaborators_counts_repeated_ids_once() -> Result<(), Error> {
        let course = course_model(CourseStatus::InProgress);
        let known = user_model();
        let collaborator = crate::course_collaborators::Model {
            id: Id::new_v4(),
            course_id: course.id,
            user_id: known.id,
            created_at: chrono::Utc::now().into(),
            updated_at: chrono::Utc::now().into(),
        };

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[course.clone()]])
            .append_query_results([[known.clone()]])
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            }])
            .append_query_results([[collaborator]])
            .into_connection();

        let ids = set_collaborators(&db, course.id, vec![known.id, known.id]).await?;
        assert_eq!(ids, vec![known.id]);

        Ok(())
    }

    #[tokio::test]
    async fn update_stores_normalized_tags() -> Result<(), Error> {
        struct Params;
        impl mutate::IntoUpdateMap for Params {
            fn into_update_map(self) -> mutate::UpdateMap {
                let mut update_map = mutate::UpdateMap::new();
                update_map.insert(
                    "tags".to_string(),
                    Some(Value::from(vec![" Gestão".to_owned(), "GESTÃO ".to_owned()])),
                );
                update_map
            }
        }

        let course = course_model(CourseStatus::InProgress);
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[course.clone()]])
            .append_query_results([[courses::Model {
                tags: vec!["gestão".to_owned()],
                ..course.clone()
            }]])
            .into_connection();

        update(&db, course.id, Params).await?;

        let log = format!("{:?}", db.into_transaction_log());
        assert!(log.contains(r#""gestão""#));
        assert!(!log.contains("Gestão"));
        assert!(!log.contains("GESTÃO"));

        Ok(())
    }

    #[tokio::test]
    async fn duplicate_copies_the_content_into_a_fresh_draft() -> Result<(), Error> {
        let source = course_model(CourseStatus::Approved);
        let now = chrono::Utc::now();
        let module = course_modules::Model {
            id: Id::new_v4(),
            course_id: source.id,
            title: "Fundamentos".to_owned(),
            description: None,
            position: 0,
            created_at: now.into(),
            updated_at: now.into(),
        };
        let finished_lesson = lessons::Model {
            id: Id::new_v4(),
            module_id: module.id,
            title: "Escuta ativa".to_owned(),
            description: None,
            duration: 40,
            activity_type: crate::activity_type::ActivityType::Video,
            status: crate::lesson_status::LessonStatus::Finishing,
            notes: None,
            position: 0,
            created_at: now.into(),
            updated_at: now.into(),
        };
        let copy = courses::Model {
            id: Id::new_v4(),
            name: "Negociação (cópia)".to_owned(),
            estimated_duration: 0,
            status: CourseStatus::Draft,
            ..source.clone()
        };
        let module_copy = course_modules::Model {
            id: Id::new_v4(),
            course_id: copy.id,
            ..module.clone()
        };
        let lesson_copy = lessons::Model {
            id: Id::new_v4(),
            module_id: module_copy.id,
            status: Default::default(),
            ..finished_lesson.clone()
        };

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[source.clone()]])
            .append_query_results([Vec::<BTreeMap<&str, Value>>::new()])
            .append_query_results([[module.clone()]])
            .append_query_results([[finished_lesson.clone()]])
            .append_query_results([[copy.clone()]])
            .append_query_results([[count_row(0)]])
            .append_query_results([[module_copy.clone()]])
            .append_query_results([[count_row(0)]])
            .append_query_results([[lesson_copy.clone()]])
            .append_query_results([[BTreeMap::from([("id", Value::from(module_copy.id))])]])
            .append_query_results([[lesson_copy.clone()]])
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }])
            .into_connection();

        let duplicated = duplicate(&db, source.id, Id::new_v4()).await?;
        assert_eq!(duplicated.id, copy.id);
        assert_eq!(duplicated.status, CourseStatus::Draft);
        assert_eq!(duplicated.estimated_duration, 40);

        let log = format!("{:?}", db.into_transaction_log());
        assert!(log.contains("Negociação (cópia)"));
        assert!(log.contains("rascunho"));
        assert!(log.contains(r#""fazer""#));
        assert!(!log.contains("finalizando"));
        assert!(log.contains("COMMIT"));

        Ok(())
    }
}
