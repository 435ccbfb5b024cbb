use crate::params::IdPath;
use crate::protect::courses::{guard, CourseRight};
use crate::protect::lookup_failed;
use crate::{extractors::authenticated_user::AuthenticatedUser, AppState};
use axum::{
    extract::{Path, Request, State},
    middleware::Next,
    response::IntoResponse,
};
use domain::{course_module as CourseModuleApi, lesson as LessonApi};

/// Anyone who can edit the course the lesson belongs to.
pub(crate) async fn update(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(IdPath { id }): Path<IdPath>,
    request: Request,
    next: Next,
) -> impl IntoResponse {
    let db = app_state.db_conn_ref();
    let lesson = match LessonApi::find_by_id(db, id).await {
        Ok(lesson) => lesson,
        Err(err) => return lookup_failed(err.into(), "Lesson", id),
    };
    let module = match CourseModuleApi::find_by_id(db, lesson.module_id).await {
        Ok(module) => module,
        Err(err) => return lookup_failed(err.into(), "Module", lesson.module_id),
    };

    guard(&app_state, &user, module.course_id, CourseRight::Edit, request, next).await
}

#[cfg(test)]
#[cfg(feature = "mock")]
mod tests {
    use super::*;
    use crate::test_utils::{api_request, login, test_app, test_user};
    use axum::{http::StatusCode, middleware::from_fn_with_state, routing::put, Router};
    use domain::{
        activity_type::ActivityType, course_collaborators, course_modules,
        course_status::CourseStatus, courses, lesson_status::LessonStatus, lessons, roles::Role,
        Id,
    };
    use sea_orm::{DatabaseBackend, MockDatabase, Value};
    use std::collections::BTreeMap;
    use tower::ServiceExt;

    async fn handler() -> &'static str {
        "ok"
    }

    fn routes(app_state: AppState) -> Router {
        Router::new()
            .route("/lessons/{id}", put(handler))
            .route_layer(from_fn_with_state(app_state.clone(), update))
            .with_state(app_state)
    }

    fn course(creator_id: Id) -> courses::Model {
        let now = chrono::Utc::now();
        courses::Model {
            id: Id::new_v4(),
            name: "Oratória".to_string(),
            description: None,
            objectives: None,
            target_audience: None,
            estimated_duration: 20,
            status: CourseStatus::InProgress,
            tags: vec![],
            creator_id,
            department_id: None,
            created_at: now.into(),
            updated_at: now.into(),
        }
    }

    fn module(course_id: Id) -> course_modules::Model {
        let now = chrono::Utc::now();
        course_modules::Model {
            id: Id::new_v4(),
            course_id,
            title: "Voz".to_string(),
            description: None,
            position: 0,
            created_at: now.into(),
            updated_at: now.into(),
        }
    }

    fn lesson(module_id: Id) -> lessons::Model {
        let now = chrono::Utc::now();
        lessons::Model {
            id: Id::new_v4(),
            module_id,
            title: "Respiração".to_string(),
            description: None,
            duration: 20,
            activity_type: ActivityType::Exercicio,
            status: LessonStatus::Todo,
            notes: None,
            position: 0,
            created_at: now.into(),
            updated_at: now.into(),
        }
    }

    // Collaborator ids are read as a single `user_id` column.
    fn collaborator_row(user_id: Id) -> BTreeMap<&'static str, Value> {
        BTreeMap::from([("user_id", Value::from(user_id))])
    }

    #[tokio::test]
    async fn collaborators_may_edit_lessons() {
        let user = test_user(Role::Instructor);
        let shared = course(Id::new_v4());
        let module = module(shared.id);
        let lesson = lesson(module.id);
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[user.clone()]])
            .append_query_results([[user.clone()]])
            .append_query_results([[lesson.clone()]])
            .append_query_results([[module.clone()]])
            .append_query_results([[shared.clone()]])
            .append_query_results([[collaborator_row(user.id)]])
            .into_connection();
        let app = test_app(db, routes);

        let cookie = login(&app, &user.email).await;
        let response = app
            .oneshot(api_request("PUT", &format!("/lessons/{}", lesson.id), &cookie, None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn strangers_may_not_edit_lessons() {
        let user = test_user(Role::Instructor);
        let foreign = course(Id::new_v4());
        let module = module(foreign.id);
        let lesson = lesson(module.id);
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[user.clone()]])
            .append_query_results([[user.clone()]])
            .append_query_results([[lesson.clone()]])
            .append_query_results([[module.clone()]])
            .append_query_results([[foreign.clone()]])
            .append_query_results([Vec::<course_collaborators::Model>::new()])
            .into_connection();
        let app = test_app(db, routes);

        let cookie = login(&app, &user.email).await;
        let response = app
            .oneshot(api_request("PUT", &format!("/lessons/{}", lesson.id), &cookie, None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn missing_lessons_are_not_found() {
        let user = test_user(Role::Admin);
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[user.clone()]])
            .append_query_results([[user.clone()]])
            .append_query_results([Vec::<lessons::Model>::new()])
            .into_connection();
        let app = test_app(db, routes);

        let cookie = login(&app, &user.email).await;
        let response = app
            .oneshot(api_request("PUT", &format!("/lessons/{}", Id::new_v4()), &cookie, None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
