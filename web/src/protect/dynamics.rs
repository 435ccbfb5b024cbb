use crate::params::IdPath;
use crate::protect::{forbidden, lookup_failed};
use crate::{extractors::authenticated_user::AuthenticatedUser, AppState};
use axum::{
    extract::{Path, Request, State},
    middleware::Next,
    response::IntoResponse,
};
use domain::dynamic as DynamicApi;
use log::*;

/// Only the author of a dynamic or an administrator may change or remove it.
pub(crate) async fn update(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(IdPath { id }): Path<IdPath>,
    request: Request,
    next: Next,
) -> impl IntoResponse {
    match DynamicApi::find_by_id(app_state.db_conn_ref(), id).await {
        Ok(dynamic) if dynamic.created_by == user.id || user.is_admin() => {
            next.run(request).await
        }
        Ok(_) => {
            warn!("User {} may not change dynamic {id}", user.id);
            forbidden()
        }
        Err(err) => lookup_failed(err.into(), "Dynamic", id),
    }
}

#[cfg(test)]
#[cfg(feature = "mock")]
mod tests {
    use super::*;
    use crate::test_utils::{api_request, login, test_app, test_user};
    use axum::{http::StatusCode, middleware::from_fn_with_state, routing::put, Router};
    use domain::{dynamic_category::DynamicCategory, dynamics, roles::Role, Id};
    use sea_orm::{DatabaseBackend, MockDatabase};
    use tower::ServiceExt;

    async fn handler() -> &'static str {
        "ok"
    }

    fn routes(app_state: AppState) -> Router {
        Router::new()
            .route("/dynamics/{id}", put(handler))
            .route_layer(from_fn_with_state(app_state.clone(), update))
            .with_state(app_state)
    }

    fn dynamic(created_by: Id) -> dynamics::Model {
        let now = chrono::Utc::now();
        dynamics::Model {
            id: Id::new_v4(),
            title: "Dois fatos e uma mentira".to_string(),
            description: "Cada pessoa conta três fatos sobre si".to_string(),
            objective: None,
            category: DynamicCategory::Icebreaker,
            min_participants: Some(3),
            max_participants: None,
            duration: 10,
            materials: None,
            instructions: None,
            tags: vec![],
            created_by,
            created_at: now.into(),
            updated_at: now.into(),
        }
    }

    async fn put_status(user: domain::users::Model, target: dynamics::Model) -> StatusCode {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[user.clone()]])
            .append_query_results([[user.clone()]])
            .append_query_results([[target.clone()]])
            .into_connection();
        let app = test_app(db, routes);

        let cookie = login(&app, &user.email).await;
        app.oneshot(api_request("PUT", &format!("/dynamics/{}", target.id), &cookie, None))
            .await
            .unwrap()
            .status()
    }

    #[tokio::test]
    async fn authors_change_their_dynamics() {
        let user = test_user(Role::Instructor);
        let authored = dynamic(user.id);
        assert_eq!(put_status(user, authored).await, StatusCode::OK);
    }

    #[tokio::test]
    async fn admins_change_any_dynamic() {
        let admin = test_user(Role::Admin);
        assert_eq!(put_status(admin, dynamic(Id::new_v4())).await, StatusCode::OK);
    }

    #[tokio::test]
    async fn other_users_may_not_change_a_dynamic() {
        let user = test_user(Role::Manager);
        assert_eq!(
            put_status(user, dynamic(Id::new_v4())).await,
            StatusCode::FORBIDDEN
        );
    }
}
