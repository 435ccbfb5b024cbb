use axum::{
    extract::Request,
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};
use domain::user::AuthSession;

/// Rejects requests without a logged in user with 401 instead of redirecting
/// to a login page the way axum-login's `login_required!` does.
pub async fn require_auth(auth_session: AuthSession, request: Request, next: Next) -> Response {
    match auth_session.user {
        Some(_user) => next.run(request).await,
        None => (StatusCode::UNAUTHORIZED, "Unauthorized").into_response(),
    }
}

#[cfg(test)]
#[cfg(feature = "mock")]
mod tests {
    use super::*;
    use crate::test_utils::{login, test_app, test_user};
    use crate::AppState;
    use axum::{body::Body, http::Request, middleware::from_fn, routing::get, Router};
    use domain::roles::Role;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use tower::ServiceExt;

    async fn test_handler() -> &'static str {
        "authenticated"
    }

    fn protected_routes(app_state: AppState) -> Router {
        Router::new()
            .route("/test", get(test_handler))
            .route_layer(from_fn(require_auth))
            .with_state(app_state)
    }

    #[tokio::test]
    async fn rejects_requests_without_a_session() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let app = test_app(db, protected_routes);

        let request = Request::builder().uri("/test").body(Body::empty()).unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn rejects_an_unknown_session_cookie() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let app = test_app(db, protected_routes);

        let request = Request::builder()
            .uri("/test")
            .header("cookie", "id=not-a-session")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn lets_a_logged_in_user_through() {
        let user = test_user(Role::Instructor);
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[user.clone()]]) // authenticate
            .append_query_results([[user.clone()]]) // session user lookup
            .into_connection();
        let app = test_app(db, protected_routes);

        let cookie = login(&app, &user.email).await;
        let request = Request::builder()
            .uri("/test")
            .header("cookie", cookie)
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }
}
