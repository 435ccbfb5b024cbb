//! Router and session scaffolding shared by the handler tests.
use crate::controller::user_session_controller;
use crate::AppState;
use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    response::Response,
    routing::post,
    Router,
};
use axum_login::AuthManagerLayerBuilder;
use chrono::Utc;
use domain::user::Backend;
use domain::{roles::Role, users, Id};
use password_auth::generate_hash;
use sea_orm::DatabaseConnection;
use service::config::{ApiVersion, Config};
use std::sync::Arc;
use time::Duration;
use tower::ServiceExt;
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer};

pub(crate) const TEST_PASSWORD: &str = "password2";

pub(crate) fn test_user(role: Role) -> users::Model {
    let now = Utc::now();
    users::Model {
        id: Id::new_v4(),
        email: format!("{role}@example.com"),
        first_name: "Test".to_string(),
        last_name: "User".to_string(),
        display_name: None,
        password: generate_hash(TEST_PASSWORD),
        role,
        department_id: None,
        created_at: now.into(),
        updated_at: now.into(),
    }
}

/// Builds the routes under test behind in-memory sessions, plus `POST /login`.
pub(crate) fn test_app(
    db: DatabaseConnection,
    routes: impl FnOnce(AppState) -> Router,
) -> Router {
    let db = Arc::new(db);
    let app_state = AppState::new(Config::default(), &db);

    let session_layer = SessionManagerLayer::new(MemoryStore::default())
        .with_secure(false)
        .with_expiry(Expiry::OnInactivity(Duration::days(1)));
    let auth_layer = AuthManagerLayerBuilder::new(Backend::new(&db), session_layer).build();

    Router::new()
        .route("/login", post(user_session_controller::login))
        .merge(routes(app_state))
        .layer(auth_layer)
}

/// Logs in with [`TEST_PASSWORD`] and returns the session cookie to send back.
pub(crate) async fn login(app: &Router, email: &str) -> String {
    let request = Request::builder()
        .uri("/login")
        .method("POST")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(format!("email={email}&password={TEST_PASSWORD}")))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|value| value.to_str().ok())
        .expect("login should set a session cookie");
    set_cookie
        .split(';')
        .next()
        .unwrap_or_default()
        .to_string()
}

/// A versioned request carrying the session cookie, with an optional JSON body.
pub(crate) fn api_request(
    method: &str,
    uri: &str,
    cookie: &str,
    json: Option<serde_json::Value>,
) -> Request<Body> {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::COOKIE, cookie)
        .header(ApiVersion::field_name(), ApiVersion::default_version());
    match json {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

pub(crate) async fn json_body(response: Response) -> serde_json::Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
