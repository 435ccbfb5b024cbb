use axum::http::{
    header::{ACCEPT, CONTENT_TYPE},
    HeaderName, HeaderValue, Method,
};
use axum_login::AuthManagerLayerBuilder;
use domain::user::Backend;
use log::*;
use time::Duration;
use tower_http::cors::CorsLayer;
use tower_sessions::{cookie::SameSite, ExpiredDeletion, Expiry, SessionManagerLayer};
use tower_sessions_sqlx_store::PostgresStore;

mod controller;
mod error;
mod extractors;
mod middleware;
mod params;
mod protect;
pub mod router;

#[cfg(test)]
#[cfg(feature = "mock")]
mod test_utils;

pub use error::{Error, Result};
pub use service::AppState;

/// Interval between sweeps of expired sessions from the session store.
const EXPIRED_SESSION_SWEEP: std::time::Duration = std::time::Duration::from_secs(60);

pub async fn init_server(
    app_state: AppState,
) -> core::result::Result<(), Box<dyn std::error::Error>> {
    let config = &app_state.config;

    // Sessions live next to the platform tables.
    let pool = app_state.db_conn_ref().get_postgres_connection_pool().clone();
    let session_store = PostgresStore::new(pool).with_schema_name(&config.database_schema)?;
    session_store.migrate().await?;

    tokio::task::spawn(
        session_store
            .clone()
            .continuously_delete_expired(EXPIRED_SESSION_SWEEP),
    );

    let session_layer = SessionManagerLayer::new(session_store)
        .with_secure(config.is_production())
        .with_same_site(SameSite::Lax)
        .with_expiry(Expiry::OnInactivity(Duration::seconds(
            config.session_expiry_seconds(),
        )));

    let backend = Backend::new(&app_state.database_connection);
    let auth_layer = AuthManagerLayerBuilder::new(backend, session_layer).build();

    let cors_layer = CorsLayer::new()
        .allow_methods([Method::DELETE, Method::GET, Method::POST, Method::PUT])
        .allow_credentials(true)
        .allow_headers([
            ACCEPT,
            CONTENT_TYPE,
            HeaderName::from_static(service::config::ApiVersion::field_name()),
        ])
        .allow_origin(allowed_origins(&config.allowed_origins));

    let interface = config.interface.as_deref().unwrap_or("127.0.0.1");
    let server_url = format!("{interface}:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&server_url).await?;

    info!(
        "Server starting... listening for connections on http://{server_url} (API version {})",
        config.api_version()
    );

    let router = router::define_routes(app_state.clone())
        .layer(auth_layer)
        .layer(cors_layer);

    axum::serve(listener, router.into_make_service()).await?;

    Ok(())
}

/// Origins that fail to parse as header values are skipped with a warning.
fn allowed_origins(origins: &[String]) -> Vec<HeaderValue> {
    origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin {origin:?}");
                None
            }
        })
        .collect()
}
