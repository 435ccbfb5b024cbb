use log::{error, info};
use migration::{Migrator, MigratorTrait};
use service::{config::Config, logging::Logger, AppState};
use std::sync::Arc;

#[tokio::main]
async fn main() {
    let config = Config::new();
    Logger::init_logger(&config as &Config);

    info!("Starting the learning platform API server...");
    info!(
        "Runtime environment: {}, API version: {}",
        config.runtime_env(),
        config.api_version()
    );

    let db = match service::init_database(&config).await {
        Ok(db) => Arc::new(db),
        Err(e) => {
            error!("Failed to establish database connection: {e}");
            std::process::exit(1);
        }
    };

    if config.run_migrations_on_startup {
        info!("Applying pending migrations...");
        if let Err(e) = Migrator::up(db.as_ref(), None).await {
            error!("Failed to apply migrations: {e}");
            std::process::exit(1);
        }
    }

    let app_state = AppState::new(config, &db);

    if let Err(e) = web::init_server(app_state).await {
        error!("Server stopped: {e}");
        std::process::exit(1);
    }
}
