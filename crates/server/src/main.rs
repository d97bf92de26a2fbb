use database::db::create_connection;
use log::{error, info};
use migration::{Migrator, MigratorTrait};
use server::{app, config::Config, state::AppState, utils::shutdown::shutdown_signal};
use std::process::exit;
use tower::ServiceBuilder;
use tower_oauth2_resource_server::server::OAuth2ResourceServer;

#[tokio::main]
async fn main() {
    // Load .env before the logger so RUST_LOG can come from it
    let dotenv = dotenvy::dotenv();
    env_logger::init();
    if let Ok(path) = dotenv {
        info!("Loaded environment from {}", path.display());
    }

    let config = Config::load().unwrap_or_else(|e| {
        error!("{e}");
        exit(1);
    });

    let db = create_connection(&config.database_url, config.database_max_connections)
        .await
        .unwrap_or_else(|e| {
            error!("Failed to connect to the database: {e}");
            exit(1);
        });

    if config.run_migrations {
        if let Err(e) = Migrator::up(&db, None).await {
            error!("Failed to run migrations: {e}");
            exit(1);
        }
        info!("Database migrations are up to date");
    }

    let oauth2_resource_server = <OAuth2ResourceServer>::builder()
        .issuer_url(config.oidc_issuer_url.as_str())
        .build()
        .await
        .expect("Failed to build OAuth2ResourceServer");

    let app = app(AppState::new(db), |routes| {
        routes.layer(ServiceBuilder::new().layer(oauth2_resource_server.into_layer()))
    });

    let listener = tokio::net::TcpListener::bind(config.bind_address)
        .await
        .expect("Failed to bind address");
    info!("Running axum on http://{}", config.bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");
}
