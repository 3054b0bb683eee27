use std::net::SocketAddr;
use std::sync::Arc;

use ridehub_api::{
    app,
    state::{AppState, AuthConfig},
};
use ridehub_domain::service::BookingService;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ridehub_api=debug,tower_http=debug,axum::rejection=trace".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ridehub_store::app_config::Config::load().expect("Failed to load config");
    tracing::info!("Starting Ridehub API on port {}", config.server.port);

    let db = ridehub_store::DbClient::new(&config.database.url)
        .await
        .expect("Failed to connect to Postgres");
    db.migrate().await.expect("Failed to run migrations");

    let clients = Arc::new(ridehub_store::PgClientRepository::new(db.pool.clone()));
    let drivers = Arc::new(ridehub_store::PgDriverRepository::new(db.pool.clone()));
    let bookings = Arc::new(ridehub_store::PgBookingRepository::new(db.pool.clone()));

    let service = Arc::new(BookingService::new(
        clients.clone(),
        drivers.clone(),
        bookings,
        config.pricing.clone(),
    ));

    let app_state = AppState {
        service,
        clients,
        drivers,
        auth: AuthConfig {
            secret: config.auth.jwt_secret.clone(),
            expiration: config.auth.jwt_expiration_seconds,
        },
    };

    let app = app(app_state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
