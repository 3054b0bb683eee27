use axum::{http::Method, routing::get, Router};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod bookings;
pub mod drivers;
pub mod error;
pub mod middleware;
pub mod profile;
pub mod state;

pub use state::AppState;

pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::OPTIONS,
        ])
        .allow_headers([
            axum::http::header::AUTHORIZATION,
            axum::http::header::CONTENT_TYPE,
            axum::http::header::USER_AGENT,
        ]);

    // Every route except the health probe goes through principal
    // resolution.
    let authed = Router::new()
        .merge(bookings::routes())
        .merge(drivers::routes())
        .merge(profile::routes())
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::auth::principal_middleware,
        ));

    Router::new()
        .route("/health", get(health))
        .merge(authed)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}
