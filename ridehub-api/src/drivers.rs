use axum::{extract::State, routing::get, Json, Router};

use ridehub_domain::projection::DriverSummary;

use crate::error::AppError;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/drivers/active", get(active_drivers))
}

/// GET /drivers/active — id and name only, for the booking form.
async fn active_drivers(
    State(state): State<AppState>,
) -> Result<Json<Vec<DriverSummary>>, AppError> {
    let drivers = state.service.active_drivers().await?;
    let summaries = drivers
        .into_iter()
        .map(|d| DriverSummary {
            id: d.id,
            name: d.name,
        })
        .collect();
    Ok(Json(summaries))
}
