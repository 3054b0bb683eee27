use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, patch, post},
    Extension, Json, Router,
};
use serde_json::Value;
use uuid::Uuid;

use ridehub_domain::booking::BookingStatus;
use ridehub_domain::principal::Principal;
use ridehub_domain::projection::{BookingView, Voucher};
use ridehub_domain::service::{NewBookingRequest, UpdateBookingRequest};

use crate::error::AppError;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/bookings", post(create_booking))
        .route("/bookings/mine", get(my_bookings))
        .route("/bookings/{id}", patch(update_booking))
        .route("/bookings/{id}/voucher", get(booking_voucher))
}

/// POST /bookings
async fn create_booking(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Json(req): Json<NewBookingRequest>,
) -> Result<(StatusCode, Json<BookingView>), AppError> {
    let view = state.service.create_booking(&principal, req).await?;
    Ok((StatusCode::CREATED, Json(view)))
}

/// PATCH /bookings/{id}
///
/// A body of exactly `{"status": ...}` takes the validated transition
/// path; any other body is a full-field update, which bypasses the
/// transition check.
async fn update_booking(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(booking_id): Path<Uuid>,
    Json(body): Json<Value>,
) -> Result<Json<BookingView>, AppError> {
    let status_only = body
        .as_object()
        .map(|map| map.len() == 1 && map.contains_key("status"))
        .unwrap_or(false);

    if status_only {
        let requested = body["status"]
            .as_str()
            .and_then(BookingStatus::parse)
            .ok_or_else(|| AppError::ValidationError("invalid status value".to_string()))?;
        let view = state
            .service
            .update_status(&principal, booking_id, requested)
            .await?;
        return Ok(Json(view));
    }

    let req: UpdateBookingRequest = serde_json::from_value(body)
        .map_err(|e| AppError::ValidationError(format!("invalid booking update: {e}")))?;
    let view = state
        .service
        .update_booking(&principal, booking_id, req)
        .await?;
    Ok(Json(view))
}

/// GET /bookings/mine — caller-scoped list, newest-first.
async fn my_bookings(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> Result<Json<Vec<BookingView>>, AppError> {
    let views = state.service.list_for(&principal).await?;
    Ok(Json(views))
}

/// GET /bookings/{id}/voucher
async fn booking_voucher(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(booking_id): Path<Uuid>,
) -> Result<Json<Voucher>, AppError> {
    let voucher = state.service.voucher(&principal, booking_id).await?;
    Ok(Json(voucher))
}
