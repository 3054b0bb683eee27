use axum::{
    extract::State,
    routing::{get, put},
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use ridehub_domain::principal::Principal;
use ridehub_domain::repository::ClientRepository as _;

use crate::error::AppError;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/me", get(whoami))
        .route("/profile", put(update_profile))
}

#[derive(Debug, Serialize)]
struct WhoamiResponse {
    role: &'static str,
    profile_id: Option<Uuid>,
    name: Option<String>,
    email: Option<String>,
    phone: Option<String>,
    active: Option<bool>,
}

/// GET /me — the caller's resolved role and profile summary.
async fn whoami(Extension(principal): Extension<Principal>) -> Json<WhoamiResponse> {
    let response = match principal {
        Principal::Client(client) => WhoamiResponse {
            role: "CLIENT",
            profile_id: Some(client.id),
            name: Some(client.name),
            email: Some(client.email),
            phone: Some(client.phone),
            active: None,
        },
        Principal::Driver(driver) => WhoamiResponse {
            role: "DRIVER",
            profile_id: Some(driver.id),
            name: Some(driver.name),
            email: Some(driver.email),
            phone: Some(driver.phone),
            active: Some(driver.active),
        },
        Principal::Staff { .. } => WhoamiResponse {
            role: "STAFF",
            profile_id: None,
            name: None,
            email: None,
            phone: None,
            active: None,
        },
        Principal::Anonymous => WhoamiResponse {
            role: "NONE",
            profile_id: None,
            name: None,
            email: None,
            phone: None,
            active: None,
        },
    };
    Json(response)
}

#[derive(Debug, Deserialize)]
struct UpdateProfileRequest {
    email: String,
    phone: String,
}

#[derive(Debug, Serialize)]
struct ProfileResponse {
    id: Uuid,
    name: String,
    email: String,
    phone: String,
}

/// PUT /profile — clients may update their contact fields only.
async fn update_profile(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Json(req): Json<UpdateProfileRequest>,
) -> Result<Json<ProfileResponse>, AppError> {
    let client = principal
        .as_client()
        .ok_or_else(|| AppError::AuthorizationError("user has no client profile".to_string()))?;

    state
        .clients
        .update_contact(client.id, &req.email, &req.phone)
        .await
        .map_err(|e| AppError::InternalServerError(e.to_string()))?;

    Ok(Json(ProfileResponse {
        id: client.id,
        name: client.name.clone(),
        email: req.email,
        phone: req.phone,
    }))
}
