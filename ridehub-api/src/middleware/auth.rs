use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use ridehub_domain::principal::Principal;
use ridehub_domain::repository::{ClientRepository as _, DriverRepository as _};

use crate::state::AppState;

/// JWT claims carried by every caller. `sub` is the external user id,
/// `role` is CLIENT, DRIVER or STAFF.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: Uuid,
    pub role: String,
    pub exp: usize,
}

/// Verify the bearer token and resolve the caller to a `Principal`
/// exactly once, injecting it into request extensions. Handlers never
/// probe for profiles themselves.
pub async fn principal_middleware(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    // 1. Extract token from Authorization header
    let auth_header = req
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .ok_or(StatusCode::UNAUTHORIZED)?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or(StatusCode::UNAUTHORIZED)?;

    // 2. Decode and validate JWT
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(state.auth.secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|_| StatusCode::UNAUTHORIZED)?;

    let claims = token_data.claims;

    // 3. Resolve the role to a principal with its profile
    let principal = match claims.role.as_str() {
        "STAFF" => Principal::Staff {
            user_id: claims.sub,
        },
        "CLIENT" => match state.clients.find_by_user(claims.sub).await {
            Ok(Some(client)) => Principal::Client(client),
            Ok(None) => Principal::Anonymous,
            Err(_) => return Err(StatusCode::INTERNAL_SERVER_ERROR),
        },
        "DRIVER" => match state.drivers.find_by_user(claims.sub).await {
            Ok(Some(driver)) => Principal::Driver(driver),
            Ok(None) => Principal::Anonymous,
            Err(_) => return Err(StatusCode::INTERNAL_SERVER_ERROR),
        },
        _ => return Err(StatusCode::FORBIDDEN),
    };

    // 4. Inject into request extensions
    req.extensions_mut().insert(claims);
    req.extensions_mut().insert(principal);

    Ok(next.run(req).await)
}
