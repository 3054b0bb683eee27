use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A client profile, one-to-one with an external user identity.
/// Immutable except the contact fields (email, phone).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Client {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
}

impl Client {
    pub fn new(user_id: Uuid, name: String, email: String, phone: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            name,
            email,
            phone,
        }
    }
}

/// A driver. May exist without a linked user account (created
/// administratively). The `active` flag gates eligibility for new
/// bookings; existing bookings referencing an inactive driver stand.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Driver {
    pub id: Uuid,
    pub user_id: Option<Uuid>,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub license_id: String,
    pub active: bool,
}

impl Driver {
    pub fn new(
        user_id: Option<Uuid>,
        name: String,
        email: String,
        phone: String,
        license_id: String,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            name,
            email,
            phone,
            license_id,
            active: true,
        }
    }
}
