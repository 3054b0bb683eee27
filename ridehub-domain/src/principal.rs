use uuid::Uuid;

use crate::party::{Client, Driver};

/// The caller's resolved role, carrying the associated profile.
///
/// Resolved exactly once per request by the auth middleware; handlers
/// match on this instead of probing for profiles.
#[derive(Debug, Clone)]
pub enum Principal {
    Client(Client),
    Driver(Driver),
    Staff { user_id: Uuid },
    Anonymous,
}

impl Principal {
    pub fn as_client(&self) -> Option<&Client> {
        match self {
            Principal::Client(client) => Some(client),
            _ => None,
        }
    }

    pub fn as_driver(&self) -> Option<&Driver> {
        match self {
            Principal::Driver(driver) => Some(driver),
            _ => None,
        }
    }

    pub fn is_staff(&self) -> bool {
        matches!(self, Principal::Staff { .. })
    }

    /// Whether this principal may read or mutate the given booking.
    pub fn owns_booking(&self, client_id: Uuid, driver_id: Uuid) -> bool {
        match self {
            Principal::Staff { .. } => true,
            Principal::Client(client) => client.id == client_id,
            Principal::Driver(driver) => driver.id == driver_id,
            Principal::Anonymous => false,
        }
    }
}
