use std::sync::Arc;

use ridehub_domain::repository::{ClientRepository, DriverRepository};
use ridehub_domain::service::BookingService;

#[derive(Clone)]
pub struct AuthConfig {
    pub secret: String,
    pub expiration: u64,
}

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<BookingService>,
    pub clients: Arc<dyn ClientRepository>,
    pub drivers: Arc<dyn DriverRepository>,
    pub auth: AuthConfig,
}
