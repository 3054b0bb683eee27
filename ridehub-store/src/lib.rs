pub mod app_config;
pub mod booking_repo;
pub mod database;
pub mod party_repo;

pub use booking_repo::PgBookingRepository;
pub use database::DbClient;
pub use party_repo::{PgClientRepository, PgDriverRepository};
