use async_trait::async_trait;
use uuid::Uuid;

use crate::booking::{Booking, BookingStatus};
use crate::party::{Client, Driver};

pub type RepoError = Box<dyn std::error::Error + Send + Sync>;

/// Repository trait for client profiles
#[async_trait]
pub trait ClientRepository: Send + Sync {
    async fn insert(&self, client: &Client) -> Result<(), RepoError>;

    async fn get(&self, id: Uuid) -> Result<Option<Client>, RepoError>;

    async fn find_by_user(&self, user_id: Uuid) -> Result<Option<Client>, RepoError>;

    /// Update the mutable contact fields only.
    async fn update_contact(
        &self,
        id: Uuid,
        email: &str,
        phone: &str,
    ) -> Result<(), RepoError>;
}

/// Repository trait for drivers
#[async_trait]
pub trait DriverRepository: Send + Sync {
    async fn insert(&self, driver: &Driver) -> Result<(), RepoError>;

    async fn get(&self, id: Uuid) -> Result<Option<Driver>, RepoError>;

    async fn find_by_user(&self, user_id: Uuid) -> Result<Option<Driver>, RepoError>;

    async fn list_active(&self) -> Result<Vec<Driver>, RepoError>;
}

/// Repository trait for bookings. List operations return newest-first
/// by (date, time) descending.
#[async_trait]
pub trait BookingRepository: Send + Sync {
    async fn insert(&self, booking: &Booking) -> Result<(), RepoError>;

    async fn get(&self, id: Uuid) -> Result<Option<Booking>, RepoError>;

    async fn list_all(&self) -> Result<Vec<Booking>, RepoError>;

    async fn list_by_client(&self, client_id: Uuid) -> Result<Vec<Booking>, RepoError>;

    async fn list_by_driver(&self, driver_id: Uuid) -> Result<Vec<Booking>, RepoError>;

    /// The driver's PENDING/CONFIRMED bookings, the only ones that
    /// block availability.
    async fn active_for_driver(&self, driver_id: Uuid) -> Result<Vec<Booking>, RepoError>;

    async fn update_status(&self, id: Uuid, status: BookingStatus) -> Result<(), RepoError>;

    /// Full-record update. Never touches `created_at`.
    async fn update(&self, booking: &Booking) -> Result<(), RepoError>;
}
