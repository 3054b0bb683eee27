//! In-memory repository implementations backing the test suites and
//! local runs without a database.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::booking::{Booking, BookingStatus};
use crate::party::{Client, Driver};
use crate::repository::{
    BookingRepository, ClientRepository, DriverRepository, RepoError,
};

#[derive(Default)]
pub struct MemoryClientRepository {
    clients: RwLock<HashMap<Uuid, Client>>,
}

#[async_trait]
impl ClientRepository for MemoryClientRepository {
    async fn insert(&self, client: &Client) -> Result<(), RepoError> {
        self.clients.write().await.insert(client.id, client.clone());
        Ok(())
    }

    async fn get(&self, id: Uuid) -> Result<Option<Client>, RepoError> {
        Ok(self.clients.read().await.get(&id).cloned())
    }

    async fn find_by_user(&self, user_id: Uuid) -> Result<Option<Client>, RepoError> {
        Ok(self
            .clients
            .read()
            .await
            .values()
            .find(|c| c.user_id == user_id)
            .cloned())
    }

    async fn update_contact(
        &self,
        id: Uuid,
        email: &str,
        phone: &str,
    ) -> Result<(), RepoError> {
        let mut clients = self.clients.write().await;
        let client = clients.get_mut(&id).ok_or("client not found")?;
        client.email = email.to_string();
        client.phone = phone.to_string();
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryDriverRepository {
    drivers: RwLock<HashMap<Uuid, Driver>>,
}

#[async_trait]
impl DriverRepository for MemoryDriverRepository {
    async fn insert(&self, driver: &Driver) -> Result<(), RepoError> {
        self.drivers.write().await.insert(driver.id, driver.clone());
        Ok(())
    }

    async fn get(&self, id: Uuid) -> Result<Option<Driver>, RepoError> {
        Ok(self.drivers.read().await.get(&id).cloned())
    }

    async fn find_by_user(&self, user_id: Uuid) -> Result<Option<Driver>, RepoError> {
        Ok(self
            .drivers
            .read()
            .await
            .values()
            .find(|d| d.user_id == Some(user_id))
            .cloned())
    }

    async fn list_active(&self) -> Result<Vec<Driver>, RepoError> {
        let mut active: Vec<Driver> = self
            .drivers
            .read()
            .await
            .values()
            .filter(|d| d.active)
            .cloned()
            .collect();
        active.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(active)
    }
}

#[derive(Default)]
pub struct MemoryBookingRepository {
    bookings: RwLock<HashMap<Uuid, Booking>>,
}

fn newest_first(bookings: &mut [Booking]) {
    bookings.sort_by(|a, b| (b.date, b.time).cmp(&(a.date, a.time)));
}

#[async_trait]
impl BookingRepository for MemoryBookingRepository {
    async fn insert(&self, booking: &Booking) -> Result<(), RepoError> {
        self.bookings
            .write()
            .await
            .insert(booking.id, booking.clone());
        Ok(())
    }

    async fn get(&self, id: Uuid) -> Result<Option<Booking>, RepoError> {
        Ok(self.bookings.read().await.get(&id).cloned())
    }

    async fn list_all(&self) -> Result<Vec<Booking>, RepoError> {
        let mut all: Vec<Booking> = self.bookings.read().await.values().cloned().collect();
        newest_first(&mut all);
        Ok(all)
    }

    async fn list_by_client(&self, client_id: Uuid) -> Result<Vec<Booking>, RepoError> {
        let mut found: Vec<Booking> = self
            .bookings
            .read()
            .await
            .values()
            .filter(|b| b.client_id == client_id)
            .cloned()
            .collect();
        newest_first(&mut found);
        Ok(found)
    }

    async fn list_by_driver(&self, driver_id: Uuid) -> Result<Vec<Booking>, RepoError> {
        let mut found: Vec<Booking> = self
            .bookings
            .read()
            .await
            .values()
            .filter(|b| b.driver_id == driver_id)
            .cloned()
            .collect();
        newest_first(&mut found);
        Ok(found)
    }

    async fn active_for_driver(&self, driver_id: Uuid) -> Result<Vec<Booking>, RepoError> {
        Ok(self
            .bookings
            .read()
            .await
            .values()
            .filter(|b| b.driver_id == driver_id && b.status.is_active())
            .cloned()
            .collect())
    }

    async fn update_status(&self, id: Uuid, status: BookingStatus) -> Result<(), RepoError> {
        let mut bookings = self.bookings.write().await;
        let booking = bookings.get_mut(&id).ok_or("booking not found")?;
        booking.status = status;
        booking.updated_at = Utc::now();
        Ok(())
    }

    async fn update(&self, booking: &Booking) -> Result<(), RepoError> {
        let mut bookings = self.bookings.write().await;
        if !bookings.contains_key(&booking.id) {
            return Err("booking not found".into());
        }
        bookings.insert(booking.id, booking.clone());
        Ok(())
    }
}
