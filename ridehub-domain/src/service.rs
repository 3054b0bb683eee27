use std::collections::HashMap;
use std::sync::Arc;

use chrono::{NaiveDate, NaiveTime, Utc};
use serde::Deserialize;
use tokio::sync::Mutex;
use tracing::info;
use uuid::Uuid;

use crate::availability::is_available;
use crate::booking::{Booking, BookingStatus, PaymentMethod, ServiceType};
use crate::pricing::RateTable;
use crate::principal::Principal;
use crate::projection::{BookingView, Voucher};
use crate::repository::{BookingRepository, ClientRepository, DriverRepository};
use crate::transition::validate_transition;
use crate::{DomainError, DomainResult};

fn default_adults() -> i32 {
    1
}

fn default_service() -> ServiceType {
    ServiceType::Transfer
}

fn default_payment() -> PaymentMethod {
    PaymentMethod::InstantTransfer
}

#[derive(Debug, Deserialize)]
pub struct NewBookingRequest {
    pub driver_id: Uuid,
    pub passenger_name: String,
    pub origin: String,
    pub destination: String,
    #[serde(default = "default_adults")]
    pub adults: i32,
    #[serde(default)]
    pub children: i32,
    pub date: String,
    pub time: String,
    #[serde(default)]
    pub flight_number: Option<String>,
    #[serde(default = "default_service")]
    pub service_type: ServiceType,
    pub contact_phone: String,
    #[serde(default = "default_payment")]
    pub payment_method: PaymentMethod,
    #[serde(default)]
    pub value_cents: Option<i64>,
    #[serde(default)]
    pub advance_cents: Option<i64>,
}

/// Full-record update. Present fields replace the stored ones; the
/// client and driver references are fixed at creation.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateBookingRequest {
    pub passenger_name: Option<String>,
    pub origin: Option<String>,
    pub destination: Option<String>,
    pub adults: Option<i32>,
    pub children: Option<i32>,
    pub date: Option<String>,
    pub time: Option<String>,
    #[serde(default, with = "double_option")]
    pub flight_number: Option<Option<String>>,
    pub service_type: Option<ServiceType>,
    pub contact_phone: Option<String>,
    pub payment_method: Option<PaymentMethod>,
    pub value_cents: Option<i64>,
    pub advance_cents: Option<i64>,
    pub status: Option<BookingStatus>,
}

// Distinguishes an absent flight_number from an explicit null.
mod double_option {
    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D>(de: D) -> Result<Option<Option<String>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<String>::deserialize(de).map(Some)
    }
}

/// Serializes booking creation per driver so the availability check and
/// the insert cannot interleave for the same driver.
#[derive(Default)]
struct DriverLocks {
    inner: Mutex<HashMap<Uuid, Arc<Mutex<()>>>>,
}

impl DriverLocks {
    async fn for_driver(&self, driver_id: Uuid) -> Arc<Mutex<()>> {
        self.inner
            .lock()
            .await
            .entry(driver_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }
}

/// Orchestrates booking creation, status updates, scoped listing and
/// voucher assembly over the repository traits.
pub struct BookingService {
    clients: Arc<dyn ClientRepository>,
    drivers: Arc<dyn DriverRepository>,
    bookings: Arc<dyn BookingRepository>,
    rates: RateTable,
    locks: DriverLocks,
}

impl BookingService {
    pub fn new(
        clients: Arc<dyn ClientRepository>,
        drivers: Arc<dyn DriverRepository>,
        bookings: Arc<dyn BookingRepository>,
        rates: RateTable,
    ) -> Self {
        Self {
            clients,
            drivers,
            bookings,
            rates,
            locks: DriverLocks::default(),
        }
    }

    pub async fn create_booking(
        &self,
        principal: &Principal,
        req: NewBookingRequest,
    ) -> DomainResult<BookingView> {
        // 1. The requesting principal must carry a client profile.
        let client = principal
            .as_client()
            .ok_or_else(|| {
                DomainError::Validation("user has no client profile".to_string())
            })?
            .clone();

        // 2. The driver must exist and be active.
        let driver = self
            .drivers
            .get(req.driver_id)
            .await?
            .filter(|d| d.active)
            .ok_or_else(|| {
                DomainError::NotFound("driver not found or inactive".to_string())
            })?;

        // 3. Schedule must parse.
        let (date, time) = parse_schedule(&req.date, &req.time)?;

        if req.adults < 1 {
            return Err(DomainError::Validation(
                "at least one adult passenger is required".to_string(),
            ));
        }
        if req.children < 0 {
            return Err(DomainError::Validation(
                "child count cannot be negative".to_string(),
            ));
        }

        // 4-5. Check availability and insert under the driver's lock so
        // two concurrent requests cannot both pass the check.
        let lock = self.locks.for_driver(driver.id).await;
        let _guard = lock.lock().await;

        let existing = self.bookings.active_for_driver(driver.id).await?;
        if !is_available(&existing, date.and_time(time)) {
            return Err(DomainError::Conflict(
                "driver is not available at the requested time".to_string(),
            ));
        }

        let value_cents = match req.value_cents {
            Some(v) if v > 0 => v,
            _ => self
                .rates
                .quote(req.service_type, req.adults, req.children),
        };

        let now = Utc::now();
        let booking = Booking {
            id: Uuid::new_v4(),
            client_id: client.id,
            driver_id: driver.id,
            passenger_name: req.passenger_name,
            origin: req.origin,
            destination: req.destination,
            adults: req.adults,
            children: req.children,
            date,
            time,
            flight_number: req.flight_number,
            service_type: req.service_type,
            contact_phone: req.contact_phone,
            value_cents,
            payment_method: req.payment_method,
            advance_cents: req.advance_cents.unwrap_or(0),
            status: BookingStatus::Pending,
            created_at: now,
            updated_at: now,
        };

        self.bookings.insert(&booking).await?;
        info!(booking_id = %booking.id, driver_id = %driver.id, "booking created");

        Ok(BookingView::build(&booking, &client, &driver))
    }

    /// Status-only partial update, validated against the lifecycle
    /// table.
    pub async fn update_status(
        &self,
        principal: &Principal,
        booking_id: Uuid,
        requested: BookingStatus,
    ) -> DomainResult<BookingView> {
        let mut booking = self.get_owned(principal, booking_id).await?;

        validate_transition(booking.status, requested)
            .map_err(|e| DomainError::Conflict(e.to_string()))?;

        self.bookings.update_status(booking_id, requested).await?;
        booking.set_status(requested);
        info!(booking_id = %booking.id, status = requested.as_str(), "booking status updated");

        self.view(&booking).await
    }

    /// Full-record update. Present fields replace stored ones; the
    /// booking value is never recomputed here.
    // TODO: product sign-off pending on whether full updates should run
    // the transition validator too; the status field currently bypasses
    // it, matching the status-only/full split of the original system.
    pub async fn update_booking(
        &self,
        principal: &Principal,
        booking_id: Uuid,
        req: UpdateBookingRequest,
    ) -> DomainResult<BookingView> {
        let mut booking = self.get_owned(principal, booking_id).await?;

        if let Some(passenger_name) = req.passenger_name {
            booking.passenger_name = passenger_name;
        }
        if let Some(origin) = req.origin {
            booking.origin = origin;
        }
        if let Some(destination) = req.destination {
            booking.destination = destination;
        }
        if let Some(adults) = req.adults {
            if adults < 1 {
                return Err(DomainError::Validation(
                    "at least one adult passenger is required".to_string(),
                ));
            }
            booking.adults = adults;
        }
        if let Some(children) = req.children {
            if children < 0 {
                return Err(DomainError::Validation(
                    "child count cannot be negative".to_string(),
                ));
            }
            booking.children = children;
        }
        if let Some(date) = req.date {
            booking.date = parse_date(&date)?;
        }
        if let Some(time) = req.time {
            booking.time = parse_time(&time)?;
        }
        if let Some(flight_number) = req.flight_number {
            booking.flight_number = flight_number;
        }
        if let Some(service_type) = req.service_type {
            booking.service_type = service_type;
        }
        if let Some(contact_phone) = req.contact_phone {
            booking.contact_phone = contact_phone;
        }
        if let Some(payment_method) = req.payment_method {
            booking.payment_method = payment_method;
        }
        if let Some(value_cents) = req.value_cents {
            booking.value_cents = value_cents;
        }
        if let Some(advance_cents) = req.advance_cents {
            booking.advance_cents = advance_cents;
        }
        if let Some(status) = req.status {
            booking.status = status;
        }
        booking.updated_at = Utc::now();

        self.bookings.update(&booking).await?;
        self.view(&booking).await
    }

    /// Caller-scoped listing: staff see everything, drivers their
    /// assignments, clients their own bookings. Newest-first.
    pub async fn list_for(&self, principal: &Principal) -> DomainResult<Vec<BookingView>> {
        let bookings = match principal {
            Principal::Staff { .. } => self.bookings.list_all().await?,
            Principal::Driver(driver) => self.bookings.list_by_driver(driver.id).await?,
            Principal::Client(client) => self.bookings.list_by_client(client.id).await?,
            Principal::Anonymous => {
                return Err(DomainError::Authorization(
                    "user has no client or driver profile".to_string(),
                ))
            }
        };

        let mut views = Vec::with_capacity(bookings.len());
        for booking in &bookings {
            views.push(self.view(booking).await?);
        }
        Ok(views)
    }

    pub async fn voucher(
        &self,
        principal: &Principal,
        booking_id: Uuid,
    ) -> DomainResult<Voucher> {
        let booking = self.get_owned(principal, booking_id).await?;
        let (client, driver) = self.parties(&booking).await?;
        Ok(Voucher::build(&booking, &client, &driver))
    }

    pub async fn active_drivers(&self) -> DomainResult<Vec<crate::party::Driver>> {
        Ok(self.drivers.list_active().await?)
    }

    async fn get_owned(
        &self,
        principal: &Principal,
        booking_id: Uuid,
    ) -> DomainResult<Booking> {
        let booking = self
            .bookings
            .get(booking_id)
            .await?
            .ok_or_else(|| DomainError::NotFound("booking not found".to_string()))?;

        if !principal.owns_booking(booking.client_id, booking.driver_id) {
            return Err(DomainError::Authorization(
                "booking does not belong to the caller".to_string(),
            ));
        }
        Ok(booking)
    }

    async fn parties(
        &self,
        booking: &Booking,
    ) -> DomainResult<(crate::party::Client, crate::party::Driver)> {
        let client = self
            .clients
            .get(booking.client_id)
            .await?
            .ok_or_else(|| DomainError::Internal("booking client missing".to_string()))?;
        let driver = self
            .drivers
            .get(booking.driver_id)
            .await?
            .ok_or_else(|| DomainError::Internal("booking driver missing".to_string()))?;
        Ok((client, driver))
    }

    async fn view(&self, booking: &Booking) -> DomainResult<BookingView> {
        let (client, driver) = self.parties(booking).await?;
        Ok(BookingView::build(booking, &client, &driver))
    }
}

fn parse_date(s: &str) -> DomainResult<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|_| DomainError::Validation("invalid date, expected YYYY-MM-DD".to_string()))
}

fn parse_time(s: &str) -> DomainResult<NaiveTime> {
    NaiveTime::parse_from_str(s, "%H:%M")
        .map_err(|_| DomainError::Validation("invalid time, expected HH:MM".to_string()))
}

fn parse_schedule(date: &str, time: &str) -> DomainResult<(NaiveDate, NaiveTime)> {
    Ok((parse_date(date)?, parse_time(time)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::{
        MemoryBookingRepository, MemoryClientRepository, MemoryDriverRepository,
    };
    use crate::party::{Client, Driver};
    use crate::repository::{ClientRepository as _, DriverRepository as _};

    struct Fixture {
        service: BookingService,
        client: Client,
        driver: Driver,
    }

    async fn fixture() -> Fixture {
        let clients = Arc::new(MemoryClientRepository::default());
        let drivers = Arc::new(MemoryDriverRepository::default());
        let bookings = Arc::new(MemoryBookingRepository::default());

        let client = Client::new(
            Uuid::new_v4(),
            "Ana Souza".into(),
            "ana@example.com".into(),
            "+55 11 98888-1111".into(),
        );
        clients.insert(&client).await.unwrap();

        let driver = Driver::new(
            Some(Uuid::new_v4()),
            "Carlos Lima".into(),
            "carlos@example.com".into(),
            "+55 11 97777-2222".into(),
            "CNH-123456".into(),
        );
        drivers.insert(&driver).await.unwrap();

        let service = BookingService::new(clients, drivers, bookings, RateTable::default());
        Fixture {
            service,
            client,
            driver,
        }
    }

    fn request(driver_id: Uuid, date: &str, time: &str) -> NewBookingRequest {
        NewBookingRequest {
            driver_id,
            passenger_name: "Ana Souza".into(),
            origin: "GRU Airport".into(),
            destination: "Hotel Mar".into(),
            adults: 2,
            children: 1,
            date: date.into(),
            time: time.into(),
            flight_number: Some("LA3350".into()),
            service_type: ServiceType::Transfer,
            contact_phone: "+55 11 98888-1111".into(),
            payment_method: PaymentMethod::InstantTransfer,
            value_cents: None,
            advance_cents: None,
        }
    }

    #[tokio::test]
    async fn create_booking_starts_pending_with_computed_value() {
        let f = fixture().await;
        let principal = Principal::Client(f.client.clone());

        let view = f
            .service
            .create_booking(&principal, request(f.driver.id, "2025-06-10", "14:00"))
            .await
            .unwrap();

        assert_eq!(view.status, "PENDING");
        // TRANSFER, 2 adults + 1 child.
        assert_eq!(view.value_cents, 37_500);
        assert_eq!(view.driver.name, "Carlos Lima");
    }

    #[tokio::test]
    async fn supplied_value_is_kept_verbatim() {
        let f = fixture().await;
        let principal = Principal::Client(f.client.clone());

        let mut req = request(f.driver.id, "2025-06-10", "14:00");
        req.value_cents = Some(50_000);
        let view = f.service.create_booking(&principal, req).await.unwrap();
        assert_eq!(view.value_cents, 50_000);
    }

    #[tokio::test]
    async fn second_booking_in_window_conflicts() {
        let f = fixture().await;
        let principal = Principal::Client(f.client.clone());

        f.service
            .create_booking(&principal, request(f.driver.id, "2025-06-10", "14:00"))
            .await
            .unwrap();

        let err = f
            .service
            .create_booking(&principal, request(f.driver.id, "2025-06-10", "15:00"))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));

        // Outside the 90-minute window succeeds.
        f.service
            .create_booking(&principal, request(f.driver.id, "2025-06-10", "15:31"))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn principal_without_client_profile_is_rejected() {
        let f = fixture().await;
        let principal = Principal::Driver(f.driver.clone());

        let err = f
            .service
            .create_booking(&principal, request(f.driver.id, "2025-06-10", "14:00"))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[tokio::test]
    async fn inactive_driver_is_not_found() {
        let f = fixture().await;
        let principal = Principal::Client(f.client.clone());

        let mut inactive = Driver::new(
            None,
            "Rui Alves".into(),
            "rui@example.com".into(),
            "+55 11 96666-3333".into(),
            "CNH-654321".into(),
        );
        inactive.active = false;
        f.service.drivers.insert(&inactive).await.unwrap();

        let err = f
            .service
            .create_booking(&principal, request(inactive.id, "2025-06-10", "14:00"))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound(_)));
    }

    #[tokio::test]
    async fn malformed_schedule_is_rejected() {
        let f = fixture().await;
        let principal = Principal::Client(f.client.clone());

        let err = f
            .service
            .create_booking(&principal, request(f.driver.id, "10-06-2025", "14:00"))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));

        let err = f
            .service
            .create_booking(&principal, request(f.driver.id, "2025-06-10", "2pm"))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[tokio::test]
    async fn status_update_follows_the_lifecycle() {
        let f = fixture().await;
        let principal = Principal::Client(f.client.clone());

        let view = f
            .service
            .create_booking(&principal, request(f.driver.id, "2025-06-10", "14:00"))
            .await
            .unwrap();

        let confirmed = f
            .service
            .update_status(&principal, view.id, BookingStatus::Confirmed)
            .await
            .unwrap();
        assert_eq!(confirmed.status, "CONFIRMED");

        // PENDING was left behind; going back is rejected.
        let err = f
            .service
            .update_status(&principal, view.id, BookingStatus::Pending)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));

        let completed = f
            .service
            .update_status(&principal, view.id, BookingStatus::Completed)
            .await
            .unwrap();
        assert_eq!(completed.status, "COMPLETED");

        // Terminal state: nothing else is allowed.
        let err = f
            .service
            .update_status(&principal, view.id, BookingStatus::Cancelled)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }

    #[tokio::test]
    async fn full_update_bypasses_transition_validation() {
        let f = fixture().await;
        let principal = Principal::Client(f.client.clone());

        let view = f
            .service
            .create_booking(&principal, request(f.driver.id, "2025-06-10", "14:00"))
            .await
            .unwrap();

        // PENDING -> COMPLETED is not a lifecycle edge, but the full
        // update path does not consult the validator.
        let updated = f
            .service
            .update_booking(
                &principal,
                view.id,
                UpdateBookingRequest {
                    status: Some(BookingStatus::Completed),
                    destination: Some("Hotel Sol".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.status, "COMPLETED");
        assert_eq!(updated.destination, "Hotel Sol");
        // Value untouched.
        assert_eq!(updated.value_cents, view.value_cents);
    }

    #[tokio::test]
    async fn listing_is_scoped_and_newest_first() {
        let f = fixture().await;
        let principal = Principal::Client(f.client.clone());

        f.service
            .create_booking(&principal, request(f.driver.id, "2025-06-10", "08:00"))
            .await
            .unwrap();
        f.service
            .create_booking(&principal, request(f.driver.id, "2025-06-11", "08:00"))
            .await
            .unwrap();

        let mine = f.service.list_for(&principal).await.unwrap();
        assert_eq!(mine.len(), 2);
        assert_eq!(mine[0].date, "2025-06-11");
        assert_eq!(mine[1].date, "2025-06-10");

        let as_driver = f
            .service
            .list_for(&Principal::Driver(f.driver.clone()))
            .await
            .unwrap();
        assert_eq!(as_driver.len(), 2);

        let as_staff = f
            .service
            .list_for(&Principal::Staff {
                user_id: Uuid::new_v4(),
            })
            .await
            .unwrap();
        assert_eq!(as_staff.len(), 2);

        let err = f.service.list_for(&Principal::Anonymous).await.unwrap_err();
        assert!(matches!(err, DomainError::Authorization(_)));
    }

    #[tokio::test]
    async fn voucher_requires_ownership() {
        let f = fixture().await;
        let principal = Principal::Client(f.client.clone());

        let mut req = request(f.driver.id, "2025-06-10", "14:00");
        req.advance_cents = Some(10_000);
        let view = f.service.create_booking(&principal, req).await.unwrap();

        let voucher = f.service.voucher(&principal, view.id).await.unwrap();
        assert_eq!(voucher.balance_cents, 27_500);

        let stranger = Principal::Client(Client::new(
            Uuid::new_v4(),
            "Beto Dias".into(),
            "beto@example.com".into(),
            "+55 11 95555-4444".into(),
        ));
        let err = f.service.voucher(&stranger, view.id).await.unwrap_err();
        assert!(matches!(err, DomainError::Authorization(_)));
    }

    #[tokio::test]
    async fn concurrent_requests_for_same_slot_create_one_booking() {
        let f = fixture().await;
        let service = Arc::new(f.service);
        let principal = Principal::Client(f.client.clone());
        let driver_id = f.driver.id;

        let mut handles = Vec::new();
        for _ in 0..4 {
            let service = service.clone();
            let principal = principal.clone();
            handles.push(tokio::spawn(async move {
                service
                    .create_booking(&principal, request(driver_id, "2025-06-10", "14:00"))
                    .await
            }));
        }

        let mut created = 0;
        let mut conflicts = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => created += 1,
                Err(DomainError::Conflict(_)) => conflicts += 1,
                Err(other) => panic!("unexpected error: {other}"),
            }
        }
        assert_eq!(created, 1);
        assert_eq!(conflicts, 3);
    }
}
