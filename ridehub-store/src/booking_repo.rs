use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use ridehub_domain::booking::{Booking, BookingStatus, PaymentMethod, ServiceType};
use ridehub_domain::repository::{BookingRepository, RepoError};

pub struct PgBookingRepository {
    pool: PgPool,
}

impl PgBookingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const BOOKING_COLUMNS: &str = "id, client_id, driver_id, passenger_name, origin, destination, \
     adults, children, date, time, flight_number, service_type, contact_phone, \
     value_cents, payment_method, advance_cents, status, created_at, updated_at";

#[derive(sqlx::FromRow)]
struct BookingRow {
    id: Uuid,
    client_id: Uuid,
    driver_id: Uuid,
    passenger_name: String,
    origin: String,
    destination: String,
    adults: i32,
    children: i32,
    date: NaiveDate,
    time: NaiveTime,
    flight_number: Option<String>,
    service_type: String,
    contact_phone: String,
    value_cents: i64,
    payment_method: String,
    advance_cents: i64,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl BookingRow {
    fn into_booking(self) -> Result<Booking, RepoError> {
        let service_type = ServiceType::parse(&self.service_type)
            .ok_or_else(|| format!("unknown service type: {}", self.service_type))?;
        let payment_method = PaymentMethod::parse(&self.payment_method)
            .ok_or_else(|| format!("unknown payment method: {}", self.payment_method))?;
        let status = BookingStatus::parse(&self.status)
            .ok_or_else(|| format!("unknown booking status: {}", self.status))?;

        Ok(Booking {
            id: self.id,
            client_id: self.client_id,
            driver_id: self.driver_id,
            passenger_name: self.passenger_name,
            origin: self.origin,
            destination: self.destination,
            adults: self.adults,
            children: self.children,
            date: self.date,
            time: self.time,
            flight_number: self.flight_number,
            service_type,
            contact_phone: self.contact_phone,
            value_cents: self.value_cents,
            payment_method,
            advance_cents: self.advance_cents,
            status,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

fn into_bookings(rows: Vec<BookingRow>) -> Result<Vec<Booking>, RepoError> {
    rows.into_iter().map(BookingRow::into_booking).collect()
}

#[async_trait]
impl BookingRepository for PgBookingRepository {
    async fn insert(&self, booking: &Booking) -> Result<(), RepoError> {
        sqlx::query(
            r#"
            INSERT INTO bookings (id, client_id, driver_id, passenger_name, origin, destination,
                adults, children, date, time, flight_number, service_type, contact_phone,
                value_cents, payment_method, advance_cents, status, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, $19)
            "#,
        )
        .bind(booking.id)
        .bind(booking.client_id)
        .bind(booking.driver_id)
        .bind(&booking.passenger_name)
        .bind(&booking.origin)
        .bind(&booking.destination)
        .bind(booking.adults)
        .bind(booking.children)
        .bind(booking.date)
        .bind(booking.time)
        .bind(&booking.flight_number)
        .bind(booking.service_type.as_str())
        .bind(&booking.contact_phone)
        .bind(booking.value_cents)
        .bind(booking.payment_method.as_str())
        .bind(booking.advance_cents)
        .bind(booking.status.as_str())
        .bind(booking.created_at)
        .bind(booking.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn get(&self, id: Uuid) -> Result<Option<Booking>, RepoError> {
        let row = sqlx::query_as::<_, BookingRow>(&format!(
            "SELECT {BOOKING_COLUMNS} FROM bookings WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(BookingRow::into_booking).transpose()
    }

    async fn list_all(&self) -> Result<Vec<Booking>, RepoError> {
        let rows = sqlx::query_as::<_, BookingRow>(&format!(
            "SELECT {BOOKING_COLUMNS} FROM bookings ORDER BY date DESC, time DESC"
        ))
        .fetch_all(&self.pool)
        .await?;
        into_bookings(rows)
    }

    async fn list_by_client(&self, client_id: Uuid) -> Result<Vec<Booking>, RepoError> {
        let rows = sqlx::query_as::<_, BookingRow>(&format!(
            "SELECT {BOOKING_COLUMNS} FROM bookings WHERE client_id = $1 ORDER BY date DESC, time DESC"
        ))
        .bind(client_id)
        .fetch_all(&self.pool)
        .await?;
        into_bookings(rows)
    }

    async fn list_by_driver(&self, driver_id: Uuid) -> Result<Vec<Booking>, RepoError> {
        let rows = sqlx::query_as::<_, BookingRow>(&format!(
            "SELECT {BOOKING_COLUMNS} FROM bookings WHERE driver_id = $1 ORDER BY date DESC, time DESC"
        ))
        .bind(driver_id)
        .fetch_all(&self.pool)
        .await?;
        into_bookings(rows)
    }

    async fn active_for_driver(&self, driver_id: Uuid) -> Result<Vec<Booking>, RepoError> {
        let rows = sqlx::query_as::<_, BookingRow>(&format!(
            "SELECT {BOOKING_COLUMNS} FROM bookings \
             WHERE driver_id = $1 AND status IN ('PENDING', 'CONFIRMED') \
             ORDER BY date, time"
        ))
        .bind(driver_id)
        .fetch_all(&self.pool)
        .await?;
        into_bookings(rows)
    }

    async fn update_status(&self, id: Uuid, status: BookingStatus) -> Result<(), RepoError> {
        let result = sqlx::query("UPDATE bookings SET status = $1, updated_at = NOW() WHERE id = $2")
            .bind(status.as_str())
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err("booking not found".into());
        }
        Ok(())
    }

    async fn update(&self, booking: &Booking) -> Result<(), RepoError> {
        let result = sqlx::query(
            r#"
            UPDATE bookings
            SET passenger_name = $1, origin = $2, destination = $3, adults = $4,
                children = $5, date = $6, time = $7, flight_number = $8,
                service_type = $9, contact_phone = $10, value_cents = $11,
                payment_method = $12, advance_cents = $13, status = $14,
                updated_at = NOW()
            WHERE id = $15
            "#,
        )
        .bind(&booking.passenger_name)
        .bind(&booking.origin)
        .bind(&booking.destination)
        .bind(booking.adults)
        .bind(booking.children)
        .bind(booking.date)
        .bind(booking.time)
        .bind(&booking.flight_number)
        .bind(booking.service_type.as_str())
        .bind(&booking.contact_phone)
        .bind(booking.value_cents)
        .bind(booking.payment_method.as_str())
        .bind(booking.advance_cents)
        .bind(booking.status.as_str())
        .bind(booking.id)
        .execute(&self.pool)
        .await?;
        if result.rows_affected() == 0 {
            return Err("booking not found".into());
        }
        Ok(())
    }
}
