use serde::Serialize;
use uuid::Uuid;

use crate::booking::Booking;
use crate::party::{Client, Driver};

#[derive(Debug, Clone, Serialize)]
pub struct ClientSummary {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct DriverSummary {
    pub id: Uuid,
    pub name: String,
}

/// The booking shape returned by the API, with the client and driver
/// denormalized and the schedule pre-formatted.
#[derive(Debug, Serialize)]
pub struct BookingView {
    pub id: Uuid,
    pub client: ClientSummary,
    pub driver: DriverSummary,
    pub passenger_name: String,
    pub origin: String,
    pub destination: String,
    pub adults: i32,
    pub children: i32,
    pub date: String,
    pub time: String,
    pub flight_number: Option<String>,
    pub service_type: &'static str,
    pub contact_phone: String,
    pub payment_method: &'static str,
    pub value_cents: i64,
    pub advance_cents: i64,
    pub status: &'static str,
}

impl BookingView {
    pub fn build(booking: &Booking, client: &Client, driver: &Driver) -> Self {
        Self {
            id: booking.id,
            client: ClientSummary {
                id: client.id,
                name: client.name.clone(),
                email: client.email.clone(),
                phone: client.phone.clone(),
            },
            driver: DriverSummary {
                id: driver.id,
                name: driver.name.clone(),
            },
            passenger_name: booking.passenger_name.clone(),
            origin: booking.origin.clone(),
            destination: booking.destination.clone(),
            adults: booking.adults,
            children: booking.children,
            date: booking.date.format("%Y-%m-%d").to_string(),
            time: booking.time.format("%H:%M").to_string(),
            flight_number: booking.flight_number.clone(),
            service_type: booking.service_type.as_str(),
            contact_phone: booking.contact_phone.clone(),
            payment_method: booking.payment_method.as_str(),
            value_cents: booking.value_cents,
            advance_cents: booking.advance_cents,
            status: booking.status.as_str(),
        }
    }
}

/// Read-only denormalized projection of a booking for display or
/// printing. Pure projection, nothing is persisted.
#[derive(Debug, Serialize)]
pub struct Voucher {
    pub booking_id: Uuid,
    pub client_name: String,
    pub driver_name: String,
    pub passenger_name: String,
    pub origin: String,
    pub destination: String,
    pub adults: i32,
    pub children: i32,
    pub date: String,
    pub time: String,
    pub flight_number: Option<String>,
    pub service_type: &'static str,
    pub contact_phone: String,
    pub payment_method: &'static str,
    pub payment_method_display: &'static str,
    pub value_cents: i64,
    pub advance_cents: i64,
    pub balance_cents: i64,
    pub status: &'static str,
}

impl Voucher {
    pub fn build(booking: &Booking, client: &Client, driver: &Driver) -> Self {
        Self {
            booking_id: booking.id,
            client_name: client.name.clone(),
            driver_name: driver.name.clone(),
            passenger_name: booking.passenger_name.clone(),
            origin: booking.origin.clone(),
            destination: booking.destination.clone(),
            adults: booking.adults,
            children: booking.children,
            // Print layout uses day-first dates.
            date: booking.date.format("%d/%m/%Y").to_string(),
            time: booking.time.format("%H:%M").to_string(),
            flight_number: booking.flight_number.clone(),
            service_type: booking.service_type.as_str(),
            contact_phone: booking.contact_phone.clone(),
            payment_method: booking.payment_method.as_str(),
            payment_method_display: booking.payment_method.label(),
            value_cents: booking.value_cents,
            advance_cents: booking.advance_cents,
            balance_cents: booking.value_cents - booking.advance_cents,
            status: booking.status.as_str(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::booking::{BookingStatus, PaymentMethod, ServiceType};
    use chrono::{NaiveDate, NaiveTime, Utc};

    fn sample() -> (Booking, Client, Driver) {
        let client = Client::new(
            Uuid::new_v4(),
            "Ana Souza".into(),
            "ana@example.com".into(),
            "+55 11 98888-1111".into(),
        );
        let driver = Driver::new(
            None,
            "Carlos Lima".into(),
            "carlos@example.com".into(),
            "+55 11 97777-2222".into(),
            "CNH-123456".into(),
        );
        let now = Utc::now();
        let booking = Booking {
            id: Uuid::new_v4(),
            client_id: client.id,
            driver_id: driver.id,
            passenger_name: "Ana Souza".into(),
            origin: "GRU Airport".into(),
            destination: "Hotel Mar".into(),
            adults: 2,
            children: 1,
            date: NaiveDate::from_ymd_opt(2025, 6, 10).unwrap(),
            time: NaiveTime::from_hms_opt(14, 0, 0).unwrap(),
            flight_number: Some("LA3350".into()),
            service_type: ServiceType::Transfer,
            contact_phone: "+55 11 98888-1111".into(),
            value_cents: 37_500,
            payment_method: PaymentMethod::CreditCard,
            advance_cents: 10_000,
            status: BookingStatus::Confirmed,
            created_at: now,
            updated_at: now,
        };
        (booking, client, driver)
    }

    #[test]
    fn voucher_balance_is_value_minus_advance() {
        let (booking, client, driver) = sample();
        let voucher = Voucher::build(&booking, &client, &driver);
        assert_eq!(voucher.balance_cents, 27_500);
        assert_eq!(voucher.client_name, "Ana Souza");
        assert_eq!(voucher.driver_name, "Carlos Lima");
        assert_eq!(voucher.payment_method_display, "Credit card");
    }

    #[test]
    fn voucher_uses_day_first_date() {
        let (booking, client, driver) = sample();
        let voucher = Voucher::build(&booking, &client, &driver);
        assert_eq!(voucher.date, "10/06/2025");
        assert_eq!(voucher.time, "14:00");
    }

    #[test]
    fn booking_view_keeps_iso_date() {
        let (booking, client, driver) = sample();
        let view = BookingView::build(&booking, &client, &driver);
        assert_eq!(view.date, "2025-06-10");
        assert_eq!(view.driver.name, "Carlos Lima");
        assert_eq!(view.status, "CONFIRMED");
    }
}
