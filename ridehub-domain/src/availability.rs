use chrono::{Duration, NaiveDateTime};

use crate::booking::Booking;

/// Minimum gap between two bookings on the same driver's schedule.
pub const MIN_GAP_MINUTES: i64 = 90;

/// Decide whether a driver is free at `candidate`.
///
/// Only active bookings (PENDING or CONFIRMED) block; each one forbids
/// the window `[scheduled - 90min, scheduled + 90min]`, both ends
/// inclusive. The scan is exhaustive and commutative, and comparisons
/// are against full timestamps so windows crossing midnight behave
/// correctly.
pub fn is_available(existing: &[Booking], candidate: NaiveDateTime) -> bool {
    let gap = Duration::minutes(MIN_GAP_MINUTES);

    for booking in existing {
        if !booking.status.is_active() {
            continue;
        }
        let scheduled = booking.scheduled_at();
        let window_start = scheduled - gap;
        let window_end = scheduled + gap;
        if candidate >= window_start && candidate <= window_end {
            return false;
        }
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::booking::{BookingStatus, PaymentMethod, ServiceType};
    use chrono::{NaiveDate, NaiveTime, Utc};
    use uuid::Uuid;

    fn booking_at(date: &str, time: &str, status: BookingStatus) -> Booking {
        let now = Utc::now();
        Booking {
            id: Uuid::new_v4(),
            client_id: Uuid::new_v4(),
            driver_id: Uuid::new_v4(),
            passenger_name: "Ana Souza".into(),
            origin: "Airport".into(),
            destination: "Hotel Mar".into(),
            adults: 1,
            children: 0,
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            time: NaiveTime::parse_from_str(time, "%H:%M").unwrap(),
            flight_number: None,
            service_type: ServiceType::Transfer,
            contact_phone: "+55 11 99999-0000".into(),
            value_cents: 15_000,
            payment_method: PaymentMethod::InstantTransfer,
            advance_cents: 0,
            status,
            created_at: now,
            updated_at: now,
        }
    }

    fn at(date: &str, time: &str) -> NaiveDateTime {
        NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .unwrap()
            .and_time(NaiveTime::parse_from_str(time, "%H:%M").unwrap())
    }

    #[test]
    fn active_booking_blocks_same_slot() {
        let existing = vec![booking_at("2025-06-10", "14:00", BookingStatus::Pending)];
        assert!(!is_available(&existing, at("2025-06-10", "14:00")));
    }

    #[test]
    fn confirmed_booking_blocks_nearby_slot() {
        let existing = vec![booking_at("2025-06-10", "14:00", BookingStatus::Confirmed)];
        assert!(!is_available(&existing, at("2025-06-10", "15:00")));
        assert!(!is_available(&existing, at("2025-06-10", "13:00")));
    }

    #[test]
    fn cancelled_and_completed_never_block() {
        let existing = vec![
            booking_at("2025-06-10", "14:00", BookingStatus::Cancelled),
            booking_at("2025-06-10", "14:00", BookingStatus::Completed),
        ];
        assert!(is_available(&existing, at("2025-06-10", "14:00")));
    }

    #[test]
    fn boundary_is_inclusive() {
        let existing = vec![booking_at("2025-06-10", "14:00", BookingStatus::Pending)];
        // Exactly 90 minutes away is still rejected.
        assert!(!is_available(&existing, at("2025-06-10", "15:30")));
        assert!(!is_available(&existing, at("2025-06-10", "12:30")));
        // One minute past the window is accepted.
        assert!(is_available(&existing, at("2025-06-10", "15:31")));
        assert!(is_available(&existing, at("2025-06-10", "12:29")));
    }

    #[test]
    fn window_crosses_midnight() {
        let existing = vec![booking_at("2025-06-10", "23:30", BookingStatus::Confirmed)];
        // 00:30 next day is 60 minutes after the booking.
        assert!(!is_available(&existing, at("2025-06-11", "00:30")));
        assert!(is_available(&existing, at("2025-06-11", "01:01")));
    }

    #[test]
    fn any_conflicting_booking_rejects() {
        let existing = vec![
            booking_at("2025-06-10", "08:00", BookingStatus::Completed),
            booking_at("2025-06-10", "18:00", BookingStatus::Confirmed),
        ];
        assert!(is_available(&existing, at("2025-06-10", "08:30")));
        assert!(!is_available(&existing, at("2025-06-10", "17:00")));
    }

    #[test]
    fn no_bookings_means_available() {
        assert!(is_available(&[], at("2025-06-10", "14:00")));
    }
}
