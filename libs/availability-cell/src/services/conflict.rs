use chrono::{DateTime, Duration, Utc};

use crate::models::ExistingAppointment;

/// Whether a slot starting at `slot` and lasting `duration_minutes` overlaps `booking`.
///
/// Both intervals are half-open, so back-to-back appointments do not collide: a slot may start
/// exactly when a booking ends, or end exactly when one starts.
pub fn collides(slot: DateTime<Utc>, duration_minutes: i64, booking: &ExistingAppointment) -> bool {
    let slot_end = slot + Duration::minutes(duration_minutes);
    slot < booking.end() && booking.start < slot_end
}

/// Drop every candidate whose occupied interval overlaps any booking.
pub fn filter_available(
    candidates: Vec<DateTime<Utc>>,
    duration_minutes: i64,
    bookings: &[ExistingAppointment],
) -> Vec<DateTime<Utc>> {
    candidates
        .into_iter()
        .filter(|slot| {
            !bookings
                .iter()
                .any(|booking| collides(*slot, duration_minutes, booking))
        })
        .collect()
}
