use crate::domain::models::booking::{BookingStatus, PaymentStatus};

pub mod postgres_booking_repo;
pub mod sqlite_booking_repo;

/// Renders a status set as quoted SQL literals for an IN clause. Safe to
/// inline: the values come from a closed enum, never from user input.
pub(crate) fn status_set(statuses: &[BookingStatus]) -> String {
    statuses
        .iter()
        .map(|s| format!("'{}'", s.as_str()))
        .collect::<Vec<_>>()
        .join(", ")
}

pub(crate) fn payment_set(statuses: &[PaymentStatus]) -> String {
    statuses
        .iter()
        .map(|s| format!("'{}'", s.as_str()))
        .collect::<Vec<_>>()
        .join(", ")
}
