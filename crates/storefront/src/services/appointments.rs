//! Eye exam booking.

use chrono::NaiveDate;
use thiserror::Error;
use tracing::instrument;

use prime_optic_core::{AppointmentId, Email, UserId};

use crate::backend::{AppointmentRepository, BackendError};
use crate::locations::find_location;
use crate::models::{AppointmentRequest, NewAppointment, TimeSlot};

pub const BOOKED_MESSAGE: &str =
    "Your appointment request has been received. We'll call you to confirm it.";

/// A booking form that cannot be submitted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BookingError {
    #[error("Please fill in the {0} field.")]
    MissingField(&'static str),

    #[error("Please enter a valid email address.")]
    InvalidEmail,

    #[error("Please choose a date in the format YYYY-MM-DD.")]
    InvalidDate,

    #[error("Please choose one of the available time slots.")]
    InvalidTimeSlot,

    #[error("{0} is not taking appointments at the moment. Please choose another store.")]
    StoreUnavailable(&'static str),
}

fn required(value: &str, field: &'static str) -> Result<String, BookingError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(BookingError::MissingField(field));
    }
    Ok(value.to_string())
}

/// Preferred store as stored: a known shop's name, or the visitor's own
/// wording when it names no shop.
fn preferred_store(value: Option<&str>) -> Result<String, BookingError> {
    let value = value.map(str::trim).unwrap_or_default();
    match find_location(value) {
        Some(store) if !store.is_available => Err(BookingError::StoreUnavailable(store.name)),
        Some(store) => Ok(store.name.to_string()),
        None => Ok(value.to_string()),
    }
}

/// Check a booking form and turn it into an appointment payload.
///
/// Name, email, phone, date and time slot are required. Store and notes
/// default to empty strings. A store given by id or name is stored under its
/// directory name and must be open for bookings.
///
/// # Errors
///
/// Returns the first problem found.
pub fn validate(
    request: AppointmentRequest,
    user_id: Option<UserId>,
) -> Result<NewAppointment, BookingError> {
    let full_name = required(&request.full_name, "full name")?;
    let email = required(&request.email, "email")?;
    let phone = required(&request.phone, "phone")?;
    let preferred_date = required(&request.preferred_date, "preferred date")?;
    let slot = required(&request.preferred_time_slot, "preferred time")?;

    Email::parse(&email).map_err(|_| BookingError::InvalidEmail)?;
    NaiveDate::parse_from_str(&preferred_date, "%Y-%m-%d").map_err(|_| BookingError::InvalidDate)?;
    let preferred_time_slot: TimeSlot = slot.parse().map_err(|_| BookingError::InvalidTimeSlot)?;
    let preferred_store = preferred_store(request.preferred_store.as_deref())?;

    Ok(NewAppointment {
        user_id,
        full_name,
        email,
        phone,
        preferred_store,
        preferred_date,
        preferred_time_slot,
        notes: request.notes.unwrap_or_default(),
    })
}

/// # Errors
///
/// Returns the repository's error.
#[instrument(skip(appointments, appointment), fields(date = %appointment.preferred_date))]
pub async fn book(
    appointments: &dyn AppointmentRepository,
    appointment: &NewAppointment,
) -> Result<AppointmentId, BackendError> {
    let id = appointments.create(appointment).await?;
    tracing::info!(appointment_id = %id, "Appointment booked");
    Ok(id)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::backend::memory::MemoryBackend;

    fn request() -> AppointmentRequest {
        AppointmentRequest {
            full_name: "Elira Berisha".to_string(),
            email: "elira@example.com".to_string(),
            phone: "0681112233".to_string(),
            preferred_store: None,
            preferred_date: "2026-11-03".to_string(),
            preferred_time_slot: "11-13".to_string(),
            notes: None,
        }
    }

    #[test]
    fn test_validate_fills_optional_fields() {
        let appointment = validate(request(), None).unwrap();
        assert_eq!(appointment.preferred_time_slot, TimeSlot::Midday);
        assert_eq!(appointment.preferred_store, "");
        assert_eq!(appointment.notes, "");
        assert!(appointment.user_id.is_none());
    }

    #[test]
    fn test_validate_rejects_missing_and_invalid_fields() {
        let missing_phone = AppointmentRequest {
            phone: " ".to_string(),
            ..request()
        };
        assert_eq!(
            validate(missing_phone, None),
            Err(BookingError::MissingField("phone"))
        );

        let bad_slot = AppointmentRequest {
            preferred_time_slot: "20-22".to_string(),
            ..request()
        };
        assert_eq!(validate(bad_slot, None), Err(BookingError::InvalidTimeSlot));

        let bad_date = AppointmentRequest {
            preferred_date: "next tuesday".to_string(),
            ..request()
        };
        assert_eq!(validate(bad_date, None), Err(BookingError::InvalidDate));
    }

    #[test]
    fn test_preferred_store_matches_directory() {
        let by_id = AppointmentRequest {
            preferred_store: Some("1".to_string()),
            ..request()
        };
        assert_eq!(
            validate(by_id, None).unwrap().preferred_store,
            "Prime Optic - City Center"
        );

        let free_text = AppointmentRequest {
            preferred_store: Some("  near the university ".to_string()),
            ..request()
        };
        assert_eq!(validate(free_text, None).unwrap().preferred_store, "near the university");

        let closed = AppointmentRequest {
            preferred_store: Some("Prime Optic - Airport Road".to_string()),
            ..request()
        };
        assert_eq!(
            validate(closed, None),
            Err(BookingError::StoreUnavailable("Prime Optic - Airport Road"))
        );
    }

    #[tokio::test]
    async fn test_book_stores_for_user() {
        let backend = MemoryBackend::new();
        let user = UserId::new("u1");
        let appointment = validate(request(), Some(user.clone())).unwrap();
        book(&backend, &appointment).await.unwrap();

        let stored = AppointmentRepository::query_by_user(&backend, &user).await.unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored.first().map(|a| a.details.full_name.as_str()), Some("Elira Berisha"));
    }
}
