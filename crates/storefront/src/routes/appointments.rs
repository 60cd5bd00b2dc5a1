//! Eye exam booking route handlers.

use axum::{Json, extract::State, http::StatusCode};
use serde::Serialize;
use tracing::instrument;

use prime_optic_core::AppointmentId;

use crate::error::Result;
use crate::middleware::OptionalAuth;
use crate::models::{AppointmentRequest, TimeSlot, format_time_slot};
use crate::services::{Notification, appointments};
use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentBooked {
    pub appointment_id: AppointmentId,
    pub notification: Notification,
}

#[derive(Debug, Serialize)]
pub struct SlotView {
    pub code: &'static str,
    pub label: String,
}

/// Bookable time slots.
pub async fn slots() -> Json<Vec<SlotView>> {
    Json(
        TimeSlot::ALL
            .iter()
            .map(|slot| SlotView {
                code: slot.code(),
                label: format_time_slot(slot.code()),
            })
            .collect(),
    )
}

/// Book an appointment. Guests may book; signed-in users get it linked to
/// their account.
#[instrument(skip(state, user, request))]
pub async fn create(
    State(state): State<AppState>,
    OptionalAuth(user): OptionalAuth,
    Json(request): Json<AppointmentRequest>,
) -> Result<(StatusCode, Json<AppointmentBooked>)> {
    let appointment = appointments::validate(request, user.map(|user| user.id))?;
    let appointment_id =
        appointments::book(state.backend().appointments.as_ref(), &appointment).await?;

    Ok((
        StatusCode::CREATED,
        Json(AppointmentBooked {
            appointment_id,
            notification: Notification::success(appointments::BOOKED_MESSAGE),
        }),
    ))
}
