//! Account pages: the signed-in user's orders and appointments.

use axum::{Json, extract::State};
use serde::Serialize;

use crate::error::Result;
use crate::middleware::RequireAuth;
use crate::models::{Appointment, Order};
use crate::state::AppState;

/// Order history, newest first.
pub async fn orders(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<Vec<Order>>> {
    let orders = state.backend().orders.query_by_user(&user.id).await?;
    Ok(Json(orders))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentView {
    #[serde(flatten)]
    pub appointment: Appointment,
    /// Slot in display form, e.g. `09:00 – 11:00`.
    pub time_label: String,
}

pub async fn appointments(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<Vec<AppointmentView>>> {
    let appointments = state
        .backend()
        .appointments
        .query_by_user(&user.id)
        .await?;

    Ok(Json(
        appointments
            .into_iter()
            .map(|appointment| AppointmentView {
                time_label: appointment.time_label(),
                appointment,
            })
            .collect(),
    ))
}
