//! Eye exam appointment types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use prime_optic_core::{AppointmentId, AppointmentStatus, UserId};

/// Two-hour booking windows offered for eye exams.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimeSlot {
    #[serde(rename = "09-11")]
    Morning,
    #[serde(rename = "11-13")]
    Midday,
    #[serde(rename = "14-16")]
    Afternoon,
    #[serde(rename = "16-18")]
    Evening,
}

impl TimeSlot {
    pub const ALL: [Self; 4] = [Self::Morning, Self::Midday, Self::Afternoon, Self::Evening];

    /// Stored slot code, e.g. `09-11`.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Morning => "09-11",
            Self::Midday => "11-13",
            Self::Afternoon => "14-16",
            Self::Evening => "16-18",
        }
    }
}

impl std::str::FromStr for TimeSlot {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|slot| slot.code() == s)
            .ok_or_else(|| format!("unknown time slot: {s}"))
    }
}

/// Render a stored slot code for display: `09-11` becomes `09:00 – 11:00`.
///
/// Values that already contain a colon, or no dash, are returned unchanged.
#[must_use]
pub fn format_time_slot(slot: &str) -> String {
    if slot.contains(':') {
        return slot.to_string();
    }
    match slot.split_once('-') {
        Some((start, end)) => format!("{start}:00 – {end}:00"),
        None => slot.to_string(),
    }
}

/// Booking form as submitted by the visitor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentRequest {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    #[serde(default)]
    pub preferred_store: Option<String>,
    pub preferred_date: String,
    pub preferred_time_slot: String,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Appointment payload handed to the appointment repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAppointment {
    /// `null` for guest bookings.
    pub user_id: Option<UserId>,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub preferred_store: String,
    pub preferred_date: String,
    pub preferred_time_slot: TimeSlot,
    pub notes: String,
}

/// A stored appointment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub id: AppointmentId,
    #[serde(flatten)]
    pub details: NewAppointment,
    #[serde(default)]
    pub status: AppointmentStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Appointment {
    /// Display form of the booked slot.
    #[must_use]
    pub fn time_label(&self) -> String {
        format_time_slot(self.details.preferred_time_slot.code())
    }
}
