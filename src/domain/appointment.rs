use crate::domain::validation::{ValidationError, optional, require_len};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

pub const DEFAULT_DURATION_MINUTES: i32 = 60;
pub const UNDETERMINED_LOCATION: &str = "To be determined";

/// Appointment lifecycle. Any status may be set from any other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "appointment_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    #[default]
    Scheduled,
    Completed,
    Cancelled,
    NoShow,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Appointment {
    pub id: i64,
    pub user_id: i64,
    pub case_worker_id: i64,
    pub details: AppointmentDetails,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppointmentDetails {
    pub scheduled_at: OffsetDateTime,
    pub duration_minutes: i32,
    pub location: String,
    pub purpose: Option<String>,
    pub notes: Option<String>,
    pub status: AppointmentStatus,
}

impl AppointmentDetails {
    /// # Errors
    /// Returns the first `ValidationError` found.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !(1..=480).contains(&self.duration_minutes) {
            return Err(ValidationError::Range {
                field: "durationMinutes",
                reason: format!("{} not in 1..=480", self.duration_minutes),
            });
        }
        require_len("location", &self.location, 1, 300)?;
        optional(self.purpose.as_deref(), |p| require_len("purpose", p, 1, 500))?;
        optional(self.notes.as_deref(), |n| require_len("notes", n, 0, 5000))?;
        Ok(())
    }
}

/// Picks the stored location for a new appointment: the requested one when
/// given, else the case worker's office, else a placeholder.
#[must_use]
pub fn default_location(requested: Option<&str>, office_location: Option<&str>) -> String {
    requested
        .filter(|l| !l.trim().is_empty())
        .or_else(|| office_location.filter(|l| !l.trim().is_empty()))
        .unwrap_or(UNDETERMINED_LOCATION)
        .to_string()
}

#[derive(Debug, Clone, Copy, Default)]
pub struct AppointmentFilter {
    pub user_id: Option<i64>,
    pub case_worker_id: Option<i64>,
    pub status: Option<AppointmentStatus>,
}
