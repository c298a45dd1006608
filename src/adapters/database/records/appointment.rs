use crate::domain::appointment::{Appointment, AppointmentDetails, AppointmentStatus};
use time::OffsetDateTime;

#[derive(Debug, sqlx::FromRow)]
pub struct AppointmentRecord {
    pub(crate) id: i64,
    pub(crate) user_id: i64,
    pub(crate) case_worker_id: i64,
    pub(crate) scheduled_at: OffsetDateTime,
    pub(crate) duration_minutes: i32,
    pub(crate) location: String,
    pub(crate) purpose: Option<String>,
    pub(crate) notes: Option<String>,
    pub(crate) status: AppointmentStatus,
    pub(crate) created_at: OffsetDateTime,
    pub(crate) updated_at: OffsetDateTime,
}

impl From<AppointmentRecord> for Appointment {
    fn from(record: AppointmentRecord) -> Self {
        Self {
            id: record.id,
            user_id: record.user_id,
            case_worker_id: record.case_worker_id,
            details: AppointmentDetails {
                scheduled_at: record.scheduled_at,
                duration_minutes: record.duration_minutes,
                location: record.location,
                purpose: record.purpose,
                notes: record.notes,
                status: record.status,
            },
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}
