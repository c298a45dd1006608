use crate::api::schemas::double_option;
use crate::domain::appointment::{Appointment, AppointmentDetails, AppointmentFilter, AppointmentStatus};
use crate::services::appointment_service::NewAppointment;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentResponse {
    pub id: i64,
    pub user_id: i64,
    pub case_worker_id: i64,
    #[serde(with = "time::serde::rfc3339")]
    pub scheduled_at: OffsetDateTime,
    pub duration_minutes: i32,
    pub location: String,
    pub purpose: Option<String>,
    pub notes: Option<String>,
    pub status: AppointmentStatus,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl From<Appointment> for AppointmentResponse {
    fn from(a: Appointment) -> Self {
        let d = a.details;
        Self {
            id: a.id,
            user_id: a.user_id,
            case_worker_id: a.case_worker_id,
            scheduled_at: d.scheduled_at,
            duration_minutes: d.duration_minutes,
            location: d.location,
            purpose: d.purpose,
            notes: d.notes,
            status: d.status,
            created_at: a.created_at,
            updated_at: a.updated_at,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateAppointment {
    pub user_id: Option<i64>,
    pub case_worker_id: i64,
    #[serde(with = "time::serde::rfc3339")]
    pub scheduled_at: OffsetDateTime,
    pub duration_minutes: Option<i32>,
    pub location: Option<String>,
    pub purpose: Option<String>,
    pub notes: Option<String>,
}

impl From<CreateAppointment> for NewAppointment {
    fn from(r: CreateAppointment) -> Self {
        Self {
            user_id: r.user_id,
            case_worker_id: r.case_worker_id,
            scheduled_at: r.scheduled_at,
            duration_minutes: r.duration_minutes,
            location: r.location,
            purpose: r.purpose,
            notes: r.notes,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateAppointment {
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub scheduled_at: Option<OffsetDateTime>,
    pub duration_minutes: Option<i32>,
    pub location: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub purpose: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub notes: Option<Option<String>>,
    pub status: Option<AppointmentStatus>,
}

impl UpdateAppointment {
    pub fn apply(self, d: &mut AppointmentDetails) {
        if let Some(v) = self.scheduled_at {
            d.scheduled_at = v;
        }
        if let Some(v) = self.duration_minutes {
            d.duration_minutes = v;
        }
        if let Some(v) = self.location {
            d.location = v;
        }
        if let Some(v) = self.purpose {
            d.purpose = v;
        }
        if let Some(v) = self.notes {
            d.notes = v;
        }
        if let Some(v) = self.status {
            d.status = v;
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentQuery {
    pub case_worker_id: Option<i64>,
    pub status: Option<AppointmentStatus>,
}

impl From<AppointmentQuery> for AppointmentFilter {
    fn from(q: AppointmentQuery) -> Self {
        Self { user_id: None, case_worker_id: q.case_worker_id, status: q.status }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_change_from_any_status() {
        let mut details = AppointmentDetails {
            scheduled_at: OffsetDateTime::UNIX_EPOCH,
            duration_minutes: 60,
            location: "Room 4".into(),
            purpose: Some("Intake".into()),
            notes: None,
            status: AppointmentStatus::Cancelled,
        };

        let patch: UpdateAppointment = serde_json::from_str(r#"{"status": "scheduled", "purpose": null}"#).unwrap();
        patch.apply(&mut details);

        assert_eq!(details.status, AppointmentStatus::Scheduled);
        assert_eq!(details.purpose, None);
        assert_eq!(details.location, "Room 4");
    }

    #[test]
    fn test_create_appointment_parses_rfc3339() {
        let body = r#"{"caseWorkerId": 3, "scheduledAt": "2026-03-01T15:30:00Z"}"#;
        let request: NewAppointment = serde_json::from_str::<CreateAppointment>(body).unwrap().into();

        assert_eq!(request.case_worker_id, 3);
        assert_eq!(request.scheduled_at.hour(), 15);
        assert_eq!(request.location, None);
    }
}
