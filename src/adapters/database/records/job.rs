use crate::domain::job::{Job, JobDetails, JobType};
use crate::domain::requirements::Requirements;
use sqlx::types::Json;
use time::OffsetDateTime;

#[derive(Debug, sqlx::FromRow)]
pub struct JobRecord {
    pub(crate) id: i64,
    pub(crate) title: String,
    pub(crate) employer: String,
    pub(crate) description: Option<String>,
    pub(crate) location: String,
    pub(crate) job_type: JobType,
    pub(crate) salary_min: Option<i32>,
    pub(crate) salary_max: Option<i32>,
    pub(crate) requirements: Json<Requirements>,
    pub(crate) contact_email: Option<String>,
    pub(crate) is_active: bool,
    pub(crate) posted_by_id: Option<i64>,
    pub(crate) expires_at: Option<OffsetDateTime>,
    pub(crate) created_at: OffsetDateTime,
    pub(crate) updated_at: OffsetDateTime,
}

impl From<JobRecord> for Job {
    fn from(record: JobRecord) -> Self {
        Self {
            id: record.id,
            details: JobDetails {
                title: record.title,
                employer: record.employer,
                description: record.description,
                location: record.location,
                job_type: record.job_type,
                salary_min: record.salary_min,
                salary_max: record.salary_max,
                requirements: record.requirements.0,
                contact_email: record.contact_email,
                is_active: record.is_active,
                expires_at: record.expires_at,
            },
            posted_by_id: record.posted_by_id,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}
