use crate::domain::requirements::Requirements;
use crate::domain::validation::{ValidationError, optional, require_email, require_len, require_non_empty};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "job_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum JobType {
    FullTime,
    PartTime,
    Temporary,
    Contract,
    Volunteer,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    pub id: i64,
    pub details: JobDetails,
    pub posted_by_id: Option<i64>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobDetails {
    pub title: String,
    pub employer: String,
    pub description: Option<String>,
    pub location: String,
    pub job_type: JobType,
    pub salary_min: Option<i32>,
    pub salary_max: Option<i32>,
    pub requirements: Requirements,
    pub contact_email: Option<String>,
    pub is_active: bool,
    pub expires_at: Option<OffsetDateTime>,
}

impl JobDetails {
    /// # Errors
    /// Returns the first `ValidationError` found.
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_len("title", &self.title, 1, 200)?;
        require_len("employer", &self.employer, 1, 200)?;
        require_non_empty("location", &self.location)?;
        optional(self.description.as_deref(), |d| require_len("description", d, 0, 10_000))?;
        optional(self.contact_email.as_deref(), |e| require_email("contactEmail", e))?;

        for (field, value) in [("salaryMin", self.salary_min), ("salaryMax", self.salary_max)] {
            if let Some(v) = value
                && v < 0
            {
                return Err(ValidationError::Range { field, reason: "must not be negative".into() });
            }
        }
        if let (Some(min), Some(max)) = (self.salary_min, self.salary_max)
            && min > max
        {
            return Err(ValidationError::Range { field: "salaryMin", reason: format!("{min} exceeds salaryMax {max}") });
        }

        self.requirements.validate()
    }

    #[must_use]
    pub fn is_open_at(&self, now: OffsetDateTime) -> bool {
        self.is_active && self.expires_at.is_none_or(|exp| exp > now)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct JobFilter {
    pub job_type: Option<JobType>,
    pub active: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn posting() -> JobDetails {
        JobDetails {
            title: "Warehouse associate".into(),
            employer: "Northside Logistics".into(),
            description: None,
            location: "Unit 4, Ring Road".into(),
            job_type: JobType::PartTime,
            salary_min: Some(22_000),
            salary_max: Some(26_000),
            requirements: Requirements { minimum_age: Some(18), ..Requirements::default() },
            contact_email: Some("jobs@northside.example".into()),
            is_active: true,
            expires_at: Some(datetime!(2026-12-31 0:00 UTC)),
        }
    }

    #[test]
    fn test_valid_posting() {
        assert!(posting().validate().is_ok());
    }

    #[test]
    fn test_salary_range() {
        let mut job = posting();
        job.salary_min = Some(30_000);
        assert!(job.validate().is_err());

        job.salary_max = None;
        assert!(job.validate().is_ok());

        job.salary_min = Some(-1);
        assert!(job.validate().is_err());
    }

    #[test]
    fn test_expiry() {
        let job = posting();
        assert!(job.is_open_at(datetime!(2026-06-01 0:00 UTC)));
        assert!(!job.is_open_at(datetime!(2027-01-01 0:00 UTC)));

        let closed = JobDetails { is_active: false, ..posting() };
        assert!(!closed.is_open_at(datetime!(2026-06-01 0:00 UTC)));
    }
}
