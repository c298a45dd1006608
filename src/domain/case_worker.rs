use crate::domain::validation::{ValidationError, optional, require_email, require_entries, require_len};
use time::OffsetDateTime;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseWorker {
    pub id: i64,
    pub details: CaseWorkerDetails,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseWorkerDetails {
    /// Login account used when the case worker answers messages.
    pub user_id: Option<i64>,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub organization: Option<String>,
    pub specializations: Vec<String>,
    pub languages: Vec<String>,
    pub office_location: Option<String>,
    pub max_caseload: i32,
    pub current_caseload: i32,
    pub is_available: bool,
}

pub const DEFAULT_MAX_CASELOAD: i32 = 25;

impl CaseWorkerDetails {
    /// # Errors
    /// Returns the first `ValidationError` found.
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_len("name", &self.name, 1, 100)?;
        require_email("email", &self.email)?;
        optional(self.phone.as_deref(), |p| require_len("phone", p, 3, 30))?;
        optional(self.organization.as_deref(), |o| require_len("organization", o, 1, 200))?;
        optional(self.office_location.as_deref(), |o| require_len("officeLocation", o, 1, 300))?;
        require_entries("specializations", &self.specializations)?;
        require_entries("languages", &self.languages)?;

        if self.max_caseload < 1 {
            return Err(ValidationError::Range { field: "maxCaseload", reason: "must be at least 1".into() });
        }
        if !(0..=self.max_caseload).contains(&self.current_caseload) {
            return Err(ValidationError::Range {
                field: "currentCaseload",
                reason: format!("{} not in 0..={}", self.current_caseload, self.max_caseload),
            });
        }
        Ok(())
    }

    #[must_use]
    pub const fn can_take_cases(&self) -> bool {
        self.is_available && self.current_caseload < self.max_caseload
    }
}
