use crate::domain::validation::{ValidationError, optional, require_email, require_len};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "user_role", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Role {
    #[default]
    User,
    CaseWorker,
    Admin,
}

impl Role {
    /// Staff may manage the shared directory of services, jobs and case workers.
    #[must_use]
    pub const fn is_staff(self) -> bool {
        matches!(self, Self::CaseWorker | Self::Admin)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub(crate) password_hash: String,
    pub profile: UserProfile,
    pub role: Role,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl User {
    #[must_use]
    pub fn display_name(&self) -> String {
        self.profile.display_name()
    }
}

/// Editable profile fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserProfile {
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub preferred_language: String,
}

impl UserProfile {
    /// Derived on every write so it never drifts from the name parts.
    #[must_use]
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name.trim(), self.last_name.trim())
    }

    /// # Errors
    /// Returns `ValidationError` for blank or over-long names and malformed language tags.
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_len("firstName", &self.first_name, 1, 50)?;
        require_len("lastName", &self.last_name, 1, 50)?;
        optional(self.phone.as_deref(), |p| require_len("phone", p, 3, 30))?;
        require_len("preferredLanguage", &self.preferred_language, 2, 10)?;
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password: String,
    pub profile: UserProfile,
}

impl NewUser {
    /// # Errors
    /// Returns `ValidationError` for a malformed email, a weak password or an invalid profile.
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_email("email", &self.email)?;
        require_len("password", &self.password, 8, 128)?;
        self.profile.validate()
    }
}
