use crate::domain::hours::WeeklyHours;
use crate::domain::requirements::Requirements;
use crate::domain::validation::{
    ValidationError, optional, require_email, require_entries, require_len, require_non_empty,
};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "service_category", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ServiceCategory {
    Shelter,
    Food,
    Medical,
    Legal,
    Employment,
    Education,
    Other,
}

/// A shelter, food bank, clinic or similar provider.
#[derive(Debug, Clone, PartialEq)]
pub struct Service {
    pub id: i64,
    pub details: ServiceDetails,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ServiceDetails {
    pub name: String,
    pub category: ServiceCategory,
    pub description: Option<String>,
    pub address: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub website: Option<String>,
    pub total_capacity: Option<i32>,
    pub current_capacity: i32,
    pub amenities: Vec<String>,
    pub operating_hours: WeeklyHours,
    pub requirements: Requirements,
    pub is_active: bool,
}

impl ServiceDetails {
    /// # Errors
    /// Returns the first `ValidationError` found.
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_len("name", &self.name, 1, 200)?;
        require_non_empty("address", &self.address)?;
        optional(self.description.as_deref(), |d| require_len("description", d, 0, 5000))?;
        optional(self.email.as_deref(), |e| require_email("email", e))?;
        optional(self.website.as_deref(), |w| require_non_empty("website", w))?;
        optional(self.phone.as_deref(), |p| require_len("phone", p, 3, 30))?;

        if let Some(lat) = self.latitude
            && !(-90.0..=90.0).contains(&lat)
        {
            return Err(ValidationError::Range { field: "latitude", reason: format!("{lat} not in -90..=90") });
        }
        if let Some(lng) = self.longitude
            && !(-180.0..=180.0).contains(&lng)
        {
            return Err(ValidationError::Range { field: "longitude", reason: format!("{lng} not in -180..=180") });
        }

        check_capacity(self.current_capacity, self.total_capacity)?;
        require_entries("amenities", &self.amenities)?;
        self.operating_hours.validate().map_err(|e| ValidationError::Invalid(e.to_string()))?;
        self.requirements.validate()
    }

    #[must_use]
    pub fn has_vacancy(&self) -> bool {
        self.total_capacity.is_none_or(|total| self.current_capacity < total)
    }
}

/// # Errors
/// Returns `ValidationError::Range` when `current` is negative or exceeds `total`.
pub fn check_capacity(current: i32, total: Option<i32>) -> Result<(), ValidationError> {
    if let Some(total) = total
        && total < 0
    {
        return Err(ValidationError::Range { field: "totalCapacity", reason: "must not be negative".into() });
    }
    if current < 0 {
        return Err(ValidationError::Range { field: "currentCapacity", reason: "must not be negative".into() });
    }
    if let Some(total) = total
        && current > total
    {
        return Err(ValidationError::Range {
            field: "currentCapacity",
            reason: format!("{current} exceeds total capacity {total}"),
        });
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ServiceFilter {
    pub category: Option<ServiceCategory>,
    pub active: Option<bool>,
}
