use crate::domain::validation::{ValidationError, require_entries};
use serde::{Deserialize, Serialize};

/// Eligibility requirements attached to services and job postings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Requirements {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum_age: Option<u8>,
    #[serde(default)]
    pub documents_required: Vec<String>,
    #[serde(default)]
    pub languages: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default)]
    pub referral_required: bool,
}

impl Requirements {
    /// # Errors
    /// Returns `ValidationError` for blank list entries or an implausible minimum age.
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_entries("requirements.documentsRequired", &self.documents_required)?;
        require_entries("requirements.languages", &self.languages)?;
        if let Some(age) = self.minimum_age
            && age > 120
        {
            return Err(ValidationError::Range {
                field: "requirements.minimumAge",
                reason: format!("{age} is not a plausible age"),
            });
        }
        Ok(())
    }
}
