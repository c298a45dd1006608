use crate::domain::validation::{ValidationError, optional, require_len, require_non_empty};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "document_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum DocumentType {
    Identification,
    Medical,
    Legal,
    Employment,
    Housing,
    Other,
}

/// Metadata for a stored document. The file itself lives at `file_url`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub id: i64,
    pub user_id: i64,
    pub details: DocumentDetails,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentDetails {
    pub title: String,
    pub document_type: DocumentType,
    pub file_url: String,
    pub mime_type: Option<String>,
    pub size_bytes: Option<i64>,
    pub is_verified: bool,
    pub expires_at: Option<OffsetDateTime>,
}

impl DocumentDetails {
    /// # Errors
    /// Returns the first `ValidationError` found.
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_len("title", &self.title, 1, 200)?;
        require_non_empty("fileUrl", &self.file_url)?;
        optional(self.mime_type.as_deref(), |m| {
            if m.split_once('/').is_some_and(|(kind, sub)| !kind.is_empty() && !sub.is_empty()) {
                Ok(())
            } else {
                Err(ValidationError::Invalid(format!("mimeType {m:?} is not of the form type/subtype")))
            }
        })?;
        if let Some(size) = self.size_bytes
            && size < 0
        {
            return Err(ValidationError::Range { field: "sizeBytes", reason: "must not be negative".into() });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn passport() -> DocumentDetails {
        DocumentDetails {
            title: "Passport scan".into(),
            document_type: DocumentType::Identification,
            file_url: "https://files.example/u/7/passport.pdf".into(),
            mime_type: Some("application/pdf".into()),
            size_bytes: Some(183_204),
            is_verified: false,
            expires_at: None,
        }
    }

    #[test]
    fn test_valid_document() {
        assert!(passport().validate().is_ok());
    }

    #[test]
    fn test_rejects_bad_fields() {
        assert!(DocumentDetails { title: String::new(), ..passport() }.validate().is_err());
        assert!(DocumentDetails { file_url: " ".into(), ..passport() }.validate().is_err());
        assert!(DocumentDetails { mime_type: Some("pdf".into()), ..passport() }.validate().is_err());
        assert!(DocumentDetails { size_bytes: Some(-4), ..passport() }.validate().is_err());
    }
}
