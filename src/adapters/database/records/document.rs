use crate::domain::document::{Document, DocumentDetails, DocumentType};
use time::OffsetDateTime;

#[derive(Debug, sqlx::FromRow)]
pub struct DocumentRecord {
    pub(crate) id: i64,
    pub(crate) user_id: i64,
    pub(crate) title: String,
    pub(crate) document_type: DocumentType,
    pub(crate) file_url: String,
    pub(crate) mime_type: Option<String>,
    pub(crate) size_bytes: Option<i64>,
    pub(crate) is_verified: bool,
    pub(crate) expires_at: Option<OffsetDateTime>,
    pub(crate) created_at: OffsetDateTime,
    pub(crate) updated_at: OffsetDateTime,
}

impl From<DocumentRecord> for Document {
    fn from(record: DocumentRecord) -> Self {
        Self {
            id: record.id,
            user_id: record.user_id,
            details: DocumentDetails {
                title: record.title,
                document_type: record.document_type,
                file_url: record.file_url,
                mime_type: record.mime_type,
                size_bytes: record.size_bytes,
                is_verified: record.is_verified,
                expires_at: record.expires_at,
            },
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}
