use crate::api::schemas::double_option;
use crate::domain::document::{Document, DocumentDetails, DocumentType};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentResponse {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub document_type: DocumentType,
    pub file_url: String,
    pub mime_type: Option<String>,
    pub size_bytes: Option<i64>,
    pub is_verified: bool,
    #[serde(with = "time::serde::rfc3339::option")]
    pub expires_at: Option<OffsetDateTime>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl From<Document> for DocumentResponse {
    fn from(doc: Document) -> Self {
        let d = doc.details;
        Self {
            id: doc.id,
            user_id: doc.user_id,
            title: d.title,
            document_type: d.document_type,
            file_url: d.file_url,
            mime_type: d.mime_type,
            size_bytes: d.size_bytes,
            is_verified: d.is_verified,
            expires_at: d.expires_at,
            created_at: doc.created_at,
            updated_at: doc.updated_at,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateDocument {
    pub title: String,
    pub document_type: DocumentType,
    pub file_url: String,
    pub mime_type: Option<String>,
    pub size_bytes: Option<i64>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub expires_at: Option<OffsetDateTime>,
}

impl From<CreateDocument> for DocumentDetails {
    fn from(r: CreateDocument) -> Self {
        Self {
            title: r.title,
            document_type: r.document_type,
            file_url: r.file_url,
            mime_type: r.mime_type,
            size_bytes: r.size_bytes,
            is_verified: false,
            expires_at: r.expires_at,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateDocument {
    pub title: Option<String>,
    pub document_type: Option<DocumentType>,
    pub file_url: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub mime_type: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub size_bytes: Option<Option<i64>>,
    pub is_verified: Option<bool>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub expires_at: Option<OffsetDateTime>,
}

impl UpdateDocument {
    pub fn apply(self, d: &mut DocumentDetails) {
        if let Some(v) = self.title {
            d.title = v;
        }
        if let Some(v) = self.document_type {
            d.document_type = v;
        }
        if let Some(v) = self.file_url {
            d.file_url = v;
        }
        if let Some(v) = self.mime_type {
            d.mime_type = v;
        }
        if let Some(v) = self.size_bytes {
            d.size_bytes = v;
        }
        if let Some(v) = self.is_verified {
            d.is_verified = v;
        }
        if self.expires_at.is_some() {
            d.expires_at = self.expires_at;
        }
    }
}
