use crate::adapters::database::is_foreign_key_violation;
use crate::adapters::database::records::DocumentRecord;
use crate::domain::document::{Document, DocumentDetails};
use crate::error::{AppError, Result};
use sqlx::PgConnection;

#[derive(Clone, Debug, Default)]
pub struct DocumentRepository {}

impl DocumentRepository {
    #[must_use]
    pub const fn new() -> Self {
        Self {}
    }

    /// # Errors
    /// Returns `AppError::NotFound` if the owner does not exist.
    #[tracing::instrument(level = "debug", skip(self, conn, details))]
    pub(crate) async fn create(
        &self,
        conn: &mut PgConnection,
        user_id: i64,
        details: &DocumentDetails,
    ) -> Result<Document> {
        let result = sqlx::query_as::<_, DocumentRecord>(
            r#"
            INSERT INTO documents (user_id, title, document_type, file_url, mime_type, size_bytes, is_verified,
                                   expires_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id, user_id, title, document_type, file_url, mime_type, size_bytes, is_verified, expires_at,
                      created_at, updated_at
            "#,
        )
        .bind(user_id)
        .bind(&details.title)
        .bind(details.document_type)
        .bind(&details.file_url)
        .bind(&details.mime_type)
        .bind(details.size_bytes)
        .bind(details.is_verified)
        .bind(details.expires_at)
        .fetch_one(conn)
        .await;

        match result {
            Ok(record) => Ok(record.into()),
            Err(e) if is_foreign_key_violation(&e) => Err(AppError::NotFound),
            Err(e) => Err(AppError::Database(e)),
        }
    }

    /// # Errors
    /// Returns `AppError::Database` if the query fails.
    #[tracing::instrument(level = "debug", skip(self, conn))]
    pub(crate) async fn find_by_id(&self, conn: &mut PgConnection, id: i64) -> Result<Option<Document>> {
        let record = sqlx::query_as::<_, DocumentRecord>(
            r#"
            SELECT id, user_id, title, document_type, file_url, mime_type, size_bytes, is_verified, expires_at,
                   created_at, updated_at
            FROM documents
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(conn)
        .await?;

        Ok(record.map(Into::into))
    }

    /// # Errors
    /// Returns `AppError::Database` if the query fails.
    #[tracing::instrument(level = "debug", skip(self, conn))]
    pub(crate) async fn list_for_user(&self, conn: &mut PgConnection, user_id: i64) -> Result<Vec<Document>> {
        let records = sqlx::query_as::<_, DocumentRecord>(
            r#"
            SELECT id, user_id, title, document_type, file_url, mime_type, size_bytes, is_verified, expires_at,
                   created_at, updated_at
            FROM documents
            WHERE user_id = $1
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(conn)
        .await?;

        Ok(records.into_iter().map(Into::into).collect())
    }

    /// # Errors
    /// Returns `AppError::Database` if the update fails.
    #[tracing::instrument(level = "debug", skip(self, conn, details))]
    pub(crate) async fn update(
        &self,
        conn: &mut PgConnection,
        id: i64,
        details: &DocumentDetails,
    ) -> Result<Option<Document>> {
        let record = sqlx::query_as::<_, DocumentRecord>(
            r#"
            UPDATE documents
            SET title = $2, document_type = $3, file_url = $4, mime_type = $5, size_bytes = $6, is_verified = $7,
                expires_at = $8, updated_at = NOW()
            WHERE id = $1
            RETURNING id, user_id, title, document_type, file_url, mime_type, size_bytes, is_verified, expires_at,
                      created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(&details.title)
        .bind(details.document_type)
        .bind(&details.file_url)
        .bind(&details.mime_type)
        .bind(details.size_bytes)
        .bind(details.is_verified)
        .bind(details.expires_at)
        .fetch_optional(conn)
        .await?;

        Ok(record.map(Into::into))
    }

    /// # Errors
    /// Returns `AppError::Database` if the deletion fails.
    #[tracing::instrument(level = "debug", skip(self, conn))]
    pub(crate) async fn delete(&self, conn: &mut PgConnection, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM documents WHERE id = $1").bind(id).execute(conn).await?;
        Ok(result.rows_affected() > 0)
    }
}
