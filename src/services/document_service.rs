use crate::adapters::database::DbPool;
use crate::adapters::database::document_repo::DocumentRepository;
use crate::domain::auth::Actor;
use crate::domain::document::{Document, DocumentDetails};
use crate::error::{AppError, Result};

/// Document metadata. Rows are private to their owner; admins may act on any.
#[derive(Clone, Debug)]
pub struct DocumentService {
    pool: DbPool,
    repo: DocumentRepository,
}

impl DocumentService {
    #[must_use]
    pub const fn new(pool: DbPool, repo: DocumentRepository) -> Self {
        Self { pool, repo }
    }

    /// Only staff may record a document as verified.
    ///
    /// # Errors
    /// Returns `AppError::BadRequest` for invalid metadata.
    #[tracing::instrument(err(level = "warn"), skip(self, details))]
    pub async fn create(&self, actor: Actor, mut details: DocumentDetails) -> Result<Document> {
        if !actor.is_staff() {
            details.is_verified = false;
        }
        details.validate()?;
        let mut conn = self.pool.acquire().await?;
        self.repo.create(&mut conn, actor.user_id, &details).await
    }

    /// # Errors
    /// Returns `AppError::NotFound` for an unknown document and `AppError::Forbidden` for someone else's.
    #[tracing::instrument(err(level = "debug"), skip(self))]
    pub async fn get(&self, actor: Actor, id: i64) -> Result<Document> {
        let mut conn = self.pool.acquire().await?;
        let document = self.repo.find_by_id(&mut conn, id).await?.ok_or(AppError::NotFound)?;
        Self::authorize(actor, &document)?;
        Ok(document)
    }

    /// # Errors
    /// Returns `AppError::Database` if the query fails.
    #[tracing::instrument(err, skip(self))]
    pub async fn list(&self, actor: Actor) -> Result<Vec<Document>> {
        let mut conn = self.pool.acquire().await?;
        self.repo.list_for_user(&mut conn, actor.user_id).await
    }

    /// # Errors
    /// Returns `AppError::NotFound`, `AppError::Forbidden` or `AppError::BadRequest`.
    #[tracing::instrument(err(level = "warn"), skip(self, patch))]
    pub async fn update<F>(&self, actor: Actor, id: i64, patch: F) -> Result<Document>
    where
        F: FnOnce(&mut DocumentDetails) + Send,
    {
        let mut tx = self.pool.begin().await?;
        let document = self.repo.find_by_id(&mut tx, id).await?.ok_or(AppError::NotFound)?;
        Self::authorize(actor, &document)?;

        let was_verified = document.details.is_verified;
        let mut details = document.details;
        patch(&mut details);
        if details.is_verified != was_verified && !actor.is_staff() {
            return Err(AppError::Forbidden);
        }
        details.validate()?;

        let document = self.repo.update(&mut tx, id, &details).await?.ok_or(AppError::NotFound)?;
        tx.commit().await?;
        Ok(document)
    }

    /// # Errors
    /// Returns `AppError::NotFound` for an unknown document and `AppError::Forbidden` for someone else's.
    #[tracing::instrument(err(level = "warn"), skip(self))]
    pub async fn delete(&self, actor: Actor, id: i64) -> Result<()> {
        let mut conn = self.pool.acquire().await?;
        let document = self.repo.find_by_id(&mut conn, id).await?.ok_or(AppError::NotFound)?;
        Self::authorize(actor, &document)?;
        if self.repo.delete(&mut conn, id).await? { Ok(()) } else { Err(AppError::NotFound) }
    }

    fn authorize(actor: Actor, document: &Document) -> Result<()> {
        if actor.can_act_for(document.user_id) { Ok(()) } else { Err(AppError::Forbidden) }
    }
}
