use crate::adapters::database::DbPool;
use crate::adapters::database::job_repo::JobRepository;
use crate::domain::auth::Actor;
use crate::domain::job::{Job, JobDetails, JobFilter};
use crate::error::{AppError, Result};

#[derive(Clone, Debug)]
pub struct JobService {
    pool: DbPool,
    repo: JobRepository,
}

impl JobService {
    #[must_use]
    pub const fn new(pool: DbPool, repo: JobRepository) -> Self {
        Self { pool, repo }
    }

    /// Posts a job on behalf of `actor`.
    ///
    /// # Errors
    /// Returns `AppError::Forbidden` for non-staff callers and `AppError::BadRequest` for invalid details.
    #[tracing::instrument(err(level = "warn"), skip(self, details))]
    pub async fn create(&self, actor: Actor, details: JobDetails) -> Result<Job> {
        if !actor.is_staff() {
            return Err(AppError::Forbidden);
        }
        details.validate()?;
        let mut conn = self.pool.acquire().await?;
        self.repo.create(&mut conn, Some(actor.user_id), &details).await
    }

    /// # Errors
    /// Returns `AppError::NotFound` for an unknown posting.
    #[tracing::instrument(err(level = "debug"), skip(self))]
    pub async fn get(&self, id: i64) -> Result<Job> {
        let mut conn = self.pool.acquire().await?;
        self.repo.find_by_id(&mut conn, id).await?.ok_or(AppError::NotFound)
    }

    /// # Errors
    /// Returns `AppError::Database` if the query fails.
    #[tracing::instrument(err, skip(self))]
    pub async fn list(&self, filter: JobFilter) -> Result<Vec<Job>> {
        let mut conn = self.pool.acquire().await?;
        self.repo.list(&mut conn, filter).await
    }

    /// # Errors
    /// Returns `AppError::Forbidden` unless the caller posted the job or is an admin.
    #[tracing::instrument(err(level = "warn"), skip(self, patch))]
    pub async fn update<F>(&self, actor: Actor, id: i64, patch: F) -> Result<Job>
    where
        F: FnOnce(&mut JobDetails) + Send,
    {
        let mut tx = self.pool.begin().await?;
        let job = self.repo.find_by_id(&mut tx, id).await?.ok_or(AppError::NotFound)?;
        Self::authorize(actor, &job)?;

        let mut details = job.details;
        patch(&mut details);
        details.validate()?;

        let job = self.repo.update(&mut tx, id, &details).await?.ok_or(AppError::NotFound)?;
        tx.commit().await?;
        Ok(job)
    }

    /// # Errors
    /// Returns `AppError::Forbidden` unless the caller posted the job or is an admin.
    #[tracing::instrument(err(level = "warn"), skip(self))]
    pub async fn delete(&self, actor: Actor, id: i64) -> Result<()> {
        let mut conn = self.pool.acquire().await?;
        let job = self.repo.find_by_id(&mut conn, id).await?.ok_or(AppError::NotFound)?;
        Self::authorize(actor, &job)?;
        if self.repo.delete(&mut conn, id).await? { Ok(()) } else { Err(AppError::NotFound) }
    }

    fn authorize(actor: Actor, job: &Job) -> Result<()> {
        let owns = job.posted_by_id == Some(actor.user_id) && actor.is_staff();
        if owns || actor.is_admin() { Ok(()) } else { Err(AppError::Forbidden) }
    }
}
