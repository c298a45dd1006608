use crate::adapters::database::DbPool;
use crate::adapters::database::case_worker_repo::CaseWorkerRepository;
use crate::domain::auth::Actor;
use crate::domain::case_worker::{CaseWorker, CaseWorkerDetails};
use crate::error::{AppError, Result};
use opentelemetry::{KeyValue, global, metrics::Counter};

#[derive(Clone, Debug)]
struct Metrics {
    caseload_adjustments_total: Counter<u64>,
}

impl Metrics {
    fn new() -> Self {
        let meter = global::meter("dignity-server");
        Self {
            caseload_adjustments_total: meter
                .u64_counter("case_worker_caseload_adjustments_total")
                .with_description("Caseload adjustments, labelled by outcome")
                .build(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct CaseWorkerService {
    pool: DbPool,
    repo: CaseWorkerRepository,
    metrics: Metrics,
}

impl CaseWorkerService {
    #[must_use]
    pub fn new(pool: DbPool, repo: CaseWorkerRepository) -> Self {
        Self { pool, repo, metrics: Metrics::new() }
    }

    /// # Errors
    /// Returns `AppError::Forbidden` for non-staff callers, `AppError::BadRequest` for invalid details
    /// and `AppError::Conflict` for a duplicate email or linked account.
    #[tracing::instrument(err(level = "warn"), skip(self, details))]
    pub async fn create(&self, actor: Actor, details: CaseWorkerDetails) -> Result<CaseWorker> {
        if !actor.is_staff() {
            return Err(AppError::Forbidden);
        }
        details.validate()?;
        let mut conn = self.pool.acquire().await?;
        self.repo.create(&mut conn, &details).await
    }

    /// # Errors
    /// Returns `AppError::NotFound` for an unknown case worker.
    #[tracing::instrument(err(level = "debug"), skip(self))]
    pub async fn get(&self, id: i64) -> Result<CaseWorker> {
        let mut conn = self.pool.acquire().await?;
        self.repo.find_by_id(&mut conn, id).await?.ok_or(AppError::NotFound)
    }

    /// # Errors
    /// Returns `AppError::Database` if the query fails.
    #[tracing::instrument(err, skip(self))]
    pub async fn list(&self, available: Option<bool>) -> Result<Vec<CaseWorker>> {
        let mut conn = self.pool.acquire().await?;
        self.repo.list(&mut conn, available).await
    }

    /// # Errors
    /// Returns `AppError::Forbidden` for non-staff callers, `AppError::NotFound` for an unknown case worker
    /// and `AppError::BadRequest` if the patched details are invalid.
    #[tracing::instrument(err(level = "warn"), skip(self, patch))]
    pub async fn update<F>(&self, actor: Actor, id: i64, patch: F) -> Result<CaseWorker>
    where
        F: FnOnce(&mut CaseWorkerDetails) + Send,
    {
        if !actor.is_staff() {
            return Err(AppError::Forbidden);
        }
        let mut tx = self.pool.begin().await?;
        let mut details = self.repo.find_by_id(&mut tx, id).await?.ok_or(AppError::NotFound)?.details;
        patch(&mut details);
        details.validate()?;

        let worker = self.repo.update(&mut tx, id, &details).await?.ok_or(AppError::NotFound)?;
        tx.commit().await?;
        Ok(worker)
    }

    /// # Errors
    /// Returns `AppError::Forbidden` for non-staff callers and `AppError::NotFound` for an unknown case worker.
    #[tracing::instrument(err(level = "warn"), skip(self))]
    pub async fn delete(&self, actor: Actor, id: i64) -> Result<()> {
        if !actor.is_staff() {
            return Err(AppError::Forbidden);
        }
        let mut conn = self.pool.acquire().await?;
        if self.repo.delete(&mut conn, id).await? { Ok(()) } else { Err(AppError::NotFound) }
    }

    /// # Errors
    /// Returns `AppError::Conflict` when the result would leave `0..=maxCaseload`.
    #[tracing::instrument(err(level = "warn"), skip(self))]
    pub async fn adjust_caseload(&self, actor: Actor, id: i64, delta: i32) -> Result<CaseWorker> {
        if !actor.is_staff() {
            return Err(AppError::Forbidden);
        }
        let mut conn = self.pool.acquire().await?;
        let result = self.repo.adjust_caseload(&mut conn, id, delta).await;
        let status = if result.is_ok() { "success" } else { "rejected" };
        self.metrics.caseload_adjustments_total.add(1, &[KeyValue::new("status", status)]);
        result
    }
}
