use crate::adapters::database::DbPool;
use crate::adapters::database::service_repo::ServiceRepository;
use crate::domain::auth::Actor;
use crate::domain::service::{Service, ServiceDetails, ServiceFilter};
use crate::error::{AppError, Result};
use opentelemetry::{KeyValue, global, metrics::Counter};

#[derive(Clone, Debug)]
struct Metrics {
    capacity_adjustments_total: Counter<u64>,
}

impl Metrics {
    fn new() -> Self {
        let meter = global::meter("dignity-server");
        Self {
            capacity_adjustments_total: meter
                .u64_counter("service_capacity_adjustments_total")
                .with_description("Capacity adjustments, labelled by outcome")
                .build(),
        }
    }
}

/// The directory of shelters, food banks, clinics and other providers.
#[derive(Clone, Debug)]
pub struct DirectoryService {
    pool: DbPool,
    repo: ServiceRepository,
    metrics: Metrics,
}

impl DirectoryService {
    #[must_use]
    pub fn new(pool: DbPool, repo: ServiceRepository) -> Self {
        Self { pool, repo, metrics: Metrics::new() }
    }

    /// # Errors
    /// Returns `AppError::Forbidden` for non-staff callers and `AppError::BadRequest` for invalid details.
    #[tracing::instrument(err(level = "warn"), skip(self, details), fields(name = %details.name))]
    pub async fn create(&self, actor: Actor, details: ServiceDetails) -> Result<Service> {
        if !actor.is_staff() {
            return Err(AppError::Forbidden);
        }
        details.validate()?;
        let mut conn = self.pool.acquire().await?;
        let service = self.repo.create(&mut conn, &details).await?;
        tracing::info!(service_id = service.id, "Service listed");
        Ok(service)
    }

    /// # Errors
    /// Returns `AppError::NotFound` for an unknown service.
    #[tracing::instrument(err(level = "debug"), skip(self))]
    pub async fn get(&self, id: i64) -> Result<Service> {
        let mut conn = self.pool.acquire().await?;
        self.repo.find_by_id(&mut conn, id).await?.ok_or(AppError::NotFound)
    }

    /// # Errors
    /// Returns `AppError::Database` if the query fails.
    #[tracing::instrument(err, skip(self))]
    pub async fn list(&self, filter: ServiceFilter) -> Result<Vec<Service>> {
        let mut conn = self.pool.acquire().await?;
        self.repo.list(&mut conn, filter).await
    }

    /// Fetches, patches, validates and writes back a service in one transaction.
    ///
    /// # Errors
    /// Returns `AppError::Forbidden` for non-staff callers, `AppError::NotFound` for an unknown service
    /// and `AppError::BadRequest` if the patched details are invalid.
    #[tracing::instrument(err(level = "warn"), skip(self, patch))]
    pub async fn update<F>(&self, actor: Actor, id: i64, patch: F) -> Result<Service>
    where
        F: FnOnce(&mut ServiceDetails) + Send,
    {
        if !actor.is_staff() {
            return Err(AppError::Forbidden);
        }
        let mut tx = self.pool.begin().await?;
        let mut details = self.repo.find_by_id(&mut tx, id).await?.ok_or(AppError::NotFound)?.details;
        patch(&mut details);
        details.validate()?;

        let service = self.repo.update(&mut tx, id, &details).await?.ok_or(AppError::NotFound)?;
        tx.commit().await?;
        Ok(service)
    }

    /// # Errors
    /// Returns `AppError::Forbidden` for non-staff callers and `AppError::NotFound` for an unknown service.
    #[tracing::instrument(err(level = "warn"), skip(self))]
    pub async fn delete(&self, actor: Actor, id: i64) -> Result<()> {
        if !actor.is_staff() {
            return Err(AppError::Forbidden);
        }
        let mut conn = self.pool.acquire().await?;
        if self.repo.delete(&mut conn, id).await? { Ok(()) } else { Err(AppError::NotFound) }
    }

    /// Moves the occupied capacity by `delta` without racing concurrent check-ins.
    ///
    /// # Errors
    /// Returns `AppError::Conflict` when the result would leave `0..=totalCapacity`.
    #[tracing::instrument(err(level = "warn"), skip(self))]
    pub async fn adjust_capacity(&self, actor: Actor, id: i64, delta: i32) -> Result<Service> {
        if !actor.is_staff() {
            return Err(AppError::Forbidden);
        }
        let mut conn = self.pool.acquire().await?;
        let result = self.repo.adjust_capacity(&mut conn, id, delta).await;
        let status = if result.is_ok() { "success" } else { "rejected" };
        self.metrics.capacity_adjustments_total.add(1, &[KeyValue::new("status", status)]);
        result
    }
}
