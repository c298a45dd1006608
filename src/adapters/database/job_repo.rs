use crate::adapters::database::records::JobRecord;
use crate::domain::job::{Job, JobDetails, JobFilter};
use crate::error::Result;
use sqlx::PgConnection;
use sqlx::types::Json;

#[derive(Clone, Debug, Default)]
pub struct JobRepository {}

impl JobRepository {
    #[must_use]
    pub const fn new() -> Self {
        Self {}
    }

    /// # Errors
    /// Returns `AppError::Database` if the insert fails.
    #[tracing::instrument(level = "debug", skip(self, conn, details), fields(title = %details.title))]
    pub(crate) async fn create(
        &self,
        conn: &mut PgConnection,
        posted_by_id: Option<i64>,
        details: &JobDetails,
    ) -> Result<Job> {
        let record = sqlx::query_as::<_, JobRecord>(
            r#"
            INSERT INTO jobs (title, employer, description, location, job_type, salary_min, salary_max,
                              requirements, contact_email, is_active, posted_by_id, expires_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING id, title, employer, description, location, job_type, salary_min, salary_max, requirements,
                      contact_email, is_active, posted_by_id, expires_at, created_at, updated_at
            "#,
        )
        .bind(&details.title)
        .bind(&details.employer)
        .bind(&details.description)
        .bind(&details.location)
        .bind(details.job_type)
        .bind(details.salary_min)
        .bind(details.salary_max)
        .bind(Json(&details.requirements))
        .bind(&details.contact_email)
        .bind(details.is_active)
        .bind(posted_by_id)
        .bind(details.expires_at)
        .fetch_one(conn)
        .await?;

        Ok(record.into())
    }

    /// # Errors
    /// Returns `AppError::Database` if the query fails.
    #[tracing::instrument(level = "debug", skip(self, conn))]
    pub(crate) async fn find_by_id(&self, conn: &mut PgConnection, id: i64) -> Result<Option<Job>> {
        let record = sqlx::query_as::<_, JobRecord>(
            r#"
            SELECT id, title, employer, description, location, job_type, salary_min, salary_max, requirements,
                   contact_email, is_active, posted_by_id, expires_at, created_at, updated_at
            FROM jobs
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(conn)
        .await?;

        Ok(record.map(Into::into))
    }

    /// Lists postings, newest first.
    ///
    /// # Errors
    /// Returns `AppError::Database` if the query fails.
    #[tracing::instrument(level = "debug", skip(self, conn))]
    pub(crate) async fn list(&self, conn: &mut PgConnection, filter: JobFilter) -> Result<Vec<Job>> {
        let records = sqlx::query_as::<_, JobRecord>(
            r#"
            SELECT id, title, employer, description, location, job_type, salary_min, salary_max, requirements,
                   contact_email, is_active, posted_by_id, expires_at, created_at, updated_at
            FROM jobs
            WHERE ($1::job_type IS NULL OR job_type = $1)
              AND ($2::boolean IS NULL OR is_active = $2)
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(filter.job_type)
        .bind(filter.active)
        .fetch_all(conn)
        .await?;

        Ok(records.into_iter().map(Into::into).collect())
    }

    /// # Errors
    /// Returns `AppError::Database` if the update fails.
    #[tracing::instrument(level = "debug", skip(self, conn, details))]
    pub(crate) async fn update(&self, conn: &mut PgConnection, id: i64, details: &JobDetails) -> Result<Option<Job>> {
        let record = sqlx::query_as::<_, JobRecord>(
            r#"
            UPDATE jobs
            SET title = $2, employer = $3, description = $4, location = $5, job_type = $6, salary_min = $7,
                salary_max = $8, requirements = $9, contact_email = $10, is_active = $11, expires_at = $12,
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, title, employer, description, location, job_type, salary_min, salary_max, requirements,
                      contact_email, is_active, posted_by_id, expires_at, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(&details.title)
        .bind(&details.employer)
        .bind(&details.description)
        .bind(&details.location)
        .bind(details.job_type)
        .bind(details.salary_min)
        .bind(details.salary_max)
        .bind(Json(&details.requirements))
        .bind(&details.contact_email)
        .bind(details.is_active)
        .bind(details.expires_at)
        .fetch_optional(conn)
        .await?;

        Ok(record.map(Into::into))
    }

    /// # Errors
    /// Returns `AppError::Database` if the deletion fails.
    #[tracing::instrument(level = "debug", skip(self, conn))]
    pub(crate) async fn delete(&self, conn: &mut PgConnection, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM jobs WHERE id = $1").bind(id).execute(conn).await?;
        Ok(result.rows_affected() > 0)
    }
}
