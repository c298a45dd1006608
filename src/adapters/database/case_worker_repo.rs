use crate::adapters::database::records::CaseWorkerRecord;
use crate::adapters::database::{is_check_violation, is_foreign_key_violation, is_unique_violation};
use crate::domain::case_worker::{CaseWorker, CaseWorkerDetails};
use crate::error::{AppError, Result};
use sqlx::PgConnection;

#[derive(Clone, Debug, Default)]
pub struct CaseWorkerRepository {}

fn map_write_error(e: sqlx::Error) -> AppError {
    if is_unique_violation(&e) {
        AppError::Conflict("Case worker email or linked user already in use".to_string())
    } else if is_foreign_key_violation(&e) {
        AppError::NotFound
    } else if is_check_violation(&e) {
        AppError::Conflict("Caseload out of bounds".to_string())
    } else {
        AppError::Database(e)
    }
}

impl CaseWorkerRepository {
    #[must_use]
    pub const fn new() -> Self {
        Self {}
    }

    /// # Errors
    /// Returns `AppError::Conflict` if the email or linked user is taken, `AppError::NotFound` if the linked user
    /// does not exist.
    #[tracing::instrument(level = "debug", skip(self, conn, details))]
    pub(crate) async fn create(&self, conn: &mut PgConnection, details: &CaseWorkerDetails) -> Result<CaseWorker> {
        sqlx::query_as::<_, CaseWorkerRecord>(
            r#"
            INSERT INTO case_workers (user_id, name, email, phone, organization, specializations, languages,
                                      office_location, max_caseload, current_caseload, is_available)
            VALUES ($1, $2, LOWER($3), $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING id, user_id, name, email, phone, organization, specializations, languages, office_location,
                      max_caseload, current_caseload, is_available, created_at, updated_at
            "#,
        )
        .bind(details.user_id)
        .bind(&details.name)
        .bind(&details.email)
        .bind(&details.phone)
        .bind(&details.organization)
        .bind(&details.specializations)
        .bind(&details.languages)
        .bind(&details.office_location)
        .bind(details.max_caseload)
        .bind(details.current_caseload)
        .bind(details.is_available)
        .fetch_one(conn)
        .await
        .map(Into::into)
        .map_err(map_write_error)
    }

    /// # Errors
    /// Returns `AppError::Database` if the query fails.
    #[tracing::instrument(level = "debug", skip(self, conn))]
    pub(crate) async fn find_by_id(&self, conn: &mut PgConnection, id: i64) -> Result<Option<CaseWorker>> {
        let record = sqlx::query_as::<_, CaseWorkerRecord>(
            r#"
            SELECT id, user_id, name, email, phone, organization, specializations, languages, office_location,
                   max_caseload, current_caseload, is_available, created_at, updated_at
            FROM case_workers
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(conn)
        .await?;

        Ok(record.map(Into::into))
    }

    /// Only the office location, used to default appointment locations.
    ///
    /// Outer `None` means the case worker does not exist.
    ///
    /// # Errors
    /// Returns `AppError::Database` if the query fails.
    #[tracing::instrument(level = "debug", skip(self, conn))]
    pub(crate) async fn find_office_location(
        &self,
        conn: &mut PgConnection,
        id: i64,
    ) -> Result<Option<Option<String>>> {
        let location = sqlx::query_scalar::<_, Option<String>>("SELECT office_location FROM case_workers WHERE id = $1")
            .bind(id)
            .fetch_optional(conn)
            .await?;

        Ok(location)
    }

    /// # Errors
    /// Returns `AppError::Database` if the query fails.
    #[tracing::instrument(level = "debug", skip(self, conn))]
    pub(crate) async fn list(&self, conn: &mut PgConnection, available: Option<bool>) -> Result<Vec<CaseWorker>> {
        let records = sqlx::query_as::<_, CaseWorkerRecord>(
            r#"
            SELECT id, user_id, name, email, phone, organization, specializations, languages, office_location,
                   max_caseload, current_caseload, is_available, created_at, updated_at
            FROM case_workers
            WHERE ($1::boolean IS NULL OR is_available = $1)
            ORDER BY name ASC, id ASC
            "#,
        )
        .bind(available)
        .fetch_all(conn)
        .await?;

        Ok(records.into_iter().map(Into::into).collect())
    }

    /// # Errors
    /// Same as [`CaseWorkerRepository::create`].
    #[tracing::instrument(level = "debug", skip(self, conn, details))]
    pub(crate) async fn update(
        &self,
        conn: &mut PgConnection,
        id: i64,
        details: &CaseWorkerDetails,
    ) -> Result<Option<CaseWorker>> {
        sqlx::query_as::<_, CaseWorkerRecord>(
            r#"
            UPDATE case_workers
            SET user_id = $2, name = $3, email = LOWER($4), phone = $5, organization = $6, specializations = $7,
                languages = $8, office_location = $9, max_caseload = $10, current_caseload = $11,
                is_available = $12, updated_at = NOW()
            WHERE id = $1
            RETURNING id, user_id, name, email, phone, organization, specializations, languages, office_location,
                      max_caseload, current_caseload, is_available, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(details.user_id)
        .bind(&details.name)
        .bind(&details.email)
        .bind(&details.phone)
        .bind(&details.organization)
        .bind(&details.specializations)
        .bind(&details.languages)
        .bind(&details.office_location)
        .bind(details.max_caseload)
        .bind(details.current_caseload)
        .bind(details.is_available)
        .fetch_optional(conn)
        .await
        .map(|record| record.map(Into::into))
        .map_err(map_write_error)
    }

    /// # Errors
    /// Returns `AppError::Database` if the deletion fails.
    #[tracing::instrument(level = "debug", skip(self, conn))]
    pub(crate) async fn delete(&self, conn: &mut PgConnection, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM case_workers WHERE id = $1").bind(id).execute(conn).await?;
        Ok(result.rows_affected() > 0)
    }

    /// Atomically moves `current_caseload` by `delta` within `0..=max_caseload`.
    ///
    /// # Errors
    /// Returns `AppError::NotFound` for an unknown case worker and `AppError::Conflict` if the bound would be crossed.
    #[tracing::instrument(level = "debug", skip(self, conn))]
    pub(crate) async fn adjust_caseload(&self, conn: &mut PgConnection, id: i64, delta: i32) -> Result<CaseWorker> {
        let record = sqlx::query_as::<_, CaseWorkerRecord>(
            r#"
            UPDATE case_workers
            SET current_caseload = (current_caseload::bigint + $2)::integer, updated_at = NOW()
            WHERE id = $1
              AND current_caseload::bigint + $2 BETWEEN 0 AND max_caseload
            RETURNING id, user_id, name, email, phone, organization, specializations, languages, office_location,
                      max_caseload, current_caseload, is_available, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(i64::from(delta))
        .fetch_optional(&mut *conn)
        .await?;

        if let Some(record) = record {
            return Ok(record.into());
        }

        let exists: bool = sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM case_workers WHERE id = $1)")
            .bind(id)
            .fetch_one(conn)
            .await?;

        if exists {
            Err(AppError::Conflict("Caseload adjustment would leave the allowed range".to_string()))
        } else {
            Err(AppError::NotFound)
        }
    }
}
