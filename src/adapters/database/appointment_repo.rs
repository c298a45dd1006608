use crate::adapters::database::is_foreign_key_violation;
use crate::adapters::database::records::AppointmentRecord;
use crate::domain::appointment::{Appointment, AppointmentDetails, AppointmentFilter};
use crate::error::{AppError, Result};
use sqlx::PgConnection;

#[derive(Clone, Debug, Default)]
pub struct AppointmentRepository {}

impl AppointmentRepository {
    #[must_use]
    pub const fn new() -> Self {
        Self {}
    }

    /// # Errors
    /// Returns `AppError::NotFound` if the user or case worker does not exist.
    #[tracing::instrument(level = "debug", skip(self, conn, details))]
    pub(crate) async fn create(
        &self,
        conn: &mut PgConnection,
        user_id: i64,
        case_worker_id: i64,
        details: &AppointmentDetails,
    ) -> Result<Appointment> {
        let result = sqlx::query_as::<_, AppointmentRecord>(
            r#"
            INSERT INTO appointments (user_id, case_worker_id, scheduled_at, duration_minutes, location, purpose,
                                      notes, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id, user_id, case_worker_id, scheduled_at, duration_minutes, location, purpose, notes, status,
                      created_at, updated_at
            "#,
        )
        .bind(user_id)
        .bind(case_worker_id)
        .bind(details.scheduled_at)
        .bind(details.duration_minutes)
        .bind(&details.location)
        .bind(&details.purpose)
        .bind(&details.notes)
        .bind(details.status)
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
    pub(crate) async fn find_by_id(&self, conn: &mut PgConnection, id: i64) -> Result<Option<Appointment>> {
        let record = sqlx::query_as::<_, AppointmentRecord>(
            r#"
            SELECT id, user_id, case_worker_id, scheduled_at, duration_minutes, location, purpose, notes, status,
                   created_at, updated_at
            FROM appointments
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(conn)
        .await?;

        Ok(record.map(Into::into))
    }

    /// Lists appointments in schedule order.
    ///
    /// # Errors
    /// Returns `AppError::Database` if the query fails.
    #[tracing::instrument(level = "debug", skip(self, conn))]
    pub(crate) async fn list(&self, conn: &mut PgConnection, filter: AppointmentFilter) -> Result<Vec<Appointment>> {
        let records = sqlx::query_as::<_, AppointmentRecord>(
            r#"
            SELECT id, user_id, case_worker_id, scheduled_at, duration_minutes, location, purpose, notes, status,
                   created_at, updated_at
            FROM appointments
            WHERE ($1::bigint IS NULL OR user_id = $1)
              AND ($2::bigint IS NULL OR case_worker_id = $2)
              AND ($3::appointment_status IS NULL OR status = $3)
            ORDER BY scheduled_at ASC, id ASC
            "#,
        )
        .bind(filter.user_id)
        .bind(filter.case_worker_id)
        .bind(filter.status)
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
        details: &AppointmentDetails,
    ) -> Result<Option<Appointment>> {
        let record = sqlx::query_as::<_, AppointmentRecord>(
            r#"
            UPDATE appointments
            SET scheduled_at = $2, duration_minutes = $3, location = $4, purpose = $5, notes = $6, status = $7,
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, user_id, case_worker_id, scheduled_at, duration_minutes, location, purpose, notes, status,
                      created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(details.scheduled_at)
        .bind(details.duration_minutes)
        .bind(&details.location)
        .bind(&details.purpose)
        .bind(&details.notes)
        .bind(details.status)
        .fetch_optional(conn)
        .await?;

        Ok(record.map(Into::into))
    }

    /// # Errors
    /// Returns `AppError::Database` if the deletion fails.
    #[tracing::instrument(level = "debug", skip(self, conn))]
    pub(crate) async fn delete(&self, conn: &mut PgConnection, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM appointments WHERE id = $1").bind(id).execute(conn).await?;
        Ok(result.rows_affected() > 0)
    }
}
