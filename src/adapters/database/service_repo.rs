use crate::adapters::database::is_check_violation;
use crate::adapters::database::records::ServiceRecord;
use crate::domain::service::{Service, ServiceDetails, ServiceFilter};
use crate::error::{AppError, Result};
use sqlx::PgConnection;
use sqlx::types::Json;

#[derive(Clone, Debug, Default)]
pub struct ServiceRepository {}

impl ServiceRepository {
    #[must_use]
    pub const fn new() -> Self {
        Self {}
    }

    /// # Errors
    /// Returns `AppError::Database` if the insert fails.
    #[tracing::instrument(level = "debug", skip(self, conn, details), fields(name = %details.name))]
    pub(crate) async fn create(&self, conn: &mut PgConnection, details: &ServiceDetails) -> Result<Service> {
        let record = sqlx::query_as::<_, ServiceRecord>(
            r#"
            INSERT INTO services (name, category, description, address, latitude, longitude, phone, email, website,
                                  total_capacity, current_capacity, amenities, operating_hours, requirements,
                                  is_active)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
            RETURNING id, name, category, description, address, latitude, longitude, phone, email, website,
                      total_capacity, current_capacity, amenities, operating_hours, requirements, is_active,
                      created_at, updated_at
            "#,
        )
        .bind(&details.name)
        .bind(details.category)
        .bind(&details.description)
        .bind(&details.address)
        .bind(details.latitude)
        .bind(details.longitude)
        .bind(&details.phone)
        .bind(&details.email)
        .bind(&details.website)
        .bind(details.total_capacity)
        .bind(details.current_capacity)
        .bind(&details.amenities)
        .bind(Json(&details.operating_hours))
        .bind(Json(&details.requirements))
        .bind(details.is_active)
        .fetch_one(conn)
        .await?;

        Ok(record.into())
    }

    /// # Errors
    /// Returns `AppError::Database` if the query fails.
    #[tracing::instrument(level = "debug", skip(self, conn))]
    pub(crate) async fn find_by_id(&self, conn: &mut PgConnection, id: i64) -> Result<Option<Service>> {
        let record = sqlx::query_as::<_, ServiceRecord>(
            r#"
            SELECT id, name, category, description, address, latitude, longitude, phone, email, website,
                   total_capacity, current_capacity, amenities, operating_hours, requirements, is_active,
                   created_at, updated_at
            FROM services
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
    pub(crate) async fn list(&self, conn: &mut PgConnection, filter: ServiceFilter) -> Result<Vec<Service>> {
        let records = sqlx::query_as::<_, ServiceRecord>(
            r#"
            SELECT id, name, category, description, address, latitude, longitude, phone, email, website,
                   total_capacity, current_capacity, amenities, operating_hours, requirements, is_active,
                   created_at, updated_at
            FROM services
            WHERE ($1::service_category IS NULL OR category = $1)
              AND ($2::boolean IS NULL OR is_active = $2)
            ORDER BY name ASC, id ASC
            "#,
        )
        .bind(filter.category)
        .bind(filter.active)
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
        details: &ServiceDetails,
    ) -> Result<Option<Service>> {
        let result = sqlx::query_as::<_, ServiceRecord>(
            r#"
            UPDATE services
            SET name = $2, category = $3, description = $4, address = $5, latitude = $6, longitude = $7,
                phone = $8, email = $9, website = $10, total_capacity = $11, current_capacity = $12,
                amenities = $13, operating_hours = $14, requirements = $15, is_active = $16, updated_at = NOW()
            WHERE id = $1
            RETURNING id, name, category, description, address, latitude, longitude, phone, email, website,
                      total_capacity, current_capacity, amenities, operating_hours, requirements, is_active,
                      created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(&details.name)
        .bind(details.category)
        .bind(&details.description)
        .bind(&details.address)
        .bind(details.latitude)
        .bind(details.longitude)
        .bind(&details.phone)
        .bind(&details.email)
        .bind(&details.website)
        .bind(details.total_capacity)
        .bind(details.current_capacity)
        .bind(&details.amenities)
        .bind(Json(&details.operating_hours))
        .bind(Json(&details.requirements))
        .bind(details.is_active)
        .fetch_optional(conn)
        .await;

        match result {
            Ok(record) => Ok(record.map(Into::into)),
            // A concurrent capacity adjustment moved the counter past the new bound.
            Err(e) if is_check_violation(&e) => Err(AppError::Conflict("Capacity out of bounds".to_string())),
            Err(e) => Err(AppError::Database(e)),
        }
    }

    /// # Errors
    /// Returns `AppError::Database` if the deletion fails.
    #[tracing::instrument(level = "debug", skip(self, conn))]
    pub(crate) async fn delete(&self, conn: &mut PgConnection, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM services WHERE id = $1").bind(id).execute(conn).await?;
        Ok(result.rows_affected() > 0)
    }

    /// Atomically moves `current_capacity` by `delta`, refusing to leave `0..=total_capacity`.
    /// Unbounded services are capped at `i32::MAX`.
    ///
    /// # Errors
    /// Returns `AppError::NotFound` for an unknown service and `AppError::Conflict` if the bound would be crossed.
    #[tracing::instrument(level = "debug", skip(self, conn))]
    pub(crate) async fn adjust_capacity(&self, conn: &mut PgConnection, id: i64, delta: i32) -> Result<Service> {
        let record = sqlx::query_as::<_, ServiceRecord>(
            r#"
            UPDATE services
            SET current_capacity = (current_capacity::bigint + $2)::integer, updated_at = NOW()
            WHERE id = $1
              AND current_capacity::bigint + $2 BETWEEN 0 AND COALESCE(total_capacity, 2147483647)
            RETURNING id, name, category, description, address, latitude, longitude, phone, email, website,
                      total_capacity, current_capacity, amenities, operating_hours, requirements, is_active,
                      created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(i64::from(delta))
        .fetch_optional(&mut *conn)
        .await?;

        if let Some(record) = record {
            return Ok(record.into());
        }

        let exists: bool = sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM services WHERE id = $1)")
            .bind(id)
            .fetch_one(conn)
            .await?;

        if exists {
            Err(AppError::Conflict("Capacity adjustment would leave the allowed range".to_string()))
        } else {
            Err(AppError::NotFound)
        }
    }
}
