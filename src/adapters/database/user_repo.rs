use crate::adapters::database::is_unique_violation;
use crate::adapters::database::records::UserRecord;
use crate::domain::user::{Role, User, UserProfile};
use crate::error::{AppError, Result};
use sqlx::PgConnection;

#[derive(Clone, Debug, Default)]
pub struct UserRepository {}

impl UserRepository {
    #[must_use]
    pub const fn new() -> Self {
        Self {}
    }

    /// Inserts a new user. The display name is computed from the profile.
    ///
    /// # Errors
    /// Returns `AppError::Conflict` if the email is already registered.
    #[tracing::instrument(level = "debug", skip(self, conn, password_hash, profile))]
    pub(crate) async fn create(
        &self,
        conn: &mut PgConnection,
        email: &str,
        password_hash: &str,
        profile: &UserProfile,
    ) -> Result<User> {
        let result = sqlx::query_as::<_, UserRecord>(
            r#"
            INSERT INTO users (email, password_hash, first_name, last_name, display_name, phone, preferred_language)
            VALUES (LOWER($1), $2, $3, $4, $5, $6, $7)
            RETURNING id, email, password_hash, first_name, last_name, phone, role, preferred_language,
                      created_at, updated_at
            "#,
        )
        .bind(email)
        .bind(password_hash)
        .bind(&profile.first_name)
        .bind(&profile.last_name)
        .bind(profile.display_name())
        .bind(&profile.phone)
        .bind(&profile.preferred_language)
        .fetch_one(conn)
        .await;

        match result {
            Ok(record) => Ok(record.into()),
            Err(e) if is_unique_violation(&e) => Err(AppError::Conflict("Email already registered".to_string())),
            Err(e) => Err(AppError::Database(e)),
        }
    }

    /// # Errors
    /// Returns `AppError::Database` if the query fails.
    #[tracing::instrument(level = "debug", skip(self, conn))]
    pub(crate) async fn find_by_id(&self, conn: &mut PgConnection, id: i64) -> Result<Option<User>> {
        let record = sqlx::query_as::<_, UserRecord>(
            r#"
            SELECT id, email, password_hash, first_name, last_name, phone, role, preferred_language,
                   created_at, updated_at
            FROM users
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
    #[tracing::instrument(level = "debug", skip(self, conn, email))]
    pub(crate) async fn find_by_email(&self, conn: &mut PgConnection, email: &str) -> Result<Option<User>> {
        let record = sqlx::query_as::<_, UserRecord>(
            r#"
            SELECT id, email, password_hash, first_name, last_name, phone, role, preferred_language,
                   created_at, updated_at
            FROM users
            WHERE email = LOWER($1)
            "#,
        )
        .bind(email)
        .fetch_optional(conn)
        .await?;

        Ok(record.map(Into::into))
    }

    /// Rewrites the profile and recomputes the display name.
    ///
    /// # Errors
    /// Returns `AppError::Database` if the update fails.
    #[tracing::instrument(level = "debug", skip(self, conn, profile))]
    pub(crate) async fn update_profile(
        &self,
        conn: &mut PgConnection,
        id: i64,
        profile: &UserProfile,
    ) -> Result<Option<User>> {
        let record = sqlx::query_as::<_, UserRecord>(
            r#"
            UPDATE users
            SET first_name = $2, last_name = $3, display_name = $4, phone = $5, preferred_language = $6,
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, email, password_hash, first_name, last_name, phone, role, preferred_language,
                      created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(&profile.first_name)
        .bind(&profile.last_name)
        .bind(profile.display_name())
        .bind(&profile.phone)
        .bind(&profile.preferred_language)
        .fetch_optional(conn)
        .await?;

        Ok(record.map(Into::into))
    }

    /// # Errors
    /// Returns `AppError::Database` if the update fails.
    #[tracing::instrument(level = "debug", skip(self, conn))]
    pub(crate) async fn update_role(&self, conn: &mut PgConnection, id: i64, role: Role) -> Result<Option<User>> {
        let record = sqlx::query_as::<_, UserRecord>(
            r#"
            UPDATE users
            SET role = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING id, email, password_hash, first_name, last_name, phone, role, preferred_language,
                      created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(role)
        .fetch_optional(conn)
        .await?;

        Ok(record.map(Into::into))
    }
}
