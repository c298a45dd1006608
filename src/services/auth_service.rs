use crate::adapters::database::DbPool;
use crate::adapters::database::user_repo::UserRepository;
use crate::config::AuthConfig;
use crate::domain::auth::{AuthSession, Claims, Password};
use crate::domain::user::User;
use crate::error::{AppError, Result};
use opentelemetry::{KeyValue, global, metrics::Counter};

#[derive(Clone, Debug)]
struct Metrics {
    login_total: Counter<u64>,
}

impl Metrics {
    fn new() -> Self {
        let meter = global::meter("dignity-server");
        Self {
            login_total: meter
                .u64_counter("auth_login_total")
                .with_description("Login attempts, labelled by outcome")
                .build(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct AuthService {
    config: AuthConfig,
    pool: DbPool,
    user_repo: UserRepository,
    metrics: Metrics,
}

impl AuthService {
    #[must_use]
    pub fn new(config: AuthConfig, pool: DbPool, user_repo: UserRepository) -> Self {
        Self { config, pool, user_repo, metrics: Metrics::new() }
    }

    /// # Errors
    /// Returns `AppError::AuthError` for an unknown email or a wrong password.
    #[tracing::instrument(skip(self, email, password), fields(user_id = tracing::field::Empty), err(level = "warn"))]
    pub async fn login(&self, email: &str, password: String) -> Result<AuthSession> {
        let mut conn = self.pool.acquire().await?;
        let Some(user) = self.user_repo.find_by_email(&mut conn, email).await? else {
            tracing::warn!("Login failed: user not found");
            self.metrics.login_total.add(1, &[KeyValue::new("status", "failure")]);
            return Err(AppError::AuthError);
        };
        drop(conn);

        tracing::Span::current().record("user_id", user.id);

        if !self.verify_password(password, user.password_hash.clone()).await? {
            tracing::warn!("Login failed: invalid password");
            self.metrics.login_total.add(1, &[KeyValue::new("status", "failure")]);
            return Err(AppError::AuthError);
        }

        self.metrics.login_total.add(1, &[KeyValue::new("status", "success")]);
        self.issue(user)
    }

    /// Hashes on the blocking pool.
    ///
    /// # Errors
    /// Returns `AppError::Internal` if hashing fails.
    #[tracing::instrument(err, skip(self, password))]
    pub async fn hash_password(&self, password: String) -> Result<String> {
        tokio::task::spawn_blocking(move || Password::hash(&password)).await.map_err(|_| AppError::Internal)?
    }

    /// # Errors
    /// Returns `AppError::Internal` if the stored hash cannot be parsed.
    #[tracing::instrument(err, skip(self, password, password_hash))]
    pub async fn verify_password(&self, password: String, password_hash: String) -> Result<bool> {
        tokio::task::spawn_blocking(move || Password::verify(&password, &password_hash))
            .await
            .map_err(|_| AppError::Internal)?
    }

    /// Signs an access token for `user`.
    ///
    /// # Errors
    /// Returns `AppError::Internal` if signing fails.
    pub fn issue(&self, user: User) -> Result<AuthSession> {
        let claims = Claims::new(user.id, user.role, self.config.access_token_ttl_secs);
        let token = claims.encode(&self.config.jwt_secret)?;
        Ok(AuthSession { token, expires_at: claims.exp, user })
    }

    /// # Errors
    /// Returns `AppError::AuthError` if the token is invalid or expired.
    pub fn verify_token(&self, token: &str) -> Result<Claims> {
        Claims::decode(token, &self.config.jwt_secret)
    }
}
