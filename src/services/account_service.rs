use crate::adapters::database::DbPool;
use crate::adapters::database::user_repo::UserRepository;
use crate::domain::auth::{Actor, AuthSession};
use crate::domain::user::{NewUser, Role, User, UserProfile};
use crate::error::{AppError, Result};
use crate::services::auth_service::AuthService;
use opentelemetry::{global, metrics::Counter};

#[derive(Clone, Debug)]
struct Metrics {
    users_registered_total: Counter<u64>,
}

impl Metrics {
    fn new() -> Self {
        let meter = global::meter("dignity-server");
        Self {
            users_registered_total: meter
                .u64_counter("users_registered_total")
                .with_description("Total number of successful user registrations")
                .build(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct AccountService {
    pool: DbPool,
    user_repo: UserRepository,
    auth_service: AuthService,
    metrics: Metrics,
}

impl AccountService {
    #[must_use]
    pub fn new(pool: DbPool, user_repo: UserRepository, auth_service: AuthService) -> Self {
        Self { pool, user_repo, auth_service, metrics: Metrics::new() }
    }

    /// Creates an account and signs the caller in.
    ///
    /// # Errors
    /// Returns `AppError::BadRequest` for invalid input and `AppError::Conflict` if the email is taken.
    #[tracing::instrument(skip(self, new_user), fields(user_id = tracing::field::Empty), err(level = "warn"))]
    pub async fn register(&self, new_user: NewUser) -> Result<AuthSession> {
        new_user.validate()?;
        let NewUser { email, password, profile } = new_user;

        let password_hash = self.auth_service.hash_password(password).await?;

        let mut conn = self.pool.acquire().await?;
        let user = self.user_repo.create(&mut conn, email.trim(), &password_hash, &profile).await?;

        tracing::Span::current().record("user_id", user.id);
        tracing::info!("User registered successfully");
        self.metrics.users_registered_total.add(1, &[]);

        self.auth_service.issue(user)
    }

    /// # Errors
    /// Returns `AppError::NotFound` for an unknown user.
    #[tracing::instrument(err(level = "debug"), skip(self))]
    pub async fn get(&self, id: i64) -> Result<User> {
        let mut conn = self.pool.acquire().await?;
        self.user_repo.find_by_id(&mut conn, id).await?.ok_or(AppError::NotFound)
    }

    /// Applies `patch` to the profile of `id`. Only admins may change roles.
    ///
    /// # Errors
    /// Returns `AppError::Forbidden` unless the caller is the user or an admin,
    /// `AppError::BadRequest` if the patched profile is invalid and `AppError::NotFound` for an unknown user.
    #[tracing::instrument(err(level = "warn"), skip(self, patch))]
    pub async fn update<F>(&self, actor: Actor, id: i64, patch: F, role: Option<Role>) -> Result<User>
    where
        F: FnOnce(&mut UserProfile) + Send,
    {
        if !actor.can_act_for(id) {
            return Err(AppError::Forbidden);
        }
        if role.is_some() && !actor.is_admin() {
            return Err(AppError::Forbidden);
        }

        let mut tx = self.pool.begin().await?;
        let user = self.user_repo.find_by_id(&mut tx, id).await?.ok_or(AppError::NotFound)?;

        let mut profile = user.profile;
        patch(&mut profile);
        profile.validate()?;

        let mut updated = self.user_repo.update_profile(&mut tx, id, &profile).await?.ok_or(AppError::NotFound)?;
        if let Some(role) = role {
            updated = self.user_repo.update_role(&mut tx, id, role).await?.ok_or(AppError::NotFound)?;
        }
        tx.commit().await?;

        Ok(updated)
    }
}
