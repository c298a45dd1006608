#![forbid(unsafe_code)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::todo)]
#![warn(clippy::panic)]
#![warn(clippy::dbg_macro)]
#![warn(clippy::print_stdout)]
#![warn(clippy::print_stderr)]
#![warn(clippy::clone_on_ref_ptr)]
#![warn(unreachable_pub)]
#![warn(missing_debug_implementations)]
#![warn(unused_qualifications)]
#![deny(unused_must_use)]

pub mod adapters;
pub mod api;
pub mod config;
pub mod domain;
pub mod error;
pub mod services;
pub mod telemetry;
pub mod workers;

use crate::adapters::database::DbPool;
use crate::adapters::database::{
    appointment_repo::AppointmentRepository, case_worker_repo::CaseWorkerRepository, document_repo::DocumentRepository,
    job_repo::JobRepository, message_repo::MessageRepository, message_repo::PgMessageStore,
    service_repo::ServiceRepository, user_repo::UserRepository,
};
use crate::api::ServiceContainer;
use crate::config::Config;
use crate::services::account_service::AccountService;
use crate::services::appointment_service::AppointmentService;
use crate::services::auth_service::AuthService;
use crate::services::case_worker_service::CaseWorkerService;
use crate::services::directory_service::DirectoryService;
use crate::services::document_service::DocumentService;
use crate::services::health_service::HealthService;
use crate::services::job_service::JobService;
use crate::services::message_service::MessageService;
use crate::services::rate_limit_service::RateLimitService;
use crate::services::relay::RelayHub;
use crate::workers::RelayGcWorker;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Background loops owned by the server process.
#[derive(Debug)]
pub struct Workers {
    relay_gc: RelayGcWorker,
}

impl Workers {
    #[must_use]
    pub fn spawn_all(self, shutdown_rx: watch::Receiver<bool>) -> Vec<JoinHandle<()>> {
        vec![tokio::spawn(self.relay_gc.run(shutdown_rx))]
    }
}

/// A fully wired application, ready to be served.
#[derive(Debug)]
pub struct App {
    pub services: ServiceContainer,
    pub health_service: HealthService,
    pub workers: Workers,
}

#[derive(Debug)]
pub struct AppBuilder {
    config: Config,
    pool: Option<DbPool>,
}

impl AppBuilder {
    #[must_use]
    pub const fn new(config: Config) -> Self {
        Self { config, pool: None }
    }

    #[must_use]
    pub fn with_database(mut self, pool: DbPool) -> Self {
        self.pool = Some(pool);
        self
    }

    /// Wires repositories, services and workers together.
    ///
    /// # Errors
    /// Returns an error if no database pool was provided.
    pub fn build(self) -> anyhow::Result<App> {
        let config = self.config;
        let pool = self.pool.ok_or_else(|| anyhow::anyhow!("a database pool is required"))?;

        let user_repo = UserRepository::new();
        let case_worker_repo = CaseWorkerRepository::new();

        let relay_hub = RelayHub::new(&config.relay);
        let store = Arc::new(PgMessageStore::new(pool.clone(), MessageRepository::new(), case_worker_repo.clone()));

        let auth_service = AuthService::new(config.auth.clone(), pool.clone(), user_repo.clone());
        let account_service = AccountService::new(pool.clone(), user_repo, auth_service.clone());
        let message_service = MessageService::new(store, Arc::new(relay_hub.clone()), config.messaging.clone());

        let services = ServiceContainer {
            account_service,
            auth_service,
            directory_service: DirectoryService::new(pool.clone(), ServiceRepository::new()),
            job_service: JobService::new(pool.clone(), JobRepository::new()),
            case_worker_service: CaseWorkerService::new(pool.clone(), case_worker_repo.clone()),
            appointment_service: AppointmentService::new(pool.clone(), AppointmentRepository::new(), case_worker_repo),
            document_service: DocumentService::new(pool.clone(), DocumentRepository::new()),
            message_service,
            relay_hub: relay_hub.clone(),
            rate_limit_service: RateLimitService::new(config.server.trusted_proxies.clone()),
            pool: pool.clone(),
        };

        let health_service = HealthService::new(pool, config.health.clone());
        let workers = Workers { relay_gc: RelayGcWorker::new(relay_hub, config.relay.gc_interval_secs) };

        Ok(App { services, health_service, workers })
    }
}

/// Applies pending schema migrations.
///
/// # Errors
/// Returns an error if a migration fails.
pub async fn run_migrations(pool: &DbPool) -> anyhow::Result<()> {
    tracing::info!("Running database migrations");
    sqlx::migrate!().run(pool).await?;
    Ok(())
}

/// Flips `shutdown_tx` on SIGINT or SIGTERM.
pub fn spawn_signal_handler(shutdown_tx: watch::Sender<bool>) {
    tokio::spawn(async move {
        let ctrl_c = async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            }
        };

        #[cfg(unix)]
        let terminate = async {
            match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
                Ok(mut signal) => {
                    signal.recv().await;
                }
                Err(e) => {
                    tracing::error!(error = %e, "Failed to install SIGTERM handler");
                    std::future::pending::<()>().await;
                }
            }
        };

        #[cfg(not(unix))]
        let terminate = std::future::pending::<()>();

        tokio::select! {
            () = ctrl_c => {}
            () = terminate => {}
        }

        tracing::info!("Shutdown signal received, draining connections");
        let _ = shutdown_tx.send(true);
    });
}

/// Routes panics through `tracing` so they reach the configured log sink.
pub fn setup_panic_hook() {
    std::panic::set_hook(Box::new(|info| {
        let location = info.location().map(|l| format!("{}:{}", l.file(), l.line())).unwrap_or_default();
        let payload = info
            .payload()
            .downcast_ref::<&str>()
            .map(ToString::to_string)
            .or_else(|| info.payload().downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "unknown panic payload".to_string());

        tracing::error!(panic.location = %location, panic.payload = %payload, "Thread panicked");
    }));
}
