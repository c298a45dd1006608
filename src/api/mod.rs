use crate::adapters::database::DbPool;
use crate::api::rate_limit::log_rate_limit_events;
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
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::{
    Router,
    middleware::from_fn_with_state,
    routing::{get, patch, post},
};
use std::sync::Arc;
use std::time::Duration;
use tower_governor::GovernorLayer;
use tower_governor::governor::GovernorConfigBuilder;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

pub mod appointments;
pub mod auth;
pub mod case_workers;
pub mod conversations;
pub mod docs;
pub mod documents;
pub mod gateway;
pub mod health;
pub mod jobs;
pub mod messages;
pub mod middleware;
pub mod rate_limit;
pub mod schemas;
pub mod services;
pub mod users;

#[derive(Clone, Debug)]
pub struct AppState {
    pub config: Config,
    pub account_service: AccountService,
    pub auth_service: AuthService,
    pub directory_service: DirectoryService,
    pub job_service: JobService,
    pub case_worker_service: CaseWorkerService,
    pub appointment_service: AppointmentService,
    pub document_service: DocumentService,
    pub message_service: MessageService,
    pub relay_hub: RelayHub,
    pub rate_limit_service: RateLimitService,
    pub shutdown_rx: tokio::sync::watch::Receiver<bool>,
}

#[derive(Clone, Debug)]
pub struct MgmtState {
    pub health_service: HealthService,
}

#[derive(Debug)]
pub struct ServiceContainer {
    pub pool: DbPool,
    pub account_service: AccountService,
    pub auth_service: AuthService,
    pub directory_service: DirectoryService,
    pub job_service: JobService,
    pub case_worker_service: CaseWorkerService,
    pub appointment_service: AppointmentService,
    pub document_service: DocumentService,
    pub message_service: MessageService,
    pub relay_hub: RelayHub,
    pub rate_limit_service: RateLimitService,
}

/// Configures and returns the primary application router.
///
/// # Panics
/// Panics if the rate limiter configuration cannot be constructed.
pub fn app_router(
    config: Config,
    services: ServiceContainer,
    shutdown_rx: tokio::sync::watch::Receiver<bool>,
) -> Router {
    let std_interval_ns = 1_000_000_000 / config.rate_limit.per_second.max(1);
    let standard_conf = Arc::new(
        GovernorConfigBuilder::default()
            .per_nanosecond(u64::from(std_interval_ns))
            .burst_size(config.rate_limit.burst)
            .key_extractor(services.rate_limit_service.extractor.clone())
            .finish()
            .expect("Failed to build standard rate limiter config"),
    );

    // Registration and login hash passwords, so they get a tighter budget.
    let auth_interval_ns = 1_000_000_000 / config.rate_limit.auth_per_second.max(1);
    let auth_conf = Arc::new(
        GovernorConfigBuilder::default()
            .per_nanosecond(u64::from(auth_interval_ns))
            .burst_size(config.rate_limit.auth_burst)
            .key_extractor(services.rate_limit_service.extractor.clone())
            .finish()
            .expect("Failed to build auth rate limiter config"),
    );

    let request_timeout = Duration::from_secs(config.server.request_timeout_secs.max(1));

    let state = AppState {
        config,
        account_service: services.account_service,
        auth_service: services.auth_service,
        directory_service: services.directory_service,
        job_service: services.job_service,
        case_worker_service: services.case_worker_service,
        appointment_service: services.appointment_service,
        document_service: services.document_service,
        message_service: services.message_service,
        relay_hub: services.relay_hub,
        rate_limit_service: services.rate_limit_service,
        shutdown_rx,
    };

    let auth_routes = Router::new()
        .route("/users", post(auth::register))
        .route("/sessions", post(auth::login))
        .layer(GovernorLayer::new(auth_conf));

    // The gateway is long-lived, so it sits outside the request timeout.
    let gateway_routes = Router::new().route("/gateway", get(gateway::websocket_handler));

    let api_routes = Router::new()
        .route("/users/me", get(users::me))
        .route("/users/{id}", get(users::get_user).patch(users::update_user))
        .route("/services", get(services::list_services).post(services::create_service))
        .route(
            "/services/{id}",
            get(services::get_service).patch(services::update_service).delete(services::delete_service),
        )
        .route("/services/{id}/capacity", post(services::adjust_capacity))
        .route("/jobs", get(jobs::list_jobs).post(jobs::create_job))
        .route("/jobs/{id}", get(jobs::get_job).patch(jobs::update_job).delete(jobs::delete_job))
        .route("/case-workers", get(case_workers::list_case_workers).post(case_workers::create_case_worker))
        .route(
            "/case-workers/{id}",
            get(case_workers::get_case_worker)
                .patch(case_workers::update_case_worker)
                .delete(case_workers::delete_case_worker),
        )
        .route("/case-workers/{id}/caseload", post(case_workers::adjust_caseload))
        .route("/case-workers/{id}/messages", get(case_workers::case_worker_messages))
        .route("/appointments", get(appointments::list_appointments).post(appointments::create_appointment))
        .route(
            "/appointments/{id}",
            get(appointments::get_appointment)
                .patch(appointments::update_appointment)
                .delete(appointments::delete_appointment),
        )
        .route("/documents", get(documents::list_documents).post(documents::create_document))
        .route(
            "/documents/{id}",
            get(documents::get_document).patch(documents::update_document).delete(documents::delete_document),
        )
        .route("/messages", post(messages::send_message))
        .route("/messages/{id}", axum::routing::delete(messages::delete_message))
        .route("/messages/{id}/read", patch(messages::mark_read))
        .route("/conversations", get(conversations::list_conversations))
        .route("/conversations/{userId}/messages", get(conversations::conversation_messages))
        .route("/contacts", get(conversations::list_contacts))
        .layer(TimeoutLayer::with_status_code(StatusCode::REQUEST_TIMEOUT, request_timeout))
        .merge(gateway_routes)
        .layer(GovernorLayer::new(standard_conf));

    Router::new()
        .route("/openapi.yaml", get(docs::openapi_yaml))
        .nest("/v1", auth_routes.merge(api_routes))
        .layer(from_fn_with_state(state.clone(), log_rate_limit_events))
        .layer(PropagateRequestIdLayer::new(axum::http::HeaderName::from_static("x-request-id")))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(move |request: &Request<Body>| {
                    let request_id = request
                        .extensions()
                        .get::<tower_http::request_id::RequestId>()
                        .map(|id| id.header_value().to_str().unwrap_or_default())
                        .unwrap_or_default()
                        .to_string();

                    tracing::info_span!(
                        "request",
                        "request_id" = %request_id,
                        "http.request.method" = %request.method(),
                        "url.path" = %request.uri().path(),
                        "http.response.status_code" = tracing::field::Empty,
                        "otel.kind" = "server",
                        "user_id" = tracing::field::Empty,
                    )
                })
                .on_response(
                    |response: &axum::http::Response<_>, latency: Duration, _span: &tracing::Span| {
                        let status = response.status();
                        tracing::Span::current().record("http.response.status_code", status.as_u16());

                        tracing::info!(
                            latency_ms = %latency.as_millis(),
                            status = %status.as_u16(),
                            "request completed"
                        );
                    },
                )
                .on_failure(|error, _latency, _span: &tracing::Span| {
                    tracing::error!(error = %error, "request failed");
                }),
        )
        .layer(SetRequestIdLayer::new(axum::http::HeaderName::from_static("x-request-id"), MakeRequestUuid))
        .with_state(state)
}

pub fn mgmt_router(state: MgmtState) -> Router {
    Router::new().route("/livez", get(health::livez)).route("/readyz", get(health::readyz)).with_state(state)
}
